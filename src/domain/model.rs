use crate::utils::error::{ProvisionError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque string values collected for a binding, keyed by option name.
pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Server,
    Platform,
    Site,
}

impl ContextType {
    pub const ALL: [ContextType; 3] = [ContextType::Server, ContextType::Platform, ContextType::Site];

    pub fn id(&self) -> &'static str {
        match self {
            ContextType::Server => "server",
            ContextType::Platform => "platform",
            ContextType::Site => "site",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ContextType::Server => "Server",
            ContextType::Platform => "Platform",
            ContextType::Site => "Site",
        }
    }

    /// Servers provide services; every other context type subscribes to them.
    pub fn is_provider(&self) -> bool {
        matches!(self, ContextType::Server)
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// `services.<service>` on a server context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderBinding {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

/// `service_subscriptions.<service>` on a platform or site context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberBinding {
    pub server: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BindingRecord {
    Provider(ProviderBinding),
    Subscriber(SubscriberBinding),
}

impl BindingRecord {
    pub fn namespace(&self) -> &'static str {
        match self {
            BindingRecord::Provider(_) => "services",
            BindingRecord::Subscriber(_) => "service_subscriptions",
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            BindingRecord::Provider(binding) => &binding.properties,
            BindingRecord::Subscriber(binding) => &binding.properties,
        }
    }
}

/// A hosting entity with its persisted configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub context_type: ContextType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub services: BTreeMap<String, ProviderBinding>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub service_subscriptions: BTreeMap<String, SubscriberBinding>,
    /// Settings owned by other subsystems (`uri`, `root`, ...), written back untouched.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Context {
    pub fn new(name: impl Into<String>, context_type: ContextType) -> Self {
        Self {
            name: name.into(),
            context_type,
            properties: Properties::new(),
            services: BTreeMap::new(),
            service_subscriptions: BTreeMap::new(),
            extra: toml::Table::new(),
        }
    }

    pub fn provides(&self, service: &str) -> bool {
        self.context_type.is_provider() && self.services.contains_key(service)
    }

    /// Writes a binding under its namespace, replacing any previous binding for `service`.
    pub fn bind(&mut self, service: &str, record: BindingRecord) -> Result<()> {
        match (self.context_type.is_provider(), record) {
            (true, BindingRecord::Provider(binding)) => {
                self.services.insert(service.to_string(), binding);
                Ok(())
            }
            (false, BindingRecord::Subscriber(binding)) => {
                self.service_subscriptions
                    .insert(service.to_string(), binding);
                Ok(())
            }
            (_, record) => Err(ProvisionError::ContextTypeMismatch {
                context: self.name.clone(),
                context_type: self.context_type.to_string(),
                operation: format!("writing {}.{}", record.namespace(), service),
            }),
        }
    }

    pub fn binding(&self, service: &str) -> Option<BindingRecord> {
        if self.context_type.is_provider() {
            self.services
                .get(service)
                .cloned()
                .map(BindingRecord::Provider)
        } else {
            self.service_subscriptions
                .get(service)
                .cloned()
                .map(BindingRecord::Subscriber)
        }
    }

    /// Bindings in the namespace that belongs to this context's type, ordered by service.
    pub fn bindings(&self) -> Vec<(String, BindingRecord)> {
        if self.context_type.is_provider() {
            self.services
                .iter()
                .map(|(service, b)| (service.clone(), BindingRecord::Provider(b.clone())))
                .collect()
        } else {
            self.service_subscriptions
                .iter()
                .map(|(service, b)| (service.clone(), BindingRecord::Subscriber(b.clone())))
                .collect()
        }
    }
}

/// One documented option of a service type for a context type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDoc {
    pub key: String,
    pub description: String,
}

impl OptionDoc {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// An optional command input generated from the service registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDefinition {
    pub key: String,
    pub context_type: ContextType,
    pub service: String,
    /// The handler's own description.
    pub documentation: String,
    /// `<context-type> <service> service: <documentation>`
    pub description: String,
}

/// An entry offered by `Console::choice`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: String,
    pub label: String,
}

impl Choice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_respects_namespace_invariant() {
        let mut server = Context::new("server1", ContextType::Server);
        let subscription = BindingRecord::Subscriber(SubscriberBinding {
            server: "server2".to_string(),
            properties: Properties::new(),
        });
        assert!(server.bind("http", subscription).is_err());
        assert!(server.service_subscriptions.is_empty());

        let provider = BindingRecord::Provider(ProviderBinding {
            service_type: "apache".to_string(),
            properties: Properties::new(),
        });
        server.bind("http", provider.clone()).unwrap();
        assert!(server.provides("http"));
        assert_eq!(server.binding("http"), Some(provider));

        let mut site = Context::new("example.com", ContextType::Site);
        let err = site
            .bind(
                "http",
                BindingRecord::Provider(ProviderBinding {
                    service_type: "apache".to_string(),
                    properties: Properties::new(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, ProvisionError::ContextTypeMismatch { .. }));
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut site = Context::new("example.com", ContextType::Site);
        for server in ["server1", "server2"] {
            site.bind(
                "http",
                BindingRecord::Subscriber(SubscriberBinding {
                    server: server.to_string(),
                    properties: Properties::new(),
                }),
            )
            .unwrap();
        }
        assert_eq!(site.service_subscriptions.len(), 1);
        assert_eq!(site.service_subscriptions["http"].server, "server2");
    }

    #[test]
    fn test_context_toml_shape() {
        let mut server = Context::new("server1", ContextType::Server);
        server
            .bind(
                "http",
                BindingRecord::Provider(ProviderBinding {
                    service_type: "apache".to_string(),
                    properties: Properties::new(),
                }),
            )
            .unwrap();

        let text = toml::to_string_pretty(&server).unwrap();
        assert!(text.contains("type = \"server\""));
        assert!(text.contains("[services.http]"));
        assert!(!text.contains("properties"));

        let parsed: Context = toml::from_str(&text).unwrap();
        assert_eq!(parsed, server);
    }

    #[test]
    fn test_unowned_settings_survive_rebinding() {
        let mut site: Context = toml::from_str(
            "type = \"site\"\nuri = \"example.com\"\n\n[http]\nport = 80\n",
        )
        .unwrap();
        assert_eq!(site.extra["uri"].as_str(), Some("example.com"));

        site.bind(
            "http",
            BindingRecord::Subscriber(SubscriberBinding {
                server: "server1".to_string(),
                properties: Properties::new(),
            }),
        )
        .unwrap();

        let text = toml::to_string_pretty(&site).unwrap();
        let value: toml::Table = toml::from_str(&text).unwrap();
        assert_eq!(value["uri"].as_str(), Some("example.com"));
        assert_eq!(value["http"]["port"].as_integer(), Some(80));
        assert_eq!(
            value["service_subscriptions"]["http"]["server"].as_str(),
            Some("server1")
        );
    }
}
