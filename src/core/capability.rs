use crate::core::registry::ServiceRegistry;
use crate::domain::model::{Choice, Context, ContextType};
use crate::domain::ports::ContextDirectory;
use crate::utils::error::{ProvisionError, Result};

/// Answers what a context can provide or subscribe to, and who provides what.
pub struct ContextCapabilityResolver<'a, D: ContextDirectory> {
    registry: &'a ServiceRegistry,
    directory: &'a D,
}

impl<'a, D: ContextDirectory> ContextCapabilityResolver<'a, D> {
    pub fn new(registry: &'a ServiceRegistry, directory: &'a D) -> Self {
        Self {
            registry,
            directory,
        }
    }

    /// Services a server can provide: those with at least one service type.
    pub fn providable_services(&self, context: &Context) -> Result<Vec<Choice>> {
        if !context.context_type.is_provider() {
            return Err(mismatch(context, "providing services"));
        }
        Ok(self
            .registry
            .list_services()
            .into_iter()
            .filter(|s| {
                self.registry
                    .service(&s.id)
                    .is_some_and(|d| d.has_implementation())
            })
            .collect())
    }

    pub fn subscribable_services(&self, context: &Context) -> Result<Vec<Choice>> {
        if context.context_type.is_provider() {
            return Err(mismatch(context, "subscribing to services"));
        }
        Ok(self.registry.list_services())
    }

    /// Names of server contexts whose `services` already contain `service`.
    ///
    /// Directory failures are logged and reported as "no providers".
    pub fn server_providers_of(&self, service: &str) -> Vec<String> {
        let servers = match self.directory.contexts_of_type(ContextType::Server) {
            Ok(servers) => servers,
            Err(e) => {
                tracing::warn!("Could not list server contexts: {}", e);
                return Vec::new();
            }
        };

        let mut providers: Vec<String> = servers
            .into_iter()
            .filter(|server| server.provides(service))
            .map(|server| server.name)
            .collect();
        providers.sort();
        providers
    }

    pub fn service_type_options(&self, service: &str) -> Vec<Choice> {
        self.registry.service_types(service)
    }
}

fn mismatch(context: &Context, operation: &str) -> ProvisionError {
    ProvisionError::ContextTypeMismatch {
        context: context.name.clone(),
        context_type: context.context_type.to_string(),
        operation: operation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryContextStore;
    use crate::core::registry::ServiceDefinition;
    use crate::domain::model::{BindingRecord, OptionDoc, ProviderBinding};
    use crate::domain::ports::{ContextStore, ServiceTypeHandler};
    use crate::utils::error::StoreError;

    struct NoOptions;

    impl ServiceTypeHandler for NoOptions {
        fn option_documentation(&self, _context_type: ContextType) -> Vec<OptionDoc> {
            Vec::new()
        }
    }

    fn registry() -> ServiceRegistry {
        ServiceRegistry::new()
            .register(ServiceDefinition::new("http", "Web", NoOptions).with_type("apache", "Apache", NoOptions))
            .register(ServiceDefinition::new("mail", "Mail", NoOptions))
    }

    fn server_with(name: &str, service: &str) -> Context {
        let mut server = Context::new(name, ContextType::Server);
        server
            .bind(
                service,
                BindingRecord::Provider(ProviderBinding {
                    service_type: "apache".to_string(),
                    properties: Default::default(),
                }),
            )
            .unwrap();
        server
    }

    #[test]
    fn test_providable_and_subscribable_services() {
        let registry = registry();
        let store = MemoryContextStore::new();
        let resolver = ContextCapabilityResolver::new(&registry, &store);

        let server = Context::new("server1", ContextType::Server);
        let site = Context::new("example.com", ContextType::Site);

        let providable: Vec<String> = resolver
            .providable_services(&server)
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(providable, vec!["http"]);
        assert_eq!(resolver.subscribable_services(&site).unwrap().len(), 2);

        assert!(resolver.providable_services(&site).is_err());
        assert!(resolver.subscribable_services(&server).is_err());
    }

    #[test]
    fn test_server_providers_of() {
        let registry = registry();
        let store = MemoryContextStore::new();
        store.save(&server_with("server2", "http")).unwrap();
        store.save(&server_with("server1", "http")).unwrap();
        store.save(&server_with("mailhost", "mail")).unwrap();
        store.save(&Context::new("platform1", ContextType::Platform)).unwrap();

        let resolver = ContextCapabilityResolver::new(&registry, &store);
        assert_eq!(resolver.server_providers_of("http"), vec!["server1", "server2"]);
        assert_eq!(resolver.server_providers_of("mail"), vec!["mailhost"]);
        assert!(resolver.server_providers_of("db").is_empty());
    }

    struct BrokenDirectory;

    impl ContextDirectory for BrokenDirectory {
        fn contexts_of_type(
            &self,
            _context_type: ContextType,
        ) -> std::result::Result<Vec<Context>, StoreError> {
            Err(StoreError::Unavailable {
                message: "offline".to_string(),
            })
        }
    }

    #[test]
    fn test_server_providers_of_fails_softly() {
        let registry = registry();
        let resolver = ContextCapabilityResolver::new(&registry, &BrokenDirectory);
        assert!(resolver.server_providers_of("http").is_empty());
        assert!(resolver.service_type_options("mail").is_empty());
        assert_eq!(resolver.service_type_options("http")[0].id, "apache");
    }
}
