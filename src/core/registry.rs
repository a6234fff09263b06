use crate::domain::model::{Choice, ContextType, OptionDoc};
use crate::domain::ports::ServiceTypeHandler;
use crate::utils::error::{ProvisionError, Result};
use std::fmt;

struct ServiceTypeEntry {
    id: String,
    display_name: String,
    handler: Box<dyn ServiceTypeHandler>,
}

/// A service, its base handler and the service types that implement it.
pub struct ServiceDefinition {
    id: String,
    display_name: String,
    base: Box<dyn ServiceTypeHandler>,
    types: Vec<ServiceTypeEntry>,
}

impl ServiceDefinition {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        base: impl ServiceTypeHandler + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            base: Box::new(base),
            types: Vec::new(),
        }
    }

    pub fn with_type(
        mut self,
        id: impl Into<String>,
        display_name: impl Into<String>,
        handler: impl ServiceTypeHandler + 'static,
    ) -> Self {
        let id = id.into();
        let entry = ServiceTypeEntry {
            id: id.clone(),
            display_name: display_name.into(),
            handler: Box::new(handler),
        };
        match self.types.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = entry,
            None => self.types.push(entry),
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn has_implementation(&self) -> bool {
        !self.types.is_empty()
    }
}

impl fmt::Debug for ServiceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDefinition")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field(
                "types",
                &self.types.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Catalog of services and their service-type handlers, in registration order.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    services: Vec<ServiceDefinition>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a service, replacing an earlier definition with the same id in place.
    pub fn register(mut self, definition: ServiceDefinition) -> Self {
        match self.services.iter_mut().find(|s| s.id == definition.id) {
            Some(existing) => *existing = definition,
            None => self.services.push(definition),
        }
        self
    }

    pub fn list_services(&self) -> Vec<Choice> {
        self.services
            .iter()
            .map(|s| Choice::new(s.id.clone(), s.display_name.clone()))
            .collect()
    }

    pub fn list_context_types(&self) -> Vec<ContextType> {
        ContextType::ALL.to_vec()
    }

    pub fn service(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.service(id).is_some()
    }

    pub fn service_ids(&self) -> Vec<String> {
        self.services.iter().map(|s| s.id.clone()).collect()
    }

    /// The base handler of `service`, or the handler of one of its service types.
    pub fn resolve_class(
        &self,
        service: &str,
        service_type: Option<&str>,
    ) -> Result<&dyn ServiceTypeHandler> {
        let definition = self
            .service(service)
            .ok_or_else(|| ProvisionError::UnknownService {
                service: service.to_string(),
                available: self.service_ids(),
            })?;

        let Some(service_type) = service_type else {
            return Ok(definition.base.as_ref());
        };

        definition
            .types
            .iter()
            .find(|t| t.id == service_type)
            .map(|t| t.handler.as_ref())
            .ok_or_else(|| ProvisionError::UnknownServiceType {
                service: service.to_string(),
                service_type: service_type.to_string(),
                available: definition.types.iter().map(|t| t.id.clone()).collect(),
            })
    }

    pub fn option_documentation(
        &self,
        handler: &dyn ServiceTypeHandler,
        context_type: ContextType,
    ) -> Vec<OptionDoc> {
        handler.option_documentation(context_type)
    }

    /// Service types of `service` as (id, display name); empty for unknown services.
    pub fn service_types(&self, service: &str) -> Vec<Choice> {
        self.service(service)
            .map(|s| {
                s.types
                    .iter()
                    .map(|t| Choice::new(t.id.clone(), t.display_name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}
