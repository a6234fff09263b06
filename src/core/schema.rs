use crate::core::registry::ServiceRegistry;
use crate::domain::model::InputDefinition;
use std::collections::HashSet;

/// Flattens every service's option documentation into command inputs.
pub struct OptionSchemaAggregator<'a> {
    registry: &'a ServiceRegistry,
}

impl<'a> OptionSchemaAggregator<'a> {
    pub fn new(registry: &'a ServiceRegistry) -> Self {
        Self { registry }
    }

    /// One input per option key of every (service, context type) pair, in registry order.
    ///
    /// The same key may appear for several pairs; those entries are kept; consumers
    /// bind the key once and share the value between services.
    pub fn build_input_schema(&self) -> Vec<InputDefinition> {
        let mut inputs = Vec::new();

        for service in self.registry.list_services() {
            let handler = match self.registry.resolve_class(&service.id, None) {
                Ok(handler) => handler,
                Err(e) => {
                    tracing::warn!("Skipping options of service {}: {}", service.id, e);
                    continue;
                }
            };

            for context_type in self.registry.list_context_types() {
                let mut seen = HashSet::new();
                for doc in self.registry.option_documentation(handler, context_type) {
                    if !seen.insert(doc.key.clone()) {
                        continue;
                    }
                    inputs.push(InputDefinition {
                        description: format!(
                            "{} {} service: {}",
                            context_type.display_name(),
                            service.label,
                            doc.description
                        ),
                        key: doc.key,
                        context_type,
                        service: service.id.clone(),
                        documentation: doc.description,
                    });
                }
            }
        }

        inputs
    }
}

/// The first definition of each distinct key, in schema order.
pub fn first_definitions(schema: &[InputDefinition]) -> Vec<&InputDefinition> {
    let mut seen = HashSet::new();
    schema
        .iter()
        .filter(|input| seen.insert(input.key.as_str()))
        .collect()
}
