pub mod db;
pub mod http;

use crate::core::registry::{ServiceDefinition, ServiceRegistry};
use crate::domain::model::OptionDoc;

/// The services every installation knows about.
pub fn builtin_registry() -> ServiceRegistry {
    ServiceRegistry::new()
        .register(
            ServiceDefinition::new("http", "Web", http::HttpService)
                .with_type("apache", "Apache", http::ApacheService)
                .with_type("nginx", "NGINX", http::NginxService),
        )
        .register(
            ServiceDefinition::new("db", "Database", db::DbService)
                .with_type("mysql", "MySQL", db::MysqlService),
        )
}

fn docs(pairs: &[(&str, &str)]) -> Vec<OptionDoc> {
    pairs
        .iter()
        .map(|(key, description)| OptionDoc::new(*key, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::OptionSchemaAggregator;
    use crate::domain::model::ContextType;

    #[test]
    fn test_builtin_registry() {
        let registry = builtin_registry();
        let ids: Vec<String> = registry.list_services().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["http", "db"]);
        assert_eq!(registry.service_types("http").len(), 2);
        assert_eq!(registry.service_types("db")[0].id, "mysql");
    }

    #[test]
    fn test_every_type_documents_every_context_type() {
        let registry = builtin_registry();
        for service in registry.list_services() {
            for service_type in registry.service_types(&service.id) {
                let handler = registry
                    .resolve_class(&service.id, Some(&service_type.id))
                    .unwrap();
                let base = registry.resolve_class(&service.id, None).unwrap();
                for context_type in ContextType::ALL {
                    assert_eq!(
                        handler.option_documentation(context_type),
                        base.option_documentation(context_type)
                    );
                }
            }
        }
    }

    #[test]
    fn test_shared_keys_are_kept_in_schema() {
        let registry = builtin_registry();
        let schema = OptionSchemaAggregator::new(&registry).build_input_schema();
        let restart: Vec<&str> = schema
            .iter()
            .filter(|i| i.key == "restart_command")
            .map(|i| i.service.as_str())
            .collect();
        assert_eq!(restart, vec!["http", "db"]);
    }
}
