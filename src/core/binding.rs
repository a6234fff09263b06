use crate::core::capability::ContextCapabilityResolver;
use crate::core::properties::PropertyResolver;
use crate::core::registry::ServiceRegistry;
use crate::domain::model::{
    BindingRecord, Choice, Context, ContextType, Properties, ProviderBinding, SubscriberBinding,
};
use crate::domain::ports::{Console, ContextDirectory, ContextStore, ServiceTypeHandler};
use crate::utils::error::{ProvisionError, Result};
use std::fmt;

/// Values supplied on the command line for `add`. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddRequest {
    pub service: Option<String>,
    pub server: Option<String>,
    pub service_type: Option<String>,
    pub options: Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SelectService,
    ProviderPath,
    SubscriberPath,
    ResolveProperties,
    Persist,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SelectService => "select_service",
            Stage::ProviderPath => "provider_path",
            Stage::SubscriberPath => "subscriber_path",
            Stage::ResolveProperties => "resolve_properties",
            Stage::Persist => "persist",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOutcome {
    pub context: String,
    pub service: String,
    pub record: BindingRecord,
}

/// Attaches one service to one context and saves the context.
pub struct BindingWorkflow<'a, S: ContextStore, D: ContextDirectory> {
    registry: &'a ServiceRegistry,
    store: &'a S,
    capabilities: ContextCapabilityResolver<'a, D>,
    properties: PropertyResolver,
}

impl<'a, S: ContextStore, D: ContextDirectory> BindingWorkflow<'a, S, D> {
    pub fn new(registry: &'a ServiceRegistry, store: &'a S, directory: &'a D) -> Self {
        Self {
            registry,
            store,
            capabilities: ContextCapabilityResolver::new(registry, directory),
            properties: PropertyResolver::new(),
        }
    }

    /// Runs the workflow. `context` is only replaced once the store accepted the new binding.
    pub fn run<C: Console>(
        &self,
        context: &mut Context,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<BindingOutcome> {
        self.execute(context, request, console).inspect_err(|e| {
            tracing::debug!(stage = %Stage::Failed, context = %context.name, "{}", e);
        })
    }

    fn execute<C: Console>(
        &self,
        context: &mut Context,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<BindingOutcome> {
        console.comment("Add Services");

        enter(Stage::SelectService, context);
        let service = self.select_service(context, request, console)?;
        if !self.registry.contains(&service) {
            return Err(ProvisionError::UnknownService {
                service,
                available: self.registry.service_ids(),
            });
        }

        let record = if context.context_type.is_provider() {
            enter(Stage::ProviderPath, context);
            let service_type = self.select_service_type(&service, request, console)?;
            let handler = self.registry.resolve_class(&service, Some(&service_type))?;

            enter(Stage::ResolveProperties, context);
            let properties =
                self.resolve_properties(handler, context.context_type, request, console)?;

            console.info(&format!("Adding {} service {}...", service, service_type));
            BindingRecord::Provider(ProviderBinding {
                service_type,
                properties,
            })
        } else {
            enter(Stage::SubscriberPath, context);
            let server = self.select_server(&service, request, console)?;
            let handler = self.registry.resolve_class(&service, None)?;

            enter(Stage::ResolveProperties, context);
            let properties =
                self.resolve_properties(handler, context.context_type, request, console)?;

            console.info(&format!(
                "Using {} service from server {}...",
                service, server
            ));
            BindingRecord::Subscriber(SubscriberBinding { server, properties })
        };

        enter(Stage::Persist, context);
        self.persist(context, &service, record.clone())?;

        enter(Stage::Done, context);
        console.success("Service saved to context!");
        Ok(BindingOutcome {
            context: context.name.clone(),
            service,
            record,
        })
    }

    fn select_service<C: Console>(
        &self,
        context: &Context,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<String> {
        let service = match explicit(&request.service) {
            Some(service) => service.to_string(),
            None => {
                let options = if context.context_type.is_provider() {
                    self.capabilities.providable_services(context)?
                } else {
                    self.capabilities.subscribable_services(context)?
                };
                console.choice("Which service?", &options)?
            }
        };

        if service.is_empty() {
            return Err(ProvisionError::EmptySelection {
                field: "service".to_string(),
            });
        }
        Ok(service)
    }

    fn select_service_type<C: Console>(
        &self,
        service: &str,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<String> {
        let options = self.capabilities.service_type_options(service);
        if options.is_empty() {
            return Err(ProvisionError::NoImplementation {
                service: service.to_string(),
            });
        }

        let service_type = match explicit(&request.service_type) {
            Some(service_type) => {
                console.comment(&format!("Using option service_type={}", service_type));
                service_type.to_string()
            }
            None => console.choice("Which service type?", &options)?,
        };

        // Non-interactive consoles answer with an empty selection.
        if service_type.is_empty() {
            return Err(ProvisionError::MissingServiceType {
                service: service.to_string(),
            });
        }

        if !options.iter().any(|o| o.id == service_type) {
            return Err(ProvisionError::InvalidServiceType {
                service: service.to_string(),
                service_type,
                valid: options.into_iter().map(|o| o.id).collect(),
            });
        }
        Ok(service_type)
    }

    fn select_server<C: Console>(
        &self,
        service: &str,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<String> {
        let providers = self.capabilities.server_providers_of(service);
        if providers.is_empty() {
            return Err(ProvisionError::NoProviders {
                service: service.to_string(),
            });
        }

        let server = match explicit(&request.server) {
            Some(server) => server.to_string(),
            None => {
                let options: Vec<Choice> = providers
                    .iter()
                    .map(|name| Choice::new(name.clone(), name.clone()))
                    .collect();
                console.choice("Which server?", &options)?
            }
        };

        if server.is_empty() {
            return Err(ProvisionError::EmptySelection {
                field: "server".to_string(),
            });
        }
        if !providers.contains(&server) {
            return Err(ProvisionError::UnknownProvider {
                service: service.to_string(),
                server,
                providers,
            });
        }
        Ok(server)
    }

    fn resolve_properties<C: Console>(
        &self,
        handler: &dyn ServiceTypeHandler,
        context_type: ContextType,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<Properties> {
        let schema = self.registry.option_documentation(handler, context_type);
        self.properties
            .resolve(&schema, &request.options, |key, description| {
                console.ask(&format!("{} ({})", key, description))
            })
    }

    fn persist(&self, context: &mut Context, service: &str, record: BindingRecord) -> Result<()> {
        let mut updated = context.clone();
        updated.bind(service, record)?;

        self.store
            .save(&updated)
            .map_err(|source| ProvisionError::Persistence {
                context: context.name.clone(),
                source,
            })?;

        *context = updated;
        tracing::info!(context = %context.name, service, "Binding saved");
        Ok(())
    }
}

fn enter(stage: Stage, context: &Context) {
    tracing::debug!(%stage, context = %context.name, "Entering stage");
}

fn explicit(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
