use crate::core::binding::{AddRequest, BindingOutcome, BindingWorkflow};
use crate::core::registry::ServiceRegistry;
use crate::domain::model::{BindingRecord, Context, ContextType};
use crate::domain::ports::{Console, ContextDirectory, ContextStore};
use crate::utils::error::{ProvisionError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SubCommand {
    #[default]
    List,
    Add,
    Remove,
    Configure,
}

impl fmt::Display for SubCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubCommand::List => "list",
            SubCommand::Add => "add",
            SubCommand::Remove => "remove",
            SubCommand::Configure => "configure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Listed(Vec<(String, BindingRecord)>),
    Added(BindingOutcome),
}

#[derive(Debug, Serialize)]
struct ServiceListing<'a> {
    context: &'a str,
    #[serde(rename = "type")]
    context_type: ContextType,
    namespace: &'static str,
    services: BTreeMap<&'a str, &'a BindingRecord>,
}

type Handler<'a, S, D, C> =
    fn(&ServicesCommand<'a, S, D>, &mut Context, &AddRequest, &mut C) -> Result<CommandOutcome>;

/// The `services` command: lists or attaches the services of one context.
pub struct ServicesCommand<'a, S: ContextStore, D: ContextDirectory> {
    registry: &'a ServiceRegistry,
    store: &'a S,
    directory: &'a D,
    format: OutputFormat,
}

impl<'a, S: ContextStore, D: ContextDirectory> ServicesCommand<'a, S, D> {
    pub fn new(registry: &'a ServiceRegistry, store: &'a S, directory: &'a D) -> Self {
        Self {
            registry,
            store,
            directory,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn handler<C: Console>(sub_command: SubCommand) -> Option<Handler<'a, S, D, C>> {
        let table: [(SubCommand, Handler<'a, S, D, C>); 2] = [
            (SubCommand::List, Self::execute_list),
            (SubCommand::Add, Self::execute_add),
        ];
        table
            .into_iter()
            .find(|(sub, _)| *sub == sub_command)
            .map(|(_, handler)| handler)
    }

    pub fn execute<C: Console>(
        &self,
        sub_command: SubCommand,
        context: &mut Context,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<CommandOutcome> {
        tracing::debug!(%sub_command, context = %context.name, "Dispatching services command");
        let handler = Self::handler::<C>(sub_command).ok_or_else(|| ProvisionError::Unsupported {
            sub_command: sub_command.to_string(),
        })?;
        handler(self, context, request, console)
    }

    fn execute_list<C: Console>(
        &self,
        context: &mut Context,
        _request: &AddRequest,
        console: &mut C,
    ) -> Result<CommandOutcome> {
        self.list(context, console)
    }

    fn execute_add<C: Console>(
        &self,
        context: &mut Context,
        request: &AddRequest,
        console: &mut C,
    ) -> Result<CommandOutcome> {
        BindingWorkflow::new(self.registry, self.store, self.directory)
            .run(context, request, console)
            .map(CommandOutcome::Added)
    }

    /// Prints the context's bindings. Never touches the context or the store.
    pub fn list<C: Console>(&self, context: &Context, console: &mut C) -> Result<CommandOutcome> {
        let bindings = context.bindings();

        match self.format {
            OutputFormat::Json => {
                let listing = ServiceListing {
                    context: &context.name,
                    context_type: context.context_type,
                    namespace: namespace_of(context.context_type),
                    services: bindings.iter().map(|(s, r)| (s.as_str(), r)).collect(),
                };
                console.line(&serde_json::to_string_pretty(&listing)?);
            }
            OutputFormat::Text => {
                console.comment("List Services");
                for line in render_bindings(context, &bindings) {
                    console.line(&line);
                }
            }
        }

        Ok(CommandOutcome::Listed(bindings))
    }
}

fn namespace_of(context_type: ContextType) -> &'static str {
    if context_type.is_provider() {
        "services"
    } else {
        "service_subscriptions"
    }
}

/// One line per binding, e.g. `http: apache (http_port=80)` or `http: server server1`.
pub fn render_bindings(context: &Context, bindings: &[(String, BindingRecord)]) -> Vec<String> {
    if bindings.is_empty() {
        let what = if context.context_type.is_provider() {
            "services"
        } else {
            "service subscriptions"
        };
        return vec![format!("No {} on {}.", what, context.name)];
    }

    bindings
        .iter()
        .map(|(service, record)| {
            let target = match record {
                BindingRecord::Provider(b) => b.service_type.clone(),
                BindingRecord::Subscriber(b) => format!("server {}", b.server),
            };
            let properties = record.properties();
            if properties.is_empty() {
                format!("{}: {}", service, target)
            } else {
                let pairs: Vec<String> = properties
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                format!("{}: {} ({})", service, target, pairs.join(", "))
            }
        })
        .collect()
}
