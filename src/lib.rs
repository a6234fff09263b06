pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use adapters::console::TerminalConsole;
pub use adapters::{fs::FsContextStore, memory::MemoryContextStore};
pub use app::services::builtin_registry;
#[cfg(feature = "cli")]
pub use config::{CliConfig, CommandDefinition};
pub use config::ProvisionConfig;

pub use crate::core::binding::{AddRequest, BindingOutcome, BindingWorkflow};
pub use crate::core::capability::ContextCapabilityResolver;
pub use crate::core::command::{CommandOutcome, OutputFormat, ServicesCommand, SubCommand};
pub use crate::core::properties::PropertyResolver;
pub use crate::core::registry::{ServiceDefinition, ServiceRegistry};
pub use crate::core::schema::OptionSchemaAggregator;
pub use domain::model::{
    BindingRecord, Choice, Context, ContextType, InputDefinition, OptionDoc, Properties,
    ProviderBinding, SubscriberBinding,
};
pub use domain::ports::{Console, ContextDirectory, ContextStore, ServiceTypeHandler};
pub use utils::error::{ProvisionError, Result, StoreError};
