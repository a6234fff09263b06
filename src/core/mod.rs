pub mod binding;
pub mod capability;
pub mod command;
pub mod properties;
pub mod registry;
pub mod schema;

pub use crate::domain::model::{BindingRecord, Context, ContextType, InputDefinition, OptionDoc};
pub use crate::domain::ports::{Console, ContextDirectory, ContextStore, ServiceTypeHandler};
pub use crate::utils::error::Result;
