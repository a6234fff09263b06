#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, CommandDefinition, Commands, ParsedCommand, ServicesArgs};
pub use toml_config::ProvisionConfig;
