use crate::core::command::SubCommand;
use crate::core::schema::first_definitions;
use crate::domain::model::{InputDefinition, Properties};
use clap::{Arg, ArgAction, ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::collections::HashSet;
use std::ffi::OsString;

#[derive(Debug, Clone, Parser)]
#[command(name = "provision")]
#[command(about = "Manage hosting contexts and the services attached to them")]
pub struct CliConfig {
    #[arg(long, global = true, default_value = "provision.toml", help = "Path to the provision.toml configuration file")]
    pub config: String,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short = 'n', long = "no-interaction", global = true, help = "Do not ask any interactive question")]
    pub no_interaction: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Manage the services attached to servers.
    #[command(
        long_about = "Use this command to add new services to servers, or to add service subscriptions to platforms and sites."
    )]
    Services(ServicesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ServicesArgs {
    /// Context to work on.
    pub context_name: String,

    /// "list" (default), "add", "remove", or "configure".
    #[arg(value_enum, default_value_t = SubCommand::List)]
    pub sub_command: SubCommand,

    /// http, db, etc.
    pub service: Option<String>,

    /// The name of the server context to use for this service.
    pub server: Option<String>,

    /// The name of the service type to use.
    #[arg(long = "service_type")]
    pub service_type: Option<String>,

    #[arg(long, help = "Print the service list as JSON")]
    pub json: bool,
}

/// The clap command with one `--<key>` option per distinct service option key.
pub struct CommandDefinition {
    command: clap::Command,
    service_options: Vec<String>,
}

/// Parsed arguments plus the service option values given on the command line.
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub cli: CliConfig,
    pub service_options: Properties,
}

impl CommandDefinition {
    pub fn new(schema: &[InputDefinition]) -> Self {
        let root = CliConfig::command();
        let mut reserved: HashSet<String> = root
            .get_arguments()
            .map(|a| a.get_id().as_str().to_string())
            .collect();
        reserved.extend(["help".to_string(), "version".to_string()]);

        let mut service_options = Vec::new();
        let command = root.mut_subcommand("services", |services| {
            reserved.extend(services.get_arguments().map(|a| a.get_id().as_str().to_string()));

            let mut args = Vec::new();
            for input in first_definitions(schema) {
                if reserved.contains(&input.key) {
                    tracing::warn!(
                        "Service option {} collides with a built-in argument and is not exposed",
                        input.key
                    );
                    continue;
                }
                service_options.push(input.key.clone());
                args.push(
                    Arg::new(input.key.clone())
                        .long(input.key.clone())
                        .value_name("VALUE")
                        .help(input.description.clone())
                        .help_heading("Service options")
                        .action(ArgAction::Set),
                );
            }
            services.args(args)
        });

        Self {
            command,
            service_options,
        }
    }

    pub fn service_options(&self) -> &[String] {
        &self.service_options
    }

    pub fn parse(self) -> ParsedCommand {
        match self.try_parse_from(std::env::args_os()) {
            Ok(parsed) => parsed,
            Err(e) => e.exit(),
        }
    }

    pub fn try_parse_from<I, T>(self, args: I) -> Result<ParsedCommand, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command.try_get_matches_from(args)?;
        let cli = CliConfig::from_arg_matches(&matches)?;

        let service_options = match matches.subcommand_matches("services") {
            Some(services) => collect_service_options(services, &self.service_options),
            None => Properties::new(),
        };

        Ok(ParsedCommand {
            cli,
            service_options,
        })
    }
}

fn collect_service_options(matches: &ArgMatches, keys: &[String]) -> Properties {
    keys.iter()
        .filter_map(|key| match matches.try_get_one::<String>(key) {
            Ok(Some(value)) => Some((key.clone(), value.clone())),
            _ => None,
        })
        .collect()
}
