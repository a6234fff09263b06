use anyhow::Context as _;
use provision_services::config::{Commands, ParsedCommand};
use provision_services::utils::{logger, validation};
use provision_services::utils::validation::Validate;
use provision_services::{
    builtin_registry, AddRequest, CommandDefinition, CommandOutcome, ContextStore, FsContextStore,
    OptionSchemaAggregator, OutputFormat, ProvisionConfig, ServiceRegistry, ServicesCommand,
    TerminalConsole,
};

fn main() -> anyhow::Result<()> {
    let registry = builtin_registry();
    let schema = OptionSchemaAggregator::new(&registry).build_input_schema();
    let parsed = CommandDefinition::new(&schema).parse();

    let config = ProvisionConfig::load_or_default(&parsed.cli.config)
        .with_context(|| format!("failed to load configuration from {}", parsed.cli.config))?;
    config.validate().context("invalid configuration")?;

    if config.json_logging() {
        logger::init_json_logger(parsed.cli.verbose);
    } else {
        logger::init_cli_logger(parsed.cli.verbose);
    }
    tracing::debug!("Configuration: {:?}", config);

    if let Err(e) = run(parsed, &config, &registry) {
        tracing::error!(
            "Services command failed: {} (Category: {:?})",
            e,
            e.category()
        );
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

fn run(
    parsed: ParsedCommand,
    config: &ProvisionConfig,
    registry: &ServiceRegistry,
) -> provision_services::Result<()> {
    let ParsedCommand {
        cli,
        service_options,
    } = parsed;
    let Commands::Services(args) = cli.command;

    validation::validate_context_name("context_name", &args.context_name)?;

    let store = FsContextStore::new(config.contexts_path());
    let mut context = store.load(&args.context_name)?;
    tracing::debug!(
        "Loaded {} context {} from {}",
        context.context_type,
        context.name,
        store.base_path().display()
    );

    let mut console = TerminalConsole::new(config.console.interactive && !cli.no_interaction);
    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let request = AddRequest {
        service: args.service,
        server: args.server,
        service_type: args.service_type,
        options: service_options,
    };

    let command = ServicesCommand::new(registry, &store, &store).with_format(format);
    match command.execute(args.sub_command, &mut context, &request, &mut console)? {
        CommandOutcome::Listed(bindings) => {
            tracing::debug!("Listed {} bindings of {}", bindings.len(), context.name);
        }
        CommandOutcome::Added(outcome) => {
            tracing::info!(
                "Added {} to {} under {}",
                outcome.service,
                outcome.context,
                outcome.record.namespace()
            );
        }
    }

    Ok(())
}
