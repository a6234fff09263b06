use thiserror::Error;

/// Failures raised by a `ContextStore` or `ContextDirectory` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse context file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize context {name}: {source}")]
    Serialize {
        name: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Context {name} not found")]
    NotFound { name: String },

    #[error("Context file {path} declares name {declared}, expected {expected}")]
    NameMismatch {
        path: String,
        declared: String,
        expected: String,
    },

    #[error("Store unavailable: {message}")]
    Unavailable { message: String },
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Unknown service {service}. Registered services are: {}", .available.join(", "))]
    UnknownService {
        service: String,
        available: Vec<String>,
    },

    #[error("Service {service} has no service type {service_type}. Valid options are: {}", .available.join(", "))]
    UnknownServiceType {
        service: String,
        service_type: String,
        available: Vec<String>,
    },

    #[error("Argument '{field}' must not be empty.")]
    EmptySelection { field: String },

    #[error("There was no implementation found for service {service}. Register at least one service type for it.")]
    NoImplementation { service: String },

    #[error("Option --service_type must be specified for service {service}.")]
    MissingServiceType { service: String },

    #[error("Service type {service_type} is invalid for service {service}. Valid options are: {}", .valid.join(", "))]
    InvalidServiceType {
        service: String,
        service_type: String,
        valid: Vec<String>,
    },

    #[error("No servers providing {service} service were found. Add the service to an existing server with `provision services <server> add {service}`.")]
    NoProviders { service: String },

    #[error("Server {server} does not provide {service} service. Servers providing it: {}", .providers.join(", "))]
    UnknownProvider {
        service: String,
        server: String,
        providers: Vec<String>,
    },

    #[error("Context {context} is a {context_type} context; {operation} is not allowed")]
    ContextTypeMismatch {
        context: String,
        context_type: String,
        operation: String,
    },

    #[error("Sub-command {sub_command} is not implemented")]
    Unsupported { sub_command: String },

    #[error("Something went wrong when saving context {context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: StoreError,
    },

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    #[error("Interrupted while waiting for {prompt}")]
    Interrupted { prompt: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing input from the caller.
    Input,
    /// The service registry cannot satisfy the request.
    Registry,
    /// No context can be used for the request.
    Topology,
    /// Loading or saving contexts failed.
    Storage,
    /// The interactive surface failed.
    Interaction,
    Configuration,
}

impl ProvisionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProvisionError::EmptySelection { .. }
            | ProvisionError::MissingServiceType { .. }
            | ProvisionError::InvalidServiceType { .. }
            | ProvisionError::UnknownService { .. }
            | ProvisionError::UnknownServiceType { .. }
            | ProvisionError::Validation { .. } => ErrorCategory::Input,
            ProvisionError::NoImplementation { .. } | ProvisionError::Unsupported { .. } => {
                ErrorCategory::Registry
            }
            ProvisionError::NoProviders { .. }
            | ProvisionError::UnknownProvider { .. }
            | ProvisionError::ContextTypeMismatch { .. } => ErrorCategory::Topology,
            ProvisionError::Persistence { .. }
            | ProvisionError::Store(_)
            | ProvisionError::Serialization(_) => ErrorCategory::Storage,
            ProvisionError::Prompt { .. } | ProvisionError::Interrupted { .. } => {
                ErrorCategory::Interaction
            }
            ProvisionError::Config { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ProvisionError::EmptySelection { field } => {
                format!("Pass '{}' as an argument or run without --no-interaction", field)
            }
            ProvisionError::MissingServiceType { .. } => {
                "Pass --service_type or run without --no-interaction".to_string()
            }
            ProvisionError::InvalidServiceType { valid, .. }
            | ProvisionError::UnknownServiceType {
                available: valid, ..
            } => format!("Use one of: {}", valid.join(", ")),
            ProvisionError::UnknownService { available, .. } => {
                format!("Use one of: {}", available.join(", "))
            }
            ProvisionError::NoImplementation { .. } => {
                "Register a service type for this service before adding it to a server".to_string()
            }
            ProvisionError::NoProviders { service } => format!(
                "Add the {} service to a server first, then subscribe to it",
                service
            ),
            ProvisionError::UnknownProvider { providers, .. } => {
                format!("Choose one of: {}", providers.join(", "))
            }
            ProvisionError::ContextTypeMismatch { .. } => {
                "Check the context type; servers provide services, platforms and sites subscribe"
                    .to_string()
            }
            ProvisionError::Unsupported { .. } => "Use 'list' or 'add'".to_string(),
            ProvisionError::Serialization(_) => "Retry without --json".to_string(),
            ProvisionError::Persistence { .. } | ProvisionError::Store(_) => {
                "Check that the contexts directory exists and is writable".to_string()
            }
            ProvisionError::Prompt { .. } => {
                "Run in a terminal, or pass every value as an argument with --no-interaction"
                    .to_string()
            }
            ProvisionError::Interrupted { .. } => {
                "Run the command again, or pass every value as an argument".to_string()
            }
            ProvisionError::Config { .. } => "Check the provision.toml file".to_string(),
            ProvisionError::Validation { field, .. } => format!("Fix the value of {}", field),
        }
    }

    /// Process exit code for this failure. Only an interrupted prompt exits with 130.
    pub fn exit_code(&self) -> i32 {
        if matches!(self, ProvisionError::Interrupted { .. }) {
            return 130;
        }
        match self.category() {
            ErrorCategory::Input => 2,
            ErrorCategory::Registry | ErrorCategory::Topology | ErrorCategory::Interaction => 1,
            ErrorCategory::Storage | ErrorCategory::Configuration => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
