#![allow(dead_code)]

use provision_services::{
    BindingRecord, Choice, Console, Context, ContextDirectory, ContextStore, ContextType,
    MemoryContextStore, OptionDoc, ProviderBinding, ServiceDefinition, ServiceRegistry,
    ServiceTypeHandler, StoreError,
};
use std::collections::VecDeque;

/// Handler with a fixed option list per context type.
pub struct FixedOptions {
    server: Vec<(&'static str, &'static str)>,
    site: Vec<(&'static str, &'static str)>,
}

impl ServiceTypeHandler for FixedOptions {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        let options = match context_type {
            ContextType::Server => &self.server,
            ContextType::Platform => return Vec::new(),
            ContextType::Site => &self.site,
        };
        options
            .iter()
            .map(|(key, description)| OptionDoc::new(*key, *description))
            .collect()
    }
}

fn no_options() -> FixedOptions {
    FixedOptions {
        server: Vec::new(),
        site: Vec::new(),
    }
}

fn db_options() -> FixedOptions {
    FixedOptions {
        server: vec![("remote_host", "host name"), ("db_port", "port")],
        site: vec![("db_name", "database name")],
    }
}

/// http has no options, db has options, mail has no service types.
pub fn registry() -> ServiceRegistry {
    ServiceRegistry::new()
        .register(
            ServiceDefinition::new("http", "Web", no_options())
                .with_type("apache", "Apache", no_options())
                .with_type("nginx", "NGINX", no_options()),
        )
        .register(
            ServiceDefinition::new("db", "Database", db_options())
                .with_type("mysql", "MySQL", db_options()),
        )
        .register(ServiceDefinition::new("mail", "Mail", no_options()))
}

pub fn server_providing(name: &str, service: &str, service_type: &str) -> Context {
    let mut server = Context::new(name, ContextType::Server);
    server
        .bind(
            service,
            BindingRecord::Provider(ProviderBinding {
                service_type: service_type.to_string(),
                properties: Default::default(),
            }),
        )
        .unwrap();
    server
}

/// Console double: answers from a queue (empty once exhausted) and records everything.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
    pub choices: Vec<(String, Vec<String>)>,
    pub output: Vec<String>,
}

impl ScriptedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Console for ScriptedConsole {
    fn ask(&mut self, prompt: &str) -> provision_services::Result<String> {
        self.asked.push(prompt.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn choice(&mut self, prompt: &str, options: &[Choice]) -> provision_services::Result<String> {
        self.choices.push((
            prompt.to_string(),
            options.iter().map(|o| o.id.clone()).collect(),
        ));
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn comment(&mut self, text: &str) {
        self.output.push(format!("comment: {}", text));
    }

    fn info(&mut self, text: &str) {
        self.output.push(format!("info: {}", text));
    }

    fn success(&mut self, text: &str) {
        self.output.push(format!("success: {}", text));
    }

    fn line(&mut self, text: &str) {
        self.output.push(text.to_string());
    }
}

/// Reads from an in-memory store and refuses every save.
pub struct ReadOnlyStore {
    pub inner: MemoryContextStore,
}

impl ContextStore for ReadOnlyStore {
    fn load(&self, name: &str) -> Result<Context, StoreError> {
        self.inner.load(name)
    }

    fn save(&self, _context: &Context) -> Result<(), StoreError> {
        Err(StoreError::Unavailable {
            message: "read-only store".to_string(),
        })
    }
}

impl ContextDirectory for ReadOnlyStore {
    fn contexts_of_type(&self, context_type: ContextType) -> Result<Vec<Context>, StoreError> {
        self.inner.contexts_of_type(context_type)
    }
}
