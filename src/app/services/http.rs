use super::docs;
use crate::domain::model::{ContextType, OptionDoc};
use crate::domain::ports::ServiceTypeHandler;

/// Options shared by every web server implementation.
pub struct HttpService;

impl ServiceTypeHandler for HttpService {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        match context_type {
            ContextType::Server => docs(&[
                ("http_port", "The port which the web service is running on."),
                (
                    "web_group",
                    "OS group for permissions; working default will be attempted",
                ),
                (
                    "restart_command",
                    "command used to reload the web server configuration",
                ),
            ]),
            ContextType::Platform => Vec::new(),
            ContextType::Site => docs(&[(
                "site_aliases",
                "comma-separated list of additional domain names for the site",
            )]),
        }
    }
}

pub struct ApacheService;

impl ServiceTypeHandler for ApacheService {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        HttpService.option_documentation(context_type)
    }
}

pub struct NginxService;

impl ServiceTypeHandler for NginxService {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        HttpService.option_documentation(context_type)
    }
}
