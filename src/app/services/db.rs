use super::docs;
use crate::domain::model::{ContextType, OptionDoc};
use crate::domain::ports::ServiceTypeHandler;

pub struct DbService;

impl ServiceTypeHandler for DbService {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        match context_type {
            ContextType::Server => docs(&[
                (
                    "master_db",
                    "Master database connection info, {type}://{user}:{password}@{host}",
                ),
                (
                    "restart_command",
                    "command used to restart the database server",
                ),
            ]),
            ContextType::Platform => Vec::new(),
            ContextType::Site => docs(&[("db_name", "database name; generated when empty")]),
        }
    }
}

pub struct MysqlService;

impl ServiceTypeHandler for MysqlService {
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc> {
        DbService.option_documentation(context_type)
    }
}
