use crate::domain::model::{Choice, Context, ContextType, OptionDoc};
use crate::utils::error::{Result, StoreError};

/// A pluggable implementation of a service (or the service's base definition).
pub trait ServiceTypeHandler: Send + Sync {
    /// Options this implementation needs on a context of `context_type`, in prompt order.
    /// Empty when it declares none.
    fn option_documentation(&self, context_type: ContextType) -> Vec<OptionDoc>;
}

pub trait ContextStore {
    fn load(&self, name: &str) -> std::result::Result<Context, StoreError>;
    fn save(&self, context: &Context) -> std::result::Result<(), StoreError>;
}

/// Known contexts, queryable by type.
pub trait ContextDirectory {
    fn contexts_of_type(
        &self,
        context_type: ContextType,
    ) -> std::result::Result<Vec<Context>, StoreError>;
}

/// The interactive surface commands talk to.
pub trait Console {
    /// Returns the typed answer unchanged; empty when there is nobody to ask.
    fn ask(&mut self, prompt: &str) -> Result<String>;
    /// Returns the selected `Choice::id`; empty when there is nobody to ask.
    fn choice(&mut self, prompt: &str, options: &[Choice]) -> Result<String>;
    fn comment(&mut self, text: &str);
    fn info(&mut self, text: &str);
    fn success(&mut self, text: &str);
    /// Plain output, used for listings.
    fn line(&mut self, text: &str);
}
