use crate::domain::model::{OptionDoc, Properties};
use crate::utils::error::Result;

/// Collects the value of every option a binding needs.
///
/// An explicit, non-empty input always wins. Otherwise the prompt is asked and its
/// answer is kept as-is, empty or not. Values are never defaulted or coerced.
#[derive(Debug, Default, Clone, Copy)]
pub struct PropertyResolver;

impl PropertyResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve<P>(
        &self,
        schema: &[OptionDoc],
        explicit: &Properties,
        mut prompt: P,
    ) -> Result<Properties>
    where
        P: FnMut(&str, &str) -> Result<String>,
    {
        let mut properties = Properties::new();

        for option in schema {
            if properties.contains_key(&option.key) {
                continue;
            }

            let value = match explicit.get(&option.key).filter(|v| !v.is_empty()) {
                Some(value) => {
                    tracing::info!("using option {}={}", option.key, value);
                    value.clone()
                }
                None => prompt(&option.key, &option.description)?,
            };
            properties.insert(option.key.clone(), value);
        }

        Ok(properties)
    }
}
