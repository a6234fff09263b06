use crate::domain::model::Choice;
use crate::domain::ports::Console;
use crate::utils::error::{ProvisionError, Result};
use dialoguer::console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};

/// Terminal prompts via dialoguer. When not interactive every question is answered
/// with an empty string and callers decide whether that is acceptable.
pub struct TerminalConsole {
    interactive: bool,
    theme: ColorfulTheme,
}

impl TerminalConsole {
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }
}

fn prompt_error(prompt: &str, e: dialoguer::Error) -> ProvisionError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
            ProvisionError::Interrupted {
                prompt: prompt.to_string(),
            }
        }
        other => ProvisionError::Prompt {
            message: other.to_string(),
        },
    }
}

impl Console for TerminalConsole {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        if !self.interactive {
            tracing::debug!("Not interactive, answering '{}' with an empty value", prompt);
            return Ok(String::new());
        }
        Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| prompt_error(prompt, e))
    }

    fn choice(&mut self, prompt: &str, options: &[Choice]) -> Result<String> {
        if !self.interactive || options.is_empty() {
            return Ok(String::new());
        }

        let items: Vec<String> = options
            .iter()
            .map(|o| {
                if o.id == o.label {
                    o.id.clone()
                } else {
                    format!("{} ({})", o.id, o.label)
                }
            })
            .collect();
        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact()
            .map_err(|e| prompt_error(prompt, e))?;
        Ok(options[index].id.clone())
    }

    fn comment(&mut self, text: &str) {
        println!("{}", style(format!("// {}", text)).dim());
    }

    fn info(&mut self, text: &str) {
        println!("{}", style(text).cyan());
    }

    fn success(&mut self, text: &str) {
        println!("{}", style(format!("[OK] {}", text)).green().bold());
    }

    fn line(&mut self, text: &str) {
        println!("{}", text);
    }
}
