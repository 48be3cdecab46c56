//! Interactive prompts for CLI commands.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::error::Result;

/// Source of answers for interactive questions.
pub trait Prompter {
    /// Ask a question and return the answer. Empty answers are allowed.
    fn ask(&mut self, label: &str) -> Result<String>;

    /// Ask a question, mapping an empty answer to `None`.
    fn ask_optional(&mut self, label: &str) -> Result<Option<String>> {
        let answer = self.ask(label)?;
        let answer = answer.trim();
        Ok(if answer.is_empty() {
            None
        } else {
            Some(answer.to_string())
        })
    }
}

/// Prompts on the terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, label: &str) -> Result<String> {
        let answer: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::*;
    use crate::error::AppError;

    /// Answers questions from a fixed list, recording what was asked.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompter {
        answers: VecDeque<String>,
        pub asked: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn ask(&mut self, label: &str) -> Result<String> {
            self.asked.push(label.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| AppError::Prompt(format!("no scripted answer for '{}'", label)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedPrompter;
    use super::*;

    #[test]
    fn test_ask_optional_maps_empty_to_none() {
        let mut prompter = ScriptedPrompter::new(&["", "  ", " CALC-100 "]);
        assert_eq!(prompter.ask_optional("Test Plan Key").unwrap(), None);
        assert_eq!(prompter.ask_optional("Revision").unwrap(), None);
        assert_eq!(
            prompter.ask_optional("Fix Version").unwrap(),
            Some("CALC-100".to_string())
        );
        assert_eq!(prompter.asked, vec!["Test Plan Key", "Revision", "Fix Version"]);
    }

    #[test]
    fn test_scripted_prompter_runs_out() {
        let mut prompter = ScriptedPrompter::new(&[]);
        assert!(prompter.ask("Project Key").is_err());
    }
}
