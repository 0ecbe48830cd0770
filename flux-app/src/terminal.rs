// Terminal prompts backed by dialoguer

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

use flux_plugin::{Prompter, TextPrompt};

pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

fn prompt_text(title: &str, description: &str) -> String {
    if description.is_empty() {
        title.to_string()
    } else {
        format!("{} {}", title, format!("({description})").dimmed())
    }
}

impl Prompter for DialoguerPrompter {
    fn section(&mut self, title: &str) {
        println!("\n{}", title.bright_cyan().bold());
    }

    fn input(&mut self, prompt: &TextPrompt<'_>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt_text(prompt.title, prompt.description))
            .allow_empty(!prompt.required);

        if let Some(default) = prompt.default {
            input = input.default(default.to_string());
        }
        if prompt.required {
            input = input.validate_with(|answer: &String| {
                if answer.trim().is_empty() {
                    Err("a value is required")
                } else {
                    Ok(())
                }
            });
        }

        Ok(input.interact_text()?.trim().to_string())
    }

    fn select(
        &mut self,
        title: &str,
        description: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize> {
        // Multi-line descriptions (the plugin menu) read better above the list.
        let prompt = if description.contains('\n') {
            println!("{description}");
            title.to_string()
        } else {
            prompt_text(title, description)
        };

        let index = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(default)
            .interact()?;
        Ok(index)
    }

    fn confirm(&mut self, title: &str, description: &str, default: bool) -> Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt_text(title, description))
            .default(default)
            .interact()?;
        Ok(answer)
    }
}
