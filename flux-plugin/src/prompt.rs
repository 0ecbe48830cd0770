//! Prompt abstraction used by plugin configuration forms.
//!
//! The terminal implementation lives in the binary; [`ScriptedPrompter`]
//! replays canned answers for non-interactive use.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::VecDeque;

/// A free-text question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPrompt<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub default: Option<&'a str>,
    pub required: bool,
}

impl<'a> TextPrompt<'a> {
    pub fn new(title: &'a str, description: &'a str) -> Self {
        Self {
            title,
            description,
            default: None,
            required: false,
        }
    }

    pub fn default_value(mut self, default: &'a str) -> Self {
        self.default = Some(default);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Source of user answers.
pub trait Prompter {
    /// Announce a group of related questions.
    fn section(&mut self, title: &str);

    /// Ask for text. Implementations re-ask while a required answer is empty.
    fn input(&mut self, prompt: &TextPrompt<'_>) -> Result<String>;

    /// Ask to pick one of `items`; returns the chosen index.
    fn select(
        &mut self,
        title: &str,
        description: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize>;

    fn confirm(&mut self, title: &str, description: &str, default: bool) -> Result<bool>;
}

/// Ask for one of `options` given as `(label, value)` pairs and return the
/// chosen value. The selection starts on the option whose value is `default`.
pub fn select_value(
    prompter: &mut dyn Prompter,
    title: &str,
    description: &str,
    options: &[(&str, &str)],
    default: &str,
) -> Result<String> {
    let labels: Vec<String> = options.iter().map(|(label, _)| label.to_string()).collect();
    let default_index = options
        .iter()
        .position(|(_, value)| *value == default)
        .unwrap_or(0);

    let index = prompter.select(title, description, &labels, default_index)?;
    options
        .get(index)
        .map(|(_, value)| value.to_string())
        .with_context(|| format!("invalid selection {index} for '{title}'"))
}

/// One canned answer for a [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// Take the prompt's default (text, selection, or confirmation).
    Default,
    Select(usize),
    Confirm(bool),
}

impl Answer {
    pub fn text(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

/// Replays a fixed sequence of answers and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    pub asked: Vec<String>,
    pub sections: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Answers not yet consumed.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, title: &str) -> Result<Answer> {
        self.asked.push(title.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted answer left for '{}'", title))
    }
}

impl Prompter for ScriptedPrompter {
    fn section(&mut self, title: &str) {
        self.sections.push(title.to_string());
    }

    fn input(&mut self, prompt: &TextPrompt<'_>) -> Result<String> {
        let answer = match self.next(prompt.title)? {
            Answer::Text(text) => text,
            Answer::Default => prompt.default.unwrap_or_default().to_string(),
            other => bail!("expected a text answer for '{}', got {:?}", prompt.title, other),
        };
        if prompt.required && answer.trim().is_empty() {
            bail!("'{}' is required", prompt.title);
        }
        Ok(answer)
    }

    fn select(
        &mut self,
        title: &str,
        _description: &str,
        items: &[String],
        default: usize,
    ) -> Result<usize> {
        let index = match self.next(title)? {
            Answer::Select(index) => index,
            Answer::Default => default,
            other => bail!("expected a selection for '{}', got {:?}", title, other),
        };
        if index >= items.len() {
            bail!(
                "selection {} is out of range for '{}' ({} items)",
                index,
                title,
                items.len()
            );
        }
        Ok(index)
    }

    fn confirm(&mut self, title: &str, _description: &str, default: bool) -> Result<bool> {
        match self.next(title)? {
            Answer::Confirm(value) => Ok(value),
            Answer::Default => Ok(default),
            other => bail!("expected a confirmation for '{}', got {:?}", title, other),
        }
    }
}
