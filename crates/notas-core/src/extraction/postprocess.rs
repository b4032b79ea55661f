//! Normalisation steps applied to captured text.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"[ \t]*\r?\n[ \t]*").unwrap();
}

/// One normalisation step. Steps run in order after the capture is trimmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "op", content = "arg")]
pub enum PostProcess {
    /// Keep only the first whitespace-delimited token.
    FirstToken,
    /// Remove any of these characters from the end.
    StripTrailing(String),
    /// Replace line breaks with single spaces.
    JoinLines,
    /// Keep the first capture group (or the whole match) of a pattern.
    Capture(Pattern),
}

impl PostProcess {
    /// Apply the step. `None` means nothing usable is left.
    pub fn apply(&self, text: &str) -> Option<String> {
        let out = match self {
            PostProcess::FirstToken => text.split_whitespace().next()?.to_string(),
            PostProcess::StripTrailing(chars) => text
                .trim_end_matches(|c: char| chars.contains(c))
                .trim_end()
                .to_string(),
            PostProcess::JoinLines => LINE_BREAK.replace_all(text, " ").into_owned(),
            PostProcess::Capture(pattern) => {
                let caps = pattern.regex.captures(text)?;
                caps.get(1).or_else(|| caps.get(0))?.as_str().trim().to_string()
            }
        };
        (!out.is_empty()).then_some(out)
    }
}

/// Run every step in order, stopping at the first empty result.
pub fn apply_all(steps: &[PostProcess], text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    steps
        .iter()
        .try_fold(trimmed.to_string(), |acc, step| step.apply(&acc))
}

/// A compiled regular expression that serialises as its source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, TemplateError> {
        let regex = Regex::new(source).map_err(|e| TemplateError::InvalidPattern {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl TryFrom<String> for Pattern {
    type Error = TemplateError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Pattern::new(&source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}
