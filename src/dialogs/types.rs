//! Core dialog types
//!
//! Identifiers, presentation content, choice options and the rejection type
//! shared by the store, the facade and the renderer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for dialog requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate the next process-unique id.
    ///
    /// The counter guarantees uniqueness; the millisecond timestamp only makes
    /// ids easier to read in logs.
    pub fn generate() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        let counter = NEXT.fetch_add(1, Ordering::Relaxed);
        Self(format!(
            "modal.{}.{}",
            counter,
            chrono::Utc::now().timestamp_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Renderable content of a dialog title or body.
///
/// The orchestration layer never interprets it; presenters decide how text
/// and line blocks are drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Lines(Vec<String>),
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Text(text) => text.trim().is_empty(),
            Content::Lines(lines) => lines.iter().all(|line| line.trim().is_empty()),
        }
    }

    /// Lines to draw, one entry per visual paragraph
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Content::Text(text) => text.lines().collect(),
            Content::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::Text(String::new())
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Text(text)
    }
}

impl From<Vec<String>> for Content {
    fn from(lines: Vec<String>) -> Self {
        Content::Lines(lines)
    }
}

impl std::fmt::Display for Content {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Text(text) => write!(f, "{}", text),
            Content::Lines(lines) => write!(f, "{}", lines.join("\n")),
        }
    }
}

/// One entry of a single or multiple choice dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: Content,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

impl ChoiceOption {
    pub fn new(label: impl Into<Content>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Check the option list invariants: values are unique and every initial
/// selection names one of them.
pub(crate) fn validate_options<'a>(
    options: &[ChoiceOption],
    selected: impl IntoIterator<Item = &'a String>,
) -> Result<(), String> {
    let mut seen = HashSet::new();
    for option in options {
        if !seen.insert(option.value.as_str()) {
            return Err(format!("duplicate option value '{}'", option.value));
        }
    }

    for value in selected {
        if !seen.contains(value.as_str()) {
            return Err(format!("initial value '{}' is not one of the options", value));
        }
    }

    Ok(())
}

/// Width class of a custom modal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModalSize {
    Xs,
    Sm,
    #[default]
    Md,
    Lg,
}

impl ModalSize {
    /// Preferred width in terminal columns
    pub fn columns(self) -> u16 {
        match self {
            ModalSize::Xs => 36,
            ModalSize::Sm => 48,
            ModalSize::Md => 64,
            ModalSize::Lg => 90,
        }
    }
}

impl std::str::FromStr for ModalSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xs" => Ok(ModalSize::Xs),
            "sm" => Ok(ModalSize::Sm),
            "md" => Ok(ModalSize::Md),
            "lg" => Ok(ModalSize::Lg),
            other => Err(format!("unknown modal size '{}'", other)),
        }
    }
}

/// Gestures a presentation may report for closing a dialog without an
/// affirmative action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseGesture {
    /// Click or tap outside the dialog
    Backdrop,
    /// Escape key
    Escape,
    /// Explicit close control rendered by the dialog
    CloseButton,
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Why a dialog future was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog '{0}' was declined")]
    Declined(DialogId),

    #[error("Dialog '{0}' was dismissed")]
    Dismissed(DialogId),

    #[error("Dialog '{0}' was submitted without a value")]
    NoValue(DialogId),

    #[error("Invalid dialog request '{0}': {1}")]
    InvalidRequest(DialogId, String),

    #[error("Dialog '{0}' was dropped before it settled")]
    Abandoned(DialogId),
}

impl DialogError {
    pub fn dialog_id(&self) -> &DialogId {
        match self {
            DialogError::Declined(id)
            | DialogError::Dismissed(id)
            | DialogError::NoValue(id)
            | DialogError::InvalidRequest(id, _)
            | DialogError::Abandoned(id) => id,
        }
    }
}
