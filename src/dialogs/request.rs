//! Dialog request records
//!
//! A [`DialogRequest`] is one pending unit of user interaction. Besides its
//! presentation fields it owns the settlement callback of the future returned
//! by the facade, so the record itself is the handle of the suspended caller.

use super::types::{ChoiceOption, CloseGesture, Content, DialogId, ModalSize};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Fields of an alert dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSpec {
    pub yes_label: String,
}

/// Fields of a confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmSpec {
    pub yes_label: String,
    pub no_label: String,
}

/// Fields of a text prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    /// Initial value of the text field
    pub value: String,
    pub required: bool,
    /// Multi-line input in a wider dialog
    pub long_prompt: bool,
    /// Value is shown but cannot be saved
    pub readonly: bool,
    pub save_label: String,
}

/// Fields of a single choice dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSpec {
    pub options: Vec<ChoiceOption>,
    pub value: Option<String>,
    pub required: bool,
    pub apply_label: String,
}

/// Fields of a multiple choice dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiChoiceSpec {
    pub options: Vec<ChoiceOption>,
    pub value: Vec<String>,
    pub required: bool,
    pub apply_label: String,
}

/// Fields of a custom modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSpec {
    pub size: ModalSize,
    pub show_close_button: bool,
    pub disable_backdrop_click: bool,
}

/// The closed set of dialog kinds, each carrying only its own fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogKind {
    Alert(AlertSpec),
    Confirm(ConfirmSpec),
    Prompt(PromptSpec),
    ChoiceSingle(ChoiceSpec),
    ChoiceMultiple(MultiChoiceSpec),
    Modal(ModalSpec),
}

impl DialogKind {
    pub fn name(&self) -> &'static str {
        match self {
            DialogKind::Alert(_) => "alert",
            DialogKind::Confirm(_) => "confirm",
            DialogKind::Prompt(_) => "prompt",
            DialogKind::ChoiceSingle(_) => "choice-single",
            DialogKind::ChoiceMultiple(_) => "choice-multiple",
            DialogKind::Modal(_) => "modal",
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            DialogKind::Prompt(spec) => spec.required,
            DialogKind::ChoiceSingle(spec) => spec.required,
            DialogKind::ChoiceMultiple(spec) => spec.required,
            DialogKind::Alert(_) | DialogKind::Confirm(_) | DialogKind::Modal(_) => false,
        }
    }
}

/// Payload handed to a request's settlement callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Affirmative action without data (OK, Yes, modal closed)
    Acknowledged,
    /// Explicit negative answer
    Declined,
    /// Closed without an answer, by a gesture or programmatically
    Dismissed,
    /// Prompt value as entered
    Text(String),
    /// Single choice selection, if any
    Selected(Option<String>),
    /// Multiple choice selections
    SelectedMany(Vec<String>),
}

type SubmitFn = Box<dyn FnOnce(Submission) + Send>;

/// One pending dialog in the stack
pub struct DialogRequest {
    id: DialogId,
    title: Content,
    message: Content,
    kind: DialogKind,
    on_submit: Mutex<Option<SubmitFn>>,
}

impl DialogRequest {
    pub fn new(
        id: DialogId,
        title: impl Into<Content>,
        message: impl Into<Content>,
        kind: DialogKind,
        on_submit: impl FnOnce(Submission) + Send + 'static,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            message: message.into(),
            kind,
            on_submit: Mutex::new(Some(Box::new(on_submit))),
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn title(&self) -> &Content {
        &self.title
    }

    pub fn message(&self) -> &Content {
        &self.message
    }

    pub fn kind(&self) -> &DialogKind {
        &self.kind
    }

    /// Whether the settlement callback has already fired
    pub fn is_settled(&self) -> bool {
        self.on_submit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }

    /// Fire the settlement callback. Returns `false` when it already fired.
    pub(crate) fn settle(&self, submission: Submission) -> bool {
        let callback = self
            .on_submit
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match callback {
            Some(callback) => {
                debug!("Settling {} dialog '{}' with {:?}", self.kind.name(), self.id, submission);
                callback(submission);
                true
            }
            None => {
                warn!("Dialog '{}' was already settled, ignoring {:?}", self.id, submission);
                false
            }
        }
    }

    /// Whether a close gesture may dismiss this dialog.
    ///
    /// Required prompts and choices only close through their explicit close
    /// control; modals honour `disable_backdrop_click` and only offer the close
    /// control when `show_close_button` is set.
    pub fn accepts_close(&self, gesture: CloseGesture) -> bool {
        match (&self.kind, gesture) {
            (DialogKind::Modal(spec), CloseGesture::CloseButton) => spec.show_close_button,
            (DialogKind::Modal(spec), _) => !spec.disable_backdrop_click,
            (_, CloseGesture::CloseButton) => true,
            (kind, _) => !kind.is_required(),
        }
    }
}

impl std::fmt::Debug for DialogRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRequest")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("settled", &self.is_settled())
            .finish()
    }
}
