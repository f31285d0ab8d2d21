//! Dialog facade
//!
//! [`Dialogs`] is the entry point callers use instead of touching the store:
//! one operation per dialog kind, each returning a [`Pending`] future that is
//! settled by the request's submission callback.

use super::handle::{DialogRef, Pending};
use super::request::{
    AlertSpec, ChoiceSpec, ConfirmSpec, DialogKind, DialogRequest, ModalSpec, MultiChoiceSpec,
    PromptSpec, Submission,
};
use super::store::DialogStore;
use super::types::{
    validate_options, ChoiceOption, Content, DialogError, DialogId, DialogResult, ModalSize,
};
use crate::config::DialogDefaults;
use std::sync::Arc;
use tracing::{debug, warn};

/// Input of [`Dialogs::alert`]
#[derive(Debug, Clone, Default)]
pub struct AlertProps {
    pub title: Option<Content>,
    pub message: Content,
    pub yes_label: Option<String>,
    pub dialog_ref: Option<DialogRef>,
}

impl AlertProps {
    pub fn new(message: impl Into<Content>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<Content>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_yes_label(mut self, label: impl Into<String>) -> Self {
        self.yes_label = Some(label.into());
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Input of [`Dialogs::confirm`]
#[derive(Debug, Clone, Default)]
pub struct ConfirmProps {
    pub title: Option<Content>,
    pub message: Content,
    pub yes_label: Option<String>,
    pub no_label: Option<String>,
    pub dialog_ref: Option<DialogRef>,
}

impl ConfirmProps {
    pub fn new(message: impl Into<Content>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<Content>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_yes_label(mut self, label: impl Into<String>) -> Self {
        self.yes_label = Some(label.into());
        self
    }

    pub fn with_no_label(mut self, label: impl Into<String>) -> Self {
        self.no_label = Some(label.into());
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Input of [`Dialogs::prompt`]
#[derive(Debug, Clone, Default)]
pub struct PromptProps {
    pub title: Option<Content>,
    pub message: Content,
    pub value: Option<String>,
    pub required: bool,
    pub long_prompt: bool,
    pub readonly: bool,
    pub save_label: Option<String>,
    pub dialog_ref: Option<DialogRef>,
}

impl PromptProps {
    pub fn new(message: impl Into<Content>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<Content>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn long_prompt(mut self, long_prompt: bool) -> Self {
        self.long_prompt = long_prompt;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_save_label(mut self, label: impl Into<String>) -> Self {
        self.save_label = Some(label.into());
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Input of [`Dialogs::choice_single`]
#[derive(Debug, Clone, Default)]
pub struct ChoiceProps {
    pub title: Content,
    pub message: Content,
    pub options: Vec<ChoiceOption>,
    pub value: Option<String>,
    pub required: bool,
    pub apply_label: Option<String>,
    pub dialog_ref: Option<DialogRef>,
}

impl ChoiceProps {
    pub fn new(
        title: impl Into<Content>,
        message: impl Into<Content>,
        options: Vec<ChoiceOption>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options,
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_apply_label(mut self, label: impl Into<String>) -> Self {
        self.apply_label = Some(label.into());
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Input of [`Dialogs::choice_multiple`]
#[derive(Debug, Clone, Default)]
pub struct MultiChoiceProps {
    pub title: Content,
    pub message: Content,
    pub options: Vec<ChoiceOption>,
    pub value: Vec<String>,
    pub required: bool,
    pub apply_label: Option<String>,
    pub dialog_ref: Option<DialogRef>,
}

impl MultiChoiceProps {
    pub fn new(
        title: impl Into<Content>,
        message: impl Into<Content>,
        options: Vec<ChoiceOption>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options,
            ..Default::default()
        }
    }

    pub fn with_value<I, S>(mut self, value: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = value.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_apply_label(mut self, label: impl Into<String>) -> Self {
        self.apply_label = Some(label.into());
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Input of [`Dialogs::modal`]
#[derive(Debug, Clone, Default)]
pub struct ModalProps {
    pub title: Content,
    pub message: Content,
    pub size: Option<ModalSize>,
    pub show_close_button: Option<bool>,
    pub disable_backdrop_click: bool,
    pub dialog_ref: Option<DialogRef>,
}

impl ModalProps {
    pub fn new(title: impl Into<Content>, message: impl Into<Content>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: ModalSize) -> Self {
        self.size = Some(size);
        self
    }

    pub fn show_close_button(mut self, show: bool) -> Self {
        self.show_close_button = Some(show);
        self
    }

    pub fn disable_backdrop_click(mut self, disable: bool) -> Self {
        self.disable_backdrop_click = disable;
        self
    }

    pub fn with_ref(mut self, dialog_ref: DialogRef) -> Self {
        self.dialog_ref = Some(dialog_ref);
        self
    }
}

/// Typed entry points for opening dialogs
#[derive(Clone, Debug)]
pub struct Dialogs {
    store: DialogStore,
    defaults: Arc<DialogDefaults>,
}

impl Dialogs {
    pub fn new(store: DialogStore) -> Self {
        Self::with_defaults(store, DialogDefaults::default())
    }

    pub fn with_defaults(store: DialogStore, defaults: DialogDefaults) -> Self {
        Self {
            store,
            defaults: Arc::new(defaults),
        }
    }

    /// Facade over the process-wide store
    pub fn global() -> Self {
        Self::new(DialogStore::global().clone())
    }

    pub fn store(&self) -> &DialogStore {
        &self.store
    }

    pub fn defaults(&self) -> &DialogDefaults {
        &self.defaults
    }

    /// All pending dialogs, bottom to top
    pub fn dialogs(&self) -> Vec<Arc<DialogRequest>> {
        self.store.snapshot()
    }

    /// The topmost pending dialog, if any
    pub fn dialog(&self) -> Option<Arc<DialogRequest>> {
        self.store.last()
    }

    /// Dismiss the dialog with `id`, or the topmost one when `id` is `None`.
    ///
    /// The removed dialog is settled as dismissed. Returns `false` when there
    /// was nothing to dismiss.
    pub fn dismiss(&self, id: Option<&DialogId>) -> bool {
        let removed = match id {
            Some(id) => self.store.remove_by_id(id),
            None => self.store.remove_by_tail(),
        };

        match removed {
            Some(request) => request.settle(Submission::Dismissed),
            None => {
                debug!("Nothing to dismiss for {:?}", id);
                false
            }
        }
    }

    /// Remove the dialog with `id` and settle it with `submission`.
    /// Returns `false` when the dialog is no longer pending.
    pub fn submit(&self, id: &DialogId, submission: Submission) -> bool {
        match self.store.remove_by_id(id) {
            Some(request) => request.settle(submission),
            None => {
                debug!("Dialog '{}' is no longer pending, ignoring {:?}", id, submission);
                false
            }
        }
    }

    /// Show a message. Never rejects: every way of closing it resolves.
    pub fn alert(&self, props: AlertProps) -> Pending<()> {
        let kind = DialogKind::Alert(AlertSpec {
            yes_label: props.yes_label.unwrap_or_else(|| self.defaults.ok_label.clone()),
        });
        let title = props
            .title
            .unwrap_or_else(|| self.defaults.alert_title.clone().into());

        self.open(title, props.message, kind, props.dialog_ref, |_, _| Ok(()))
    }

    /// Ask a yes/no question. Resolves on yes, rejects on no or dismissal.
    pub fn confirm(&self, props: ConfirmProps) -> Pending<()> {
        let kind = DialogKind::Confirm(ConfirmSpec {
            yes_label: props.yes_label.unwrap_or_else(|| self.defaults.yes_label.clone()),
            no_label: props.no_label.unwrap_or_else(|| self.defaults.no_label.clone()),
        });
        let title = props
            .title
            .unwrap_or_else(|| self.defaults.confirm_title.clone().into());

        self.open(title, props.message, kind, props.dialog_ref, |id, submission| {
            match submission {
                Submission::Acknowledged => Ok(()),
                other => Err(rejection(id, other)),
            }
        })
    }

    /// Ask for a line of text. Resolves with the trimmed value.
    pub fn prompt(&self, props: PromptProps) -> Pending<String> {
        let kind = DialogKind::Prompt(PromptSpec {
            value: props.value.unwrap_or_default(),
            required: props.required,
            long_prompt: props.long_prompt,
            readonly: props.readonly,
            save_label: props.save_label.unwrap_or_else(|| self.defaults.save_label.clone()),
        });
        let title = props
            .title
            .unwrap_or_else(|| self.defaults.prompt_title.clone().into());

        self.open(title, props.message, kind, props.dialog_ref, |id, submission| {
            match submission {
                Submission::Text(value) => {
                    let value = value.trim();
                    if value.is_empty() {
                        Err(DialogError::NoValue(id.clone()))
                    } else {
                        Ok(value.to_string())
                    }
                }
                other => Err(rejection(id, other)),
            }
        })
    }

    /// Ask for one of `options`. Resolves with the selected value.
    pub fn choice_single(&self, props: ChoiceProps) -> Pending<String> {
        let id = DialogId::generate();
        if props.options.is_empty() {
            return self.invalid(id, "a single choice needs at least one option".to_string());
        }
        if let Err(reason) = validate_options(&props.options, props.value.iter()) {
            return self.invalid(id, reason);
        }

        let kind = DialogKind::ChoiceSingle(ChoiceSpec {
            options: props.options,
            value: props.value,
            required: props.required,
            apply_label: props.apply_label.unwrap_or_else(|| self.defaults.apply_label.clone()),
        });

        self.open_with_id(id, props.title, props.message, kind, props.dialog_ref, |id, submission| {
            match submission {
                Submission::Selected(Some(value)) if !value.is_empty() => Ok(value),
                Submission::Selected(_) => Err(DialogError::NoValue(id.clone())),
                other => Err(rejection(id, other)),
            }
        })
    }

    /// Ask for any subset of `options`. Resolves with the applied selection,
    /// which may be empty.
    pub fn choice_multiple(&self, props: MultiChoiceProps) -> Pending<Vec<String>> {
        let id = DialogId::generate();
        if let Err(reason) = validate_options(&props.options, props.value.iter()) {
            return self.invalid(id, reason);
        }

        let kind = DialogKind::ChoiceMultiple(MultiChoiceSpec {
            options: props.options,
            value: props.value,
            required: props.required,
            apply_label: props.apply_label.unwrap_or_else(|| self.defaults.apply_label.clone()),
        });

        self.open_with_id(id, props.title, props.message, kind, props.dialog_ref, |id, submission| {
            match submission {
                Submission::SelectedMany(values) => Ok(values),
                other => Err(rejection(id, other)),
            }
        })
    }

    /// Show custom content. Never rejects: closing it is its only outcome.
    pub fn modal(&self, props: ModalProps) -> Pending<()> {
        let kind = DialogKind::Modal(ModalSpec {
            size: props.size.unwrap_or(self.defaults.modal_size),
            show_close_button: props
                .show_close_button
                .unwrap_or(self.defaults.modal_close_button),
            disable_backdrop_click: props.disable_backdrop_click,
        });

        self.open(props.title, props.message, kind, props.dialog_ref, |_, _| Ok(()))
    }

    fn open<T: Send + 'static>(
        &self,
        title: Content,
        message: Content,
        kind: DialogKind,
        dialog_ref: Option<DialogRef>,
        settle: impl FnOnce(&DialogId, Submission) -> DialogResult<T> + Send + 'static,
    ) -> Pending<T> {
        self.open_with_id(DialogId::generate(), title, message, kind, dialog_ref, settle)
    }

    fn open_with_id<T: Send + 'static>(
        &self,
        id: DialogId,
        title: Content,
        message: Content,
        kind: DialogKind,
        dialog_ref: Option<DialogRef>,
        settle: impl FnOnce(&DialogId, Submission) -> DialogResult<T> + Send + 'static,
    ) -> Pending<T> {
        let (pending, sender) = Pending::new(id.clone());

        let settled_id = id.clone();
        let request = DialogRequest::new(id.clone(), title, message, kind, move |submission| {
            // The caller may have stopped waiting; that is not an error
            let _ = sender.send(settle(&settled_id, submission));
        });

        if let Some(dialog_ref) = dialog_ref {
            // The ref must not keep the store alive after its owners are gone
            let store = self.store.downgrade();
            let target = id.clone();
            dialog_ref.bind(id, move || match store.upgrade() {
                Some(store) => {
                    Dialogs::new(store).dismiss(Some(&target));
                }
                None => debug!("Store of dialog '{}' is gone", target),
            });
        }

        self.store.append(Arc::new(request));
        pending
    }

    fn invalid<T>(&self, id: DialogId, reason: String) -> Pending<T> {
        warn!("Rejecting dialog '{}': {}", id, reason);
        Pending::rejected(DialogError::InvalidRequest(id, reason))
    }
}

impl Default for Dialogs {
    fn default() -> Self {
        Self::new(DialogStore::new())
    }
}

fn rejection(id: &DialogId, submission: Submission) -> DialogError {
    match submission {
        Submission::Declined => DialogError::Declined(id.clone()),
        _ => DialogError::Dismissed(id.clone()),
    }
}
