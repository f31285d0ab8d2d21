//! Serializable dialog descriptions and their outcomes

use crate::dialogs::{
    AlertProps, ChoiceOption, ChoiceProps, ConfirmProps, Content, DialogResult, Dialogs,
    ModalProps, ModalSize, MultiChoiceProps, Pending, PromptProps,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::{Deserialize, Serialize};

/// One dialog to open, as given on the command line or in a stack file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DialogEntry {
    Alert {
        #[serde(default)]
        title: Option<Content>,
        message: Content,
        #[serde(default)]
        yes_label: Option<String>,
    },
    Confirm {
        #[serde(default)]
        title: Option<Content>,
        message: Content,
        #[serde(default)]
        yes_label: Option<String>,
        #[serde(default)]
        no_label: Option<String>,
    },
    Prompt {
        #[serde(default)]
        title: Option<Content>,
        message: Content,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        long_prompt: bool,
        #[serde(default)]
        readonly: bool,
        #[serde(default)]
        save_label: Option<String>,
    },
    ChoiceSingle {
        title: Content,
        message: Content,
        options: Vec<ChoiceOption>,
        #[serde(default)]
        value: Option<String>,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        apply_label: Option<String>,
    },
    ChoiceMultiple {
        title: Content,
        message: Content,
        options: Vec<ChoiceOption>,
        #[serde(default)]
        value: Vec<String>,
        #[serde(default)]
        required: bool,
        #[serde(default)]
        apply_label: Option<String>,
    },
    Modal {
        title: Content,
        message: Content,
        #[serde(default)]
        size: Option<ModalSize>,
        #[serde(default)]
        show_close_button: Option<bool>,
        #[serde(default)]
        disable_backdrop_click: bool,
    },
}

impl DialogEntry {
    /// Open the dialog and return a future of its reported outcome
    pub fn open(self, dialogs: &Dialogs) -> BoxFuture<'static, Outcome> {
        match self {
            DialogEntry::Alert {
                title,
                message,
                yes_label,
            } => {
                let mut props = AlertProps::new(message);
                props.title = title;
                props.yes_label = yes_label;
                Outcome::of("alert", dialogs.alert(props)).boxed()
            }

            DialogEntry::Confirm {
                title,
                message,
                yes_label,
                no_label,
            } => {
                let mut props = ConfirmProps::new(message);
                props.title = title;
                props.yes_label = yes_label;
                props.no_label = no_label;
                Outcome::of("confirm", dialogs.confirm(props)).boxed()
            }

            DialogEntry::Prompt {
                title,
                message,
                value,
                required,
                long_prompt,
                readonly,
                save_label,
            } => {
                let mut props = PromptProps::new(message)
                    .required(required)
                    .long_prompt(long_prompt)
                    .readonly(readonly);
                props.title = title;
                props.value = value;
                props.save_label = save_label;
                Outcome::of("prompt", dialogs.prompt(props)).boxed()
            }

            DialogEntry::ChoiceSingle {
                title,
                message,
                options,
                value,
                required,
                apply_label,
            } => {
                let mut props = ChoiceProps::new(title, message, options).required(required);
                props.value = value;
                props.apply_label = apply_label;
                Outcome::of("choice-single", dialogs.choice_single(props)).boxed()
            }

            DialogEntry::ChoiceMultiple {
                title,
                message,
                options,
                value,
                required,
                apply_label,
            } => {
                let mut props = MultiChoiceProps::new(title, message, options)
                    .with_value(value)
                    .required(required);
                props.apply_label = apply_label;
                Outcome::of("choice-multiple", dialogs.choice_multiple(props)).boxed()
            }

            DialogEntry::Modal {
                title,
                message,
                size,
                show_close_button,
                disable_backdrop_click,
            } => {
                let mut props =
                    ModalProps::new(title, message).disable_backdrop_click(disable_backdrop_click);
                props.size = size;
                props.show_close_button = show_close_button;
                Outcome::of("modal", dialogs.modal(props)).boxed()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Resolved,
    Rejected,
}

/// How one dialog settled, as printed on stdout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub id: String,
    pub kind: &'static str,
    pub status: Status,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    /// Await `pending` and describe its result
    pub async fn of<T: Serialize>(kind: &'static str, pending: Pending<T>) -> Self {
        let id = pending.id().to_string();
        Self::from_result(id, kind, pending.await)
    }

    pub fn from_result<T: Serialize>(id: String, kind: &'static str, result: DialogResult<T>) -> Self {
        match result {
            Ok(value) => Self {
                id,
                kind,
                status: Status::Resolved,
                value: serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
                error: None,
            },
            Err(e) => Self {
                id,
                kind,
                status: Status::Rejected,
                value: serde_json::Value::Null,
                error: Some(e.to_string()),
            },
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.status == Status::Resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{DialogError, DialogId, DialogStore};
    use serde_json::json;

    #[test]
    fn test_parse_stack_file() {
        let entries: Vec<DialogEntry> = serde_json::from_value(json!([
            {"kind": "alert", "message": "Saved"},
            {"kind": "choice-single", "title": "Pick", "message": "One",
             "options": [{"label": "A", "value": "a"}, {"label": "B", "value": "b", "disabled": true}],
             "value": "a"},
            {"kind": "modal", "title": "Info", "message": ["line one", "line two"], "size": "lg"}
        ]))
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], DialogEntry::Alert { title: None, .. }));
        match &entries[1] {
            DialogEntry::ChoiceSingle { options, value, .. } => {
                assert!(options[1].disabled);
                assert_eq!(value.as_deref(), Some("a"));
            }
            other => panic!("unexpected entry {:?}", other),
        }
        match &entries[2] {
            DialogEntry::Modal { message, size, .. } => {
                assert_eq!(message.lines(), vec!["line one", "line two"]);
                assert_eq!(*size, Some(ModalSize::Lg));
            }
            other => panic!("unexpected entry {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let parsed = serde_json::from_value::<DialogEntry>(json!({"kind": "toast", "message": "x"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_outcome_json() {
        let resolved = Outcome::from_result("modal.1.0".to_string(), "prompt", Ok("Ada".to_string()));
        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({"id": "modal.1.0", "kind": "prompt", "status": "resolved", "value": "Ada"})
        );

        let rejected = Outcome::from_result::<()>(
            "modal.2.0".to_string(),
            "confirm",
            Err(DialogError::Declined(DialogId::from("modal.2.0"))),
        );
        assert!(!rejected.is_resolved());
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({"id": "modal.2.0", "kind": "confirm", "status": "rejected",
                   "error": "Dialog 'modal.2.0' was declined"})
        );
    }

    #[tokio::test]
    async fn test_open_entry_reports_outcome() {
        let dialogs = Dialogs::new(DialogStore::new());
        let entry = DialogEntry::Confirm {
            title: None,
            message: "Go?".into(),
            yes_label: Some("Go".to_string()),
            no_label: None,
        };

        let outcome = entry.open(&dialogs);
        let request = dialogs.dialog().unwrap();
        assert_eq!(request.title(), &Content::from("Confirmation"));
        dialogs.dismiss(None);

        let outcome = outcome.await;
        assert_eq!(outcome.kind, "confirm");
        assert_eq!(outcome.id, request.id().to_string());
        assert_eq!(outcome.status, Status::Rejected);
    }
}
