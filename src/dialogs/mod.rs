//! Promise-style dialog orchestration
//!
//! Callers open dialogs through [`Dialogs`] and await the returned
//! [`Pending`] future. Requests live in a shared [`DialogStore`] until a
//! presentation settles them through the [`DialogRenderer`].

pub mod facade;
pub mod handle;
pub mod presentation;
pub mod renderer;
pub mod request;
pub mod store;
pub mod types;

pub use facade::{
    AlertProps, ChoiceProps, ConfirmProps, Dialogs, ModalProps, MultiChoiceProps, PromptProps,
};
pub use handle::{DialogRef, Pending};
pub use presentation::{ConfirmForm, MultiChoiceForm, PromptForm, SingleChoiceForm};
pub use renderer::{
    AlertView, ChoiceView, ConfirmView, DialogPresenter, DialogRenderer, DialogView, ModalView,
    MultiChoiceView, PromptView, Responder, ViewFrame,
};
pub use request::{
    AlertSpec, ChoiceSpec, ConfirmSpec, DialogKind, DialogRequest, ModalSpec, MultiChoiceSpec,
    PromptSpec, Submission,
};
pub use store::{DialogStore, Subscription, WeakDialogStore};
pub use types::{
    ChoiceOption, CloseGesture, Content, DialogError, DialogId, DialogResult, ModalSize,
};
