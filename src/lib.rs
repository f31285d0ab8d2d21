//! Promise-style dialogs: open an alert, confirmation, prompt, choice or
//! custom modal and await how the user answered it.

pub mod cli;
pub mod config;
pub mod dialogs;
pub mod tui;

pub use dialogs::{
    AlertProps, ChoiceOption, ChoiceProps, ConfirmProps, Content, DialogError, DialogRef,
    DialogRenderer, DialogResult, Dialogs, DialogStore, ModalProps, ModalSize, MultiChoiceProps,
    Pending, PromptProps,
};
