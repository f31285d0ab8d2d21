//! Key handling of one presented dialog

use crate::dialogs::{
    AlertView, ConfirmForm, DialogView, ModalView, MultiChoiceForm, PromptForm, Responder,
    SingleChoiceForm,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A presented dialog together with its input state
#[derive(Debug, Clone)]
pub enum Form {
    Alert(AlertView),
    Confirm(ConfirmForm),
    Prompt(PromptForm),
    SingleChoice(SingleChoiceForm),
    MultiChoice(MultiChoiceForm),
    Modal(ModalView),
}

impl From<DialogView> for Form {
    fn from(view: DialogView) -> Self {
        match view {
            DialogView::Alert(view) => Form::Alert(view),
            DialogView::Confirm(view) => Form::Confirm(ConfirmForm::new(view)),
            DialogView::Prompt(view) => Form::Prompt(PromptForm::new(view)),
            DialogView::ChoiceSingle(view) => Form::SingleChoice(SingleChoiceForm::new(view)),
            DialogView::ChoiceMultiple(view) => Form::MultiChoice(MultiChoiceForm::new(view)),
            DialogView::Modal(view) => Form::Modal(view),
        }
    }
}

impl Form {
    pub fn responder(&self) -> &Responder {
        match self {
            Form::Alert(view) => &view.responder,
            Form::Confirm(form) => &form.view().responder,
            Form::Prompt(form) => &form.view().responder,
            Form::SingleChoice(form) => &form.view().responder,
            Form::MultiChoice(form) => &form.view().responder,
            Form::Modal(view) => &view.responder,
        }
    }

    /// Handle a key that is not a close gesture
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match self {
            Form::Alert(view) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    view.acknowledge();
                }
            }

            Form::Confirm(form) => match key.code {
                KeyCode::Left | KeyCode::Right | KeyCode::Tab => form.toggle(),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    form.submit();
                }
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    form.view().accept();
                }
                KeyCode::Char('n') | KeyCode::Char('N') => {
                    form.view().decline();
                }
                _ => {}
            },

            Form::Prompt(form) => match key.code {
                KeyCode::Char('s') if ctrl => {
                    form.submit();
                }
                // Long prompts take Enter as a line break and save with Ctrl+S
                KeyCode::Enter if form.view().spec.long_prompt => form.push_char('\n'),
                KeyCode::Enter => {
                    form.submit();
                }
                KeyCode::Backspace => form.backspace(),
                KeyCode::Char(c) if !ctrl => form.push_char(c),
                _ => {}
            },

            Form::SingleChoice(form) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => form.move_up(),
                KeyCode::Down | KeyCode::Char('j') => form.move_down(),
                KeyCode::Char(' ') => {
                    form.select_current();
                }
                KeyCode::Enter => {
                    form.apply();
                }
                _ => {}
            },

            Form::MultiChoice(form) => match key.code {
                KeyCode::Up | KeyCode::Char('k') => form.move_up(),
                KeyCode::Down | KeyCode::Char('j') => form.move_down(),
                KeyCode::Char(' ') => {
                    form.toggle_current();
                }
                KeyCode::Enter => {
                    form.apply();
                }
                _ => {}
            },

            // Custom content only closes through gestures
            Form::Modal(_) => {}
        }
    }
}
