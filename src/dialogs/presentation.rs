//! Interactive state of the dialog kinds that collect input.
//!
//! Forms hold what the user has entered so far and settle their dialog
//! through the view they were created from. They know nothing about the
//! terminal, so any presenter can drive them.

use super::renderer::{ChoiceView, ConfirmView, MultiChoiceView, PromptView};
use super::types::ChoiceOption;

/// Text entry of a prompt dialog
#[derive(Debug, Clone)]
pub struct PromptForm {
    view: PromptView,
    value: String,
}

impl PromptForm {
    pub fn new(view: PromptView) -> Self {
        let value = view.spec.value.clone();
        Self { view, value }
    }

    pub fn view(&self) -> &PromptView {
        &self.view
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_readonly(&self) -> bool {
        self.view.spec.readonly
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        if !self.is_readonly() {
            self.value = value.into();
        }
    }

    /// Type one character. Newlines are only accepted by long prompts.
    pub fn push_char(&mut self, c: char) {
        if self.is_readonly() || (c == '\n' && !self.view.spec.long_prompt) {
            return;
        }
        self.value.push(c);
    }

    pub fn backspace(&mut self) {
        if !self.is_readonly() {
            self.value.pop();
        }
    }

    /// Whether the save action is enabled
    pub fn can_submit(&self) -> bool {
        if self.is_readonly() || self.value.is_empty() {
            return false;
        }
        !(self.view.spec.required && self.value.trim().is_empty())
    }

    /// Save the entered value. Returns false and leaves the dialog pending
    /// when saving is disabled.
    pub fn submit(&self) -> bool {
        self.can_submit() && self.view.save(&self.value)
    }
}

fn is_selectable(options: &[ChoiceOption], value: &str) -> bool {
    options
        .iter()
        .any(|option| option.value == value && !option.disabled)
}

/// Radio selection of a single choice dialog
#[derive(Debug, Clone)]
pub struct SingleChoiceForm {
    view: ChoiceView,
    selected: Option<String>,
    cursor: usize,
}

impl SingleChoiceForm {
    pub fn new(view: ChoiceView) -> Self {
        let selected = view.spec.value.clone();
        let cursor = selected
            .as_ref()
            .and_then(|value| view.spec.options.iter().position(|o| &o.value == value))
            .unwrap_or(0);

        Self {
            view,
            selected,
            cursor,
        }
    }

    pub fn view(&self) -> &ChoiceView {
        &self.view
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.view.spec.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.options().len() {
            self.cursor += 1;
        }
    }

    /// Select `value`. Disabled and unknown values are ignored.
    pub fn select(&mut self, value: &str) -> bool {
        if !is_selectable(self.options(), value) {
            return false;
        }
        self.selected = Some(value.to_string());
        true
    }

    /// Select the option under the cursor
    pub fn select_current(&mut self) -> bool {
        match self.options().get(self.cursor) {
            Some(option) => {
                let value = option.value.clone();
                self.select(&value)
            }
            None => false,
        }
    }

    pub fn can_apply(&self) -> bool {
        self.selected.is_some()
    }

    /// Submit the selection. Does nothing while no option is selected.
    pub fn apply(&self) -> bool {
        self.can_apply() && self.view.select(self.selected.as_deref())
    }
}

/// Checkbox selection of a multiple choice dialog
#[derive(Debug, Clone)]
pub struct MultiChoiceForm {
    view: MultiChoiceView,
    checked: Vec<bool>,
    cursor: usize,
}

impl MultiChoiceForm {
    pub fn new(view: MultiChoiceView) -> Self {
        let checked = view
            .spec
            .options
            .iter()
            .map(|option| view.spec.value.contains(&option.value))
            .collect();

        Self {
            view,
            checked,
            cursor: 0,
        }
    }

    pub fn view(&self) -> &MultiChoiceView {
        &self.view
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.view.spec.options
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.checked.get(index).copied().unwrap_or(false)
    }

    /// Checked values in option order
    pub fn selected(&self) -> Vec<String> {
        self.options()
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(option, _)| option.value.clone())
            .collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.options().len() {
            self.cursor += 1;
        }
    }

    /// Flip membership of `value`. Disabled and unknown values are ignored.
    pub fn toggle(&mut self, value: &str) -> bool {
        let index = match self
            .options()
            .iter()
            .position(|option| option.value == value && !option.disabled)
        {
            Some(index) => index,
            None => return false,
        };

        self.checked[index] = !self.checked[index];
        true
    }

    pub fn toggle_current(&mut self) -> bool {
        match self.options().get(self.cursor) {
            Some(option) => {
                let value = option.value.clone();
                self.toggle(&value)
            }
            None => false,
        }
    }

    pub fn apply(&self) -> bool {
        self.view.apply(&self.selected())
    }
}

/// Yes/No focus of a confirmation dialog
#[derive(Debug, Clone)]
pub struct ConfirmForm {
    view: ConfirmView,
    yes_focused: bool,
}

impl ConfirmForm {
    pub fn new(view: ConfirmView) -> Self {
        Self {
            view,
            yes_focused: true,
        }
    }

    pub fn view(&self) -> &ConfirmView {
        &self.view
    }

    pub fn yes_focused(&self) -> bool {
        self.yes_focused
    }

    pub fn toggle(&mut self) {
        self.yes_focused = !self.yes_focused;
    }

    /// Answer with the focused button
    pub fn submit(&self) -> bool {
        if self.yes_focused {
            self.view.accept()
        } else {
            self.view.decline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::facade::{ChoiceProps, ConfirmProps, Dialogs, MultiChoiceProps, PromptProps};
    use crate::dialogs::renderer::{DialogRenderer, DialogView};
    use crate::dialogs::types::DialogError;
    use crate::dialogs::DialogStore;
    use futures::FutureExt;

    fn setup() -> (Dialogs, DialogRenderer) {
        let dialogs = Dialogs::new(DialogStore::new());
        let renderer = DialogRenderer::new(dialogs.clone());
        (dialogs, renderer)
    }

    fn options() -> Vec<ChoiceOption> {
        vec![
            ChoiceOption::new("Apple", "a"),
            ChoiceOption::new("Banana", "b"),
            ChoiceOption::new("Cherry", "c").disabled(true),
        ]
    }

    fn prompt_form(renderer: &DialogRenderer) -> PromptForm {
        match renderer.views().pop() {
            Some(DialogView::Prompt(view)) => PromptForm::new(view),
            other => panic!("expected prompt view, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_submit_trims() {
        let (dialogs, renderer) = setup();
        let pending = dialogs.prompt(PromptProps::new("Name?"));

        let mut form = prompt_form(&renderer);
        assert!(!form.can_submit());
        form.set_value("  x  ");
        assert!(form.submit());
        assert_eq!(pending.await, Ok("x".to_string()));
    }

    #[tokio::test]
    async fn test_required_prompt_stays_pending_when_blank() {
        let (dialogs, renderer) = setup();
        let mut pending = dialogs.prompt(PromptProps::new("Name?").required(true));

        let mut form = prompt_form(&renderer);
        form.push_char(' ');
        assert!(!form.can_submit());
        assert!(!form.submit());
        assert!((&mut pending).now_or_never().is_none());

        form.backspace();
        for c in "ok".chars() {
            form.push_char(c);
        }
        assert!(form.submit());
        assert_eq!(pending.await, Ok("ok".to_string()));
    }

    #[tokio::test]
    async fn test_prompt_initial_value_and_newlines() {
        let (dialogs, renderer) = setup();
        let _pending = dialogs.prompt(PromptProps::new("Notes").with_value("one"));

        let mut form = prompt_form(&renderer);
        assert_eq!(form.value(), "one");
        form.push_char('\n');
        assert_eq!(form.value(), "one");

        let _long = dialogs.prompt(PromptProps::new("Notes").long_prompt(true));
        let mut form = prompt_form(&renderer);
        form.push_char('a');
        form.push_char('\n');
        form.push_char('b');
        assert_eq!(form.value(), "a\nb");
    }

    #[test]
    fn test_readonly_prompt_ignores_edits() {
        let (dialogs, renderer) = setup();
        let _pending = dialogs.prompt(PromptProps::new("Key").with_value("abc").readonly(true));

        let mut form = prompt_form(&renderer);
        form.push_char('d');
        form.backspace();
        form.set_value("other");
        assert_eq!(form.value(), "abc");
        assert!(!form.can_submit());
        assert!(!form.submit());
    }

    #[tokio::test]
    async fn test_single_choice_round_trip() {
        let (dialogs, renderer) = setup();
        let pending =
            dialogs.choice_single(ChoiceProps::new("Fruit", "Pick one", options()).with_value("a"));

        let Some(DialogView::ChoiceSingle(view)) = renderer.views().pop() else {
            panic!("expected choice view");
        };
        let mut form = SingleChoiceForm::new(view);
        assert_eq!(form.selected(), Some("a"));
        assert_eq!(form.cursor(), 0);

        assert!(!form.select("c"));
        assert!(!form.select("missing"));
        form.move_down();
        assert!(form.select_current());
        assert_eq!(form.selected(), Some("b"));

        assert!(form.apply());
        assert_eq!(pending.await, Ok("b".to_string()));
    }

    #[tokio::test]
    async fn test_single_choice_without_selection_has_no_value() {
        let (dialogs, renderer) = setup();
        let pending = dialogs.choice_single(ChoiceProps::new("Fruit", "Pick one", options()));

        let Some(DialogView::ChoiceSingle(view)) = renderer.views().pop() else {
            panic!("expected choice view");
        };
        let mut form = SingleChoiceForm::new(view);
        form.move_down();
        form.move_down();
        form.move_down();
        assert_eq!(form.cursor(), 2);
        // Cursor rests on the disabled option
        assert!(!form.select_current());
        assert!(!form.can_apply());

        // Apply stays disabled; the dialog keeps waiting for a selection
        assert!(!form.apply());
        assert_eq!(dialogs.dialogs().len(), 1);
        let mut pending = pending;
        assert!((&mut pending).now_or_never().is_none());

        // Applying without a selection through the view still has no value
        assert!(form.view().select(None));
        assert!(matches!(pending.await, Err(DialogError::NoValue(_))));
    }

    #[tokio::test]
    async fn test_required_single_choice_needs_a_selection() {
        let (dialogs, renderer) = setup();
        let mut pending =
            dialogs.choice_single(ChoiceProps::new("Fruit", "Pick one", options()).required(true));

        let Some(DialogView::ChoiceSingle(view)) = renderer.views().pop() else {
            panic!("expected choice view");
        };
        let mut form = SingleChoiceForm::new(view);
        assert!(!form.apply());
        assert!(!dialogs.dialogs().is_empty());
        assert!((&mut pending).now_or_never().is_none());

        assert!(form.select("b"));
        assert!(form.apply());
        assert_eq!(pending.await, Ok("b".to_string()));
        assert!(dialogs.dialogs().is_empty());
    }

    #[tokio::test]
    async fn test_multi_choice_toggle() {
        let (dialogs, renderer) = setup();
        let pending = dialogs.choice_multiple(
            MultiChoiceProps::new("Fruit", "Pick any", options()).with_value(["b"]),
        );

        let Some(DialogView::ChoiceMultiple(view)) = renderer.views().pop() else {
            panic!("expected multiple choice view");
        };
        let mut form = MultiChoiceForm::new(view);
        assert!(form.is_checked(1));

        // Double toggle leaves the selection unchanged
        assert!(form.toggle("a"));
        assert!(form.toggle("a"));
        assert_eq!(form.selected(), vec!["b".to_string()]);

        assert!(!form.toggle("c"));
        assert!(form.toggle_current());
        assert_eq!(form.selected(), vec!["a".to_string(), "b".to_string()]);

        assert!(form.apply());
        assert_eq!(pending.await, Ok(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_confirm_form_answers_with_focus() {
        let (dialogs, renderer) = setup();
        let pending = dialogs.confirm(ConfirmProps::new("Continue?"));

        let Some(DialogView::Confirm(view)) = renderer.views().pop() else {
            panic!("expected confirm view");
        };
        let mut form = ConfirmForm::new(view);
        assert!(form.yes_focused());
        form.toggle();
        assert!(form.submit());
        assert!(matches!(pending.await, Err(DialogError::Declined(_))));
    }
}
