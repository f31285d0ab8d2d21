use super::events::Event;
use super::form::Form;
use super::layout::DialogLayout;
use super::widgets;
use super::Frame;
use crate::config::TerminalSettings;
use crate::dialogs::{CloseGesture, DialogId, DialogRenderer};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, info};

/// Terminal presenter of the dialog stack.
///
/// Every pending dialog is drawn as a cascaded layer. Input goes to the
/// focused dialog, which is the newest one unless the user moves focus.
pub struct App {
    renderer: DialogRenderer,
    settings: TerminalSettings,
    /// Presented dialogs, bottom to top
    forms: Vec<(DialogId, Form)>,
    focus: Option<DialogId>,
    /// Areas drawn by the last render, bottom to top
    layouts: Vec<(DialogId, DialogLayout)>,
}

impl App {
    pub fn new(renderer: DialogRenderer, settings: TerminalSettings) -> Self {
        Self {
            renderer,
            settings,
            forms: Vec::new(),
            focus: None,
            layouts: Vec::new(),
        }
    }

    /// Id of the dialog receiving input
    pub fn focused(&mut self) -> Option<DialogId> {
        self.sync();
        self.focus.clone()
    }

    /// Whether no dialog is pending
    pub fn is_idle(&mut self) -> bool {
        self.sync();
        self.forms.is_empty()
    }

    /// Bring the presented forms in line with the store. Input state of
    /// dialogs that are still pending is kept.
    fn sync(&mut self) {
        let mut previous = std::mem::take(&mut self.forms);
        let mut appeared = None;

        for view in self.renderer.views() {
            let id = view.id().clone();
            match previous.iter().position(|(known, _)| *known == id) {
                Some(index) => self.forms.push(previous.swap_remove(index)),
                None => {
                    debug!("Presenting dialog '{}'", id);
                    appeared = Some(id.clone());
                    self.forms.push((id, Form::from(view)));
                }
            }
        }

        let focus_gone = self
            .focus
            .as_ref()
            .map_or(true, |focus| !self.forms.iter().any(|(id, _)| id == focus));

        if appeared.is_some() {
            self.focus = appeared;
        } else if focus_gone {
            self.focus = self.forms.last().map(|(id, _)| id.clone());
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        self.sync();
        self.layouts.clear();

        if self.forms.is_empty() {
            return;
        }

        let area = frame.size();
        if self.settings.dim_background {
            widgets::render_background(frame, area);
        }

        for (depth, (id, form)) in self.forms.iter().enumerate() {
            let layout = DialogLayout::for_request(
                form.responder().request(),
                area,
                depth,
                self.settings.stack_offset,
            );
            let focused = self.focus.as_ref() == Some(id);
            widgets::draw(frame, &layout, form, focused);
            self.layouts.push((id.clone(), layout));
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        self.sync();
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(..) | Event::Tick => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => self.dismiss_all(),
            KeyCode::BackTab => self.cycle_focus(),
            KeyCode::Esc => self.close_focused(CloseGesture::Escape),
            KeyCode::Char('w') if ctrl => self.close_focused(CloseGesture::CloseButton),
            _ => {
                if let Some(form) = self.focused_form_mut() {
                    form.handle_key(key);
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }

        let hit = self
            .layouts
            .iter()
            .rev()
            .find(|(_, layout)| layout.contains(mouse.column, mouse.row))
            .map(|(id, _)| id.clone());

        match hit {
            Some(id) => self.focus = Some(id),
            // The backdrop belongs to the topmost dialog
            None => {
                if let Some((_, form)) = self.forms.last() {
                    form.responder().close(CloseGesture::Backdrop);
                }
            }
        }
    }

    fn close_focused(&mut self, gesture: CloseGesture) {
        if let Some(form) = self.focused_form_mut() {
            form.responder().close(gesture);
        }
    }

    /// Move focus to the next dialog down the stack, wrapping to the top
    fn cycle_focus(&mut self) {
        if self.forms.is_empty() {
            return;
        }

        let current = self
            .focus
            .as_ref()
            .and_then(|focus| self.forms.iter().position(|(id, _)| id == focus))
            .unwrap_or(0);
        let next = if current == 0 {
            self.forms.len() - 1
        } else {
            current - 1
        };
        self.focus = Some(self.forms[next].0.clone());
    }

    fn dismiss_all(&mut self) {
        let dialogs = self.renderer.dialogs();
        let mut dismissed = 0;
        while dialogs.dismiss(None) {
            dismissed += 1;
        }
        info!("Interrupted, dismissed {} dialog(s)", dismissed);
    }

    fn focused_form_mut(&mut self) -> Option<&mut Form> {
        let focus = self.focus.as_ref()?;
        self.forms
            .iter_mut()
            .find(|(id, _)| id == focus)
            .map(|(_, form)| form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::{
        AlertProps, ChoiceOption, ChoiceProps, ConfirmProps, DialogError, Dialogs, DialogStore,
        ModalProps, PromptProps,
    };
    use futures::FutureExt;
    use ratatui::{backend::TestBackend, Terminal};

    fn setup() -> (Dialogs, App) {
        let dialogs = Dialogs::new(DialogStore::new());
        let app = App::new(DialogRenderer::new(dialogs.clone()), TerminalSettings::default());
        (dialogs, app)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_empty_stack_draws_nothing() {
        let (_dialogs, mut app) = setup();
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert!(screen(&terminal).trim().is_empty());
        assert!(app.is_idle());
    }

    #[test]
    fn test_stacked_dialogs_are_drawn() {
        let (dialogs, mut app) = setup();
        let _alert = dialogs.alert(AlertProps::new("Saved").with_title("Status"));
        let _confirm = dialogs.confirm(ConfirmProps::new("Delete it?").with_title("Remove"));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("Remove"));
        assert!(text.contains("Delete it?"));
        assert!(text.contains("[ Yes ]"));
        assert_eq!(app.focused(), dialogs.dialog().map(|d| d.id().clone()));
    }

    #[tokio::test]
    async fn test_enter_acknowledges_alert() {
        let (dialogs, mut app) = setup();
        let pending = dialogs.alert(AlertProps::new("Done"));

        app.handle_event(key(KeyCode::Enter));
        assert_eq!(pending.await, Ok(()));
        assert!(app.is_idle());
    }

    #[tokio::test]
    async fn test_prompt_typing_and_save() {
        let (dialogs, mut app) = setup();
        let pending = dialogs.prompt(PromptProps::new("Name?"));

        for c in " Ada ".chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(pending.await, Ok("Ada".to_string()));
    }

    #[tokio::test]
    async fn test_escape_respects_required() {
        let (dialogs, mut app) = setup();
        let mut required = dialogs.prompt(PromptProps::new("Name?").required(true));

        app.handle_event(key(KeyCode::Esc));
        assert!((&mut required).now_or_never().is_none());

        app.handle_event(ctrl('w'));
        assert!(matches!(required.await, Err(DialogError::Dismissed(_))));
    }

    #[tokio::test]
    async fn test_back_tab_answers_lower_dialog() {
        let (dialogs, mut app) = setup();
        let lower = dialogs.confirm(ConfirmProps::new("lower"));
        let mut upper = dialogs.confirm(ConfirmProps::new("upper"));

        app.handle_event(key(KeyCode::BackTab));
        assert_eq!(app.focused(), Some(lower.id().clone()));
        app.handle_event(key(KeyCode::Char('n')));

        assert!(matches!(lower.await, Err(DialogError::Declined(_))));
        assert!((&mut upper).now_or_never().is_none());
        assert_eq!(app.focused(), Some(upper.id().clone()));
    }

    #[tokio::test]
    async fn test_choice_keys() {
        let (dialogs, mut app) = setup();
        let options = vec![ChoiceOption::new("One", "1"), ChoiceOption::new("Two", "2")];
        let pending = dialogs.choice_single(ChoiceProps::new("Pick", "Which?", options));

        app.handle_event(key(KeyCode::Down));
        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(pending.await, Ok("2".to_string()));
    }

    #[tokio::test]
    async fn test_enter_without_selection_keeps_required_choice_open() {
        let (dialogs, mut app) = setup();
        let options = vec![ChoiceOption::new("One", "1"), ChoiceOption::new("Two", "2")];
        let mut pending =
            dialogs.choice_single(ChoiceProps::new("Pick", "Which?", options).required(true));

        app.handle_event(key(KeyCode::Enter));
        assert!((&mut pending).now_or_never().is_none());
        assert_eq!(dialogs.store().len(), 1);

        app.handle_event(key(KeyCode::Char(' ')));
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(pending.await, Ok("1".to_string()));
    }

    #[tokio::test]
    async fn test_backdrop_click_closes_top_modal() {
        let (dialogs, mut app) = setup();
        let pending = dialogs.modal(ModalProps::new("Info", "Body"));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.handle_event(click(0, 0));
        assert_eq!(pending.await, Ok(()));
    }

    #[tokio::test]
    async fn test_ctrl_c_dismisses_everything() {
        let (dialogs, mut app) = setup();
        let first = dialogs.alert(AlertProps::new("one"));
        let second = dialogs.confirm(ConfirmProps::new("two"));

        app.handle_event(ctrl('c'));
        assert_eq!(first.await, Ok(()));
        assert!(matches!(second.await, Err(DialogError::Dismissed(_))));
        assert!(dialogs.store().is_empty());
    }
}
