//! Dialog renderer
//!
//! Projects the store's list into one [`DialogView`] per pending dialog and
//! wires each view's outcomes back into settlement. Every view is live at the
//! same time, so a dialog below the top of the stack can still be answered.

use super::facade::Dialogs;
use super::request::{
    AlertSpec, ChoiceSpec, ConfirmSpec, DialogKind, DialogRequest, ModalSpec, MultiChoiceSpec,
    PromptSpec, Submission,
};
use super::store::Subscription;
use super::types::{CloseGesture, Content, DialogId};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Settles one dialog on behalf of its presentation.
///
/// Both dismissal and submission remove the dialog from the store, so a view
/// that reported an outcome can never leave its dialog stuck.
#[derive(Clone, Debug)]
pub struct Responder {
    dialogs: Dialogs,
    request: Arc<DialogRequest>,
}

impl Responder {
    pub fn id(&self) -> &DialogId {
        self.request.id()
    }

    pub fn request(&self) -> &Arc<DialogRequest> {
        &self.request
    }

    /// Whether the dialog is still waiting for an answer
    pub fn is_pending(&self) -> bool {
        !self.request.is_settled()
    }

    /// Remove the dialog and settle it as dismissed
    pub fn dismiss(&self) -> bool {
        self.dialogs.dismiss(Some(self.request.id()))
    }

    /// Dismiss in response to a close gesture, unless the dialog suppresses it
    pub fn close(&self, gesture: CloseGesture) -> bool {
        if !self.request.accepts_close(gesture) {
            debug!("Dialog '{}' ignores {:?}", self.request.id(), gesture);
            return false;
        }
        self.dismiss()
    }

    fn submit(&self, submission: Submission) -> bool {
        self.dialogs.submit(self.request.id(), submission)
    }
}

/// Fields every presentation receives
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewFrame {
    pub id: DialogId,
    pub title: Content,
    pub message: Content,
    /// Always true while the dialog is presented
    pub open: bool,
}

impl ViewFrame {
    fn of(request: &DialogRequest) -> Self {
        Self {
            id: request.id().clone(),
            title: request.title().clone(),
            message: request.message().clone(),
            open: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlertView {
    pub frame: ViewFrame,
    pub spec: AlertSpec,
    pub responder: Responder,
}

impl AlertView {
    pub fn acknowledge(&self) -> bool {
        self.responder.submit(Submission::Acknowledged)
    }
}

#[derive(Clone, Debug)]
pub struct ConfirmView {
    pub frame: ViewFrame,
    pub spec: ConfirmSpec,
    pub responder: Responder,
}

impl ConfirmView {
    pub fn accept(&self) -> bool {
        self.responder.submit(Submission::Acknowledged)
    }

    pub fn decline(&self) -> bool {
        self.responder.submit(Submission::Declined)
    }
}

#[derive(Clone, Debug)]
pub struct PromptView {
    pub frame: ViewFrame,
    pub spec: PromptSpec,
    pub responder: Responder,
}

impl PromptView {
    /// Submit the entered value, trimmed.
    ///
    /// Readonly prompts cannot be saved and required prompts refuse a blank
    /// value; in both cases the dialog stays pending and `false` is returned.
    pub fn save(&self, value: &str) -> bool {
        if self.spec.readonly {
            debug!("Prompt '{}' is readonly", self.frame.id);
            return false;
        }

        let value = value.trim();
        if self.spec.required && value.is_empty() {
            debug!("Prompt '{}' requires a value", self.frame.id);
            return false;
        }

        self.responder.submit(Submission::Text(value.to_string()))
    }
}

#[derive(Clone, Debug)]
pub struct ChoiceView {
    pub frame: ViewFrame,
    pub spec: ChoiceSpec,
    pub responder: Responder,
}

impl ChoiceView {
    /// Submit a selection. Disabled or unknown values are refused.
    pub fn select(&self, selection: Option<&str>) -> bool {
        if let Some(value) = selection {
            let selectable = self
                .spec
                .options
                .iter()
                .any(|option| option.value == value && !option.disabled);
            if !selectable {
                debug!("Choice '{}' cannot select '{}'", self.frame.id, value);
                return false;
            }
        }

        self.responder
            .submit(Submission::Selected(selection.map(str::to_string)))
    }
}

#[derive(Clone, Debug)]
pub struct MultiChoiceView {
    pub frame: ViewFrame,
    pub spec: MultiChoiceSpec,
    pub responder: Responder,
}

impl MultiChoiceView {
    /// Apply a selection; values are reported in option order and unknown
    /// values are dropped.
    pub fn apply<S: AsRef<str>>(&self, selection: &[S]) -> bool {
        let values = self
            .spec
            .options
            .iter()
            .filter(|option| selection.iter().any(|value| value.as_ref() == option.value))
            .map(|option| option.value.clone())
            .collect();

        self.responder.submit(Submission::SelectedMany(values))
    }
}

#[derive(Clone, Debug)]
pub struct ModalView {
    pub frame: ViewFrame,
    pub spec: ModalSpec,
    pub responder: Responder,
}

impl ModalView {
    /// Close from the modal's own content; not subject to gesture suppression
    pub fn close(&self) -> bool {
        self.responder.submit(Submission::Acknowledged)
    }
}

/// One presented dialog, dispatched on its kind
#[derive(Clone, Debug)]
pub enum DialogView {
    Alert(AlertView),
    Confirm(ConfirmView),
    Prompt(PromptView),
    ChoiceSingle(ChoiceView),
    ChoiceMultiple(MultiChoiceView),
    Modal(ModalView),
}

impl DialogView {
    fn project(dialogs: &Dialogs, request: &Arc<DialogRequest>) -> Self {
        let frame = ViewFrame::of(request);
        let responder = Responder {
            dialogs: dialogs.clone(),
            request: request.clone(),
        };

        match request.kind() {
            DialogKind::Alert(spec) => DialogView::Alert(AlertView {
                frame,
                spec: spec.clone(),
                responder,
            }),
            DialogKind::Confirm(spec) => DialogView::Confirm(ConfirmView {
                frame,
                spec: spec.clone(),
                responder,
            }),
            DialogKind::Prompt(spec) => DialogView::Prompt(PromptView {
                frame,
                spec: spec.clone(),
                responder,
            }),
            DialogKind::ChoiceSingle(spec) => DialogView::ChoiceSingle(ChoiceView {
                frame,
                spec: spec.clone(),
                responder,
            }),
            DialogKind::ChoiceMultiple(spec) => DialogView::ChoiceMultiple(MultiChoiceView {
                frame,
                spec: spec.clone(),
                responder,
            }),
            DialogKind::Modal(spec) => DialogView::Modal(ModalView {
                frame,
                spec: spec.clone(),
                responder,
            }),
        }
    }

    pub fn frame(&self) -> &ViewFrame {
        match self {
            DialogView::Alert(view) => &view.frame,
            DialogView::Confirm(view) => &view.frame,
            DialogView::Prompt(view) => &view.frame,
            DialogView::ChoiceSingle(view) => &view.frame,
            DialogView::ChoiceMultiple(view) => &view.frame,
            DialogView::Modal(view) => &view.frame,
        }
    }

    pub fn responder(&self) -> &Responder {
        match self {
            DialogView::Alert(view) => &view.responder,
            DialogView::Confirm(view) => &view.responder,
            DialogView::Prompt(view) => &view.responder,
            DialogView::ChoiceSingle(view) => &view.responder,
            DialogView::ChoiceMultiple(view) => &view.responder,
            DialogView::Modal(view) => &view.responder,
        }
    }

    pub fn id(&self) -> &DialogId {
        &self.frame().id
    }

    /// Dismiss through the view's close path
    pub fn dismiss(&self) -> bool {
        self.responder().dismiss()
    }
}

/// Presentation side of the renderer
pub trait DialogPresenter {
    /// Present one dialog; `depth` is its position from the bottom of the stack
    fn present(&mut self, depth: usize, view: DialogView);
}

impl<F> DialogPresenter for F
where
    F: FnMut(usize, DialogView),
{
    fn present(&mut self, depth: usize, view: DialogView) {
        self(depth, view)
    }
}

/// Hands the pending dialogs to presenters as views and signals every store change.
///
/// Views are always read from the store itself. Notifications from different
/// threads may arrive out of order, so the list passed to observers only marks
/// that something changed.
pub struct DialogRenderer {
    dialogs: Dialogs,
    revision: watch::Receiver<u64>,
    subscription: Option<Subscription>,
}

impl DialogRenderer {
    pub fn new(dialogs: Dialogs) -> Self {
        let (sender, revision) = watch::channel(0u64);

        let subscription = dialogs.store().subscribe(move |_| {
            sender.send_modify(|revision| *revision += 1);
        });

        Self {
            dialogs,
            revision,
            subscription: Some(subscription),
        }
    }

    pub fn dialogs(&self) -> &Dialogs {
        &self.dialogs
    }

    /// Views of every pending dialog, bottom to top
    pub fn views(&self) -> Vec<DialogView> {
        self.dialogs
            .dialogs()
            .iter()
            .map(|request| DialogView::project(&self.dialogs, request))
            .collect()
    }

    /// Present every pending dialog in stack order. Presents nothing for an
    /// empty stack. Returns the number of dialogs presented.
    pub fn render<P: DialogPresenter + ?Sized>(&self, presenter: &mut P) -> usize {
        let views = self.views();
        let count = views.len();
        for (depth, view) in views.into_iter().enumerate() {
            presenter.present(depth, view);
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.store().is_empty()
    }

    /// Number of store changes seen so far
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Wait for the next store change
    pub async fn changed(&mut self) -> bool {
        self.revision.changed().await.is_ok()
    }
}

impl Drop for DialogRenderer {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
