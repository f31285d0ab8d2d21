//! Caller-side handles: the future returned by every facade operation and the
//! optional [`DialogRef`] capability for closing a dialog from its own content.

use super::types::{DialogError, DialogId, DialogResult};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::oneshot;
use tracing::debug;

/// Future of a dialog's outcome.
///
/// Resolves once the dialog is settled by the user or programmatically. If the
/// request is dropped without settling, it resolves to
/// [`DialogError::Abandoned`].
#[must_use = "a dialog's outcome is only observed by awaiting its Pending future"]
pub struct Pending<T> {
    id: DialogId,
    receiver: oneshot::Receiver<DialogResult<T>>,
}

impl<T> Pending<T> {
    pub(crate) fn new(id: DialogId) -> (Self, oneshot::Sender<DialogResult<T>>) {
        let (sender, receiver) = oneshot::channel();
        (Self { id, receiver }, sender)
    }

    /// A future that is already settled with `error`
    pub(crate) fn rejected(error: DialogError) -> Self {
        let (pending, sender) = Self::new(error.dialog_id().clone());
        let _ = sender.send(Err(error));
        pending
    }

    /// Id of the dialog this future belongs to
    pub fn id(&self) -> &DialogId {
        &self.id
    }
}

impl<T> Unpin for Pending<T> {}

impl<T> Future for Pending<T> {
    type Output = DialogResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(DialogError::Abandoned(self.id.clone()))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pending").field("id", &self.id).finish()
    }
}

struct Binding {
    id: DialogId,
    dismiss: Arc<dyn Fn() + Send + Sync>,
}

/// Capability handle letting a caller close the dialog it created.
///
/// Create it empty, pass it in the dialog's props, and the facade binds it to
/// the new dialog's id before the dialog becomes visible. Clones share the
/// same binding.
#[derive(Clone, Default)]
pub struct DialogRef {
    binding: Arc<Mutex<Option<Binding>>>,
}

impl DialogRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&self, id: DialogId, dismiss: impl Fn() + Send + Sync + 'static) {
        let mut binding = self
            .binding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *binding = Some(Binding {
            id,
            dismiss: Arc::new(dismiss),
        });
    }

    /// Id of the bound dialog, `None` until a facade call binds it
    pub fn id(&self) -> Option<DialogId> {
        self.binding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|binding| binding.id.clone())
    }

    pub fn is_bound(&self) -> bool {
        self.id().is_some()
    }

    /// Dismiss the bound dialog wherever it sits in the stack.
    /// Does nothing when unbound or when the dialog is already gone.
    pub fn dismiss(&self) {
        let dismiss = self
            .binding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .map(|binding| binding.dismiss.clone());

        match dismiss {
            Some(dismiss) => dismiss(),
            None => debug!("Dismiss called on an unbound dialog ref"),
        }
    }
}

impl std::fmt::Debug for DialogRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogRef").field("id", &self.id()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_pending_resolves_with_sent_value() {
        let (pending, sender) = Pending::<String>::new(DialogId::from("modal.1.0"));
        sender.send(Ok("value".to_string())).unwrap();
        assert_eq!(pending.await, Ok("value".to_string()));
    }

    #[tokio::test]
    async fn test_pending_abandoned_when_sender_dropped() {
        let (pending, sender) = Pending::<()>::new(DialogId::from("modal.2.0"));
        drop(sender);
        assert_eq!(pending.await, Err(DialogError::Abandoned(DialogId::from("modal.2.0"))));
    }

    #[tokio::test]
    async fn test_rejected_pending() {
        let pending = Pending::<()>::rejected(DialogError::NoValue(DialogId::from("x")));
        assert_eq!(pending.id().as_str(), "x");
        assert!(matches!(pending.await, Err(DialogError::NoValue(_))));
    }

    #[test]
    fn test_dialog_ref_binding_is_shared_by_clones() {
        let dialog_ref = DialogRef::new();
        let clone = dialog_ref.clone();
        assert!(!clone.is_bound());
        // Unbound dismiss is a no-op
        clone.dismiss();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        dialog_ref.bind(DialogId::from("modal.3.0"), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(clone.id(), Some(DialogId::from("modal.3.0")));
        clone.dismiss();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
