//! Dialog store
//!
//! The store owns the ordered list of pending dialog requests (last = topmost)
//! and notifies observers after every mutation. It is the only shared mutable
//! state of the dialog system; the facade and the renderer derive their view
//! from it.

use super::request::DialogRequest;
use super::types::DialogId;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, Weak};
use tracing::{debug, error};

/// Callback invoked with the full list after each mutation.
///
/// The list is the snapshot taken under the lock by that mutation. Mutations on
/// different threads may notify out of order; read [`DialogStore::snapshot`]
/// for the current state.
pub type Observer = Arc<dyn Fn(&[Arc<DialogRequest>]) + Send + Sync>;

#[derive(Default)]
struct StoreState {
    dialogs: Vec<Arc<DialogRequest>>,
    observers: Vec<(u64, Observer)>,
    next_observer: u64,
}

/// Shared, ordered list of pending dialog requests
#[derive(Clone, Default)]
pub struct DialogStore {
    state: Arc<Mutex<StoreState>>,
}

impl DialogStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide store used by [`Dialogs::global`](super::Dialogs::global)
    pub fn global() -> &'static DialogStore {
        static GLOBAL: OnceLock<DialogStore> = OnceLock::new();
        GLOBAL.get_or_init(DialogStore::new)
    }

    /// A handle that does not keep the store alive
    pub fn downgrade(&self) -> WeakDialogStore {
        WeakDialogStore {
            state: Arc::downgrade(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add a request at the top of the stack
    pub fn append(&self, request: Arc<DialogRequest>) {
        let (snapshot, observers) = {
            let mut state = self.lock();
            debug!(
                "Appending {} dialog '{}' at depth {}",
                request.kind().name(),
                request.id(),
                state.dialogs.len()
            );
            state.dialogs.push(request);
            Self::notification(&state)
        };

        Self::notify(&snapshot, &observers);
    }

    /// Remove the topmost request. Does nothing on an empty stack.
    pub fn remove_by_tail(&self) -> Option<Arc<DialogRequest>> {
        let (removed, snapshot, observers) = {
            let mut state = self.lock();
            let removed = state.dialogs.pop()?;
            let (snapshot, observers) = Self::notification(&state);
            (removed, snapshot, observers)
        };

        debug!("Removed topmost dialog '{}'", removed.id());
        Self::notify(&snapshot, &observers);
        Some(removed)
    }

    /// Remove the request with the given id. Does nothing if it is not present.
    pub fn remove_by_id(&self, id: &DialogId) -> Option<Arc<DialogRequest>> {
        let (removed, snapshot, observers) = {
            let mut state = self.lock();
            let index = state.dialogs.iter().position(|dialog| dialog.id() == id)?;
            let removed = state.dialogs.remove(index);
            let (snapshot, observers) = Self::notification(&state);
            (removed, snapshot, observers)
        };

        debug!("Removed dialog '{}'", id);
        Self::notify(&snapshot, &observers);
        Some(removed)
    }

    /// Register an observer; it is called with the full list on every change
    pub fn subscribe(
        &self,
        observer: impl Fn(&[Arc<DialogRequest>]) + Send + Sync + 'static,
    ) -> Subscription {
        let mut state = self.lock();
        let key = state.next_observer;
        state.next_observer += 1;
        state.observers.push((key, Arc::new(observer)));

        Subscription {
            store: self.clone(),
            key,
        }
    }

    /// Copy of the current list, bottom to top
    pub fn snapshot(&self) -> Vec<Arc<DialogRequest>> {
        self.lock().dialogs.clone()
    }

    /// The topmost request, if any
    pub fn last(&self) -> Option<Arc<DialogRequest>> {
        self.lock().dialogs.last().cloned()
    }

    pub fn get(&self, id: &DialogId) -> Option<Arc<DialogRequest>> {
        self.lock()
            .dialogs
            .iter()
            .find(|dialog| dialog.id() == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().dialogs.is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    fn notification(state: &StoreState) -> (Vec<Arc<DialogRequest>>, Vec<Observer>) {
        let observers = state
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        (state.dialogs.clone(), observers)
    }

    /// Call every observer outside the lock so observers may use the store.
    /// A panicking observer is logged and does not stop the others.
    fn notify(snapshot: &[Arc<DialogRequest>], observers: &[Observer]) {
        for observer in observers {
            if catch_unwind(AssertUnwindSafe(|| observer(snapshot))).is_err() {
                error!("Dialog store observer panicked; continuing with remaining observers");
            }
        }
    }
}

impl std::fmt::Debug for DialogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("DialogStore")
            .field("dialogs", &state.dialogs)
            .field("observers", &state.observers.len())
            .finish()
    }
}

/// Non-owning reference to a [`DialogStore`]
#[derive(Clone, Default)]
pub struct WeakDialogStore {
    state: Weak<Mutex<StoreState>>,
}

impl WeakDialogStore {
    /// The store, if anything else still holds it
    pub fn upgrade(&self) -> Option<DialogStore> {
        self.state.upgrade().map(|state| DialogStore { state })
    }
}

/// Registration returned by [`DialogStore::subscribe`]
#[must_use = "dropping a Subscription keeps the observer registered; call unsubscribe to remove it"]
pub struct Subscription {
    store: DialogStore,
    key: u64,
}

impl Subscription {
    /// Deregister the observer
    pub fn unsubscribe(self) {
        self.store
            .lock()
            .observers
            .retain(|(key, _)| *key != self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::request::{AlertSpec, DialogKind};

    fn request(id: &str) -> Arc<DialogRequest> {
        Arc::new(DialogRequest::new(
            DialogId::from(id),
            "Alert",
            "message",
            DialogKind::Alert(AlertSpec {
                yes_label: "OK".to_string(),
            }),
            |_| {},
        ))
    }

    fn ids(store: &DialogStore) -> Vec<String> {
        store
            .snapshot()
            .iter()
            .map(|dialog| dialog.id().to_string())
            .collect()
    }

    #[test]
    fn test_append_preserves_order() {
        let store = DialogStore::new();
        store.append(request("r1"));
        store.append(request("r2"));
        store.append(request("r3"));

        assert_eq!(ids(&store), vec!["r1", "r2", "r3"]);
        assert_eq!(store.last().unwrap().id().as_str(), "r3");
    }

    #[test]
    fn test_remove_by_tail_is_lifo() {
        let store = DialogStore::new();
        for id in ["r1", "r2", "r3"] {
            store.append(request(id));
        }

        assert_eq!(store.remove_by_tail().unwrap().id().as_str(), "r3");
        assert_eq!(ids(&store), vec!["r1", "r2"]);
        assert_eq!(store.remove_by_tail().unwrap().id().as_str(), "r2");
        assert_eq!(store.remove_by_tail().unwrap().id().as_str(), "r1");
        assert!(store.remove_by_tail().is_none());
        assert!(store.last().is_none());
    }

    #[test]
    fn test_remove_by_id_out_of_order() {
        let store = DialogStore::new();
        for id in ["r1", "r2", "r3"] {
            store.append(request(id));
        }

        assert!(store.remove_by_id(&DialogId::from("r2")).is_some());
        assert_eq!(ids(&store), vec!["r1", "r3"]);
        assert!(store.remove_by_id(&DialogId::from("missing")).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_observers_see_every_mutation() {
        let store = DialogStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = store.subscribe(move |dialogs| sink.lock().unwrap().push(dialogs.len()));

        store.append(request("r1"));
        store.append(request("r2"));
        store.remove_by_tail();
        // No-op removals do not notify
        store.remove_by_id(&DialogId::from("missing"));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);

        subscription.unsubscribe();
        assert_eq!(store.observer_count(), 0);
        store.append(request("r3"));
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn test_empty_tail_removal_does_not_notify() {
        let store = DialogStore::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();
        let _subscription = store.subscribe(move |_| *counter.lock().unwrap() += 1);

        assert!(store.remove_by_tail().is_none());
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_panicking_observer_is_isolated() {
        let store = DialogStore::new();
        let _bad = store.subscribe(|_| panic!("observer failure"));
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        let _good = store.subscribe(move |_| *sink.lock().unwrap() += 1);

        store.append(request("r1"));
        store.append(request("r2"));

        assert_eq!(*seen.lock().unwrap(), 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_observer_may_read_store() {
        let store = DialogStore::new();
        let reader = store.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _subscription = store.subscribe(move |_| sink.lock().unwrap().push(reader.len()));

        store.append(request("r1"));
        assert_eq!(*seen.lock().unwrap(), vec![1]);
    }
}
