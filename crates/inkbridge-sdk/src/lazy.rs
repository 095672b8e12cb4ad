//! Lazily initialized shared resources

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

use crate::SdkError;

type InitFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, SdkError>> + Send + Sync>;
type SharedInit<T> = Shared<BoxFuture<'static, Result<Arc<T>, SdkError>>>;

struct Slot<T> {
    generation: u64,
    pending: Option<SharedInit<T>>,
}

/// A value created on first use by an async initializer.
///
/// Concurrent callers attach to the same in-flight attempt, so the
/// initializer runs at most once per attempt and its error is handed to
/// every waiter. A failed attempt is forgotten: the next call starts over.
pub struct Lazy<T> {
    init: InitFn<T>,
    slot: Mutex<Slot<T>>,
}

impl<T: Send + Sync + 'static> Lazy<T> {
    /// Create a resource initialized by `init`
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
    {
        Self {
            init: Arc::new(move || init().boxed()),
            slot: Mutex::new(Slot {
                generation: 0,
                pending: None,
            }),
        }
    }

    /// Get the value, initializing it if needed
    pub async fn get(&self) -> Result<Arc<T>, SdkError> {
        let (generation, attempt) = self.attempt();
        let result = attempt.await;

        if result.is_err() {
            let mut slot = self.slot.lock();
            if slot.generation == generation {
                slot.pending = None;
            }
        }
        result
    }

    /// Returns `true` once a successful value is available
    pub fn is_initialized(&self) -> bool {
        let slot = self.slot.lock();
        matches!(
            slot.pending.as_ref().and_then(|attempt| attempt.peek()),
            Some(Ok(_))
        )
    }

    fn attempt(&self) -> (u64, SharedInit<T>) {
        let mut slot = self.slot.lock();

        if let Some(attempt) = &slot.pending {
            // a finished failure belongs to an earlier caller
            if !matches!(attempt.peek(), Some(Err(_))) {
                return (slot.generation, attempt.clone());
            }
        }

        slot.generation += 1;
        let init = self.init.clone();
        let attempt = async move { init().await.map(Arc::new) }.boxed().shared();
        slot.pending = Some(attempt.clone());
        (slot.generation, attempt)
    }
}

impl<T> std::fmt::Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.lock();
        f.debug_struct("Lazy")
            .field("generation", &slot.generation)
            .field("pending", &slot.pending.is_some())
            .finish()
    }
}
