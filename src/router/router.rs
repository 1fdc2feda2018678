//! ActionRouter: reactive handle over the canonical state

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use super::state::{reduce, RouterAction, RouterState};
use crate::message::{MessageService, PostMessagePayload};
use crate::route::ActionPath;
use crate::schema::{SchemaError, SchemaSet};

/// Reactive action router. Cheap to clone; all clones share one state.
///
/// Transitions are applied in issue order under a single lock, and every
/// resulting state is published atomically through a watch channel. A send's
/// asynchronous resolution carries the epoch token it was issued under and is
/// silently discarded if `reset` (or a newer send) moved the epoch first.
///
/// Single attempt per send: no retries and no timeout at this layer. A hung
/// transport leaves `sending_message` true until it resolves; bounding that
/// is the transport's job (`MessageServiceConfig::with_timeout`).
#[derive(Clone)]
pub struct ActionRouter {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    service: Arc<dyn MessageService>,
    schemas: SchemaSet,
    state: watch::Sender<RouterState>,
    epoch: Mutex<u64>,
}

impl std::fmt::Debug for ActionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRouter").finish_non_exhaustive()
    }
}

impl ActionRouter {
    /// Build a router over the declared routes. Schemas for every
    /// non-`notFound` route are derived here, so misdeclared routes fail at
    /// construction rather than at send time.
    pub fn new(
        routes: &[ActionPath],
        service: Arc<dyn MessageService>,
    ) -> Result<Self, SchemaError> {
        let schemas = SchemaSet::compile(routes)?;
        tracing::debug!("router created with {} outbound schemas", schemas.len());
        let (state, _) = watch::channel(RouterState::initial());
        Ok(Self { inner: Arc::new(RouterInner { service, schemas, state, epoch: Mutex::new(0) }) })
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RouterState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes. Readers never see a half-applied state.
    pub fn subscribe(&self) -> watch::Receiver<RouterState> {
        self.inner.state.subscribe()
    }

    /// Compiled outbound schema set (declaration order, `notFound` excluded).
    pub fn schemas(&self) -> &SchemaSet {
        &self.inner.schemas
    }

    /// Replace the unsent input text.
    pub fn update_input(&self, value: impl Into<String>) {
        let value = value.into();
        let _epoch = self.inner.lock_epoch();
        self.inner.apply(RouterAction::UpdateInput(value));
    }

    /// Clear the unsent input text.
    pub fn clear_input(&self) {
        let _epoch = self.inner.lock_epoch();
        self.inner.apply(RouterAction::ClearInput);
    }

    /// Send a message to the remote matcher. Marks the state in-flight
    /// synchronously, then spawns one task that posts the message with the
    /// compiled schema set and folds the outcome back in as exactly one of
    /// success or failure. Requires a tokio runtime context.
    pub fn send_message(&self, message: impl Into<String>) {
        let message = message.into();
        let token = {
            let mut epoch = self.inner.lock_epoch();
            *epoch += 1;
            self.inner.apply(RouterAction::SendMessage);
            *epoch
        };
        tracing::debug!(token, "sending message to matcher");

        let inner = self.inner.clone();
        tokio::spawn(async move {
            let payload = PostMessagePayload {
                message,
                action_path_schemas: inner.schemas.schemas().to_vec(),
            };
            let resolution = match inner.service.post_message(payload).await {
                Ok(result) => {
                    tracing::debug!(path = %result.path, "matcher resolved");
                    RouterAction::SendMessageSuccess(result)
                }
                Err(err) => {
                    tracing::warn!("matcher request failed: {err:#}");
                    RouterAction::SendMessageFailure
                }
            };
            inner.resolve(token, resolution);
        });
    }

    /// Send the current input value.
    pub fn send_input(&self) {
        let message = self.inner.state.borrow().input_value.clone();
        self.send_message(message);
    }

    /// Return to the initial state unconditionally. Any in-flight resolution
    /// becomes stale and will be discarded when it arrives.
    pub fn reset(&self) {
        let mut epoch = self.inner.lock_epoch();
        *epoch += 1;
        self.inner.apply(RouterAction::Reset);
    }
}

impl RouterInner {
    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply one transition and publish the complete new state.
    fn apply(&self, action: RouterAction) {
        self.state.send_modify(|state| *state = reduce(state, action));
    }

    /// Apply a resolution only if its send is still the current one. The
    /// epoch stays locked across the apply so a reset cannot slip between
    /// the check and the state update.
    fn resolve(&self, token: u64, action: RouterAction) {
        let epoch = self.lock_epoch();
        if *epoch != token {
            tracing::debug!(token, epoch = *epoch, "discarding stale resolution");
            return;
        }
        self.apply(action);
    }
}
