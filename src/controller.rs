//! Per-chat repeating chat action schedules.
//!
//! [`ChatActionsController`] owns one schedule per [`SendingKey`]. A schedule
//! is a background tokio task that sends the first action as soon as it runs
//! and then re-sends the next action of its rotation every repeat interval
//! until it is stopped.
//!
//! # Invariants
//!
//! - At most one schedule exists per key. Starting a key that is already
//!   active cancels the old schedule before the new one is installed.
//! - Map mutations happen under one lock, and a schedule is cancelled in the
//!   same critical section that removes it, so a removed schedule can never
//!   dispatch another action.
//! - A failed emission stops only the schedule that produced it. If that
//!   schedule was already superseded, its replacement is left alone.
//! - A tick that fires while the previous emission is still in flight is
//!   skipped; the rotation does not advance for skipped ticks.

use crate::action::ChatAction;
use crate::api::ChatActionSender;
use crate::cycle::ActionCycle;
use crate::request::SendingKey;
use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::Poll;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Interval between repeated chat actions for one key.
///
/// Bot API clients display a chat action for about five seconds, so
/// re-sending on this period keeps the indicator continuously visible.
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_secs(5);

const MIN_REPEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one installed schedule. Restarting a key yields a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SendingId(u64);

struct Sending {
    id: SendingId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

#[derive(Default)]
struct Shared {
    sendings: Mutex<HashMap<SendingKey, Sending>>,
    next_id: AtomicU64,
}

impl Shared {
    fn sendings(&self) -> MutexGuard<'_, HashMap<SendingKey, Sending>> {
        self.sendings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remove and cancel the schedule for `key` only if it is still `id`.
    fn stop_if_current(&self, key: &SendingKey, id: SendingId) -> bool {
        let mut sendings = self.sendings();
        if sendings.get(key).is_some_and(|sending| sending.id == id) {
            if let Some(sending) = sendings.remove(key) {
                sending.cancel.cancel();
            }
            return true;
        }
        false
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let sendings = self
            .sendings
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, sending) in sendings.drain() {
            sending.cancel.cancel();
        }
    }
}

/// Starts and stops chat action schedules for one bot client.
///
/// Cloning is cheap and every clone manages the same set of schedules. When
/// the last clone is dropped all schedules are cancelled. Methods that start
/// a schedule must be called from within a tokio runtime.
#[derive(Clone)]
pub struct ChatActionsController {
    sender: Arc<dyn ChatActionSender>,
    shared: Arc<Shared>,
    repeat_interval: Duration,
}

impl ChatActionsController {
    /// Create a controller that emits actions through `sender`.
    pub fn new(sender: Arc<dyn ChatActionSender>) -> Self {
        Self {
            sender,
            shared: Arc::new(Shared::default()),
            repeat_interval: DEFAULT_REPEAT_INTERVAL,
        }
    }

    /// Override the repeat interval (clamped to at least one second).
    pub(crate) fn with_repeat_interval(mut self, interval: Duration) -> Self {
        self.repeat_interval = interval.max(MIN_REPEAT_INTERVAL);
        self
    }

    pub fn repeat_interval(&self) -> Duration {
        self.repeat_interval
    }

    /// Start sending `actions` in rotation to `key`, replacing any schedule
    /// already active for it.
    ///
    /// The first action is dispatched as soon as the schedule task runs; the
    /// call itself never waits for it. `signal` is handed to every emission
    /// so the transport can abort them together with the operation that
    /// triggered them.
    ///
    /// Returns `None` (and changes nothing) when `actions` is empty.
    pub fn start_sending(
        &self,
        key: SendingKey,
        actions: Vec<ChatAction>,
        signal: Option<CancellationToken>,
    ) -> Option<SendingId> {
        self.spawn_sending(key, actions, signal).map(|(id, _)| id)
    }

    /// Like [`start_sending`](Self::start_sending), but resolves only once
    /// the first action has been handed to the sender.
    ///
    /// Resolves early if the schedule is stopped before it gets that far.
    pub async fn start_sending_dispatched(
        &self,
        key: SendingKey,
        actions: Vec<ChatAction>,
        signal: Option<CancellationToken>,
    ) -> Option<SendingId> {
        let (id, dispatched) = self.spawn_sending(key, actions, signal)?;
        // A dropped sender means the schedule ended first.
        let _ = dispatched.await;
        Some(id)
    }

    fn spawn_sending(
        &self,
        key: SendingKey,
        actions: Vec<ChatAction>,
        signal: Option<CancellationToken>,
    ) -> Option<(SendingId, oneshot::Receiver<()>)> {
        if actions.is_empty() {
            return None;
        }

        let id = SendingId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        let (dispatched_tx, dispatched_rx) = oneshot::channel();

        let mut sendings = self.shared.sendings();
        if let Some(previous) = sendings.remove(&key) {
            previous.cancel.cancel();
            debug!(key = %key, "replacing active chat action schedule");
        }

        debug!(key = %key, actions = ?actions, "starting chat action schedule");
        let task = tokio::spawn(run_sending(SendingTask {
            key: key.clone(),
            id,
            actions: ActionCycle::new(actions),
            sender: Arc::clone(&self.sender),
            shared: Arc::downgrade(&self.shared),
            cancel: cancel.clone(),
            signal,
            repeat_interval: self.repeat_interval,
            dispatched: dispatched_tx,
        }));
        sendings.insert(key, Sending { id, cancel, task });

        Some((id, dispatched_rx))
    }

    /// Stop the schedule for `key`. Returns whether one was active.
    pub fn stop_sending(&self, key: &SendingKey) -> bool {
        let removed = self.shared.sendings().remove(key);
        match removed {
            Some(sending) => {
                sending.cancel.cancel();
                debug!(key = %key, "stopped chat action schedule");
                true
            }
            None => false,
        }
    }

    /// Guard that stops `key` when dropped, on every exit path.
    pub fn stop_guard(&self, key: SendingKey) -> StopGuard {
        StopGuard {
            controller: self.clone(),
            key,
        }
    }

    pub fn is_sending(&self, key: &SendingKey) -> bool {
        self.shared.sendings().contains_key(key)
    }

    /// The id of the schedule currently installed for `key`.
    pub fn current_sending(&self, key: &SendingKey) -> Option<SendingId> {
        self.shared.sendings().get(key).map(|sending| sending.id)
    }

    /// Number of live schedules.
    pub fn active_count(&self) -> usize {
        self.shared.sendings().len()
    }

    /// Stop every schedule without waiting for their tasks.
    pub fn stop_all(&self) {
        let drained: Vec<Sending> = self.shared.sendings().drain().map(|(_, s)| s).collect();
        for sending in drained {
            sending.cancel.cancel();
        }
    }

    /// Stop every schedule and wait until their tasks have exited.
    pub async fn shutdown(&self) {
        let drained: Vec<Sending> = self.shared.sendings().drain().map(|(_, s)| s).collect();
        for sending in &drained {
            sending.cancel.cancel();
        }
        for sending in drained {
            if let Err(err) = sending.task.await {
                warn!("chat action task ended abnormally: {err}");
            }
        }
    }
}

/// Stops one key's schedule when dropped.
#[must_use = "the schedule stops as soon as the guard is dropped"]
pub struct StopGuard {
    controller: ChatActionsController,
    key: SendingKey,
}

impl StopGuard {
    pub fn key(&self) -> &SendingKey {
        &self.key
    }
}

impl Drop for StopGuard {
    fn drop(&mut self) {
        self.controller.stop_sending(&self.key);
    }
}

struct SendingTask {
    key: SendingKey,
    id: SendingId,
    actions: ActionCycle<ChatAction>,
    sender: Arc<dyn ChatActionSender>,
    shared: Weak<Shared>,
    cancel: CancellationToken,
    signal: Option<CancellationToken>,
    repeat_interval: Duration,
    dispatched: oneshot::Sender<()>,
}

type Emission<'a> = BoxFuture<'a, anyhow::Result<()>>;

async fn poll_in_flight(in_flight: &mut Option<Emission<'_>>) -> anyhow::Result<()> {
    match in_flight {
        Some(emission) => emission.await,
        None => std::future::pending().await,
    }
}

fn emission_failed(
    shared: &Weak<Shared>,
    key: &SendingKey,
    id: SendingId,
    action: ChatAction,
    err: &anyhow::Error,
) {
    warn!(
        chat_id = %key.chat_id,
        thread_id = ?key.message_thread_id,
        action = %action,
        error = %err,
        "chat action failed; stopping schedule"
    );
    if let Some(shared) = shared.upgrade() {
        shared.stop_if_current(key, id);
    }
}

async fn run_sending(task: SendingTask) {
    let SendingTask {
        key,
        id,
        mut actions,
        sender,
        shared,
        cancel,
        signal,
        repeat_interval,
        dispatched,
    } = task;

    if cancel.is_cancelled() {
        return;
    }
    let Some(first) = actions.next() else {
        return;
    };

    // Dispatch the first action before anything else; the sender starts
    // its request on the first poll.
    let mut current = first;
    let mut emission = sender.send_chat_action(&key, first, signal.as_ref());
    let first_poll = futures_util::poll!(&mut emission);
    let _ = dispatched.send(());

    let mut in_flight: Option<Emission<'_>> = match first_poll {
        Poll::Pending => Some(emission),
        Poll::Ready(Ok(())) => None,
        Poll::Ready(Err(err)) => {
            emission_failed(&shared, &key, id, first, &err);
            return;
        }
    };

    let mut ticks =
        tokio::time::interval_at(Instant::now() + repeat_interval, repeat_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = poll_in_flight(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
                if let Err(err) = result {
                    emission_failed(&shared, &key, id, current, &err);
                    break;
                }
            }
            _ = ticks.tick() => {
                if in_flight.is_some() {
                    debug!(key = %key, "previous chat action still in flight; skipping tick");
                    continue;
                }
                let Some(action) = actions.next() else {
                    break;
                };
                current = action;
                in_flight = Some(sender.send_chat_action(&key, action, signal.as_ref()));
            }
        }
    }
}
