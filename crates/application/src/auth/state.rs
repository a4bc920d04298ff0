//! Broadcast channel carrying the current authentication state.
//!
//! # Guarantees
//!
//! - **Live feed**: a subscriber sees every emission made after it subscribed
//! - **Startup replay**: the startup state is replayed to subscribers that
//!   arrive after it was published but before any later emission
//! - **No other replay**: no other emission made before subscription is delivered
//! - **Completion**: once closed, every subscriber (current or future) sees the
//!   end of the stream and no further values

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use passage_domain::User;

/// The signed-in user, or `None` when signed out.
pub type AuthState = Option<User>;

/// Default number of emissions buffered per subscriber.
pub const DEFAULT_STATE_CAPACITY: usize = 256;

/// Multi-subscriber channel of `AuthState` values.
#[derive(Debug)]
pub struct AuthStateChannel {
    slot: Mutex<ChannelSlot>,
}

#[derive(Debug)]
struct ChannelSlot {
    sender: Option<broadcast::Sender<AuthState>>,
    /// Startup state, held until the next emission supersedes it.
    initial: Option<AuthState>,
}

impl AuthStateChannel {
    /// Create a new channel with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_STATE_CAPACITY)
    }

    /// Create a new channel with the specified capacity.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            slot: Mutex::new(ChannelSlot {
                sender: Some(sender),
                initial: None,
            }),
        }
    }

    /// Publish a state to all subscribers.
    ///
    /// Returns the number of subscribers that received it. No-op after close.
    pub fn publish(&self, state: AuthState) -> usize {
        let mut slot = self.slot.lock();
        slot.initial = None;
        slot.send(state)
    }

    /// Publish the startup state.
    ///
    /// Besides reaching current subscribers, the state is kept for anyone who
    /// subscribes before the next [`publish`](Self::publish).
    pub fn publish_initial(&self, state: AuthState) -> usize {
        let mut slot = self.slot.lock();
        if slot.sender.is_none() {
            return 0;
        }
        slot.initial = Some(state.clone());
        slot.send(state)
    }

    /// Subscribe to emissions made from now on.
    ///
    /// A retained startup state is delivered first. After close, the returned
    /// stream is already complete.
    #[must_use]
    pub fn subscribe(&self) -> AuthStateStream {
        let slot = self.slot.lock();
        match &slot.sender {
            Some(sender) => AuthStateStream {
                replay: slot.initial.clone(),
                receiver: sender.subscribe(),
            },
            None => AuthStateStream {
                replay: None,
                receiver: broadcast::channel(1).1,
            },
        }
    }

    /// Close the channel.
    ///
    /// Returns true only for the call that actually closed it.
    pub fn close(&self) -> bool {
        let mut slot = self.slot.lock();
        slot.initial = None;
        slot.sender.take().is_some()
    }

    /// Returns true once the channel has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.slot.lock().sender.is_none()
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.slot
            .lock()
            .sender
            .as_ref()
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl ChannelSlot {
    fn send(&self, state: AuthState) -> usize {
        self.sender
            .as_ref()
            .map_or(0, |sender| sender.send(state).unwrap_or(0))
    }
}

impl Default for AuthStateChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// A subscriber's view of the auth state channel.
///
/// Each subscriber buffers up to the channel capacity. A subscriber that falls
/// further behind than that loses the oldest pending states and resumes from
/// the oldest one still buffered, so the newest state always arrives.
#[derive(Debug)]
pub struct AuthStateStream {
    replay: Option<AuthState>,
    receiver: broadcast::Receiver<AuthState>,
}

impl AuthStateStream {
    /// Wait for the next emission.
    ///
    /// Returns `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<AuthState> {
        if let Some(state) = self.replay.take() {
            return Some(state);
        }
        loop {
            match self.receiver.recv().await {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth state subscriber lagged; skipping stale states");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next emission without waiting.
    ///
    /// # Errors
    ///
    /// Returns `TryRecvError::Empty` when nothing is pending and
    /// `TryRecvError::Closed` once the channel completed.
    pub fn try_recv(&mut self) -> Result<AuthState, TryRecvError> {
        if let Some(state) = self.replay.take() {
            return Ok(state);
        }
        loop {
            match self.receiver.try_recv() {
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth state subscriber lagged; skipping stale states");
                }
                other => return other,
            }
        }
    }
}
