//! Trip planner chat: a linear conversation with a remote planning service.
//!
//! ```text
//! send_prompt(text)
//!     |-- blank?  -> no-op
//!     |-- append  { user, text }
//!     |-- busy += 1
//!     |-- PlannerBackend::plan(text) --ok--> append { bot, reply }
//!     |                              --err-> append { bot, CONNECTION_FAILURE_TEXT }
//!     '-- busy -= 1
//! ```
//!
//! The conversation log is the only place errors surface. Sends are not
//! serialized: two sends in flight produce two independent calls and the
//! replies land in arrival order.

pub mod http;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use crate::error::ClientError;
use crate::ids::IdGenerator;
use crate::model::{ChatMessage, Sender};

pub use http::HttpPlanner;

/// Text of the synthetic bot message appended when the backend fails.
pub const CONNECTION_FAILURE_TEXT: &str = "❌ Could not connect to planner";

/// Adapter interface for the planning service.
#[async_trait]
pub trait PlannerBackend: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Ask the planner about `prompt` and return its textual reply.
    async fn plan(&self, prompt: &str) -> Result<String, ClientError>;
}

const _: () = {
    fn _assert_object_safe(_: &dyn PlannerBackend) {}
};

/// Chat client owning the conversation log.
///
/// Clones share the log and the busy counter, so a clone can be moved into
/// a spawned task while the UI keeps rendering [`TripPlannerChat::messages`].
#[derive(Clone)]
pub struct TripPlannerChat {
    backend: Arc<dyn PlannerBackend>,
    log: Arc<Mutex<Vec<ChatMessage>>>,
    in_flight: Arc<AtomicUsize>,
    ids: Arc<IdGenerator>,
    suggestions: Arc<[String]>,
}

impl TripPlannerChat {
    pub fn new(backend: Arc<dyn PlannerBackend>) -> Self {
        Self {
            backend,
            log: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            ids: Arc::new(IdGenerator::new()),
            suggestions: Arc::from(Vec::<String>::new()),
        }
    }

    /// Attach the canned prompts shown while the conversation is empty.
    pub fn with_suggestions(mut self, suggestions: &[String]) -> Self {
        self.suggestions = Arc::from(suggestions.to_vec());
        self
    }

    /// Send a prompt and return the bot message appended for it.
    ///
    /// Returns `None` without touching the log when `text` is blank.
    pub async fn send_prompt(&self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }

        self.push(ChatMessage {
            id: self.ids.next_id(),
            text: text.to_string(),
            sender: Sender::User,
        });

        let _busy = BusyGuard::enter(&self.in_flight);
        let reply = match self.backend.plan(text).await {
            Ok(reply) => ChatMessage {
                id: self.ids.next_id_with("bot"),
                text: reply,
                sender: Sender::Bot,
            },
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "planner request failed");
                ChatMessage {
                    id: self.ids.next_id_with("err"),
                    text: CONNECTION_FAILURE_TEXT.to_string(),
                    sender: Sender::Bot,
                }
            }
        };

        self.push(reply.clone());
        Some(reply)
    }

    /// The conversation so far, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().clone()
    }

    /// Whether any send is waiting on the backend.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn quick_suggestions(&self) -> &[String] {
        &self.suggestions
    }

    fn push(&self, msg: ChatMessage) {
        self.lock().push(msg);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ChatMessage>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TripPlannerChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripPlannerChat")
            .field("backend", &self.backend.name())
            .field("messages", &self.lock().len())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}

/// Holds one unit of the busy counter; released on drop, so a cancelled
/// send does not leave the client busy forever.
struct BusyGuard<'a>(&'a AtomicUsize);

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
