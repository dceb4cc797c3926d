//! Response engines
//!
//! An engine turns a user message (plus optional rolling history) into a
//! reply. Two interchangeable implementations: a remote client for the
//! hosted chat proxy, and a local keyword responder that never fails.

mod local;
mod remote;

pub use local::LocalEngine;
pub use remote::RemoteEngine;

use async_trait::async_trait;

use crate::history::ConversationTurn;
use crate::Result;

/// Produces a reply for one user message
#[async_trait]
pub trait ResponseEngine: Send + Sync {
    /// Produce a reply to `message`
    ///
    /// `history` is the rolling conversation so far, oldest first; engines
    /// that ignore it are free to.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingCredential`] when the upstream
    /// credential is not configured, [`crate::Error::Upstream`] on any other
    /// remote failure.
    async fn respond(&self, message: &str, history: &[ConversationTurn]) -> Result<String>;

    /// Whether the controller should record turns for this engine
    fn retains_history(&self) -> bool;
}
