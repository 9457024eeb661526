//! # Interception outcome.
//!
//! Every interceptor resolves to exactly one [`Action`], which the engine
//! applies immediately:
//!
//! ```text
//! interceptor ──► Action::Drop        ──► nothing (event never reaches a subscriber)
//!             └─► Action::Emit(event) ──► Engine::emit(event) ──► all subscribers
//! ```

use std::sync::Arc;

use crate::core::Engine;
use crate::events::Event;

/// What happens to an intercepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Suppress the event: no subscriber, current or future, sees it.
    Drop,
    /// Forward the event to every current subscriber.
    Emit(Arc<Event>),
}

impl Action {
    /// Applies this action to `engine`.
    pub async fn apply(self, engine: &Engine) {
        match self {
            Action::Drop => {}
            Action::Emit(event) => {
                engine.emit(&event).await;
            }
        }
    }

    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self, Action::Drop)
    }
}
