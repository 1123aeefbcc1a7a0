// ── Core error types ──
//
// Only tag construction and raw store/sink IO produce errors. Lookups
// answer with `Option`, repository writes with `bool`, and command
// dispatch failures are absorbed by the dispatcher.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid tag id '{id}': expected one or more of [a-zA-Z0-9_-]")]
    InvalidTagId { id: String },

    // ── Backing store ────────────────────────────────────────────────
    #[error("Backing store error: {message}")]
    Store { message: String },

    // ── External executor ────────────────────────────────────────────
    #[error("Command '{command}' failed: {reason}")]
    Dispatch { command: String, reason: String },
}

impl CoreError {
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }
}
