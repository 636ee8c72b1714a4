use thiserror::Error;

/// Everything a sweep can report back to its caller.
///
/// Only the first three variants are fatal, and they are raised before any
/// request is sent. The remaining two describe a sweep that ran and carry no
/// partial results themselves; those live in the report next to them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SweepError {
    #[error("invalid address block '{input}': {reason}")]
    InvalidBlock { input: String, reason: String },

    #[error("no valid TCP ports in '{0}'")]
    NoValidPorts(String),

    #[error("worker count must be at least 1")]
    NoWorkers,

    /// Link-layer discovery could not run (missing privilege, no usable
    /// interface, unsupported platform). Non-fatal.
    #[error("link-layer discovery unavailable: {0}")]
    LinkLayerUnavailable(String),

    /// The shared deadline elapsed before every attempt finished.
    #[error("sweep deadline exceeded")]
    DeadlineExceeded,
}

impl SweepError {
    pub fn invalid_block(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidBlock {
            input: input.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error aborts the whole operation.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidBlock { .. } | Self::NoValidPorts(_) | Self::NoWorkers
        )
    }
}

/// What a single failed attempt tells us about its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The remote stack answered with a rejection: the host is there.
    ActiveRefusal,
    /// Timeout, unreachable, reset by a middlebox... nothing we can use.
    NoEvidence,
    /// The local machine refused to perform the attempt at all. Also covers
    /// primitives the platform cannot provide.
    PermissionDenied,
}
