//! Single close-once cancellation signal shared across every scanning task.

use tokio_util::sync::CancellationToken;

/// Thin wrapper around `tokio_util::sync::CancellationToken` giving the
/// scan-wide cancellation bus a stable, minimal API: fire once, observe
/// from any number of readers, never reset.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(CancellationToken);

impl CancelToken {
    pub fn new() -> Self {
        Self(CancellationToken::new())
    }

    /// Close the token. Idempotent -- calling this more than once is a no-op.
    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Resolves once the token is cancelled. Safe to await from any number
    /// of concurrent tasks.
    pub async fn cancelled(&self) {
        self.0.cancelled().await;
    }

    /// A child token that is cancelled whenever the parent is, but can also
    /// be cancelled independently -- unused today but kept for the same
    /// reason `CancellationToken::child_token` exists upstream: scoping a
    /// sub-stage's cancellation without affecting siblings.
    pub fn child(&self) -> Self {
        Self(self.0.child_token())
    }
}
