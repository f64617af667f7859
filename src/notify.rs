//! Notification trait for session-level confirmations.
//!
//! This module provides the [`Notify`] trait the session controller
//! uses to surface non-blocking confirmations (for example when the
//! user saves an answer). Implementations must never block.

/// A sink for non-blocking user-facing confirmations.
///
/// # Example
///
/// ```rust,ignore
/// use zennfy::Notify;
///
/// struct StdoutNotify;
///
/// impl Notify for StdoutNotify {
///     fn notify(&self, title: &str, body: &str) {
///         println!("[{title}] {body}");
///     }
/// }
/// ```
pub trait Notify: Send + Sync {
    /// Deliver a short confirmation to the user.
    fn notify(&self, title: &str, body: &str);
}

/// A notifier that drops everything, the default for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotify;

impl Notify for NullNotify {
    fn notify(&self, _title: &str, _body: &str) {}
}
