//! Command abstractions.

/// Trait that all commands implement.
///
/// Commands are plain data; the aggregate's `handle` interprets them.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// The stream this command targets. Creation commands may return
    /// `None`, in which case the aggregate synthesizes a new stream id.
    fn stream_id(&self) -> Option<&str>;
}
