//! # Error taxonomy

use thiserror::Error;

/// A delivered payload's runtime type disagrees with the receiving channel's
/// declared payload type.
///
/// This indicates mismatched publishers and subscribers sharing one channel
/// name. It is reported through the channel's mismatch hook rather than
/// returned, because delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type mismatch on channel {channel:?}: expected {expected}, got {actual}")]
pub struct TypeMismatch {
    /// Name of the channel the payload arrived on.
    pub channel: String,
    /// Payload type the receiving channel declares.
    pub expected: &'static str,
    /// Type recorded in the delivered envelope.
    pub actual: &'static str,
}
