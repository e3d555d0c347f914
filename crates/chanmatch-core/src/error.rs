//! Error taxonomy for the match engine.

use thiserror::Error;

/// Fatal conditions surfaced to the caller.
///
/// A failed compatibility check is not an error; it is reported through
/// [`MatchResult::reason`](crate::engine::MatchResult). Errors here mean the
/// caller handed the engine malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Malformed channel data: duplicate elevation thresholds, negative or
    /// non-finite rates and durations, unreadable cue data.
    #[error("invalid channel configuration: {0}")]
    InvalidConfiguration(String),

    /// A link state cue set with more than one cue lacking an offset.
    #[error("invalid link state cue set: {0}")]
    InvalidCueSet(String),
}
