//! Link state cue validation and resolution.
//!
//! A link state cue tells the downlink side which data topics to send at an
//! offset within a contact. Offsets may be absolute seconds or fractions of
//! the contact duration, so they can only be fixed once the contact's
//! concrete duration is known.

use crate::error::MatchError;
use crate::params::ParameterTree;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Key under which cue lists are embedded in dynamic window parameters.
pub const LINK_STATE_CUES_KEY: &str = "link_state_cues";

/// Instruction to downlink a set of topics at an offset within a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStateCue {
    pub topics: BTreeSet<String>,
    /// When the cue fires. A cue without an offset applies for the whole
    /// contact; at most one such cue may appear in a set.
    #[serde(default)]
    pub offset: Option<CueOffset>,
}

/// A cue offset, either absolute seconds or a fraction of the contact
/// duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CueOffset {
    Absolute { value: f64 },
    Relative { value: f64 },
}

/// A cue with its offset fixed to concrete seconds from contact start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCue {
    pub topics: BTreeSet<String>,
    pub offset_s: f64,
}

impl ResolvedCue {
    /// Absolute activation time of this cue for a contact starting at
    /// `contact_start`.
    pub fn activation_time(&self, contact_start: DateTime<Utc>) -> DateTime<Utc> {
        contact_start + Duration::milliseconds((self.offset_s * 1000.0).round() as i64)
    }
}

/// Cue data carried through a match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CueSchedule {
    /// Offsets not yet resolved; the contact duration was unknown at match
    /// time.
    Pending { cues: Vec<LinkStateCue> },
    /// Offsets resolved to seconds from contact start.
    Resolved { cues: Vec<ResolvedCue> },
}

/// Check the at-most-one-offset-less invariant of a cue set.
///
/// The authoring tool is the primary gate for cue validity; this re-check
/// keeps a bad set from silently resolving to two whole-contact cues.
pub fn validate_cue_set(cues: &[LinkStateCue]) -> Result<(), MatchError> {
    let unbounded = cues.iter().filter(|cue| cue.offset.is_none()).count();
    if unbounded > 1 {
        return Err(MatchError::InvalidCueSet(format!(
            "{unbounded} cues have no offset; at most one whole-contact cue is allowed"
        )));
    }
    Ok(())
}

/// Resolve cue offsets against a concrete contact duration.
///
/// Absolute offsets pass through unchanged; relative offsets multiply by the
/// duration. The offset-less cue, if present, applies from the start of the
/// contact; its end bound is the scheduler's concern.
pub fn resolve_cues(
    cues: &[LinkStateCue],
    contact_duration_s: f64,
) -> Result<Vec<ResolvedCue>, MatchError> {
    if !contact_duration_s.is_finite() || contact_duration_s < 0.0 {
        return Err(MatchError::InvalidConfiguration(format!(
            "contact duration ({contact_duration_s}) must be a non-negative number of seconds"
        )));
    }
    validate_cue_set(cues)?;

    let resolved = cues
        .iter()
        .map(|cue| {
            let offset_s = match cue.offset {
                None => 0.0,
                Some(CueOffset::Absolute { value }) => value,
                Some(CueOffset::Relative { value }) => value * contact_duration_s,
            };
            ResolvedCue {
                topics: cue.topics.clone(),
                offset_s,
            }
        })
        .collect();

    Ok(resolved)
}

/// Extract the cue list embedded in a dynamic window parameter tree.
///
/// A missing entry yields an empty list; a present but unreadable entry is
/// an invalid configuration.
pub fn extract_cues(
    dynamic_window_parameters: &ParameterTree,
) -> Result<Vec<LinkStateCue>, MatchError> {
    let Some(value) = dynamic_window_parameters.get(LINK_STATE_CUES_KEY) else {
        return Ok(Vec::new());
    };

    let raw = serde_json::to_value(value).map_err(|e| {
        MatchError::InvalidConfiguration(format!("unreadable {LINK_STATE_CUES_KEY}: {e}"))
    })?;
    serde_json::from_value(raw).map_err(|e| {
        MatchError::InvalidConfiguration(format!("unreadable {LINK_STATE_CUES_KEY}: {e}"))
    })
}
