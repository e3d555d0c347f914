//! Match orchestration.
//!
//! Composes the compatibility gate, the segment merger, the parameter merge,
//! and cue staging into the one entry point consumers call per candidate
//! (satellite, ground station) pair. Pure and deterministic: the same two
//! records always produce the same result, so callers may fan out over many
//! pairs concurrently without coordination.

use crate::compat::check_compatibility;
use crate::cues::{extract_cues, resolve_cues, validate_cue_set, CueSchedule};
use crate::error::MatchError;
use crate::models::{AssetChannel, AssetKind, ChannelRecord};
use crate::params::{merge_parameters, ParameterTree};
use crate::profile::{merge_profiles, CombinedSegment};
use serde::{Deserialize, Serialize};

/// Outcome of matching a satellite channel against a ground station channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub compatible: bool,
    /// Why the pair was rejected, when `compatible` is false.
    pub reason: Option<String>,
    /// Combined link profile, descending by elevation threshold.
    pub combined_profile: Option<Vec<CombinedSegment>>,
    /// Merged static window parameters; the satellite side wins collisions.
    pub window_parameters: Option<ParameterTree>,
    /// Cue data for the contact, resolved if a duration was supplied.
    pub link_state_cues: Option<CueSchedule>,
}

impl MatchResult {
    fn incompatible(reason: String) -> Self {
        Self {
            compatible: false,
            reason: Some(reason),
            combined_profile: None,
            window_parameters: None,
            link_state_cues: None,
        }
    }
}

/// Match two channel records without a known contact duration.
///
/// Cue data, if either side carries any, is threaded through unresolved;
/// the caller resolves it with [`resolve_cues`] once contact geometry fixes
/// a duration.
pub fn match_channels(
    satellite: &AssetChannel,
    ground_station: &AssetChannel,
) -> Result<MatchResult, MatchError> {
    run_match(satellite, ground_station, None)
}

/// Match two channel records and resolve cue offsets against an already
/// known contact duration.
pub fn match_channels_with_duration(
    satellite: &AssetChannel,
    ground_station: &AssetChannel,
    contact_duration_s: f64,
) -> Result<MatchResult, MatchError> {
    run_match(satellite, ground_station, Some(contact_duration_s))
}

fn run_match(
    satellite: &AssetChannel,
    ground_station: &AssetChannel,
    contact_duration_s: Option<f64>,
) -> Result<MatchResult, MatchError> {
    validate_record(AssetKind::Satellite, &satellite.record)?;
    validate_record(AssetKind::GroundStation, &ground_station.record)?;

    if let Err(incompatibility) = check_compatibility(satellite, ground_station) {
        tracing::debug!(
            "Rejected channel pair {}: {}",
            satellite.record.name,
            incompatibility
        );
        return Ok(MatchResult::incompatible(incompatibility.to_string()));
    }

    let combined_profile = merge_profiles(
        &satellite.record.link_profile,
        &ground_station.record.link_profile,
    )?;
    let window_parameters = merge_parameters(
        &satellite.record.window_parameters,
        &ground_station.record.window_parameters,
    );

    // Cues may come from either side; satellite-side cues come first and the
    // combined set must hold the at-most-one-offset-less invariant.
    let mut cue_list = extract_cues(&satellite.record.dynamic_window_parameters)?;
    cue_list.extend(extract_cues(&ground_station.record.dynamic_window_parameters)?);
    validate_cue_set(&cue_list)?;

    let link_state_cues = if cue_list.is_empty() {
        None
    } else {
        match contact_duration_s {
            Some(duration_s) => Some(CueSchedule::Resolved {
                cues: resolve_cues(&cue_list, duration_s)?,
            }),
            None => Some(CueSchedule::Pending { cues: cue_list }),
        }
    };

    tracing::debug!(
        "Matched channel pair {} with {} combined segments",
        satellite.record.name,
        combined_profile.len()
    );

    Ok(MatchResult {
        compatible: true,
        reason: None,
        combined_profile: Some(combined_profile),
        window_parameters: Some(window_parameters),
        link_state_cues,
    })
}

fn validate_record(kind: AssetKind, record: &ChannelRecord) -> Result<(), MatchError> {
    let problems = record.validate();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(MatchError::InvalidConfiguration(format!(
            "{kind} channel {}: {}",
            record.name,
            problems.join("; ")
        )))
    }
}
