//! Core data models for channel matching.

use crate::params::ParameterTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Which way a channel may carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directionality {
    Bidirectional,
    SpaceToEarth,
    EarthToSpace,
}

impl fmt::Display for Directionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Directionality::Bidirectional => "Bidirectional",
            Directionality::SpaceToEarth => "SpaceToEarth",
            Directionality::EarthToSpace => "EarthToSpace",
        };
        f.write_str(label)
    }
}

/// The two kinds of asset a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Satellite,
    GroundStation,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetKind::Satellite => "satellite",
            AssetKind::GroundStation => "ground station",
        };
        f.write_str(label)
    }
}

/// One elevation band of a link profile.
///
/// A segment covers all elevations at or above its threshold until a
/// higher-threshold segment supersedes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkProfileSegment {
    pub min_elevation_deg: f64,
    pub downlink_rate_kbps: f64,
    pub uplink_rate_kbps: f64,
    /// Minimum continuous time above the threshold for this band to count.
    #[serde(default)]
    pub min_duration_s: f64,
    /// Elevation-dependent parameter overrides.
    #[serde(default)]
    pub window_parameters: ParameterTree,
}

impl LinkProfileSegment {
    /// Validate segment values. Returns a list of problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.min_elevation_deg.is_finite() {
            errors.push(format!(
                "min_elevation_deg ({}) must be a finite number",
                self.min_elevation_deg
            ));
        }
        if !self.downlink_rate_kbps.is_finite() || self.downlink_rate_kbps < 0.0 {
            errors.push(format!(
                "downlink_rate_kbps ({}) must be non-negative",
                self.downlink_rate_kbps
            ));
        }
        if !self.uplink_rate_kbps.is_finite() || self.uplink_rate_kbps < 0.0 {
            errors.push(format!(
                "uplink_rate_kbps ({}) must be non-negative",
                self.uplink_rate_kbps
            ));
        }
        if !self.min_duration_s.is_finite() || self.min_duration_s < 0.0 {
            errors.push(format!(
                "min_duration_s ({}) must be non-negative",
                self.min_duration_s
            ));
        }

        errors
    }
}

/// A channel configuration as authored for one asset.
///
/// Records arrive already parsed and schema-checked; file handling and
/// structural validation belong to the editing tool. The engine still
/// rejects values it cannot merge soundly (see [`ChannelRecord::validate`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    /// Channel identifier. Both sides of a match must use the same name.
    pub name: String,
    pub legal: bool,
    pub enabled: bool,
    pub directionality: Directionality,
    /// Contact type announced to the scheduler; defaults to the channel name.
    #[serde(default)]
    pub contact_type: Option<String>,
    /// Setup/teardown allowance around the contact window.
    #[serde(default)]
    pub contact_overhead_s: f64,
    /// License countries of counterpart assets this channel may talk to.
    pub allowed_license_countries: BTreeSet<String>,
    /// Elevation-banded link performance. Author order is not significant;
    /// the merge sorts defensively.
    #[serde(default)]
    pub link_profile: Vec<LinkProfileSegment>,
    /// Static parameters passed to the radio/ground equipment.
    #[serde(default)]
    pub window_parameters: ParameterTree,
    /// Per-contact dynamic parameters; may embed `link_state_cues`.
    #[serde(default)]
    pub dynamic_window_parameters: ParameterTree,
    /// Asset-specific scheduling constraints, passed through uninterpreted.
    #[serde(default)]
    pub constraints: Option<serde_json::Value>,
}

impl ChannelRecord {
    /// Contact type for scheduling, falling back to the channel name.
    pub fn effective_contact_type(&self) -> &str {
        self.contact_type.as_deref().unwrap_or(&self.name)
    }

    /// Validate the record. Returns a list of problems (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Channel name must not be empty".to_string());
        }
        if !self.contact_overhead_s.is_finite() || self.contact_overhead_s < 0.0 {
            errors.push(format!(
                "contact_overhead_s ({}) must be a non-negative number of seconds",
                self.contact_overhead_s
            ));
        }
        errors.extend(crate::profile::validate_profile(&self.link_profile));

        errors
    }

    /// Check if the record is valid.
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// A channel record paired with the license country of the asset that
/// advertises it.
///
/// License countries are asset master data kept outside the channel record;
/// the caller looks them up and supplies them here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetChannel {
    pub record: ChannelRecord,
    pub license_country: String,
}
