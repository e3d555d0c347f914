//! Link profile normalization and the elevation-band segment merger.
//!
//! Two assets author their link profiles independently; before a contact can
//! be planned the two band sets have to be folded into a single combined
//! profile the scheduler can rate-plan against.

use crate::error::MatchError;
use crate::models::LinkProfileSegment;
use crate::params::{merge_parameters, ParameterTree};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One elevation band of a merged link profile.
///
/// Same shape as [`LinkProfileSegment`] but always the output of a merge,
/// never hand-authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedSegment {
    pub min_elevation_deg: f64,
    pub downlink_rate_kbps: f64,
    pub uplink_rate_kbps: f64,
    pub min_duration_s: f64,
    /// Fully merged window parameters for this band.
    #[serde(default)]
    pub window_parameters: ParameterTree,
}

impl CombinedSegment {
    /// Carry a segment through unmerged, for elevations where only one
    /// profile has coverage.
    fn carried(segment: &LinkProfileSegment) -> Self {
        Self {
            min_elevation_deg: segment.min_elevation_deg,
            downlink_rate_kbps: segment.downlink_rate_kbps,
            uplink_rate_kbps: segment.uplink_rate_kbps,
            min_duration_s: segment.min_duration_s,
            window_parameters: segment.window_parameters.clone(),
        }
    }
}

/// Validate one profile's segments. Returns a list of problems (empty = valid).
pub fn validate_profile(segments: &[LinkProfileSegment]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut thresholds: Vec<f64> = Vec::new();

    for segment in segments {
        errors.extend(segment.validate());
        if !segment.min_elevation_deg.is_finite() {
            continue;
        }
        if thresholds.contains(&segment.min_elevation_deg) {
            errors.push(format!(
                "duplicate min_elevation_deg {} in link profile",
                segment.min_elevation_deg
            ));
        } else {
            thresholds.push(segment.min_elevation_deg);
        }
    }

    errors
}

/// Sort a profile by descending elevation threshold.
///
/// Authors are not required to order their segments; this is the
/// normalization step at the entry of the merge. Malformed segments are
/// rejected rather than repaired.
pub fn normalize_profile(
    segments: &[LinkProfileSegment],
) -> Result<Vec<LinkProfileSegment>, MatchError> {
    let errors = validate_profile(segments);
    if !errors.is_empty() {
        return Err(MatchError::InvalidConfiguration(errors.join("; ")));
    }

    let mut sorted = segments.to_vec();
    sorted.sort_by(|a, b| {
        b.min_elevation_deg
            .partial_cmp(&a.min_elevation_deg)
            .unwrap_or(Ordering::Equal)
    });
    Ok(sorted)
}

/// The applicable segment at `elevation_deg`: the one with the greatest
/// threshold not above it. Expects a profile sorted descending.
fn applicable_segment(
    profile: &[LinkProfileSegment],
    elevation_deg: f64,
) -> Option<&LinkProfileSegment> {
    profile.iter().find(|s| s.min_elevation_deg <= elevation_deg)
}

/// Merge two link profiles into one combined profile.
///
/// Break points are the descending union of both sides' thresholds. At each
/// break point the applicable segment from each side is combined: rates take
/// the minimum, the minimum duration comes from the parent with the strictly
/// higher threshold (max on a tie), and window parameters merge with the
/// lower-threshold parent as primary, since the broader band's overrides
/// stay in force until a narrower band replaces them. On a threshold tie the
/// first profile is primary.
///
/// A side with no coverage at a break point contributes nothing; the other
/// side's segment is carried through whole. An empty profile means "no
/// elevation constraint", so the result is the other profile unchanged.
pub fn merge_profiles(
    profile_a: &[LinkProfileSegment],
    profile_b: &[LinkProfileSegment],
) -> Result<Vec<CombinedSegment>, MatchError> {
    let a = normalize_profile(profile_a)?;
    let b = normalize_profile(profile_b)?;

    let mut break_points: Vec<f64> = a
        .iter()
        .chain(b.iter())
        .map(|s| s.min_elevation_deg)
        .collect();
    break_points.sort_by(|x, y| y.partial_cmp(x).unwrap_or(Ordering::Equal));
    break_points.dedup();

    let mut combined = Vec::with_capacity(break_points.len());
    for &elevation in &break_points {
        let segment = match (applicable_segment(&a, elevation), applicable_segment(&b, elevation)) {
            (Some(x), Some(y)) => combine(x, y, elevation),
            (Some(x), None) => CombinedSegment::carried(x),
            (None, Some(y)) => CombinedSegment::carried(y),
            // Every break point is a threshold of one of the two profiles,
            // so at least one side always applies.
            (None, None) => continue,
        };
        combined.push(segment);
    }

    Ok(combined)
}

fn combine(a: &LinkProfileSegment, b: &LinkProfileSegment, elevation: f64) -> CombinedSegment {
    let (min_duration_s, window_parameters) =
        match a.min_elevation_deg.partial_cmp(&b.min_elevation_deg) {
            Some(Ordering::Greater) => (
                a.min_duration_s,
                merge_parameters(&b.window_parameters, &a.window_parameters),
            ),
            Some(Ordering::Less) => (
                b.min_duration_s,
                merge_parameters(&a.window_parameters, &b.window_parameters),
            ),
            _ => (
                a.min_duration_s.max(b.min_duration_s),
                merge_parameters(&a.window_parameters, &b.window_parameters),
            ),
        };

    CombinedSegment {
        min_elevation_deg: elevation,
        downlink_rate_kbps: a.downlink_rate_kbps.min(b.downlink_rate_kbps),
        uplink_rate_kbps: a.uplink_rate_kbps.min(b.uplink_rate_kbps),
        min_duration_s,
        window_parameters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segment(min_elevation_deg: f64, min_duration_s: f64) -> LinkProfileSegment {
        LinkProfileSegment {
            min_elevation_deg,
            downlink_rate_kbps: 1000.0,
            uplink_rate_kbps: 10.0,
            min_duration_s,
            window_parameters: ParameterTree::new(),
        }
    }

    fn params(value: serde_json::Value) -> ParameterTree {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn normalize_sorts_descending_regardless_of_author_order() {
        let profile = vec![segment(10.0, 0.0), segment(90.0, 0.0), segment(60.0, 0.0)];

        let normalized = normalize_profile(&profile).unwrap();
        let thresholds: Vec<f64> = normalized.iter().map(|s| s.min_elevation_deg).collect();
        assert_eq!(thresholds, vec![90.0, 60.0, 10.0]);
    }

    #[test]
    fn normalize_rejects_duplicate_thresholds() {
        let profile = vec![segment(25.0, 0.0), segment(25.0, 120.0)];

        let err = normalize_profile(&profile).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfiguration(_)));
    }

    #[test]
    fn normalize_rejects_negative_rates() {
        let mut bad = segment(10.0, 0.0);
        bad.uplink_rate_kbps = -5.6;

        let err = normalize_profile(&[bad]).unwrap_err();
        assert!(matches!(err, MatchError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_profile_is_identity() {
        let profile = vec![segment(25.0, 120.0), segment(10.0, 0.0)];

        let combined = merge_profiles(&profile, &[]).unwrap();
        assert_eq!(combined.len(), 2);
        for (merged, original) in combined.iter().zip(&profile) {
            assert_eq!(merged, &CombinedSegment::carried(original));
        }

        // Symmetric case, and two empty profiles merge to an empty profile.
        assert_eq!(merge_profiles(&[], &profile).unwrap(), combined);
        assert!(merge_profiles(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn break_points_are_the_descending_union() {
        let a = vec![segment(90.0, 0.0), segment(60.0, 0.0), segment(10.0, 0.0)];
        let b = vec![segment(90.0, 0.0), segment(30.0, 0.0), segment(0.0, 0.0)];

        let combined = merge_profiles(&a, &b).unwrap();
        let thresholds: Vec<f64> = combined.iter().map(|s| s.min_elevation_deg).collect();
        assert_eq!(thresholds, vec![90.0, 60.0, 30.0, 10.0, 0.0]);
    }

    #[test]
    fn min_duration_follows_the_higher_threshold_parent() {
        let mut a = vec![segment(90.0, 900.0), segment(60.0, 600.0), segment(10.0, 100.0)];
        let mut b = vec![segment(90.0, 950.0), segment(30.0, 300.0), segment(0.0, 50.0)];
        // Give the sides distinct rates so rate provenance is visible too.
        for s in &mut a {
            s.downlink_rate_kbps = 1000.0;
        }
        for s in &mut b {
            s.downlink_rate_kbps = 300.0;
        }

        let combined = merge_profiles(&a, &b).unwrap();
        let durations: Vec<f64> = combined.iter().map(|s| s.min_duration_s).collect();

        // 90: both parents at 90 -> max(900, 950).
        // 60: A@60 vs carried B@30, A strictly higher -> A's 600.
        // 30: carried A@10 vs B@30, B strictly higher -> B's 300.
        // 10: A@10 vs carried B@0, A strictly higher -> A's 100.
        // 0:  A has no coverage -> B@0 carried through.
        assert_eq!(durations, vec![950.0, 600.0, 300.0, 100.0, 50.0]);
    }

    #[test]
    fn rates_never_exceed_either_parent() {
        let mut fast = segment(10.0, 0.0);
        fast.downlink_rate_kbps = 1000.0;
        fast.uplink_rate_kbps = 10.0;
        let mut slow = segment(25.0, 0.0);
        slow.downlink_rate_kbps = 240.0;
        slow.uplink_rate_kbps = 0.0;

        let combined = merge_profiles(&[fast], &[slow]).unwrap();
        assert_eq!(combined.len(), 2);
        // 25: both sides apply, rates take the min.
        assert_eq!(combined[0].downlink_rate_kbps, 240.0);
        assert_eq!(combined[0].uplink_rate_kbps, 0.0);
        // 10: only the first profile covers this low.
        assert_eq!(combined[1].downlink_rate_kbps, 1000.0);
        assert_eq!(combined[1].uplink_rate_kbps, 10.0);
    }

    #[test]
    fn window_parameters_prefer_the_broader_parent() {
        let mut high = segment(25.0, 0.0);
        high.window_parameters = params(json!({"beam": "narrow", "agc": "fast"}));
        let mut low = segment(5.0, 0.0);
        low.window_parameters = params(json!({"beam": "wide", "tracking": true}));

        let combined = merge_profiles(&[high], &[low]).unwrap();
        // At 25 both apply; the lower-threshold (broader) segment is primary.
        assert_eq!(
            combined[0].window_parameters,
            params(json!({"beam": "wide", "agc": "fast", "tracking": true}))
        );
        // At 5 only the low segment applies.
        assert_eq!(combined[1].window_parameters, params(json!({"beam": "wide", "tracking": true})));
    }

    #[test]
    fn window_parameters_tie_prefers_first_profile() {
        let mut a = segment(10.0, 0.0);
        a.window_parameters = params(json!({"beam": "narrow"}));
        let mut b = segment(10.0, 0.0);
        b.window_parameters = params(json!({"beam": "wide", "agc": "slow"}));

        let combined = merge_profiles(&[a], &[b]).unwrap();
        assert_eq!(
            combined[0].window_parameters,
            params(json!({"beam": "narrow", "agc": "slow"}))
        );
    }

    #[test]
    fn identical_adjacent_segments_are_not_collapsed() {
        let a = vec![segment(40.0, 0.0), segment(20.0, 0.0)];
        let b = vec![segment(30.0, 0.0)];

        let combined = merge_profiles(&a, &b).unwrap();
        // 40, 30, and 20 all materialize even though 40 and 30 carry the
        // same rates and durations.
        assert_eq!(combined.len(), 3);
        assert_eq!(combined[0].min_elevation_deg, 40.0);
        assert_eq!(combined[1].min_elevation_deg, 30.0);
        assert_eq!(combined[2].min_elevation_deg, 20.0);
    }

    #[test]
    fn lone_low_segment_is_carried_below_the_other_side() {
        let a = vec![segment(25.0, 120.0)];
        let b = vec![segment(0.0, 30.0)];

        let combined = merge_profiles(&a, &b).unwrap();
        assert_eq!(combined.len(), 2);
        assert_eq!(combined[0].min_elevation_deg, 25.0);
        assert_eq!(combined[0].min_duration_s, 120.0);
        // Below 25 only profile B covers; its segment passes through whole.
        assert_eq!(combined[1].min_elevation_deg, 0.0);
        assert_eq!(combined[1].min_duration_s, 30.0);
    }
}
