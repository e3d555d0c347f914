//! Channel compatibility rules.
//!
//! The cheap gate run before any merging: channel identity, legal and
//! enabled flags, directionality, and mutual license-country admission.

use crate::models::{AssetChannel, AssetKind, Directionality};
use thiserror::Error;

/// Why two channel records cannot be matched.
///
/// Each variant renders to a stable reason string; these end up in
/// [`MatchResult::reason`](crate::engine::MatchResult) rather than being
/// raised as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Incompatibility {
    #[error("channel names differ: satellite has {satellite}, ground station has {ground_station}")]
    NameMismatch {
        satellite: String,
        ground_station: String,
    },
    #[error("{0} channel is not legal")]
    NotLegal(AssetKind),
    #[error("{0} channel is not enabled")]
    NotEnabled(AssetKind),
    #[error("directionality differs: satellite is {satellite}, ground station is {ground_station}")]
    DirectionalityMismatch {
        satellite: Directionality,
        ground_station: Directionality,
    },
    #[error("{asset} license country {country} is not allowed by the other side")]
    LicenseCountryNotAllowed { asset: AssetKind, country: String },
}

/// Check whether a satellite channel and a ground station channel are
/// compatible.
///
/// Rules run in a fixed order and stop at the first failure, so the reported
/// reason is reproducible for a given input pair. Pure predicate; nothing is
/// merged here.
pub fn check_compatibility(
    satellite: &AssetChannel,
    ground_station: &AssetChannel,
) -> Result<(), Incompatibility> {
    let sat = &satellite.record;
    let gs = &ground_station.record;

    if sat.name != gs.name {
        return Err(Incompatibility::NameMismatch {
            satellite: sat.name.clone(),
            ground_station: gs.name.clone(),
        });
    }

    if !sat.legal {
        return Err(Incompatibility::NotLegal(AssetKind::Satellite));
    }
    if !gs.legal {
        return Err(Incompatibility::NotLegal(AssetKind::GroundStation));
    }
    if !sat.enabled {
        return Err(Incompatibility::NotEnabled(AssetKind::Satellite));
    }
    if !gs.enabled {
        return Err(Incompatibility::NotEnabled(AssetKind::GroundStation));
    }

    if sat.directionality != gs.directionality {
        return Err(Incompatibility::DirectionalityMismatch {
            satellite: sat.directionality,
            ground_station: gs.directionality,
        });
    }

    // Mutual requirement: each side's own license country must be admitted
    // by the other side's allow list.
    if !gs.allowed_license_countries.contains(&satellite.license_country) {
        return Err(Incompatibility::LicenseCountryNotAllowed {
            asset: AssetKind::Satellite,
            country: satellite.license_country.clone(),
        });
    }
    if !sat.allowed_license_countries.contains(&ground_station.license_country) {
        return Err(Incompatibility::LicenseCountryNotAllowed {
            asset: AssetKind::GroundStation,
            country: ground_station.license_country.clone(),
        });
    }

    Ok(())
}
