pub mod compat;
pub mod cues;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;
pub mod profile;

pub use compat::{check_compatibility, Incompatibility};
pub use cues::{
    extract_cues, resolve_cues, validate_cue_set, CueOffset, CueSchedule, LinkStateCue,
    ResolvedCue, LINK_STATE_CUES_KEY,
};
pub use engine::{match_channels, match_channels_with_duration, MatchResult};
pub use error::MatchError;
pub use models::{AssetChannel, AssetKind, ChannelRecord, Directionality, LinkProfileSegment};
pub use params::{merge_parameters, ParamValue, ParameterTree};
pub use profile::{merge_profiles, normalize_profile, validate_profile, CombinedSegment};
