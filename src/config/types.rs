use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Which distance measure the scanner uses to compare normalized windows.
///
/// Parsing is case-insensitive and accepts the older names (`euclidean`, `dtw`)
/// so payloads written against them keep working.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(try_from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum MatchMethod {
    /// Point-wise Euclidean distance. Both windows must have the same length.
    #[default]
    #[strum(to_string = "rigid", serialize = "euclidean")]
    Rigid,
    /// Dynamic time warping. Tolerates stretched or compressed shapes.
    #[strum(to_string = "elastic", serialize = "dtw")]
    Elastic,
}

impl TryFrom<String> for MatchMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse()
            .map_err(|_| format!("unknown match method '{}' (expected rigid or elastic)", value))
    }
}

impl From<MatchMethod> for String {
    fn from(method: MatchMethod) -> Self {
        method.to_string()
    }
}
