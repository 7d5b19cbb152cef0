//! Small enums shared across more than one entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorType {
    College,
    Pro,
}

/// Closes an informal gear-sharing string vocabulary down to two concrete
/// categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearCategory {
    Crosscut,
    Chainsaw,
}

/// A competitor's declared gear-sharing arrangement for one event: either
/// naming the specific competitor they share with, or a group token shared
/// by more than two entrants (e.g. a whole crosscut saw rotation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum GearShareTarget {
    Competitor(Uuid),
    Group(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearShare {
    pub category: GearCategory,
    pub target: GearShareTarget,
}
