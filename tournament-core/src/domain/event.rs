use super::common::{CompetitorType, Gender};
use crate::brackets::BracketState;
use crate::config::StandType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDivision {
    College,
    Pro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringType {
    Time,
    Score,
    Distance,
    Hits,
    Bracket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringOrder {
    LowestWins,
    HighestWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerGenderRequirement {
    Same,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Pending,
    InProgress,
    Completed,
}

/// Pro events pay either a fixed position -> amount table, or pay out of
/// a bracket's terminal placements; college/list-only events pay nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EventPayouts {
    Fixed(HashMap<u32, f64>),
    Bracket(BracketState),
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub division: EventDivision,
    pub gender: Option<Gender>,
    pub scoring_type: ScoringType,
    pub scoring_order: ScoringOrder,
    pub is_open: bool,
    pub is_partnered: bool,
    pub partner_gender_requirement: Option<PartnerGenderRequirement>,
    pub requires_dual_runs: bool,
    pub stand_type: Option<StandType>,
    pub max_stands: Option<u16>,
    pub has_prelims: bool,
    pub payouts: EventPayouts,
    pub status: EventStatus,
    pub version: i64,
}

impl Event {
    pub fn competitor_type(&self) -> CompetitorType {
        match self.division {
            EventDivision::College => CompetitorType::College,
            EventDivision::Pro => CompetitorType::Pro,
        }
    }

    pub fn is_bracket(&self) -> bool {
        matches!(self.scoring_type, ScoringType::Bracket)
    }
}
