//! College and pro competitors. Both replace ad hoc JSON blobs
//! (`events_entered`, `partners`, `gear_sharing`, and a
//! `meta["lottery_opt_in"]` key) with typed fields.

use super::common::{Gender, GearShare};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorStatus {
    Active,
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegeCompetitor {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub individual_points: u32,
    pub events_entered: Vec<Uuid>,
    /// event id -> partner competitor id, for partnered events.
    pub partners: HashMap<Uuid, Uuid>,
    /// event id -> declared gear-sharing arrangement.
    pub gear_sharing: HashMap<Uuid, GearShare>,
    pub lottery_opt_in: bool,
    pub is_ala_member: bool,
    pub status: CompetitorStatus,
    pub version: i64,
}

impl CollegeCompetitor {
    pub fn closed_events_count(&self, closed_event_ids: &[Uuid]) -> usize {
        self.events_entered
            .iter()
            .filter(|id| closed_event_ids.contains(id))
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProCompetitor {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub contact: Option<String>,
    pub is_ala_member: bool,
    pub lottery_opt_in: bool,
    pub is_left_handed_springboard: bool,
    pub events_entered: Vec<Uuid>,
    pub partners: HashMap<Uuid, Uuid>,
    pub gear_sharing: HashMap<Uuid, GearShare>,
    /// event id -> entry fee owed.
    pub entry_fees: HashMap<Uuid, f64>,
    /// event id -> whether the fee has been paid.
    pub fees_paid: HashMap<Uuid, bool>,
    pub total_earnings: f64,
    pub payout_settled: bool,
    pub status: CompetitorStatus,
    pub version: i64,
}

impl ProCompetitor {
    /// Sum of entry fees for events not yet marked paid.
    pub fn fees_balance(&self) -> f64 {
        self.entry_fees
            .iter()
            .filter(|(event_id, _)| !self.fees_paid.get(*event_id).copied().unwrap_or(false))
            .map(|(_, fee)| fee)
            .sum()
    }
}
