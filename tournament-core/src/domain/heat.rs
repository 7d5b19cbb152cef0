use super::common::CompetitorType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatStatus {
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heat {
    pub id: Uuid,
    pub event_id: Uuid,
    pub heat_number: u32,
    /// 1 for single-run events, 1 or 2 for dual-run (springboard) events.
    pub run_number: u8,
    /// Competitors in draw order, as assigned by the snake-draft generator.
    pub competitors: Vec<Uuid>,
    /// competitor id -> stand number.
    pub stand_assignments: HashMap<Uuid, u16>,
    pub flight_id: Option<Uuid>,
    pub status: HeatStatus,
    pub version: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatAssignment {
    pub id: Uuid,
    pub heat_id: Uuid,
    pub competitor_id: Uuid,
    pub competitor_type: CompetitorType,
    pub stand_number: u16,
}
