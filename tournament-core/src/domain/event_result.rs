use super::common::CompetitorType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Pending,
    Completed,
}

/// One competitor's (or partnered pair's) recorded outcome for one event.
/// For dual-run events both `run1_value`/`run2_value` are populated and
/// `best_run` is the one scoring counts; for single-run events only
/// `run1_value`/`best_run` are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResult {
    pub id: Uuid,
    pub event_id: Uuid,
    pub competitor_id: Uuid,
    pub competitor_type: CompetitorType,
    pub competitor_name: String,
    pub partner_name: Option<String>,
    pub run1_value: Option<f64>,
    pub run2_value: Option<f64>,
    pub best_run: Option<f64>,
    pub result_unit: Option<String>,
    pub final_position: Option<u32>,
    pub points_awarded: u32,
    pub payout_amount: f64,
    pub is_flagged: bool,
    pub status: ResultStatus,
    pub version: i64,
}
