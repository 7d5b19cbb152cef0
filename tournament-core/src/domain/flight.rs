use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightStatus {
    Open,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub flight_number: u32,
    pub status: FlightStatus,
    pub notes: Option<String>,
    pub version: i64,
}
