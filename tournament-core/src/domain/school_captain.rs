use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A school's designated point of contact for roster edits. Authentication
/// against `pin_hash` is an external collaborator's concern; this entity
/// only carries the identity and the hash to check it against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolCaptain {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub school_name: String,
    pub pin_hash: String,
    pub version: i64,
}
