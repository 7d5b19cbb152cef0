use crate::errors::Capability;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Judge,
    Scorer,
    Registrar,
    Competitor,
    Spectator,
}

impl Role {
    pub fn capabilities(&self) -> HashSet<Capability> {
        use Capability::*;
        match self {
            Role::Admin => HashSet::from([
                IsJudge, CanRegister, CanSchedule, CanScore, CanReport, CanManageUsers,
            ]),
            Role::Judge => HashSet::from([IsJudge, CanScore, CanReport]),
            Role::Scorer => HashSet::from([CanScore, CanReport]),
            Role::Registrar => HashSet::from([CanRegister, CanSchedule, CanReport]),
            Role::Competitor | Role::Spectator => HashSet::from([CanReport]),
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub tournament_id: Option<Uuid>,
    pub competitor_id: Option<Uuid>,
    pub version: i64,
}
