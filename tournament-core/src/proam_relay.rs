//! Pro-Am Relay lottery. Tracks relay state as a typed `ProAmRelayState`
//! rather than an untyped JSON blob.

use crate::config::RELAY_EVENTS;
use crate::domain::Gender;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayStatus {
    NotDrawn,
    Drawn,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayMember {
    pub competitor_id: Uuid,
    pub name: String,
    pub gender: Gender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelayEventStatus {
    Pending,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayEventSlot {
    pub event_key: String,
    pub result_seconds: Option<f64>,
    pub status: RelayEventStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayTeam {
    pub team_number: u32,
    pub name: String,
    pub pro_members: Vec<RelayMember>,
    pub college_members: Vec<RelayMember>,
    pub events: Vec<RelayEventSlot>,
    pub total_time_seconds: Option<f64>,
}

impl RelayTeam {
    fn new(team_number: u32) -> Self {
        RelayTeam {
            team_number,
            name: format!("Team {team_number}"),
            pro_members: Vec::new(),
            college_members: Vec::new(),
            events: RELAY_EVENTS
                .iter()
                .map(|key| RelayEventSlot {
                    event_key: key.to_string(),
                    result_seconds: None,
                    status: RelayEventStatus::Pending,
                })
                .collect(),
            total_time_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProAmRelayState {
    pub status: RelayStatus,
    pub teams: Vec<RelayTeam>,
    pub eligible_pro: Vec<RelayMember>,
    pub eligible_college: Vec<RelayMember>,
}

impl Default for ProAmRelayState {
    fn default() -> Self {
        ProAmRelayState {
            status: RelayStatus::NotDrawn,
            teams: Vec::new(),
            eligible_pro: Vec::new(),
            eligible_college: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotteryCapacity {
    pub pro_male: usize,
    pub pro_female: usize,
    pub college_male: usize,
    pub college_female: usize,
    pub max_teams: usize,
}

pub fn lottery_capacity(eligible_pro: &[RelayMember], eligible_college: &[RelayMember]) -> LotteryCapacity {
    let pro_male = eligible_pro.iter().filter(|m| m.gender == Gender::Male).count();
    let pro_female = eligible_pro.iter().filter(|m| m.gender == Gender::Female).count();
    let college_male = eligible_college.iter().filter(|m| m.gender == Gender::Male).count();
    let college_female = eligible_college
        .iter()
        .filter(|m| m.gender == Gender::Female)
        .count();

    LotteryCapacity {
        pro_male,
        pro_female,
        college_male,
        college_female,
        max_teams: (pro_male / 2).min(pro_female / 2).min(college_male / 2).min(college_female / 2),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("not enough {bucket} opted in: need {needed}, have {available}")]
    InsufficientPool {
        bucket: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("replacement competitor must match the same gender")]
    GenderMismatch,
    #[error("replacement competitor must be opted into the Pro-Am lottery")]
    NotOptedIn,
    #[error("team {0} not found")]
    TeamNotFound(u32),
    #[error("competitor {0} not found on team {1}")]
    MemberNotFound(Uuid, u32),
    #[error("unknown relay event key {0:?}")]
    UnknownEvent(String),
}

/// Draws `num_teams` teams of 2 pro men / 2 pro women / 2 college men / 2
/// college women each, from the shuffled eligible pools. Uses the caller's
/// rng so tests can seed it deterministically.
pub fn run_lottery(
    eligible_pro: Vec<RelayMember>,
    eligible_college: Vec<RelayMember>,
    num_teams: u32,
    rng: &mut impl rand::Rng,
) -> Result<ProAmRelayState, RelayError> {
    let mut pro_male: Vec<RelayMember> = eligible_pro
        .iter()
        .filter(|m| m.gender == Gender::Male)
        .cloned()
        .collect();
    let mut pro_female: Vec<RelayMember> = eligible_pro
        .iter()
        .filter(|m| m.gender == Gender::Female)
        .cloned()
        .collect();
    let mut college_male: Vec<RelayMember> = eligible_college
        .iter()
        .filter(|m| m.gender == Gender::Male)
        .cloned()
        .collect();
    let mut college_female: Vec<RelayMember> = eligible_college
        .iter()
        .filter(|m| m.gender == Gender::Female)
        .cloned()
        .collect();

    let required = (num_teams * 2) as usize;
    if pro_male.len() < required {
        return Err(RelayError::InsufficientPool {
            bucket: "pro men",
            needed: required,
            available: pro_male.len(),
        });
    }
    if pro_female.len() < required {
        return Err(RelayError::InsufficientPool {
            bucket: "pro women",
            needed: required,
            available: pro_female.len(),
        });
    }
    if college_male.len() < required {
        return Err(RelayError::InsufficientPool {
            bucket: "college men",
            needed: required,
            available: college_male.len(),
        });
    }
    if college_female.len() < required {
        return Err(RelayError::InsufficientPool {
            bucket: "college women",
            needed: required,
            available: college_female.len(),
        });
    }

    pro_male.shuffle(rng);
    pro_female.shuffle(rng);
    college_male.shuffle(rng);
    college_female.shuffle(rng);

    let mut teams = Vec::with_capacity(num_teams as usize);
    for team_number in 1..=num_teams {
        let mut team = RelayTeam::new(team_number);
        team.pro_members.push(pro_male.remove(0));
        team.pro_members.push(pro_male.remove(0));
        team.pro_members.push(pro_female.remove(0));
        team.pro_members.push(pro_female.remove(0));
        team.college_members.push(college_male.remove(0));
        team.college_members.push(college_male.remove(0));
        team.college_members.push(college_female.remove(0));
        team.college_members.push(college_female.remove(0));
        team.pro_members.shuffle(rng);
        team.college_members.shuffle(rng);
        teams.push(team);
    }

    Ok(ProAmRelayState {
        status: RelayStatus::Drawn,
        teams,
        eligible_pro,
        eligible_college,
    })
}

/// Records one team's time for one relay event, recomputing the team's
/// total (only once all four legs are in) and the overall relay status.
pub fn record_event_result(
    state: &mut ProAmRelayState,
    team_number: u32,
    event_key: &str,
    time_seconds: f64,
) -> Result<(), RelayError> {
    if !RELAY_EVENTS.contains(&event_key) {
        return Err(RelayError::UnknownEvent(event_key.to_string()));
    }
    let team = state
        .teams
        .iter_mut()
        .find(|t| t.team_number == team_number)
        .ok_or(RelayError::TeamNotFound(team_number))?;

    let slot = team
        .events
        .iter_mut()
        .find(|e| e.event_key == event_key)
        .expect("event_key validated against RELAY_EVENTS above");
    slot.result_seconds = Some(time_seconds);
    slot.status = RelayEventStatus::Completed;

    let all_complete = team.events.iter().all(|e| e.result_seconds.is_some());
    team.total_time_seconds = if all_complete {
        Some(team.events.iter().filter_map(|e| e.result_seconds).sum())
    } else {
        None
    };

    state.status = RelayStatus::InProgress;
    if state
        .teams
        .iter()
        .all(|t| t.events.iter().all(|e| e.status == RelayEventStatus::Completed))
    {
        state.status = RelayStatus::Completed;
    }

    Ok(())
}

/// Relay results sorted by ascending total time; teams still missing a
/// leg are excluded.
pub fn relay_results(state: &ProAmRelayState) -> Vec<&RelayTeam> {
    let mut completed: Vec<&RelayTeam> = state
        .teams
        .iter()
        .filter(|t| t.total_time_seconds.is_some())
        .collect();
    completed.sort_by(|a, b| {
        a.total_time_seconds
            .partial_cmp(&b.total_time_seconds)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    completed
}

#[derive(Debug, Clone, Copy)]
pub enum RelayDivision {
    Pro,
    College,
}

/// Swaps a team member for an injury/withdrawal replacement. The
/// replacement must share the departing member's gender and be opted
/// into the lottery (checked by the caller via `replacement_opted_in`,
/// since opt-in isn't part of `RelayMember`).
pub fn replace_competitor(
    state: &mut ProAmRelayState,
    team_number: u32,
    old_competitor_id: Uuid,
    division: RelayDivision,
    replacement: RelayMember,
    replacement_opted_in: bool,
) -> Result<(), RelayError> {
    if !replacement_opted_in {
        return Err(RelayError::NotOptedIn);
    }
    let team = state
        .teams
        .iter_mut()
        .find(|t| t.team_number == team_number)
        .ok_or(RelayError::TeamNotFound(team_number))?;

    let members = match division {
        RelayDivision::Pro => &mut team.pro_members,
        RelayDivision::College => &mut team.college_members,
    };

    let slot = members
        .iter_mut()
        .find(|m| m.competitor_id == old_competitor_id)
        .ok_or(RelayError::MemberNotFound(old_competitor_id, team_number))?;

    if slot.gender != replacement.gender {
        return Err(RelayError::GenderMismatch);
    }

    *slot = replacement;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(count: usize, gender: Gender) -> Vec<RelayMember> {
        (0..count)
            .map(|_| RelayMember {
                competitor_id: Uuid::new_v4(),
                name: "Jo".into(),
                gender,
            })
            .collect()
    }

    fn eligible_pro() -> Vec<RelayMember> {
        let mut v = pool(2, Gender::Male);
        v.extend(pool(2, Gender::Female));
        v
    }

    fn eligible_college() -> Vec<RelayMember> {
        let mut v = pool(2, Gender::Male);
        v.extend(pool(2, Gender::Female));
        v
    }

    #[test]
    fn lottery_produces_one_balanced_team() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = run_lottery(eligible_pro(), eligible_college(), 1, &mut rng).unwrap();
        assert_eq!(state.status, RelayStatus::Drawn);
        assert_eq!(state.teams.len(), 1);
        let team = &state.teams[0];
        assert_eq!(team.pro_members.len(), 4);
        assert_eq!(team.college_members.len(), 4);
        assert_eq!(
            team.pro_members.iter().filter(|m| m.gender == Gender::Male).count(),
            2
        );
    }

    #[test]
    fn lottery_rejects_undersized_pools() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = run_lottery(eligible_pro(), eligible_college(), 2, &mut rng).unwrap_err();
        assert!(matches!(err, RelayError::InsufficientPool { .. }));
    }

    #[test]
    fn capacity_is_bounded_by_the_smallest_bucket() {
        let mut pro = pool(4, Gender::Male);
        pro.extend(pool(2, Gender::Female));
        let college = eligible_college();
        let capacity = lottery_capacity(&pro, &college);
        assert_eq!(capacity.max_teams, 1);
    }

    #[test]
    fn recording_all_four_legs_completes_the_team_and_relay() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = run_lottery(eligible_pro(), eligible_college(), 1, &mut rng).unwrap();
        for event in RELAY_EVENTS {
            record_event_result(&mut state, 1, event, 10.0).unwrap();
        }
        assert_eq!(state.status, RelayStatus::Completed);
        assert_eq!(state.teams[0].total_time_seconds, Some(40.0));
    }

    #[test]
    fn replace_competitor_rejects_gender_mismatch() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = run_lottery(eligible_pro(), eligible_college(), 1, &mut rng).unwrap();
        let old_id = state.teams[0].pro_members[0].competitor_id;
        let replacement = RelayMember {
            competitor_id: Uuid::new_v4(),
            name: "Sub".into(),
            gender: if state.teams[0].pro_members[0].gender == Gender::Male {
                Gender::Female
            } else {
                Gender::Male
            },
        };
        let err = replace_competitor(&mut state, 1, old_id, RelayDivision::Pro, replacement, true)
            .unwrap_err();
        assert!(matches!(err, RelayError::GenderMismatch));
    }
}
