//! Registration and heat validators. Each function returns a
//! `ValidationResult` of errors (block submission) and warnings (surface
//! to the registrar but don't block).

use crate::config::{MAX_CLOSED_EVENTS_PER_ATHLETE, MAX_TEAM_SIZE, MIN_TEAM_SIZE_PER_GENDER};
use crate::domain::{CollegeCompetitor, Event, Gender, Heat, ProCompetitor, Team};
use crate::utils::validation::ValidationResult;
use std::collections::HashMap;
use uuid::Uuid;

/// A team must have at least `MIN_TEAM_SIZE_PER_GENDER` of each gender and
/// no more than `MAX_TEAM_SIZE` total members.
pub fn validate_team(team: &Team, members: &[CollegeCompetitor]) -> ValidationResult {
    let mut result = ValidationResult::new();

    let males = members.iter().filter(|m| m.gender == Gender::Male).count();
    let females = members.iter().filter(|m| m.gender == Gender::Female).count();

    if males < MIN_TEAM_SIZE_PER_GENDER {
        result.add_error(
            "INSUFFICIENT_MALES",
            format!("team needs at least {MIN_TEAM_SIZE_PER_GENDER} male competitors, has {males}"),
            Some("members".into()),
            Some(team.id),
        );
    }
    if females < MIN_TEAM_SIZE_PER_GENDER {
        result.add_error(
            "INSUFFICIENT_FEMALES",
            format!("team needs at least {MIN_TEAM_SIZE_PER_GENDER} female competitors, has {females}"),
            Some("members".into()),
            Some(team.id),
        );
    }
    if members.len() > MAX_TEAM_SIZE {
        result.add_error(
            "TEAM_TOO_LARGE",
            format!("team has {} members, max is {MAX_TEAM_SIZE}", members.len()),
            Some("members".into()),
            Some(team.id),
        );
    }
    if members.len() < MIN_TEAM_SIZE_PER_GENDER * 2 {
        result.add_error(
            "TEAM_TOO_SMALL",
            format!("team has {} members, minimum is {}", members.len(), MIN_TEAM_SIZE_PER_GENDER * 2),
            Some("members".into()),
            Some(team.id),
        );
    } else if members.len() == MIN_TEAM_SIZE_PER_GENDER * 2 {
        result.add_warning(
            "TEAM_AT_MINIMUM",
            "team is at the minimum roster size with no substitutes".to_string(),
            Some("members".into()),
            Some(team.id),
        );
    }

    result
}

pub fn validate_college_competitor(
    competitor: &CollegeCompetitor,
    closed_event_ids: &[Uuid],
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if competitor.name.trim().is_empty() {
        result.add_error(
            "MISSING_FIELD",
            "competitor name is required".to_string(),
            Some("name".into()),
            Some(competitor.id),
        );
    }
    if competitor.team_id.is_nil() {
        result.add_error(
            "NO_TEAM",
            "competitor must belong to a team".to_string(),
            Some("team_id".into()),
            Some(competitor.id),
        );
    }

    let closed_entered = competitor.closed_events_count(closed_event_ids);
    if closed_entered > MAX_CLOSED_EVENTS_PER_ATHLETE {
        result.add_error(
            "TOO_MANY_CLOSED_EVENTS",
            format!(
                "competitor is entered in {closed_entered} closed events, max is {MAX_CLOSED_EVENTS_PER_ATHLETE}"
            ),
            Some("events_entered".into()),
            Some(competitor.id),
        );
    }
    if competitor.events_entered.is_empty() {
        result.add_warning(
            "NO_EVENTS",
            "competitor is not entered in any events".to_string(),
            Some("events_entered".into()),
            Some(competitor.id),
        );
    }

    result
}

pub fn validate_pro_competitor(competitor: &ProCompetitor) -> ValidationResult {
    let mut result = ValidationResult::new();

    if competitor.name.trim().is_empty() {
        result.add_error(
            "MISSING_FIELD",
            "competitor name is required".to_string(),
            Some("name".into()),
            Some(competitor.id),
        );
    }
    if !competitor.is_ala_member {
        result.add_warning(
            "NOT_ALA_MEMBER",
            "competitor is not a current ALA member".to_string(),
            Some("is_ala_member".into()),
            Some(competitor.id),
        );
    }
    if competitor.fees_balance() > 0.0 {
        result.add_warning(
            "UNPAID_FEES",
            format!("competitor owes ${:.2} in unpaid entry fees", competitor.fees_balance()),
            Some("fees_paid".into()),
            Some(competitor.id),
        );
    }

    result
}

/// Checks a heat for overcapacity against its event's stand limit and for
/// gear-sharing conflicts among simultaneous competitors (the same saw or
/// shared-stand group assigned to more than one party in a heat).
pub fn validate_heat(
    heat: &Heat,
    event: &Event,
    gear_sharing: &HashMap<Uuid, Vec<crate::domain::GearShare>>,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    if let Some(max_stands) = event.max_stands {
        if heat.competitors.len() > max_stands as usize {
            result.add_error(
                "HEAT_OVERCAPACITY",
                format!(
                    "heat has {} competitors, stand capacity is {max_stands}",
                    heat.competitors.len()
                ),
                Some("competitors".into()),
                Some(heat.id),
            );
        }
    }

    for (i, competitor_id) in heat.competitors.iter().enumerate() {
        let Some(shares) = gear_sharing.get(competitor_id) else {
            continue;
        };
        for share in shares {
            if let crate::domain::GearShareTarget::Competitor(other) = &share.target {
                let other_seated = heat.competitors[..i].contains(other) || heat.competitors[i + 1..].contains(other);
                if other_seated {
                    result.add_error(
                        "GEAR_SHARING_CONFLICT",
                        format!("competitor shares gear with {other}, who is seated in the same heat"),
                        Some("gear_sharing".into()),
                        Some(*competitor_id),
                    );
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorStatus, TeamStatus};
    use std::collections::HashMap as Map;

    fn team() -> Team {
        Team {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            team_code: "ABC".into(),
            school_name: "State U".into(),
            school_abbrev: "SU".into(),
            total_points: 0,
            status: TeamStatus::Active,
            version: 0,
        }
    }

    fn competitor(team_id: Uuid, gender: Gender) -> CollegeCompetitor {
        CollegeCompetitor {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            team_id,
            name: "Jo".into(),
            gender,
            individual_points: 0,
            events_entered: vec![],
            partners: Map::new(),
            gear_sharing: Map::new(),
            lottery_opt_in: false,
            is_ala_member: false,
            status: CompetitorStatus::Active,
            version: 0,
        }
    }

    #[test]
    fn flags_insufficient_gender_counts() {
        let t = team();
        let members = vec![competitor(t.id, Gender::Male), competitor(t.id, Gender::Male)];
        let result = validate_team(&t, &members);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.code == "INSUFFICIENT_FEMALES"));
        assert!(result.errors.iter().any(|e| e.code == "TEAM_TOO_SMALL"));
    }

    #[test]
    fn warns_at_exact_minimum_roster() {
        let t = team();
        let members = vec![
            competitor(t.id, Gender::Male),
            competitor(t.id, Gender::Male),
            competitor(t.id, Gender::Female),
            competitor(t.id, Gender::Female),
        ];
        let result = validate_team(&t, &members);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.code == "TEAM_AT_MINIMUM"));
    }
}
