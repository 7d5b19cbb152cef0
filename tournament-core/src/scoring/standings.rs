//! Individual and team standings views.

use crate::domain::{CollegeCompetitor, Gender, Team};

pub struct RankedCompetitor {
    pub rank: u32,
    pub competitor: CollegeCompetitor,
}

pub struct RankedTeam {
    pub rank: u32,
    pub team: Team,
}

/// Individual standings sorted by points descending, optionally filtered
/// by gender and truncated to `limit`. Competitors tied on points share a
/// rank; the next distinct point total resumes at `index + 1`.
pub fn individual_standings(
    mut competitors: Vec<CollegeCompetitor>,
    gender: Option<Gender>,
    limit: Option<usize>,
) -> Vec<RankedCompetitor> {
    if let Some(gender) = gender {
        competitors.retain(|c| c.gender == gender);
    }
    competitors.sort_by(|a, b| b.individual_points.cmp(&a.individual_points));
    if let Some(limit) = limit {
        competitors.truncate(limit);
    }

    let mut standings = Vec::with_capacity(competitors.len());
    let mut current_rank = 1u32;
    let mut previous_points: Option<u32> = None;
    for (i, competitor) in competitors.into_iter().enumerate() {
        if previous_points != Some(competitor.individual_points) {
            current_rank = i as u32 + 1;
        }
        previous_points = Some(competitor.individual_points);
        standings.push(RankedCompetitor {
            rank: current_rank,
            competitor,
        });
    }
    standings
}

pub fn team_standings(mut teams: Vec<Team>, limit: Option<usize>) -> Vec<RankedTeam> {
    teams.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    if let Some(limit) = limit {
        teams.truncate(limit);
    }

    let mut standings = Vec::with_capacity(teams.len());
    let mut current_rank = 1u32;
    let mut previous_points: Option<u32> = None;
    for (i, team) in teams.into_iter().enumerate() {
        if previous_points != Some(team.total_points) {
            current_rank = i as u32 + 1;
        }
        previous_points = Some(team.total_points);
        standings.push(RankedTeam {
            rank: current_rank,
            team,
        });
    }
    standings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorStatus, TeamStatus};
    use std::collections::HashMap;
    use uuid::Uuid;

    fn competitor(points: u32, gender: Gender) -> CollegeCompetitor {
        CollegeCompetitor {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: "Jo".into(),
            gender,
            individual_points: points,
            events_entered: vec![],
            partners: HashMap::new(),
            gear_sharing: HashMap::new(),
            lottery_opt_in: false,
            is_ala_member: false,
            status: CompetitorStatus::Active,
            version: 0,
        }
    }

    #[test]
    fn ties_share_rank_and_next_rank_resumes_at_index() {
        let competitors = vec![
            competitor(20, Gender::Male),
            competitor(20, Gender::Female),
            competitor(10, Gender::Male),
        ];
        let ranked = individual_standings(competitors, None, None);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn gender_filter_excludes_other_gender() {
        let competitors = vec![competitor(20, Gender::Male), competitor(30, Gender::Female)];
        let ranked = individual_standings(competitors, Some(Gender::Female), None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].competitor.gender, Gender::Female);
    }

    #[test]
    fn team_standings_respect_limit() {
        let teams = vec![
            Team {
                id: Uuid::new_v4(),
                tournament_id: Uuid::new_v4(),
                team_code: "A".into(),
                school_name: "A U".into(),
                school_abbrev: "AU".into(),
                total_points: 30,
                status: TeamStatus::Active,
                version: 0,
            },
            Team {
                id: Uuid::new_v4(),
                tournament_id: Uuid::new_v4(),
                team_code: "B".into(),
                school_name: "B U".into(),
                school_abbrev: "BU".into(),
                total_points: 20,
                status: TeamStatus::Active,
                version: 0,
            },
        ];
        let ranked = team_standings(teams, Some(1));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].team.school_abbrev, "A");
    }
}
