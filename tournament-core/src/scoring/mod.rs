//! Per-heat result ingest, placement, points/payout calculation, and
//! outlier detection. These are pure functions over already-loaded
//! domain values; persistence is the caller's job.

mod heat_submission;
mod standings;

pub use heat_submission::*;
pub use standings::*;

use crate::domain::{
    CollegeCompetitor, Event, EventPayouts, EventResult, EventStatus, ProCompetitor,
    ResultStatus, ScoringOrder, Team,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Competition ranking (1, 1, 3, 4, ...): equal `best_run` values share a
/// position, and the next distinct value resumes at `count + 1`, not
/// `rank + 1`. Only `Completed` results are ranked; everything else keeps
/// `final_position = None`.
pub fn calculate_placements(results: &mut [EventResult], scoring_order: ScoringOrder) {
    let mut indices: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status == ResultStatus::Completed)
        .map(|(i, _)| i)
        .collect();

    indices.sort_by(|&a, &b| {
        let va = results[a].best_run;
        let vb = results[b].best_run;
        let ordering = match (va, vb) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(std::cmp::Ordering::Equal),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        match scoring_order {
            ScoringOrder::LowestWins => ordering,
            ScoringOrder::HighestWins => ordering.reverse(),
        }
    });

    let mut current_position = 1u32;
    let mut tie_run = 0u32;
    let mut previous_value: Option<f64> = None;

    for (rank_index, &i) in indices.iter().enumerate() {
        let value = results[i].best_run;
        if rank_index == 0 {
            tie_run = 1;
        } else if value == previous_value {
            tie_run += 1;
        } else {
            current_position += tie_run;
            tie_run = 1;
        }
        results[i].final_position = Some(current_position);
        previous_value = value;
    }
}

/// Points for placed college results, keyed by competitor id. Does not
/// mutate any competitor; the caller applies the returned deltas.
pub fn award_college_points(results: &mut [EventResult]) -> HashMap<Uuid, u32> {
    let mut awarded = HashMap::new();
    for result in results.iter_mut() {
        let Some(position) = result.final_position else {
            continue;
        };
        if result.status != ResultStatus::Completed {
            continue;
        }
        let points = crate::config::placement_points(position);
        result.points_awarded = points;
        awarded.insert(result.competitor_id, points);
    }
    awarded
}

/// Payouts for placed pro results against the event's fixed payout table.
pub fn award_pro_payouts(
    results: &mut [EventResult],
    payout_table: &HashMap<u32, f64>,
) -> HashMap<Uuid, f64> {
    let mut awarded = HashMap::new();
    for result in results.iter_mut() {
        let Some(position) = result.final_position else {
            continue;
        };
        if result.status != ResultStatus::Completed {
            continue;
        }
        let payout = payout_table.get(&position).copied().unwrap_or(0.0);
        result.payout_amount = payout;
        awarded.insert(result.competitor_id, payout);
    }
    awarded
}

pub fn apply_college_points(competitors: &mut [CollegeCompetitor], points: &HashMap<Uuid, u32>) {
    for competitor in competitors.iter_mut() {
        if let Some(&awarded) = points.get(&competitor.id) {
            competitor.individual_points += awarded;
        }
    }
}

/// Flags completed results whose `best_run` deviates more than 2 standard
/// deviations from the mean of all completed results' values. Needs at
/// least 3 numeric values to be meaningful; clears stale flags otherwise.
pub fn flag_outliers(results: &mut [EventResult]) {
    for result in results.iter_mut() {
        result.is_flagged = false;
    }

    let values: Vec<f64> = results
        .iter()
        .filter(|r| r.status == ResultStatus::Completed)
        .filter_map(|r| r.best_run)
        .collect();

    if values.len() < 3 {
        return;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    let stddev = variance.sqrt();
    if stddev == 0.0 {
        return;
    }

    for result in results.iter_mut() {
        if result.status != ResultStatus::Completed {
            continue;
        }
        if let Some(value) = result.best_run {
            if ((value - mean) / stddev).abs() > 2.0 {
                result.is_flagged = true;
            }
        }
    }
}

pub fn apply_pro_earnings(competitors: &mut [ProCompetitor], payouts: &HashMap<Uuid, f64>) {
    for competitor in competitors.iter_mut() {
        if let Some(&awarded) = payouts.get(&competitor.id) {
            competitor.total_earnings += awarded;
        }
    }
}

/// Recomputes a team's total from scratch as the sum of its members'
/// individual points, so repeated calls are idempotent regardless of how
/// many events have posted points in the interim.
pub fn recalculate_team_points(team: &mut Team, members: &[CollegeCompetitor]) {
    team.total_points = members
        .iter()
        .filter(|m| m.team_id == team.id)
        .map(|m| m.individual_points)
        .sum();
}

pub struct EventFinalizationSummary {
    pub event_id: Uuid,
    pub total_competitors: usize,
    pub points_awarded: HashMap<Uuid, u32>,
    pub payouts_awarded: HashMap<Uuid, f64>,
}

/// Full scoring workflow for an event: calculate placements, award
/// points or payouts, mark the event completed. A no-op (returns an
/// empty summary) if the event is already `Completed`, so callers can
/// retry a finalize request without double-awarding.
pub fn finalize_event(event: &mut Event, results: &mut [EventResult]) -> EventFinalizationSummary {
    if event.status == EventStatus::Completed {
        return EventFinalizationSummary {
            event_id: event.id,
            total_competitors: 0,
            points_awarded: HashMap::new(),
            payouts_awarded: HashMap::new(),
        };
    }

    calculate_placements(results, event.scoring_order);

    let mut points_awarded = HashMap::new();
    let mut payouts_awarded = HashMap::new();

    match event.competitor_type() {
        crate::domain::CompetitorType::College => {
            points_awarded = award_college_points(results);
        }
        crate::domain::CompetitorType::Pro => {
            if let EventPayouts::Fixed(table) = &event.payouts {
                payouts_awarded = award_pro_payouts(results, table);
            }
        }
    }

    flag_outliers(results);

    event.status = EventStatus::Completed;

    EventFinalizationSummary {
        event_id: event.id,
        total_competitors: results
            .iter()
            .filter(|r| r.status == ResultStatus::Completed)
            .count(),
        points_awarded,
        payouts_awarded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompetitorType;

    fn result(value: f64) -> EventResult {
        EventResult {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            competitor_id: Uuid::new_v4(),
            competitor_type: CompetitorType::College,
            competitor_name: "Jo".into(),
            partner_name: None,
            run1_value: Some(value),
            run2_value: None,
            best_run: Some(value),
            result_unit: Some("seconds".into()),
            final_position: None,
            points_awarded: 0,
            payout_amount: 0.0,
            is_flagged: false,
            status: ResultStatus::Completed,
            version: 0,
        }
    }

    #[test]
    fn ties_share_position_and_next_position_skips_the_tied_count() {
        let mut results = vec![result(10.0), result(10.0), result(12.0)];
        calculate_placements(&mut results, ScoringOrder::LowestWins);
        let positions: Vec<Option<u32>> = results.iter().map(|r| r.final_position).collect();
        assert_eq!(positions, vec![Some(1), Some(1), Some(3)]);
    }

    #[test]
    fn highest_wins_orders_descending() {
        let mut results = vec![result(5.0), result(9.0), result(7.0)];
        calculate_placements(&mut results, ScoringOrder::HighestWins);
        let winner = results.iter().find(|r| r.final_position == Some(1)).unwrap();
        assert_eq!(winner.best_run, Some(9.0));
    }

    #[test]
    fn awards_configured_placement_points() {
        let mut results = vec![result(10.0), result(11.0)];
        calculate_placements(&mut results, ScoringOrder::LowestWins);
        let awarded = award_college_points(&mut results);
        assert_eq!(awarded.values().sum::<u32>(), 10 + 7);
    }

    #[test]
    fn flags_results_more_than_two_stddev_from_the_mean() {
        let mut results = vec![result(10.0), result(10.5), result(9.5), result(40.0)];
        flag_outliers(&mut results);
        assert!(results[3].is_flagged);
        assert!(!results[0].is_flagged);
        assert!(!results[1].is_flagged);
        assert!(!results[2].is_flagged);
    }

    #[test]
    fn does_not_flag_with_fewer_than_three_values() {
        let mut results = vec![result(10.0), result(1000.0)];
        flag_outliers(&mut results);
        assert!(!results.iter().any(|r| r.is_flagged));
    }

    #[test]
    fn finalize_event_is_idempotent() {
        let mut event = Event {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            name: "Underhand Chop".into(),
            division: crate::domain::EventDivision::College,
            gender: None,
            scoring_type: crate::domain::ScoringType::Time,
            scoring_order: ScoringOrder::LowestWins,
            is_open: true,
            is_partnered: false,
            partner_gender_requirement: None,
            requires_dual_runs: false,
            stand_type: None,
            max_stands: None,
            has_prelims: false,
            payouts: EventPayouts::None,
            status: EventStatus::InProgress,
            version: 0,
        };
        let mut results = vec![result(10.0), result(11.0)];

        let first = finalize_event(&mut event, &mut results);
        assert_eq!(first.points_awarded.values().sum::<u32>(), 10 + 7);

        let second = finalize_event(&mut event, &mut results);
        assert!(second.points_awarded.is_empty());
    }
}
