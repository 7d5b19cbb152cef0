//! Per-heat result ingest: the write path that turns judge-submitted
//! values into `EventResult` updates and decides when a heat (and, in
//! turn, an event) is ready to finalize.

use crate::domain::{Event, EventResult, Heat, HeatStatus, ResultStatus, ScoringType};
use crate::errors::{CoreError, CoreResult};
use std::collections::HashMap;
use uuid::Uuid;

/// A submitted value that didn't parse as a number; the caller surfaces
/// these as warnings rather than failing the whole submission.
#[derive(Debug, Clone, PartialEq)]
pub struct UnparseableSubmission {
    pub competitor_id: Uuid,
    pub raw_value: String,
}

pub struct HeatSubmissionOutcome {
    pub updated: usize,
    pub skipped: Vec<UnparseableSubmission>,
    /// True once every heat for the event (outside dual-run events, which
    /// finalize only after both runs' heats are all in) has completed.
    pub ready_to_finalize: bool,
}

/// `best_run` from a pair of run values once both (or either) are known,
/// using the event's scoring direction to pick the counting run.
fn compute_best_run(run1: Option<f64>, run2: Option<f64>, scoring_type: ScoringType) -> Option<f64> {
    match (run1, run2) {
        (Some(a), Some(b)) => Some(match scoring_type {
            ScoringType::Time => a.min(b),
            ScoringType::Score | ScoringType::Distance | ScoringType::Hits | ScoringType::Bracket => a.max(b),
        }),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Applies one heat's submitted competitor_id -> (raw value, status) map
/// to the event's results, marks the heat completed, and bumps its
/// version. Rejects with `CoreError::Conflict` if `heat_version` is
/// stale. Unparseable values are skipped and reported back rather than
/// failing the submission outright.
pub fn submit_heat_results(
    heat: &mut Heat,
    heat_version: i64,
    event: &Event,
    submissions: &HashMap<Uuid, (String, ResultStatus)>,
    results: &mut [EventResult],
    other_heats_for_event: &[Heat],
) -> CoreResult<HeatSubmissionOutcome> {
    if heat.version != heat_version {
        return Err(CoreError::Conflict);
    }

    let mut updated = 0;
    let mut skipped = Vec::new();

    for (competitor_id, (raw_value, status)) in submissions {
        let Some(result) = results.iter_mut().find(|r| r.competitor_id == *competitor_id) else {
            continue;
        };

        let Ok(value) = raw_value.trim().parse::<f64>() else {
            skipped.push(UnparseableSubmission {
                competitor_id: *competitor_id,
                raw_value: raw_value.clone(),
            });
            continue;
        };

        if event.requires_dual_runs {
            match heat.run_number {
                1 => result.run1_value = Some(value),
                _ => result.run2_value = Some(value),
            }
            result.best_run = compute_best_run(result.run1_value, result.run2_value, event.scoring_type);
        } else {
            result.run1_value = Some(value);
            result.best_run = Some(value);
        }

        result.status = *status;
        updated += 1;
    }

    heat.status = HeatStatus::Completed;
    heat.version += 1;

    let all_heats_completed = other_heats_for_event
        .iter()
        .all(|h| h.id == heat.id || h.status == HeatStatus::Completed);
    let ready_to_finalize = !event.requires_dual_runs && all_heats_completed;

    Ok(HeatSubmissionOutcome {
        updated,
        skipped,
        ready_to_finalize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorType, EventDivision, EventPayouts, EventStatus, ScoringOrder};

    fn heat(event_id: Uuid, run_number: u8) -> Heat {
        Heat {
            id: Uuid::new_v4(),
            event_id,
            heat_number: 1,
            run_number,
            competitors: vec![],
            stand_assignments: HashMap::new(),
            flight_id: None,
            status: HeatStatus::Scheduled,
            version: 0,
        }
    }

    fn event(requires_dual_runs: bool, scoring_type: ScoringType) -> Event {
        Event {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            name: "Underhand Chop".into(),
            division: EventDivision::College,
            gender: None,
            scoring_type,
            scoring_order: ScoringOrder::LowestWins,
            is_open: true,
            is_partnered: false,
            partner_gender_requirement: None,
            requires_dual_runs,
            stand_type: None,
            max_stands: None,
            has_prelims: false,
            payouts: EventPayouts::None,
            status: EventStatus::InProgress,
            version: 0,
        }
    }

    fn result(event_id: Uuid, competitor_id: Uuid) -> EventResult {
        EventResult {
            id: Uuid::new_v4(),
            event_id,
            competitor_id,
            competitor_type: CompetitorType::College,
            competitor_name: "Jo".into(),
            partner_name: None,
            run1_value: None,
            run2_value: None,
            best_run: None,
            result_unit: Some("seconds".into()),
            final_position: None,
            points_awarded: 0,
            payout_amount: 0.0,
            is_flagged: false,
            status: ResultStatus::Pending,
            version: 0,
        }
    }

    #[test]
    fn stale_version_is_rejected() {
        let event = event(false, ScoringType::Time);
        let mut heat = heat(event.id, 1);
        heat.version = 3;
        let mut results = vec![];
        let err = submit_heat_results(&mut heat, 2, &event, &HashMap::new(), &mut results, &[]).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn single_run_event_sets_best_run_directly() {
        let event = event(false, ScoringType::Time);
        let mut heat = heat(event.id, 1);
        let competitor_id = Uuid::new_v4();
        let mut results = vec![result(event.id, competitor_id)];
        let mut submissions = HashMap::new();
        submissions.insert(competitor_id, ("12.5".to_string(), ResultStatus::Completed));

        let outcome = submit_heat_results(&mut heat, 0, &event, &submissions, &mut results, &[]).unwrap();

        assert_eq!(outcome.updated, 1);
        assert!(outcome.skipped.is_empty());
        assert_eq!(results[0].best_run, Some(12.5));
        assert_eq!(heat.status, HeatStatus::Completed);
        assert_eq!(heat.version, 1);
    }

    #[test]
    fn dual_run_time_event_takes_the_lower_run() {
        let event = event(true, ScoringType::Time);
        let competitor_id = Uuid::new_v4();
        let mut results = vec![result(event.id, competitor_id)];

        let mut run1 = heat(event.id, 1);
        let mut submissions = HashMap::new();
        submissions.insert(competitor_id, ("14.0".to_string(), ResultStatus::Completed));
        submit_heat_results(&mut run1, 0, &event, &submissions, &mut results, &[]).unwrap();
        assert_eq!(results[0].best_run, Some(14.0));

        let mut run2 = heat(event.id, 2);
        let mut submissions = HashMap::new();
        submissions.insert(competitor_id, ("11.0".to_string(), ResultStatus::Completed));
        submit_heat_results(&mut run2, 0, &event, &submissions, &mut results, &[]).unwrap();
        assert_eq!(results[0].run1_value, Some(14.0));
        assert_eq!(results[0].run2_value, Some(11.0));
        assert_eq!(results[0].best_run, Some(11.0));
    }

    #[test]
    fn unparseable_values_are_skipped_and_reported() {
        let event = event(false, ScoringType::Hits);
        let mut heat = heat(event.id, 1);
        let competitor_id = Uuid::new_v4();
        let mut results = vec![result(event.id, competitor_id)];
        let mut submissions = HashMap::new();
        submissions.insert(competitor_id, ("DNF".to_string(), ResultStatus::Completed));

        let outcome = submit_heat_results(&mut heat, 0, &event, &submissions, &mut results, &[]).unwrap();

        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(results[0].best_run, None);
    }

    #[test]
    fn ready_to_finalize_once_every_heat_for_a_single_run_event_is_done() {
        let event = event(false, ScoringType::Hits);
        let mut target = heat(event.id, 1);
        let mut sibling = heat(event.id, 1);
        sibling.status = HeatStatus::Completed;
        let mut results: Vec<EventResult> = vec![];

        let outcome =
            submit_heat_results(&mut target, 0, &event, &HashMap::new(), &mut results, std::slice::from_ref(&sibling))
                .unwrap();

        assert!(outcome.ready_to_finalize);
    }

    #[test]
    fn dual_run_events_never_report_ready_to_finalize_from_a_single_heat() {
        let event = event(true, ScoringType::Time);
        let mut target = heat(event.id, 1);
        let mut results: Vec<EventResult> = vec![];

        let outcome = submit_heat_results(&mut target, 0, &event, &HashMap::new(), &mut results, &[]).unwrap();

        assert!(!outcome.ready_to_finalize);
    }
}
