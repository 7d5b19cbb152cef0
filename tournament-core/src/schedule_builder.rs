//! Friday/Saturday show schedule builder. Assembles three ordered blocks —
//! Friday Day, Friday Night Feature, Saturday Show — from the
//! tournament's college and pro events plus the operator's choice of
//! which pro events run Friday and which college events spill to
//! Saturday.

use crate::config::{college_name_rank, pro_name_rank, spillover_priority};
use crate::domain::{Event, EventDivision, Gender};
use std::collections::HashSet;
use uuid::Uuid;

const FRIDAY_FEATURE_PRO_NAMES: &[&str] = &["Pro 1-Board", "3-Board Jigger"];
const FRIDAY_FEATURE_COLLEGE_NAMES: &[&str] = &["1-Board Springboard"];

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub slot: u32,
    pub event_id: Uuid,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct DaySchedule {
    pub friday_day: Vec<ScheduleEntry>,
    pub friday_feature: Vec<ScheduleEntry>,
    pub saturday_show: Vec<ScheduleEntry>,
}

fn gender_rank(gender: Option<Gender>) -> u32 {
    match gender {
        Some(Gender::Male) => 0,
        Some(Gender::Female) => 1,
        None => 2,
    }
}

fn gender_letter(gender: Option<Gender>) -> Option<&'static str> {
    match gender {
        Some(Gender::Male) => Some("M"),
        Some(Gender::Female) => Some("F"),
        None => None,
    }
}

fn college_friday_sort_key(event: &Event) -> (u32, u32, u32, u32) {
    let is_birling = if event.name.to_lowercase().contains("birling") { 1 } else { 0 };
    let open_rank = if event.is_open { 0 } else { 1 };
    (is_birling, open_rank, college_name_rank(&event.name), gender_rank(event.gender))
}

fn spillover_sort_key(event: &Event) -> (u32, u32) {
    (spillover_priority(&event.name, gender_letter(event.gender)), gender_rank(event.gender))
}

fn pro_sort_key(event: &Event) -> (u32, u32) {
    (pro_name_rank(&event.name), gender_rank(event.gender))
}

fn to_schedule_entries(events: Vec<&Event>) -> Vec<ScheduleEntry> {
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| ScheduleEntry {
            slot: i as u32 + 1,
            event_id: event.id,
            label: event.name.clone(),
        })
        .collect()
}

/// Splits Friday college events into the day block and the 1-Board
/// Springboard feature slot.
fn extract_collegiate_feature_events<'a>(friday_college: Vec<&'a Event>) -> (Vec<&'a Event>, Vec<&'a Event>) {
    let is_feature = |e: &Event| FRIDAY_FEATURE_COLLEGE_NAMES.contains(&e.name.as_str());
    let feature = friday_college.iter().copied().filter(|e| is_feature(e)).collect();
    let remaining = friday_college.into_iter().filter(|e| !is_feature(e)).collect();
    (remaining, feature)
}

fn build_friday_day_block<'a>(mut events: Vec<&'a Event>) -> Vec<ScheduleEntry> {
    events.sort_by_key(|e| college_friday_sort_key(e));
    to_schedule_entries(events)
}

fn build_friday_feature_block<'a>(
    mut college_events: Vec<&'a Event>,
    mut pro_events: Vec<&'a Event>,
) -> Vec<ScheduleEntry> {
    college_events.sort_by_key(|e| college_friday_sort_key(e));
    pro_events.sort_by_key(|e| pro_sort_key(e));
    college_events.extend(pro_events);
    to_schedule_entries(college_events)
}

/// Intermixes Saturday college spillover events into the pro show: one
/// spillover event after every third pro event, then any leftovers
/// appended at the end.
fn build_saturday_show_block<'a>(
    mut pro_events: Vec<&'a Event>,
    mut spillover: Vec<&'a Event>,
) -> Vec<ScheduleEntry> {
    pro_events.sort_by_key(|e| pro_sort_key(e));
    spillover.sort_by_key(|e| spillover_sort_key(e));

    let mut merged = Vec::with_capacity(pro_events.len() + spillover.len());
    let mut spillover_idx = 0;
    for (i, event) in pro_events.into_iter().enumerate() {
        merged.push(event);
        if (i + 1) % 3 == 0 && spillover_idx < spillover.len() {
            merged.push(spillover[spillover_idx]);
            spillover_idx += 1;
        }
    }
    merged.extend(spillover.drain(spillover_idx..));

    to_schedule_entries(merged)
}

/// Appends a mandatory Chokerman's Race run-2 slot to the Saturday show,
/// if the tournament carries that event, regardless of what the
/// operator chose to spill over.
fn add_mandatory_chokerman_run2(mut entries: Vec<ScheduleEntry>, college_events: &[Event]) -> Vec<ScheduleEntry> {
    let Some(chokerman) = college_events
        .iter()
        .find(|e| e.name == "Chokerman's Race" && e.division == EventDivision::College)
    else {
        return entries;
    };
    entries.push(ScheduleEntry {
        slot: entries.len() as u32 + 1,
        event_id: chokerman.id,
        label: format!("{} (Run 2)", chokerman.name),
    });
    entries
}

/// Builds the Friday/Saturday schedule. `friday_pro_event_ids` names the
/// pro events the operator chose to run in the Friday Night Feature
/// (falling back to the fixed feature-name set when empty);
/// `saturday_college_event_ids` names the college events spilling over
/// to Saturday (everything else runs Friday Day).
pub fn build_day_schedule(
    events: &[Event],
    friday_pro_event_ids: &HashSet<Uuid>,
    saturday_college_event_ids: &HashSet<Uuid>,
) -> DaySchedule {
    let college_events: Vec<&Event> = events.iter().filter(|e| e.division == EventDivision::College).collect();
    let pro_events: Vec<&Event> = events.iter().filter(|e| e.division == EventDivision::Pro).collect();

    let mut friday_feature_pro: Vec<&Event> = pro_events
        .iter()
        .copied()
        .filter(|e| friday_pro_event_ids.contains(&e.id))
        .collect();
    let mut friday_show_pro: Vec<&Event> = pro_events
        .iter()
        .copied()
        .filter(|e| !friday_pro_event_ids.contains(&e.id))
        .collect();

    if friday_feature_pro.is_empty() {
        friday_feature_pro = pro_events
            .iter()
            .copied()
            .filter(|e| FRIDAY_FEATURE_PRO_NAMES.contains(&e.name.as_str()))
            .collect();
        let feature_ids: HashSet<Uuid> = friday_feature_pro.iter().map(|e| e.id).collect();
        friday_show_pro = pro_events.iter().copied().filter(|e| !feature_ids.contains(&e.id)).collect();
    }

    let saturday_college: Vec<&Event> = college_events
        .iter()
        .copied()
        .filter(|e| saturday_college_event_ids.contains(&e.id))
        .collect();
    let friday_college: Vec<&Event> = college_events
        .iter()
        .copied()
        .filter(|e| !saturday_college_event_ids.contains(&e.id))
        .collect();

    let (friday_college, friday_feature_college) = extract_collegiate_feature_events(friday_college);

    let friday_day = build_friday_day_block(friday_college);
    let friday_feature = build_friday_feature_block(friday_feature_college, friday_feature_pro);
    let saturday_show = build_saturday_show_block(friday_show_pro, saturday_college);
    let college_events_owned: Vec<Event> = college_events.into_iter().cloned().collect();
    let saturday_show = add_mandatory_chokerman_run2(saturday_show, &college_events_owned);

    DaySchedule {
        friday_day,
        friday_feature,
        saturday_show,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EventPayouts, EventStatus, ScoringOrder, ScoringType};

    fn event(name: &str, division: EventDivision, is_open: bool, gender: Option<Gender>) -> Event {
        Event {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            name: name.to_string(),
            division,
            gender,
            scoring_type: ScoringType::Time,
            scoring_order: ScoringOrder::LowestWins,
            is_open,
            is_partnered: false,
            partner_gender_requirement: None,
            requires_dual_runs: false,
            stand_type: None,
            max_stands: None,
            has_prelims: false,
            payouts: EventPayouts::None,
            status: EventStatus::Pending,
            version: 0,
        }
    }

    #[test]
    fn birling_sorts_to_the_end_of_friday_day() {
        let events = vec![
            event("Birling", EventDivision::College, true, Some(Gender::Male)),
            event("Axe Throw", EventDivision::College, true, Some(Gender::Male)),
        ];
        let schedule = build_day_schedule(&events, &HashSet::new(), &HashSet::new());
        assert_eq!(schedule.friday_day.last().unwrap().label, "Birling");
    }

    #[test]
    fn feature_pro_events_default_when_none_chosen() {
        let events = vec![
            event("Pro 1-Board", EventDivision::Pro, true, Some(Gender::Male)),
            event("Hot Saw", EventDivision::Pro, true, Some(Gender::Male)),
        ];
        let schedule = build_day_schedule(&events, &HashSet::new(), &HashSet::new());
        assert_eq!(schedule.friday_feature.len(), 1);
        assert_eq!(schedule.friday_feature[0].label, "Pro 1-Board");
    }

    #[test]
    fn spillover_inserted_every_third_pro_event() {
        let pro: Vec<Event> = (0..6)
            .map(|i| event(&format!("Hot Saw {i}"), EventDivision::Pro, true, Some(Gender::Male)))
            .collect();
        let spillover = event("Standing Block Speed", EventDivision::College, true, Some(Gender::Male));
        let mut events = pro.clone();
        events.push(spillover.clone());
        let saturday_ids: HashSet<Uuid> = [spillover.id].into_iter().collect();
        let schedule = build_day_schedule(&events, &HashSet::new(), &saturday_ids);
        assert_eq!(schedule.saturday_show.len(), 7);
        assert_eq!(schedule.saturday_show[2].label, "Standing Block Speed");
    }

    #[test]
    fn chokerman_run2_always_appended_when_event_exists() {
        let events = vec![event("Chokerman's Race", EventDivision::College, true, Some(Gender::Male))];
        let schedule = build_day_schedule(&events, &HashSet::new(), &HashSet::new());
        assert_eq!(schedule.saturday_show.len(), 1);
        assert!(schedule.saturday_show[0].label.contains("Run 2"));
    }
}
