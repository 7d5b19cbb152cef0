//! Pro-day flight builder. Mixes heats from different pro events
//! into flights, greedily ordered to maximize rest between a
//! competitor's successive appearances.

use crate::config::{MIN_HEAT_SPACING, TARGET_HEAT_SPACING};
use crate::domain::{Flight, FlightStatus, Heat};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct HeatEntry {
    pub heat: Heat,
    pub event_id: Uuid,
    pub competitors: HashSet<Uuid>,
}

/// Greedily reorders `heats` to maximize the minimum gap (in heat
/// positions) between a competitor's successive appearances, then
/// preferring better average spacing. See `score_heat_at` for the exact
/// formula.
pub fn optimize_heat_order(heats: Vec<HeatEntry>) -> Vec<HeatEntry> {
    let mut remaining = heats;
    let mut ordered: Vec<HeatEntry> = Vec::with_capacity(remaining.len());
    let mut competitor_last_heat: HashMap<Uuid, i64> = HashMap::new();

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (i, entry) in remaining.iter().enumerate() {
            let score = score_heat_at(&entry.competitors, &competitor_last_heat, ordered.len() as i64);
            if score > best_score {
                best_score = score;
                best_index = i;
            }
        }

        let chosen = remaining.remove(best_index);
        let position = ordered.len() as i64;
        for competitor_id in &chosen.competitors {
            competitor_last_heat.insert(*competitor_id, position);
        }
        ordered.push(chosen);
    }

    ordered
}

fn score_heat_at(
    competitors: &HashSet<Uuid>,
    competitor_last_heat: &HashMap<Uuid, i64>,
    current_position: i64,
) -> f64 {
    if competitors.is_empty() {
        return 100.0;
    }

    let mut min_spacing = i64::MAX;
    let mut total_spacing = 0i64;
    let mut seen_count = 0i64;

    for competitor_id in competitors {
        if let Some(&last_heat) = competitor_last_heat.get(competitor_id) {
            let spacing = current_position - last_heat;
            min_spacing = min_spacing.min(spacing);
            total_spacing += spacing;
            seen_count += 1;
        }
    }

    if seen_count == 0 {
        return 1000.0;
    }

    if min_spacing < MIN_HEAT_SPACING {
        let penalty = (MIN_HEAT_SPACING - min_spacing) as f64 * 100.0;
        return (50.0 - penalty).max(0.0);
    }

    let avg_spacing = total_spacing as f64 / seen_count as f64;
    let mut score = min_spacing as f64 * 10.0 + avg_spacing;
    if min_spacing >= TARGET_HEAT_SPACING {
        score += 50.0;
    }
    score
}

/// Packs the greedily-ordered heats into flights of `heats_per_flight`,
/// returning the flights (in order) paired with the heat ids assigned
/// to each.
pub fn build_flights(
    tournament_id: Uuid,
    heats: Vec<HeatEntry>,
    heats_per_flight: usize,
) -> Vec<(Flight, Vec<Uuid>)> {
    if heats.is_empty() {
        return Vec::new();
    }
    let ordered = optimize_heat_order(heats);

    let mut flights = Vec::new();
    let mut chunks = ordered.chunks(heats_per_flight.max(1));
    let mut flight_number = 1;
    while let Some(chunk) = chunks.next() {
        let flight = Flight {
            id: Uuid::new_v4(),
            tournament_id,
            flight_number,
            status: FlightStatus::Open,
            notes: None,
            version: 0,
        };
        let heat_ids = chunk.iter().map(|e| e.heat.id).collect();
        flights.push((flight, heat_ids));
        flight_number += 1;
    }
    flights
}

/// Finals heats for the top-4 Partnered Axe Throw pairs, one per flight
/// (one pair per flight appearance keeps the crowd from watching the
/// whole final back-to-back). `top_pair_ids` is in finals seed order.
pub fn insert_axe_throw_finals(
    axe_event_id: Uuid,
    flights: &[Flight],
    top_pair_ids: &[u32],
) -> Vec<Heat> {
    let mut heats = Vec::new();
    for (i, _pair_id) in top_pair_ids.iter().take(4).enumerate() {
        let Some(flight) = flights.get(i) else {
            break;
        };
        heats.push(Heat {
            id: Uuid::new_v4(),
            event_id: axe_event_id,
            heat_number: 100 + i as u32,
            run_number: 1,
            competitors: Vec::new(),
            stand_assignments: HashMap::new(),
            flight_id: Some(flight.id),
            status: crate::domain::HeatStatus::Scheduled,
            version: 0,
        });
    }
    heats
}

#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub flight_id: Uuid,
    pub flight_number: u32,
    pub heat_count: usize,
    pub event_counts: HashMap<String, usize>,
}

pub fn flight_summary(
    flight: &Flight,
    heat_event_names: &[String],
) -> FlightSummary {
    let mut event_counts: HashMap<String, usize> = HashMap::new();
    for name in heat_event_names {
        *event_counts.entry(name.clone()).or_insert(0) += 1;
    }
    FlightSummary {
        flight_id: flight.id,
        flight_number: flight.flight_number,
        heat_count: heat_event_names.len(),
        event_counts,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpacingViolation {
    pub competitor_id: Uuid,
    pub first_position: usize,
    pub second_position: usize,
    pub spacing: i64,
}

/// Walks heats in their assigned flight/heat order and reports every
/// competitor appearance closer together than `MIN_HEAT_SPACING`.
pub fn validate_spacing(ordered_heats: &[HeatEntry]) -> Vec<SpacingViolation> {
    let mut last_seen: HashMap<Uuid, usize> = HashMap::new();
    let mut violations = Vec::new();

    for (i, entry) in ordered_heats.iter().enumerate() {
        for competitor_id in &entry.competitors {
            if let Some(&last) = last_seen.get(competitor_id) {
                let spacing = (i - last) as i64;
                if spacing < MIN_HEAT_SPACING {
                    violations.push(SpacingViolation {
                        competitor_id: *competitor_id,
                        first_position: last,
                        second_position: i,
                        spacing,
                    });
                }
            }
            last_seen.insert(*competitor_id, i);
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeatStatus;

    fn heat_entry(competitors: &[Uuid]) -> HeatEntry {
        HeatEntry {
            heat: Heat {
                id: Uuid::new_v4(),
                event_id: Uuid::new_v4(),
                heat_number: 1,
                run_number: 1,
                competitors: competitors.to_vec(),
                stand_assignments: HashMap::new(),
                flight_id: None,
                status: HeatStatus::Scheduled,
                version: 0,
            },
            event_id: Uuid::new_v4(),
            competitors: competitors.iter().copied().collect(),
        }
    }

    #[test]
    fn spaces_out_a_competitor_appearing_in_many_heats() {
        let frequent = Uuid::new_v4();
        let mut heats = vec![heat_entry(&[frequent])];
        for _ in 0..5 {
            heats.push(heat_entry(&[Uuid::new_v4()]));
        }
        heats.push(heat_entry(&[frequent]));

        let ordered = optimize_heat_order(heats);
        let positions: Vec<usize> = ordered
            .iter()
            .enumerate()
            .filter(|(_, e)| e.competitors.contains(&frequent))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 2);
        assert!(positions[1] - positions[0] >= MIN_HEAT_SPACING as usize);
    }

    #[test]
    fn validate_spacing_flags_back_to_back_appearances() {
        let c = Uuid::new_v4();
        let heats = vec![heat_entry(&[c]), heat_entry(&[c])];
        let violations = validate_spacing(&heats);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].spacing, 1);
    }
}
