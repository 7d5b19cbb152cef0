//! Snake-draft heat generation: bouncing snake index, partnered-pair
//! "units" kept together, gear-sharing conflict avoidance with a
//! same-heat fallback, springboard left-hander pre-distribution, and a
//! saw-hand 4-per-heat cap.

use crate::config::{stand_config, StandType};
use crate::domain::{CompetitorType, Gender, GearShareTarget, Heat, HeatStatus};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct HeatCompetitor {
    pub id: Uuid,
    pub name: String,
    pub gender: Gender,
    pub is_left_handed: bool,
    /// The other competitor id this one shares gear with for this event, if any.
    pub gear_share_partner: Option<Uuid>,
}

/// One competitor, or a partnered pair that must be seated in the same heat.
type Unit = Vec<HeatCompetitor>;

fn advance_snake_index(heat_idx: i64, direction: i64, num_heats: i64) -> (i64, i64) {
    let mut idx = heat_idx + direction;
    let mut dir = direction;
    if idx >= num_heats {
        dir = -1;
        idx = num_heats - 1;
    } else if idx < 0 {
        dir = 1;
        idx = 0;
    }
    (idx, dir)
}

/// Snake-draft distribution into `num_heats` heats of at most
/// `max_per_heat` each, keeping partnered units together and preferring
/// heats free of gear-sharing conflicts.
pub fn generate_standard_heats(
    competitors: &[HeatCompetitor],
    num_heats: usize,
    max_per_heat: usize,
    units: Vec<Unit>,
) -> Vec<Vec<HeatCompetitor>> {
    let _ = competitors;
    let mut heats: Vec<Vec<HeatCompetitor>> = vec![Vec::new(); num_heats];
    let num_heats_i = num_heats as i64;
    let mut heat_idx: i64 = 0;
    let mut direction: i64 = 1;

    for unit in units {
        let unit_ids: Vec<Uuid> = unit.iter().map(|c| c.id).collect();
        let mut placed = false;

        for _ in 0..num_heats {
            let fits = heats[heat_idx as usize].len() + unit.len() <= max_per_heat;
            let conflict = unit
                .iter()
                .any(|c| unit_conflicts(c, &heats[heat_idx as usize], &unit_ids));
            if fits && !conflict {
                heats[heat_idx as usize].extend(unit.clone());
                placed = true;
                break;
            }
            let (idx, dir) = advance_snake_index(heat_idx, direction, num_heats_i);
            heat_idx = idx;
            direction = dir;
        }

        if !placed {
            for _ in 0..num_heats {
                if heats[heat_idx as usize].len() + unit.len() <= max_per_heat {
                    heats[heat_idx as usize].extend(unit.clone());
                    placed = true;
                    break;
                }
                let (idx, dir) = advance_snake_index(heat_idx, direction, num_heats_i);
                heat_idx = idx;
                direction = dir;
            }
        }

        let (idx, dir) = advance_snake_index(heat_idx, direction, num_heats_i);
        heat_idx = idx;
        direction = dir;
    }

    heats
}

/// True when seating `comp` alongside `seated` would put them in the same
/// heat as the competitor they share a saw/stand with -- the two can't
/// use the same piece of gear at the same time.
fn unit_conflicts(comp: &HeatCompetitor, seated: &[HeatCompetitor], unit_ids: &[Uuid]) -> bool {
    let Some(partner) = comp.gear_share_partner else {
        return false;
    };
    if unit_ids.contains(&partner) {
        return false; // partner is in the same partnered unit, already accounted for
    }
    seated.iter().any(|s| s.id == partner)
}

/// Groups competitors into partnered units for partnered events, using
/// first-class partner references instead of name matching.
pub fn build_partner_units(competitors: &[HeatCompetitor], partners: &HashMap<Uuid, Uuid>) -> Vec<Unit> {
    let mut used: Vec<Uuid> = Vec::new();
    let mut units = Vec::new();

    for comp in competitors {
        if used.contains(&comp.id) {
            continue;
        }
        if let Some(partner_id) = partners.get(&comp.id) {
            if let Some(partner) = competitors.iter().find(|c| c.id == *partner_id) {
                if !used.contains(&partner.id) {
                    units.push(vec![comp.clone(), partner.clone()]);
                    used.push(comp.id);
                    used.push(partner.id);
                    continue;
                }
            }
        }
        units.push(vec![comp.clone()]);
        used.push(comp.id);
    }

    units
}

/// Springboard heats: left-handers are pre-distributed one per heat
/// (spread across heats so each dummy sees at most one), then
/// right-handers fill in via the standard snake draft.
pub fn generate_springboard_heats(
    competitors: &[HeatCompetitor],
    num_heats: usize,
    max_per_heat: usize,
    partners: &HashMap<Uuid, Uuid>,
) -> Vec<Vec<HeatCompetitor>> {
    let left_handed: Vec<HeatCompetitor> = competitors.iter().filter(|c| c.is_left_handed).cloned().collect();
    let right_handed: Vec<HeatCompetitor> = competitors.iter().filter(|c| !c.is_left_handed).cloned().collect();

    if left_handed.is_empty() {
        let units = build_partner_units(competitors, partners);
        return generate_standard_heats(competitors, num_heats, max_per_heat, units);
    }

    let mut heats: Vec<Vec<HeatCompetitor>> = vec![Vec::new(); num_heats];
    for (i, comp) in left_handed.iter().enumerate() {
        heats[i % num_heats].push(comp.clone());
    }

    let num_heats_i = num_heats as i64;
    let mut heat_idx: i64 = 0;
    let mut direction: i64 = 1;
    for comp in right_handed {
        while heats[heat_idx as usize].len() >= max_per_heat {
            let (idx, dir) = advance_snake_index(heat_idx, direction, num_heats_i);
            heat_idx = idx;
            direction = dir;
        }
        heats[heat_idx as usize].push(comp);
        let (idx, dir) = advance_snake_index(heat_idx, direction, num_heats_i);
        heat_idx = idx;
        direction = dir;
    }

    heats
}

/// Saw-hand heats cap at 4 competitors per heat regardless of the stand
/// catalog's raw stand count (two groups of 4, one runs while the other
/// sets up).
pub fn generate_saw_heats(
    competitors: &[HeatCompetitor],
    max_per_heat: usize,
    partners: &HashMap<Uuid, Uuid>,
) -> Vec<Vec<HeatCompetitor>> {
    let actual_max = max_per_heat.min(4);
    let num_heats = competitors.len().div_ceil(actual_max).max(1);
    let units = build_partner_units(competitors, partners);
    generate_standard_heats(competitors, num_heats, actual_max, units)
}

const LIST_ONLY_EVENT_NAMES: &[&str] = crate::config::LIST_ONLY_EVENT_NAMES;

pub fn normalize_event_name(name: &str) -> String {
    name.to_lowercase().chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

pub fn is_list_only_event(division: CompetitorType, event_name: &str) -> bool {
    division == CompetitorType::College
        && LIST_ONLY_EVENT_NAMES
            .iter()
            .any(|n| normalize_event_name(n) == normalize_event_name(event_name))
}

/// Stand numbers to assign, in seat order, for the first run of an event.
/// Stock Saw is pinned to stands 7/8 per the venue's fixed saw layout.
pub fn stand_numbers_for_event(
    division: CompetitorType,
    event_name: &str,
    max_per_heat: usize,
    stand_type: Option<StandType>,
) -> Vec<u16> {
    if division == CompetitorType::College && normalize_event_name(event_name) == normalize_event_name("Stock Saw") {
        return [7u16, 8][..max_per_heat.min(2)].to_vec();
    }
    if let Some(stand_type) = stand_type {
        let cfg = stand_config(stand_type);
        if let Some(specific) = cfg.specific_stands {
            return specific.into_iter().take(max_per_heat).collect();
        }
    }
    (1..=max_per_heat as u16).collect()
}

/// Builds both the run-1 heats and, for dual-run events, the mirrored
/// run-2 heats with reversed stand assignment.
pub fn assign_heats(
    event_id: Uuid,
    heat_groups: Vec<Vec<HeatCompetitor>>,
    stand_numbers: &[u16],
    requires_dual_runs: bool,
) -> Vec<Heat> {
    let mut heats = Vec::new();

    for (i, group) in heat_groups.iter().enumerate() {
        let mut assignments = HashMap::new();
        for (slot, comp) in group.iter().enumerate() {
            if let Some(stand) = stand_numbers.get(slot) {
                assignments.insert(comp.id, *stand);
            }
        }
        heats.push(Heat {
            id: Uuid::new_v4(),
            event_id,
            heat_number: (i + 1) as u32,
            run_number: 1,
            competitors: group.iter().map(|c| c.id).collect(),
            stand_assignments: assignments,
            flight_id: None,
            status: HeatStatus::Scheduled,
            version: 0,
        });
    }

    if requires_dual_runs {
        let reversed: Vec<u16> = stand_numbers.iter().rev().copied().collect();
        for (i, group) in heat_groups.iter().enumerate() {
            let mut assignments = HashMap::new();
            for (slot, comp) in group.iter().enumerate() {
                if let Some(stand) = reversed.get(slot) {
                    assignments.insert(comp.id, *stand);
                }
            }
            heats.push(Heat {
                id: Uuid::new_v4(),
                event_id,
                heat_number: (i + 1) as u32,
                run_number: 2,
                competitors: group.iter().map(|c| c.id).collect(),
                stand_assignments: assignments,
                flight_id: None,
                status: HeatStatus::Scheduled,
                version: 0,
            });
        }
    }

    heats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(name: &str) -> HeatCompetitor {
        HeatCompetitor {
            id: Uuid::new_v4(),
            name: name.into(),
            gender: Gender::Male,
            is_left_handed: false,
            gear_share_partner: None,
        }
    }

    #[test]
    fn snake_draft_fills_evenly() {
        let comps: Vec<HeatCompetitor> = (0..9).map(|i| comp(&format!("c{i}"))).collect();
        let units: Vec<Unit> = comps.iter().map(|c| vec![c.clone()]).collect();
        let heats = generate_standard_heats(&comps, 3, 4, units);
        assert_eq!(heats.iter().map(|h| h.len()).sum::<usize>(), 9);
        assert!(heats.iter().all(|h| h.len() <= 4));
    }

    #[test]
    fn gear_sharing_partners_are_split_across_heats_when_possible() {
        let mut a = comp("a");
        let mut b = comp("b");
        a.gear_share_partner = Some(b.id);
        b.gear_share_partner = Some(a.id);
        let comps = vec![a.clone(), b.clone()];
        let units: Vec<Unit> = vec![vec![a.clone()], vec![b.clone()]];
        let heats = generate_standard_heats(&comps, 2, 4, units);
        let heat_of = |id: Uuid| heats.iter().position(|h| h.iter().any(|c| c.id == id)).unwrap();
        assert_ne!(heat_of(a.id), heat_of(b.id));
    }

    #[test]
    fn gear_sharing_partners_fall_back_to_same_heat_when_only_one_heat_exists() {
        let mut a = comp("a");
        let mut b = comp("b");
        a.gear_share_partner = Some(b.id);
        b.gear_share_partner = Some(a.id);
        let comps = vec![a.clone(), b.clone()];
        let units: Vec<Unit> = vec![vec![a.clone()], vec![b.clone()]];
        let heats = generate_standard_heats(&comps, 1, 4, units);
        assert_eq!(heats[0].len(), 2);
    }

    #[test]
    fn partner_units_keep_pairs_together() {
        let a = comp("a");
        let b = comp("b");
        let mut partners = HashMap::new();
        partners.insert(a.id, b.id);
        partners.insert(b.id, a.id);
        let units = build_partner_units(&[a.clone(), b.clone()], &partners);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].len(), 2);
    }

    #[test]
    fn stock_saw_pins_stands_seven_and_eight() {
        let stands = stand_numbers_for_event(CompetitorType::College, "Stock Saw", 2, Some(StandType::StockSaw));
        assert_eq!(stands, vec![7, 8]);
    }
}
