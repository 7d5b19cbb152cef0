//! Birling double-elimination bracket.
//!
//! Match ids, the winners/losers/finals/true-finals shape, and the
//! elimination-position-counts-down-from-N formula drive the advancement
//! logic below: bracket construction precomputes, for every match, the
//! destination slot its winner (and, for winners-bracket matches, its
//! loser) goes to. Recording a result is then a constant-time write into
//! that destination rather than a search.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    One,
    Two,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketMatch {
    pub match_id: String,
    pub competitor1: Option<Uuid>,
    pub competitor2: Option<Uuid>,
    pub winner: Option<Uuid>,
    pub loser: Option<Uuid>,
    pub is_bye: bool,
    pub winner_to: Option<(String, Slot)>,
    pub loser_to: Option<(String, Slot)>,
}

impl BracketMatch {
    fn new(match_id: impl Into<String>) -> Self {
        BracketMatch {
            match_id: match_id.into(),
            competitor1: None,
            competitor2: None,
            winner: None,
            loser: None,
            is_bye: false,
            winner_to: None,
            loser_to: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.competitor1.is_some() && self.competitor2.is_some() && self.winner.is_none() && !self.is_bye
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketStage {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirlingBracketState {
    pub competitors: Vec<Uuid>,
    pub names: HashMap<Uuid, String>,
    pub matches: HashMap<String, BracketMatch>,
    /// competitor id -> final position, 1 = champion.
    pub placements: HashMap<Uuid, u32>,
    pub true_finals_needed: bool,
    pub stage: BracketStage,
}

impl BirlingBracketState {
    pub fn current_matches(&self) -> Vec<&BracketMatch> {
        self.matches.values().filter(|m| m.is_ready()).collect()
    }
}

fn place_competitor(matches: &mut HashMap<String, BracketMatch>, dest: &(String, Slot), competitor: Uuid) {
    if let Some(m) = matches.get_mut(&dest.0) {
        match dest.1 {
            Slot::One => m.competitor1 = Some(competitor),
            Slot::Two => m.competitor2 = Some(competitor),
        }
    }
}

/// Seeds `competitors` (in `seeding` order, 1st seed first, or insertion
/// order if `seeding` is absent) into a double-elimination bracket of
/// size `2^ceil(log2(n))`, auto-advancing round-1 byes.
pub fn build_bracket(
    competitors: &[(Uuid, String)],
    seeding: Option<Vec<Uuid>>,
) -> Result<BirlingBracketState, String> {
    let n = competitors.len();
    if n < 2 {
        return Err("need at least 2 competitors for a bracket".into());
    }
    let bracket_size = n.next_power_of_two();
    let w = bracket_size.trailing_zeros() as usize;

    let names: HashMap<Uuid, String> = competitors.iter().cloned().collect();
    let seeds: Vec<Uuid> = seeding.unwrap_or_else(|| competitors.iter().map(|c| c.0).collect());

    let mut matches: HashMap<String, BracketMatch> = HashMap::new();

    let mut wb_round_sizes = vec![bracket_size / 2];
    {
        let mut size = bracket_size / 2;
        while size > 1 {
            size /= 2;
            wb_round_sizes.push(size);
        }
    }

    for i in 0..wb_round_sizes[0] {
        let seed1 = i;
        let seed2 = bracket_size - 1 - i;
        let comp1 = seeds.get(seed1).copied();
        let comp2 = seeds.get(seed2).copied();
        let match_id = format!("W1_{}", i + 1);
        let mut m = BracketMatch::new(match_id.clone());
        m.competitor1 = comp1;
        m.competitor2 = comp2;
        m.is_bye = comp1.is_none() || comp2.is_none();
        if m.is_bye {
            m.winner = comp1.or(comp2);
        }
        matches.insert(match_id, m);
    }

    for r in 2..=w {
        for i in 0..wb_round_sizes[r - 1] {
            let match_id = format!("W{r}_{}", i + 1);
            matches.insert(match_id.clone(), BracketMatch::new(match_id));
        }
    }

    // Winners bracket internal advancement: winner of WBr match i -> WB(r+1) match i/2.
    for r in 1..w {
        for i in 0..wb_round_sizes[r - 1] {
            let from_id = format!("W{r}_{}", i + 1);
            let to_id = format!("W{}_{}", r + 1, i / 2 + 1);
            let slot = if i % 2 == 0 { Slot::One } else { Slot::Two };
            matches.get_mut(&from_id).unwrap().winner_to = Some((to_id, slot));
        }
    }

    // Losers bracket: 2*(w-1) rounds, alternating "absorb a fresh winners-bracket
    // drop" rounds with "consolidate among losers-bracket survivors" rounds.
    let lb_rounds = if w >= 2 { 2 * (w - 1) } else { 0 };
    let mut lb_round_sizes: Vec<usize> = Vec::with_capacity(lb_rounds);
    for k in 1..=lb_rounds {
        let j = (k + 1) / 2; // ceil(k / 2)
        lb_round_sizes.push((bracket_size / (1usize << (j + 1))).max(1));
        for i in 0..lb_round_sizes[k - 1] {
            let match_id = format!("L{k}_{}", i + 1);
            matches.insert(match_id.clone(), BracketMatch::new(match_id));
        }
    }

    for k in 1..=lb_rounds {
        let j = (k + 1) / 2;
        if k % 2 == 1 {
            if j == 1 {
                for i in 0..wb_round_sizes[0] {
                    let from_id = format!("W1_{}", i + 1);
                    let to_id = format!("L1_{}", i / 2 + 1);
                    let slot = if i % 2 == 0 { Slot::One } else { Slot::Two };
                    matches.get_mut(&from_id).unwrap().loser_to = Some((to_id, slot));
                }
            } else {
                let prev_size = lb_round_sizes[k - 2];
                for i in 0..prev_size {
                    let from_id = format!("L{}_{}", k - 1, i + 1);
                    let to_id = format!("L{k}_{}", i / 2 + 1);
                    let slot = if i % 2 == 0 { Slot::One } else { Slot::Two };
                    matches.get_mut(&from_id).unwrap().winner_to = Some((to_id, slot));
                }
            }
        } else {
            let prev_size = lb_round_sizes[k - 2];
            for i in 0..prev_size {
                let from_id = format!("L{}_{}", k - 1, i + 1);
                let to_id = format!("L{k}_{}", i + 1);
                matches.get_mut(&from_id).unwrap().winner_to = Some((to_id, Slot::One));
            }
            let wb_round = j + 1;
            for i in 0..wb_round_sizes[wb_round - 1] {
                let from_id = format!("W{wb_round}_{}", i + 1);
                let to_id = format!("L{k}_{}", i + 1);
                matches.get_mut(&from_id).unwrap().loser_to = Some((to_id, Slot::Two));
            }
        }
    }

    // Grand finals only exist once there's a losers bracket to produce a
    // challenger; with exactly 2 competitors, WB1 doubles as the final.
    if lb_rounds > 0 {
        let wb_final_id = format!("W{w}_1");
        matches.get_mut(&wb_final_id).unwrap().winner_to = Some(("F1".into(), Slot::One));
        let lb_final_id = format!("L{lb_rounds}_1");
        matches.get_mut(&lb_final_id).unwrap().winner_to = Some(("F1".into(), Slot::Two));
        matches.insert("F1".into(), BracketMatch::new("F1"));
        matches.insert("F2".into(), BracketMatch::new("F2"));
    }

    let mut state = BirlingBracketState {
        competitors: competitors.iter().map(|c| c.0).collect(),
        names,
        matches,
        placements: HashMap::new(),
        true_finals_needed: false,
        stage: BracketStage::InProgress,
    };
    resolve_byes(&mut state);
    Ok(state)
}

/// Pushes round-1 bye winners forward; harmless no-op once no byes remain.
fn resolve_byes(state: &mut BirlingBracketState) {
    let mut advanced: std::collections::HashSet<String> = Default::default();
    let mut changed = true;
    while changed {
        changed = false;
        let ids: Vec<String> = state.matches.keys().cloned().collect();
        for id in ids {
            let (winner, is_bye, winner_to) = {
                let m = &state.matches[&id];
                (m.winner, m.is_bye, m.winner_to.clone())
            };
            if is_bye && winner.is_some() && !advanced.contains(&id) {
                if let Some(dest) = winner_to {
                    place_competitor(&mut state.matches, &dest, winner.unwrap());
                }
                advanced.insert(id);
                changed = true;
            }
        }
    }
}

fn decide(state: &mut BirlingBracketState, match_id: &str, winner_id: Uuid) -> Result<(Uuid, Uuid), String> {
    let m = state
        .matches
        .get_mut(match_id)
        .ok_or_else(|| format!("match {match_id} not found"))?;
    if m.winner.is_some() {
        return Err(format!("match {match_id} already decided"));
    }
    let loser_id = if m.competitor1 == Some(winner_id) {
        m.competitor2
    } else if m.competitor2 == Some(winner_id) {
        m.competitor1
    } else {
        return Err(format!("competitor {winner_id} is not in match {match_id}"));
    }
    .ok_or_else(|| format!("match {match_id} has no opposing competitor yet"))?;
    m.winner = Some(winner_id);
    m.loser = Some(loser_id);
    Ok((winner_id, loser_id))
}

fn record_elimination(state: &mut BirlingBracketState, competitor_id: Uuid) {
    let current_eliminations = state.placements.len();
    let total = state.competitors.len();
    let position = (total - current_eliminations) as u32;
    state.placements.insert(competitor_id, position);
}

/// Records the winner of `match_id`, advancing the winner (and, for
/// non-terminal matches, dropping the loser) per the precomputed table.
pub fn record_match_result(
    state: &mut BirlingBracketState,
    match_id: &str,
    winner_id: Uuid,
) -> Result<(), String> {
    if match_id == "F2" {
        let (w, l) = decide(state, "F2", winner_id)?;
        state.placements.insert(w, 1);
        state.placements.insert(l, 2);
        state.stage = BracketStage::Completed;
        return Ok(());
    }

    if match_id == "F1" {
        let (w, l) = decide(state, "F1", winner_id)?;
        let wb_side_won = state.matches["F1"].competitor1 == Some(w);
        if wb_side_won {
            state.placements.insert(w, 1);
            state.placements.insert(l, 2);
            state.stage = BracketStage::Completed;
        } else {
            state.true_finals_needed = true;
            if let Some(f2) = state.matches.get_mut("F2") {
                f2.competitor1 = Some(l); // winners-bracket champion, now once-beaten
                f2.competitor2 = Some(w); // losers-bracket champion
            }
        }
        return Ok(());
    }

    let (loser_id, winner_to, loser_to) = {
        let (_, l) = decide(state, match_id, winner_id)?;
        let m = &state.matches[match_id];
        (l, m.winner_to.clone(), m.loser_to.clone())
    };

    match winner_to {
        // Only the 2-competitor degenerate bracket (no losers bracket at
        // all) leaves a match with nowhere further for its winner to go.
        None => {
            state.placements.insert(winner_id, 1);
            state.placements.insert(loser_id, 2);
            state.stage = BracketStage::Completed;
        }
        Some(dest) => {
            place_competitor(&mut state.matches, &dest, winner_id);
            match loser_to {
                Some(dest) => place_competitor(&mut state.matches, &dest, loser_id),
                None => record_elimination(state, loser_id),
            }
            if state.placements.len() == state.competitors.len() {
                state.stage = BracketStage::Completed;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn competitors(n: usize) -> Vec<(Uuid, String)> {
        (0..n).map(|i| (Uuid::new_v4(), format!("c{i}"))).collect()
    }

    #[test]
    fn power_of_two_bracket_plays_to_completion() {
        let comps = competitors(4);
        let mut state = build_bracket(&comps, None).unwrap();
        record_match_result(&mut state, "W1_1", comps[0].0).unwrap();
        record_match_result(&mut state, "W1_2", comps[2].0).unwrap();
        record_match_result(&mut state, "W2_1", comps[0].0).unwrap();
        // L1_1 pits WB1 losers comps[1] vs comps[3]
        record_match_result(&mut state, "L1_1", comps[3].0).unwrap();
        // L2_1 merges LB1 winner (comps[3]) with WB final loser (comps[2])
        record_match_result(&mut state, "L2_1", comps[3].0).unwrap();
        record_match_result(&mut state, "F1", comps[3].0).unwrap();
        assert!(state.true_finals_needed);
        record_match_result(&mut state, "F2", comps[0].0).unwrap();
        assert_eq!(state.stage, BracketStage::Completed);
        assert_eq!(state.placements[&comps[0].0], 1);
        assert_eq!(state.placements[&comps[3].0], 2);
        assert_eq!(state.placements[&comps[2].0], 3);
        assert_eq!(state.placements[&comps[1].0], 4);
    }

    #[test]
    fn byes_auto_advance_for_non_power_of_two_fields() {
        let comps = competitors(5);
        let state = build_bracket(&comps, None).unwrap();
        // bracket_size = 8, 3 byes in round 1
        let byes = state.matches.values().filter(|m| m.is_bye).count();
        assert_eq!(byes, 3);
        // a bye's winner should already be seeded into round 2
        let w1_1 = &state.matches["W1_1"];
        assert!(w1_1.winner.is_some());
    }

    #[test]
    fn two_competitor_bracket_decides_directly() {
        let comps = competitors(2);
        let mut state = build_bracket(&comps, None).unwrap();
        assert!(state.matches.get("F1").is_none());
        record_match_result(&mut state, "W1_1", comps[0].0).unwrap();
        assert_eq!(state.stage, BracketStage::Completed);
        assert_eq!(state.placements[&comps[0].0], 1);
        assert_eq!(state.placements[&comps[1].0], 2);
    }
}
