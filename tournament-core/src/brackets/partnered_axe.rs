//! Partnered Axe Throw: all pairs throw a hits-scored prelim, the top 4
//! pairs by hits advance to a finals heat that sets 1st-4th; 5th and
//! below are ordered by prelim score.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxeStage {
    Prelims,
    Finals,
    Completed,
}

impl Default for AxeStage {
    fn default() -> Self {
        AxeStage::Prelims
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxePair {
    pub pair_id: u32,
    pub competitor1: Uuid,
    pub competitor1_name: String,
    pub competitor2: Uuid,
    pub competitor2_name: String,
    pub prelim_score: Option<u32>,
    pub final_score: Option<u32>,
    pub final_position: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartneredAxeState {
    pub stage: AxeStage,
    pub pairs: Vec<AxePair>,
    pub finalist_pair_ids: Vec<u32>,
}

pub fn register_pair(
    state: &mut PartneredAxeState,
    competitor1: Uuid,
    competitor1_name: String,
    competitor2: Uuid,
    competitor2_name: String,
) -> u32 {
    let pair_id = state.pairs.len() as u32 + 1;
    state.pairs.push(AxePair {
        pair_id,
        competitor1,
        competitor1_name,
        competitor2,
        competitor2_name,
        prelim_score: None,
        final_score: None,
        final_position: None,
    });
    pair_id
}

pub fn record_prelim_result(
    state: &mut PartneredAxeState,
    pair_id: u32,
    hits: u32,
) -> Result<(), String> {
    let pair = state
        .pairs
        .iter_mut()
        .find(|p| p.pair_id == pair_id)
        .ok_or_else(|| format!("pair {pair_id} not registered"))?;
    pair.prelim_score = Some(hits);
    Ok(())
}

/// Pairs with a recorded prelim score, highest hits first.
pub fn prelim_standings(state: &PartneredAxeState) -> Vec<&AxePair> {
    let mut scored: Vec<&AxePair> = state
        .pairs
        .iter()
        .filter(|p| p.prelim_score.is_some())
        .collect();
    scored.sort_by(|a, b| b.prelim_score.cmp(&a.prelim_score));
    scored
}

pub fn can_advance_to_finals(state: &PartneredAxeState) -> bool {
    let scored = state.pairs.iter().filter(|p| p.prelim_score.is_some()).count();
    scored >= 4 && scored == state.pairs.len()
}

pub fn advance_to_finals(state: &mut PartneredAxeState) -> Result<Vec<u32>, String> {
    if !can_advance_to_finals(state) {
        return Err("cannot advance to finals: not all prelim results are recorded".into());
    }
    let finalists: Vec<u32> = prelim_standings(state)
        .into_iter()
        .take(4)
        .map(|p| p.pair_id)
        .collect();
    state.finalist_pair_ids = finalists.clone();
    state.stage = AxeStage::Finals;
    Ok(finalists)
}

/// Records a finalist's hits; returns whether recording this result
/// completed the finals (all four finalists now scored).
pub fn record_final_result(
    state: &mut PartneredAxeState,
    pair_id: u32,
    hits: u32,
) -> Result<bool, String> {
    if !state.finalist_pair_ids.contains(&pair_id) {
        return Err(format!("pair {pair_id} is not a finalist"));
    }
    let pair = state
        .pairs
        .iter_mut()
        .find(|p| p.pair_id == pair_id)
        .ok_or_else(|| format!("pair {pair_id} not registered"))?;
    pair.final_score = Some(hits);

    let all_scored = state.finalist_pair_ids.iter().all(|id| {
        state
            .pairs
            .iter()
            .find(|p| p.pair_id == *id)
            .and_then(|p| p.final_score)
            .is_some()
    });

    if all_scored {
        let mut finalists: Vec<AxePair> = state
            .pairs
            .iter()
            .filter(|p| state.finalist_pair_ids.contains(&p.pair_id))
            .cloned()
            .collect();
        finalists.sort_by(|a, b| b.final_score.cmp(&a.final_score));
        for (i, f) in finalists.iter().enumerate() {
            let position = (i + 1) as u32;
            if let Some(p) = state.pairs.iter_mut().find(|p| p.pair_id == f.pair_id) {
                p.final_position = Some(position);
            }
        }
        state.stage = AxeStage::Completed;
    }
    Ok(all_scored)
}

/// Final standings: finalists in finals order, then remaining pairs in
/// prelim order, positions continuing from where finals left off.
pub fn full_standings(state: &PartneredAxeState) -> Vec<(u32, u32)> {
    let mut results: Vec<(u32, u32)> = state
        .pairs
        .iter()
        .filter_map(|p| p.final_position.map(|pos| (p.pair_id, pos)))
        .collect();
    results.sort_by_key(|(_, pos)| *pos);

    let mut position = results.len() as u32 + 1;
    for pair in prelim_standings(state) {
        if !state.finalist_pair_ids.contains(&pair.pair_id) {
            results.push((pair.pair_id, position));
            position += 1;
        }
    }
    results
}

/// Clears the bracket back to an empty prelims state, for operators
/// redoing a registration mistake.
pub fn reset(state: &mut PartneredAxeState) {
    *state = PartneredAxeState::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(state: &mut PartneredAxeState) -> u32 {
        register_pair(state, Uuid::new_v4(), "A".into(), Uuid::new_v4(), "B".into())
    }

    #[test]
    fn advances_top_four_and_orders_the_rest_by_prelim_score() {
        let mut state = PartneredAxeState::default();
        let ids: Vec<u32> = (0..6).map(|_| pair(&mut state)).collect();
        let scores = [10, 20, 5, 30, 15, 25];
        for (id, score) in ids.iter().zip(scores) {
            record_prelim_result(&mut state, *id, score).unwrap();
        }
        assert!(can_advance_to_finals(&state));
        let finalists = advance_to_finals(&mut state).unwrap();
        // pairs with scores 30, 25, 20, 15 -> ids[3], ids[5], ids[1], ids[4]
        assert_eq!(finalists, vec![ids[3], ids[5], ids[1], ids[4]]);

        for (id, hits) in finalists.iter().zip([8u32, 12, 6, 4]) {
            record_final_result(&mut state, *id, hits).unwrap();
        }
        assert_eq!(state.stage, AxeStage::Completed);

        let standings = full_standings(&state);
        assert_eq!(standings[0], (finalists[1], 1)); // 12 hits
        assert_eq!(standings.last().unwrap().1, 6); // 6 finishers total
    }

    #[test]
    fn reset_clears_registered_pairs() {
        let mut state = PartneredAxeState::default();
        pair(&mut state);
        reset(&mut state);
        assert!(state.pairs.is_empty());
        assert_eq!(state.stage, AxeStage::Prelims);
    }
}
