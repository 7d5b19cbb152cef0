//! Derived read views: standings-poll and spectator-portal payloads,
//! cached under deterministic keys and invalidated in bulk on tournament
//! mutation.

use crate::domain::{CollegeCompetitor, EventResult, Gender, Team};
use crate::ports::cache::{tournament_cache_prefixes, CachePort};
use crate::scoring::{individual_standings, team_standings};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsPollPayload {
    pub tournament_id: Uuid,
    pub top_individuals: Vec<(u32, String)>,
    pub top_teams: Vec<(u32, String)>,
}

/// `api:standings-poll:<tournament_id>`, a short-TTL payload meant to be
/// hit by a spectator app's poll loop rather than a websocket push.
pub fn build_standings_poll(
    tournament_id: Uuid,
    competitors: Vec<CollegeCompetitor>,
    teams: Vec<Team>,
) -> StandingsPollPayload {
    let top_individuals = individual_standings(competitors, None, Some(10))
        .into_iter()
        .map(|r| (r.rank, r.competitor.name))
        .collect();
    let top_teams = team_standings(teams, Some(10))
        .into_iter()
        .map(|r| (r.rank, r.team.school_name))
        .collect();

    StandingsPollPayload {
        tournament_id,
        top_individuals,
        top_teams,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollegePortalPayload {
    pub tournament_id: Uuid,
    pub individual_standings: Vec<(u32, String, u32)>,
    pub team_standings: Vec<(u32, String, u32)>,
}

/// `portal:college:<tournament_id>`: the full (ungendered) team and
/// individual standings board shown to spectators.
pub fn build_college_portal(
    tournament_id: Uuid,
    competitors: Vec<CollegeCompetitor>,
    teams: Vec<Team>,
) -> CollegePortalPayload {
    let individual_standings = individual_standings(competitors, None, None)
        .into_iter()
        .map(|r| (r.rank, r.competitor.name, r.competitor.individual_points))
        .collect();
    let team_standings = team_standings(teams, None)
        .into_iter()
        .map(|r| (r.rank, r.team.school_name, r.team.total_points))
        .collect();

    CollegePortalPayload {
        tournament_id,
        individual_standings,
        team_standings,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProPortalEntry {
    pub competitor_name: String,
    pub total_earnings: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProPortalPayload {
    pub tournament_id: Uuid,
    pub earnings_leaderboard: Vec<ProPortalEntry>,
}

/// `portal:pro:<tournament_id>`: pro earnings leaderboard, highest first.
pub fn build_pro_portal(
    tournament_id: Uuid,
    competitors: &[crate::domain::ProCompetitor],
) -> ProPortalPayload {
    let mut entries: Vec<ProPortalEntry> = competitors
        .iter()
        .map(|c| ProPortalEntry {
            competitor_name: c.name.clone(),
            total_earnings: c.total_earnings,
        })
        .collect();
    entries.sort_by(|a, b| b.total_earnings.partial_cmp(&a.total_earnings).unwrap_or(std::cmp::Ordering::Equal));

    ProPortalPayload {
        tournament_id,
        earnings_leaderboard: entries,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutSummaryEntry {
    pub competitor_name: String,
    pub event_id: Uuid,
    pub payout_amount: f64,
}

/// `reports:<tournament_id>:payout_summary`: per-result payout rows for
/// the treasurer's report, highest payout first.
pub fn build_payout_summary(results: &[EventResult]) -> Vec<PayoutSummaryEntry> {
    let mut entries: Vec<PayoutSummaryEntry> = results
        .iter()
        .filter(|r| r.payout_amount > 0.0)
        .map(|r| PayoutSummaryEntry {
            competitor_name: r.competitor_name.clone(),
            event_id: r.event_id,
            payout_amount: r.payout_amount,
        })
        .collect();
    entries.sort_by(|a, b| b.payout_amount.partial_cmp(&a.payout_amount).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStandingsPayload {
    pub tournament_id: Uuid,
    pub gender_filter: Option<Gender>,
    pub standings: Vec<(u32, String, u32)>,
}

/// `reports:<tournament_id>:college_standings[:gender]`, the print-ready
/// standings report.
pub fn build_report_standings(
    tournament_id: Uuid,
    competitors: Vec<CollegeCompetitor>,
    gender_filter: Option<Gender>,
) -> ReportStandingsPayload {
    let standings = individual_standings(competitors, gender_filter, None)
        .into_iter()
        .map(|r| (r.rank, r.competitor.name, r.competitor.individual_points))
        .collect();

    ReportStandingsPayload {
        tournament_id,
        gender_filter,
        standings,
    }
}

/// Fetches a cached payload by key, or computes it with `build`, caches
/// it for `ttl`, and returns it. `build`/serialization failures bubble
/// up rather than silently serving stale data.
pub async fn cached<T, F>(
    cache: &dyn CachePort,
    key: &str,
    ttl: Duration,
    build: F,
) -> Result<T, serde_json::Error>
where
    T: Serialize + for<'de> Deserialize<'de>,
    F: FnOnce() -> T,
{
    if let Some(raw) = cache.get(key).await {
        if let Ok(value) = serde_json::from_str(&raw) {
            return Ok(value);
        }
    }

    let value = build();
    let raw = serde_json::to_string(&value)?;
    cache.set(key, raw, ttl).await;
    Ok(value)
}

/// Deletes every cached read view that a write to this tournament could
/// have staled. Mirrors `cache_invalidation.invalidate_tournament_caches`.
pub async fn invalidate_tournament_caches(cache: &dyn CachePort, tournament_id: Uuid) {
    for prefix in tournament_cache_prefixes(tournament_id) {
        cache.invalidate_prefix(&prefix).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompetitorStatus, TeamStatus};
    use crate::ports::cache::InMemoryCache;
    use std::collections::HashMap;

    fn competitor(points: u32) -> CollegeCompetitor {
        CollegeCompetitor {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            name: "Jo".into(),
            gender: Gender::Male,
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

    fn team(points: u32) -> Team {
        Team {
            id: Uuid::new_v4(),
            tournament_id: Uuid::new_v4(),
            team_code: "A".into(),
            school_name: "A U".into(),
            school_abbrev: "AU".into(),
            total_points: points,
            status: TeamStatus::Active,
            version: 0,
        }
    }

    #[tokio::test]
    async fn cached_recomputes_once_then_serves_the_cache() {
        let cache = InMemoryCache::new();
        let calls = std::sync::atomic::AtomicU32::new(0);
        let key = "reports:t1:college_standings";

        for _ in 0..2 {
            let payload: StandingsPollPayload = cached(&cache, key, Duration::from_secs(60), || {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                build_standings_poll(Uuid::new_v4(), vec![competitor(10)], vec![team(10)])
            })
            .await
            .unwrap();
            assert_eq!(payload.top_individuals.len(), 1);
        }

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_clears_every_tournament_prefix() {
        let cache = InMemoryCache::new();
        let tournament_id = Uuid::new_v4();
        for prefix in tournament_cache_prefixes(tournament_id) {
            cache.set(&format!("{prefix}x"), "stale".into(), Duration::from_secs(60)).await;
        }
        invalidate_tournament_caches(&cache, tournament_id).await;
        for prefix in tournament_cache_prefixes(tournament_id) {
            assert_eq!(cache.get(&format!("{prefix}x")).await, None);
        }
    }
}
