//! Catalog and tuning constants for the tournament engine: stand catalogs,
//! event catalogs, placement points, and the handful of operator-tunable
//! knobs (job worker count, cache TTLs) that the engine itself reads.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum spacing (in heats) a flight must leave between a competitor's
/// two appearances.
pub const MIN_HEAT_SPACING: i64 = 4;
/// Spacing at or above which a flight placement earns a bonus.
pub const TARGET_HEAT_SPACING: i64 = 5;

pub const MIN_TEAM_SIZE_PER_GENDER: usize = 2;
pub const MAX_TEAM_SIZE: usize = 8;
pub const MAX_CLOSED_EVENTS_PER_ATHLETE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandType {
    Springboard,
    Underhand,
    StandingBlock,
    CookieStack,
    SawHand,
    StockSaw,
    HotSaw,
    ObstaclePole,
    SpeedClimb,
    Chokerman,
    AxeThrow,
    Caber,
    Peavey,
    PulpToss,
    Birling,
}

#[derive(Debug, Clone)]
pub struct StandConfig {
    pub total: u16,
    pub uses_per_event: Option<u16>,
    pub supports_handedness: bool,
    pub shared_with: Option<StandType>,
    pub groups: Option<Vec<Vec<u16>>>,
    pub specific_stands: Option<Vec<u16>>,
    pub labels: Vec<&'static str>,
}

impl StandConfig {
    /// Stand numbers usable for this stand type, in order.
    pub fn stand_numbers(&self) -> Vec<u16> {
        if let Some(specific) = &self.specific_stands {
            specific.clone()
        } else {
            (1..=self.total).collect()
        }
    }
}

pub fn stand_config(stand_type: StandType) -> StandConfig {
    use StandType::*;
    match stand_type {
        Springboard => StandConfig {
            total: 4,
            uses_per_event: Some(3),
            supports_handedness: true,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Dummy 1", "Dummy 2", "Dummy 3", "Dummy 4"],
        },
        Underhand => StandConfig {
            total: 5,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Stand 1", "Stand 2", "Stand 3", "Stand 4", "Stand 5"],
        },
        StandingBlock => StandConfig {
            total: 5,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: Some(CookieStack),
            groups: None,
            specific_stands: None,
            labels: vec!["Stand 1", "Stand 2", "Stand 3", "Stand 4", "Stand 5"],
        },
        CookieStack => StandConfig {
            total: 5,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: Some(StandingBlock),
            groups: None,
            specific_stands: None,
            labels: vec!["Stand 1", "Stand 2", "Stand 3", "Stand 4", "Stand 5"],
        },
        SawHand => StandConfig {
            total: 8,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: Some(vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]),
            specific_stands: None,
            labels: vec![
                "Stand 1", "Stand 2", "Stand 3", "Stand 4", "Stand 5", "Stand 6", "Stand 7",
                "Stand 8",
            ],
        },
        StockSaw => StandConfig {
            total: 2,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: Some(vec![1, 2]),
            labels: vec!["Stand 1", "Stand 2"],
        },
        HotSaw => StandConfig {
            total: 4,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: Some(vec![1, 2, 3, 4]),
            labels: vec!["Stand 1", "Stand 2", "Stand 3", "Stand 4"],
        },
        ObstaclePole => StandConfig {
            total: 2,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Pole 1", "Pole 2"],
        },
        SpeedClimb => StandConfig {
            total: 2,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Pole 2", "Pole 4"],
        },
        Chokerman => StandConfig {
            total: 2,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Course 1", "Course 2"],
        },
        AxeThrow => StandConfig {
            total: 1,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Target"],
        },
        Caber => StandConfig {
            total: 1,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Field"],
        },
        Peavey => StandConfig {
            total: 1,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Log"],
        },
        PulpToss => StandConfig {
            total: 1,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Platform"],
        },
        Birling => StandConfig {
            total: 1,
            uses_per_event: None,
            supports_handedness: false,
            shared_with: None,
            groups: None,
            specific_stands: None,
            labels: vec!["Pond"],
        },
    }
}

/// Placement points for college events, keyed by 1-based finishing position.
pub fn placement_points(position: u32) -> u32 {
    match position {
        1 => 10,
        2 => 7,
        3 => 5,
        4 => 3,
        5 => 2,
        6 => 1,
        _ => 0,
    }
}

/// List-only college events: no heats are generated; entries are a sign-up list.
pub const LIST_ONLY_EVENT_NAMES: &[&str] = &[
    "Axe Throw",
    "Peavey Log Roll",
    "Caber Toss",
    "Pulp Toss",
];

pub const COLLEGE_NAME_RANK: &[&str] = &[
    "Axe Throw",
    "Peavey Log Roll",
    "Caber Toss",
    "Pulp Toss",
    "Underhand Hard Hit",
    "Underhand Speed",
    "Standing Block Hard Hit",
    "Standing Block Speed",
    "Single Buck",
    "Double Buck",
    "Jack & Jill Sawing",
    "Stock Saw",
    "Speed Climb",
    "Obstacle Pole",
    "Chokerman's Race",
    "1-Board Springboard",
    "Birling",
];

pub const PRO_NAME_RANK: &[&str] = &[
    "Springboard",
    "Underhand",
    "Standing Block",
    "Stock Saw",
    "Hot Saw",
    "Single Buck",
    "Double Buck",
    "Jack & Jill Sawing",
    "Obstacle Pole",
    "Cookie Stack",
    "Pole Climb",
    "Partnered Axe Throw",
    "Pro 1-Board",
    "3-Board Jigger",
];

/// Fixed Saturday spillover ordering for college events intermixed into the
/// pro show, keyed by (event name, gender).
pub fn spillover_priority(name: &str, gender: Option<&str>) -> u32 {
    let table: &[(&str, &str)] = &[
        ("Standing Block Speed", "M"),
        ("Standing Block Hard Hit", "M"),
        ("Standing Block Speed", "F"),
        ("Standing Block Hard Hit", "F"),
        ("Obstacle Pole", "M"),
    ];
    for (idx, (n, g)) in table.iter().enumerate() {
        if *n == name && Some(*g) == gender {
            return idx as u32 + 1;
        }
    }
    999
}

pub const RELAY_EVENTS: &[&str] = &[
    "partnered_sawing",
    "standing_butcher_block",
    "underhand_butcher_block",
    "team_axe_throw",
];

/// Operator-tunable runtime configuration. Values not consumed by the engine
/// (upload folder, malware scan command) are carried only as passthrough data
/// for the external collaborators that use them.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub job_max_workers: usize,
    pub report_cache_ttl_seconds: u64,
    pub polling_cache_ttl_seconds: u64,
    pub upload_folder: String,
    pub enable_upload_malware_scan: bool,
    pub malware_scan_command: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            job_max_workers: 2,
            report_cache_ttl_seconds: 60,
            polling_cache_ttl_seconds: 5,
            upload_folder: "uploads".to_string(),
            enable_upload_malware_scan: false,
            malware_scan_command: None,
        }
    }
}

impl EngineConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        EngineConfig {
            job_max_workers: std::env::var("JOB_MAX_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.job_max_workers),
            report_cache_ttl_seconds: std::env::var("REPORT_CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.report_cache_ttl_seconds),
            polling_cache_ttl_seconds: defaults.polling_cache_ttl_seconds,
            upload_folder: std::env::var("UPLOAD_FOLDER").unwrap_or(defaults.upload_folder),
            enable_upload_malware_scan: std::env::var("ENABLE_UPLOAD_MALWARE_SCAN")
                .map(|v| v == "1")
                .unwrap_or(defaults.enable_upload_malware_scan),
            malware_scan_command: std::env::var("MALWARE_SCAN_COMMAND").ok().filter(|s| !s.is_empty()),
        }
    }
}

/// A catalog entry used to seed Event rows for a tournament.
#[derive(Debug, Clone)]
pub struct EventTemplate {
    pub name: &'static str,
    pub scoring_type: &'static str,
    pub stand_type: Option<StandType>,
    pub is_gendered: bool,
    pub is_partnered: bool,
    pub partner_gender: Option<&'static str>,
    pub requires_dual_runs: bool,
    pub has_prelims: bool,
}

const fn tmpl(
    name: &'static str,
    scoring_type: &'static str,
    stand_type: Option<StandType>,
) -> EventTemplate {
    EventTemplate {
        name,
        scoring_type,
        stand_type,
        is_gendered: false,
        is_partnered: false,
        partner_gender: None,
        requires_dual_runs: false,
        has_prelims: false,
    }
}

pub fn college_open_events() -> Vec<EventTemplate> {
    vec![
        tmpl("Axe Throw", "score", Some(StandType::AxeThrow)),
        EventTemplate {
            is_partnered: true,
            partner_gender: Some("mixed"),
            ..tmpl("Peavey Log Roll", "time", Some(StandType::Peavey))
        },
        tmpl("Caber Toss", "distance", Some(StandType::Caber)),
        EventTemplate {
            is_partnered: true,
            partner_gender: Some("mixed"),
            ..tmpl("Pulp Toss", "time", Some(StandType::PulpToss))
        },
    ]
}

pub fn college_closed_events() -> Vec<EventTemplate> {
    vec![
        EventTemplate { is_gendered: true, ..tmpl("Underhand Hard Hit", "hits", Some(StandType::Underhand)) },
        EventTemplate { is_gendered: true, ..tmpl("Underhand Speed", "time", Some(StandType::Underhand)) },
        EventTemplate { is_gendered: true, ..tmpl("Standing Block Hard Hit", "hits", Some(StandType::StandingBlock)) },
        EventTemplate { is_gendered: true, ..tmpl("Standing Block Speed", "time", Some(StandType::StandingBlock)) },
        EventTemplate { is_gendered: true, ..tmpl("Single Buck", "time", Some(StandType::SawHand)) },
        EventTemplate {
            is_gendered: true,
            is_partnered: true,
            partner_gender: Some("same"),
            ..tmpl("Double Buck", "time", Some(StandType::SawHand))
        },
        EventTemplate {
            is_partnered: true,
            partner_gender: Some("mixed"),
            ..tmpl("Jack & Jill Sawing", "time", Some(StandType::SawHand))
        },
        EventTemplate { is_gendered: true, ..tmpl("Stock Saw", "time", Some(StandType::StockSaw)) },
        EventTemplate { is_gendered: true, requires_dual_runs: true, ..tmpl("Speed Climb", "time", Some(StandType::SpeedClimb)) },
        EventTemplate { is_gendered: true, ..tmpl("Obstacle Pole", "time", Some(StandType::ObstaclePole)) },
        EventTemplate { is_gendered: true, requires_dual_runs: true, ..tmpl("Chokerman's Race", "time", Some(StandType::Chokerman)) },
        EventTemplate { is_gendered: true, ..tmpl("Birling", "bracket", Some(StandType::Birling)) },
        EventTemplate { is_gendered: true, ..tmpl("1-Board Springboard", "time", Some(StandType::Springboard)) },
    ]
}

pub fn pro_events() -> Vec<EventTemplate> {
    vec![
        tmpl("Springboard", "time", Some(StandType::Springboard)),
        tmpl("Pro 1-Board", "time", Some(StandType::Springboard)),
        tmpl("3-Board Jigger", "time", Some(StandType::Springboard)),
        EventTemplate { is_gendered: true, ..tmpl("Underhand", "time", Some(StandType::Underhand)) },
        EventTemplate { is_gendered: true, ..tmpl("Standing Block", "time", Some(StandType::StandingBlock)) },
        EventTemplate { is_gendered: true, ..tmpl("Stock Saw", "time", Some(StandType::StockSaw)) },
        tmpl("Hot Saw", "time", Some(StandType::HotSaw)),
        EventTemplate { is_gendered: true, ..tmpl("Single Buck", "time", Some(StandType::SawHand)) },
        EventTemplate { is_gendered: true, is_partnered: true, ..tmpl("Double Buck", "time", Some(StandType::SawHand)) },
        EventTemplate {
            is_partnered: true,
            partner_gender: Some("mixed"),
            ..tmpl("Jack & Jill Sawing", "time", Some(StandType::SawHand))
        },
        EventTemplate {
            is_partnered: true,
            has_prelims: true,
            ..tmpl("Partnered Axe Throw", "score", Some(StandType::AxeThrow))
        },
        tmpl("Obstacle Pole", "time", Some(StandType::ObstaclePole)),
        tmpl("Pole Climb", "time", Some(StandType::SpeedClimb)),
        tmpl("Cookie Stack", "time", Some(StandType::CookieStack)),
    ]
}

/// College name-rank lookup used by the schedule builder's sort keys.
pub fn college_name_rank(name: &str) -> u32 {
    lookup_rank(name, COLLEGE_NAME_RANK)
}

pub fn pro_name_rank(name: &str) -> u32 {
    lookup_rank(name, PRO_NAME_RANK)
}

fn lookup_rank(name: &str, ordered: &[&str]) -> u32 {
    let target = normalize_name(name);
    for (idx, candidate) in ordered.iter().enumerate() {
        if normalize_name(candidate) == target {
            return idx as u32;
        }
    }
    ordered.len() as u32 + 100
}

fn normalize_name(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Stand-type → stand-config lookup table, exposed for callers that want to
/// iterate everything (e.g. the validator).
pub fn all_stand_types() -> HashMap<StandType, StandConfig> {
    use StandType::*;
    [
        Springboard, Underhand, StandingBlock, CookieStack, SawHand, StockSaw, HotSaw,
        ObstaclePole, SpeedClimb, Chokerman, AxeThrow, Caber, Peavey, PulpToss, Birling,
    ]
    .into_iter()
    .map(|st| (st, stand_config(st)))
    .collect()
}
