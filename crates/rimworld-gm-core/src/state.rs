//! Colony state and health types

use serde::{Deserialize, Serialize};

/// Body of `GET /state`
///
/// The bridge never filters this; it is relayed to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub colony: Colony,
    /// Colonist records, shape owned by the game side
    #[serde(default)]
    pub colonists: Vec<serde_json::Value>,
    pub resources: Resources,
    pub threats: Threats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Colony {
    pub name: String,
    pub wealth: f64,
    pub day: u32,
    pub season: String,
    pub quadrum: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub silver: u32,
    pub food: u32,
    pub medicine: u32,
    pub components: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threats {
    pub active_raids: u32,
    pub nearby_enemies: bool,
    pub toxic_fallout: bool,
}

/// Health of the game-side mod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Body of `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub game_running: bool,
    pub colony_loaded: bool,
    pub mod_version: String,
    pub queue_depth: u32,
    pub uptime_seconds: u64,
}
