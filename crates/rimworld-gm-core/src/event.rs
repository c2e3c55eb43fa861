//! Event trigger types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Difficulty knob for triggered events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventIntensity {
    Low,
    #[default]
    Medium,
    High,
}

impl EventIntensity {
    pub const ALL: [EventIntensity; 3] = [
        EventIntensity::Low,
        EventIntensity::Medium,
        EventIntensity::High,
    ];

    /// Resolve a caller-supplied intensity.
    ///
    /// Anything other than the strings `"low"` and `"high"`, including
    /// absent and non-string values, resolves to `Medium`.
    pub fn resolve(raw: Option<&Value>) -> Self {
        match raw.and_then(Value::as_str) {
            Some("low") => EventIntensity::Low,
            Some("high") => EventIntensity::High,
            _ => EventIntensity::Medium,
        }
    }

    /// Point budget handed to the remote event generator
    pub fn points(self) -> u32 {
        match self {
            EventIntensity::Low => 200,
            EventIntensity::Medium => 500,
            EventIntensity::High => 1000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventIntensity::Low => "low",
            EventIntensity::Medium => "medium",
            EventIntensity::High => "high",
        }
    }
}

/// Event types advertised to callers.
///
/// Only advertised; the remote is the authority on which types it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Raid,
    Manhunter,
    CargoPod,
    Wanderer,
    SolarFlare,
    ToxicFallout,
    PsychicDrone,
    Trader,
    Inspiration,
}

impl EventType {
    pub const ALL: [EventType; 9] = [
        EventType::Raid,
        EventType::Manhunter,
        EventType::CargoPod,
        EventType::Wanderer,
        EventType::SolarFlare,
        EventType::ToxicFallout,
        EventType::PsychicDrone,
        EventType::Trader,
        EventType::Inspiration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Raid => "raid",
            EventType::Manhunter => "manhunter",
            EventType::CargoPod => "cargo_pod",
            EventType::Wanderer => "wanderer",
            EventType::SolarFlare => "solar_flare",
            EventType::ToxicFallout => "toxic_fallout",
            EventType::PsychicDrone => "psychic_drone",
            EventType::Trader => "trader",
            EventType::Inspiration => "inspiration",
        }
    }
}

/// Body of `POST /event`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTriggerPayload {
    /// Forwarded as given; `null` when the caller omitted it
    pub event_type: Option<Value>,
    pub params: EventParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParams {
    pub points: u32,
    pub target_colonist: Option<Value>,
}

impl EventTriggerPayload {
    pub fn new(
        event_type: Option<Value>,
        intensity: EventIntensity,
        target_colonist: Option<Value>,
    ) -> Self {
        Self {
            event_type,
            params: EventParams {
                points: intensity.points(),
                target_colonist,
            },
        }
    }
}

/// Successful `POST /event` reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAccepted {
    pub success: bool,
    pub message: String,
    pub event_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_intensity_points() {
        assert_eq!(EventIntensity::resolve(Some(&json!("low"))).points(), 200);
        assert_eq!(EventIntensity::resolve(Some(&json!("medium"))).points(), 500);
        assert_eq!(EventIntensity::resolve(Some(&json!("high"))).points(), 1000);
        assert_eq!(EventIntensity::resolve(None).points(), 500);
    }

    #[test]
    fn test_unrecognized_intensity_is_medium() {
        for raw in [json!("extreme"), json!("HIGH"), json!(3), json!(true), json!(["high"])] {
            assert_eq!(EventIntensity::resolve(Some(&raw)), EventIntensity::Medium, "{}", raw);
        }
    }

    #[test]
    fn test_event_type_names_match_serde() {
        for event_type in EventType::ALL {
            let json = serde_json::to_value(event_type).unwrap();
            assert_eq!(json, event_type.as_str());
        }
    }

    #[test]
    fn test_payload_shape() {
        let payload = EventTriggerPayload::new(Some(json!("raid")), EventIntensity::High, None);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "event_type": "raid",
                "params": { "points": 1000, "target_colonist": null }
            })
        );
    }
}
