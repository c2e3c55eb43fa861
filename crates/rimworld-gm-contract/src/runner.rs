//! Ordered contract probes against a base URL

use crate::mock::UNRECOGNIZED_EVENT_TYPE;
use rimworld_gm_bridge::{HttpMethod, RemoteClient, RemoteResponse};
use rimworld_gm_core::{ApiErrorCode, EventIntensity, EventType, HealthStatus, MessagePayload};
use serde_json::{Value, json};
use tracing::{debug, warn};

/// Outcome of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub name: String,
    pub ok: bool,
    /// `status=..., body=...` of the reply, or why no reply arrived
    pub detail: String,
}

/// One fixed request plus the predicate its reply must satisfy
#[derive(Debug, Clone)]
pub struct Probe {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub body: Option<Value>,
    check: fn(&RemoteResponse) -> bool,
}

impl Probe {
    pub fn accepts(&self, response: &RemoteResponse) -> bool {
        (self.check)(response)
    }
}

fn error_code(body: &Value) -> Option<ApiErrorCode> {
    body.get("error")
        .and_then(|code| serde_json::from_value(code.clone()).ok())
}

fn succeeded(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool) == Some(true)
}

fn health_ok(response: &RemoteResponse) -> bool {
    response.status == 200
        && response
            .body
            .get("status")
            .and_then(|status| serde_json::from_value::<HealthStatus>(status.clone()).ok())
            .is_some()
}

fn state_ok(response: &RemoteResponse) -> bool {
    response.status == 200
        && response.body.get("colony").is_some()
        && response.body.get("threats").is_some()
}

fn event_ok(response: &RemoteResponse) -> bool {
    response.status == 200 && succeeded(&response.body)
}

fn event_rejected(response: &RemoteResponse) -> bool {
    response.status == 400
        && matches!(
            error_code(&response.body),
            Some(ApiErrorCode::InvalidEvent | ApiErrorCode::InvalidRequest)
        )
}

fn message_ok(response: &RemoteResponse) -> bool {
    response.status == 200 && succeeded(&response.body)
}

fn message_rejected(response: &RemoteResponse) -> bool {
    response.status == 400 && error_code(&response.body) == Some(ApiErrorCode::InvalidRequest)
}

/// The six contract probes, in execution order
pub fn probes() -> Vec<Probe> {
    let greeting = MessagePayload::new(Some("Hello colony".into()), None);

    vec![
        Probe {
            name: "health happy",
            method: HttpMethod::Get,
            path: "/health",
            body: None,
            check: health_ok,
        },
        Probe {
            name: "state happy",
            method: HttpMethod::Get,
            path: "/state",
            body: None,
            check: state_ok,
        },
        Probe {
            name: "event happy",
            method: HttpMethod::Post,
            path: "/event",
            body: Some(json!({
                "event_type": EventType::Raid.as_str(),
                "params": { "points": EventIntensity::Medium.points() },
            })),
            check: event_ok,
        },
        Probe {
            name: "event error path",
            method: HttpMethod::Post,
            path: "/event",
            body: Some(json!({ "event_type": UNRECOGNIZED_EVENT_TYPE })),
            check: event_rejected,
        },
        Probe {
            name: "message happy",
            method: HttpMethod::Post,
            path: "/message",
            body: serde_json::to_value(greeting).ok(),
            check: message_ok,
        },
        Probe {
            name: "message error path",
            method: HttpMethod::Post,
            path: "/message",
            body: Some(json!({ "type": "info" })),
            check: message_rejected,
        },
    ]
}

/// Runs [`probes`] one after another against a single client
pub struct ContractRunner<C> {
    client: C,
}

impl<C: RemoteClient> ContractRunner<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn run(&self) -> ContractReport {
        let mut results = Vec::new();
        for probe in probes() {
            results.push(self.run_probe(&probe).await);
        }
        ContractReport { results }
    }

    async fn run_probe(&self, probe: &Probe) -> ProbeResult {
        debug!("Probe {}: {} {}", probe.name, probe.method.as_str(), probe.path);

        match self
            .client
            .perform(probe.method, probe.path, probe.body.clone())
            .await
        {
            Ok(response) => ProbeResult {
                name: probe.name.to_string(),
                ok: probe.accepts(&response),
                detail: format!("status={}, body={}", response.status, response.body),
            },
            Err(e) => {
                warn!("Probe {} got no reply: {}", probe.name, e);
                ProbeResult {
                    name: probe.name.to_string(),
                    ok: false,
                    detail: format!("request failed: {}", e),
                }
            }
        }
    }
}

/// All probe results of one run, in execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReport {
    pub results: Vec<ProbeResult>,
}

impl ContractReport {
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|result| result.ok).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|result| !result.ok)
    }

    /// 0 when every probe passed, otherwise 1
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }

    /// One line per probe (failures followed by their detail), then the summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let mark = if result.ok { "✅" } else { "❌" };
            out.push_str(&format!("{} {}\n", mark, result.name));
            if !result.ok {
                out.push_str(&format!("   {}\n", result.detail));
            }
        }
        out.push_str(&format!(
            "\nSummary: {}/{} passed\n",
            self.passed(),
            self.total()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(status: u16, body: Value) -> RemoteResponse {
        RemoteResponse { status, body }
    }

    fn probe(name: &str) -> Probe {
        probes().into_iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn test_probe_order_and_bodies() {
        let names: Vec<_> = probes().iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            [
                "health happy",
                "state happy",
                "event happy",
                "event error path",
                "message happy",
                "message error path"
            ]
        );

        assert_eq!(
            probe("event happy").body.unwrap(),
            json!({ "event_type": "raid", "params": { "points": 500 } })
        );
        assert_eq!(
            probe("message happy").body.unwrap(),
            json!({ "text": "Hello colony", "type": "info", "duration": 5 })
        );
    }

    #[test]
    fn test_health_accepts_ok_and_degraded_only() {
        let health = probe("health happy");
        assert!(health.accepts(&reply(200, json!({ "status": "ok" }))));
        assert!(health.accepts(&reply(200, json!({ "status": "degraded" }))));
        assert!(!health.accepts(&reply(200, json!({ "status": "broken" }))));
        assert!(!health.accepts(&reply(503, json!({ "status": "ok" }))));
    }

    #[test]
    fn test_state_requires_colony_and_threats() {
        let state = probe("state happy");
        assert!(state.accepts(&reply(200, json!({ "colony": {}, "threats": {} }))));
        assert!(!state.accepts(&reply(200, json!({ "colony": {} }))));
    }

    #[test]
    fn test_event_error_accepts_either_rejection_code() {
        let event_error = probe("event error path");
        assert!(event_error.accepts(&reply(400, json!({ "error": "INVALID_EVENT" }))));
        assert!(event_error.accepts(&reply(400, json!({ "error": "INVALID_REQUEST" }))));
        assert!(!event_error.accepts(&reply(400, json!({ "error": "NOT_FOUND" }))));
        assert!(!event_error.accepts(&reply(200, json!({ "success": true }))));
    }

    #[test]
    fn test_message_error_requires_invalid_request() {
        let message_error = probe("message error path");
        assert!(message_error.accepts(&reply(400, json!({ "error": "INVALID_REQUEST" }))));
        assert!(!message_error.accepts(&reply(400, json!({ "error": "INVALID_EVENT" }))));
    }

    #[test]
    fn test_render_and_exit_code() {
        let report = ContractReport {
            results: vec![
                ProbeResult {
                    name: "health happy".into(),
                    ok: true,
                    detail: "status=200, body={}".into(),
                },
                ProbeResult {
                    name: "state happy".into(),
                    ok: false,
                    detail: "status=409, body={}".into(),
                },
            ],
        };

        assert_eq!(report.passed(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.render(),
            "✅ health happy\n❌ state happy\n   status=409, body={}\n\nSummary: 1/2 passed\n"
        );
    }

    #[test]
    fn test_empty_report_passes() {
        let report = ContractReport { results: vec![] };
        assert_eq!(report.exit_code(), 0);
    }
}
