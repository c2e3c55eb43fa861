//! # rimworld-gm-core
//!
//! Core types for the RimWorld Game Master HTTP API.
//!
//! This crate provides the types shared by the bridge, the MCP server and the
//! contract harness:
//! - Event trigger payloads and the intensity-to-points table
//! - In-game message payloads
//! - Colony state and health snapshots
//! - The `{success:false, error, message}` error envelope
//! - Error types and the error taxonomy

pub mod api;
pub mod error;
pub mod event;
pub mod message;
pub mod state;

pub use api::ApiErrorResponse;
pub use error::{ApiErrorCode, ErrorCategory, GmError, Result};
pub use event::{EventAccepted, EventIntensity, EventParams, EventTriggerPayload, EventType};
pub use message::{MESSAGE_DURATION_SECS, MessageAccepted, MessagePayload, MessageStyle};
pub use state::{Colony, HealthReport, HealthStatus, Resources, StatusSnapshot, Threats};
