//! Client boundary between the RimWorld GM bridge and the game-side HTTP API
//!
//! This crate provides:
//! - `RemoteClient` trait separating "got a reply" from "unreachable" and "timed out"
//! - `HttpRemoteClient`, the reqwest implementation
//! - `RemoteConfig` with the default base URL and per-call timeouts

pub mod config;
pub mod http;
pub mod transport;

pub use config::{BRIDGE_TIMEOUT, DEFAULT_BASE_URL, PROBE_TIMEOUT, RemoteConfig};
pub use http::HttpRemoteClient;
pub use transport::{HttpMethod, RemoteClient, RemoteResponse};
