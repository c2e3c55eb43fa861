//! # rimworld-gm-contract
//!
//! Contract harness for the RimWorld GM HTTP API.
//!
//! - [`MockRemoteServer`] serves the documented routes and error envelopes
//!   on an ephemeral local port
//! - [`ContractRunner`] issues six fixed probes against any base URL and
//!   collects a [`ContractReport`]

pub mod mock;
pub mod runner;

pub use mock::{MockConfig, MockRemoteServer, MockRoute, UNRECOGNIZED_EVENT_TYPE};
pub use runner::{ContractReport, ContractRunner, Probe, ProbeResult, probes};
