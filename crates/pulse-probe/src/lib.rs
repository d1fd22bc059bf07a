//! pulse-probe: liveness checks for registered endpoints.
//!
//! Performs HTTP GET probes with a per-endpoint retry policy and a
//! constant delay between attempts, then classifies the outcome.
//!
//! # Architecture
//!
//! ```text
//! Sweep ("test all", fail-fast or collect-all)
//!   └── Prober::probe(endpoint) → ProbeResult
//!         ├── Fetch::get(url) → status | FetchError   (per attempt)
//!         ├── 2xx → Success, anything else → Failure
//!         └── DelayPolicy::wait() between failed attempts
//! ```
//!
//! Probing is strictly sequential. The only suspensions are the HTTP
//! request itself (bounded by the fetcher's timeout) and the
//! inter-attempt delay.

pub mod client;
pub mod duration;
pub mod fetch;
pub mod prober;
pub mod sweep;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{DEFAULT_TIMEOUT, HttpFetcher};
pub use duration::parse_duration;
pub use fetch::{Fetch, FetchError};
pub use prober::{FailureReason, ProbeOutcome, ProbeResult, Prober};
pub use sweep::{Sweep, SweepEvent, SweepMode, SweepReport};

pub use http::StatusCode;
