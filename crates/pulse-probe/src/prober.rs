//! Probe logic.
//!
//! Runs up to `retry.max_attempts` sequential GETs against one endpoint,
//! pausing the configured constant delay after each failed attempt.

use std::fmt;

use http::StatusCode;
use tracing::{debug, info};

use pulse_core::{Endpoint, Registry};

use crate::fetch::{Fetch, FetchError};
use crate::sweep::Sweep;

/// Why an attempt counted as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The endpoint answered outside `[200, 300)`.
    NonSuccessStatus(StatusCode),
    /// No response: bad URL, DNS, refused connection, TLS, or timeout.
    Transport(FetchError),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonSuccessStatus(status) => write!(f, "status {status}"),
            Self::Transport(e) => write!(f, "{e}"),
        }
    }
}

/// Terminal state of a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// One attempt returned 2xx.
    Success { status: StatusCode },
    /// Every attempt failed; carries the last failure.
    Exhausted { reason: FailureReason },
}

/// Result of probing a single endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub url: String,
    /// Attempts actually performed.
    pub attempts: u32,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProbeOutcome::Success { .. })
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match &self.outcome {
            ProbeOutcome::Exhausted { reason } => Some(reason),
            ProbeOutcome::Success { .. } => None,
        }
    }
}

/// Classify a single attempt.
fn classify(result: Result<StatusCode, FetchError>) -> Result<StatusCode, FailureReason> {
    match result {
        Ok(status) if status.is_success() => Ok(status),
        Ok(status) => Err(FailureReason::NonSuccessStatus(status)),
        Err(e) => Err(FailureReason::Transport(e)),
    }
}

/// Applies retry policies on top of a [`Fetch`] transport.
#[derive(Debug, Clone)]
pub struct Prober<F> {
    fetcher: F,
}

impl<F: Fetch> Prober<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Probe one endpoint, retrying per its policy.
    pub async fn probe(&self, endpoint: &Endpoint) -> ProbeResult {
        let max_attempts = endpoint.retry.attempts();
        let delay = endpoint.retry.delay.wait();
        let url = endpoint.url.as_str();

        let mut attempt = 0;
        loop {
            attempt += 1;
            match classify(self.fetcher.get(url).await) {
                Ok(status) => {
                    debug!(%url, attempt, %status, "probe succeeded");
                    return ProbeResult {
                        url: url.to_string(),
                        attempts: attempt,
                        outcome: ProbeOutcome::Success { status },
                    };
                }
                Err(reason) if attempt >= max_attempts => {
                    info!(%url, attempts = attempt, %reason, "probe exhausted");
                    return ProbeResult {
                        url: url.to_string(),
                        attempts: attempt,
                        outcome: ProbeOutcome::Exhausted { reason },
                    };
                }
                Err(reason) => {
                    debug!(
                        %url,
                        attempt,
                        max_attempts,
                        %reason,
                        ?delay,
                        "attempt failed, retrying"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    /// Start a "test all" pass over the registry, in order.
    pub fn sweep<'a>(&'a self, registry: &'a Registry) -> Sweep<'a, F> {
        Sweep::new(self, registry)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pulse_core::{DelayPolicy, RetryPolicy};

    use super::*;
    use crate::test_support::ScriptedFetcher;

    fn endpoint(attempts: u32, delay: DelayPolicy) -> Endpoint {
        Endpoint::new("http://svc.test/healthz", RetryPolicy::new(attempts, delay))
    }

    fn refused() -> Result<StatusCode, FetchError> {
        Err(FetchError::Transport("connection refused".into()))
    }

    #[test]
    fn classify_status_ranges() {
        assert!(classify(Ok(StatusCode::OK)).is_ok());
        assert!(classify(Ok(StatusCode::NO_CONTENT)).is_ok());
        assert!(classify(Ok(StatusCode::from_u16(299).unwrap())).is_ok());
        assert_eq!(
            classify(Ok(StatusCode::MULTIPLE_CHOICES)),
            Err(FailureReason::NonSuccessStatus(StatusCode::MULTIPLE_CHOICES))
        );
        assert!(classify(Ok(StatusCode::CONTINUE)).is_err());
        assert!(classify(Ok(StatusCode::SERVICE_UNAVAILABLE)).is_err());
        assert!(matches!(classify(refused()), Err(FailureReason::Transport(_))));
    }

    #[tokio::test]
    async fn always_failing_makes_exactly_max_attempts() {
        for n in 1..=5 {
            let fetcher = ScriptedFetcher::always(Ok(StatusCode::INTERNAL_SERVER_ERROR));
            let prober = Prober::new(&fetcher);
            let result = prober.probe(&endpoint(n, DelayPolicy::millis(0.0))).await;

            assert_eq!(result.attempts, n);
            assert_eq!(fetcher.calls(), n);
            assert_eq!(
                result.outcome,
                ProbeOutcome::Exhausted {
                    reason: FailureReason::NonSuccessStatus(StatusCode::INTERNAL_SERVER_ERROR)
                }
            );
        }
    }

    #[tokio::test]
    async fn success_on_attempt_k_stops_there() {
        let n = 5;
        for k in 1..=n {
            let mut script: Vec<_> = (1..k).map(|_| refused()).collect();
            script.push(Ok(StatusCode::OK));
            let fetcher = ScriptedFetcher::new(script);
            let prober = Prober::new(&fetcher);

            let result = prober.probe(&endpoint(n, DelayPolicy::millis(0.0))).await;
            assert!(result.is_success());
            assert_eq!(result.attempts, k);
            assert_eq!(fetcher.calls(), k);
        }
    }

    #[tokio::test]
    async fn exhausted_carries_last_failure() {
        let fetcher = ScriptedFetcher::new(vec![
            refused(),
            Ok(StatusCode::BAD_GATEWAY),
            Err(FetchError::Timeout(Duration::from_secs(10))),
        ]);
        let prober = Prober::new(&fetcher);
        let result = prober.probe(&endpoint(3, DelayPolicy::millis(0.0))).await;

        assert_eq!(
            result.failure(),
            Some(&FailureReason::Transport(FetchError::Timeout(Duration::from_secs(10))))
        );
    }

    #[tokio::test]
    async fn zero_attempts_probes_once() {
        let fetcher = ScriptedFetcher::always(refused());
        let prober = Prober::new(&fetcher);
        let result = prober.probe(&endpoint(0, DelayPolicy::seconds(1.0))).await;
        assert_eq!(result.attempts, 1);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_constant_delay_between_attempts() {
        let fetcher = ScriptedFetcher::always(refused());
        let prober = Prober::new(&fetcher);

        let start = tokio::time::Instant::now();
        let result = prober.probe(&endpoint(3, DelayPolicy::seconds(5.0))).await;
        let elapsed = start.elapsed();

        assert_eq!(result.attempts, 3);
        // Two pauses: after attempts 1 and 2, none after the last.
        assert!(elapsed >= Duration::from_secs(10), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(11), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_after_success() {
        let fetcher = ScriptedFetcher::new(vec![refused(), Ok(StatusCode::OK)]);
        let prober = Prober::new(&fetcher);

        let start = tokio::time::Instant::now();
        let result = prober.probe(&endpoint(3, DelayPolicy::millis(2.0))).await;
        let elapsed = start.elapsed();

        assert!(result.is_success());
        assert!(elapsed >= Duration::from_millis(2));
        assert!(elapsed < Duration::from_millis(100));
    }

    #[test]
    fn failure_reason_display() {
        assert_eq!(
            FailureReason::NonSuccessStatus(StatusCode::NOT_FOUND).to_string(),
            "status 404 Not Found"
        );
        assert_eq!(
            FailureReason::Transport(FetchError::Transport("dns error".into())).to_string(),
            "transport failure: dns error"
        );
    }
}
