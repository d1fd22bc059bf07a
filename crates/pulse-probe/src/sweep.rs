//! "Test all": one ordered pass over the registry.
//!
//! A [`Sweep`] is pulled one endpoint at a time, so the caller decides
//! whether to stop at the first exhausted endpoint or keep going.

use std::convert::Infallible;
use std::slice;

use pulse_core::{Endpoint, Registry};

use crate::fetch::Fetch;
use crate::prober::{ProbeResult, Prober};

/// What a sweep does after an endpoint is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SweepMode {
    /// Stop at the first exhausted endpoint.
    #[default]
    FailFast,
    /// Probe every endpoint and report them all.
    CollectAll,
}

impl SweepMode {
    /// Whether the sweep ends after `result`.
    pub fn stops_after(self, result: &ProbeResult) -> bool {
        self == Self::FailFast && !result.is_success()
    }
}

/// Lazy, sequential probe of each registered endpoint.
pub struct Sweep<'a, F> {
    prober: &'a Prober<F>,
    remaining: slice::Iter<'a, Endpoint>,
}

impl<'a, F: Fetch> Sweep<'a, F> {
    pub(crate) fn new(prober: &'a Prober<F>, registry: &'a Registry) -> Self {
        Self {
            prober,
            remaining: registry.iter(),
        }
    }

    /// The endpoint the next call to [`Sweep::next`] will probe.
    pub fn pending(&self) -> Option<&'a Endpoint> {
        self.remaining.as_slice().first()
    }

    /// Probe the next endpoint, or `None` once the registry is exhausted.
    pub async fn next(&mut self) -> Option<ProbeResult> {
        let endpoint = self.remaining.next()?;
        Some(self.prober.probe(endpoint).await)
    }

    /// Drain the sweep according to `mode`, reporting progress to `observe`.
    ///
    /// An error from `observe` ends the sweep and is returned as is.
    pub async fn run<E>(
        mut self,
        mode: SweepMode,
        mut observe: impl FnMut(SweepEvent<'_>) -> Result<(), E>,
    ) -> Result<SweepReport, E> {
        let mut report = SweepReport::default();
        while let Some(endpoint) = self.pending() {
            observe(SweepEvent::Started(endpoint))?;
            let Some(result) = self.next().await else {
                break;
            };
            observe(SweepEvent::Finished(&result))?;

            let stop = mode.stops_after(&result);
            report.results.push(result);
            if stop {
                report.stopped_early = self.pending().is_some();
                break;
            }
        }
        Ok(report)
    }

    /// [`Sweep::run`] without a progress observer.
    pub async fn collect(self, mode: SweepMode) -> SweepReport {
        let never = self.run(mode, |_| Ok::<(), Infallible>(())).await;
        match never {
            Ok(report) => report,
            Err(e) => match e {},
        }
    }
}

/// Progress of a running sweep.
#[derive(Debug, Clone, Copy)]
pub enum SweepEvent<'a> {
    /// About to probe this endpoint.
    Started(&'a Endpoint),
    /// Probe finished.
    Finished(&'a ProbeResult),
}

/// Results of a finished sweep, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub results: Vec<ProbeResult>,
    /// Endpoints were left unprobed because of a fail-fast stop.
    pub stopped_early: bool,
}

impl SweepReport {
    pub fn all_ok(&self) -> bool {
        self.results.iter().all(ProbeResult::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use pulse_core::{DelayPolicy, RetryPolicy};

    use super::*;
    use crate::test_support::RoutedFetcher;

    fn registry(urls: &[&str]) -> Registry {
        urls.iter()
            .map(|u| Endpoint::new(*u, RetryPolicy::new(2, DelayPolicy::millis(0.0))))
            .collect::<Vec<_>>()
            .into()
    }

    fn fetcher() -> RoutedFetcher {
        RoutedFetcher::new(&[
            ("http://a", StatusCode::OK),
            ("http://b", StatusCode::SERVICE_UNAVAILABLE),
            ("http://c", StatusCode::NO_CONTENT),
        ])
    }

    #[tokio::test]
    async fn fail_fast_stops_at_first_exhausted() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://a", "http://b", "http://c"]);

        let report = prober.sweep(&reg).collect(SweepMode::FailFast).await;
        assert_eq!(report.results.len(), 2);
        assert!(report.stopped_early);
        assert!(!report.all_ok());
        assert_eq!(report.failures().next().unwrap().url, "http://b");
        // "b" retried once, "c" never touched.
        assert_eq!(fetcher.requested(), ["http://a", "http://b", "http://b"]);
    }

    #[tokio::test]
    async fn collect_all_probes_everything() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://b", "http://a", "http://missing", "http://c"]);

        let report = prober.sweep(&reg).collect(SweepMode::CollectAll).await;
        let urls: Vec<_> = report.results.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["http://b", "http://a", "http://missing", "http://c"]);
        assert!(!report.stopped_early);
        assert_eq!(report.failures().count(), 2);
    }

    #[tokio::test]
    async fn failing_last_endpoint_is_not_an_early_stop() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://a", "http://b"]);

        let report = prober.sweep(&reg).collect(SweepMode::FailFast).await;
        assert_eq!(report.results.len(), 2);
        assert!(!report.stopped_early);
    }

    #[tokio::test]
    async fn empty_registry_yields_nothing() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = Registry::new();

        let mut sweep = prober.sweep(&reg);
        assert!(sweep.pending().is_none());
        assert!(sweep.next().await.is_none());
        assert!(prober.sweep(&reg).collect(SweepMode::FailFast).await.all_ok());
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn pending_tracks_the_next_endpoint() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://a", "http://c"]);

        let mut sweep = prober.sweep(&reg);
        assert_eq!(sweep.pending().unwrap().url, "http://a");
        sweep.next().await.unwrap();
        assert_eq!(sweep.pending().unwrap().url, "http://c");
        sweep.next().await.unwrap();
        assert!(sweep.pending().is_none());
    }

    #[tokio::test]
    async fn observer_sees_each_endpoint_before_its_result() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://a", "http://b", "http://c"]);

        let mut events = Vec::new();
        let report = prober
            .sweep(&reg)
            .run(SweepMode::FailFast, |event| {
                events.push(match event {
                    SweepEvent::Started(e) => format!("start {}", e.url),
                    SweepEvent::Finished(r) => format!("done {} {}", r.url, r.is_success()),
                });
                Ok::<_, Infallible>(())
            })
            .await
            .unwrap();

        assert_eq!(
            events,
            [
                "start http://a",
                "done http://a true",
                "start http://b",
                "done http://b false",
            ]
        );
        assert!(report.stopped_early);
    }

    #[tokio::test]
    async fn observer_error_ends_the_sweep() {
        let fetcher = fetcher();
        let prober = Prober::new(&fetcher);
        let reg = registry(&["http://a", "http://c"]);

        let result = prober
            .sweep(&reg)
            .run(SweepMode::CollectAll, |event| match event {
                SweepEvent::Finished(_) => Err("output closed"),
                SweepEvent::Started(_) => Ok(()),
            })
            .await;

        assert_eq!(result, Err("output closed"));
        assert_eq!(fetcher.requested(), ["http://a"]);
    }
}
