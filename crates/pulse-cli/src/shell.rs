//! Shell: the interactive request/response cycle.
//!
//! Shows the menu, reads a selection, runs the matching handler against
//! the registry or the prober, and prints one line per outcome. Registry
//! mutations are applied to a copy and only committed once the
//! configuration file has been saved, so memory and disk never diverge.

use std::io::{self, BufRead, Write};

use tracing::{debug, error};

use pulse_core::{ConfigStore, DelayPolicy, DelayUnit, Endpoint, Registry, RetryPolicy};
use pulse_probe::{Fetch, ProbeResult, Prober, SweepEvent, SweepMode};

use crate::menu::{Action, Menu};
use crate::prompt::Prompt;

const DEFAULT_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY_UNIT: &str = "s";
const DEFAULT_DELAY_TIME: f64 = 5.0;

/// Whether the shell can keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    EndOfInput,
}

pub struct Shell<R, W, F> {
    registry: Registry,
    store: ConfigStore,
    prober: Prober<F>,
    menu: Menu,
    prompt: Prompt<R, W>,
    mode: SweepMode,
}

impl<R: BufRead, W: Write, F: Fetch> Shell<R, W, F> {
    pub fn new(
        registry: Registry,
        store: ConfigStore,
        prober: Prober<F>,
        menu: Menu,
        prompt: Prompt<R, W>,
        mode: SweepMode,
    ) -> Self {
        Self {
            registry,
            store,
            prober,
            menu,
            prompt,
            mode,
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        self.prompt.output()
    }

    /// Show the menu and run one selected action.
    pub async fn run_once(&mut self) -> io::Result<Step> {
        self.show_menu()?;
        match self.read_selection()? {
            Some(action) => {
                self.dispatch(action).await?;
                Ok(Step::Continue)
            }
            None => Ok(Step::EndOfInput),
        }
    }

    /// Keep running actions until input runs out.
    pub async fn run_until_eof(&mut self) -> io::Result<()> {
        while self.run_once().await? == Step::Continue {
            self.prompt.say("")?;
        }
        Ok(())
    }

    fn show_menu(&mut self) -> io::Result<()> {
        for option in self.menu.options() {
            self.prompt.say(format!("[{}] - {}", option.id, option.label))?;
        }
        Ok(())
    }

    /// Re-prompts on non-numbers and on ids that are not in the menu.
    fn read_selection(&mut self) -> io::Result<Option<Action>> {
        loop {
            let Some(id) = self.prompt.read_number::<u32>("Select an option: ")? else {
                return Ok(None);
            };
            match self.menu.select(id) {
                Ok(action) => return Ok(Some(action)),
                Err(e) => self.prompt.say(format!("✗ {e}, select one of the listed options."))?,
            }
        }
    }

    pub async fn dispatch(&mut self, action: Action) -> io::Result<()> {
        debug!(?action, "dispatching");
        match action {
            Action::AddEndpoint => self.add_endpoint(),
            Action::ListEndpoints => self.list_endpoints(),
            Action::TestAll => self.test_all().await,
            Action::RemoveEndpoint => self.remove_endpoint(),
        }
    }

    fn add_endpoint(&mut self) -> io::Result<()> {
        let Some(endpoint) = self.read_endpoint()? else {
            return self.prompt.say("Cancelled.");
        };

        let url = endpoint.url.clone();
        let mut next = self.registry.clone();
        match next.add(endpoint) {
            Ok(()) => self.commit(next, format!("✓ Added endpoint \"{url}\"")),
            Err(e) => self.prompt.say(format!("✗ {e}")),
        }
    }

    /// Ask for URL, attempts, delay unit and delay time. `None` on end of input.
    fn read_endpoint(&mut self) -> io::Result<Option<Endpoint>> {
        let Some(url) = self.prompt.read_line("Endpoint URL: ")? else {
            return Ok(None);
        };

        let max_attempts = loop {
            let message = format!("Attempts [{DEFAULT_ATTEMPTS}]: ");
            match self.prompt.read_number_or(&message, DEFAULT_ATTEMPTS)? {
                None => return Ok(None),
                Some(0) => self.prompt.say("✗ At least one attempt is required.")?,
                Some(n) => break n,
            }
        };

        let unit = loop {
            let message = format!("Delay unit (s/ms/m) [{DEFAULT_DELAY_UNIT}]: ");
            let Some(unit) = self.prompt.read_line(&message)? else {
                return Ok(None);
            };
            if unit.is_empty() {
                break DEFAULT_DELAY_UNIT.to_string();
            }
            if DelayUnit::parse(&unit).is_some() {
                break unit;
            }
            self.prompt.say(format!("✗ Unknown delay unit \"{unit}\"."))?;
        };

        let time = loop {
            let message = format!("Delay time [{DEFAULT_DELAY_TIME}]: ");
            match self.prompt.read_number_or(&message, DEFAULT_DELAY_TIME)? {
                None => return Ok(None),
                Some(t) if t.is_finite() && t >= 0.0 => break t,
                Some(_) => self.prompt.say("✗ Delay time must be a non-negative number.")?,
            }
        };

        Ok(Some(Endpoint::new(
            url,
            RetryPolicy::new(max_attempts, DelayPolicy::new(unit, time)),
        )))
    }

    fn list_endpoints(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return self.prompt.say("No endpoints registered.");
        }
        for (index, endpoint) in self.registry.iter().enumerate() {
            self.prompt.say(format!(
                "[{index}] {} ({}, {} delay)",
                endpoint.url,
                attempts_label(endpoint.retry.max_attempts),
                endpoint.retry.delay,
            ))?;
        }
        Ok(())
    }

    async fn test_all(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return self.prompt.say("No endpoints to test!");
        }

        let prompt = &mut self.prompt;
        let report = self
            .prober
            .sweep(&self.registry)
            .run(self.mode, |event| match event {
                SweepEvent::Started(endpoint) => {
                    prompt.say(format!("Testing endpoint \"{}\"", endpoint.url))
                }
                SweepEvent::Finished(result) => prompt.say(describe(result)),
            })
            .await?;

        if report.stopped_early {
            let skipped = self.registry.len() - report.results.len();
            self.prompt.say(format!(
                "Skipped {skipped} remaining {}.",
                if skipped == 1 { "endpoint" } else { "endpoints" }
            ))?;
        }
        if self.mode == SweepMode::CollectAll {
            let total = report.results.len();
            if report.all_ok() {
                self.prompt.say(format!("All {total} endpoints working."))?;
            } else {
                let working = total - report.failures().count();
                self.prompt.say(format!("{working} of {total} endpoints working."))?;
            }
        }
        Ok(())
    }

    fn remove_endpoint(&mut self) -> io::Result<()> {
        if self.registry.is_empty() {
            return self.prompt.say("No endpoints to remove!");
        }
        self.list_endpoints()?;

        let Some(raw) = self.prompt.read_number::<i64>("Index to remove: ")? else {
            return self.prompt.say("Cancelled.");
        };
        let Ok(index) = usize::try_from(raw) else {
            return self
                .prompt
                .say(format!("✗ no endpoint at index {raw}, indices start at 0"));
        };

        let mut next = self.registry.clone();
        match next.remove(index) {
            Ok(removed) => self.commit(next, format!("✓ Removed endpoint \"{}\"", removed.url)),
            Err(e) => self.prompt.say(format!("✗ {e}")),
        }
    }

    /// Persist `next` and adopt it. On a failed save nothing changes.
    fn commit(&mut self, next: Registry, message: String) -> io::Result<()> {
        match self.store.save(&next) {
            Ok(()) => {
                self.registry = next;
                self.prompt.say(message)
            }
            Err(e) => {
                error!(error = %e, "failed to save configuration");
                self.prompt
                    .say(format!("✗ Could not save configuration, nothing was changed: {e}"))
            }
        }
    }
}

fn attempts_label(n: u32) -> String {
    if n == 1 {
        "1 attempt".to_string()
    } else {
        format!("{n} attempts")
    }
}

fn describe(result: &ProbeResult) -> String {
    match result.failure() {
        None => format!("✓ Endpoint \"{}\" is working fine!", result.url),
        Some(reason) => format!(
            "✗ Endpoint \"{}\" is not working! ({reason} after {})",
            result.url,
            attempts_label(result.attempts)
        ),
    }
}
