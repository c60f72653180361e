//! Model API transport with exponential backoff.
//!
//! Every text service in [`crate::llm`] funnels its requests through this
//! module. Requests go to an OpenAI-compatible endpoint via `awful_aj`, and
//! transient failures are retried here so the pipeline never sees them.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait for a single prompt/response exchange
//! - [`AskFnWrapper`]: Adapts `awful_aj::api::ask` for one chat template
//! - [`RetryAsk`]: Decorator adding retries to any [`AskAsync`]
//!
//! # Retry Strategy
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Default number of retries after the first failed attempt.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: StdDuration = StdDuration::from_secs(1);

/// Trait for async model interaction.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send `text` as the user message and wait for the reply.
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Adds exponential backoff retries to an [`AskAsync`] implementation.
pub struct RetryAsk<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryAsk<T>
where
    T: AskAsync,
{
    /// Wrap `inner`, retrying up to `max_retries` times starting at `base_delay`.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Cap on a single backoff delay (before jitter).
    pub fn with_max_delay(mut self, max_delay: StdDuration) -> Self {
        self.max_delay = max_delay;
        self
    }

    fn delay_for(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1 << shift);
        delay.min(self.max_delay)
    }
}

impl<T> fmt::Debug for RetryAsk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryAsk")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> AskAsync for RetryAsk<T>
where
    T: AskAsync + fmt::Debug,
{
    type Response = T::Response;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.ask(text).await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();
                    let elapsed_ms_total = total_t0.elapsed().as_millis();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_attempt,
                            elapsed_ms_total,
                            error = %e,
                            "ask() exhausted retries"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.delay_for(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt,
                        elapsed_ms_total,
                        ?delay,
                        error = %e,
                        "ask() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Sends a request through `awful_aj::api::ask` using one chat template.
#[derive(Debug)]
pub struct AskFnWrapper<'a> {
    /// Endpoint, model and API key.
    pub config: &'a AwfulJadeConfig,
    /// System prompt and response schema for one service.
    pub template: &'a ChatTemplate,
}

impl<'a> AskAsync for AskFnWrapper<'a> {
    type Response = String;

    #[instrument(level = "debug", skip_all)]
    async fn ask(&self, text: &str) -> Result<Self::Response, Box<dyn Error>> {
        let t0 = Instant::now();
        let res = ask(self.config, text.to_string(), self.template, None, None).await;
        let elapsed_ms = t0.elapsed().as_millis();

        match &res {
            Ok(_) => debug!(elapsed_ms, "API call succeeded"),
            Err(e) => warn!(elapsed_ms, error = %e, "API call failed"),
        }
        res
    }
}

/// Send `input` to the model with `template`, retrying transient failures.
///
/// Returns the raw response text; parsing is left to the caller.
#[instrument(level = "debug", skip_all)]
pub async fn ask_with_backoff(
    config: &AwfulJadeConfig,
    template: &ChatTemplate,
    input: &str,
    max_retries: usize,
) -> Result<String, Box<dyn Error>> {
    let t0 = Instant::now();
    let client = AskFnWrapper { config, template };
    let api = RetryAsk::new(client, max_retries, DEFAULT_BASE_DELAY);
    let res = api.ask(input).await;
    let elapsed_ms_total = t0.elapsed().as_millis();

    match &res {
        Ok(_) => debug!(elapsed_ms_total, "ask_with_backoff succeeded"),
        Err(e) => error!(elapsed_ms_total, error = %e, "ask_with_backoff failed"),
    }
    res
}
