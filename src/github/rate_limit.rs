use crate::error::{Result, StatsError};
use crate::github::transport::HttpResponse;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub const DEFAULT_QUOTA: u32 = 5000;

const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Quota bookkeeping for one API session. Reacts to exhaustion rather
/// than pacing: nothing waits until `remaining` has reached zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitState {
    pub remaining: u32,
    pub reset_at: Option<DateTime<Utc>>,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: DEFAULT_QUOTA,
            reset_at: None,
        }
    }
}

impl RateLimitState {
    pub fn new(remaining: u32, reset_at: Option<DateTime<Utc>>) -> Self {
        Self {
            remaining,
            reset_at,
        }
    }

    /// Refresh from response headers. Responses without the quota header
    /// leave the state untouched; the reset header is only required when
    /// the response itself reports an exhausted quota.
    pub fn update(&mut self, response: &HttpResponse) -> Result<()> {
        let reported = response
            .header(REMAINING_HEADER)
            .and_then(|raw| raw.trim().parse::<u32>().ok());
        if let Some(remaining) = reported {
            self.remaining = remaining;
        }

        match (reported, response.header(RESET_HEADER)) {
            (Some(0), raw) => self.reset_at = Some(parse_reset(raw.unwrap_or_default())?),
            (_, Some(raw)) => {
                if let Ok(reset) = parse_reset(raw) {
                    self.reset_at = Some(reset);
                }
            }
            _ => {}
        }

        Ok(())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// How long the next call must wait, measured from `now`.
    pub fn wait_time(&self, now: DateTime<Utc>) -> Duration {
        if !self.is_exhausted() {
            return Duration::ZERO;
        }
        match self.reset_at {
            Some(reset) if reset > now => (reset - now).to_std().unwrap_or_default(),
            _ => Duration::ZERO,
        }
    }

    /// Block the calling thread until the reset instant has passed, then
    /// assume a full quota until a response says otherwise. Returns the
    /// time actually slept.
    pub fn wait_if_exhausted(&mut self) -> Duration {
        if !self.is_exhausted() || self.reset_at.is_none() {
            return Duration::ZERO;
        }
        let wait = self.wait_time(Utc::now());
        if !wait.is_zero() {
            tracing::warn!(
                wait_secs = wait.as_secs_f64(),
                reset_at = ?self.reset_at,
                "Rate limit exhausted, waiting for reset"
            );
            std::thread::sleep(wait);
        }
        self.remaining = DEFAULT_QUOTA;
        wait
    }
}

fn parse_reset(raw: &str) -> Result<DateTime<Utc>> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| StatsError::MalformedHeader {
            name: RESET_HEADER.to_string(),
            value: raw.to_string(),
        })
}
