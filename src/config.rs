use crate::superfight::RoundTimings;
use anyhow::{Context, Result};
use std::{env, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub timings: RoundTimings,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self> {
        // a missing .env file is fine, the variables may come from the environment
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("TOKEN").context("failed to get bot token")?;
        let defaults = RoundTimings::default();
        let secs = |key: &str, default: Duration| -> Result<Duration> {
            lookup(key).map_or(Ok(default), |value| {
                value
                    .trim()
                    .parse()
                    .map(Duration::from_secs)
                    .with_context(|| {
                        format!("{key} must be a whole number of seconds, got {value:?}")
                    })
            })
        };
        Ok(Self {
            token,
            timings: RoundTimings {
                argument_window: secs("SUPERFIGHT_ARGUMENT_SECS", defaults.argument_window)?,
                voting_window: secs("SUPERFIGHT_VOTING_SECS", defaults.voting_window)?,
                results_delay: secs("SUPERFIGHT_RESULTS_DELAY_SECS", defaults.results_delay)?,
            },
        })
    }
}
