//! Driver configuration
//!
//! Environment variables provide defaults; command-line flags override them.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Result};

use crate::core::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u32>,
    pub theme: Theme,
    /// JSON-lines event journal
    pub log_path: Option<String>,
    /// JSON file holding the best score across sessions
    pub high_score_path: Option<String>,
    pub journal_enabled: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            seed: None,
            theme: Theme::Colorful,
            log_path: None,
            high_score_path: None,
            journal_enabled: true,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

impl DriverConfig {
    /// Create from environment variables.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = env::var("TETRION_SEED").ok().and_then(|s| s.trim().parse().ok());
        let theme = env::var("TETRION_THEME")
            .ok()
            .and_then(|s| Theme::from_str(s.trim()))
            .unwrap_or(defaults.theme);
        let journal_enabled = !env::var("TETRION_DISABLE_JOURNAL")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            seed,
            theme,
            log_path: non_empty(env::var("TETRION_LOG_PATH").ok()),
            high_score_path: non_empty(env::var("TETRION_HIGH_SCORE_PATH").ok()),
            journal_enabled,
        }
    }

    /// Apply command-line flags on top of `self`.
    ///
    /// `args` excludes the program name.
    pub fn parse_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0usize;
        while i < args.len() {
            let flag = args[i].as_str();
            let mut value = || {
                i += 1;
                args.get(i)
                    .ok_or_else(|| anyhow!("config: missing value for {}", flag))
            };
            match flag {
                "--seed" => {
                    let v = value()?;
                    self.seed = Some(
                        v.parse::<u32>()
                            .map_err(|_| anyhow!("config: invalid --seed value: {}", v))?,
                    );
                }
                "--theme" => {
                    let v = value()?;
                    self.theme = Theme::from_str(v)
                        .ok_or_else(|| anyhow!("config: invalid --theme value: {}", v))?;
                }
                "--log-path" => {
                    self.log_path = non_empty(Some(value()?.clone()));
                }
                "--high-score-path" => {
                    self.high_score_path = non_empty(Some(value()?.clone()));
                }
                "--no-journal" => {
                    self.journal_enabled = false;
                }
                other => {
                    return Err(anyhow!("config: unknown argument: {}", other));
                }
            }
            i += 1;
        }
        Ok(self)
    }

    /// Journal path, if journaling is on
    pub fn journal_path(&self) -> Option<&str> {
        if self.journal_enabled {
            self.log_path.as_deref()
        } else {
            None
        }
    }

    /// The configured seed, or one taken from the clock
    pub fn resolved_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or(1);
            (nanos ^ (nanos >> 32)) as u32
        })
    }
}
