use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ANALYSIS_DELAY_MS: u64 = 2000;
pub const DEFAULT_TICK_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub analysis_delay: Duration,
    pub tick_rate: Duration,
    pub fixtures_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS),
            tick_rate: Duration::from_millis(DEFAULT_TICK_MS),
            fixtures_path: None,
        }
    }
}

impl AppConfig {
    /// Read from the process environment. Call after dotenvy has run.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let analysis_delay = lookup("ANALYSIS_DELAY_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_ANALYSIS_DELAY_MS)
            .min(60_000);
        let tick = lookup("UI_TICK_MS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TICK_MS)
            .clamp(50, 1000);
        let fixtures_path = lookup("PADEL_FIXTURES")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from);

        Self {
            analysis_delay: Duration::from_millis(analysis_delay),
            tick_rate: Duration::from_millis(tick),
            fixtures_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn clamps_and_ignores_garbage() {
        let cfg = config_from(&[
            ("ANALYSIS_DELAY_MS", "999999"),
            ("UI_TICK_MS", "5"),
            ("PADEL_FIXTURES", "  "),
        ]);
        assert_eq!(cfg.analysis_delay, Duration::from_millis(60_000));
        assert_eq!(cfg.tick_rate, Duration::from_millis(50));
        assert!(cfg.fixtures_path.is_none());

        let cfg = config_from(&[("ANALYSIS_DELAY_MS", "soon"), ("PADEL_FIXTURES", "roster.json")]);
        assert_eq!(cfg.analysis_delay, Duration::from_millis(DEFAULT_ANALYSIS_DELAY_MS));
        assert_eq!(cfg.fixtures_path, Some(PathBuf::from("roster.json")));
    }
}
