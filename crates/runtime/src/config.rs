//! Tracker configuration and loaders.
use std::env;

/// Configuration of a [`CollectibleTracker`](crate::CollectibleTracker).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Per-topic capacity of the event bus.
    pub event_capacity: usize,
    /// Zero the reward of entities whose reward was already collected.
    pub suppress_collected_rewards: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            suppress_collected_rewards: true,
        }
    }
}

impl TrackerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COLLECTIBLE_EVENT_CAPACITY` - Event bus capacity per topic (default: 64)
    /// - `COLLECTIBLE_SUPPRESS_REWARDS` - Suppress already-collected rewards (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read::<usize>(&lookup, "COLLECTIBLE_EVENT_CAPACITY") {
            config.event_capacity = capacity.max(1);
        }

        if let Some(suppress) = read::<bool>(&lookup, "COLLECTIBLE_SUPPRESS_REWARDS") {
            config.suppress_collected_rewards = suppress;
        }

        config
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> TrackerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        TrackerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        assert_eq!(config_from(&[]), TrackerConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("COLLECTIBLE_EVENT_CAPACITY", "8"),
            ("COLLECTIBLE_SUPPRESS_REWARDS", "false"),
        ]);
        assert_eq!(config.event_capacity, 8);
        assert!(!config.suppress_collected_rewards);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("COLLECTIBLE_EVENT_CAPACITY", "lots"),
            ("COLLECTIBLE_SUPPRESS_REWARDS", "maybe"),
        ]);
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn capacity_is_at_least_one() {
        let config = config_from(&[("COLLECTIBLE_EVENT_CAPACITY", "0")]);
        assert_eq!(config.event_capacity, 1);
    }
}
