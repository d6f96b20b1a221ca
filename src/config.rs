use std::path::PathBuf;

use tracing::warn;

pub const APP_ID: &str = "dev.memoryduel.MemoryDuel";
pub const DEFAULT_ASSET_DIR: &str = "assets";

const ASSETS_VAR: &str = "MEMORY_DUEL_ASSETS";
const SEED_VAR: &str = "MEMORY_DUEL_SEED";
const DEBUG_VAR: &str = "MEMORY_DUEL_DEBUG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub asset_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            seed: None,
        }
    }
}

/// Path of an embedded resource under the application's resource prefix.
pub fn resource_path(name: &str) -> String {
    format!("/{}/{name}", APP_ID.replace('.', "/"))
}

fn is_truthy(value: &str) -> bool {
    let v = value.trim().to_ascii_lowercase();
    matches!(v.as_str(), "1" | "true" | "yes" | "on")
}

pub fn debug_mode_enabled() -> bool {
    std::env::var(DEBUG_VAR).is_ok_and(|value| is_truthy(&value))
}

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn log_filter(debug: bool) -> &'static str {
    if debug {
        "memory_duel=debug"
    } else {
        "memory_duel=info"
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = GameConfig::default();

        if let Some(dir) = lookup(ASSETS_VAR).filter(|dir| !dir.trim().is_empty()) {
            config.asset_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(SEED_VAR) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(err) => warn!(value = %raw, %err, "ignoring {SEED_VAR}"),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = GameConfig::from_lookup(lookup(&[]));
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn reads_overrides() {
        let config = GameConfig::from_lookup(lookup(&[
            ("MEMORY_DUEL_ASSETS", "/srv/animals"),
            ("MEMORY_DUEL_SEED", " 1234 "),
        ]));
        assert_eq!(config.asset_dir, PathBuf::from("/srv/animals"));
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn bad_values_fall_back() {
        let config = GameConfig::from_lookup(lookup(&[
            ("MEMORY_DUEL_ASSETS", "  "),
            ("MEMORY_DUEL_SEED", "forty-two"),
        ]));
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn app_id_and_resource_prefix_agree() {
        assert!(gio::Application::id_is_valid(APP_ID));
        assert_eq!(
            resource_path("style.css"),
            "/dev/memoryduel/MemoryDuel/style.css"
        );
    }

    #[test]
    fn truthy_flags() {
        for value in ["1", "true", " YES ", "On"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["0", "off", "", "nope"] {
            assert!(!is_truthy(value), "{value}");
        }
        assert_eq!(log_filter(true), "memory_duel=debug");
        assert_eq!(log_filter(false), "memory_duel=info");
    }
}
