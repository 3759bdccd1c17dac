use std::path::PathBuf;

use crate::chart::DEFAULT_TICK_STEP;
use crate::checks::CheckMode;

pub const DEFAULT_DATA_DIR: &str = "Datasets/raw_data";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub out_dir: PathBuf,
    pub check_mode: CheckMode,
    pub tick_step: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            out_dir: PathBuf::from("."),
            check_mode: CheckMode::Advisory,
            tick_step: DEFAULT_TICK_STEP,
        }
    }
}

impl Settings {
    /// Loads `.env.local` and `.env` if present, then reads `MATCHSTATS_*` variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = non_empty("MATCHSTATS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let out_dir = non_empty("MATCHSTATS_OUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.out_dir);
        let check_mode = match non_empty("MATCHSTATS_STRICT_CHECKS").as_deref().map(parse_bool) {
            Some(true) => CheckMode::Strict,
            _ => CheckMode::Advisory,
        };
        let tick_step = non_empty("MATCHSTATS_TICK_STEP")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .unwrap_or(defaults.tick_step)
            .max(1);

        Self {
            data_dir,
            out_dir,
            check_mode,
            tick_step,
        }
    }
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
