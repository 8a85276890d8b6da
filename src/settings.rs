//! Rule configuration with TOML persistence
//!
//! Stores rules in ~/.config/duetris/rules.toml (or platform equivalent)

use crate::board::{DEFAULT_HEIGHT, DEFAULT_WIDTH, MIN_DIMENSION};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Everything the simulation reads from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// RGB per cell id: 0 empty, 1..=7 piece kinds, 8 garbage
    pub palette: Vec<[f32; 3]>,
    pub board: BoardSettings,
    pub timing: TimingSettings,
    pub features: FeatureToggles,
}

/// Grid dimensions (applied on restart)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    pub width: usize,
    pub height: usize,
}

/// Timings in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub lock_delay_ms: u64,
    /// Delayed Auto Shift
    pub das_ms: u64,
    /// Auto Repeat Rate
    pub arr_ms: u64,
    /// Fall interval at level 0
    pub fall_interval_ms: u64,
    /// Fall interval factor per level
    pub level_speed_multiplier: f64,
    pub min_fall_interval_ms: u64,
    pub soft_drop_interval_ms: u64,
    pub lines_per_level: u32,
    pub countdown_ms: u64,
}

/// Feature switches, honored from the next tick when changed mid-match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    pub ghost_piece: bool,
    pub hold_piece: bool,
    pub next_piece: bool,
    pub hard_drop: bool,
    pub lock_delay: bool,
    pub garbage_lines: bool,
    /// First elimination decides the match instead of the final scores
    pub first_player_wins: bool,
    /// Gravity stays at level 0 speed
    pub infinite_level: bool,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            board: BoardSettings::default(),
            timing: TimingSettings::default(),
            features: FeatureToggles::default(),
        }
    }
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            lock_delay_ms: 333,
            das_ms: 100,
            arr_ms: 80,
            fall_interval_ms: 600,
            level_speed_multiplier: 0.9,
            min_fall_interval_ms: 50,
            soft_drop_interval_ms: 50,
            lines_per_level: 10,
            countdown_ms: 3000,
        }
    }
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            ghost_piece: true,
            hold_piece: true,
            next_piece: true,
            hard_drop: true,
            lock_delay: true,
            garbage_lines: true,
            first_player_wins: true,
            infinite_level: false,
        }
    }
}

fn default_palette() -> Vec<[f32; 3]> {
    vec![
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 1.0],
        [0.3, 0.3, 1.0],
        [1.0, 0.5, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.6, 0.0, 0.6],
        [1.0, 0.0, 0.0],
        [0.5, 0.5, 0.5],
    ]
}

impl TimingSettings {
    pub fn lock_delay(&self) -> Duration {
        Duration::from_millis(self.lock_delay_ms)
    }

    pub fn das(&self) -> Duration {
        Duration::from_millis(self.das_ms)
    }

    pub fn arr(&self) -> Duration {
        Duration::from_millis(self.arr_ms)
    }

    pub fn fall_interval(&self) -> Duration {
        Duration::from_millis(self.fall_interval_ms)
    }

    pub fn min_fall_interval(&self) -> Duration {
        Duration::from_millis(self.min_fall_interval_ms)
    }

    pub fn soft_drop_interval(&self) -> Duration {
        Duration::from_millis(self.soft_drop_interval_ms)
    }

    pub fn countdown(&self) -> Duration {
        Duration::from_millis(self.countdown_ms)
    }
}

impl RuleConfig {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "duetris", "duetris").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the rules file path
    pub fn rules_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("rules.toml"))
    }

    /// Load rules from the default location, or fall back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::rules_path() else {
            return Self::default();
        };
        Self::load_from(&path).unwrap_or_default()
    }

    /// Load and sanitize rules from a file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let rules: RuleConfig =
            toml::from_str(&contents).map_err(|e| format!("Failed to parse rules: {}", e))?;
        Ok(rules.sanitized())
    }

    /// Save rules to the default location
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::rules_path() else {
            return Err("Could not determine config directory".to_string());
        };
        self.save_to(&path)
    }

    /// Save rules to a file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| format!("Failed to create config dir: {}", e))?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize: {}", e))?;

        fs::write(path, contents).map_err(|e| format!("Failed to write rules: {}", e))?;

        Ok(())
    }

    /// Clamp values the simulation cannot run with
    pub fn sanitized(mut self) -> Self {
        let b = &mut self.board;
        if b.width < MIN_DIMENSION || b.height < MIN_DIMENSION {
            warn!("Board {}x{} too small, clamping", b.width, b.height);
            b.width = b.width.max(MIN_DIMENSION);
            b.height = b.height.max(MIN_DIMENSION);
        }

        let t = &mut self.timing;
        for (name, value) in [
            ("fall_interval_ms", &mut t.fall_interval_ms),
            ("min_fall_interval_ms", &mut t.min_fall_interval_ms),
            ("soft_drop_interval_ms", &mut t.soft_drop_interval_ms),
            ("arr_ms", &mut t.arr_ms),
        ] {
            if *value == 0 {
                warn!("{} must be positive, using 1", name);
                *value = 1;
            }
        }
        if !(t.level_speed_multiplier > 0.0 && t.level_speed_multiplier <= 1.0) {
            warn!(
                "level_speed_multiplier {} out of (0, 1], using 1.0",
                t.level_speed_multiplier
            );
            t.level_speed_multiplier = 1.0;
        }
        if t.lines_per_level == 0 {
            warn!("lines_per_level must be positive, using 1");
            t.lines_per_level = 1;
        }

        let defaults = default_palette();
        if self.palette.len() < defaults.len() {
            let missing = defaults[self.palette.len()..].to_vec();
            self.palette.extend(missing);
        }
        self
    }

    /// Display color for a cell value
    pub fn cell_color(&self, id: u8) -> [f32; 3] {
        self.palette
            .get(id as usize)
            .copied()
            .unwrap_or([1.0, 1.0, 1.0])
    }
}
