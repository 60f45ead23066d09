//! External configuration loader.
//!
//! Reads `config.toml` from the executable's directory (or CWD, or
//! `~/.config/simbian-showcase`). Every key is optional; missing keys fall
//! back to the site's own timings. An explicit `--config` path is strict:
//! unreadable or invalid files are errors instead of warnings.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::card::CardKind;
use crate::domain::counter::DEFAULT_DURATION_MS;
use crate::domain::Millis;
use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug, PartialEq)]
pub struct ShowcaseConfig {
    pub timing: TimingConfig,
    pub cards: CardPeriods,
    pub display: DisplayConfig,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub auto_advance_ms: Millis,
    pub transition_lock_ms: Millis,
    pub step_interval_ms: Millis,
    pub countdown_interval_ms: Millis,
    pub problem_interval_ms: Millis,
    pub threat_bump_delay_ms: Millis,
    pub pulse_ms: Millis,
    pub counter_duration_ms: Millis,
    pub frame_ms: Millis,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardPeriods {
    pub ignored_ms: Millis,
    pub wrongly_ms: Millis,
    pub threats_ms: Millis,
}

impl CardPeriods {
    pub fn period(&self, kind: CardKind) -> Millis {
        match kind {
            CardKind::IgnoredAlerts => self.ignored_ms,
            CardKind::WronglyClosed => self.wrongly_ms,
            CardKind::ActiveThreats => self.threats_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayConfig {
    /// Card timers and counter interpolation.
    pub animate: bool,
    /// Cards generate alerts on their ticks.
    pub show_alerts: bool,
    /// Leave "Without" on its own after `auto_advance_ms`.
    pub auto_advance: bool,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    cards: TomlCards,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlTiming {
    #[serde(default = "default_auto_advance")]
    auto_advance_ms: Millis,
    #[serde(default = "default_transition_lock")]
    transition_lock_ms: Millis,
    #[serde(default = "default_step_interval")]
    step_interval_ms: Millis,
    #[serde(default = "default_countdown_interval")]
    countdown_interval_ms: Millis,
    #[serde(default = "default_problem_interval")]
    problem_interval_ms: Millis,
    #[serde(default = "default_threat_bump_delay")]
    threat_bump_delay_ms: Millis,
    #[serde(default = "default_pulse")]
    pulse_ms: Millis,
    #[serde(default = "default_counter_duration")]
    counter_duration_ms: Millis,
    #[serde(default = "default_frame")]
    frame_ms: Millis,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlCards {
    #[serde(default = "default_ignored_period")]
    ignored_ms: Millis,
    #[serde(default = "default_wrongly_period")]
    wrongly_ms: Millis,
    #[serde(default = "default_threats_period")]
    threats_ms: Millis,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlDisplay {
    #[serde(default = "default_true")]
    animate: bool,
    #[serde(default = "default_true")]
    show_alerts: bool,
    #[serde(default = "default_true")]
    auto_advance: bool,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_auto_advance() -> Millis { 15_000 }
fn default_transition_lock() -> Millis { 1000 }   // longest scene transition
fn default_step_interval() -> Millis { 1000 }
fn default_countdown_interval() -> Millis { 150 }
fn default_problem_interval() -> Millis { 4000 }
fn default_threat_bump_delay() -> Millis { 1800 } // icon drop animation length
fn default_pulse() -> Millis { 500 }
fn default_counter_duration() -> Millis { DEFAULT_DURATION_MS }
fn default_frame() -> Millis { 33 }

fn default_ignored_period() -> Millis { CardKind::IgnoredAlerts.default_period_ms() }
fn default_wrongly_period() -> Millis { CardKind::WronglyClosed.default_period_ms() }
fn default_threats_period() -> Millis { CardKind::ActiveThreats.default_period_ms() }

fn default_true() -> bool { true }
fn default_log_file() -> String { "simbian-showcase.log".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            auto_advance_ms: default_auto_advance(),
            transition_lock_ms: default_transition_lock(),
            step_interval_ms: default_step_interval(),
            countdown_interval_ms: default_countdown_interval(),
            problem_interval_ms: default_problem_interval(),
            threat_bump_delay_ms: default_threat_bump_delay(),
            pulse_ms: default_pulse(),
            counter_duration_ms: default_counter_duration(),
            frame_ms: default_frame(),
        }
    }
}

impl Default for TomlCards {
    fn default() -> Self {
        TomlCards {
            ignored_ms: default_ignored_period(),
            wrongly_ms: default_wrongly_period(),
            threats_ms: default_threats_period(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay {
            animate: true,
            show_alerts: true,
            auto_advance: true,
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            seed: None,
            log_file: default_log_file(),
        }
    }
}

impl From<TomlConfig> for ShowcaseConfig {
    fn from(t: TomlConfig) -> Self {
        ShowcaseConfig {
            timing: TimingConfig {
                auto_advance_ms: t.timing.auto_advance_ms,
                transition_lock_ms: t.timing.transition_lock_ms,
                step_interval_ms: t.timing.step_interval_ms,
                countdown_interval_ms: t.timing.countdown_interval_ms,
                problem_interval_ms: t.timing.problem_interval_ms,
                threat_bump_delay_ms: t.timing.threat_bump_delay_ms,
                pulse_ms: t.timing.pulse_ms,
                counter_duration_ms: t.timing.counter_duration_ms,
                frame_ms: t.timing.frame_ms,
            },
            cards: CardPeriods {
                ignored_ms: t.cards.ignored_ms,
                wrongly_ms: t.cards.wrongly_ms,
                threats_ms: t.cards.threats_ms,
            },
            display: DisplayConfig {
                animate: t.display.animate,
                show_alerts: t.display.show_alerts,
                auto_advance: t.display.auto_advance,
            },
            seed: t.general.seed,
            log_file: PathBuf::from(t.general.log_file),
        }
    }
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

/// Where the active settings came from.
#[derive(Debug)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
    /// A discovered file was rejected; defaults are in use.
    Fallback(ConfigError),
}

impl ConfigSource {
    /// Report through `tracing`. Call after the subscriber is installed.
    pub fn log(&self) {
        match self {
            ConfigSource::Defaults => tracing::debug!("no config.toml found, using defaults"),
            ConfigSource::File(path) => tracing::info!(path = %path.display(), "loaded config"),
            ConfigSource::Fallback(e) => tracing::warn!(error = %e, "using default settings"),
        }
    }
}

impl ShowcaseConfig {
    /// Discover `config.toml` in the candidate directories.
    /// Missing file → defaults. Unreadable or invalid file → defaults, with
    /// the error handed back so the caller can warn once logging is up.
    pub fn discover() -> (Self, ConfigSource) {
        Self::discover_in(&candidate_dirs())
    }

    /// First `config.toml` found in `dirs`, in order.
    pub fn discover_in(dirs: &[PathBuf]) -> (Self, ConfigSource) {
        for dir in dirs {
            let path = dir.join("config.toml");
            if !path.exists() {
                continue;
            }
            return match Self::load_from(&path) {
                Ok(cfg) => (cfg, ConfigSource::File(path)),
                Err(e) => (Self::default(), ConfigSource::Fallback(e)),
            };
        }
        (Self::default(), ConfigSource::Defaults)
    }

    /// Strict load of an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse and validate TOML text. Parse errors carry an empty path.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let toml_cfg = toml::from_str::<TomlConfig>(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        let cfg = ShowcaseConfig::from(toml_cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Every period drives a timer, so none may be zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.timing;
        let c = &self.cards;
        let periods = [
            ("timing.auto_advance_ms", t.auto_advance_ms),
            ("timing.transition_lock_ms", t.transition_lock_ms),
            ("timing.step_interval_ms", t.step_interval_ms),
            ("timing.countdown_interval_ms", t.countdown_interval_ms),
            ("timing.problem_interval_ms", t.problem_interval_ms),
            ("timing.frame_ms", t.frame_ms),
            ("cards.ignored_ms", c.ignored_ms),
            ("cards.wrongly_ms", c.wrongly_ms),
            ("cards.threats_ms", c.threats_ms),
        ];
        for (key, value) in periods {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{key} must be greater than 0")));
            }
        }
        Ok(())
    }
}

/// Candidate directories to search: exe dir + CWD + XDG config dir (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG config home (~/.config/simbian-showcase)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".config/simbian-showcase");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_site_timings() {
        let cfg = ShowcaseConfig::default();
        assert_eq!(cfg.timing.auto_advance_ms, 15_000);
        assert_eq!(cfg.timing.transition_lock_ms, 1000);
        assert_eq!(cfg.timing.step_interval_ms, 1000);
        assert_eq!(cfg.timing.countdown_interval_ms, 150);
        assert_eq!(cfg.timing.problem_interval_ms, 4000);
        assert_eq!(cfg.timing.threat_bump_delay_ms, 1800);
        assert_eq!(cfg.timing.pulse_ms, 500);
        assert_eq!(cfg.timing.counter_duration_ms, 2000);
        assert_eq!(cfg.cards.period(CardKind::ActiveThreats), 7000);
        assert_eq!(cfg.cards.period(CardKind::WronglyClosed), 5000);
        assert_eq!(cfg.cards.period(CardKind::IgnoredAlerts), 4000);
        assert!(cfg.display.animate && cfg.display.show_alerts && cfg.display.auto_advance);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn empty_text_is_all_defaults() {
        assert_eq!(ShowcaseConfig::parse("").unwrap(), ShowcaseConfig::default());
    }

    #[test]
    fn partial_sections_override_only_their_keys() {
        let cfg = ShowcaseConfig::parse(
            "[timing]\nauto_advance_ms = 5000\n\n[display]\nanimate = false\n\n[general]\nseed = 42\n",
        )
        .unwrap();
        assert_eq!(cfg.timing.auto_advance_ms, 5000);
        assert_eq!(cfg.timing.transition_lock_ms, 1000);
        assert!(!cfg.display.animate);
        assert!(cfg.display.show_alerts);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn zero_period_is_rejected() {
        let err = ShowcaseConfig::parse("[cards]\nignored_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref m) if m.contains("cards.ignored_ms")));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = ShowcaseConfig::parse("[timing]\nwarp_ms = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_file_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("simbian-showcase-{}.toml", std::process::id()));
        std::fs::write(&path, "[cards]\nthreats_ms = 3500\n").unwrap();
        let cfg = ShowcaseConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(cfg.cards.threats_ms, 3500);
    }

    #[test]
    fn parse_error_names_the_file() {
        let path = std::env::temp_dir().join(format!("simbian-showcase-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[timing\n").unwrap();
        let err = ShowcaseConfig::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { path: ref p, .. } if p == &path));
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("simbian-showcase-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn discovery_without_file_uses_defaults() {
        let dir = scratch_dir("empty");
        let (cfg, source) = ShowcaseConfig::discover_in(&[dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(source, ConfigSource::Defaults));
        assert_eq!(cfg, ShowcaseConfig::default());
    }

    #[test]
    fn discovered_bad_file_falls_back_to_defaults() {
        let dir = scratch_dir("malformed");
        std::fs::write(dir.join("config.toml"), "[timing\n").unwrap();
        let (cfg, source) = ShowcaseConfig::discover_in(&[dir.clone()]);
        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(source, ConfigSource::Fallback(ConfigError::Parse { .. })));
        assert_eq!(cfg, ShowcaseConfig::default());
    }

    #[test]
    fn discovery_takes_first_directory_with_a_file() {
        let empty = scratch_dir("first");
        let found = scratch_dir("second");
        std::fs::write(found.join("config.toml"), "[timing]\npulse_ms = 250\n").unwrap();
        let (cfg, source) = ShowcaseConfig::discover_in(&[empty.clone(), found.clone()]);
        std::fs::remove_dir_all(&empty).unwrap();
        std::fs::remove_dir_all(&found).unwrap();
        assert!(matches!(source, ConfigSource::File(ref p) if p == &found.join("config.toml")));
        assert_eq!(cfg.timing.pulse_ms, 250);
    }

    #[test]
    fn missing_explicit_file_is_a_read_error() {
        let err = ShowcaseConfig::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
