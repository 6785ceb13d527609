//! Effect configuration (`portfolio-fx.toml`)

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    surface::{CircleStyle, Color},
};

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub trail: TrailConfig,
    #[serde(default)]
    pub rotator: RotatorConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.trail.validate()?;
        self.rotator.validate()
    }
}

/// Pointer trail parameters
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Frames a particle lives for
    pub lifespan: u32,
    /// Radius reached at the end of a particle's life
    pub max_radius: f32,
    /// Upper bound on simultaneously live particles
    pub capacity: usize,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
    /// Fixed RNG seed; random when absent
    pub seed: Option<u64>,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            lifespan: 100,
            max_radius: 6.0,
            capacity: 4096,
            fill: Color::rgb(0xe6, 0xf1, 0xf7),
            stroke: Color::rgb(0x3a, 0x92, 0xc5),
            stroke_width: 1.0,
            seed: None,
        }
    }
}

impl TrailConfig {
    pub fn style(&self) -> CircleStyle {
        CircleStyle {
            fill: self.fill,
            stroke: self.stroke,
            stroke_width: self.stroke_width,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lifespan == 0 {
            return Err(Error::InvalidConfig("trail.lifespan must be at least 1".into()));
        }
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("trail.capacity must be at least 1".into()));
        }
        if !(self.max_radius.is_finite() && self.max_radius >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "trail.max_radius must be a non-negative number, got {}",
                self.max_radius
            )));
        }
        Ok(())
    }
}

/// Typed-text rotator parameters
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RotatorConfig {
    pub phrases: Vec<String>,
    pub type_delay_ms: u64,
    pub hold_delay_ms: u64,
    pub delete_delay_ms: u64,
    pub wrap_delay_ms: u64,
    pub caret_period_ms: u64,
}

impl Default for RotatorConfig {
    fn default() -> Self {
        Self {
            phrases: default_phrases(),
            type_delay_ms: 100,
            hold_delay_ms: 2000,
            delete_delay_ms: 50,
            wrap_delay_ms: 800,
            caret_period_ms: 1000,
        }
    }
}

pub fn default_phrases() -> Vec<String> {
    ["Computer Science", "Web/App Developer", "Freelancer"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl RotatorConfig {
    pub fn timings(&self) -> RotatorTimings {
        RotatorTimings {
            type_delay: Duration::from_millis(self.type_delay_ms),
            hold_delay: Duration::from_millis(self.hold_delay_ms),
            delete_delay: Duration::from_millis(self.delete_delay_ms),
            wrap_delay: Duration::from_millis(self.wrap_delay_ms),
        }
    }

    pub fn caret_period(&self) -> Duration {
        Duration::from_millis(self.caret_period_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.phrases.is_empty() {
            return Err(Error::EmptyPhrases);
        }
        if self.caret_period_ms == 0 {
            return Err(Error::InvalidConfig("rotator.caret_period_ms must be at least 1".into()));
        }
        self.timings().validate()
    }
}

/// Delay before each kind of rotator tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotatorTimings {
    pub type_delay: Duration,
    pub hold_delay: Duration,
    pub delete_delay: Duration,
    /// Pause after switching phrases, before the first character is typed.
    /// Replaces `type_delay` for that one tick.
    pub wrap_delay: Duration,
}

impl RotatorTimings {
    /// A rotator whose every delay is zero would tick forever within a
    /// single host `advance`.
    pub fn validate(&self) -> Result<()> {
        let delays = [self.type_delay, self.hold_delay, self.delete_delay, self.wrap_delay];
        if delays.iter().all(Duration::is_zero) {
            return Err(Error::InvalidConfig(
                "rotator delays cannot all be zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for RotatorTimings {
    fn default() -> Self {
        RotatorConfig::default().timings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.rotator.phrases, default_phrases());
        assert_eq!(config.trail.lifespan, 100);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml_str(
            r##"
            [trail]
            fill = "#ffffff"
            seed = 42

            [rotator]
            phrases = ["AB", "CD"]
            hold_delay_ms = 500
            "##,
        )
        .unwrap();

        assert_eq!(config.trail.fill, Color::rgb(0xff, 0xff, 0xff));
        assert_eq!(config.trail.stroke, Color::rgb(0x3a, 0x92, 0xc5));
        assert_eq!(config.trail.seed, Some(42));
        assert_eq!(config.rotator.phrases, vec!["AB", "CD"]);
        assert_eq!(config.rotator.timings().hold_delay, Duration::from_millis(500));
        assert_eq!(config.rotator.timings().type_delay, Duration::from_millis(100));
    }

    #[test]
    fn empty_phrase_list_fails_fast() {
        let err = Config::from_toml_str("[rotator]\nphrases = []\n").unwrap_err();
        assert!(matches!(err, Error::EmptyPhrases));
    }

    #[test]
    fn all_zero_delays_are_rejected() {
        let err = Config::from_toml_str(
            "[rotator]\ntype_delay_ms = 0\nhold_delay_ms = 0\ndelete_delay_ms = 0\nwrap_delay_ms = 0\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        // One non-zero delay is enough for the clock to make progress.
        assert!(Config::from_toml_str(
            "[rotator]\ntype_delay_ms = 0\nhold_delay_ms = 1\ndelete_delay_ms = 0\nwrap_delay_ms = 0\n",
        )
        .is_ok());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[trail]\nlifespan = 0\n"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[trail]\nfill = \"blue\"\n"),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }
}
