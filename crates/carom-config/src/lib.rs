//! # carom-config
//!
//! Runtime configuration, read once at startup from the process
//! environment. Every value is copied out; nothing holds on to the
//! environment afterwards.

use std::path::PathBuf;

mod error;

pub use error::ConfigError;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Default speed threshold below which collisions are forced elastic.
pub const DEFAULT_RESTCOEF_THRESHOLD: f64 = 1e-4;

/// The simulation's runtime configuration.
///
/// See [`Config::from_env`] for the environment keys.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the input snapshot.
    pub input_directory: PathBuf,
    /// Simulated-time limit.
    pub tmax: f64,
    /// Wall-clock budget in seconds.
    pub wtmax: f64,
    /// Simulated-time interval between saved snapshots.
    pub save_rate: f64,
    /// Simulated-time interval between diagnostics log lines.
    pub log_rate: f64,
    /// Particle-particle restitution coefficient, in `[0, 1]`.
    pub restcoef_pp: f64,
    /// Particle-wall restitution coefficient, in `[0, 1]`.
    pub restcoef_pw: f64,
    /// Speed threshold of the elastic override. This is an absolute
    /// speed: inputs whose velocity scale is far from unity should set it
    /// accordingly.
    pub restcoef_threshold: f64,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// Required keys: `input_directory`, `tmax`, `wtmax`, `save_rate`,
    /// `log_rate`, `restcoef_pp`, `restcoef_pw`. Optional:
    /// `restcoef_threshold` (defaults to
    /// [`DEFAULT_RESTCOEF_THRESHOLD`]).
    ///
    /// # Error
    ///
    /// Returns [`ConfigError`] when a required key is missing, a value
    /// does not parse, or a restitution coefficient leaves `[0, 1]`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            input_directory: PathBuf::from(require(&lookup, "input_directory")?),
            tmax: parse(&lookup, "tmax")?,
            wtmax: parse(&lookup, "wtmax")?,
            save_rate: parse(&lookup, "save_rate")?,
            log_rate: parse(&lookup, "log_rate")?,
            restcoef_pp: parse(&lookup, "restcoef_pp")?,
            restcoef_pw: parse(&lookup, "restcoef_pw")?,
            restcoef_threshold: match lookup("restcoef_threshold") {
                Some(value) => parse_value("restcoef_threshold", &value)?,
                None => DEFAULT_RESTCOEF_THRESHOLD,
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("restcoef_pp", self.restcoef_pp),
            ("restcoef_pw", self.restcoef_pw),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { key, value });
            }
        }
        Ok(())
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String> {
    lookup(key).ok_or(ConfigError::Missing { key })
}

fn parse(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<f64> {
    let value = require(lookup, key)?;
    parse_value(key, &value)
}

fn parse_value(key: &'static str, value: &str) -> Result<f64> {
    value.parse().map_err(|_| ConfigError::Parse {
        key,
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn environment() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("input_directory", "input"),
            ("tmax", "100.0"),
            ("wtmax", "600"),
            ("save_rate", "10.0"),
            ("log_rate", "1.0"),
            ("restcoef_pp", "0.99"),
            ("restcoef_pw", "1.0"),
        ])
    }

    fn from_map(map: &HashMap<&str, &str>) -> Result<Config> {
        Config::from_lookup(|key| map.get(key).map(|value| (*value).to_owned()))
    }

    #[test]
    fn test_complete_environment() {
        let config = from_map(&environment()).unwrap();
        assert_eq!(config.input_directory, PathBuf::from("input"));
        assert_eq!(config.tmax, 100.0);
        assert_eq!(config.wtmax, 600.0);
        assert_eq!(config.restcoef_pp, 0.99);
        assert_eq!(config.restcoef_threshold, DEFAULT_RESTCOEF_THRESHOLD);
    }

    #[test]
    fn test_threshold_override() {
        let mut map = environment();
        let _ = map.insert("restcoef_threshold", "1e-6");
        assert_eq!(from_map(&map).unwrap().restcoef_threshold, 1e-6);
    }

    #[test]
    fn test_missing_key() {
        let mut map = environment();
        let _ = map.remove("tmax");
        assert!(matches!(
            from_map(&map),
            Err(ConfigError::Missing { key: "tmax" })
        ));
    }

    #[test]
    fn test_unparsable_value() {
        let mut map = environment();
        let _ = map.insert("save_rate", "often");
        assert!(matches!(from_map(&map), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_out_of_range_coefficient() {
        let mut map = environment();
        let _ = map.insert("restcoef_pp", "1.5");
        assert!(matches!(
            from_map(&map),
            Err(ConfigError::OutOfRange {
                key: "restcoef_pp",
                ..
            })
        ));
    }
}
