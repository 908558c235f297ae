/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

// NOTE: Please make sure to use the YamlRead trait when deserializing these types!
//
//       DO NOT USE serde_yaml::from_{reader,str,value} OUTSIDE THIS CRATE;
//       YamlRead is what reports unused (likely misspelled) keys.

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

use std::collections::BTreeMap;
use std::io::Read;

/// Entry point for reading settings from YAML.
pub trait YamlRead: for<'de> serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, serde_yaml::Error> {
        YamlRead::from_dyn_reader(&mut r)
    }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, serde_yaml::Error> {
        Self::from_value(serde_yaml::from_reader(r)?)
    }

    fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        Self::from_value(serde_yaml::from_str(s)?)
    }

    fn from_value(value: serde_yaml::Value) -> Result<Self, serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: serde_yaml::Value) -> Result<$Type, serde_yaml::Error> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

/// Root settings object.
///
/// # Example
///
/// ```yaml
/// threading: serial
/// log-level: debug
/// symmetry-functions:
///   cn:
///     kind: coordination-number
///   moments:
///     kind: coordination-moments
///     r-power: 2
/// ```
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    #[serde(default)]
    pub threading: Threading,

    /// Maximum level of log messages.  Defaults to `info`.
    #[serde(default = "_settings__log_level")]
    pub log_level: log::LevelFilter,

    /// Symmetry functions to evaluate, by label.
    #[serde(default)]
    pub symmetry_functions: BTreeMap<String, SymmetryFunctionSettings>,
}
derive_yaml_read!{Settings}

#[allow(non_snake_case)]
fn _settings__log_level() -> log::LevelFilter { log::LevelFilter::Info }

/// Whether independent atoms may be evaluated on the rayon thread pool.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Threading {
    Serial,
    Rayon,
}

impl Default for Threading {
    fn default() -> Self { Threading::Rayon }
}

/// A pairwise symmetry function, computed from a switching weight and the
/// separation vector of each pair.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SymmetryFunctionSettings {
    /// The sum of the switching weights.
    CoordinationNumber {},

    /// The sum of the switching weights, each multiplied by `r^{r-power}`.
    #[serde(rename_all = "kebab-case")]
    CoordinationMoments {
        r_power: u32,
    },
}
derive_yaml_read!{SymmetryFunctionSettings}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_example() {
        let settings = Settings::from_yaml_str("\
threading: serial
log-level: debug
symmetry-functions:
  cn:
    kind: coordination-number
  moments:
    kind: coordination-moments
    r-power: 2
").unwrap();

        let mut expected = BTreeMap::new();
        expected.insert("cn".to_string(), SymmetryFunctionSettings::CoordinationNumber {});
        expected.insert("moments".to_string(), SymmetryFunctionSettings::CoordinationMoments { r_power: 2 });
        assert_eq!(settings, Settings {
            threading: Threading::Serial,
            log_level: log::LevelFilter::Debug,
            symmetry_functions: expected,
        });
    }

    #[test]
    fn defaults() {
        let settings = Settings::from_yaml_str("{}").unwrap();
        assert_eq!(settings.threading, Threading::Rayon);
        assert_eq!(settings.log_level, log::LevelFilter::Info);
        assert!(settings.symmetry_functions.is_empty());
    }

    #[test]
    fn r_power_is_compulsory() {
        let err = SymmetryFunctionSettings::from_yaml_str("kind: coordination-moments");
        assert!(err.is_err());
    }

    #[test]
    fn r_power_must_be_nonnegative() {
        let err = SymmetryFunctionSettings::from_yaml_str("{kind: coordination-moments, r-power: -1}");
        assert!(err.is_err());
    }

    #[test]
    fn unknown_kind() {
        assert!(SymmetryFunctionSettings::from_yaml_str("kind: steinhardt").is_err());
    }
}
