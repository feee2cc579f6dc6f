// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operator configuration, optionally loaded from environment variables.

use polyframe_obj::{ExportOptions, DEFAULT_HEADER};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Which checks an operator runs before doing its work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Skip all checks.
    None,
    /// Check paths and other parameters only.
    Parameters,
    /// Check table contents only.
    Data,
    /// Check parameters, then data.
    #[default]
    All,
}

impl ValidationMode {
    pub const ALL: [ValidationMode; 4] = [
        ValidationMode::Parameters,
        ValidationMode::Data,
        ValidationMode::All,
        ValidationMode::None,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValidationMode::None => "none",
            ValidationMode::Parameters => "parameters",
            ValidationMode::Data => "data",
            ValidationMode::All => "all",
        }
    }

    #[inline]
    pub fn validates_parameters(self) -> bool {
        matches!(self, ValidationMode::Parameters | ValidationMode::All)
    }

    #[inline]
    pub fn validates_data(self) -> bool {
        matches!(self, ValidationMode::Data | ValidationMode::All)
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValidationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == value)
            .ok_or_else(|| {
                let modes: Vec<&str> = Self::ALL.iter().map(|m| m.name()).collect();
                Error::Validation(format!(
                    "Validate keyword must be one of {:?}. Value provided: {}.",
                    modes, s
                ))
            })
    }
}

/// Operator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Checks run by every operator.
    pub validate: ValidationMode,
    /// Header comment of written OBJ files.
    pub obj_header: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `POLYFRAME_VALIDATE` takes a [`ValidationMode`] name and
    /// `POLYFRAME_OBJ_HEADER` the OBJ header text. Unset or unparseable
    /// values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            validate: std::env::var("POLYFRAME_VALIDATE")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.validate),
            obj_header: std::env::var("POLYFRAME_OBJ_HEADER").unwrap_or(defaults.obj_header),
        }
    }

    pub fn with_validation(mut self, validate: ValidationMode) -> Self {
        self.validate = validate;
        self
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            header: self.obj_header.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            validate: ValidationMode::All,
            obj_header: DEFAULT_HEADER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flags() {
        assert!(ValidationMode::All.validates_parameters());
        assert!(ValidationMode::All.validates_data());
        assert!(ValidationMode::Parameters.validates_parameters());
        assert!(!ValidationMode::Parameters.validates_data());
        assert!(!ValidationMode::Data.validates_parameters());
        assert!(ValidationMode::Data.validates_data());
        assert!(!ValidationMode::None.validates_parameters());
        assert!(!ValidationMode::None.validates_data());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("data".parse::<ValidationMode>().unwrap(), ValidationMode::Data);
        assert_eq!(" ALL ".parse::<ValidationMode>().unwrap(), ValidationMode::All);
        let err = "some".parse::<ValidationMode>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validate keyword must be one of [\"parameters\", \"data\", \"all\", \"none\"]. \
             Value provided: some."
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: Config = serde_json::from_str(r#"{"validate": "parameters"}"#).unwrap();
        assert_eq!(config.validate, ValidationMode::Parameters);
        assert_eq!(config.obj_header, DEFAULT_HEADER);
        assert_eq!(config.export_options().header, DEFAULT_HEADER);

        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"validate\":\"all\""));
    }
}
