// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::capability::ExclusionRule;
use crate::core::constants::capability::LEGACY_JSR283_PREFIX;
use crate::core::constants::config::{
    DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL, ENV_EXCLUDED_PREFIXES, ENV_LOG_FORMAT, ENV_LOG_LEVEL,
    ENV_REPOSITORY_YAML,
};
use crate::core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                name: ENV_LOG_FORMAT.to_string(),
                reason: format!("expected 'text' or 'json', got '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    /// Capability name prefixes never advertised by a proxy.
    pub excluded_prefixes: Vec<String>,
    /// Optional in-memory repository definition.
    pub repository_yaml_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            log_level: lookup(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_format: LogFormat::parse(
                &lookup(ENV_LOG_FORMAT).unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
            )?,
            excluded_prefixes: lookup(ENV_EXCLUDED_PREFIXES)
                .map(|s| {
                    s.split(',')
                        .map(|p| p.trim().to_string())
                        .filter(|p| !p.is_empty())
                        .collect()
                })
                .unwrap_or_else(|| vec![LEGACY_JSR283_PREFIX.to_string()]),
            repository_yaml_path: lookup(ENV_REPOSITORY_YAML).map(PathBuf::from),
        })
    }

    pub fn exclusion_rule(&self) -> ExclusionRule {
        ExclusionRule::new(self.excluded_prefixes.iter().cloned())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
            excluded_prefixes: vec![LEGACY_JSR283_PREFIX.to_string()],
            repository_yaml_path: None,
        }
    }
}
