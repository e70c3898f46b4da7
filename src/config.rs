// Copyright 2025 Chisomo Makombo Sakala
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
use crate::cli::Cli;
use crate::error::ConfigError;
use crate::params;
use crate::params::Selection;
use crate::params::Workload;
use crate::registry::BASELINE_CODEC;
use crate::registry::CodecRegistry;
use figment::Figment;
use figment::providers::Env;
use figment::providers::Format as _;
use figment::providers::Json;
use figment::providers::Serialized;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

// --- Default Values ---
pub const DEFAULT_TESTS: &str = "encRate,decRate,ratio";
pub const DEFAULT_FILES: &str = "zeros.bin,random.bin,binary.bin,repeats.bin,huffman.txt,digits.txt";
pub const DEFAULT_LEVELS: &str = "1,6,9";
pub const DEFAULT_SIZES: &str = "1e4,1e5,1e6";
pub const DEFAULT_MIN_TIME_MS: u64 = 200;

const ENV_PREFIX: &str = "COMPBENCH_";

/// Raw, layered settings: defaults < JSON file < `COMPBENCH_*` env < CLI flags.
///
/// `codecs`, `fmts` and `paths` stay `None` unless some layer sets them, in
/// which case their defaults are derived at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
  #[serde(deserialize_with = "lenient")]
  pub tests: String,
  #[serde(deserialize_with = "lenient")]
  pub files: String,
  #[serde(deserialize_with = "lenient")]
  pub levels: String,
  #[serde(deserialize_with = "lenient")]
  pub sizes: String,
  #[serde(default, deserialize_with = "lenient_opt", skip_serializing_if = "Option::is_none")]
  pub codecs: Option<String>,
  #[serde(default, deserialize_with = "lenient_opt", skip_serializing_if = "Option::is_none")]
  pub fmts: Option<String>,
  #[serde(default, deserialize_with = "lenient_opt", skip_serializing_if = "Option::is_none")]
  pub paths: Option<String>,
  pub min_time_ms: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      tests: DEFAULT_TESTS.to_string(),
      files: DEFAULT_FILES.to_string(),
      levels: DEFAULT_LEVELS.to_string(),
      sizes: DEFAULT_SIZES.to_string(),
      codecs: None,
      fmts: None,
      paths: None,
      min_time_ms: DEFAULT_MIN_TIME_MS,
    }
  }
}

/// Env values such as `COMPBENCH_LEVELS=9` arrive as numbers; lists are strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
  Text(String),
  Int(i64),
  Float(f64),
}

impl From<Scalar> for String {
  fn from(value: Scalar) -> Self {
    match value {
      Scalar::Text(s) => s,
      Scalar::Int(i) => i.to_string(),
      Scalar::Float(f) => f.to_string(),
    }
  }
}

fn lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Scalar::deserialize(deserializer).map(String::from)
}

fn lenient_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
  Option::<Scalar>::deserialize(deserializer).map(|v| v.map(String::from))
}

impl Settings {
  /// The layered provider stack for a settings file and command line.
  pub fn figment(config_file: &Path, cli: &Cli) -> Figment {
    Figment::from(Serialized::defaults(Settings::default()))
      .merge(Json::file(config_file))
      .merge(Env::prefixed(ENV_PREFIX).ignore(&["config", "log_file"]))
      .merge(Serialized::defaults(cli))
  }

  pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
    Self::figment(&cli.config, cli)
      .extract()
      .map_err(|e| ConfigError::Settings(Box::new(e)))
  }
}

/// Fully validated and resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
  pub selection: Selection,
  pub min_time: Duration,
}

impl Config {
  /// Loads the layered settings and resolves them against `registry`.
  pub fn resolve(cli: &Cli, registry: &CodecRegistry) -> Result<Self, ConfigError> {
    Self::from_settings(Settings::load(cli)?, registry)
  }

  /// Parses every selection list. Unknown tests or formats and bad levels
  /// are fatal; codec and format defaults come from the registry.
  pub fn from_settings(settings: Settings, registry: &CodecRegistry) -> Result<Self, ConfigError> {
    let Settings {
      tests,
      files,
      levels,
      sizes,
      codecs,
      fmts,
      paths,
      min_time_ms,
    } = settings;

    let tests = params::parse_tests(&tests)?;
    let levels = params::parse_levels(&levels)?;
    let sizes = params::parse_sizes(&sizes);
    let formats = match fmts {
      Some(raw) => params::parse_formats(&raw)?,
      None => params::default_formats(registry),
    };
    let codecs = match codecs {
      Some(raw) => params::split_list(&raw),
      None => params::default_codecs(registry, BASELINE_CODEC),
    };
    let paths = paths.map_or_else(default_paths, |raw| params::parse_paths(&raw));

    tracing::debug!(?tests, ?formats, ?codecs, ?paths, "Resolved selection");

    Ok(Config {
      selection: Selection {
        tests,
        codecs,
        formats,
        paths,
        workload: Workload {
          files: params::split_list(&files),
          levels,
          sizes,
        },
      },
      min_time: Duration::from_millis(min_time_ms),
    })
  }
}

/// `<cwd>/testdata`, then `<cwd>` itself.
fn default_paths() -> Vec<PathBuf> {
  match std::env::current_dir() {
    Ok(cwd) => vec![cwd.join("testdata"), cwd],
    Err(_) => Vec::new(),
  }
}
