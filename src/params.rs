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

//! The parameter matrix: typed selection lists parsed from raw strings.
//!
//! Every list flag is a token list separated by `,` or `:` (interchangeable,
//! no escaping). Tests and formats must resolve to known tokens. Levels and
//! sizes accept numeric-with-suffix notation such as `1e4`, `64Ki` or `2M`.

use crate::error::ConfigError;
use crate::registry::CodecRegistry;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A compression container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Format {
  Flate,
  Bzip2,
  Xz,
  Brotli,
}

impl Format {
  pub const ALL: [Format; 4] = [Format::Flate, Format::Bzip2, Format::Xz, Format::Brotli];

  /// Short display token, also the value accepted on the command line.
  pub fn token(self) -> &'static str {
    match self {
      Format::Flate => "fl",
      Format::Bzip2 => "bz2",
      Format::Xz => "xz",
      Format::Brotli => "br",
    }
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.token())
  }
}

impl FromStr for Format {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Format::ALL
      .into_iter()
      .find(|f| f.token() == s)
      .ok_or_else(|| ConfigError::UnknownFormat {
        token: s.to_string(),
        expected: tokens(Format::ALL.iter().map(|f| f.token())),
      })
  }
}

/// A benchmark type. Decides which suite operation runs and how the table is labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestKind {
  EncodeRate,
  DecodeRate,
  CompressRatio,
}

impl TestKind {
  pub const ALL: [TestKind; 3] = [TestKind::EncodeRate, TestKind::DecodeRate, TestKind::CompressRatio];

  pub fn token(self) -> &'static str {
    match self {
      TestKind::EncodeRate => "encRate",
      TestKind::DecodeRate => "decRate",
      TestKind::CompressRatio => "ratio",
    }
  }

  /// Column title placed after each codec name in the header row.
  pub fn title(self) -> &'static str {
    match self {
      TestKind::EncodeRate | TestKind::DecodeRate => "MB/s",
      TestKind::CompressRatio => "ratio",
    }
  }

  /// Suffix appended to every primary metric value.
  pub fn suffix(self) -> &'static str {
    match self {
      TestKind::EncodeRate | TestKind::DecodeRate => "",
      TestKind::CompressRatio => "x",
    }
  }
}

impl fmt::Display for TestKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.token())
  }
}

impl FromStr for TestKind {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    TestKind::ALL
      .into_iter()
      .find(|t| t.token() == s)
      .ok_or_else(|| ConfigError::UnknownTest {
        token: s.to_string(),
        expected: tokens(TestKind::ALL.iter().map(|t| t.token())),
      })
  }
}

fn tokens<'a>(iter: impl Iterator<Item = &'a str>) -> String {
  iter.collect::<Vec<_>>().join(", ")
}

/// The files, levels and sizes crossed with every codec of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
  pub files: Vec<String>,
  pub levels: Vec<i32>,
  pub sizes: Vec<usize>,
}

impl Workload {
  /// Number of rows a suite produces for this workload.
  pub fn rows(&self) -> usize {
    self.files.len() * self.levels.len() * self.sizes.len()
  }
}

/// Fully parsed and validated selection for one run.
#[derive(Debug, Clone)]
pub struct Selection {
  pub tests: Vec<TestKind>,
  pub codecs: Vec<String>,
  pub formats: Vec<Format>,
  pub paths: Vec<PathBuf>,
  pub workload: Workload,
}

/// Splits a raw list on `,` and `:`. Tokens are kept verbatim, whitespace included.
pub fn split_list(raw: &str) -> Vec<String> {
  raw
    .split([',', ':'])
    .map(str::to_string)
    .collect()
}

pub fn parse_tests(raw: &str) -> Result<Vec<TestKind>, ConfigError> {
  split_list(raw).iter().map(|s| s.parse()).collect()
}

pub fn parse_formats(raw: &str) -> Result<Vec<Format>, ConfigError> {
  split_list(raw).iter().map(|s| s.parse()).collect()
}

/// Parses compression levels. Any unparseable token is fatal.
pub fn parse_levels(raw: &str) -> Result<Vec<i32>, ConfigError> {
  split_list(raw)
    .into_iter()
    .map(|s| match parse_prefix(&s) {
      Some(v) => Ok(v as i32),
      None => Err(ConfigError::InvalidLevel(s)),
    })
    .collect()
}

/// Parses input sizes. An unparseable token becomes a size of zero.
pub fn parse_sizes(raw: &str) -> Vec<usize> {
  split_list(raw)
    .iter()
    .map(|s| parse_prefix(s).map(|v| v as usize).unwrap_or(0))
    .collect()
}

pub fn parse_paths(raw: &str) -> Vec<PathBuf> {
  split_list(raw).into_iter().map(PathBuf::from).collect()
}

/// Parses a number with an optional SI (`k`, `M`, `G`, `T`) or IEC
/// (`Ki`, `Mi`, `Gi`, `Ti`) multiplier. Plain decimals, exponents (`1e4`)
/// and `0x` hex literals are accepted. Non-finite values are rejected.
pub fn parse_prefix(s: &str) -> Option<f64> {
  const MULTIPLIERS: [(&str, f64); 8] = [
    ("Ki", 1024.0),
    ("Mi", 1024.0 * 1024.0),
    ("Gi", 1024.0 * 1024.0 * 1024.0),
    ("Ti", 1024.0 * 1024.0 * 1024.0 * 1024.0),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
  ];

  if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    return i64::from_str_radix(hex, 16).ok().map(|v| v as f64);
  }

  let (number, scale) = MULTIPLIERS
    .iter()
    .find_map(|&(suffix, scale)| s.strip_suffix(suffix).map(|n| (n, scale)))
    .unwrap_or((s, 1.0));

  // f64::from_str would otherwise accept "inf" and "NaN".
  if !number.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '.' | '-' | '+')) {
    return None;
  }
  let value = number.parse::<f64>().ok()? * scale;
  value.is_finite().then_some(value)
}

/// Renders a size the way row labels show it: trailing zeros of three or
/// more digits collapse into an exponent (`10000` -> `1e4`).
pub fn format_size(size: usize) -> String {
  if size == 0 {
    return "0".to_string();
  }
  let (mut mantissa, mut exp) = (size, 0);
  while mantissa % 10 == 0 {
    mantissa /= 10;
    exp += 1;
  }
  if exp >= 3 {
    format!("{mantissa}e{exp}")
  } else {
    size.to_string()
  }
}

/// Every codec with at least one encoder or decoder. The baseline codec
/// comes first when present; the rest are in lexical order.
pub fn default_codecs(registry: &CodecRegistry, baseline: &str) -> Vec<String> {
  let all = registry.codecs();
  let has_baseline = all.contains(baseline);
  let rest = all.into_iter().filter(|c| c != baseline);
  if has_baseline {
    std::iter::once(baseline.to_string()).chain(rest).collect()
  } else {
    rest.collect()
  }
}

/// Every format with at least one encoder or decoder, ordered by display token.
pub fn default_formats(registry: &CodecRegistry) -> Vec<Format> {
  let mut formats: Vec<Format> = registry.formats().into_iter().collect();
  formats.sort_by_key(|f| f.token());
  formats
}
