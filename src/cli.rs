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
use clap::Parser;
use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long flags that may also be spelled with a single dash (`-tests encRate`).
const LEGACY_FLAGS: [&str; 9] = [
  "tests",
  "files",
  "levels",
  "sizes",
  "codecs",
  "fmts",
  "paths",
  "min-time-ms",
  "config",
];

/// Every list flag takes tokens separated by `,` or `:`.
///
/// Flags left unset fall back to the settings file, then `COMPBENCH_*`
/// environment variables, then built-in defaults.
#[derive(Debug, Default, Parser, Serialize)]
#[command(version, about = "Compare compression codecs across formats, levels and input sizes")]
pub struct Cli {
  /// Benchmark tests to run: encRate, decRate, ratio.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tests: Option<String>,

  /// Sample files to benchmark, looked up in --paths.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub files: Option<String>,

  /// Compression levels.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub levels: Option<String>,

  /// Input sizes in bytes; accepts notation like 1e4, 64Ki or 2M.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sizes: Option<String>,

  /// Codecs to compare. Defaults to every registered codec, `std` first.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub codecs: Option<String>,

  /// Formats to benchmark: fl, bz2, xz, br. Defaults to every registered format.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub fmts: Option<String>,

  /// Directories searched for sample files.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub paths: Option<String>,

  /// Minimum wall time spent measuring each rate cell, in milliseconds.
  #[arg(long)]
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_time_ms: Option<u64>,

  /// JSON settings file. Ignored when it does not exist.
  #[arg(long, env = "COMPBENCH_CONFIG", default_value = "compbench.json")]
  #[serde(skip)]
  pub config: PathBuf,
}

/// Rewrites `-tests`/`-tests=…` style arguments into clap's `--tests` form.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
  I: IntoIterator<Item = OsString>,
{
  args
    .into_iter()
    .map(|arg| {
      let Some(text) = arg.to_str() else {
        return arg;
      };
      let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
        return arg;
      };
      let name = rest.split_once('=').map_or(rest, |(name, _)| name);
      if LEGACY_FLAGS.contains(&name) {
        OsString::from(format!("-{text}"))
      } else {
        arg
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(list: &[&str]) -> Vec<OsString> {
    list.iter().map(OsString::from).collect()
  }

  #[test]
  fn single_dash_flags_are_normalized() {
    let normalized = normalize_args(args(&["compbench", "-tests", "ratio", "-fmts=fl", "--levels", "1", "-V", "-x"]));
    assert_eq!(
      normalized,
      args(&["compbench", "--tests", "ratio", "--fmts=fl", "--levels", "1", "-V", "-x"])
    );
  }

  #[test]
  fn parses_legacy_spelling() {
    let cli = Cli::try_parse_from(normalize_args(args(&["compbench", "-codecs", "std:mz", "-sizes", "1e4"]))).unwrap();
    assert_eq!(cli.codecs.as_deref(), Some("std:mz"));
    assert_eq!(cli.sizes.as_deref(), Some("1e4"));
    assert_eq!(cli.tests, None);
  }
}
