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
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error enum for the compbench library.
#[derive(Error, Debug)]
pub enum CompbenchError {
  #[error("Configuration error")]
  Config(#[from] ConfigError),

  #[error("Benchmark run failed")]
  Benchmark(#[from] BenchmarkError),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors raised while resolving the selection lists (src/params.rs, src/config.rs).
///
/// All of these are fatal: the run aborts before any benchmark starts.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("invalid test '{token}' (expected one of: {expected})")]
  UnknownTest { token: String, expected: String },

  #[error("invalid format '{token}' (expected one of: {expected})")]
  UnknownFormat { token: String, expected: String },

  #[error("invalid level '{0}'")]
  InvalidLevel(String),

  #[error("failed to load settings: {0}")]
  Settings(#[from] Box<figment::Error>),
}

/// Errors related to benchmark execution (src/suite.rs, src/samples.rs).
#[derive(Error, Debug)]
pub enum BenchmarkError {
  #[error("sample file '{name}' not found in any of {searched:?}")]
  SampleNotFound { name: String, searched: Vec<PathBuf> },

  #[error("failed to read sample file {path}")]
  ReadSample {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("codec '{codec}' has no {format} encoder")]
  MissingEncoder { codec: String, format: String },

  #[error("codec '{codec}' has no {format} decoder")]
  MissingDecoder { codec: String, format: String },
}
