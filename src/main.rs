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
use anyhow::Result;
use clap::Parser;
use compbench::benchmark::run_benchmarks;
use compbench::cli::Cli;
use compbench::cli::normalize_args;
use compbench::config::Config;
use compbench::error::CompbenchError;
use compbench::logging::setup_tracing;
use compbench::registry::CodecRegistry;
use compbench::samples::SampleLoader;
use compbench::suite::Bench;
use std::io::Write;
use std::time::Instant;

fn main() -> Result<()> {
  let _log_guard = setup_tracing()?;

  let cli = Cli::parse_from(normalize_args(std::env::args_os()));
  let main_span = tracing::info_span!("orchestrator");
  let _enter = main_span.enter();

  let registry = CodecRegistry::builtin();
  let config = Config::resolve(&cli, &registry).map_err(CompbenchError::from)?;

  tracing::info!("Starting Benchmark Run...");
  let started = Instant::now();

  let samples = SampleLoader::new(config.selection.paths.clone());
  let mut suite = Bench::new(&registry, samples, config.min_time);
  let mut out = std::io::stdout().lock();
  run_benchmarks(&config.selection, &registry, &mut suite, &mut out)?;

  writeln!(out, "RUNTIME: {:?}", started.elapsed())?;
  tracing::info!("Benchmark Run Complete.");

  Ok(())
}
