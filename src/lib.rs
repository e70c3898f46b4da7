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

//! # Compbench
//!
//! `compbench` compares interchangeable compression implementations
//! ("codecs") across a matrix of formats, sample files, compression levels
//! and input sizes, and prints one aligned table per (format, test) pair.
//!
//! The library is the engine behind the `compbench` CLI; the orchestrator
//! only talks to codecs through [`registry::CodecRegistry`] and to the
//! measurement loop through the [`suite::Suite`] trait, so both can be
//! swapped out.
//!
//! ## Core Modules
//!
//! * [`params`]: The parameter matrix. Parses `,`/`:` separated selection
//!   lists into formats, tests, levels and sizes, and derives the default
//!   codec and format lists from a registry.
//! * [`registry`]: The capability registry of encoders and decoders, plus
//!   the reference-encoder selector used by decode-rate benchmarks.
//! * [`suite`]: The `Suite` trait and `Bench`, the wall-clock implementation
//!   that produces results matrices with deltas against the baseline column.
//! * [`benchmark`]: Contains `run_benchmarks`, which decides which tests can
//!   run for each format, reports skips, and prints the tables.
//! * [`report`]: Renders a results matrix as a column-aligned text table.
//! * [`codecs`]: The codecs compiled into the binary.
//! * [`samples`]: Sample file lookup and the synthetic corpora.
//! * [`cli`]: Defines the `clap`-based command-line interface.
//! * [`config`]: Layers defaults, a JSON file, env vars and CLI flags with
//!   `figment`, then resolves them into a `Config`.
//! * [`error`]: Defines the custom error types for the library.
//! * [`logging`]: Provides the `setup_tracing` utility.

pub mod benchmark;
pub mod cli;
pub mod codecs;
pub mod config;
pub mod error;
pub mod logging;
pub mod params;
pub mod registry;
pub mod report;
pub mod samples;
pub mod suite;
