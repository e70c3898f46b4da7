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

//! The measurement side of a benchmark: running codecs over a workload.

use crate::error::BenchmarkError;
use crate::params::Format;
use crate::params::Workload;
use crate::params::format_size;
use crate::registry::CodecRegistry;
use crate::registry::Decoder;
use crate::registry::Encoder;
use crate::registry::Reference;
use crate::samples::SampleLoader;
use std::hint::black_box;
use std::io;
use std::time::Duration;
use std::time::Instant;

/// One codec's result for one benchmark case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
  /// Throughput in MB/s, or the compression ratio.
  pub value: f64,
  /// `value` relative to the row's baseline column.
  pub delta: Option<f64>,
}

/// A results matrix: one row per `file:level:size` case, one cell per codec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteResults {
  pub rows: Vec<Vec<Cell>>,
  pub names: Vec<String>,
}

impl SuiteResults {
  /// Appends a row, deriving deltas against its first column.
  pub fn push(&mut self, name: String, values: &[f64]) {
    self.names.push(name);
    self.rows.push(with_deltas(values));
  }
}

/// Pairs each value with its ratio to the first value.
///
/// The first column is the baseline and never gets a delta. Others get one
/// only when the baseline is finite and non-zero.
pub fn with_deltas(values: &[f64]) -> Vec<Cell> {
  let baseline = values.first().copied().filter(|b| b.is_finite() && *b != 0.0);
  values
    .iter()
    .enumerate()
    .map(|(i, &value)| Cell {
      value,
      delta: if i == 0 { None } else { baseline.map(|b| value / b) },
    })
    .collect()
}

/// The three measurement suites the orchestrator can invoke.
///
/// `tick` must be called once per completed cell.
pub trait Suite {
  fn encode_rate(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError>;

  fn decode_rate(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    reference: Reference<'_>,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError>;

  fn ratio(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError>;
}

/// Wall-clock suite over the codecs of a [`CodecRegistry`].
pub struct Bench<'a> {
  registry: &'a CodecRegistry,
  samples: SampleLoader,
  min_time: Duration,
}

impl<'a> Bench<'a> {
  pub fn new(registry: &'a CodecRegistry, samples: SampleLoader, min_time: Duration) -> Self {
    Self {
      registry,
      samples,
      min_time,
    }
  }

  /// Repeats `op` until `min_time` has passed and returns MB/s for `bytes` per call.
  fn rate<T>(&self, bytes: usize, mut op: impl FnMut() -> io::Result<T>) -> io::Result<f64> {
    let start = Instant::now();
    let mut iterations = 0u64;
    loop {
      black_box(op()?);
      iterations += 1;
      let elapsed = start.elapsed();
      if elapsed >= self.min_time {
        // Clock resolution floor; keeps empty inputs at 0 MB/s.
        let seconds = elapsed.as_secs_f64().max(1e-9);
        return Ok(bytes as f64 * iterations as f64 / seconds / 1e6);
      }
    }
  }

  fn encoder(&self, format: Format, codec: &str) -> Result<&'a dyn Encoder, BenchmarkError> {
    self
      .registry
      .encoder(format, codec)
      .ok_or_else(|| BenchmarkError::MissingEncoder {
        codec: codec.to_string(),
        format: format.to_string(),
      })
  }

  fn decoder(&self, format: Format, codec: &str) -> Result<&'a dyn Decoder, BenchmarkError> {
    self
      .registry
      .decoder(format, codec)
      .ok_or_else(|| BenchmarkError::MissingDecoder {
        codec: codec.to_string(),
        format: format.to_string(),
      })
  }
}

fn cases(workload: &Workload) -> impl Iterator<Item = (&str, i32, usize)> + '_ {
  workload.files.iter().flat_map(move |file| {
    workload.levels.iter().flat_map(move |&level| {
      workload
        .sizes
        .iter()
        .map(move |&size| (file.as_str(), level, size))
    })
  })
}

fn case_name(file: &str, level: i32, size: usize) -> String {
  format!("{file}:{level}:{}", format_size(size))
}

/// Unwraps a cell measurement, logging failures and recording them as NaN.
fn settle(result: io::Result<f64>, codec: &str, case: &str) -> f64 {
  result.unwrap_or_else(|e| {
    tracing::warn!(codec, case, error = %e, "Codec failed; leaving cell blank");
    f64::NAN
  })
}

impl Suite for Bench<'_> {
  fn encode_rate(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError> {
    let mut results = SuiteResults::default();
    for (file, level, size) in cases(workload) {
      let name = case_name(file, level, size);
      let input = self.samples.load(file, size)?;
      let mut values = Vec::with_capacity(codecs.len());
      for codec in codecs {
        let encoder = self.encoder(format, codec)?;
        let rate = self.rate(input.len(), || encoder.encode(&input, level));
        values.push(settle(rate, codec, &name));
        tick();
      }
      results.push(name, &values);
    }
    Ok(results)
  }

  fn decode_rate(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    reference: Reference<'_>,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError> {
    let mut results = SuiteResults::default();
    for (file, level, size) in cases(workload) {
      let name = case_name(file, level, size);
      let input = self.samples.load(file, size)?;
      let compressed = reference.encoder.encode(&input, level);
      if let Err(e) = &compressed {
        tracing::warn!(codec = reference.codec, case = %name, error = %e, "Reference encoder failed; leaving row blank");
      }

      let mut values = Vec::with_capacity(codecs.len());
      for codec in codecs {
        let decoder = self.decoder(format, codec)?;
        let rate = match &compressed {
          Ok(compressed) => match decoder.decode(compressed) {
            Ok(output) if output != input => Err(io::Error::new(
              io::ErrorKind::InvalidData,
              format!("decoded {} bytes, expected {}", output.len(), input.len()),
            )),
            Ok(_) => self.rate(input.len(), || decoder.decode(compressed)),
            Err(e) => Err(e),
          },
          Err(_) => Ok(f64::NAN),
        };
        values.push(settle(rate, codec, &name));
        tick();
      }
      results.push(name, &values);
    }
    Ok(results)
  }

  fn ratio(
    &mut self,
    format: Format,
    codecs: &[String],
    workload: &Workload,
    tick: &mut dyn FnMut(),
  ) -> Result<SuiteResults, BenchmarkError> {
    let mut results = SuiteResults::default();
    for (file, level, size) in cases(workload) {
      let name = case_name(file, level, size);
      let input = self.samples.load(file, size)?;
      let mut values = Vec::with_capacity(codecs.len());
      for codec in codecs {
        let encoder = self.encoder(format, codec)?;
        let ratio = encoder
          .encode(&input, level)
          .map(|compressed| input.len() as f64 / compressed.len() as f64);
        values.push(settle(ratio, codec, &name));
        tick();
      }
      results.push(name, &values);
    }
    Ok(results)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::registry::reference_encoder;
  use crate::registry::tests::FakeCodec;
  use crate::registry::tests::fake_registry;

  struct Broken;

  impl Encoder for Broken {
    fn encode(&self, _input: &[u8], _level: i32) -> io::Result<Vec<u8>> {
      Err(io::Error::other("boom"))
    }
  }

  fn workload(files: &[&str], levels: &[i32], sizes: &[usize]) -> Workload {
    Workload {
      files: files.iter().map(|s| s.to_string()).collect(),
      levels: levels.to_vec(),
      sizes: sizes.to_vec(),
    }
  }

  fn codecs(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
  }

  fn bench(registry: &CodecRegistry) -> Bench<'_> {
    Bench::new(registry, SampleLoader::default(), Duration::ZERO)
  }

  #[test]
  fn deltas_are_relative_to_the_first_column() {
    let cells = with_deltas(&[2.0, 4.0, 1.0]);
    assert_eq!(cells[0].delta, None);
    assert_eq!(cells[1].delta, Some(2.0));
    assert_eq!(cells[2].delta, Some(0.5));
  }

  #[test]
  fn no_delta_without_a_usable_baseline() {
    for baseline in [0.0, f64::NAN, f64::INFINITY] {
      let cells = with_deltas(&[baseline, 3.0]);
      assert!(cells.iter().all(|c| c.delta.is_none()));
    }
    assert!(with_deltas(&[]).is_empty());
  }

  #[test]
  fn rows_follow_file_level_size_order() {
    let registry = fake_registry();
    let mut ticks = 0;
    let results = bench(&registry)
      .ratio(
        Format::Flate,
        &codecs(&["x"]),
        &workload(&["zeros.bin", "digits.txt"], &[1, 9], &[1000, 10_000]),
        &mut || ticks += 1,
      )
      .unwrap();

    assert_eq!(
      results.names,
      vec![
        "zeros.bin:1:1e3",
        "zeros.bin:1:1e4",
        "zeros.bin:9:1e3",
        "zeros.bin:9:1e4",
        "digits.txt:1:1e3",
        "digits.txt:1:1e4",
        "digits.txt:9:1e3",
        "digits.txt:9:1e4",
      ]
    );
    assert_eq!(ticks, 8);
    assert!(results.rows.iter().all(|row| row == &vec![Cell { value: 1.0, delta: None }]));
  }

  #[test]
  fn failing_codec_yields_nan_not_error() {
    let mut registry = fake_registry();
    registry.register_encoder(Format::Flate, "broken", Broken);

    let results = bench(&registry)
      .encode_rate(
        Format::Flate,
        &codecs(&["x", "broken"]),
        &workload(&["zeros.bin"], &[6], &[100]),
        &mut || {},
      )
      .unwrap();

    let row = &results.rows[0];
    assert!(row[0].value > 0.0);
    assert!(row[1].value.is_nan());
    assert!(row[1].delta.unwrap().is_nan());
  }

  #[test]
  fn decoders_share_the_reference_input() {
    let registry = fake_registry();
    let reference = reference_encoder(&registry, Format::Flate).unwrap();
    let mut ticks = 0;
    let results = bench(&registry)
      .decode_rate(
        Format::Flate,
        &codecs(&["b", "x"]),
        &workload(&["random.bin"], &[1], &[4096]),
        reference,
        &mut || ticks += 1,
      )
      .unwrap();

    assert_eq!(ticks, 2);
    assert!(results.rows[0].iter().all(|c| c.value > 0.0));
  }

  #[test]
  fn broken_reference_blanks_the_row() {
    let registry = fake_registry();
    let reference = Reference {
      codec: "broken",
      encoder: &Broken,
    };
    let results = bench(&registry)
      .decode_rate(
        Format::Flate,
        &codecs(&["x"]),
        &workload(&["zeros.bin"], &[1], &[10]),
        reference,
        &mut || {},
      )
      .unwrap();
    assert!(results.rows[0][0].value.is_nan());
  }

  #[test]
  fn unregistered_codec_is_an_error() {
    let registry = fake_registry();
    let err = bench(&registry)
      .ratio(
        Format::Xz,
        &codecs(&["x"]),
        &workload(&["zeros.bin"], &[1], &[10]),
        &mut || {},
      )
      .unwrap_err();
    assert!(matches!(err, BenchmarkError::MissingEncoder { .. }));
  }

  #[test]
  fn zero_size_inputs_produce_zero_values() {
    let mut registry = CodecRegistry::default();
    registry.register_encoder(Format::Flate, "x", FakeCodec);
    let results = bench(&registry)
      .encode_rate(
        Format::Flate,
        &codecs(&["x"]),
        &workload(&["zeros.bin"], &[1], &[0]),
        &mut || {},
      )
      .unwrap();
    assert_eq!(results.names, vec!["zeros.bin:1:0"]);
    assert_eq!(results.rows[0][0].value, 0.0);
  }
}
