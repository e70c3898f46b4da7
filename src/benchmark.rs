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

//! The benchmark orchestrator: decides which (format, test) pairs can run,
//! drives the suite, and prints one table per pair.

use crate::error::CompbenchError;
use crate::params::Selection;
use crate::params::TestKind;
use crate::registry::CodecRegistry;
use crate::registry::reference_encoder;
use crate::report::Table;
use crate::suite::Suite;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::io::Write;

/// Runs every selected test for every selected format, writing reports to `out`.
///
/// A format without encoders (or, for decode-rate, without decoders) among
/// the selected codecs is reported as a skip and the run moves on.
pub fn run_benchmarks<S, W>(
  selection: &Selection,
  registry: &CodecRegistry,
  suite: &mut S,
  out: &mut W,
) -> Result<(), CompbenchError>
where
  S: Suite + ?Sized,
  W: Write + ?Sized,
{
  let workload = &selection.workload;

  for &format in &selection.formats {
    let _format_span = tracing::info_span!("format", %format).entered();

    let encoders = registry.encoders_for(format, &selection.codecs);
    let decoders = registry.decoders_for(format, &selection.codecs);
    tracing::debug!(?encoders, ?decoders, "Available codecs");

    for &test in &selection.tests {
      let _test_span = tracing::info_span!("test", %test).entered();
      writeln!(out, "BENCHMARK: {format}:{test}")?;

      if encoders.is_empty() {
        skip(out, "There are no encoders available.")?;
        continue;
      }
      if test == TestKind::DecodeRate && decoders.is_empty() {
        skip(out, "There are no decoders available.")?;
        continue;
      }

      let codecs = match test {
        TestKind::DecodeRate => &decoders,
        TestKind::EncodeRate | TestKind::CompressRatio => &encoders,
      };
      let bar = progress_bar(codecs.len() * workload.rows());
      let mut tick = progress_ticker(bar.clone());

      tracing::info!(codecs = ?codecs, cases = workload.rows(), "Running benchmark");
      let results = match test {
        TestKind::EncodeRate => suite.encode_rate(format, codecs, workload, &mut tick)?,
        TestKind::DecodeRate => {
          let Some(reference) = reference_encoder(registry, format) else {
            bar.finish_and_clear();
            skip(out, "There are no encoders available.")?;
            continue;
          };
          tracing::info!(reference = reference.codec, "Using reference encoder");
          suite.decode_rate(format, codecs, workload, reference, &mut tick)?
        }
        TestKind::CompressRatio => suite.ratio(format, codecs, workload, &mut tick)?,
      };
      bar.finish_and_clear();

      let table = Table::new(&results.rows, &results.names, codecs, test.title(), test.suffix());
      write!(out, "{table}")?;
      writeln!(out)?;
    }
    writeln!(out)?;
  }

  Ok(())
}

fn skip<W: Write + ?Sized>(out: &mut W, reason: &str) -> std::io::Result<()> {
  tracing::info!(reason, "Skipping benchmark");
  writeln!(out, "\tSKIP: {reason}")?;
  writeln!(out)
}

/// One bar per table on stderr; indicatif hides it when stderr is not a terminal.
fn progress_bar(total: usize) -> ProgressBar {
  let bar = ProgressBar::new(total as u64);
  bar.set_style(
    ProgressStyle::with_template("\t[{percent:>3}%] {pos} of {len}")
      .unwrap_or_else(|_| ProgressStyle::default_bar()),
  );
  bar
}

fn progress_ticker(bar: ProgressBar) -> impl FnMut() {
  move || bar.inc(1)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::BenchmarkError;
  use crate::params::Format;
  use crate::params::Workload;
  use crate::registry::Reference;
  use crate::registry::tests::FakeCodec;
  use crate::registry::tests::fake_registry;
  use crate::suite::SuiteResults;

  #[derive(Debug, PartialEq)]
  struct Call {
    test: TestKind,
    format: Format,
    codecs: Vec<String>,
    reference: Option<String>,
  }

  /// Records every call and reports the codec index + 1 in every cell.
  #[derive(Default)]
  struct RecordingSuite {
    calls: Vec<Call>,
  }

  impl RecordingSuite {
    fn record(
      &mut self,
      test: TestKind,
      format: Format,
      codecs: &[String],
      workload: &Workload,
      reference: Option<&str>,
      tick: &mut dyn FnMut(),
    ) -> Result<SuiteResults, BenchmarkError> {
      self.calls.push(Call {
        test,
        format,
        codecs: codecs.to_vec(),
        reference: reference.map(str::to_string),
      });
      let mut results = SuiteResults::default();
      for row in 0..workload.rows() {
        let values: Vec<f64> = (1..=codecs.len()).map(|i| i as f64).collect();
        codecs.iter().for_each(|_| tick());
        results.push(format!("case{row}"), &values);
      }
      Ok(results)
    }
  }

  impl Suite for RecordingSuite {
    fn encode_rate(
      &mut self,
      format: Format,
      codecs: &[String],
      workload: &Workload,
      tick: &mut dyn FnMut(),
    ) -> Result<SuiteResults, BenchmarkError> {
      self.record(TestKind::EncodeRate, format, codecs, workload, None, tick)
    }

    fn decode_rate(
      &mut self,
      format: Format,
      codecs: &[String],
      workload: &Workload,
      reference: Reference<'_>,
      tick: &mut dyn FnMut(),
    ) -> Result<SuiteResults, BenchmarkError> {
      self.record(TestKind::DecodeRate, format, codecs, workload, Some(reference.codec), tick)
    }

    fn ratio(
      &mut self,
      format: Format,
      codecs: &[String],
      workload: &Workload,
      tick: &mut dyn FnMut(),
    ) -> Result<SuiteResults, BenchmarkError> {
      self.record(TestKind::CompressRatio, format, codecs, workload, None, tick)
    }
  }

  fn selection(tests: &[TestKind], formats: &[Format], codecs: &[&str]) -> Selection {
    Selection {
      tests: tests.to_vec(),
      codecs: codecs.iter().map(|s| s.to_string()).collect(),
      formats: formats.to_vec(),
      paths: Vec::new(),
      workload: Workload {
        files: vec!["zeros.bin".to_string()],
        levels: vec![6],
        sizes: vec![10_000],
      },
    }
  }

  fn run(selection: &Selection, registry: &CodecRegistry) -> (String, Vec<Call>) {
    let mut suite = RecordingSuite::default();
    let mut out = Vec::new();
    run_benchmarks(selection, registry, &mut suite, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), suite.calls)
  }

  #[test]
  fn missing_encoders_skip_every_test() {
    let registry = fake_registry();
    let (out, calls) = run(
      &selection(&[TestKind::EncodeRate, TestKind::DecodeRate], &[Format::Xz], &["x", "b"]),
      &registry,
    );

    assert!(calls.is_empty());
    assert_eq!(
      out,
      "BENCHMARK: xz:encRate\n\tSKIP: There are no encoders available.\n\n\
       BENCHMARK: xz:decRate\n\tSKIP: There are no encoders available.\n\n\n"
    );
  }

  #[test]
  fn missing_decoders_skip_only_decode_rate() {
    let mut registry = CodecRegistry::default();
    registry.register_encoder(Format::Brotli, "a", FakeCodec);
    let (out, calls) = run(
      &selection(&[TestKind::DecodeRate, TestKind::CompressRatio], &[Format::Brotli], &["a"]),
      &registry,
    );

    assert!(out.contains("BENCHMARK: br:decRate\n\tSKIP: There are no decoders available.\n"));
    assert!(out.contains("BENCHMARK: br:ratio\n\tbenchmark"));
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].test, TestKind::CompressRatio);
  }

  #[test]
  fn decode_uses_reference_even_when_encoder_is_not_a_column() {
    // "A" can only encode, "B" can only decode.
    let mut registry = CodecRegistry::default();
    registry.register_encoder(Format::Flate, "A", FakeCodec);
    registry.register_decoder(Format::Flate, "B", FakeCodec);
    let (out, calls) = run(&selection(&[TestKind::DecodeRate], &[Format::Flate], &["A", "B"]), &registry);

    assert_eq!(
      calls,
      vec![Call {
        test: TestKind::DecodeRate,
        format: Format::Flate,
        codecs: vec!["B".to_string()],
        reference: Some("A".to_string()),
      }]
    );
    assert!(out.contains("B MB/s"));
    assert!(!out.contains("A MB/s"));
  }

  #[test]
  fn tests_run_in_user_order_with_partitioned_codecs() {
    let registry = fake_registry();
    let (_, calls) = run(
      &selection(
        &[TestKind::CompressRatio, TestKind::DecodeRate, TestKind::EncodeRate],
        &[Format::Flate],
        &["b", "x"],
      ),
      &registry,
    );

    let order: Vec<_> = calls.iter().map(|c| (c.test, c.codecs.clone())).collect();
    assert_eq!(
      order,
      vec![
        (TestKind::CompressRatio, vec!["x".to_string()]),
        (TestKind::DecodeRate, vec!["b".to_string(), "x".to_string()]),
        (TestKind::EncodeRate, vec!["x".to_string()]),
      ]
    );
  }

  #[test]
  fn single_case_single_codec_has_blank_self_delta() {
    let registry = fake_registry();
    let (out, _) = run(&selection(&[TestKind::CompressRatio], &[Format::Flate], &["x"]), &registry);

    assert_eq!(
      out,
      "BENCHMARK: fl:ratio\n\
       \tbenchmark      x ratio  delta\n\
       \tcase0            1.00x       \n\
       \n\
       \n"
    );
  }

  #[test]
  fn formats_are_separated_by_blank_lines() {
    let mut registry = fake_registry();
    registry.register_encoder(Format::Xz, "x", FakeCodec);
    let (out, calls) = run(
      &selection(&[TestKind::EncodeRate], &[Format::Flate, Format::Xz], &["x"]),
      &registry,
    );
    assert_eq!(calls.len(), 2);
    assert!(out.contains("\n\n\nBENCHMARK: xz:encRate\n"));
  }

  #[test]
  fn ticks_advance_the_progress_bar() {
    let bar = progress_bar(3);
    let mut tick = progress_ticker(bar.clone());
    tick();
    tick();
    assert_eq!(bar.position(), 2);
    assert_eq!(bar.length(), Some(3));

    tick();
    bar.finish_and_clear();
    assert_eq!(bar.position(), 3);
    assert!(bar.is_finished());
  }
}
