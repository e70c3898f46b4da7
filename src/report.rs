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

//! Renders a results matrix as a column-aligned text table.
//!
//! Layout: one label column, then a metric and a delta column per codec.
//! Label cells are left-aligned; metric cells are right-aligned behind a
//! 6-space margin and delta cells behind a 2-space margin. Every line starts
//! with a tab.

use crate::suite::Cell;
use std::fmt;

/// Left margin before each metric column.
const METRIC_MARGIN: usize = 6;
/// Left margin before each delta column.
const DELTA_MARGIN: usize = 2;

/// A fully formatted table, header row included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
  cells: Vec<Vec<String>>,
  widths: Vec<usize>,
}

impl Table {
  /// Builds the table for one benchmark.
  ///
  /// `rows` and `names` are parallel, and each row holds one cell per entry
  /// of `codecs`, in the same order. `title` labels the metric columns and
  /// `suffix` is appended to every metric value; deltas always end in `x`.
  pub fn new(rows: &[Vec<Cell>], names: &[String], codecs: &[String], title: &str, suffix: &str) -> Self {
    let columns = 1 + 2 * codecs.len();

    let mut header = Vec::with_capacity(columns);
    header.push("benchmark".to_string());
    for codec in codecs {
      header.push(format!("{codec} {title}"));
      header.push("delta".to_string());
    }

    let mut cells = vec![header];
    for (j, name) in names.iter().enumerate() {
      let mut line = vec![String::new(); columns];
      line[0] = name.clone();
      let row = rows.get(j).map(Vec::as_slice).unwrap_or_default();
      for (i, cell) in row.iter().take(codecs.len()).enumerate() {
        line[1 + 2 * i] = number(cell.value, suffix);
        line[2 + 2 * i] = cell.delta.map(|d| number(d, "x")).unwrap_or_default();
      }
      cells.push(line);
    }

    let mut widths = vec![0; columns];
    for line in &cells {
      for (width, text) in widths.iter_mut().zip(line) {
        *width = (*width).max(text.chars().count());
      }
    }

    Self { cells, widths }
  }

  /// Widest cell of each column, header included.
  pub fn widths(&self) -> &[usize] {
    &self.widths
  }

  /// The raw, unpadded cell text. Row 0 is the header.
  pub fn cells(&self) -> &[Vec<String>] {
    &self.cells
  }

  /// Padded output lines, without trailing newlines.
  pub fn lines(&self) -> Vec<String> {
    self.cells.iter().map(|line| self.pad(line)).collect()
  }

  fn pad(&self, line: &[String]) -> String {
    let mut out = String::from("\t");
    for (i, (text, &width)) in line.iter().zip(&self.widths).enumerate() {
      let fill = width - text.chars().count();
      match i {
        0 => {
          out.push_str(text);
          out.extend(std::iter::repeat_n(' ', fill));
        }
        _ => {
          let margin = if i % 2 == 1 { METRIC_MARGIN } else { DELTA_MARGIN };
          out.extend(std::iter::repeat_n(' ', margin + fill));
          out.push_str(text);
        }
      }
    }
    out
  }
}

impl fmt::Display for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in self.lines() {
      writeln!(f, "{line}")?;
    }
    Ok(())
  }
}

/// Two decimals plus `suffix`, or blank for zero, NaN and infinities.
fn number(value: f64, suffix: &str) -> String {
  if value != 0.0 && value.is_finite() {
    format!("{value:.2}{suffix}")
  } else {
    String::new()
  }
}
