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

//! Loading benchmark inputs from disk, or synthesizing the well-known corpora.

use crate::error::BenchmarkError;
use rand::RngCore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const SEED: u64 = 0x5eed_c0de_c5a1_e5ed;

/// Sample files that can be generated when they are not found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corpus {
  Zeros,
  Random,
  Binary,
  Repeats,
  Huffman,
  Digits,
}

impl Corpus {
  pub fn from_name(name: &str) -> Option<Self> {
    match name {
      "zeros.bin" => Some(Corpus::Zeros),
      "random.bin" => Some(Corpus::Random),
      "binary.bin" => Some(Corpus::Binary),
      "repeats.bin" => Some(Corpus::Repeats),
      "huffman.txt" => Some(Corpus::Huffman),
      "digits.txt" => Some(Corpus::Digits),
      _ => None,
    }
  }

  /// Deterministic content of exactly `size` bytes.
  pub fn generate(self, size: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(SEED);
    match self {
      Corpus::Zeros => vec![0; size],
      Corpus::Random => {
        let mut data = vec![0; size];
        rng.fill_bytes(&mut data);
        data
      }
      // Fixed-width little-endian records: a counter, a small tag, padding and one noisy byte.
      Corpus::Binary => {
        let mut data = Vec::with_capacity(size + 16);
        let mut id = 0u32;
        while data.len() < size {
          id = id.wrapping_add(1 + rng.next_u32() % 3);
          data.extend_from_slice(&id.to_le_bytes());
          data.extend_from_slice(&((rng.next_u32() % 16) as u16).to_le_bytes());
          data.extend_from_slice(&[0; 9]);
          data.push(rng.next_u32() as u8);
        }
        data.truncate(size);
        data
      }
      Corpus::Repeats => {
        let mut data = Vec::with_capacity(size);
        while data.len() < size {
          let len = 4 + (rng.next_u32() % 60) as usize;
          if data.len() > len && rng.next_u32() % 4 != 0 {
            let start = rng.next_u32() as usize % (data.len() - len);
            data.extend_from_within(start..start + len);
          } else {
            data.extend((0..len).map(|_| rng.next_u32() as u8));
          }
        }
        data.truncate(size);
        data
      }
      // Geometric symbol frequencies: 'a' half the time, 'b' a quarter, and so on.
      Corpus::Huffman => (0..size)
        .map(|_| b'a' + rng.next_u32().trailing_zeros().min(25) as u8)
        .collect(),
      Corpus::Digits => (0..size).map(|_| b'0' + (rng.next_u32() % 10) as u8).collect(),
    }
  }
}

/// Resolves sample names against the search paths and sizes the content.
///
/// Files read from disk are cached by name for the life of the loader.
#[derive(Debug, Default)]
pub struct SampleLoader {
  paths: Vec<PathBuf>,
  cache: HashMap<String, Vec<u8>>,
}

impl SampleLoader {
  pub fn new(paths: Vec<PathBuf>) -> Self {
    Self {
      paths,
      cache: HashMap::new(),
    }
  }

  /// Returns exactly `size` bytes of the named sample. Disk files shorter
  /// than `size` are repeated; an empty file always yields an empty input.
  pub fn load(&mut self, name: &str, size: usize) -> Result<Vec<u8>, BenchmarkError> {
    if let Some(raw) = self.cache.get(name) {
      return Ok(fit(raw, size));
    }

    let Some(path) = self.locate(name) else {
      return match Corpus::from_name(name) {
        Some(corpus) => {
          tracing::debug!(name, "Synthesizing sample");
          Ok(corpus.generate(size))
        }
        None => Err(BenchmarkError::SampleNotFound {
          name: name.to_string(),
          searched: self.paths.clone(),
        }),
      };
    };

    tracing::debug!(name, path = %path.display(), "Reading sample");
    let raw = fs::read(&path).map_err(|source| BenchmarkError::ReadSample { path, source })?;
    let data = fit(&raw, size);
    self.cache.insert(name.to_string(), raw);
    Ok(data)
  }

  fn locate(&self, name: &str) -> Option<PathBuf> {
    self
      .paths
      .iter()
      .map(|dir| dir.join(name))
      .chain(std::iter::once(PathBuf::from(name)))
      .find(|candidate| candidate.is_file())
  }
}

fn fit(raw: &[u8], size: usize) -> Vec<u8> {
  raw.iter().copied().cycle().take(size).collect()
}
