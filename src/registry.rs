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

//! The capability registry and the reference-encoder selector.

use crate::codecs;
use crate::params::Format;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::io;

/// Codec whose column every table is normalized against when it is selected.
pub const BASELINE_CODEC: &str = "std";

/// Preference order for the encoder that prepares decode-rate inputs.
pub const REFERENCE_PRIORITY: [&str; 2] = ["std", "mz"];

/// Compresses a buffer at a given level.
pub trait Encoder {
  fn encode(&self, input: &[u8], level: i32) -> io::Result<Vec<u8>>;
}

/// Decompresses a complete compressed buffer.
pub trait Decoder {
  fn decode(&self, input: &[u8]) -> io::Result<Vec<u8>>;
}

type Table<T> = BTreeMap<Format, BTreeMap<String, T>>;

/// Answers "does codec C implement an encoder/decoder for format F".
#[derive(Default)]
pub struct CodecRegistry {
  encoders: Table<Box<dyn Encoder>>,
  decoders: Table<Box<dyn Decoder>>,
}

impl CodecRegistry {
  /// Registry holding every codec compiled into this crate.
  pub fn builtin() -> Self {
    let mut registry = Self::default();
    codecs::register_builtin(&mut registry);
    registry
  }

  pub fn register_encoder(
    &mut self,
    format: Format,
    codec: impl Into<String>,
    encoder: impl Encoder + 'static,
  ) {
    self
      .encoders
      .entry(format)
      .or_default()
      .insert(codec.into(), Box::new(encoder));
  }

  pub fn register_decoder(
    &mut self,
    format: Format,
    codec: impl Into<String>,
    decoder: impl Decoder + 'static,
  ) {
    self
      .decoders
      .entry(format)
      .or_default()
      .insert(codec.into(), Box::new(decoder));
  }

  pub fn encoder(&self, format: Format, codec: &str) -> Option<&dyn Encoder> {
    self.encoders.get(&format)?.get(codec).map(|e| e.as_ref())
  }

  pub fn decoder(&self, format: Format, codec: &str) -> Option<&dyn Decoder> {
    self.decoders.get(&format)?.get(codec).map(|d| d.as_ref())
  }

  /// The subset of `codecs` with an encoder for `format`, in the given order.
  pub fn encoders_for(&self, format: Format, codecs: &[String]) -> Vec<String> {
    codecs
      .iter()
      .filter(|c| self.encoder(format, c).is_some())
      .cloned()
      .collect()
  }

  /// The subset of `codecs` with a decoder for `format`, in the given order.
  pub fn decoders_for(&self, format: Format, codecs: &[String]) -> Vec<String> {
    codecs
      .iter()
      .filter(|c| self.decoder(format, c).is_some())
      .cloned()
      .collect()
  }

  /// Every codec name that implements at least one encoder or decoder.
  pub fn codecs(&self) -> BTreeSet<String> {
    let encoders = self.encoders.values().flat_map(|m| m.keys());
    let decoders = self.decoders.values().flat_map(|m| m.keys());
    encoders.chain(decoders).cloned().collect()
  }

  /// Every format with at least one encoder or decoder.
  pub fn formats(&self) -> BTreeSet<Format> {
    let encoders = self.encoders.iter().filter(|(_, m)| !m.is_empty());
    let decoders = self.decoders.iter().filter(|(_, m)| !m.is_empty());
    encoders.map(|(f, _)| *f).chain(decoders.map(|(f, _)| *f)).collect()
  }
}

/// The encoder chosen to produce the shared input of decode-rate benchmarks.
#[derive(Clone, Copy)]
pub struct Reference<'a> {
  pub codec: &'a str,
  pub encoder: &'a dyn Encoder,
}

/// Picks the reference encoder for `format`.
///
/// Codecs in [`REFERENCE_PRIORITY`] win in order. Otherwise any available
/// encoder is used (the first by name). `None` means the format has no
/// encoder at all.
pub fn reference_encoder(registry: &CodecRegistry, format: Format) -> Option<Reference<'_>> {
  let available = registry.encoders.get(&format)?;
  REFERENCE_PRIORITY
    .iter()
    .find_map(|&name| available.get_key_value(name))
    .or_else(|| available.iter().next())
    .map(|(codec, encoder)| Reference {
      codec: codec.as_str(),
      encoder: encoder.as_ref(),
    })
}
