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

//! Codecs compiled into the binary.
//!
//! `std` is the general-purpose crate for each format; `mz` drives the
//! low-level miniz_oxide API directly and only speaks raw DEFLATE. `lzrs`
//! is a decode-only xz reader (lzma-rs writes literal-only streams, so its
//! encoder is not worth measuring).

use crate::params::Format;
use crate::registry::CodecRegistry;
use crate::registry::Decoder;
use crate::registry::Encoder;
use brotli::enc::BrotliEncoderParams;
use std::io;
use std::io::Read;
use std::io::Write;

pub(crate) fn register_builtin(registry: &mut CodecRegistry) {
  registry.register_encoder(Format::Flate, "std", Flate2);
  registry.register_decoder(Format::Flate, "std", Flate2);
  registry.register_encoder(Format::Flate, "mz", MinizOxide);
  registry.register_decoder(Format::Flate, "mz", MinizOxide);
  registry.register_encoder(Format::Bzip2, "std", Bzip2);
  registry.register_decoder(Format::Bzip2, "std", Bzip2);
  registry.register_encoder(Format::Xz, "std", Xz2);
  registry.register_decoder(Format::Xz, "std", Xz2);
  registry.register_decoder(Format::Xz, "lzrs", LzmaRs);
  registry.register_encoder(Format::Brotli, "std", Brotli);
  registry.register_decoder(Format::Brotli, "std", Brotli);
}

/// Raw DEFLATE through flate2's streaming wrappers.
struct Flate2;

impl Encoder for Flate2 {
  fn encode(&self, input: &[u8], level: i32) -> io::Result<Vec<u8>> {
    let level = flate2::Compression::new(level.clamp(0, 9) as u32);
    let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), level);
    encoder.write_all(input)?;
    encoder.finish()
  }
}

impl Decoder for Flate2 {
  fn decode(&self, input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    flate2::read::DeflateDecoder::new(input).read_to_end(&mut output)?;
    Ok(output)
  }
}

/// Raw DEFLATE through miniz_oxide's one-shot buffers.
struct MinizOxide;

impl Encoder for MinizOxide {
  fn encode(&self, input: &[u8], level: i32) -> io::Result<Vec<u8>> {
    Ok(miniz_oxide::deflate::compress_to_vec(input, level.clamp(0, 10) as u8))
  }
}

impl Decoder for MinizOxide {
  fn decode(&self, input: &[u8]) -> io::Result<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec(input)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")))
  }
}

struct Bzip2;

impl Encoder for Bzip2 {
  fn encode(&self, input: &[u8], level: i32) -> io::Result<Vec<u8>> {
    let level = bzip2::Compression::new(level.clamp(1, 9) as u32);
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), level);
    encoder.write_all(input)?;
    encoder.finish()
  }
}

impl Decoder for Bzip2 {
  fn decode(&self, input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    bzip2::read::BzDecoder::new(input).read_to_end(&mut output)?;
    Ok(output)
  }
}

/// xz via liblzma; `level` maps onto the 0-9 presets.
struct Xz2;

impl Encoder for Xz2 {
  fn encode(&self, input: &[u8], level: i32) -> io::Result<Vec<u8>> {
    let mut encoder = xz2::write::XzEncoder::new(Vec::new(), level.clamp(0, 9) as u32);
    encoder.write_all(input)?;
    encoder.finish()
  }
}

impl Decoder for Xz2 {
  fn decode(&self, input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    xz2::read::XzDecoder::new(input).read_to_end(&mut output)?;
    Ok(output)
  }
}

/// Pure-Rust xz reader.
struct LzmaRs;

impl Decoder for LzmaRs {
  fn decode(&self, mut input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    lzma_rs::xz_decompress(&mut input, &mut output)
      .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    Ok(output)
  }
}

struct Brotli;

impl Encoder for Brotli {
  fn encode(&self, mut input: &[u8], level: i32) -> io::Result<Vec<u8>> {
    let mut params = BrotliEncoderParams::default();
    params.quality = level.clamp(0, 11);
    let mut output = Vec::new();
    brotli::BrotliCompress(&mut input, &mut output, &params)?;
    Ok(output)
  }
}

impl Decoder for Brotli {
  fn decode(&self, mut input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::new();
    brotli::BrotliDecompress(&mut input, &mut output)?;
    Ok(output)
  }
}
