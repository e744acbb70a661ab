// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The two `String` codecs and the contributor that picks between them.
//!
//! Both share one wire layout, a varint byte length followed by UTF-8 bytes,
//! so a stream written by either one is read by the other. They differ only in
//! how decoding validates the bytes.

use super::{codec_ref, CodecRef, ObjectCodec};
use crate::capability::{ascii_prefix_len, detect_simd_level, Capabilities, SimdLevel};
use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::resolver::contributor::Contribution;
use crate::types::MemoizationStrategy;

/// Portable string codec using standard UTF-8 validation.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl StringCodec {
    /// The fastest string codec the capabilities allow.
    pub fn best_available(capabilities: &Capabilities) -> CodecRef {
        if capabilities.fast_string_access() {
            if let Some(codec) = SimdStringCodec::new() {
                return codec_ref(codec);
            }
        }
        codec_ref(StringCodec)
    }
}

impl ObjectCodec for StringCodec {
    type Value = String;

    fn auto_register(&self) -> bool {
        false
    }

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::DoNotMemoize
    }

    #[inline]
    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a String,
    ) -> Result<(), Error> {
        context.writer.write_length_delimited(value.as_bytes());
        Ok(())
    }

    #[inline]
    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<String, Error> {
        let bytes = context.reader.read_length_delimited()?;
        let s = std::str::from_utf8(bytes)
            .map_err(|e| Error::invalid_data(format!("invalid utf-8 string: {e}")))?;
        Ok(s.to_owned())
    }
}

/// String codec that skips UTF-8 validation of the leading ASCII run, found
/// with a vector scan.
#[derive(Clone, Copy, Debug)]
pub struct SimdStringCodec {
    level: SimdLevel,
}

impl SimdStringCodec {
    /// Returns `None` when the CPU has no usable vector extension.
    pub fn new() -> Option<SimdStringCodec> {
        detect_simd_level().map(|level| SimdStringCodec { level })
    }

    pub fn level(&self) -> SimdLevel {
        self.level
    }
}

impl ObjectCodec for SimdStringCodec {
    type Value = String;

    fn auto_register(&self) -> bool {
        false
    }

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::DoNotMemoize
    }

    #[inline]
    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a String,
    ) -> Result<(), Error> {
        context.writer.write_length_delimited(value.as_bytes());
        Ok(())
    }

    #[inline]
    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<String, Error> {
        let bytes = context.reader.read_length_delimited()?;
        let ascii = ascii_prefix_len(self.level, bytes);
        std::str::from_utf8(&bytes[ascii..])
            .map_err(|e| Error::invalid_data(format!("invalid utf-8 string: {e}")))?;
        // SAFETY: bytes[..ascii] is ASCII and bytes[ascii..] was just
        // validated; an ASCII run always ends on a char boundary.
        Ok(unsafe { String::from_utf8_unchecked(bytes.to_vec()) })
    }
}

inventory::submit! {
    Contribution::new("strings", |capabilities| {
        vec![StringCodec::best_available(capabilities)]
    })
}
