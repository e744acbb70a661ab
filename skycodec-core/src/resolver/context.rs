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

use crate::buffer::{Reader, Writer};
use crate::codec::CodecRef;
use crate::config::Config;
use crate::ensure;
use crate::error::Error;
use crate::resolver::codec_registry::CodecRegistry;
use crate::resolver::memo::{MemoReader, MemoWriter};
use crate::types::{config_flags, MemoizationStrategy, RefFlag, MAGIC_NUMBER};
use std::any::Any;
use std::sync::Arc;

#[inline(always)]
fn memoizes(enabled: bool, codec: &CodecRef) -> bool {
    enabled && codec.memoization() == MemoizationStrategy::Memoize
}

/// State of one serialization pass.
///
/// Every value handed to the context is borrowed for `'a`, the life of the
/// context, so the address it is keyed by stays unique for the whole pass.
pub struct SerializationContext<'a> {
    registry: &'a CodecRegistry,
    pub writer: Writer,
    memo: MemoWriter,
    memoize: bool,
    max_depth: u32,
    current_depth: u32,
}

impl<'a> SerializationContext<'a> {
    pub fn new(registry: &'a CodecRegistry, config: &Config) -> SerializationContext<'a> {
        SerializationContext {
            registry,
            writer: Writer::default(),
            memo: MemoWriter::new(),
            memoize: config.is_memoizing(),
            max_depth: config.max_depth(),
            current_depth: 0,
        }
    }

    pub fn get_registry(&self) -> &'a CodecRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn is_memoizing(&self) -> bool {
        self.memoize
    }

    /// Number of distinct values recorded in the identity table.
    pub fn memoized_count(&self) -> usize {
        self.memo.len()
    }

    /// Writes the stream header: magic number, then a flags byte.
    pub fn write_head(&mut self) {
        let mut bitmap = config_flags::IS_LITTLE_ENDIAN_FLAG;
        if self.memoize {
            bitmap |= config_flags::IS_MEMOIZING_FLAG;
        }
        self.writer.write_u16(MAGIC_NUMBER);
        self.writer.write_u8(bitmap);
    }

    /// Serializes `value` with the codec registered for `T`.
    pub fn serialize<T: 'static>(&mut self, value: &'a T) -> Result<(), Error> {
        let registry = self.registry;
        let codec = registry.lookup_for::<T>()?;
        self.write_value(codec, value)
    }

    /// Serializes the value behind an `Arc`. Handles pointing at one
    /// allocation share identity.
    pub fn serialize_shared<T: Send + Sync + 'static>(
        &mut self,
        value: &'a Arc<T>,
    ) -> Result<(), Error> {
        self.serialize::<T>(value.as_ref())
    }

    /// Writes the registry tag of the value's runtime type, then the value.
    pub fn serialize_dyn(&mut self, value: &'a dyn Any) -> Result<(), Error> {
        let registry = self.registry;
        let descriptor = registry.descriptor(Any::type_id(value))?;
        self.writer.write_varuint32(descriptor.get_tag());
        self.write_value(descriptor.get_codec(), value)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_bytes()
    }

    fn write_value(&mut self, codec: &CodecRef, value: &'a dyn Any) -> Result<(), Error> {
        if memoizes(self.memoize, codec) {
            let addr = value as *const dyn Any as *const () as usize;
            if self
                .memo
                .try_write_ref(&mut self.writer, addr, Any::type_id(value))
            {
                return Ok(());
            }
        }
        self.inc_depth()?;
        let result = codec.write_any(value, self);
        self.dec_depth();
        result
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "maximum nesting depth ({}) exceeded while serializing",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

enum ReadValue {
    Owned(Box<dyn Any + Send + Sync>),
    Shared(Arc<dyn Any + Send + Sync>),
}

/// State of one deserialization pass, the mirror of
/// [`SerializationContext`].
pub struct DeserializationContext<'a> {
    registry: &'a CodecRegistry,
    pub reader: Reader<'a>,
    memo: MemoReader,
    memoize: bool,
    max_depth: u32,
    current_depth: u32,
}

impl<'a> DeserializationContext<'a> {
    pub fn new(
        registry: &'a CodecRegistry,
        config: &Config,
        bf: &'a [u8],
    ) -> DeserializationContext<'a> {
        DeserializationContext {
            registry,
            reader: Reader::new(bf),
            memo: MemoReader::new(),
            memoize: config.is_memoizing(),
            max_depth: config.max_depth(),
            current_depth: 0,
        }
    }

    pub fn get_registry(&self) -> &'a CodecRegistry {
        self.registry
    }

    #[inline(always)]
    pub fn is_memoizing(&self) -> bool {
        self.memoize
    }

    /// Reads the stream header and adopts the writer's memoization setting.
    pub fn read_head(&mut self) -> Result<(), Error> {
        let magic = self.reader.read_u16()?;
        ensure!(
            magic == MAGIC_NUMBER,
            Error::invalid_data(format!(
                "invalid magic number {magic:#06x}, expected {MAGIC_NUMBER:#06x}"
            ))
        );
        let bitmap = self.reader.read_u8()?;
        ensure!(
            bitmap & config_flags::IS_LITTLE_ENDIAN_FLAG != 0,
            "big-endian streams are not supported"
        );
        self.memoize = bitmap & config_flags::IS_MEMOIZING_FLAG != 0;
        Ok(())
    }

    /// Deserializes a `T`. A back-reference yields a clone of the value
    /// decoded earlier in this pass.
    pub fn deserialize<T: Clone + Send + Sync + 'static>(&mut self) -> Result<T, Error> {
        let registry = self.registry;
        let codec = registry.lookup_for::<T>()?;
        match self.read_value(codec)? {
            ReadValue::Owned(boxed) => boxed
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| Error::type_mismatch(std::any::type_name::<T>(), codec.value_type_name())),
            ReadValue::Shared(shared) => shared
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| back_reference_mismatch::<T>()),
        }
    }

    /// Deserializes a `T` into an `Arc`. Back-references to one value yield
    /// pointer-equal handles.
    pub fn deserialize_shared<T: Send + Sync + 'static>(&mut self) -> Result<Arc<T>, Error> {
        let registry = self.registry;
        let codec = registry.lookup_for::<T>()?;
        match self.read_value(codec)? {
            ReadValue::Owned(boxed) => boxed
                .downcast::<T>()
                .map(|value| Arc::new(*value))
                .map_err(|_| Error::type_mismatch(std::any::type_name::<T>(), codec.value_type_name())),
            ReadValue::Shared(shared) => shared
                .downcast::<T>()
                .map_err(|_| back_reference_mismatch::<T>()),
        }
    }

    /// Reads a registry tag, then a value of the type it names.
    pub fn deserialize_dyn(&mut self) -> Result<Arc<dyn Any + Send + Sync>, Error> {
        let registry = self.registry;
        let tag = self.reader.read_varuint32()?;
        let codec = registry.lookup_tag(tag)?.get_codec();
        match self.read_value(codec)? {
            ReadValue::Owned(boxed) => Ok(Arc::from(boxed)),
            ReadValue::Shared(shared) => Ok(shared),
        }
    }

    /// Ends the pass. Unread bytes mean the stream and the codecs disagree.
    pub fn finish(self) -> Result<(), Error> {
        let remaining = self.reader.remaining();
        if remaining > 0 {
            return Err(Error::framing(format!(
                "{remaining} trailing bytes after the root value"
            )));
        }
        Ok(())
    }

    fn read_value(&mut self, codec: &CodecRef) -> Result<ReadValue, Error> {
        if !memoizes(self.memoize, codec) {
            return self.decode(codec).map(ReadValue::Owned);
        }
        match self.memo.read_ref_flag(&mut self.reader)? {
            RefFlag::Ref => {
                let ref_id = self.reader.read_varuint32()?;
                self.memo.get(ref_id).map(ReadValue::Shared)
            }
            RefFlag::RefValue => {
                let ref_id = self.memo.reserve();
                let value: Arc<dyn Any + Send + Sync> = Arc::from(self.decode(codec)?);
                self.memo.fill(ref_id, value.clone());
                Ok(ReadValue::Shared(value))
            }
        }
    }

    fn decode(&mut self, codec: &CodecRef) -> Result<Box<dyn Any + Send + Sync>, Error> {
        self.inc_depth()?;
        let result = codec.read_any(self);
        self.dec_depth();
        result
    }

    pub fn inc_depth(&mut self) -> Result<(), Error> {
        self.current_depth += 1;
        if self.current_depth > self.max_depth {
            return Err(Error::depth_exceed(format!(
                "maximum nesting depth ({}) exceeded while deserializing",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn dec_depth(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }
}

#[cold]
fn back_reference_mismatch<T>() -> Error {
    Error::framing(format!(
        "back-reference does not resolve to a `{}`",
        std::any::type_name::<T>()
    ))
}
