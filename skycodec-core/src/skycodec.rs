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

use crate::capability::Capabilities;
use crate::config::Config;
use crate::error::Error;
use crate::resolver::codec_registry::CodecRegistry;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::types::SIZE_OF_HEAD;
use std::any::Any;
use std::sync::Arc;

/// A frozen codec registry plus the options of every operation run against
/// it.
///
/// `SkyCodec` is `Send + Sync`; one instance is meant to be built at startup
/// and shared by every thread. Each top-level call creates its own context, so
/// calls never share an identity table.
///
/// # Examples
///
/// ```rust
/// use skycodec_core::capability::Capabilities;
/// use skycodec_core::codec::{codec_ref, I64Codec, ListCodec};
/// use skycodec_core::resolver::codec_registry::CodecRegistry;
/// use skycodec_core::SkyCodec;
///
/// let mut registry = CodecRegistry::new(Capabilities::portable());
/// registry.register_codec(codec_ref(I64Codec)).unwrap();
/// registry.register_codec(codec_ref(ListCodec::<i64>::new())).unwrap();
/// let codec = SkyCodec::new(registry).unwrap().max_depth(8);
///
/// let bytes = codec.serialize(&vec![1i64, -2, 3]).unwrap();
/// let list: Vec<i64> = codec.deserialize(&bytes).unwrap();
/// assert_eq!(list, vec![1, -2, 3]);
/// ```
pub struct SkyCodec {
    registry: CodecRegistry,
    config: Config,
}

impl SkyCodec {
    /// Freezes `registry` and wraps it with the default [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRegistration`] when the registry cannot be
    /// frozen.
    pub fn new(mut registry: CodecRegistry) -> Result<SkyCodec, Error> {
        registry.freeze()?;
        Ok(SkyCodec {
            registry,
            config: Config::default(),
        })
    }

    /// Builds a handle over every codec linked into the binary, choosing
    /// codecs for the running platform.
    pub fn with_linked_codecs() -> Result<SkyCodec, Error> {
        SkyCodec::new(CodecRegistry::with_linked_codecs(Capabilities::detect())?)
    }

    /// Enables or disables identity memoization. When disabled every codec
    /// behaves as `DoNotMemoize`.
    pub fn memoize(mut self, memoize: bool) -> Self {
        self.config.memoize = memoize;
        self
    }

    /// Sets the maximum nesting of codec calls in one operation.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    pub fn get_registry(&self) -> &CodecRegistry {
        &self.registry
    }

    pub fn get_config(&self) -> &Config {
        &self.config
    }

    /// Starts a serialization pass; the stream header is already written.
    ///
    /// Use this to write several root values sharing one identity table.
    pub fn serialization_context(&self) -> SerializationContext<'_> {
        let mut context = SerializationContext::new(&self.registry, &self.config);
        context.writer.reserve(SIZE_OF_HEAD);
        context.write_head();
        context
    }

    /// Starts a deserialization pass over `bf` after checking its header.
    pub fn deserialization_context<'a>(
        &'a self,
        bf: &'a [u8],
    ) -> Result<DeserializationContext<'a>, Error> {
        let mut context = DeserializationContext::new(&self.registry, &self.config, bf);
        context.read_head()?;
        Ok(context)
    }

    /// Serializes `value` with the codec registered for `T`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownType`] when no codec is bound to `T`, or any error
    /// raised by the codecs involved.
    pub fn serialize<T: 'static>(&self, value: &T) -> Result<Vec<u8>, Error> {
        let mut context = self.serialization_context();
        context.serialize(value)?;
        Ok(context.finish())
    }

    /// Serializes a value of any registered type, prefixed with its tag.
    pub fn serialize_dyn(&self, value: &dyn Any) -> Result<Vec<u8>, Error> {
        let mut context = self.serialization_context();
        context.serialize_dyn(value)?;
        Ok(context.finish())
    }

    /// Deserializes one `T` from `bf`, which must hold nothing else.
    pub fn deserialize<T: Clone + Send + Sync + 'static>(&self, bf: &[u8]) -> Result<T, Error> {
        let mut context = self.deserialization_context(bf)?;
        let value = context.deserialize::<T>()?;
        context.finish()?;
        Ok(value)
    }

    pub fn deserialize_shared<T: Send + Sync + 'static>(&self, bf: &[u8]) -> Result<Arc<T>, Error> {
        let mut context = self.deserialization_context(bf)?;
        let value = context.deserialize_shared::<T>()?;
        context.finish()?;
        Ok(value)
    }

    /// Reads a value written by [`SkyCodec::serialize_dyn`].
    pub fn deserialize_dyn(&self, bf: &[u8]) -> Result<Arc<dyn Any + Send + Sync>, Error> {
        let mut context = self.deserialization_context(bf)?;
        let value = context.deserialize_dyn()?;
        context.finish()?;
        Ok(value)
    }
}
