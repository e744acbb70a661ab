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

use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::types::MemoizationStrategy;
use std::any::{Any, TypeId};
use std::sync::Arc;

mod datetime;
pub mod list;
pub mod message;
mod primitive;
pub mod string;

pub use datetime::{NaiveDateCodec, NaiveDateTimeCodec};
pub use list::ListCodec;
pub use message::MessageCodec;
pub use primitive::*;
pub use string::{SimdStringCodec, StringCodec};

/// Encode/decode strategy bound to exactly one type.
///
/// Codecs hold configuration only. All per-call state lives in the context,
/// which is passed in so that nested values go through the same registry and
/// identity table.
pub trait ObjectCodec: Send + Sync + 'static {
    type Value: Send + Sync + 'static;

    /// Whether the automatic scan may install this codec. Codecs returning
    /// `false` are only installed when a contributor hands them over.
    fn auto_register(&self) -> bool {
        true
    }

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::Memoize
    }

    fn encoded_type_name(&self) -> &'static str {
        std::any::type_name::<Self::Value>()
    }

    /// Name used in diagnostics, e.g. duplicate registration errors.
    fn codec_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a Self::Value,
    ) -> Result<(), Error>;

    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<Self::Value, Error>;
}

/// Type-erased view of an [`ObjectCodec`], as stored in the registry.
///
/// Implemented for every `ObjectCodec`; there is no reason to implement it by
/// hand.
pub trait AnyCodec: Send + Sync {
    fn value_type_id(&self) -> TypeId;

    fn value_type_name(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn memoization(&self) -> MemoizationStrategy;

    fn is_auto_registered(&self) -> bool;

    fn write_any<'a>(
        &self,
        value: &'a dyn Any,
        context: &mut SerializationContext<'a>,
    ) -> Result<(), Error>;

    fn read_any(
        &self,
        context: &mut DeserializationContext<'_>,
    ) -> Result<Box<dyn Any + Send + Sync>, Error>;
}

impl<C: ObjectCodec> AnyCodec for C {
    #[inline(always)]
    fn value_type_id(&self) -> TypeId {
        TypeId::of::<C::Value>()
    }

    fn value_type_name(&self) -> &'static str {
        self.encoded_type_name()
    }

    fn name(&self) -> &'static str {
        self.codec_name()
    }

    #[inline(always)]
    fn memoization(&self) -> MemoizationStrategy {
        self.strategy()
    }

    fn is_auto_registered(&self) -> bool {
        self.auto_register()
    }

    fn write_any<'a>(
        &self,
        value: &'a dyn Any,
        context: &mut SerializationContext<'a>,
    ) -> Result<(), Error> {
        let value = value
            .downcast_ref::<C::Value>()
            .ok_or_else(|| Error::type_mismatch(self.encoded_type_name(), "another type"))?;
        self.serialize(context, value)
    }

    fn read_any(
        &self,
        context: &mut DeserializationContext<'_>,
    ) -> Result<Box<dyn Any + Send + Sync>, Error> {
        Ok(Box::new(self.deserialize(context)?))
    }
}

/// Shared handle to a registered codec.
pub type CodecRef = Arc<dyn AnyCodec>;

/// Wraps a codec into a [`CodecRef`].
pub fn codec_ref<C: ObjectCodec>(codec: C) -> CodecRef {
    Arc::new(codec)
}
