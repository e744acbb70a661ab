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

use super::ObjectCodec;
use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use std::marker::PhantomData;

/// Codec for `Vec<T>`: a varint element count, then every element through
/// the context, so element codecs and memoization apply to each element.
///
/// Not auto-registered; register one per element type.
pub struct ListCodec<T> {
    _element: PhantomData<fn() -> T>,
}

impl<T> ListCodec<T> {
    pub const fn new() -> ListCodec<T> {
        ListCodec {
            _element: PhantomData,
        }
    }
}

impl<T> Default for ListCodec<T> {
    fn default() -> Self {
        ListCodec::new()
    }
}

impl<T: Clone + Send + Sync + 'static> ObjectCodec for ListCodec<T> {
    type Value = Vec<T>;

    fn auto_register(&self) -> bool {
        false
    }

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a Vec<T>,
    ) -> Result<(), Error> {
        let len = u32::try_from(value.len())
            .map_err(|_| Error::invalid_data(format!("list of {} elements", value.len())))?;
        context.writer.write_varuint32(len);
        for item in value {
            context.serialize(item)?;
        }
        Ok(())
    }

    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<Vec<T>, Error> {
        let len = context.reader.read_varuint32()? as usize;
        // every element takes at least one byte
        let mut list = Vec::with_capacity(len.min(context.reader.remaining()));
        for _ in 0..len {
            list.push(context.deserialize::<T>()?);
        }
        Ok(list)
    }
}
