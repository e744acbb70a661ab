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

//! Adapter exposing a `prost` message type as a codec.

use super::ObjectCodec;
use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::types::MemoizationStrategy;
use prost::Message;

/// Codec for a self-describing wire message.
///
/// The message encodes itself; the adapter only adds length-delimited
/// framing. Decoding merges the frame into a fresh builder obtained from the
/// factory. Messages are never memoized.
///
/// ```rust,ignore
/// let codec = MessageCodec::new(BuildEvent::default);
/// ```
pub struct MessageCodec<M> {
    builder: fn() -> M,
}

impl<M> MessageCodec<M> {
    pub const fn new(builder: fn() -> M) -> MessageCodec<M> {
        MessageCodec { builder }
    }
}

impl<M> Clone for MessageCodec<M> {
    fn clone(&self) -> Self {
        MessageCodec {
            builder: self.builder,
        }
    }
}

impl<M: Message + 'static> ObjectCodec for MessageCodec<M> {
    type Value = M;

    fn auto_register(&self) -> bool {
        false
    }

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::DoNotMemoize
    }

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a M,
    ) -> Result<(), Error> {
        context
            .writer
            .write_length_delimited(&value.encode_to_vec());
        Ok(())
    }

    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<M, Error> {
        let frame = context.reader.read_length_delimited()?;
        let mut message = (self.builder)();
        message.merge(frame).map_err(|e| {
            Error::invalid_data(format!(
                "failed to decode `{}`: {e}",
                std::any::type_name::<M>()
            ))
        })?;
        Ok(message)
    }
}
