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

use super::{codec_ref, ObjectCodec};
use crate::buffer::{Reader, Writer};
use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::resolver::contributor::AutoRegisteredCodec;
use crate::types::MemoizationStrategy;
use paste::paste;

macro_rules! impl_primitive_codec {
    ($name:ident, $ty:ty, $writer:expr, $reader:expr) => {
        paste! {
            #[doc = concat!("Codec for `", stringify!($ty), "`.")]
            #[derive(Clone, Copy, Debug, Default)]
            pub struct [<$name Codec>];

            impl ObjectCodec for [<$name Codec>] {
                type Value = $ty;

                #[inline(always)]
                fn strategy(&self) -> MemoizationStrategy {
                    MemoizationStrategy::DoNotMemoize
                }

                #[inline(always)]
                fn serialize<'a>(
                    &self,
                    context: &mut SerializationContext<'a>,
                    value: &'a $ty,
                ) -> Result<(), Error> {
                    $writer(&mut context.writer, *value);
                    Ok(())
                }

                #[inline(always)]
                fn deserialize(
                    &self,
                    context: &mut DeserializationContext<'_>,
                ) -> Result<$ty, Error> {
                    $reader(&mut context.reader)
                }
            }

            inventory::submit! {
                AutoRegisteredCodec::new(|| codec_ref([<$name Codec>]))
            }
        }
    };
}

fn write_i16(writer: &mut Writer, value: i16) {
    writer.write_varint32(value as i32);
}

fn read_i16(reader: &mut Reader) -> Result<i16, Error> {
    let value = reader.read_varint32()?;
    i16::try_from(value).map_err(|_| Error::invalid_data(format!("{value} overflows i16")))
}

fn write_u16(writer: &mut Writer, value: u16) {
    writer.write_varuint32(value as u32);
}

fn read_u16(reader: &mut Reader) -> Result<u16, Error> {
    let value = reader.read_varuint32()?;
    u16::try_from(value).map_err(|_| Error::invalid_data(format!("{value} overflows u16")))
}

impl_primitive_codec!(Bool, bool, Writer::write_bool, Reader::read_bool);
impl_primitive_codec!(I8, i8, Writer::write_i8, Reader::read_i8);
impl_primitive_codec!(I16, i16, write_i16, read_i16);
impl_primitive_codec!(I32, i32, Writer::write_varint32, Reader::read_varint32);
impl_primitive_codec!(I64, i64, Writer::write_varint64, Reader::read_varint64);
impl_primitive_codec!(U8, u8, Writer::write_u8, Reader::read_u8);
impl_primitive_codec!(U16, u16, write_u16, read_u16);
impl_primitive_codec!(U32, u32, Writer::write_varuint32, Reader::read_varuint32);
impl_primitive_codec!(U64, u64, Writer::write_varuint64, Reader::read_varuint64);
impl_primitive_codec!(F32, f32, Writer::write_f32, Reader::read_f32);
impl_primitive_codec!(F64, f64, Writer::write_f64, Reader::read_f64);
