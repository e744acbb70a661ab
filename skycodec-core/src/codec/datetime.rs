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
use crate::error::Error;
use crate::resolver::context::{DeserializationContext, SerializationContext};
use crate::resolver::contributor::AutoRegisteredCodec;
use crate::types::MemoizationStrategy;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta};

pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    None => {
        panic!("Unreachable code")
    }
    Some(epoch) => epoch,
};

/// `NaiveDate` as a signed day count since 1970-01-01.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveDateCodec;

impl ObjectCodec for NaiveDateCodec {
    type Value = NaiveDate;

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::DoNotMemoize
    }

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a NaiveDate,
    ) -> Result<(), Error> {
        let days = value.signed_duration_since(EPOCH).num_days();
        context.writer.write_varint32(days as i32);
        Ok(())
    }

    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<NaiveDate, Error> {
        let days = context.reader.read_varint32()?;
        EPOCH
            .checked_add_signed(TimeDelta::days(days as i64))
            .ok_or_else(|| Error::invalid_data(format!("date {days} days from epoch out of range")))
    }
}

/// `NaiveDateTime` as signed microseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaiveDateTimeCodec;

impl ObjectCodec for NaiveDateTimeCodec {
    type Value = NaiveDateTime;

    fn strategy(&self) -> MemoizationStrategy {
        MemoizationStrategy::DoNotMemoize
    }

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a NaiveDateTime,
    ) -> Result<(), Error> {
        context
            .writer
            .write_varint64(value.and_utc().timestamp_micros());
        Ok(())
    }

    fn deserialize(
        &self,
        context: &mut DeserializationContext<'_>,
    ) -> Result<NaiveDateTime, Error> {
        let micros = context.reader.read_varint64()?;
        DateTime::from_timestamp_micros(micros)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| Error::invalid_data(format!("timestamp {micros}us out of range")))
    }
}

inventory::submit! {
    AutoRegisteredCodec::new(|| codec_ref(NaiveDateCodec))
}

inventory::submit! {
    AutoRegisteredCodec::new(|| codec_ref(NaiveDateTimeCodec))
}
