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
use crate::error::Error;
use crate::types::RefFlag;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Identity table of a serialization pass.
///
/// Maps `(address, type)` of every memoized value written so far to its
/// sequence number. Sequence numbers are handed out in encounter order,
/// starting at 0.
///
/// ```rust
/// use skycodec_core::buffer::Writer;
/// use skycodec_core::resolver::memo::MemoWriter;
/// use std::any::TypeId;
///
/// let mut memo = MemoWriter::new();
/// let mut writer = Writer::default();
/// let value = 42u64;
/// let addr = &value as *const u64 as usize;
///
/// // first encounter: the caller must encode the value
/// assert!(!memo.try_write_ref(&mut writer, addr, TypeId::of::<u64>()));
/// // second encounter: a back-reference was written
/// assert!(memo.try_write_ref(&mut writer, addr, TypeId::of::<u64>()));
/// ```
#[derive(Default)]
pub struct MemoWriter {
    ids: HashMap<(usize, TypeId), u32>,
    next_id: u32,
}

impl MemoWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the memoization marker for a value.
    ///
    /// Returns `true` when the value was seen before and a back-reference
    /// (`Ref` + sequence number) was written; the caller must not encode it
    /// again. Returns `false` after writing `RefValue` and recording the value
    /// under the next sequence number; the caller must encode it next.
    pub fn try_write_ref(&mut self, writer: &mut Writer, addr: usize, type_id: TypeId) -> bool {
        if let Some(&ref_id) = self.ids.get(&(addr, type_id)) {
            writer.write_i8(RefFlag::Ref.into());
            writer.write_varuint32(ref_id);
            true
        } else {
            let ref_id = self.next_id;
            self.next_id += 1;
            self.ids.insert((addr, type_id), ref_id);
            writer.write_i8(RefFlag::RefValue.into());
            false
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn reset(&mut self) {
        self.ids.clear();
        self.next_id = 0;
    }
}

/// Reverse identity table of a deserialization pass.
///
/// A slot is reserved when a `RefValue` marker is read, before its payload is
/// decoded, so nested values get the same numbers they got on the write side.
/// The slot is filled once the value is complete.
#[derive(Default)]
pub struct MemoReader {
    slots: Vec<Option<Arc<dyn Any + Send + Sync>>>,
}

impl MemoReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read_ref_flag(&self, reader: &mut Reader) -> Result<RefFlag, Error> {
        let flag = reader.read_i8()?;
        RefFlag::try_from(flag)
            .map_err(|_| Error::framing(format!("invalid memoization marker {flag}")))
    }

    pub fn reserve(&mut self) -> u32 {
        self.slots.push(None);
        (self.slots.len() - 1) as u32
    }

    pub fn fill(&mut self, ref_id: u32, value: Arc<dyn Any + Send + Sync>) {
        self.slots[ref_id as usize] = Some(value);
    }

    pub fn get(&self, ref_id: u32) -> Result<Arc<dyn Any + Send + Sync>, Error> {
        match self.slots.get(ref_id as usize) {
            Some(Some(value)) => Ok(value.clone()),
            Some(None) => Err(Error::framing(format!(
                "back-reference {ref_id} points at a value that is still being decoded"
            ))),
            None => Err(Error::framing(format!(
                "back-reference {ref_id} was never recorded ({} values seen)",
                self.slots.len()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }
}
