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

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Marker byte written before every value whose codec memoizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(i8)]
pub enum RefFlag {
    // Ref is followed by the sequence number of an earlier value.
    Ref = -2,
    // RefValue is followed by the full encoding; the value takes the next
    // sequence number.
    RefValue = 0,
}

/// Whether a codec's values are identity-tracked within one operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemoizationStrategy {
    /// Repeated references to one object are written once, then as
    /// back-references.
    Memoize,
    /// Every occurrence is encoded in full and the identity table is never
    /// consulted.
    DoNotMemoize,
}

pub mod config_flags {
    pub const IS_MEMOIZING_FLAG: u8 = 1 << 0;
    pub const IS_LITTLE_ENDIAN_FLAG: u8 = 1 << 1;
}

pub const MAGIC_NUMBER: u16 = 0x5c0d;

pub const SIZE_OF_HEAD: usize = 3;

/// Tags start at 1; 0 never names a codec.
pub const FIRST_TAG: u32 = 1;
