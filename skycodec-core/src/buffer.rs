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
use byteorder::{ByteOrder, LittleEndian};

/// Growable little-endian byte sink.
#[derive(Default)]
pub struct Writer {
    pub(crate) bf: Vec<u8>,
}

impl Writer {
    pub fn with_capacity(capacity: usize) -> Writer {
        Writer {
            bf: Vec::with_capacity(capacity),
        }
    }

    pub fn reset(&mut self) {
        // keep capacity and reset len to 0
        self.bf.clear();
    }

    pub fn dump(&self) -> Vec<u8> {
        self.bf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bf
    }

    pub fn len(&self) -> usize {
        self.bf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bf.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.bf.reserve(additional);
    }

    pub fn write_bytes(&mut self, v: &[u8]) -> usize {
        self.bf.extend_from_slice(v);
        v.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.bf.push(value as u8);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bf.push(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        let mut buf = [0u8; 2];
        LittleEndian::write_u16(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    pub fn write_u32(&mut self, value: u32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    pub fn write_f32(&mut self, value: f32) {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    pub fn write_f64(&mut self, value: f64) {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, value);
        self.bf.extend_from_slice(&buf);
    }

    pub fn write_varuint32(&mut self, value: u32) {
        self.write_varuint64(value as u64)
    }

    pub fn write_varint32(&mut self, value: i32) {
        let zigzag = (value << 1) ^ (value >> 31);
        self.write_varuint32(zigzag as u32)
    }

    pub fn write_varuint64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.bf.push((value as u8 & 0x7F) | 0x80);
            value >>= 7;
        }
        self.bf.push(value as u8);
    }

    pub fn write_varint64(&mut self, value: i64) {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_varuint64(zigzag)
    }

    /// Writes `v` prefixed with its length as an unsigned varint.
    pub fn write_length_delimited(&mut self, v: &[u8]) {
        self.write_varuint64(v.len() as u64);
        self.bf.extend_from_slice(v);
    }
}

/// Bounds-checked cursor over a borrowed byte slice.
pub struct Reader<'a> {
    bf: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bf: &'a [u8]) -> Reader<'a> {
        Reader { bf, cursor: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.bf.len() - self.cursor
    }

    #[inline(always)]
    fn check_bound(&self, n: usize) -> Result<(), Error> {
        // cursor never passes len, so the subtraction cannot wrap
        if n > self.bf.len() - self.cursor {
            return Err(Error::buffer_out_of_bound(self.cursor, n, self.bf.len()));
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.check_bound(len)?;
        let s = &self.bf[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(s)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        self.check_bound(1)?;
        let result = self.bf[self.cursor];
        self.cursor += 1;
        Ok(result)
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_bool(&mut self) -> Result<bool, Error> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(Error::invalid_data(format!("invalid bool byte {other}"))),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(LittleEndian::read_f64(self.read_bytes(8)?))
    }

    pub fn read_varuint32(&mut self) -> Result<u32, Error> {
        let value = self.read_varuint64()?;
        u32::try_from(value)
            .map_err(|_| Error::invalid_data(format!("varint {value} overflows u32")))
    }

    pub fn read_varint32(&mut self) -> Result<i32, Error> {
        let encoded = self.read_varuint32()?;
        Ok(((encoded >> 1) as i32) ^ -((encoded & 1) as i32))
    }

    pub fn read_varuint64(&mut self) -> Result<u64, Error> {
        let mut result = 0u64;
        // at most 10 bytes for a 64-bit value
        for shift in (0..70).step_by(7) {
            let b = self.read_u8()?;
            if shift == 63 && b > 1 {
                return Err(Error::invalid_data("varint overflows u64"));
            }
            result |= ((b & 0x7F) as u64) << shift;
            if b < 0x80 {
                return Ok(result);
            }
        }
        Err(Error::invalid_data("varint longer than 10 bytes"))
    }

    pub fn read_varint64(&mut self) -> Result<i64, Error> {
        let encoded = self.read_varuint64()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    /// Reads a frame written by [`Writer::write_length_delimited`].
    pub fn read_length_delimited(&mut self) -> Result<&'a [u8], Error> {
        let len = self.read_varuint64()?;
        let len = usize::try_from(len)
            .map_err(|_| Error::invalid_data(format!("frame length {len} overflows usize")))?;
        self.read_bytes(len)
    }
}
