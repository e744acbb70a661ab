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

use std::sync::OnceLock;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

#[cfg(target_arch = "x86_64")]
const AVX2_LANES: usize = 32;

#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const SIMD_LANES: usize = 16;

/// Instruction set used by the vectorized ASCII scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimdLevel {
    Avx2,
    Sse2,
    Neon,
}

/// Best vector instruction set of this CPU, probed on first call and cached
/// for the rest of the process.
pub fn detect_simd_level() -> Option<SimdLevel> {
    static LEVEL: OnceLock<Option<SimdLevel>> = OnceLock::new();
    *LEVEL.get_or_init(|| {
        let level = probe_simd_level();
        log::info!("simd string access: {:?}", level);
        level
    })
}

#[allow(unreachable_code)]
fn probe_simd_level() -> Option<SimdLevel> {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            return Some(SimdLevel::Avx2);
        }
        if std::arch::is_x86_feature_detected!("sse2") {
            return Some(SimdLevel::Sse2);
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") {
            return Some(SimdLevel::Neon);
        }
    }
    None
}

/// Length of the leading run of ASCII bytes in `bytes`.
///
/// `level` must come from [`detect_simd_level`] on this process.
pub(crate) fn ascii_prefix_len(level: SimdLevel, bytes: &[u8]) -> usize {
    let vectorized = match level {
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Avx2 => unsafe { ascii_prefix_avx2(bytes) },
        #[cfg(target_arch = "x86_64")]
        SimdLevel::Sse2 => unsafe { ascii_prefix_sse2(bytes) },
        #[cfg(target_arch = "aarch64")]
        SimdLevel::Neon => unsafe { ascii_prefix_neon(bytes) },
        #[allow(unreachable_patterns)]
        _ => 0,
    };
    vectorized
        + bytes[vectorized..]
            .iter()
            .take_while(|b| b.is_ascii())
            .count()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn ascii_prefix_avx2(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i + AVX2_LANES <= bytes.len() {
        let chunk = _mm256_loadu_si256(bytes.as_ptr().add(i) as *const __m256i);
        // movemask collects the high bit of every lane
        if _mm256_movemask_epi8(chunk) != 0 {
            break;
        }
        i += AVX2_LANES;
    }
    i
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "sse2")]
unsafe fn ascii_prefix_sse2(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i + SIMD_LANES <= bytes.len() {
        let chunk = _mm_loadu_si128(bytes.as_ptr().add(i) as *const __m128i);
        if _mm_movemask_epi8(chunk) != 0 {
            break;
        }
        i += SIMD_LANES;
    }
    i
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn ascii_prefix_neon(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i + SIMD_LANES <= bytes.len() {
        let v = vld1q_u8(bytes.as_ptr().add(i));
        if vmaxvq_u8(v) >= 0x80 {
            break;
        }
        i += SIMD_LANES;
    }
    i
}
