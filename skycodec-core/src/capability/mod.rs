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

//! Runtime capability probes.
//!
//! A probe answers one question about the running platform, once. Its answer
//! is folded into [`Capabilities`], which is handed to every contributor while
//! the registry is assembled. Contributors use it to pick between codecs that
//! behave identically but perform differently; nothing consults it after the
//! registry is frozen.

mod simd;

pub use simd::{detect_simd_level, SimdLevel};
pub(crate) use simd::ascii_prefix_len;

pub trait CapabilityProbe: Send + Sync {
    fn name(&self) -> &'static str;

    /// Must return the same answer for the whole life of the process.
    fn is_available(&self) -> bool;
}

/// Reports whether vectorized byte scanning (AVX2/SSE2 on x86_64, NEON on
/// aarch64) can be used to decode strings.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimdStringAccess;

impl CapabilityProbe for SimdStringAccess {
    fn name(&self) -> &'static str {
        "simd-string-access"
    }

    fn is_available(&self) -> bool {
        detect_simd_level().is_some()
    }
}

/// A probe with a preset answer, for forcing the portable path.
#[derive(Clone, Copy, Debug)]
pub struct FixedProbe {
    name: &'static str,
    available: bool,
}

impl FixedProbe {
    pub const fn new(name: &'static str, available: bool) -> FixedProbe {
        FixedProbe { name, available }
    }
}

impl CapabilityProbe for FixedProbe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Probe results resolved once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    fast_string_access: bool,
}

impl Capabilities {
    /// Runs the platform probes.
    pub fn detect() -> Capabilities {
        Capabilities::from_probe(&SimdStringAccess)
    }

    /// Reports every optimized path as unavailable.
    pub const fn portable() -> Capabilities {
        Capabilities {
            fast_string_access: false,
        }
    }

    pub fn from_probe(string_probe: &dyn CapabilityProbe) -> Capabilities {
        let fast_string_access = string_probe.is_available();
        log::debug!(
            "capability probe `{}` reported {}",
            string_probe.name(),
            if fast_string_access {
                "available"
            } else {
                "unavailable"
            }
        );
        Capabilities { fast_string_access }
    }

    #[inline(always)]
    pub fn fast_string_access(&self) -> bool {
        self.fast_string_access
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::detect()
    }
}
