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

//! Extension points of the codec registry.
//!
//! Any crate linked into the binary can add codecs without touching a central
//! list, through two link-time manifests collected with `inventory`:
//!
//! - [`AutoRegisteredCodec`]: one codec, picked up by the automatic scan if it
//!   reports `auto_register() == true`.
//! - [`Contribution`]: a named contributor returning an ordered list of
//!   codecs. Its codecs are always installed, which is how a codec with
//!   `auto_register() == false` gets selected.
//!
//! ```rust,ignore
//! inventory::submit! {
//!     Contribution::new("build-event-stream", |_caps| {
//!         vec![codec_ref(MessageCodec::new(BuildEvent::default))]
//!     })
//! }
//! ```

use crate::capability::Capabilities;
use crate::codec::CodecRef;

/// A unit that supplies codecs to the registry at assembly time.
pub trait CodecContributor {
    fn name(&self) -> &str;

    /// Codecs to add, in order. Called once, while the registry is built.
    fn codecs(&self, capabilities: &Capabilities) -> Vec<CodecRef>;
}

pub type CodecsFn = fn(&Capabilities) -> Vec<CodecRef>;

/// Value-like contributor descriptor. Nothing runs until the registry calls
/// [`CodecContributor::codecs`].
#[derive(Clone, Copy)]
pub struct Contribution {
    name: &'static str,
    codecs: CodecsFn,
}

impl Contribution {
    pub const fn new(name: &'static str, codecs: CodecsFn) -> Contribution {
        Contribution { name, codecs }
    }
}

impl CodecContributor for Contribution {
    fn name(&self) -> &str {
        self.name
    }

    fn codecs(&self, capabilities: &Capabilities) -> Vec<CodecRef> {
        (self.codecs)(capabilities)
    }
}

/// Manifest entry for the automatic scan.
pub struct AutoRegisteredCodec {
    factory: fn() -> CodecRef,
}

impl AutoRegisteredCodec {
    pub const fn new(factory: fn() -> CodecRef) -> AutoRegisteredCodec {
        AutoRegisteredCodec { factory }
    }

    pub fn codec(&self) -> CodecRef {
        (self.factory)()
    }
}

inventory::collect!(Contribution);
inventory::collect!(AutoRegisteredCodec);

/// Contributions linked into this binary, ordered by name.
pub fn linked_contributions() -> Vec<&'static Contribution> {
    let mut contributions: Vec<_> = inventory::iter::<Contribution>.into_iter().collect();
    contributions.sort_by_key(|c| c.name);
    contributions
}

/// Codecs of the automatic scan: every linked [`AutoRegisteredCodec`] whose
/// codec agrees to be auto-registered.
pub fn scanned_codecs() -> Vec<CodecRef> {
    let mut codecs = Vec::new();
    for entry in inventory::iter::<AutoRegisteredCodec> {
        let codec = entry.codec();
        if codec.is_auto_registered() {
            codecs.push(codec);
        } else {
            log::debug!(
                "automatic scan skipped {} for `{}`: not auto-registered",
                codec.name(),
                codec.value_type_name()
            );
        }
    }
    codecs.sort_by_key(|c| (c.value_type_name(), c.name()));
    codecs
}

/// The automatic scan seen as one contributor.
pub(crate) struct AutoScan;

impl CodecContributor for AutoScan {
    fn name(&self) -> &str {
        "auto-scan"
    }

    fn codecs(&self, _capabilities: &Capabilities) -> Vec<CodecRef> {
        scanned_codecs()
    }
}
