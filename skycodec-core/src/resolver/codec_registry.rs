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

use super::contributor::{linked_contributions, AutoScan, CodecContributor};
use crate::capability::Capabilities;
use crate::codec::CodecRef;
use crate::error::Error;
use crate::types::FIRST_TAG;
use std::any::TypeId;
use std::collections::HashMap;

/// A codec bound in a frozen registry.
#[derive(Clone)]
pub struct CodecDescriptor {
    tag: u32,
    contributor: String,
    codec: CodecRef,
}

impl CodecDescriptor {
    #[inline(always)]
    pub fn get_tag(&self) -> u32 {
        self.tag
    }

    pub fn get_contributor(&self) -> &str {
        &self.contributor
    }

    #[inline(always)]
    pub fn get_codec(&self) -> &CodecRef {
        &self.codec
    }
}

struct PendingCodec {
    contributor: String,
    codec: CodecRef,
}

impl PendingCodec {
    fn describe(&self) -> String {
        format!("{} (from `{}`)", self.codec.name(), self.contributor)
    }
}

struct FrozenTable {
    by_type: HashMap<TypeId, CodecDescriptor>,
    by_tag: Vec<TypeId>,
}

/// Process-wide mapping from a type to its codec.
///
/// Built in two phases: contributors are gathered with [`register`], then
/// [`freeze`] resolves the final mapping and assigns tags. A frozen registry
/// is immutable and is shared by reference; it needs no locking.
///
/// Selection rule, per type: at most one auto-registered codec and at most one
/// explicitly selected codec (`auto_register() == false`). The explicit codec
/// wins over the auto-registered one; two of the same kind is an
/// [`Error::DuplicateRegistration`].
///
/// ```rust
/// use skycodec_core::capability::Capabilities;
/// use skycodec_core::codec::{codec_ref, I64Codec};
/// use skycodec_core::resolver::codec_registry::CodecRegistry;
///
/// let mut registry = CodecRegistry::new(Capabilities::portable());
/// registry.register_codec(codec_ref(I64Codec)).unwrap();
/// registry.freeze().unwrap();
/// assert!(registry.lookup_for::<i64>().is_ok());
/// assert!(registry.lookup_for::<u8>().is_err());
/// ```
///
/// [`register`]: CodecRegistry::register
/// [`freeze`]: CodecRegistry::freeze
pub struct CodecRegistry {
    capabilities: Capabilities,
    contributors: Vec<String>,
    pending: Vec<PendingCodec>,
    frozen: Option<FrozenTable>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        CodecRegistry::new(Capabilities::detect())
    }
}

impl CodecRegistry {
    /// Creates an empty registry. `capabilities` is handed to every
    /// contributor.
    pub fn new(capabilities: Capabilities) -> CodecRegistry {
        CodecRegistry {
            capabilities,
            contributors: Vec::new(),
            pending: Vec::new(),
            frozen: None,
        }
    }

    /// Creates a registry holding everything linked into the binary. See
    /// [`CodecRegistry::register_linked`].
    pub fn with_linked_codecs(capabilities: Capabilities) -> Result<CodecRegistry, Error> {
        let mut registry = CodecRegistry::new(capabilities);
        registry.register_linked()?;
        Ok(registry)
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Appends the contributor's codecs to the build list.
    pub fn register(&mut self, contributor: &dyn CodecContributor) -> Result<(), Error> {
        if self.frozen.is_some() {
            return Err(Error::already_frozen(contributor.name().to_string()));
        }
        let codecs = contributor.codecs(&self.capabilities);
        log::debug!(
            "contributor `{}` supplied {} codecs",
            contributor.name(),
            codecs.len()
        );
        self.contributors.push(contributor.name().to_string());
        self.pending
            .extend(codecs.into_iter().map(|codec| PendingCodec {
                contributor: contributor.name().to_string(),
                codec,
            }));
        Ok(())
    }

    /// Registers one codec outside of any contributor.
    pub fn register_codec(&mut self, codec: CodecRef) -> Result<(), Error> {
        if self.frozen.is_some() {
            return Err(Error::already_frozen(codec.name()));
        }
        self.pending.push(PendingCodec {
            contributor: "explicit".to_string(),
            codec,
        });
        Ok(())
    }

    /// Runs the automatic scan, then every linked
    /// [`Contribution`](super::contributor::Contribution) in name order.
    pub fn register_linked(&mut self) -> Result<(), Error> {
        self.register(&AutoScan)?;
        for contribution in linked_contributions() {
            self.register(contribution)?;
        }
        Ok(())
    }

    /// Resolves the final mapping and assigns tags. Calling it again is a
    /// no-op.
    pub fn freeze(&mut self) -> Result<(), Error> {
        if self.frozen.is_some() {
            return Ok(());
        }
        let mut order: Vec<TypeId> = Vec::new();
        let mut groups: HashMap<TypeId, Vec<&PendingCodec>> = HashMap::new();
        for pending in &self.pending {
            let type_id = pending.codec.value_type_id();
            groups
                .entry(type_id)
                .or_insert_with(|| {
                    order.push(type_id);
                    Vec::new()
                })
                .push(pending);
        }

        let mut selected: Vec<&PendingCodec> = Vec::with_capacity(order.len());
        for type_id in &order {
            let winner = select(groups[type_id].iter().copied())?;
            if let Some(winner) = winner {
                selected.push(winner);
            }
        }
        selected.sort_by_key(|p| p.codec.value_type_name());
        // tags are derived from names, so two types sharing one are ambiguous
        if let Some(pair) = selected
            .windows(2)
            .find(|w| w[0].codec.value_type_name() == w[1].codec.value_type_name())
        {
            return Err(Error::duplicate_registration(
                pair[0].codec.value_type_name(),
                pair[0].describe(),
                pair[1].describe(),
            ));
        }

        let mut by_type = HashMap::with_capacity(selected.len());
        let mut by_tag = Vec::with_capacity(selected.len());
        for (index, pending) in selected.into_iter().enumerate() {
            let type_id = pending.codec.value_type_id();
            by_type.insert(
                type_id,
                CodecDescriptor {
                    tag: FIRST_TAG + index as u32,
                    contributor: pending.contributor.clone(),
                    codec: pending.codec.clone(),
                },
            );
            by_tag.push(type_id);
        }
        log::info!(
            "froze codec registry: {} codecs from {} contributors",
            by_tag.len(),
            self.contributors.len()
        );
        self.pending.clear();
        self.frozen = Some(FrozenTable { by_type, by_tag });
        Ok(())
    }

    #[inline(always)]
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Returns the codec bound to `type_id`.
    ///
    /// Before freeze, the pending codecs are resolved with the same rule
    /// `freeze` uses, so the answer does not change once frozen.
    pub fn lookup(&self, type_id: TypeId) -> Result<&CodecRef, Error> {
        let found = match &self.frozen {
            Some(table) => table.by_type.get(&type_id).map(|d| &d.codec),
            None => select(
                self.pending
                    .iter()
                    .filter(|p| p.codec.value_type_id() == type_id),
            )?
            .map(|p| &p.codec),
        };
        found.ok_or_else(|| Error::unknown_type(format!("no codec registered for {type_id:?}")))
    }

    pub fn lookup_for<T: ?Sized + 'static>(&self) -> Result<&CodecRef, Error> {
        self.lookup(TypeId::of::<T>())
            .map_err(Error::enhance_unknown_type::<T>)
    }

    /// Returns the descriptor of a tag assigned at freeze.
    pub fn lookup_tag(&self, tag: u32) -> Result<&CodecDescriptor, Error> {
        let table = self.frozen_table()?;
        tag.checked_sub(FIRST_TAG)
            .and_then(|index| table.by_tag.get(index as usize))
            .and_then(|type_id| table.by_type.get(type_id))
            .ok_or_else(|| Error::unknown_type(format!("no codec registered for tag {tag}")))
    }

    /// Returns the tag assigned to `type_id` at freeze.
    pub fn tag_of(&self, type_id: TypeId) -> Result<u32, Error> {
        self.descriptor(type_id).map(CodecDescriptor::get_tag)
    }

    pub fn descriptor(&self, type_id: TypeId) -> Result<&CodecDescriptor, Error> {
        self.frozen_table()?
            .by_type
            .get(&type_id)
            .ok_or_else(|| Error::unknown_type(format!("no codec registered for {type_id:?}")))
    }

    /// Number of bound codecs (frozen) or of pending codecs (not yet frozen).
    pub fn len(&self) -> usize {
        match &self.frozen {
            Some(table) => table.by_tag.len(),
            None => self.pending.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptors in tag order. Empty until frozen.
    pub fn iter(&self) -> impl Iterator<Item = &CodecDescriptor> {
        self.frozen.iter().flat_map(|table| {
            table
                .by_tag
                .iter()
                .filter_map(move |type_id| table.by_type.get(type_id))
        })
    }

    fn frozen_table(&self) -> Result<&FrozenTable, Error> {
        self.frozen
            .as_ref()
            .ok_or_else(|| Error::not_allowed("codec registry is not frozen yet"))
    }
}

fn select<'r>(
    candidates: impl Iterator<Item = &'r PendingCodec>,
) -> Result<Option<&'r PendingCodec>, Error> {
    let mut auto: Option<&PendingCodec> = None;
    let mut explicit: Option<&PendingCodec> = None;
    for candidate in candidates {
        let slot = if candidate.codec.is_auto_registered() {
            &mut auto
        } else {
            &mut explicit
        };
        if let Some(first) = slot {
            return Err(Error::duplicate_registration(
                candidate.codec.value_type_name(),
                first.describe(),
                candidate.describe(),
            ));
        }
        *slot = Some(candidate);
    }
    if let (Some(explicit), Some(auto)) = (explicit, auto) {
        log::debug!(
            "{} replaces auto-registered {}",
            explicit.describe(),
            auto.describe()
        );
    }
    Ok(explicit.or(auto))
}
