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

//! # SkyCodec
//!
//! Extensible binary serialization for long-lived in-memory object graphs:
//! build events, protocol messages, interned strings.
//!
//! Codecs are gathered into a [`CodecRegistry`] from independent
//! contributors, frozen once at startup, and then shared by every thread.
//! Each operation runs in its own context, which keeps an identity table so
//! an object referenced many times is written once and read back as one
//! shared `Arc`.
//!
//! ## Adding codecs
//!
//! A codec implements [`ObjectCodec`] for exactly one type. Crates plug
//! codecs in without touching a central list:
//!
//! ```rust
//! use skycodec::{
//!     codec_ref, AutoRegisteredCodec, DeserializationContext, Error, ObjectCodec,
//!     SerializationContext,
//! };
//!
//! #[derive(Clone, Debug, PartialEq)]
//! pub struct Digest([u8; 4]);
//!
//! pub struct DigestCodec;
//!
//! impl ObjectCodec for DigestCodec {
//!     type Value = Digest;
//!
//!     fn serialize<'a>(
//!         &self,
//!         context: &mut SerializationContext<'a>,
//!         value: &'a Digest,
//!     ) -> Result<(), Error> {
//!         context.writer.write_bytes(&value.0);
//!         Ok(())
//!     }
//!
//!     fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<Digest, Error> {
//!         let bytes = context.reader.read_bytes(4)?;
//!         Ok(Digest([bytes[0], bytes[1], bytes[2], bytes[3]]))
//!     }
//! }
//!
//! skycodec::inventory::submit! {
//!     AutoRegisteredCodec::new(|| codec_ref(DigestCodec))
//! }
//! ```
//!
//! Codecs that must not be picked up by the automatic scan return `false`
//! from [`ObjectCodec::auto_register`] and are installed by a named
//! [`Contribution`] instead. This is also how capability-dependent codecs
//! are chosen: a contribution receives the probed [`Capabilities`] and
//! returns the best codec for them.
//!
//! ## Serializing
//!
//! ```rust
//! use skycodec::SkyCodec;
//!
//! let codec = SkyCodec::with_linked_codecs().unwrap();
//! let bytes = codec.serialize(&"//pkg:target".to_string()).unwrap();
//! let label: String = codec.deserialize(&bytes).unwrap();
//! assert_eq!(label, "//pkg:target");
//! ```

pub use skycodec_core::{
    buffer::{Reader, Writer},
    capability::{Capabilities, CapabilityProbe, FixedProbe, SimdStringAccess},
    codec::{
        codec_ref, AnyCodec, CodecRef, ListCodec, MessageCodec, ObjectCodec, SimdStringCodec,
        StringCodec,
    },
    config::Config,
    error::Error,
    resolver::codec_registry::{CodecDescriptor, CodecRegistry},
    resolver::context::{DeserializationContext, SerializationContext},
    resolver::contributor::{AutoRegisteredCodec, CodecContributor, Contribution},
    types::MemoizationStrategy,
    SkyCodec,
};

pub use inventory;
