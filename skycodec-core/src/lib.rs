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

//! # SkyCodec Core
//!
//! Registry-driven binary serialization with identity memoization.
//!
//! ## Architecture
//!
//! - **`codec`**: the [`ObjectCodec`](codec::ObjectCodec) trait and the
//!   built-in codecs (primitives, strings, dates, lists, `prost` messages)
//! - **`resolver`**: the codec registry, its contributors and the
//!   serialization contexts with their identity tables
//! - **`capability`**: runtime probes that choose between equivalent codecs
//! - **`buffer`**: the `Writer`/`Reader` byte sink and source
//! - **`skycodec`**: the top-level handle tying a frozen registry to a
//!   [`Config`](config::Config)
//! - **`error`**: the shared [`Error`](error::Error) type
//!
//! ## Registry lifecycle
//!
//! A [`CodecRegistry`](resolver::codec_registry::CodecRegistry) gathers codecs
//! from contributors, then is frozen once. Crates add codecs without a central
//! list by submitting an
//! [`AutoRegisteredCodec`](resolver::contributor::AutoRegisteredCodec) or a
//! [`Contribution`](resolver::contributor::Contribution) with `inventory`.
//!
//! ## Memoization
//!
//! Within one operation, values whose codec uses
//! [`MemoizationStrategy::Memoize`](types::MemoizationStrategy) are written
//! once; later occurrences of the same object become back-references, and
//! deserialization hands out the same `Arc` for each of them.
//!
//! ```rust
//! use skycodec_core::capability::Capabilities;
//! use skycodec_core::codec::{codec_ref, ListCodec, StringCodec};
//! use skycodec_core::resolver::codec_registry::CodecRegistry;
//! use skycodec_core::SkyCodec;
//! use std::sync::Arc;
//!
//! let mut registry = CodecRegistry::new(Capabilities::portable());
//! registry.register_codec(codec_ref(StringCodec)).unwrap();
//! registry.register_codec(codec_ref(ListCodec::<String>::new())).unwrap();
//! let codec = SkyCodec::new(registry).unwrap();
//!
//! let labels = vec!["//a".to_string(), "//b".to_string()];
//! let mut context = codec.serialization_context();
//! context.serialize(&labels).unwrap();
//! context.serialize(&labels).unwrap();
//! let bytes = context.finish();
//!
//! let mut context = codec.deserialization_context(&bytes).unwrap();
//! let first = context.deserialize_shared::<Vec<String>>().unwrap();
//! let second = context.deserialize_shared::<Vec<String>>().unwrap();
//! assert!(Arc::ptr_eq(&first, &second));
//! context.finish().unwrap();
//! ```

pub mod buffer;
pub mod capability;
pub mod codec;
pub mod config;
pub mod error;
pub mod resolver;
pub mod skycodec;
pub mod types;

pub use skycodec::SkyCodec;
