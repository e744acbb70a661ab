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

use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;
use skycodec::{
    codec_ref, Capabilities, CodecRegistry, Contribution, Error, FixedProbe, SimdStringAccess,
    SimdStringCodec, SkyCodec, StringCodec,
};
use skycodec_core::capability::{detect_simd_level, CapabilityProbe};

fn with_codec(codec: skycodec::CodecRef) -> SkyCodec {
    let mut registry = CodecRegistry::new(Capabilities::portable());
    registry.register_codec(codec).unwrap();
    SkyCodec::new(registry).unwrap()
}

fn samples() -> Vec<String> {
    let mut rng = rand::thread_rng();
    let mut samples = vec![
        String::new(),
        "a".to_string(),
        "hello".to_string(),
        "héllo wörld".to_string(),
        "日本語のテキスト".to_string(),
        "emoji 🦀 in the middle of a fairly long ascii sentence".to_string(),
        "x".repeat(1000) + "é",
    ];
    for len in [15, 16, 17, 31, 32, 33, 100, 4096] {
        samples.push(Alphanumeric.sample_string(&mut rng, len));
    }
    for _ in 0..16 {
        let len = rng.gen_range(0..200);
        let s: String = (0..len).map(|_| rng.gen::<char>()).collect();
        samples.push(s);
    }
    samples
}

#[test]
fn test_portable_round_trip() {
    let codec = with_codec(codec_ref(StringCodec));
    for s in samples() {
        let bytes = codec.serialize(&s).unwrap();
        assert_eq!(codec.deserialize::<String>(&bytes).unwrap(), s);
    }
}

#[test]
fn test_simd_round_trip_matches_portable() {
    let Some(simd) = SimdStringCodec::new() else {
        return;
    };
    let fast = with_codec(codec_ref(simd));
    let portable = with_codec(codec_ref(StringCodec));
    for s in samples() {
        let fast_bytes = fast.serialize(&s).unwrap();
        let portable_bytes = portable.serialize(&s).unwrap();
        assert_eq!(fast_bytes, portable_bytes);
        assert_eq!(fast.deserialize::<String>(&portable_bytes).unwrap(), s);
        assert_eq!(portable.deserialize::<String>(&fast_bytes).unwrap(), s);
    }
}

#[test]
fn test_invalid_utf8_rejected_by_both_codecs() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let mut codecs = vec![with_codec(codec_ref(StringCodec))];
    if let Some(simd) = SimdStringCodec::new() {
        codecs.push(with_codec(codec_ref(simd)));
    }
    for codec in codecs {
        let valid = codec.serialize(&"a".repeat(40)).unwrap();
        for bad in [0xFFu8, 0xC3] {
            let mut bytes = valid.clone();
            let last = bytes.len() - 1;
            bytes[last] = bad;
            assert!(matches!(
                codec.deserialize::<String>(&bytes),
                Err(Error::InvalidData(_))
            ));
        }
    }
}

#[test]
fn test_portable_capabilities_install_portable_codec() {
    let registry = CodecRegistry::with_linked_codecs(Capabilities::portable()).unwrap();
    let codec = SkyCodec::new(registry).unwrap();
    let string_codec = codec.get_registry().lookup_for::<String>().unwrap();
    assert_eq!(string_codec.name(), std::any::type_name::<StringCodec>());
    for s in samples() {
        let bytes = codec.serialize(&s).unwrap();
        assert_eq!(codec.deserialize::<String>(&bytes).unwrap(), s);
    }
}

#[test]
fn test_detected_capabilities_follow_probe() {
    let registry = CodecRegistry::with_linked_codecs(Capabilities::detect()).unwrap();
    let codec = SkyCodec::new(registry).unwrap();
    let name = codec.get_registry().lookup_for::<String>().unwrap().name();
    if SimdStringAccess.is_available() {
        assert_eq!(name, std::any::type_name::<SimdStringCodec>());
    } else {
        assert_eq!(name, std::any::type_name::<StringCodec>());
    }
    assert_eq!(SimdStringAccess.is_available(), detect_simd_level().is_some());
}

#[test]
fn test_forced_probe_never_installs_unsupported_codec() {
    // a probe may claim support, but the SIMD codec still needs a real CPU level
    let caps = Capabilities::from_probe(&FixedProbe::new("always", true));
    let mut registry = CodecRegistry::new(caps);
    registry
        .register(&Contribution::new("strings", |caps| {
            vec![StringCodec::best_available(caps)]
        }))
        .unwrap();
    registry.freeze().unwrap();
    let name = registry.lookup_for::<String>().unwrap().name();
    if detect_simd_level().is_none() {
        assert_eq!(name, std::any::type_name::<StringCodec>());
    }
}
