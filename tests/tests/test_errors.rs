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

use skycodec::{Error, SkyCodec};
use std::sync::Arc;
use tests::build_event::BuildEvent;
use tests::graph::{dep_count, Label, Target};

fn target() -> Target {
    Target {
        label: Arc::new(Label::new("//app", "app")),
        deps: vec![Arc::new(Label::new("//lib", "lib"))],
    }
}

#[test]
fn test_max_depth_exceeded() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    // target -> label -> string
    let shallow = SkyCodec::with_linked_codecs().unwrap().max_depth(2);
    let err = shallow.serialize(&target()).err().unwrap();
    assert!(matches!(err, Error::DepthExceed(_)));

    let deep = SkyCodec::with_linked_codecs().unwrap().max_depth(3);
    let bytes = deep.serialize(&target()).unwrap();
    assert!(matches!(
        shallow.deserialize::<Target>(&bytes),
        Err(Error::DepthExceed(_))
    ));
    assert_eq!(deep.deserialize::<Target>(&bytes).unwrap(), target());
}

#[test]
fn test_trailing_bytes() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let mut bytes = codec.serialize(&7u32).unwrap();
    bytes.push(1);
    assert!(matches!(
        codec.deserialize::<u32>(&bytes),
        Err(Error::Framing(_))
    ));
}

#[test]
fn test_bad_header() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let mut bytes = codec.serialize(&7u32).unwrap();
    bytes[0] ^= 0xFF;
    assert!(matches!(
        codec.deserialize::<u32>(&bytes),
        Err(Error::InvalidData(_))
    ));
    assert!(matches!(
        codec.deserialize::<u32>(&[]),
        Err(Error::BufferOutOfBound(..))
    ));
}

#[test]
fn test_truncated_stream() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let bytes = codec.serialize(&target()).unwrap();
    for len in 3..bytes.len() {
        assert!(
            codec.deserialize::<Target>(&bytes[..len]).is_err(),
            "prefix of {len} bytes decoded"
        );
    }
}

#[test]
fn test_back_reference_to_other_type() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let label = Label::new("//a", "a");
    let mut context = codec.serialization_context();
    context.serialize(&label).unwrap();
    // a back-reference to the label, read as a target
    context.writer.write_i8(-2);
    context.writer.write_varuint32(0);
    let bytes = context.finish();

    let mut context = codec.deserialization_context(&bytes).unwrap();
    assert_eq!(context.deserialize::<Label>().unwrap(), label);
    assert!(matches!(
        context.deserialize::<Target>(),
        Err(Error::Framing(_))
    ));
}

#[test]
fn test_back_reference_to_value_being_decoded() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let mut context = codec.serialization_context();
    // target #0 whose label points back at #0
    context.writer.write_i8(0);
    context.writer.write_i8(-2);
    context.writer.write_varuint32(0);
    let bytes = context.finish();
    assert!(matches!(
        codec.deserialize::<Target>(&bytes),
        Err(Error::Framing(_))
    ));
}

#[test]
fn test_unknown_marker() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let mut context = codec.serialization_context();
    context.writer.write_i8(5);
    let bytes = context.finish();
    assert!(matches!(
        codec.deserialize::<Label>(&bytes),
        Err(Error::Framing(_))
    ));
}

#[test]
fn test_codec_given_wrong_type() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let int_codec = codec.get_registry().lookup_for::<i64>().unwrap();
    let text = "not a number".to_string();
    let mut context = codec.serialization_context();
    assert!(matches!(
        int_codec.write_any(&text, &mut context),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_huge_frame_length() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let codec = SkyCodec::with_linked_codecs().unwrap();
    let mut context = codec.serialization_context();
    context.writer.write_varuint64(u64::MAX);
    let bytes = context.finish();
    assert!(matches!(
        codec.deserialize::<String>(&bytes),
        Err(Error::BufferOutOfBound(..) | Error::InvalidData(_))
    ));
    assert!(matches!(
        codec.deserialize::<BuildEvent>(&bytes),
        Err(Error::BufferOutOfBound(..) | Error::InvalidData(_))
    ));
}

#[test]
fn test_dep_count_overflow() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    assert_eq!(dep_count(3).unwrap(), 3);
    assert_eq!(dep_count(u32::MAX as usize).unwrap(), u32::MAX);
    if cfg!(target_pointer_width = "64") {
        assert!(matches!(
            dep_count((u32::MAX as u64 + 1) as usize),
            Err(Error::InvalidData(_))
        ));
    }
}
