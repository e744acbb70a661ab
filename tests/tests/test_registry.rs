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

use skycodec::{
    codec_ref, Capabilities, CodecContributor, CodecRegistry, Contribution, DeserializationContext,
    Error, ListCodec, ObjectCodec, SerializationContext, StringCodec,
};
use std::any::TypeId;
use tests::build_event::BuildEvent;
use tests::graph::{Label, Target};
use tests::init_logger;

fn linked(capabilities: Capabilities) -> CodecRegistry {
    let mut registry = CodecRegistry::with_linked_codecs(capabilities).unwrap();
    registry.freeze().unwrap();
    registry
}

#[test]
fn test_linked_registry_holds_every_contribution() {
    init_logger();
    let registry = linked(Capabilities::portable());
    log::info!("linked registry holds {} codecs", registry.len());
    assert!(registry.is_frozen());
    assert!(registry.lookup_for::<i64>().is_ok());
    assert!(registry.lookup_for::<bool>().is_ok());
    assert!(registry.lookup_for::<chrono::NaiveDate>().is_ok());
    assert!(registry.lookup_for::<String>().is_ok());
    assert!(registry.lookup_for::<BuildEvent>().is_ok());
    assert!(registry.lookup_for::<Vec<BuildEvent>>().is_ok());
    assert!(registry.lookup_for::<Label>().is_ok());
    assert!(registry.lookup_for::<Target>().is_ok());
    let descriptor = registry.descriptor(TypeId::of::<BuildEvent>()).unwrap();
    assert_eq!(descriptor.get_contributor(), "build-event-stream");
}

#[test]
fn test_scan_skips_codecs_that_opt_out() {
    let registry = linked(Capabilities::portable());
    // submitted as an AutoRegisteredCodec, but ListCodec is not auto-registered
    assert!(matches!(
        registry.lookup_for::<Vec<String>>(),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn test_unknown_type() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    struct Unregistered;
    let registry = linked(Capabilities::portable());
    let err = registry.lookup_for::<Unregistered>().err().unwrap();
    assert!(matches!(err, Error::UnknownType(_)));
    assert!(err.to_string().contains("Unregistered"));
}

#[test]
fn test_empty_registry_ignores_linked_codecs() {
    let mut registry = CodecRegistry::new(Capabilities::portable());
    registry.freeze().unwrap();
    assert!(registry.is_empty());
    assert!(registry.lookup_for::<i64>().is_err());
    assert_eq!(registry.iter().count(), 0);
}

#[test]
fn test_tags_are_stable_across_registries() {
    let first = linked(Capabilities::portable());
    let second = linked(Capabilities::portable());
    let tags = |registry: &CodecRegistry| -> Vec<(u32, &'static str)> {
        registry
            .iter()
            .map(|d| (d.get_tag(), d.get_codec().value_type_name()))
            .collect()
    };
    assert_eq!(tags(&first), tags(&second));
    let names: Vec<_> = tags(&first).into_iter().map(|(_, name)| name).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(tags(&first)[0].0, 1);
}

#[test]
fn test_register_after_freeze() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let mut registry = linked(Capabilities::portable());
    let late = Contribution::new("late", |_| vec![codec_ref(ListCodec::<String>::new())]);
    assert!(matches!(
        registry.register(&late),
        Err(Error::AlreadyFrozen(_))
    ));
    assert!(registry.lookup_for::<Vec<String>>().is_err());
    // freezing twice is harmless
    registry.freeze().unwrap();
}

#[test]
fn test_lookup_agrees_before_and_after_freeze() {
    let mut registry = CodecRegistry::with_linked_codecs(Capabilities::portable()).unwrap();
    let before: Vec<&'static str> = [
        TypeId::of::<String>(),
        TypeId::of::<i32>(),
        TypeId::of::<BuildEvent>(),
    ]
    .iter()
    .map(|id| registry.lookup(*id).unwrap().name())
    .collect();
    registry.freeze().unwrap();
    let after: Vec<&'static str> = [
        TypeId::of::<String>(),
        TypeId::of::<i32>(),
        TypeId::of::<BuildEvent>(),
    ]
    .iter()
    .map(|id| registry.lookup(*id).unwrap().name())
    .collect();
    assert_eq!(before, after);
}

#[test]
fn test_two_contributors_claiming_one_type() {
    if skycodec_core::error::should_panic_on_error() {
        return;
    }
    let a = Contribution::new("a", |_| vec![codec_ref(StringCodec)]);
    let b = Contribution::new("b", |_| vec![codec_ref(StringCodec)]);
    let mut registry = CodecRegistry::new(Capabilities::portable());
    registry.register(&a).unwrap();
    registry.register(&b).unwrap();
    let err = registry.freeze().err().unwrap();
    match err {
        Error::DuplicateRegistration { first, second, .. } => {
            assert!(first.contains("`a`"));
            assert!(second.contains("`b`"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

struct ShoutingStringCodec;

impl ObjectCodec for ShoutingStringCodec {
    type Value = String;

    fn serialize<'a>(
        &self,
        context: &mut SerializationContext<'a>,
        value: &'a String,
    ) -> Result<(), Error> {
        context
            .writer
            .write_length_delimited(value.to_uppercase().as_bytes());
        Ok(())
    }

    fn deserialize(&self, context: &mut DeserializationContext<'_>) -> Result<String, Error> {
        let bytes = context.reader.read_length_delimited()?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::invalid_data(e.to_string()))
    }
}

#[test]
fn test_explicit_contributor_overrides_auto_registered_codec() {
    // ShoutingStringCodec is auto-registered; the strings contributor's codec
    // is not, so it is the one selected
    let mut registry = CodecRegistry::new(Capabilities::portable());
    registry.register_codec(codec_ref(ShoutingStringCodec)).unwrap();
    registry
        .register(&Contribution::new("strings", |caps| {
            vec![StringCodec::best_available(caps)]
        }))
        .unwrap();
    registry.freeze().unwrap();
    let codec = registry.lookup_for::<String>().unwrap();
    assert_eq!(codec.name(), std::any::type_name::<StringCodec>());
}

#[test]
fn test_custom_contributor() {
    struct Lists;

    impl CodecContributor for Lists {
        fn name(&self) -> &str {
            "lists"
        }

        fn codecs(&self, _capabilities: &Capabilities) -> Vec<skycodec::CodecRef> {
            vec![
                codec_ref(ListCodec::<String>::new()),
                codec_ref(ListCodec::<i64>::new()),
            ]
        }
    }

    let mut registry = CodecRegistry::with_linked_codecs(Capabilities::portable()).unwrap();
    registry.register(&Lists).unwrap();
    registry.freeze().unwrap();
    assert!(registry.lookup_for::<Vec<String>>().is_ok());
    assert!(registry.lookup_for::<Vec<i64>>().is_ok());
}
