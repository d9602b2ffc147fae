//! Property-based tests for object encoding
//!
//! Every object must report exactly the number of bytes it writes, since the
//! writer lays out offsets from the reported sizes before emitting anything.

use pdfpack::objects::{Dictionary, HexString, Object, ObjectId, RawStream};
use pdfpack::structures::{FlateStream, ObjectStream};
use proptest::prelude::*;

prop_compose! {
    fn object_id_strategy()(
        number in 1u32..=999999u32,
        generation in 0u16..=65535u16
    ) -> ObjectId {
        ObjectId::new(number, generation)
    }
}

fn leaf_strategy() -> impl Strategy<Value = Object> {
    prop_oneof![
        Just(Object::Null),
        any::<bool>().prop_map(Object::Boolean),
        any::<i64>().prop_map(Object::Integer),
        (-1.0e12f64..1.0e12f64).prop_map(Object::Real),
        "\\PC{0,40}".prop_map(Object::string),
        "[()\\\\a-z ]{0,20}".prop_map(Object::string),
        prop::collection::vec(any::<u8>(), 0..40).prop_map(Object::String),
        "\\PC{0,20}".prop_map(Object::Name),
        "[0-9A-F]{0,31}".prop_map(|digits| Object::HexString(HexString::of(digits))),
        object_id_strategy().prop_map(Object::Reference),
    ]
}

fn object_strategy() -> impl Strategy<Value = Object> {
    leaf_strategy().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Object::Array),
            prop::collection::vec(("[A-Za-z]{1,8}", inner), 0..6).prop_map(|entries| {
                let mut dict = Dictionary::new();
                for (key, value) in entries {
                    dict.set(key, value);
                }
                Object::Dictionary(dict)
            }),
        ]
    })
}

fn assert_exact_size(object: &Object) -> Result<(), TestCaseError> {
    let size = object.size_in_bytes().unwrap();
    let bytes = object.to_bytes().unwrap();
    prop_assert_eq!(bytes.len(), size);

    let mut buffer = vec![0u8; size + 7];
    let written = object.copy_bytes_into(&mut buffer, 7).unwrap();
    prop_assert_eq!(written, size);
    prop_assert_eq!(&buffer[7..], &bytes[..]);
    Ok(())
}

proptest! {
    #[test]
    fn test_object_size_matches_encoding(object in object_strategy()) {
        assert_exact_size(&object)?;
    }

    #[test]
    fn test_raw_stream_size_matches_encoding(
        object in object_strategy(),
        contents in prop::collection::vec(any::<u8>(), 0..256)
    ) {
        let mut dict = Dictionary::new();
        dict.set("Extra", object);
        assert_exact_size(&Object::from(RawStream::new(dict, contents)))?;
    }

    #[test]
    fn test_flate_stream_size_matches_encoding(
        payload in prop::collection::vec(any::<u8>(), 0..512),
        encode in any::<bool>()
    ) {
        let stream = FlateStream::for_bytes(Dictionary::new(), payload, encode);
        assert_exact_size(&Object::from(stream))?;
    }

    #[test]
    fn test_object_stream_size_matches_encoding(
        objects in prop::collection::vec(object_strategy(), 0..12),
        encode in any::<bool>()
    ) {
        let members = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| (ObjectId::of(index as u32 + 1), object))
            .collect();
        let stream = ObjectStream::with_objects(members, encode).unwrap();
        let object = Object::from(stream);
        assert_exact_size(&object)?;

        let cloned = object.clone();
        prop_assert_eq!(cloned.size_in_bytes().unwrap(), object.size_in_bytes().unwrap());
        prop_assert_eq!(cloned.to_string(), object.to_string());
    }

    #[test]
    fn test_display_matches_bytes_for_ascii(object in object_strategy()) {
        let bytes = object.to_bytes().unwrap();
        if bytes.is_ascii() {
            prop_assert_eq!(object.to_string().into_bytes(), bytes);
        }
    }
}
