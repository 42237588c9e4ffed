//! Integration tests for the complete input → traversal → value flow

use bytes::Bytes;
use shapefuzz_core::{aggregate, Config, Error, FieldStrategy, Generate, Generator, UnknownStrategy};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default, PartialEq)]
struct Record {
    field1: String,
    field2: String,
    field3: Bytes,
}

aggregate!(Record { field1, field2, field3 });

#[derive(Debug, Default)]
struct Node {
    value: u8,
    next: Option<Box<Node>>,
}

aggregate!(Node { value, next });

impl Node {
    fn chain_len(&self) -> usize {
        1 + self.next.as_ref().map_or(0, |next| next.chain_len())
    }
}

#[derive(Debug, Default, PartialEq)]
struct Email(String);

// No structural generation; only an override can fill it
impl Generate for Email {}

#[derive(Debug, Default)]
struct Contact {
    name: String,
    email: Email,
    tags: Vec<u8>,
    secret: u32,
}

aggregate!(Contact {
    name,
    email,
    tags,
    #[private]
    secret,
});

#[test]
fn test_full_workflow_record() {
    let data = b"\x03ABC\x03ABC\x01A".to_vec();
    let mut generator = Generator::new(data);

    let record: Record = generator.generate().unwrap();

    assert_eq!(record.field1, "ABC");
    assert_eq!(record.field2, "ABC");
    assert_eq!(record.field3, Bytes::from_static(b"A"));
    assert_eq!(generator.consumed(), 10);
}

#[test]
fn test_generate_struct_in_place() {
    let data = b"\x02hi\x00\x00".to_vec();
    let mut generator = Generator::new(data);

    let mut record = Record {
        field3: Bytes::from_static(b"stale"),
        ..Record::default()
    };
    generator.generate_struct(&mut record).unwrap();

    assert_eq!(record.field1, "hi");
    assert_eq!(record.field2, "");
    assert!(record.field3.is_empty());
}

#[test]
fn test_sequential_calls_share_cursor() {
    let data = b"\x01a\x01b\x00\x01c\x01d\x00".to_vec();
    let mut generator = Generator::new(data);

    let first: Record = generator.generate().unwrap();
    let second: Record = generator.generate().unwrap();

    assert_eq!((first.field1.as_str(), first.field2.as_str()), ("a", "b"));
    assert_eq!((second.field1.as_str(), second.field2.as_str()), ("c", "d"));
    assert!(generator.cursor().is_exhausted());
}

#[test]
fn test_insufficient_bytes_surfaces() {
    let data = b"\x05AB".to_vec();
    let mut generator = Generator::new(data);

    let err = generator.generate::<Record>().unwrap_err();
    assert!(err.is_insufficient_bytes());
}

#[test]
fn test_recursive_shape_stops_at_max_depth() {
    // Each node spends three levels: the option, the box and the node
    let data = vec![1u8; 4096];
    let mut generator = Generator::builder(data).max_depth(10).build().unwrap();

    let node: Node = generator.generate().unwrap();

    assert_eq!(node.chain_len(), 4);
    assert_eq!(generator.consumed(), 3);
}

#[test]
fn test_recursive_shape_default_depth() {
    let data = vec![1u8; 100_000];
    let mut generator = Generator::new(data);

    let node: Node = generator.generate().unwrap();

    assert!(node.chain_len() <= 34);
    assert!(generator.consumed() < 100);
}

#[test]
fn test_nil_chance_zero_always_populates() {
    let data = vec![3u8, 7, 8, 9, 4];
    let mut generator = Generator::new(data);

    let value: (Vec<u8>, Option<u8>) = generator.generate().unwrap();

    assert_eq!(value.0, vec![7, 8, 9]);
    assert_eq!(value.1, Some(4));
}

#[test]
fn test_nil_chance_one_empties_containers() {
    let data = vec![0x11u8, 0x22, 0x33, 0x44];
    let mut generator = Generator::builder(data).nil_chance(1.0).build().unwrap();

    let value: (Vec<u8>, Option<u8>, BTreeMap<u8, u8>) = generator.generate().unwrap();

    assert!(value.0.is_empty());
    assert_eq!(value.1, None);
    assert!(value.2.is_empty());
    // one gate byte per container
    assert_eq!(generator.consumed(), 3);
}

#[test]
fn test_partial_sequence_accepted_after_ten_elements() {
    // 20 elements requested; each u16 needs three bytes and only ten fit
    let mut data = vec![20u8];
    data.extend(std::iter::repeat([0x01, 0x00, 0x00]).take(10).flatten());
    data.extend([0xaa, 0xbb]);
    let mut generator = Generator::new(data);

    let values: Vec<u16> = generator.generate().unwrap();

    assert_eq!(values.len(), 10);
    assert!(values.iter().all(|&v| v == 1));
}

#[test]
fn test_partial_sequence_rejected_before_ten_elements() {
    let mut data = vec![20u8];
    data.extend(std::iter::repeat([0x01, 0x00, 0x00]).take(4).flatten());
    data.extend([0xaa, 0xbb]);
    let mut generator = Generator::new(data);

    let err = generator.generate::<Vec<u16>>().unwrap_err();
    assert!(err.is_insufficient_bytes());
}

#[test]
fn test_map_of_strings() {
    // two entries: "a" → 1, "b" → 2
    let data = b"\x02\x01a\x01\x01b\x02".to_vec();
    let mut generator = Generator::new(data);

    let map: HashMap<String, u8> = generator.generate().unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], 1);
    assert_eq!(map["b"], 2);
}

#[test]
fn test_override_fills_unknown_shape() {
    let data = b"\x03bob\x00\x01\x02\x00".to_vec();
    let mut generator = Generator::builder(data)
        .unknown_shapes(UnknownStrategy::Fail)
        .with_override::<Email, _>(|email, cont| {
            let user = cont.string_from_alphabet("abc", 3)?;
            email.0 = format!("{}@example.com", user);
            Ok(())
        })
        .build()
        .unwrap();

    let contact: Contact = generator.generate().unwrap();

    assert_eq!(contact.name, "bob");
    assert_eq!(contact.email, Email("abc@example.com".into()));
    assert!(contact.tags.is_empty());
    assert_eq!(contact.secret, 0);
}

#[test]
fn test_unknown_shape_fails_without_override() {
    let data = b"\x03bob\x00\x01\x02\x00".to_vec();
    let mut generator = Generator::builder(data)
        .unknown_shapes(UnknownStrategy::Fail)
        .build()
        .unwrap();

    let err = generator.generate::<Contact>().unwrap_err();
    assert!(matches!(err, Error::UnknownShape(name) if name.ends_with("Email")));
    assert!(!err.is_insufficient_bytes());
}

#[test]
fn test_override_error_aborts_traversal() {
    let data = b"\x03bob\x00".to_vec();
    let mut generator = Generator::builder(data)
        .with_override::<Email, _>(|_, _| Err("no mailbox".into()))
        .build()
        .unwrap();

    let err = generator.generate::<Contact>().unwrap_err();
    assert!(matches!(err, Error::Override { .. }));
    assert!(err.to_string().contains("no mailbox"));
}

#[test]
fn test_override_inside_sequence_is_not_truncated() {
    // Override errors abort even after ten good elements
    let mut data = vec![15u8];
    data.extend([0u8; 20]);
    let mut generator = Generator::builder(data)
        .with_override::<u16, _>(|value, cont| {
            let b = cont.byte()?;
            if cont.position() > 12 {
                return Err("late element rejected".into());
            }
            *value = u16::from(b);
            Ok(())
        })
        .build()
        .unwrap();

    let err = generator.generate::<Vec<u16>>().unwrap_err();
    assert!(matches!(err, Error::Override { type_name: "u16", .. }));
}

#[test]
fn test_option_of_overridden_type_honors_nil_gate() {
    let data = vec![0x00u8, 0x42, 0x43];
    let mut generator = Generator::builder(data)
        .nil_chance(1.0)
        .with_override::<u16, _>(|value, cont| {
            *value = u16::from(cont.byte()?) + 1000;
            Ok(())
        })
        .build()
        .unwrap();

    let value: Option<u16> = generator.generate().unwrap();

    assert_eq!(value, None);
    assert_eq!(generator.consumed(), 1);
}

#[test]
fn test_option_of_overridden_type_past_the_gate() {
    // 0x07 % 10 = 7 is not below 5, so the value is populated
    let data = vec![0x07u8, 0x42];
    let mut generator = Generator::builder(data)
        .nil_chance(0.5)
        .with_override::<u16, _>(|value, cont| {
            *value = u16::from(cont.byte()?) + 1000;
            Ok(())
        })
        .build()
        .unwrap();

    let value: Option<u16> = generator.generate().unwrap();

    assert_eq!(value, Some(1066));
    assert_eq!(generator.consumed(), 2);
}

#[test]
fn test_override_for_option_is_handed_some() {
    let data = vec![0x09u8];
    let mut generator = Generator::builder(data)
        .with_override::<Option<u16>, _>(|value, cont| {
            let slot = value.as_mut().ok_or("override received None")?;
            *slot = u16::from(cont.byte()?);
            Ok(())
        })
        .build()
        .unwrap();

    let value: (Option<u16>,) = generator.generate().unwrap();

    assert_eq!(value.0, Some(9));
}

#[test]
fn test_private_field_strategies() {
    // name, tags, then the private u32 seed
    let data = b"\x00\x00\x2a".to_vec();

    let mut ignore = Generator::new(data.clone());
    let contact: Contact = ignore.generate().unwrap();
    assert_eq!(contact.secret, 0);

    let mut force = Generator::builder(data.clone())
        .unexported_fields(FieldStrategy::ForceAccess)
        .build()
        .unwrap();
    let contact: Contact = force.generate().unwrap();
    assert_eq!(contact.secret, 0x2a);

    let mut fail = Generator::builder(data)
        .unexported_fields(FieldStrategy::Fail)
        .build()
        .unwrap();
    let err = fail.generate::<Contact>().unwrap_err();
    assert!(matches!(
        err,
        Error::PrivateField {
            field: "secret",
            ..
        }
    ));
}

#[test]
fn test_config_from_json() {
    let config: Config =
        serde_json::from_str(r#"{"nil_chance": 1.0, "unknown_shapes": "fail"}"#).unwrap();
    assert_eq!(config.unknown_shapes, UnknownStrategy::Fail);
    assert_eq!(config.max_depth, Config::default().max_depth);

    let mut generator = Generator::with_config(vec![0u8], config).unwrap();
    assert_eq!(generator.generate::<Option<u8>>().unwrap(), None);
}

#[test]
fn test_max_consumable_limits_generation() {
    let data = b"\x03ABC\x03ABC\x01A".to_vec();
    let mut generator = Generator::builder(data).max_consumable(6).build().unwrap();

    let err = generator.generate::<Record>().unwrap_err();
    assert!(err.is_insufficient_bytes());
    assert!(generator.consumed() <= 6);
}
