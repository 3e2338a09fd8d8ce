use flate2::Compression;
use indexmap::indexmap;

use super::builder::Builder;
use crate::error::{ErrorKind, Result};
use crate::stream::{Payload, Reader, Token, Writer};
use crate::{from_bytes, from_gzip_reader, to_bytes, to_gzip_writer, Compound, Tag, Value};

// Given a v: Value, a key: str, and a pattern, check the value is a compound
// with that key and its value matches the pattern. Optionally add a condition
// for the matched value.
macro_rules! assert_contains {
    ($v:ident, $key:expr, $p:pat) => {
        match $v.get($key) {
            Some($p) => {}
            other => panic!("expected Some({}), got {:?}", stringify!($p), other),
        }
    };
    ($v:ident, $key:expr, $p:pat, $check:expr) => {
        match $v.get($key) {
            Some($p) => assert!($check),
            other => panic!("expected Some({}), got {:?}", stringify!($p), other),
        }
    };
}

#[test]
fn write_then_read_scenario() -> Result<()> {
    let mut writer = Writer::new(Vec::new());
    writer.emit_compound("", |w| {
        w.emit_token("x", Payload::Short(-1))?;
        w.emit_list("y", Tag::Byte, |w| {
            w.emit_item(Payload::Byte(3))?;
            w.emit_item(Payload::Byte(5))
        })
    })?;
    let bs = writer.finish()?;

    let tokens: Vec<Token> = Reader::new(bs.as_slice()).collect::<Result<_>>()?;
    assert_eq!(
        tokens,
        vec![
            Token::new("", Payload::Compound),
            Token::new("x", Payload::Short(-1)),
            Token::new("y", Payload::List(Tag::Byte)),
            Token::new(0usize, Payload::Byte(3)),
            Token::new(1usize, Payload::Byte(5)),
            Token::end(),
            Token::end(),
        ]
    );

    let root = from_bytes(&bs)?;
    let expected = indexmap! {
        "x".to_owned() => Value::Short(-1),
        "y".to_owned() => Value::List(vec![Value::Byte(3), Value::Byte(5)]),
    };
    assert_eq!(root, expected);
    Ok(())
}

#[test]
fn root_name_is_discarded() -> Result<()> {
    let input = Builder::new()
        .start_compound("level")
        .int("a", 1)
        .end_compound()
        .build();

    let root = from_bytes(&input)?;
    assert_eq!(root.len(), 1);
    assert_eq!(root["a"], Value::Int(1));
    Ok(())
}

#[test]
fn distinguish_scalars() -> Result<()> {
    let input = Builder::new()
        .start_compound("")
        .byte("b", -123)
        .short("s", 1000)
        .int("i", 1_000_000)
        .long("l", -1)
        .float("f", 1.5)
        .double("d", 2.5)
        .string("str", "hello")
        .byte_array("ba", &[0, 255])
        .end_compound()
        .build();

    let v = Value::Compound(from_bytes(&input)?);
    assert_contains!(v, "b", Value::Byte(-123));
    assert_contains!(v, "s", Value::Short(1000));
    assert_contains!(v, "i", Value::Int(1_000_000));
    assert_contains!(v, "l", Value::Long(-1));
    assert_contains!(v, "f", Value::Float(f), *f == 1.5);
    assert_contains!(v, "d", Value::Double(d), *d == 2.5);
    assert_eq!(v["str"].as_str(), Some("hello"));
    assert_contains!(v, "ba", Value::ByteArray(bs), bs == &[0, 255]);
    Ok(())
}

#[test]
fn compound_keeps_insertion_order() -> Result<()> {
    let input = Builder::new()
        .start_compound("")
        .int("zebra", 1)
        .int("apple", 2)
        .int("mango", 3)
        .end_compound()
        .build();

    let root = from_bytes(&input)?;
    let keys: Vec<&str> = root.keys().map(String::as_str).collect();
    assert_eq!(keys, ["zebra", "apple", "mango"]);
    Ok(())
}

#[test]
fn nested_structures() -> Result<()> {
    let input = Builder::new()
        .start_compound("")
        .start_compound("Data")
        .int("DataVersion", 2586)
        .start_list("Pos", Tag::Double, 2)
        .double_payload(0.5)
        .double_payload(-3.0)
        .end_compound()
        .start_list("Items", Tag::Compound, 1)
        .start_anon_compound()
        .string("id", "minecraft:stone")
        .byte("Count", 64)
        .end_compound()
        .end_compound()
        .build();

    let root = from_bytes(&input)?;
    assert_eq!(root["Data"]["DataVersion"].as_i64(), Some(2586));
    assert_eq!(
        root["Data"]["Pos"].as_list(),
        Some(&[Value::Double(0.5), Value::Double(-3.0)][..])
    );
    let item = &root["Items"].as_list().unwrap()[0];
    assert_eq!(item["id"], Value::String("minecraft:stone".to_owned()));
    assert_eq!(item.get("Count").and_then(Value::as_i64), Some(64));
    assert!(item.get("Missing").is_none());
    Ok(())
}

#[test]
fn list_of_lists_of_int_round_trips() -> Result<()> {
    let root = indexmap! {
        "grid".to_owned() => Value::List(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![]),
            Value::List(vec![Value::Int(3)]),
        ]),
    };

    let bs = to_bytes(&root)?;
    let expected = Builder::new()
        .start_compound("")
        .start_list("grid", Tag::List, 3)
        .start_anon_list(Tag::Int, 2)
        .int_payload(1)
        .int_payload(2)
        .start_anon_list(Tag::End, 0)
        .start_anon_list(Tag::Int, 1)
        .int_payload(3)
        .end_compound()
        .build();
    assert_eq!(bs, expected);
    assert_eq!(from_bytes(&bs)?, root);
    Ok(())
}

#[test]
fn deeply_nested_round_trip() -> Result<()> {
    let mut value = Value::List(vec![]);
    for i in 0..1000 {
        value = if i % 2 == 0 {
            Value::List(vec![value])
        } else {
            Value::Compound(indexmap! { "c".to_owned() => value })
        };
    }
    let root = indexmap! { "deep".to_owned() => value };

    let bs = to_bytes(&root)?;
    assert_eq!(from_bytes(&bs)?, root);
    Ok(())
}

#[test]
fn heterogeneous_list_cannot_be_saved() {
    let root = indexmap! {
        "mixed".to_owned() => Value::List(vec![Value::Int(1), Value::String("a".to_owned())]),
    };

    let err = to_bytes(&root).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: Tag::Int,
            found: Tag::String
        }
    );
}

#[test]
fn gzip_round_trip() -> Result<()> {
    let mut root = Compound::new();
    root.insert("name".to_owned(), "Steve".into());
    root.insert("alive".to_owned(), true.into());
    root.insert("xp".to_owned(), 1.5f32.into());
    root.insert("blob".to_owned(), vec![1u8, 2, 3].into());

    let compressed = to_gzip_writer(Vec::new(), &root, Compression::fast())?;
    assert_eq!(from_gzip_reader(compressed.as_slice())?, root);
    Ok(())
}

#[test]
fn not_gzip() {
    let input = Builder::new().start_compound("").end_compound().build();
    assert!(from_gzip_reader(input.as_slice()).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn value_serializes_to_json() -> Result<()> {
    let input = Builder::new()
        .start_compound("")
        .byte("b", 1)
        .string("s", "x")
        .start_list("l", Tag::Int, 2)
        .int_payload(1)
        .int_payload(2)
        .start_compound("c")
        .byte_array("ba", &[7])
        .end_compound()
        .end_compound()
        .build();

    let root = from_bytes(&input)?;
    let json = serde_json::to_string(&root).unwrap();
    assert_eq!(json, r#"{"b":1,"s":"x","l":[1,2],"c":{"ba":[7]}}"#);
    Ok(())
}
