use std::convert::TryFrom;

use crate::Tag;

mod load;

/// Route `log` output to the test harness. Run with `RUST_LOG=trace` to see
/// the state transitions of the reader and writer.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(Tag::$tag), $val);
            assert_eq!(Tag::try_from($val as u8), Ok(Tag::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
    }

    for value in 11..=u8::MAX {
        assert!(Tag::try_from(value).is_err())
    }
}

#[test]
fn tag_kinds() {
    assert!(Tag::List.is_container());
    assert!(Tag::Compound.is_container());
    assert!(!Tag::End.is_container());
    assert!(!Tag::End.is_scalar());
    assert!(Tag::ByteArray.is_scalar());
    assert!(Tag::String.is_scalar());
}
