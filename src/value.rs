use std::ops::Index;

use indexmap::IndexMap;

use crate::Tag;

/// The contents of an NBT compound, in the order they appear in the data.
pub type Compound = IndexMap<String, Value>;

/// Value is a complete NBT value. It owns its data. Compounds and Lists are
/// recursively loaded. The name of the root compound (which is usually the
/// empty string) is not kept.
///
/// ```no_run
/// # use nbtstream::Value;
/// # use nbtstream::error::Result;
/// #
/// # fn main() -> Result<()> {
/// #   let file = std::fs::File::open("level.dat").unwrap();
///     let level = nbtstream::from_gzip_reader(file)?;
///     match level["Data"]["DataVersion"] {
///         Value::Int(ver) => println!("Version: {}", ver),
///         _ => {}
///     }
///     println!("{:#?}", level);
/// #   Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    #[cfg_attr(feature = "serde", serde(serialize_with = "serde_bytes::serialize"))]
    ByteArray(Vec<u8>),
    String(String),
    List(Vec<Value>),
    Compound(Compound),
}

impl Value {
    /// The tag this value is written with.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(v) => Some(v),
            _ => None,
        }
    }

    /// Look up `key` if this is a compound.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_compound().and_then(|c| c.get(key))
    }
}

/// Index into a compound by key.
///
/// # Panics
///
/// If the value is not a compound or does not contain the key, in the same
/// way indexing a map panics.
impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self {
            Value::Compound(c) => &c[key],
            other => panic!("cannot index {} with {:?}", other.tag(), key),
        }
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<u8>, ByteArray);
from!(Vec<Value>, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
