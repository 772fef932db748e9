// Copyright 2024 nodearc Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;

use indexmap::IndexMap;
use num_traits::NumCast;
use ordered_float::OrderedFloat;
use rand::distr::Alphanumeric;
use rand::distr::SampleString;
use rand::rng;
use rand::Rng;
use serde::ser::Serialize;
use serde::ser::SerializeMap;
use serde::ser::SerializeSeq;
use serde::ser::Serializer;

use crate::error::Error;
use crate::error::Result;

/// A table payload: string keys mapped to child values, iterated in
/// insertion order. Keys are unique; re-inserting a key replaces its value
/// without changing its position.
pub type Table = IndexMap<String, DocValue>;

/// The discriminant tag of a [`DocValue`], also used in type-mismatch
/// errors to report expected versus actual kinds. `Container` and
/// `Number` are category tags that only appear on the expected side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Container,
    Number,
    Null,
    Bool,
    Int,
    UInt,
    Float,
    Array,
    Table,
    String,
    Unknown,
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueType::Container => "container",
            ValueType::Number => "number",
            ValueType::Null => "null",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::UInt => "uint",
            ValueType::Float => "float",
            ValueType::Array => "array",
            ValueType::Table => "table",
            ValueType::String => "string",
            ValueType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl ValueType {
    /// Comparison rank for ordering values of different kinds. The three
    /// numeric kinds share a rank so they compare by magnitude.
    fn rank(&self) -> u8 {
        match self {
            ValueType::Null => 7,
            ValueType::Array => 6,
            ValueType::Table => 5,
            ValueType::String => 4,
            ValueType::Int | ValueType::UInt | ValueType::Float | ValueType::Number => 3,
            ValueType::Bool => 2,
            _ => 0,
        }
    }
}

/// A self-describing document value.
///
/// This is the owned, self-contained counterpart of a pooled tree node:
/// exactly one of eight variants is live at a time, and every
/// state-switching accessor fully drops the previous payload before
/// installing the new one. A freshly constructed value is `Null`.
#[derive(Clone, Default)]
pub enum DocValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<DocValue>),
    Table(Table),
}

impl Debug for DocValue {
    fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
        match self {
            DocValue::Null => formatter.debug_tuple("Null").finish(),
            DocValue::Bool(v) => formatter.debug_tuple("Bool").field(v).finish(),
            DocValue::Int(v) => formatter.debug_tuple("Int").field(v).finish(),
            DocValue::UInt(v) => formatter.debug_tuple("UInt").field(v).finish(),
            DocValue::Float(v) => formatter.debug_tuple("Float").field(v).finish(),
            DocValue::String(v) => formatter.debug_tuple("String").field(v).finish(),
            DocValue::Array(v) => {
                formatter.write_str("Array(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
            DocValue::Table(v) => {
                formatter.write_str("Table(")?;
                Debug::fmt(v, formatter)?;
                formatter.write_str(")")
            }
        }
    }
}

impl Display for DocValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DocValue::Null => write!(f, "null"),
            DocValue::Bool(v) => {
                if *v {
                    write!(f, "true")
                } else {
                    write!(f, "false")
                }
            }
            DocValue::Int(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            DocValue::UInt(v) => {
                let mut buffer = itoa::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            DocValue::Float(v) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*v))
            }
            DocValue::String(v) => {
                write!(f, "{:?}", v)
            }
            DocValue::Array(vs) => {
                write!(f, "[")?;
                for (i, v) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            DocValue::Table(vs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in vs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{k}\":{v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Eq for DocValue {}

impl PartialEq for DocValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for DocValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DocValue {
    fn cmp(&self, other: &Self) -> Ordering {
        let self_rank = self.value_type().rank();
        let other_rank = other.value_type().rank();
        if self_rank != other_rank {
            return self_rank.cmp(&other_rank);
        }

        match (self, other) {
            (DocValue::Null, DocValue::Null) => Ordering::Equal,
            (DocValue::Bool(v1), DocValue::Bool(v2)) => v1.cmp(v2),
            (DocValue::String(v1), DocValue::String(v2)) => v1.cmp(v2),
            (DocValue::Array(arr1), DocValue::Array(arr2)) => {
                for (v1, v2) in arr1.iter().zip(arr2.iter()) {
                    let ord = v1.cmp(v2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                arr1.len().cmp(&arr2.len())
            }
            (DocValue::Table(obj1), DocValue::Table(obj2)) => {
                for ((k1, v1), (k2, v2)) in obj1.iter().zip(obj2.iter()) {
                    let ord = k1.cmp(k2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    let ord = v1.cmp(v2);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                obj1.len().cmp(&obj2.len())
            }
            (_, _) => numeric_cmp(self, other),
        }
    }
}

/// Compares two numeric values across kinds. Same-kind and mixed integer
/// pairs compare exactly; anything involving a Float goes through
/// `OrderedFloat` for a total order (NaN sorts greatest).
fn numeric_cmp(a: &DocValue, b: &DocValue) -> Ordering {
    match (a, b) {
        (DocValue::Int(v1), DocValue::Int(v2)) => v1.cmp(v2),
        (DocValue::UInt(v1), DocValue::UInt(v2)) => v1.cmp(v2),
        (DocValue::Int(v1), DocValue::UInt(v2)) => {
            if *v1 < 0 {
                Ordering::Less
            } else {
                (*v1 as u64).cmp(v2)
            }
        }
        (DocValue::UInt(v1), DocValue::Int(v2)) => {
            if *v2 < 0 {
                Ordering::Greater
            } else {
                v1.cmp(&(*v2 as u64))
            }
        }
        (_, _) => {
            let f1 = a.as_f64().map(OrderedFloat).unwrap_or(OrderedFloat(0.0));
            let f2 = b.as_f64().map(OrderedFloat).unwrap_or(OrderedFloat(0.0));
            f1.cmp(&f2)
        }
    }
}

impl Serialize for DocValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DocValue::Null => serializer.serialize_unit(),
            DocValue::Bool(v) => serializer.serialize_bool(*v),
            DocValue::Int(v) => serializer.serialize_i64(*v),
            DocValue::UInt(v) => serializer.serialize_u64(*v),
            DocValue::Float(v) => serializer.serialize_f64(*v),
            DocValue::String(v) => serializer.serialize_str(v),
            DocValue::Array(vs) => {
                let mut seq = serializer.serialize_seq(Some(vs.len()))?;
                for v in vs {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            DocValue::Table(vs) => {
                let mut map = serializer.serialize_map(Some(vs.len()))?;
                for (k, v) in vs {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl DocValue {
    /// The discriminant tag of the currently live variant.
    pub fn value_type(&self) -> ValueType {
        match self {
            DocValue::Null => ValueType::Null,
            DocValue::Bool(_) => ValueType::Bool,
            DocValue::Int(_) => ValueType::Int,
            DocValue::UInt(_) => ValueType::UInt,
            DocValue::Float(_) => ValueType::Float,
            DocValue::String(_) => ValueType::String,
            DocValue::Array(_) => ValueType::Array,
            DocValue::Table(_) => ValueType::Table,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DocValue::Null)
    }

    pub fn is_scalar(&self) -> bool {
        !self.is_container()
    }

    pub fn is_container(&self) -> bool {
        matches!(self, DocValue::Array(_) | DocValue::Table(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, DocValue::Array(_))
    }

    pub fn is_table(&self) -> bool {
        matches!(self, DocValue::Table(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, DocValue::String(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(
            self,
            DocValue::Int(_) | DocValue::UInt(_) | DocValue::Float(_)
        )
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, DocValue::Bool(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DocValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DocValue::Int(v) => Some(*v),
            DocValue::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            DocValue::UInt(v) => Some(*v),
            DocValue::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocValue::Int(v) => Some(*v as f64),
            DocValue::UInt(v) => Some(*v as f64),
            DocValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<DocValue>> {
        match self {
            DocValue::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DocValue::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Checked read of a Bool payload; errors with the expected and
    /// actual tags on any other discriminant.
    pub fn get_bool(&self) -> Result<bool> {
        self.as_bool()
            .ok_or_else(|| Error::mismatch(ValueType::Bool, self.value_type()))
    }

    pub fn get_str(&self) -> Result<&str> {
        self.as_str()
            .ok_or_else(|| Error::mismatch(ValueType::String, self.value_type()))
    }

    pub fn get_array(&self) -> Result<&Vec<DocValue>> {
        self.as_array()
            .ok_or_else(|| Error::mismatch(ValueType::Array, self.value_type()))
    }

    pub fn get_table(&self) -> Result<&Table> {
        self.as_table()
            .ok_or_else(|| Error::mismatch(ValueType::Table, self.value_type()))
    }

    /// Checked numeric read with cross-kind coercion: succeeds for any of
    /// Int, UInt and Float, casting to `I`. Errors with a type mismatch
    /// when the value is not numeric at all, and with an out-of-range
    /// message when the cast cannot represent the value.
    pub fn get_number<I: NumCast>(&self) -> Result<I> {
        let casted = match self {
            DocValue::Int(v) => NumCast::from(*v),
            DocValue::UInt(v) => NumCast::from(*v),
            DocValue::Float(v) => NumCast::from(*v),
            _ => {
                return Err(Error::mismatch(ValueType::Number, self.value_type()));
            }
        };
        casted.ok_or_else(|| Error::Message("number out of range".to_string()))
    }

    /// Switches this value to Bool and returns the live payload. Any
    /// previous payload is dropped first; the content is preserved only
    /// when the discriminant already matches.
    pub fn as_bool_mut(&mut self) -> &mut bool {
        if !matches!(self, DocValue::Bool(_)) {
            *self = DocValue::Bool(false);
        }
        match self {
            DocValue::Bool(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_int_mut(&mut self) -> &mut i64 {
        if !matches!(self, DocValue::Int(_)) {
            *self = DocValue::Int(0);
        }
        match self {
            DocValue::Int(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_uint_mut(&mut self) -> &mut u64 {
        if !matches!(self, DocValue::UInt(_)) {
            *self = DocValue::UInt(0);
        }
        match self {
            DocValue::UInt(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_float_mut(&mut self) -> &mut f64 {
        if !matches!(self, DocValue::Float(_)) {
            *self = DocValue::Float(0.0);
        }
        match self {
            DocValue::Float(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_string_mut(&mut self) -> &mut String {
        if !matches!(self, DocValue::String(_)) {
            *self = DocValue::String(String::new());
        }
        match self {
            DocValue::String(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_array_mut(&mut self) -> &mut Vec<DocValue> {
        if !matches!(self, DocValue::Array(_)) {
            *self = DocValue::Array(Vec::new());
        }
        match self {
            DocValue::Array(v) => v,
            _ => unreachable!(),
        }
    }

    pub fn as_table_mut(&mut self) -> &mut Table {
        if !matches!(self, DocValue::Table(_)) {
            *self = DocValue::Table(Table::new());
        }
        match self {
            DocValue::Table(v) => v,
            _ => unreachable!(),
        }
    }

    /// Switches back to Null, dropping any owned payload.
    pub fn set_null(&mut self) {
        *self = DocValue::Null;
    }

    /// Overwrites this value's entire content. Previous tables and arrays
    /// are discarded, never merged.
    pub fn write<T: Into<DocValue>>(&mut self, value: T) {
        *self = value.into();
    }

    /// Converts the current content into a `T`, erroring on an
    /// incompatible discriminant.
    pub fn read<T: FromDoc>(&self) -> Result<T> {
        T::from_doc(self)
    }

    /// Non-throwing variant of [`read`](DocValue::read): stores the
    /// converted value into `out` and returns `true` on success. On
    /// failure `out` is left untouched and `false` is returned.
    pub fn try_read<T: FromDoc>(&self, out: &mut T) -> bool {
        match T::from_doc(self) {
            Ok(v) => {
                *out = v;
                true
            }
            Err(_) => false,
        }
    }

    /// Element count of an Array payload.
    pub fn array_length(&self) -> Option<usize> {
        match self {
            DocValue::Array(arr) => Some(arr.len()),
            _ => None,
        }
    }

    /// Keys of a Table payload as an Array of strings, in insertion
    /// order.
    pub fn table_keys(&self) -> Option<DocValue> {
        match self {
            DocValue::Table(obj) => {
                let mut keys = Vec::with_capacity(obj.len());
                for k in obj.keys() {
                    keys.push(DocValue::String(k.clone()));
                }
                Some(DocValue::Array(keys))
            }
            _ => None,
        }
    }

    pub fn get_by_name_ignore_case(&self, name: &str) -> Option<&DocValue> {
        match self {
            DocValue::Table(obj) => match obj.get(name) {
                Some(val) => Some(val),
                None => obj
                    .iter()
                    .find(|(key, _)| name.eq_ignore_ascii_case(key))
                    .map(|(_, val)| val),
            },
            _ => None,
        }
    }

    /// generate a random document value
    pub fn rand_value() -> DocValue {
        let mut rng = rng();
        match rng.random_range(0..=2) {
            0 => {
                let len = rng.random_range(0..=5);
                let mut values = Vec::with_capacity(len);
                for _ in 0..len {
                    values.push(Self::rand_scalar_value());
                }
                DocValue::Array(values)
            }
            1 => {
                let len = rng.random_range(0..=5);
                let mut obj = Table::new();
                for _ in 0..len {
                    let k = Alphanumeric.sample_string(&mut rng, 5);
                    let v = Self::rand_scalar_value();
                    obj.insert(k, v);
                }
                DocValue::Table(obj)
            }
            _ => Self::rand_scalar_value(),
        }
    }

    fn rand_scalar_value() -> DocValue {
        let mut rng = rng();
        match rng.random_range(0..=3) {
            0 => {
                let v = rng.random_bool(0.5);
                DocValue::Bool(v)
            }
            1 => {
                let s = Alphanumeric.sample_string(&mut rng, 5);
                DocValue::String(s)
            }
            2 => match rng.random_range(0..=2) {
                0 => {
                    let n: u64 = rng.random_range(0..=100000);
                    DocValue::UInt(n)
                }
                1 => {
                    let n: i64 = rng.random_range(-100000..=100000);
                    DocValue::Int(n)
                }
                _ => {
                    let n: f64 = rng.random_range(-4000.0..1.3e5);
                    DocValue::Float(n)
                }
            },
            _ => DocValue::Null,
        }
    }
}

/// Conversion out of a [`DocValue`], the read-side customization point.
///
/// Implementations receive the value itself rather than a pre-decoded
/// payload, so container conversions can walk children on their own.
pub trait FromDoc: Sized {
    fn from_doc(value: &DocValue) -> Result<Self>;
}

impl FromDoc for DocValue {
    fn from_doc(value: &DocValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromDoc for bool {
    fn from_doc(value: &DocValue) -> Result<Self> {
        value.get_bool()
    }
}

impl FromDoc for String {
    fn from_doc(value: &DocValue) -> Result<Self> {
        value.get_str().map(|s| s.to_string())
    }
}

macro_rules! from_doc_number {
    ($($ty:ident)*) => {
        $(
            impl FromDoc for $ty {
                fn from_doc(value: &DocValue) -> Result<Self> {
                    value.get_number::<$ty>()
                }
            }
        )*
    };
}

from_doc_number! {
    i8 i16 i32 i64 isize
    u8 u16 u32 u64 usize
    f32 f64
}

impl<T: FromDoc> FromDoc for Vec<T> {
    fn from_doc(value: &DocValue) -> Result<Self> {
        let arr = value.get_array()?;
        let mut out = Vec::with_capacity(arr.len());
        for v in arr {
            out.push(T::from_doc(v)?);
        }
        Ok(out)
    }
}

impl<T: FromDoc> FromDoc for Option<T> {
    fn from_doc(value: &DocValue) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_doc(value).map(Some)
        }
    }
}
