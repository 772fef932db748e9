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

use core::iter::FromIterator;

use ordered_float::OrderedFloat;
use serde_json::Number as JsonNumber;
use serde_json::Value as JsonValue;

use crate::value::DocValue;
use crate::value::Table;

macro_rules! from_signed_integer {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for DocValue {
                fn from(n: $ty) -> Self {
                    DocValue::Int(n as i64)
                }
            }
        )*
    };
}

macro_rules! from_unsigned_integer {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for DocValue {
                fn from(n: $ty) -> Self {
                    DocValue::UInt(n as u64)
                }
            }
        )*
    };
}

macro_rules! from_float {
    ($($ty:ident)*) => {
        $(
            impl From<$ty> for DocValue {
                fn from(n: $ty) -> Self {
                    DocValue::Float(n as f64)
                }
            }
        )*
    };
}

from_signed_integer! {
    i8 i16 i32 i64 isize
}

from_unsigned_integer! {
    u8 u16 u32 u64 usize
}

from_float! {
    f32 f64
}

impl From<OrderedFloat<f32>> for DocValue {
    fn from(f: OrderedFloat<f32>) -> Self {
        DocValue::Float(f.0 as f64)
    }
}

impl From<OrderedFloat<f64>> for DocValue {
    fn from(f: OrderedFloat<f64>) -> Self {
        DocValue::Float(f.0)
    }
}

impl From<bool> for DocValue {
    fn from(f: bool) -> Self {
        DocValue::Bool(f)
    }
}

impl From<String> for DocValue {
    fn from(f: String) -> Self {
        DocValue::String(f)
    }
}

impl From<&str> for DocValue {
    fn from(f: &str) -> Self {
        DocValue::String(f.to_string())
    }
}

impl From<()> for DocValue {
    fn from(_: ()) -> Self {
        DocValue::Null
    }
}

impl From<Table> for DocValue {
    fn from(o: Table) -> Self {
        DocValue::Table(o)
    }
}

impl<T: Into<DocValue>> From<Vec<T>> for DocValue {
    fn from(f: Vec<T>) -> Self {
        DocValue::Array(f.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<DocValue>> From<&[T]> for DocValue {
    fn from(f: &[T]) -> Self {
        DocValue::Array(f.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<DocValue>> From<Option<T>> for DocValue {
    fn from(f: Option<T>) -> Self {
        match f {
            Some(v) => v.into(),
            None => DocValue::Null,
        }
    }
}

impl<T: Into<DocValue>> FromIterator<T> for DocValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        DocValue::Array(iter.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<DocValue>> FromIterator<(K, V)> for DocValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DocValue::Table(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Explicit per-variant constructors, for call sites where conversion
/// through `From` would be ambiguous.
impl DocValue {
    pub fn from_null() -> DocValue {
        DocValue::Null
    }

    pub fn from_bool(v: bool) -> DocValue {
        DocValue::Bool(v)
    }

    pub fn from_int(v: i64) -> DocValue {
        DocValue::Int(v)
    }

    pub fn from_uint(v: u64) -> DocValue {
        DocValue::UInt(v)
    }

    pub fn from_float(v: f64) -> DocValue {
        DocValue::Float(v)
    }

    pub fn from_string(v: impl Into<String>) -> DocValue {
        DocValue::String(v.into())
    }

    pub fn from_array(v: impl IntoIterator<Item = DocValue>) -> DocValue {
        DocValue::Array(v.into_iter().collect())
    }

    pub fn from_table(v: impl IntoIterator<Item = (String, DocValue)>) -> DocValue {
        DocValue::Table(v.into_iter().collect())
    }
}

impl From<&JsonValue> for DocValue {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => DocValue::Null,
            JsonValue::Bool(v) => DocValue::Bool(*v),
            JsonValue::Number(v) => from_json_number(v),
            JsonValue::String(v) => DocValue::String(v.clone()),
            JsonValue::Array(arr) => DocValue::Array(arr.iter().map(Into::into).collect()),
            JsonValue::Object(obj) => DocValue::Table(
                obj.iter()
                    .map(|(k, v)| (k.clone(), DocValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<JsonValue> for DocValue {
    fn from(value: JsonValue) -> Self {
        DocValue::from(&value)
    }
}

impl From<&DocValue> for JsonValue {
    fn from(value: &DocValue) -> Self {
        match value {
            DocValue::Null => JsonValue::Null,
            DocValue::Bool(v) => JsonValue::Bool(*v),
            DocValue::Int(v) => JsonValue::Number(JsonNumber::from(*v)),
            DocValue::UInt(v) => JsonValue::Number(JsonNumber::from(*v)),
            DocValue::Float(v) => JsonNumber::from_f64(*v)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DocValue::String(v) => JsonValue::String(v.clone()),
            DocValue::Array(arr) => JsonValue::Array(arr.iter().map(Into::into).collect()),
            DocValue::Table(obj) => JsonValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn from_json_number(n: &JsonNumber) -> DocValue {
    if let Some(v) = n.as_u64() {
        if n.as_i64().is_some() {
            // Fits both; keep the signed kind for small positives.
            DocValue::Int(v as i64)
        } else {
            DocValue::UInt(v)
        }
    } else if let Some(v) = n.as_i64() {
        DocValue::Int(v)
    } else {
        DocValue::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}
