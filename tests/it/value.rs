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

use nodearc::DocValue;
use nodearc::Error;
use nodearc::ObjectIterator;
use nodearc::ValueType;

#[test]
fn test_default_is_null() {
    let value = DocValue::default();
    assert!(value.is_null());
    assert_eq!(value.value_type(), ValueType::Null);
}

#[test]
fn test_type_switch_discriminant() {
    let mut value = DocValue::default();

    *value.as_bool_mut() = true;
    assert_eq!(value.value_type(), ValueType::Bool);
    assert_eq!(value.as_bool(), Some(true));

    *value.as_int_mut() = -5;
    assert_eq!(value.value_type(), ValueType::Int);
    // The Bool payload is gone after the switch.
    assert_eq!(value.as_bool(), None);

    value.as_string_mut().push_str("abc");
    assert_eq!(value.value_type(), ValueType::String);
    assert_eq!(value.as_str(), Some("abc"));

    value.as_array_mut().push(DocValue::Null);
    assert_eq!(value.value_type(), ValueType::Array);
    assert_eq!(value.array_length(), Some(1));

    value.as_table_mut();
    assert_eq!(value.value_type(), ValueType::Table);
    assert_eq!(value.as_table().map(|t| t.len()), Some(0));

    value.set_null();
    assert!(value.is_null());
}

#[test]
fn test_switch_to_same_type_keeps_payload() {
    let mut value = DocValue::String("keep".to_string());
    value.as_string_mut().push_str(" me");
    assert_eq!(value.as_str(), Some("keep me"));
}

#[test]
fn test_mismatched_get_reports_both_tags() {
    let value = DocValue::String("abc".to_string());
    let err = value.get_bool().unwrap_err();
    match err {
        Error::InvalidType { expected, actual } => {
            assert_eq!(expected, ValueType::Bool);
            assert_eq!(actual, ValueType::String);
        }
        other => panic!("unexpected error: {other}"),
    }
    let msg = value.get_bool().unwrap_err().to_string();
    assert!(msg.contains("bool"));
    assert!(msg.contains("string"));
}

#[test]
fn test_numeric_coercion() {
    assert_eq!(DocValue::Int(7).get_number::<u8>().unwrap(), 7u8);
    assert_eq!(DocValue::UInt(7).get_number::<i64>().unwrap(), 7i64);
    assert_eq!(DocValue::Float(2.0).get_number::<i32>().unwrap(), 2i32);
    assert_eq!(DocValue::Int(-1).get_number::<f64>().unwrap(), -1.0);

    // Out of range is an error, not a wrap.
    assert!(DocValue::Int(300).get_number::<u8>().is_err());
    // Non-numeric kinds mismatch with the number category tag.
    let err = DocValue::Bool(true).get_number::<i32>().unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidType {
            expected: ValueType::Number,
            ..
        }
    ));
}

#[test]
fn test_read_and_try_read() {
    let value = DocValue::Int(41);
    let n: i64 = value.read().unwrap();
    assert_eq!(n, 41);

    let mut out = String::from("untouched");
    assert!(!value.try_read(&mut out));
    assert_eq!(out, "untouched");

    let mut num = 0u32;
    assert!(value.try_read(&mut num));
    assert_eq!(num, 41);
}

#[test]
fn test_write_discards_previous_content() {
    let mut value: DocValue = vec![("a", 1i64), ("b", 2)].into_iter().collect();
    value.write(5u64);
    assert_eq!(value, DocValue::UInt(5));
    value.write(vec![1i64, 2]);
    assert_eq!(value.array_length(), Some(2));
}

#[test]
fn test_iterator_over_array() {
    let value: DocValue = vec![1i64, 2, 3].into_iter().collect();
    let iter = ObjectIterator::new(&value).unwrap();
    assert!(!iter.has_key());
    let items: Vec<i64> = iter.map(|(k, v)| {
        assert!(k.is_none());
        v.as_i64().unwrap()
    }).collect();
    assert_eq!(items, vec![1, 2, 3]);
}

#[test]
fn test_iterator_over_table_keeps_insertion_order() {
    let value: DocValue = vec![("z", 1i64), ("a", 2), ("m", 3)].into_iter().collect();
    let iter = ObjectIterator::new(&value).unwrap();
    assert!(iter.has_key());
    let keys: Vec<&str> = iter.map(|(k, _)| k.unwrap()).collect();
    // Insertion order, not sorted order.
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_iterator_rejects_scalars() {
    assert!(ObjectIterator::new(&DocValue::Int(1)).is_err());
    assert!(ObjectIterator::new(&DocValue::Null).is_err());
}

#[test]
fn test_cross_kind_numeric_equality() {
    assert_eq!(DocValue::Int(5), DocValue::UInt(5));
    assert_eq!(DocValue::Int(2), DocValue::Float(2.0));
    assert!(DocValue::Int(-1) < DocValue::UInt(0));
}

#[test]
fn test_display() {
    let value: DocValue = vec![
        ("flag", DocValue::Bool(false)),
        ("n", DocValue::Int(3)),
        ("s", DocValue::String("hi".to_string())),
    ]
    .into_iter()
    .collect();
    assert_eq!(value.to_string(), r#"{"flag":false,"n":3,"s":"hi"}"#);
    assert_eq!(DocValue::Null.to_string(), "null");
    assert_eq!(
        DocValue::Array(vec![DocValue::UInt(1), DocValue::Null]).to_string(),
        "[1,null]"
    );
}

#[test]
fn test_serde_serialize() {
    let value: DocValue = vec![("a", DocValue::Int(1)), ("b", DocValue::Null)]
        .into_iter()
        .collect();
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"{"a":1,"b":null}"#);
}

#[test]
fn test_rand_value_is_well_formed() {
    for _ in 0..64 {
        let value = DocValue::rand_value();
        // Whatever shape comes out, the discriminant accessors agree.
        match value.value_type() {
            ValueType::Array => assert!(value.is_array()),
            ValueType::Table => assert!(value.is_table()),
            _ => assert!(value.is_scalar()),
        }
    }
}
