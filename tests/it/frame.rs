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
use nodearc::ReadFrame;
use nodearc::WriteFrame;

#[test]
fn test_table_round_trip_in_insertion_order() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    let entries = [("delta", 4i64), ("alpha", 1), ("echo", 5), ("bravo", 2)];
    for (key, n) in entries {
        frame.write_key(key, n).unwrap();
    }

    let mut frame = ReadFrame::new(&doc).unwrap();
    assert_eq!(frame.container_size(), entries.len());
    for (key, n) in entries {
        let (read_key, value) = frame.next().unwrap();
        assert_eq!(read_key, Some(key));
        assert_eq!(value.as_i64(), Some(n));
    }
    assert!(frame.is_end());
    assert!(frame.next().is_none());
}

#[test]
fn test_array_round_trip_positional() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.array_mode().unwrap();
    for n in 0..10i64 {
        frame.write(n).unwrap();
    }

    let mut frame = ReadFrame::new(&doc).unwrap();
    for n in 0..10i64 {
        let got: i64 = frame.read().unwrap();
        assert_eq!(got, n);
    }
    assert!(frame.is_end());
}

#[test]
fn test_auto_key_generation() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.write(1i64).unwrap();
    frame.write(2i64).unwrap();
    frame.write(3i64).unwrap();

    let table = doc.get_table().unwrap();
    let keys: Vec<&str> = table.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["__0", "__1", "__2"]);
}

#[test]
fn test_array_mode_on_empty_table() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    // A fresh frame holds an empty table; switching to array mode is
    // unambiguous.
    frame.array_mode().unwrap();
    frame.write(true).unwrap();
    assert!(doc.is_array());
}

#[test]
fn test_array_mode_on_array_is_noop() {
    let mut doc = DocValue::Array(vec![DocValue::Int(1)]);
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.array_mode().unwrap();
    assert_eq!(doc.array_length(), Some(1));
}

#[test]
fn test_array_mode_on_populated_table_fails() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.write_key("k", 1i64).unwrap();
    let err = frame.array_mode().unwrap_err();
    assert!(matches!(err, Error::AmbiguousConversion));
    // The table is untouched by the failed conversion.
    assert_eq!(doc.get_table().unwrap().len(), 1);
}

#[test]
fn test_write_frame_rejects_scalars() {
    let mut doc = DocValue::Int(3);
    assert!(WriteFrame::new(&mut doc).is_err());
}

#[test]
fn test_read_frame_rejects_scalars() {
    assert!(ReadFrame::new(&DocValue::Bool(true)).is_err());
    assert!(ReadFrame::new(&DocValue::Null).is_err());
}

#[test]
fn test_seek() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.write_key("a", 1i64).unwrap();
    frame.write_key("b", 2i64).unwrap();
    frame.write_key("c", 3i64).unwrap();

    let mut frame = ReadFrame::new(&doc).unwrap();
    let b = frame.seek("b").unwrap();
    assert_eq!(b.as_i64(), Some(2));
    // The cursor sits on the found entry, so reads continue from there.
    let (key, _) = frame.next().unwrap();
    assert_eq!(key, Some("b"));

    assert!(frame.seek("missing").is_none());
    assert!(frame.is_end());
}

#[test]
fn test_read_key() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.write_key("id", 99u64).unwrap();
    frame.write_key("name", "thing").unwrap();

    let mut frame = ReadFrame::new(&doc).unwrap();
    let name: String = frame.read_key("name").unwrap();
    let id: u64 = frame.read_key("id").unwrap();
    assert_eq!(name, "thing");
    assert_eq!(id, 99);
}

#[test]
fn test_try_read_never_errors_and_does_not_advance() {
    let mut doc = DocValue::default();
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.write_key("s", "text").unwrap();

    let mut frame = ReadFrame::new(&doc).unwrap();
    let mut num = 7i64;
    // Type mismatch: reports false, leaves the output and cursor alone.
    assert!(!frame.try_read(&mut num));
    assert_eq!(num, 7);
    let mut text = String::new();
    assert!(frame.try_read(&mut text));
    assert_eq!(text, "text");
    // Exhausted: still just false.
    assert!(!frame.try_read(&mut text));
}

#[test]
fn test_read_past_end_errors() {
    let doc = DocValue::Array(vec![]);
    let mut frame = ReadFrame::new(&doc).unwrap();
    let err = frame.read::<i64>().unwrap_err();
    assert!(matches!(err, Error::UnexpectedEof));
}

#[test]
fn test_reserve_hint_keeps_discriminant() {
    let mut doc = DocValue::Array(vec![DocValue::Int(1)]);
    let mut frame = WriteFrame::new(&mut doc).unwrap();
    frame.reserve(32).unwrap();
    assert_eq!(frame.container_size(), 1);
    assert!(doc.is_array());
}

#[test]
fn test_nested_frames() {
    let mut doc = DocValue::default();
    let mut outer = WriteFrame::new(&mut doc).unwrap();
    let child = outer.next_key("inner").unwrap();
    let mut inner = WriteFrame::new(child).unwrap();
    inner.array_mode().unwrap();
    inner.write(1i64).unwrap();
    inner.write(2i64).unwrap();

    let mut outer = ReadFrame::new(&doc).unwrap();
    let inner_value = outer.seek("inner").unwrap();
    let items: Vec<i64> = inner_value.read().unwrap();
    assert_eq!(items, vec![1, 2]);
}
