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

use crate::error::Error;
use crate::error::Result;
use crate::value::DocValue;
use crate::value::FromDoc;
use crate::value::ValueType;

/// Synthesizes the key used when a table entry is appended without one:
/// `"__"` followed by the table's size before the insertion.
fn auto_key(index: usize) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(index);
    let mut key = String::with_capacity(2 + digits.len());
    key.push_str("__");
    key.push_str(digits);
    key
}

/// A write cursor bound to one container value.
///
/// Each `next`/`next_key` call appends a child and hands it back for the
/// caller to fill, so multi-field serialization drives the cursor itself.
/// A `Null` value is switched to an empty Table on frame creation.
pub struct WriteFrame<'a> {
    node: &'a mut DocValue,
}

impl<'a> WriteFrame<'a> {
    /// Binds a write frame to `node`. Errors when the value already holds
    /// a non-container payload other than Null.
    pub fn new(node: &'a mut DocValue) -> Result<WriteFrame<'a>> {
        match node {
            DocValue::Null => {
                node.as_table_mut();
            }
            DocValue::Array(_) | DocValue::Table(_) => {}
            _ => {
                return Err(Error::mismatch(ValueType::Container, node.value_type()));
            }
        }
        Ok(WriteFrame { node })
    }

    /// Appends a child and returns it. In table mode the key is
    /// synthesized from the current size (`"__0"`, `"__1"`, ...).
    pub fn next(&mut self) -> Result<&mut DocValue> {
        match self.node {
            DocValue::Array(arr) => {
                arr.push(DocValue::Null);
                let last = arr.len() - 1;
                Ok(&mut arr[last])
            }
            DocValue::Table(obj) => {
                let key = auto_key(obj.len());
                Ok(obj.entry(key).or_insert(DocValue::Null))
            }
            _ => Err(Error::mismatch(
                ValueType::Container,
                self.node.value_type(),
            )),
        }
    }

    /// Appends a child under `key` and returns it. An existing entry with
    /// the same key is reused in place. Array mode is positional, so the
    /// key is ignored there.
    pub fn next_key(&mut self, key: &str) -> Result<&mut DocValue> {
        match self.node {
            DocValue::Array(arr) => {
                arr.push(DocValue::Null);
                let last = arr.len() - 1;
                Ok(&mut arr[last])
            }
            DocValue::Table(obj) => Ok(obj.entry(key.to_string()).or_insert(DocValue::Null)),
            _ => Err(Error::mismatch(
                ValueType::Container,
                self.node.value_type(),
            )),
        }
    }

    /// Appends a child holding `value`.
    pub fn write<T: Into<DocValue>>(&mut self, value: T) -> Result<()> {
        self.next()?.write(value);
        Ok(())
    }

    /// Appends a child holding `value` under `key`.
    pub fn write_key<T: Into<DocValue>>(&mut self, key: &str, value: T) -> Result<()> {
        self.next_key(key)?.write(value);
        Ok(())
    }

    /// Switches the bound container into array mode. An empty table (or
    /// Null) converts to an empty array; an already-array value is left
    /// alone. A non-empty table errors, since the conversion would
    /// silently discard its keys.
    pub fn array_mode(&mut self) -> Result<()> {
        match self.node {
            DocValue::Array(_) => Ok(()),
            DocValue::Null => {
                self.node.as_array_mut();
                Ok(())
            }
            DocValue::Table(obj) => {
                if obj.is_empty() {
                    self.node.as_array_mut();
                    Ok(())
                } else {
                    Err(Error::AmbiguousConversion)
                }
            }
            _ => Err(Error::mismatch(
                ValueType::Container,
                self.node.value_type(),
            )),
        }
    }

    /// Reservation hint: pre-sizes the bound container for `n` children.
    /// A Null value becomes an empty Table first; the hint never switches
    /// an existing discriminant.
    pub fn reserve(&mut self, n: usize) -> Result<()> {
        match self.node {
            DocValue::Null => {
                self.node.as_table_mut().reserve(n);
                Ok(())
            }
            DocValue::Array(arr) => {
                arr.reserve(n);
                Ok(())
            }
            DocValue::Table(obj) => {
                obj.reserve(n);
                Ok(())
            }
            _ => Err(Error::mismatch(
                ValueType::Container,
                self.node.value_type(),
            )),
        }
    }

    /// Current number of children.
    pub fn container_size(&self) -> usize {
        match &*self.node {
            DocValue::Array(arr) => arr.len(),
            DocValue::Table(obj) => obj.len(),
            _ => 0,
        }
    }
}

/// A read cursor over one container value, advancing through children in
/// insertion order.
pub struct ReadFrame<'a> {
    node: &'a DocValue,
    cursor: usize,
}

impl<'a> ReadFrame<'a> {
    /// Binds a read frame to a container value. Errors on scalars.
    pub fn new(node: &'a DocValue) -> Result<ReadFrame<'a>> {
        if !node.is_container() {
            return Err(Error::mismatch(ValueType::Container, node.value_type()));
        }
        Ok(ReadFrame { node, cursor: 0 })
    }

    /// Number of children of the bound container.
    pub fn container_size(&self) -> usize {
        match self.node {
            DocValue::Array(arr) => arr.len(),
            DocValue::Table(obj) => obj.len(),
            _ => 0,
        }
    }

    /// Whether the cursor is exhausted.
    pub fn is_end(&self) -> bool {
        self.cursor >= self.container_size()
    }

    /// The child under the cursor, without advancing.
    pub fn current(&self) -> Option<(Option<&'a str>, &'a DocValue)> {
        self.entry_at(self.cursor)
    }

    /// Returns the child under the cursor and advances past it.
    pub fn next(&mut self) -> Option<(Option<&'a str>, &'a DocValue)> {
        let entry = self.entry_at(self.cursor)?;
        self.cursor += 1;
        Some(entry)
    }

    /// Moves the cursor to the named child of a table and returns it, or
    /// to the end when the key is absent.
    pub fn seek(&mut self, key: &str) -> Option<&'a DocValue> {
        match self.node {
            DocValue::Table(obj) => match obj.get_index_of(key) {
                Some(index) => {
                    self.cursor = index;
                    obj.get_index(index).map(|(_, v)| v)
                }
                None => {
                    self.cursor = obj.len();
                    None
                }
            },
            _ => {
                self.cursor = self.container_size();
                None
            }
        }
    }

    /// Converts the child under the cursor into a `T` and advances.
    /// Errors with a premature-end error when the cursor is exhausted,
    /// and with a type mismatch when the child is incompatible.
    pub fn read<T: FromDoc>(&mut self) -> Result<T> {
        let (_, value) = self.entry_at(self.cursor).ok_or(Error::UnexpectedEof)?;
        let out = T::from_doc(value)?;
        self.cursor += 1;
        Ok(out)
    }

    /// Seeks to `key` and converts its value. The cursor advances past
    /// the found entry on success.
    pub fn read_key<T: FromDoc>(&mut self, key: &str) -> Result<T> {
        let value = self.seek(key).ok_or(Error::UnexpectedEof)?;
        let out = T::from_doc(value)?;
        self.cursor += 1;
        Ok(out)
    }

    /// Non-throwing variant of [`read`](ReadFrame::read): on failure the
    /// cursor does not advance, `out` is left untouched and `false` is
    /// returned.
    pub fn try_read<T: FromDoc>(&mut self, out: &mut T) -> bool {
        let Some((_, value)) = self.entry_at(self.cursor) else {
            return false;
        };
        match T::from_doc(value) {
            Ok(v) => {
                *out = v;
                self.cursor += 1;
                true
            }
            Err(_) => false,
        }
    }

    fn entry_at(&self, index: usize) -> Option<(Option<&'a str>, &'a DocValue)> {
        match self.node {
            DocValue::Array(arr) => arr.get(index).map(|v| (None, v)),
            DocValue::Table(obj) => obj
                .get_index(index)
                .map(|(k, v)| (Some(k.as_str()), v)),
            _ => None,
        }
    }
}
