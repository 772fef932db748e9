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
use crate::value::ValueType;

/// A single traversal abstraction over both container kinds.
///
/// Array children are positional and yield no key; table children yield
/// their key. Downstream serialization logic branches on
/// [`has_key`](ObjectIterator::has_key) instead of on the container kind.
pub enum ObjectIterator<'a> {
    Array(std::slice::Iter<'a, DocValue>),
    Table(indexmap::map::Iter<'a, String, DocValue>),
}

impl<'a> ObjectIterator<'a> {
    /// Builds an iterator over the children of a container value. Errors
    /// when `value` is a scalar.
    pub fn new(value: &'a DocValue) -> Result<ObjectIterator<'a>> {
        match value {
            DocValue::Array(arr) => Ok(ObjectIterator::Array(arr.iter())),
            DocValue::Table(obj) => Ok(ObjectIterator::Table(obj.iter())),
            _ => Err(Error::mismatch(ValueType::Container, value.value_type())),
        }
    }

    /// Whether items yielded by this iterator carry a key.
    pub fn has_key(&self) -> bool {
        matches!(self, ObjectIterator::Table(_))
    }
}

impl<'a> Iterator for ObjectIterator<'a> {
    type Item = (Option<&'a str>, &'a DocValue);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            ObjectIterator::Array(iter) => iter.next().map(|v| (None, v)),
            ObjectIterator::Table(iter) => iter.next().map(|(k, v)| (Some(k.as_str()), v)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            ObjectIterator::Array(iter) => iter.size_hint(),
            ObjectIterator::Table(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for ObjectIterator<'_> {}
