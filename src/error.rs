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

use std::fmt::Display;
use std::fmt::Formatter;

use crate::value::ValueType;

pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by this crate.
///
/// Every fallible `read`/`write` style operation returns one of these; the
/// `try_*` variants convert the recoverable kinds (`InvalidType`,
/// `UnexpectedEof`) into a plain `false` instead.
#[derive(Debug)]
pub enum Error {
    /// A typed read was requested against a value holding a different
    /// discriminant. Carries the expected and actual type tags.
    InvalidType {
        expected: ValueType,
        actual: ValueType,
    },
    /// The underlying byte stream ended before the requested number of
    /// bytes could be obtained.
    UnexpectedEof,
    /// The arena's upstream allocator refused to provide more memory.
    AllocationFailure,
    /// A container conversion that would silently discard data, such as
    /// switching a non-empty table into array mode.
    AmbiguousConversion,
    /// An error reported by an I/O backend.
    Io(std::io::Error),
    Message(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidType { expected, actual } => {
                write!(f, "invalid value type, expected {expected}, got {actual}")
            }
            Error::UnexpectedEof => write!(f, "unexpected end of stream"),
            Error::AllocationFailure => write!(f, "arena allocation failure"),
            Error::AmbiguousConversion => {
                write!(f, "ambiguous container conversion would discard data")
            }
            Error::Io(e) => write!(f, "io error: {e}"),
            Error::Message(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl Error {
    pub(crate) fn mismatch(expected: ValueType, actual: ValueType) -> Error {
        Error::InvalidType { expected, actual }
    }
}
