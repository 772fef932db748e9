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

//! `nodearc` is a structured serialization library built around a
//! self-describing tree of typed values and a small family of archive
//! abstractions for getting those values into and out of byte streams.
//!
//! ## Pieces
//!
//! - [`DocValue`]: an owned tagged value (null, bool, int, uint, float,
//!   string, array, table). Tables preserve insertion order, and that
//!   order is the canonical iteration order. Exactly one payload is live
//!   at a time; the `as_*_mut` accessors switch the discriminant and
//!   fully drop the previous payload first.
//! - [`WriteFrame`] / [`ReadFrame`]: cursors bound to one container
//!   value, sequencing writes and reads of its children the way an
//!   archive does. Table entries appended without a key get a synthesized
//!   `"__<index>"` key.
//! - [`ArchiveReader`] / [`ArchiveWriter`]: by-value handles over
//!   pluggable byte backends (memory slices, growable buffers, seekable
//!   `std::io` streams, caller callbacks). The handle borrows its backend
//!   and never owns it; failure at this layer is a short count or an EOF
//!   sentinel, never an error.
//! - [`InputArchive`] / [`OutputArchive`]: an endianness-parameterized
//!   primitive codec on top of the handles, for flat serialization where
//!   the structure is implicit. Composite types plug in through the
//!   [`Encode`] and [`Decode`] traits, which receive the archive itself.
//! - [`NodeTree`]: a pooled document representation for append-heavy
//!   builds — interned keys and child nodes come out of two arenas scoped
//!   to the document, released all at once on reset.
//!
//! ## A small round trip
//!
//! ```
//! use nodearc::{DocValue, ReadFrame, WriteFrame};
//!
//! let mut doc = DocValue::default();
//! let mut frame = WriteFrame::new(&mut doc).unwrap();
//! frame.write_key("id", 7u64).unwrap();
//! frame.write_key("name", "widget").unwrap();
//!
//! let mut frame = ReadFrame::new(&doc).unwrap();
//! let id: u64 = frame.read_key("id").unwrap();
//! let name: String = frame.read_key("name").unwrap();
//! assert_eq!((id, name.as_str()), (7, "widget"));
//! ```

mod arena;
mod archive;
mod error;
mod frame;
mod from;
mod iterator;
mod node;
mod reader;
mod tree;
mod value;
mod writer;

pub use arena::ArenaRef;
pub use arena::BufferArena;
pub use archive::Decode;
pub use archive::Encode;
pub use archive::InputArchive;
pub use archive::OutputArchive;
pub use error::Error;
pub use error::Result;
pub use frame::ReadFrame;
pub use frame::WriteFrame;
pub use iterator::ObjectIterator;
pub use node::NodeValue;
pub use node::Run;
pub use node::StrRef;
pub use reader::ArchiveReader;
pub use reader::CallbackSource;
pub use reader::IoSource;
pub use reader::ReadSource;
pub use reader::SliceSource;
pub use tree::NodeId;
pub use tree::NodeTree;
pub use value::DocValue;
pub use value::FromDoc;
pub use value::Table;
pub use value::ValueType;
pub use writer::ArchiveWriter;
pub use writer::CallbackSink;
pub use writer::IoSink;
pub use writer::SliceSink;
pub use writer::StringSink;
pub use writer::VecSink;
pub use writer::WriteSink;
