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

use std::io::Seek;
use std::io::Write;

/// A byte sink an [`ArchiveWriter`] can be bound to.
///
/// Failure is communicated as a short count from `putn` or `false` from
/// `put`/`flush`; this layer never errors on its own.
pub trait WriteSink {
    /// Writes up to `src.len()` bytes and returns the count actually
    /// written. A short count signals a full or failed backend.
    fn putn(&mut self, src: &[u8]) -> usize;

    /// Writes a single byte, reporting success.
    fn put(&mut self, b: u8) -> bool {
        self.putn(&[b]) == 1
    }

    /// The current position in bytes from the start of the stream.
    fn tell(&mut self) -> u64;

    /// Forces any buffering through to the backend.
    fn flush(&mut self) -> bool {
        true
    }
}

/// A bounds-checked cursor over a caller-owned fixed buffer. Writes clamp
/// to the remaining space.
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> SliceSink<'a> {
        SliceSink { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The written prefix of the buffer.
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

impl WriteSink for SliceSink<'_> {
    fn putn(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.remaining());
        self.buf[self.pos..self.pos + n].copy_from_slice(&src[..n]);
        self.pos += n;
        n
    }

    fn tell(&mut self) -> u64 {
        self.pos as u64
    }
}

/// Appends to a caller-owned growable byte buffer.
pub struct VecSink<'a> {
    buf: &'a mut Vec<u8>,
}

impl<'a> VecSink<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> VecSink<'a> {
        VecSink { buf }
    }
}

impl WriteSink for VecSink<'_> {
    fn putn(&mut self, src: &[u8]) -> usize {
        if self.buf.try_reserve(src.len()).is_err() {
            return 0;
        }
        self.buf.extend_from_slice(src);
        src.len()
    }

    fn tell(&mut self) -> u64 {
        self.buf.len() as u64
    }
}

/// Appends to a caller-owned string. A chunk that is not valid UTF-8 is
/// rejected whole (written count 0), so the string can never be torn.
pub struct StringSink<'a> {
    buf: &'a mut String,
}

impl<'a> StringSink<'a> {
    pub fn new(buf: &'a mut String) -> StringSink<'a> {
        StringSink { buf }
    }
}

impl WriteSink for StringSink<'_> {
    fn putn(&mut self, src: &[u8]) -> usize {
        match std::str::from_utf8(src) {
            Ok(s) => {
                self.buf.push_str(s);
                src.len()
            }
            Err(_) => 0,
        }
    }

    fn tell(&mut self) -> u64 {
        self.buf.len() as u64
    }
}

/// Adapts any seekable `std::io` writer into a [`WriteSink`]. I/O errors
/// collapse into the short-write signal; the sink borrows the writer and
/// never owns it.
pub struct IoSink<'a, W: Write + Seek> {
    inner: &'a mut W,
}

impl<'a, W: Write + Seek> IoSink<'a, W> {
    pub fn new(inner: &'a mut W) -> IoSink<'a, W> {
        IoSink { inner }
    }
}

impl<W: Write + Seek> WriteSink for IoSink<'_, W> {
    fn putn(&mut self, src: &[u8]) -> usize {
        let mut written = 0;
        while written < src.len() {
            match self.inner.write(&src[written..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => written += n,
            }
        }
        written
    }

    fn tell(&mut self) -> u64 {
        self.inner.stream_position().unwrap_or(0)
    }

    fn flush(&mut self) -> bool {
        self.inner.flush().is_ok()
    }
}

/// Bridges a caller-supplied callback into a [`WriteSink`]. The callback
/// consumes a chunk and returns the count it accepted.
pub struct CallbackSink<'a> {
    write: &'a mut dyn FnMut(&[u8]) -> usize,
    pos: u64,
}

impl<'a> CallbackSink<'a> {
    pub fn new(write: &'a mut dyn FnMut(&[u8]) -> usize) -> CallbackSink<'a> {
        CallbackSink { write, pos: 0 }
    }
}

impl WriteSink for CallbackSink<'_> {
    fn putn(&mut self, src: &[u8]) -> usize {
        let mut written = 0;
        while written < src.len() {
            let n = (self.write)(&src[written..]);
            if n == 0 {
                break;
            }
            written += n;
        }
        self.pos += written as u64;
        written
    }

    fn tell(&mut self) -> u64 {
        self.pos
    }
}

/// A small, by-value handle over some byte sink.
///
/// Like its read counterpart, the handle borrows its backend and never
/// owns it; a default-constructed handle is empty and accepts nothing.
#[derive(Default)]
pub struct ArchiveWriter<'a> {
    sink: Option<&'a mut dyn WriteSink>,
}

impl<'a> ArchiveWriter<'a> {
    pub fn new(sink: &'a mut dyn WriteSink) -> ArchiveWriter<'a> {
        ArchiveWriter { sink: Some(sink) }
    }

    /// Whether no backend is bound.
    pub fn is_empty(&self) -> bool {
        self.sink.is_none()
    }

    /// Binds a backend, replacing any previous one.
    pub fn bind(&mut self, sink: &'a mut dyn WriteSink) {
        self.sink = Some(sink);
    }

    pub fn putn(&mut self, src: &[u8]) -> usize {
        match self.sink.as_deref_mut() {
            Some(sink) => sink.putn(src),
            None => 0,
        }
    }

    pub fn put(&mut self, b: u8) -> bool {
        match self.sink.as_deref_mut() {
            Some(sink) => sink.put(b),
            None => false,
        }
    }

    pub fn tell(&mut self) -> u64 {
        match self.sink.as_deref_mut() {
            Some(sink) => sink.tell(),
            None => 0,
        }
    }

    pub fn flush(&mut self) -> bool {
        match self.sink.as_deref_mut() {
            Some(sink) => sink.flush(),
            None => false,
        }
    }
}
