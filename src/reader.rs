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

use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;

/// A byte source an [`ArchiveReader`] can be bound to.
///
/// Nothing at this layer errors: failure is communicated as a short count
/// from `getn`/`bump` or as `None` from `peek`/`take`, and it is the
/// archive above that turns a short read into an error.
pub trait ReadSource {
    /// Copies up to `dst.len()` bytes into `dst` and returns the count
    /// actually copied. A short count signals end of stream.
    fn getn(&mut self, dst: &mut [u8]) -> usize;

    /// Skips up to `n` bytes and returns the count actually skipped.
    fn bump(&mut self, n: usize) -> usize;

    /// The current position in bytes from the start of the stream.
    fn tell(&mut self) -> u64;

    /// The next byte without consuming it, or `None` at end of stream.
    fn peek(&mut self) -> Option<u8>;

    /// Consumes and returns the next byte, or `None` at end of stream.
    fn take(&mut self) -> Option<u8>;
}

/// A bounds-checked cursor over caller-owned memory. Reads clamp to the
/// remaining length; running out of bytes is the end-of-stream signal.
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> SliceSource<'a> {
        SliceSource { data, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl ReadSource for SliceSource<'_> {
    fn getn(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.remaining());
        dst[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    fn bump(&mut self, n: usize) -> usize {
        let n = n.min(self.remaining());
        self.pos += n;
        n
    }

    fn tell(&mut self) -> u64 {
        self.pos as u64
    }

    fn peek(&mut self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn take(&mut self) -> Option<u8> {
        let b = self.data.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }
}

/// Adapts any seekable `std::io` reader (a file, a cursor, a buffered
/// stream) into a [`ReadSource`]. `peek` reads one byte and seeks back.
/// I/O errors collapse into the short-read signal, per the layer
/// contract; the source borrows the reader and never owns it.
pub struct IoSource<'a, R: Read + Seek> {
    inner: &'a mut R,
}

impl<'a, R: Read + Seek> IoSource<'a, R> {
    pub fn new(inner: &'a mut R) -> IoSource<'a, R> {
        IoSource { inner }
    }
}

impl<R: Read + Seek> ReadSource for IoSource<'_, R> {
    fn getn(&mut self, dst: &mut [u8]) -> usize {
        let mut filled = 0;
        while filled < dst.len() {
            match self.inner.read(&mut dst[filled..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => filled += n,
            }
        }
        filled
    }

    fn bump(&mut self, n: usize) -> usize {
        let here = match self.inner.stream_position() {
            Ok(p) => p,
            Err(_) => return 0,
        };
        let end = match self.inner.seek(SeekFrom::End(0)) {
            Ok(p) => p,
            Err(_) => return 0,
        };
        let skipped = (n as u64).min(end.saturating_sub(here));
        match self.inner.seek(SeekFrom::Start(here + skipped)) {
            Ok(_) => skipped as usize,
            Err(_) => 0,
        }
    }

    fn tell(&mut self) -> u64 {
        self.inner.stream_position().unwrap_or(0)
    }

    fn peek(&mut self) -> Option<u8> {
        let b = self.take()?;
        self.inner.seek(SeekFrom::Current(-1)).ok()?;
        Some(b)
    }

    fn take(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            _ => None,
        }
    }
}

/// Bridges caller-supplied callbacks into a [`ReadSource`], for backends
/// this crate knows nothing about. The callback fills a destination
/// buffer and returns the count copied, with a short count meaning end of
/// stream; position tracking and single-byte lookahead are handled here.
pub struct CallbackSource<'a> {
    read: &'a mut dyn FnMut(&mut [u8]) -> usize,
    pos: u64,
    lookahead: Option<u8>,
}

impl<'a> CallbackSource<'a> {
    pub fn new(read: &'a mut dyn FnMut(&mut [u8]) -> usize) -> CallbackSource<'a> {
        CallbackSource {
            read,
            pos: 0,
            lookahead: None,
        }
    }
}

impl ReadSource for CallbackSource<'_> {
    fn getn(&mut self, dst: &mut [u8]) -> usize {
        if dst.is_empty() {
            return 0;
        }
        let mut filled = 0;
        if let Some(b) = self.lookahead.take() {
            dst[0] = b;
            filled = 1;
        }
        while filled < dst.len() {
            let n = (self.read)(&mut dst[filled..]);
            if n == 0 {
                break;
            }
            filled += n;
        }
        self.pos += filled as u64;
        filled
    }

    fn bump(&mut self, n: usize) -> usize {
        let mut scratch = [0u8; 64];
        let mut skipped = 0;
        while skipped < n {
            let want = (n - skipped).min(scratch.len());
            let got = self.getn(&mut scratch[..want]);
            if got == 0 {
                break;
            }
            skipped += got;
        }
        skipped
    }

    fn tell(&mut self) -> u64 {
        // pos counts bytes consumed by the caller; a byte sitting in the
        // lookahead slot is not consumed yet.
        self.pos
    }

    fn peek(&mut self) -> Option<u8> {
        if self.lookahead.is_none() {
            let mut byte = [0u8; 1];
            if (self.read)(&mut byte) == 1 {
                self.lookahead = Some(byte[0]);
            }
        }
        self.lookahead
    }

    fn take(&mut self) -> Option<u8> {
        if let Some(b) = self.lookahead.take() {
            self.pos += 1;
            return Some(b);
        }
        let mut byte = [0u8; 1];
        if (self.read)(&mut byte) == 1 {
            self.pos += 1;
            Some(byte[0])
        } else {
            None
        }
    }
}

/// A small, by-value handle over some byte source.
///
/// The handle borrows its backend for its own lifetime and never owns it.
/// A default-constructed handle is empty: every operation on it reports
/// end of stream until a backend is bound.
#[derive(Default)]
pub struct ArchiveReader<'a> {
    source: Option<&'a mut dyn ReadSource>,
}

impl<'a> ArchiveReader<'a> {
    pub fn new(source: &'a mut dyn ReadSource) -> ArchiveReader<'a> {
        ArchiveReader {
            source: Some(source),
        }
    }

    /// Whether no backend is bound.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// Binds a backend, replacing any previous one.
    pub fn bind(&mut self, source: &'a mut dyn ReadSource) {
        self.source = Some(source);
    }

    pub fn getn(&mut self, dst: &mut [u8]) -> usize {
        match self.source.as_deref_mut() {
            Some(source) => source.getn(dst),
            None => 0,
        }
    }

    pub fn bump(&mut self, n: usize) -> usize {
        match self.source.as_deref_mut() {
            Some(source) => source.bump(n),
            None => 0,
        }
    }

    pub fn tell(&mut self) -> u64 {
        match self.source.as_deref_mut() {
            Some(source) => source.tell(),
            None => 0,
        }
    }

    pub fn peek(&mut self) -> Option<u8> {
        self.source.as_deref_mut()?.peek()
    }

    pub fn take(&mut self) -> Option<u8> {
        self.source.as_deref_mut()?.take()
    }
}
