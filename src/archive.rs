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

use std::io::ErrorKind;
use std::marker::PhantomData;

use byteorder::ByteOrder;

use crate::error::Error;
use crate::error::Result;
use crate::reader::ArchiveReader;
use crate::writer::ArchiveWriter;

/// Streams primitive values into a byte sink with the wire byte order
/// fixed at the type level (`byteorder::BigEndian` or `LittleEndian`).
///
/// Composite types go through the [`Encode`] hook, which receives the
/// archive itself so implementations drive multi-field writes against the
/// cursor. Scalars are written in their natural width; strings are
/// null-terminated with no length prefix (the historical primitive-path
/// format — prefer an explicit length plus [`write_bytes`] in new
/// formats); byte blocks are copied verbatim.
///
/// [`write_bytes`]: OutputArchive::write_bytes
pub struct OutputArchive<'a, E: ByteOrder> {
    writer: ArchiveWriter<'a>,
    endian: PhantomData<E>,
}

impl<'a, E: ByteOrder> OutputArchive<'a, E> {
    pub fn new(writer: ArchiveWriter<'a>) -> OutputArchive<'a, E> {
        OutputArchive {
            writer,
            endian: PhantomData,
        }
    }

    /// Current position of the underlying writer.
    pub fn tell(&mut self) -> u64 {
        self.writer.tell()
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<()> {
        if self.writer.flush() {
            Ok(())
        } else {
            Err(Error::Io(ErrorKind::WriteZero.into()))
        }
    }

    fn put_exact(&mut self, bytes: &[u8]) -> Result<()> {
        if self.writer.putn(bytes) == bytes.len() {
            Ok(())
        } else {
            Err(Error::Io(ErrorKind::WriteZero.into()))
        }
    }

    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.put_exact(&[v as u8])
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.put_exact(&[v])
    }

    pub fn write_i8(&mut self, v: i8) -> Result<()> {
        self.put_exact(&[v as u8])
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        let mut buf = [0u8; 2];
        E::write_u16(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_i16(&mut self, v: i16) -> Result<()> {
        let mut buf = [0u8; 2];
        E::write_i16(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        let mut buf = [0u8; 4];
        E::write_u32(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        let mut buf = [0u8; 4];
        E::write_i32(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        let mut buf = [0u8; 8];
        E::write_u64(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        let mut buf = [0u8; 8];
        E::write_i64(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_f32(&mut self, v: f32) -> Result<()> {
        let mut buf = [0u8; 4];
        E::write_f32(&mut buf, v);
        self.put_exact(&buf)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        let mut buf = [0u8; 8];
        E::write_f64(&mut buf, v);
        self.put_exact(&buf)
    }

    /// Writes the string's bytes followed by a terminating NUL. A string
    /// containing NUL itself cannot round-trip through this format.
    pub fn write_str(&mut self, v: &str) -> Result<()> {
        self.put_exact(v.as_bytes())?;
        self.put_exact(&[0])
    }

    /// Writes a fixed-size byte block verbatim.
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.put_exact(v)
    }

    /// Serializes a composite value through its [`Encode`] hook.
    pub fn write<T: Encode>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }
}

/// Reads primitive values from a byte source with the wire byte order
/// fixed at the type level, the counterpart of [`OutputArchive`].
///
/// Every `read_*` errors with [`Error::UnexpectedEof`] when the source
/// cannot supply enough bytes; the `try_read_*` family reports the same
/// condition as `false` and never errors.
pub struct InputArchive<'a, E: ByteOrder> {
    reader: ArchiveReader<'a>,
    endian: PhantomData<E>,
}

impl<'a, E: ByteOrder> InputArchive<'a, E> {
    pub fn new(reader: ArchiveReader<'a>) -> InputArchive<'a, E> {
        InputArchive {
            reader,
            endian: PhantomData,
        }
    }

    /// Current position of the underlying reader.
    pub fn tell(&mut self) -> u64 {
        self.reader.tell()
    }

    /// Skips `n` bytes, erroring if the stream ends first.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        if self.reader.bump(n) == n {
            Ok(())
        } else {
            Err(Error::UnexpectedEof)
        }
    }

    fn get_exact(&mut self, dst: &mut [u8]) -> Result<()> {
        if self.reader.getn(dst) == dst.len() {
            Ok(())
        } else {
            Err(Error::UnexpectedEof)
        }
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let mut buf = [0u8; 1];
        self.get_exact(&mut buf)?;
        Ok(buf[0] != 0)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.get_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.get_exact(&mut buf)?;
        Ok(E::read_u16(&buf))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.get_exact(&mut buf)?;
        Ok(E::read_i16(&buf))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.get_exact(&mut buf)?;
        Ok(E::read_u32(&buf))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let mut buf = [0u8; 4];
        self.get_exact(&mut buf)?;
        Ok(E::read_i32(&buf))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        self.get_exact(&mut buf)?;
        Ok(E::read_u64(&buf))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let mut buf = [0u8; 8];
        self.get_exact(&mut buf)?;
        Ok(E::read_i64(&buf))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let mut buf = [0u8; 4];
        self.get_exact(&mut buf)?;
        Ok(E::read_f32(&buf))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let mut buf = [0u8; 8];
        self.get_exact(&mut buf)?;
        Ok(E::read_f64(&buf))
    }

    /// Reads bytes up to a terminating NUL. Errors if the stream ends
    /// before the terminator, or if the bytes are not valid UTF-8.
    pub fn read_str(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        loop {
            let b = self.reader.take().ok_or(Error::UnexpectedEof)?;
            if b == 0 {
                break;
            }
            bytes.push(b);
        }
        String::from_utf8(bytes).map_err(|_| Error::Message("invalid utf-8 string".to_string()))
    }

    /// Fills `dst` with a fixed-size byte block.
    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<()> {
        self.get_exact(dst)
    }

    /// Deserializes a composite value through its [`Decode`] hook.
    pub fn read<T: Decode>(&mut self) -> Result<T> {
        T::decode(self)
    }

    /// Deserializes into an existing value in place.
    pub fn read_into<T: Decode>(&mut self, value: &mut T) -> Result<()> {
        value.decode_in_place(self)
    }

    /// Non-throwing variant of [`read_into`](InputArchive::read_into):
    /// reports failure as `false`. The stream position is unspecified
    /// after a failed try.
    pub fn try_read_into<T: Decode>(&mut self, value: &mut T) -> bool {
        self.read_into(value).is_ok()
    }
}

/// The write-side customization point for composite types.
///
/// The hook receives the archive, not a pre-encoded buffer, so one
/// implementation can write any number of fields against the cursor.
pub trait Encode {
    fn encode<E: ByteOrder>(&self, archive: &mut OutputArchive<'_, E>) -> Result<()>;
}

/// The read-side customization point for composite types.
pub trait Decode: Sized {
    fn decode<E: ByteOrder>(archive: &mut InputArchive<'_, E>) -> Result<Self>;

    /// Reads over an existing value. The default decodes a fresh value
    /// and replaces `self`; types with reusable buffers can do better.
    fn decode_in_place<E: ByteOrder>(&mut self, archive: &mut InputArchive<'_, E>) -> Result<()> {
        *self = Self::decode(archive)?;
        Ok(())
    }
}

macro_rules! primitive_codec {
    ($($ty:ident, $write:ident, $read:ident;)*) => {
        $(
            impl Encode for $ty {
                fn encode<E: ByteOrder>(&self, archive: &mut OutputArchive<'_, E>) -> Result<()> {
                    archive.$write(*self)
                }
            }

            impl Decode for $ty {
                fn decode<E: ByteOrder>(archive: &mut InputArchive<'_, E>) -> Result<Self> {
                    archive.$read()
                }
            }
        )*
    };
}

primitive_codec! {
    bool, write_bool, read_bool;
    u8, write_u8, read_u8;
    i8, write_i8, read_i8;
    u16, write_u16, read_u16;
    i16, write_i16, read_i16;
    u32, write_u32, read_u32;
    i32, write_i32, read_i32;
    u64, write_u64, read_u64;
    i64, write_i64, read_i64;
    f32, write_f32, read_f32;
    f64, write_f64, read_f64;
}

impl Encode for str {
    fn encode<E: ByteOrder>(&self, archive: &mut OutputArchive<'_, E>) -> Result<()> {
        archive.write_str(self)
    }
}

impl Encode for String {
    fn encode<E: ByteOrder>(&self, archive: &mut OutputArchive<'_, E>) -> Result<()> {
        archive.write_str(self)
    }
}

impl Decode for String {
    fn decode<E: ByteOrder>(archive: &mut InputArchive<'_, E>) -> Result<Self> {
        archive.read_str()
    }
}

/// Sequences are length-prefixed with a u64 count, unlike the primitive
/// string path; this is the composite-level, self-describing encoding.
impl<T: Encode> Encode for Vec<T> {
    fn encode<E: ByteOrder>(&self, archive: &mut OutputArchive<'_, E>) -> Result<()> {
        archive.write_u64(self.len() as u64)?;
        for item in self {
            item.encode(archive)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<E: ByteOrder>(archive: &mut InputArchive<'_, E>) -> Result<Self> {
        let len = archive.read_u64()? as usize;
        let mut out = Vec::new();
        for _ in 0..len {
            out.push(T::decode(archive)?);
        }
        Ok(out)
    }
}
