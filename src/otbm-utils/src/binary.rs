//! Freestanding primitive readers/writers for little-endian binary data.
//!
//! These operate directly on any [`Read`]/[`Write`] implementor and
//! know nothing about node framing; [`otbm_node`](../otbm_node/index.html)
//! layers escape-stuffing on top of them.

use std::io::{self, Read, Write};

/// Reads a `u8` off the stream.
#[inline]
pub fn uint8<R: Read>(data: &mut R) -> io::Result<u8> {
    let mut v = [0; 1];
    data.read_exact(&mut v)?;
    Ok(v[0])
}

/// Writes a `u8` to the stream.
#[inline]
pub fn write_uint8<W: Write>(out: &mut W, v: u8) -> io::Result<()> {
    out.write_all(&[v])
}

macro_rules! int_read_impl {
    ($($fn:ident() -> $ty:ty),* $(,)*) => {
        $(
            #[doc = concat!("Reads a little-endian [`", stringify!($ty), "`] off the stream.")]
            #[inline]
            pub fn $fn<R: Read>(data: &mut R) -> io::Result<$ty> {
                let mut v = [0; std::mem::size_of::<$ty>()];
                data.read_exact(&mut v)?;
                Ok(<$ty>::from_le_bytes(v))
            }
        )*
    };
}

macro_rules! int_write_impl {
    ($($fn:ident($ty:ty)),* $(,)*) => {
        $(
            #[doc = concat!("Writes a little-endian [`", stringify!($ty), "`] to the stream.")]
            #[inline]
            pub fn $fn<W: Write>(out: &mut W, v: $ty) -> io::Result<()> {
                out.write_all(&v.to_le_bytes())
            }
        )*
    };
}

int_read_impl! {
    uint16() -> u16,
    uint32() -> u32,
}

int_write_impl! {
    write_uint16(u16),
    write_uint32(u32),
}

/// Reads a `u16`-length-prefixed, byte-preserving string. No UTF-8
/// validation and no terminator, matching MAP's wire format exactly.
#[inline]
pub fn raw_string<R: Read>(data: &mut R) -> io::Result<Vec<u8>> {
    let len = uint16(data)? as usize;
    let mut buf = vec![0; len];
    data.read_exact(&mut buf)?;
    Ok(buf)
}

/// Writes a `u16`-length-prefixed, byte-preserving string.
#[inline]
pub fn write_raw_string<W: Write>(out: &mut W, v: &[u8]) -> io::Result<()> {
    write_uint16(out, v.len() as u16)?;
    out.write_all(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip_ints() {
        let mut buf = Vec::new();
        write_uint8(&mut buf, 0x7f).unwrap();
        write_uint16(&mut buf, 0x1234).unwrap();
        write_uint32(&mut buf, 0xdead_beef).unwrap();

        let mut cur = Cursor::new(buf);
        assert_eq!(uint8(&mut cur).unwrap(), 0x7f);
        assert_eq!(uint16(&mut cur).unwrap(), 0x1234);
        assert_eq!(uint32(&mut cur).unwrap(), 0xdead_beef);
    }

    #[test]
    fn roundtrip_raw_string_non_utf8() {
        let mut buf = Vec::new();
        let data = [0xffu8, 0xfe, 0x00, b'a'];
        write_raw_string(&mut buf, &data).unwrap();

        let mut cur = Cursor::new(buf);
        assert_eq!(raw_string(&mut cur).unwrap(), data);
    }
}
