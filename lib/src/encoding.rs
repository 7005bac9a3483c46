/*! Character encodings used for turning pattern literals into bytes.

Literals in a parse tree are Unicode code points. Before they can become
vertices of the automaton they must be converted into the sequence of bytes
that represents them in the data being searched, which depends on the
encoding that the data is expected to use. Code points that can't be
represented in the chosen encoding produce no bytes at all.
*/

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Converts code points into bytes.
pub trait Encoding: Debug + Send + Sync {
    /// Name of the encoding.
    fn name(&self) -> &'static str;

    /// Maximum number of bytes produced by [`Encoding::write`] for a single
    /// code point.
    fn max_byte_length(&self) -> usize;

    /// Writes the bytes that represent `code_point` into `buf` and returns
    /// the number of bytes written, or 0 if the code point can't be
    /// represented in this encoding.
    ///
    /// `buf` must be at least [`Encoding::max_byte_length`] bytes long.
    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize;
}

/// 7-bit ASCII.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ascii;

impl Encoding for Ascii {
    fn name(&self) -> &'static str {
        "ASCII"
    }

    fn max_byte_length(&self) -> usize {
        1
    }

    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize {
        if code_point < 0x80 {
            buf[0] = code_point as u8;
            1
        } else {
            0
        }
    }
}

/// ISO-8859-1, where each code point below 256 is stored as a single byte.
#[derive(Debug, Default, Clone, Copy)]
pub struct Latin1;

impl Encoding for Latin1 {
    fn name(&self) -> &'static str {
        "ISO-8859-1"
    }

    fn max_byte_length(&self) -> usize {
        1
    }

    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize {
        if code_point < 0x100 {
            buf[0] = code_point as u8;
            1
        } else {
            0
        }
    }
}

/// UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf8;

impl Encoding for Utf8 {
    fn name(&self) -> &'static str {
        "UTF-8"
    }

    fn max_byte_length(&self) -> usize {
        4
    }

    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize {
        match char::from_u32(code_point) {
            Some(c) => c.encode_utf8(buf).len(),
            None => 0,
        }
    }
}

/// UTF-16, little-endian.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf16Le;

impl Encoding for Utf16Le {
    fn name(&self) -> &'static str {
        "UTF-16LE"
    }

    fn max_byte_length(&self) -> usize {
        4
    }

    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize {
        write_utf16(code_point, buf, u16::to_le_bytes)
    }
}

/// UTF-16, big-endian.
#[derive(Debug, Default, Clone, Copy)]
pub struct Utf16Be;

impl Encoding for Utf16Be {
    fn name(&self) -> &'static str {
        "UTF-16BE"
    }

    fn max_byte_length(&self) -> usize {
        4
    }

    fn write(&self, code_point: u32, buf: &mut [u8]) -> usize {
        write_utf16(code_point, buf, u16::to_be_bytes)
    }
}

fn write_utf16(
    code_point: u32,
    buf: &mut [u8],
    to_bytes: fn(u16) -> [u8; 2],
) -> usize {
    let Some(c) = char::from_u32(code_point) else {
        return 0;
    };
    let mut units = [0_u16; 2];
    let mut len = 0;
    for unit in c.encode_utf16(&mut units).iter() {
        buf[len..len + 2].copy_from_slice(&to_bytes(*unit));
        len += 2;
    }
    len
}

/// Identifies one of the encodings provided by this crate.
///
/// This is the type used in configuration files, where encodings are
/// named `ascii`, `latin1`, `utf-8`, `utf-16le` and `utf-16be`.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EncodingKind {
    #[default]
    #[serde(rename = "ascii")]
    Ascii,
    #[serde(rename = "latin1")]
    Latin1,
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be")]
    Utf16Be,
}

impl EncodingKind {
    /// Returns the encoder for this kind of encoding.
    pub fn encoder(self) -> Box<dyn Encoding> {
        match self {
            EncodingKind::Ascii => Box::new(Ascii),
            EncodingKind::Latin1 => Box::new(Latin1),
            EncodingKind::Utf8 => Box::new(Utf8),
            EncodingKind::Utf16Le => Box::new(Utf16Le),
            EncodingKind::Utf16Be => Box::new(Utf16Be),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::EncodingKind;

    fn encode(kind: EncodingKind, code_point: u32) -> Vec<u8> {
        let encoder = kind.encoder();
        let mut buf = vec![0; encoder.max_byte_length()];
        let len = encoder.write(code_point, &mut buf);
        buf.truncate(len);
        buf
    }

    #[test]
    fn ascii() {
        assert_eq!(encode(EncodingKind::Ascii, 'a' as u32), b"a");
        assert_eq!(encode(EncodingKind::Ascii, 0xe9), b"");
    }

    #[test]
    fn latin1() {
        assert_eq!(encode(EncodingKind::Latin1, 0xe9), [0xe9]);
        assert_eq!(encode(EncodingKind::Latin1, 0x20ac), b"");
    }

    #[test]
    fn utf8() {
        assert_eq!(encode(EncodingKind::Utf8, 'a' as u32), b"a");
        assert_eq!(encode(EncodingKind::Utf8, 0xe9), [0xc3, 0xa9]);
        assert_eq!(encode(EncodingKind::Utf8, 0x20ac), [0xe2, 0x82, 0xac]);
        // Surrogates are not valid code points.
        assert_eq!(encode(EncodingKind::Utf8, 0xd800), b"");
    }

    #[test]
    fn utf16() {
        assert_eq!(encode(EncodingKind::Utf16Le, 'a' as u32), [0x61, 0x00]);
        assert_eq!(encode(EncodingKind::Utf16Be, 'a' as u32), [0x00, 0x61]);
        assert_eq!(
            encode(EncodingKind::Utf16Le, 0x1f600),
            [0x3d, 0xd8, 0x00, 0xde]
        );
    }

    #[test]
    fn names() {
        assert_eq!(EncodingKind::default().encoder().name(), "ASCII");
        assert_eq!(EncodingKind::Utf16Be.encoder().name(), "UTF-16BE");
    }
}
