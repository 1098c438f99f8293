//! Universal-newline line codec for the client input stream.
//!
//! `\n`, `\r\n` and a lone `\r` all end a line. Lines have no length limit.

use bytes::BytesMut;
use tokio_util::codec::Decoder;

/// Splits a byte stream into text lines.
///
/// Invalid UTF-8 is replaced rather than rejected; such a line simply fails
/// JSON decoding later on.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Index in the buffer where the next terminator scan starts.
    next_index: usize,
}

impl LineCodec {
    pub const fn new() -> Self {
        Self { next_index: 0 }
    }

    fn take_line(&mut self, buf: &mut BytesMut, end: usize, terminator_len: usize) -> String {
        let frame = buf.split_to(end + terminator_len);
        self.next_index = 0;
        String::from_utf8_lossy(&frame[..end]).into_owned()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = std::io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        let Some(offset) = buf[self.next_index..]
            .iter()
            .position(|&b| b == b'\n' || b == b'\r')
        else {
            self.next_index = buf.len();
            return Ok(None);
        };
        let end = self.next_index + offset;

        let terminator_len = if buf[end] == b'\r' {
            match buf.get(end + 1) {
                Some(b'\n') => 2,
                Some(_) => 1,
                // `\r` may be the first half of `\r\n`; wait for the next byte.
                None => {
                    self.next_index = end;
                    return Ok(None);
                }
            }
        } else {
            1
        };

        Ok(Some(self.take_line(buf, end, terminator_len)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, Self::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        let end = buf.len();
        let line = if buf.ends_with(b"\r") {
            self.take_line(buf, end - 1, 1)
        } else {
            self.take_line(buf, end, 0)
        };
        Ok(Some(line))
    }
}
