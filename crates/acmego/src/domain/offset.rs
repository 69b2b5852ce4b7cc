//! Translation between acme's character addresses and the byte/line positions
//! the Go tools expect.

use crate::domain::errors::OffsetError;

/// Byte offset and 1-based line number of the character at index `q` in `buf`.
///
/// `buf` is decoded as UTF-8 one character at a time; only the first `q`
/// characters need to be well formed.
pub fn byte_offset(buf: &[u8], q: usize) -> Result<(usize, usize), OffsetError> {
    let mut off = 0;
    let mut line = 1;
    for decoded in 0..q {
        let (ch, width) = decode(buf, off).ok_or_else(|| {
            if off >= buf.len() {
                OffsetError::OutOfRange {
                    index: q,
                    available: decoded,
                }
            } else {
                OffsetError::InvalidEncoding { offset: off }
            }
        })?;
        if ch == '\n' {
            line += 1;
        }
        off += width;
    }
    Ok((off, line))
}

/// Number of characters in `buf[..off]`.
pub fn char_index(buf: &[u8], off: usize) -> Result<usize, OffsetError> {
    let prefix = buf.get(..off).ok_or(OffsetError::OutOfRange {
        index: off,
        available: buf.len(),
    })?;
    match std::str::from_utf8(prefix) {
        Ok(text) => Ok(text.chars().count()),
        Err(err) => Err(OffsetError::InvalidEncoding {
            offset: err.valid_up_to(),
        }),
    }
}

/// Byte width of the character starting at `off`, or `None` when `off` is at
/// the end of the buffer or not the start of a valid character.
pub fn char_width_at(buf: &[u8], off: usize) -> Option<usize> {
    decode(buf, off).map(|(_, width)| width)
}

fn decode(buf: &[u8], off: usize) -> Option<(char, usize)> {
    let rest = buf.get(off..)?;
    // A character is at most four bytes long.
    let head = &rest[..rest.len().min(4)];
    let valid = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(err) => std::str::from_utf8(&head[..err.valid_up_to()]).ok()?,
    };
    let ch = valid.chars().next()?;
    Some((ch, ch.len_utf8()))
}
