//! Line-oriented hex blocks used by key and signature files.
//!
//! A block is the lowercase hex of its bytes, 32 bytes per line, closed by a
//! line holding a single `.`.

use crate::error::FormatError;

/// Bytes written per hex line.
pub const HEX_LINE_BYTES: usize = 32;

/// Line that closes a hex block.
pub const BLOCK_TERMINATOR: &str = ".";

/// Append `data` to `out` as a terminated hex block.
pub fn write_hex_block(out: &mut String, data: &[u8]) {
    for line in data.chunks(HEX_LINE_BYTES) {
        out.push_str(&hex::encode(line));
        out.push('\n');
    }
    out.push_str(BLOCK_TERMINATOR);
    out.push('\n');
}

/// Read one hex block from `lines`, consuming up to and including the
/// terminator line.
///
/// Whitespace inside and around lines is ignored. Upper-case digits are
/// accepted.
pub fn read_hex_block<'a, I>(lines: &mut I) -> Result<Vec<u8>, FormatError>
where
    I: Iterator<Item = &'a str>,
{
    let mut digits = String::new();
    for line in lines.by_ref() {
        let line = line.trim();
        if line == BLOCK_TERMINATOR {
            if digits.len() % 2 != 0 {
                return Err(FormatError::OddHexLength);
            }
            return hex::decode(&digits).map_err(|_| FormatError::OddHexLength);
        }
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            if !c.is_ascii_hexdigit() {
                return Err(FormatError::InvalidHex(c));
            }
            digits.push(c);
        }
    }
    Err(FormatError::MissingTerminator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_wraps_at_32_bytes() {
        let data: Vec<u8> = (0u8..40).collect();
        let mut out = String::new();
        write_hex_block(&mut out, &data);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 64);
        assert_eq!(lines[1], "2021222324252627");
        assert_eq!(lines[2], ".");
    }

    #[test]
    fn test_write_empty_block() {
        let mut out = String::new();
        write_hex_block(&mut out, &[]);
        assert_eq!(out, ".\n");
    }

    #[test]
    fn test_read_accepts_loose_whitespace_and_case() {
        let text = "  DEAD beef \n\t00ff\n .  \ntrailing";
        let mut lines = text.lines();
        let data = read_hex_block(&mut lines).unwrap();
        assert_eq!(data, vec![0xde, 0xad, 0xbe, 0xef, 0x00, 0xff]);
        assert_eq!(lines.next(), Some("trailing"));
    }

    #[test]
    fn test_read_rejects_bad_input() {
        assert_eq!(
            read_hex_block(&mut "abzz\n.\n".lines()),
            Err(FormatError::InvalidHex('z'))
        );
        assert_eq!(
            read_hex_block(&mut "abc\n.\n".lines()),
            Err(FormatError::OddHexLength)
        );
        assert_eq!(
            read_hex_block(&mut "abcd\n".lines()),
            Err(FormatError::MissingTerminator)
        );
    }
}
