//! Serializing a memory image for the loader.
//!
//! The loader consumes a classic checksummed hex-record stream: one
//! data record per memory address, every field uppercase zero-padded
//! hex, closed by a fixed end-of-file record. Addresses past the
//! produced words are emitted as zero so the stream always describes
//! the full memory.

use crate::image::{IMAGE_WORDS, MemoryImage};

/// Data bytes per record; each 24-bit word is three bytes.
const RECORD_BYTES: u8 = 3;

const EOF_RECORD: &str = ":00000001FF\n";

/// Render the full record stream: 1024 data records plus the
/// end-of-file record.
pub fn render_hex(image: &MemoryImage) -> String {
    let mut out = String::with_capacity((IMAGE_WORDS + 1) * 20);
    for address in 0..IMAGE_WORDS {
        record_line(&mut out, address as u16, image.word_at(address));
    }
    out.push_str(EOF_RECORD);
    out
}

/// Render the image as a plain decimal word listing, one word per
/// line starting with the length word. The intermediate artifact the
/// record stream is derived from; handy for eyeballing small images.
pub fn render_words(image: &MemoryImage) -> String {
    let mut out = String::new();
    for word in image.words() {
        out.push_str(&word.to_string());
        out.push('\n');
    }
    out
}

fn record_line(out: &mut String, address: u16, word: u32) {
    use std::fmt::Write;

    let data = [(word >> 16) as u8, (word >> 8) as u8, word as u8];
    let checksum = record_checksum(address, &data);
    write!(
        out,
        ":{:02X}{:04X}00{:02X}{:02X}{:02X}{:02X}\n",
        RECORD_BYTES, address, data[0], data[1], data[2], checksum
    )
    .expect("writing to a String cannot fail");
}

/// Two's-complement checksum over byte count, address bytes and data
/// bytes, so that all record bytes sum to zero mod 256.
fn record_checksum(address: u16, data: &[u8]) -> u8 {
    let mut sum = data.len() as u8;
    sum = sum
        .wrapping_add((address >> 8) as u8)
        .wrapping_add(address as u8);
    for byte in data {
        sum = sum.wrapping_add(*byte);
    }
    sum.wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;

    fn record_bytes(line: &str) -> Vec<u8> {
        assert!(line.starts_with(':'), "bad record {line:?}");
        line[1..]
            .as_bytes()
            .chunks(2)
            .map(|pair| u8::from_str_radix(std::str::from_utf8(pair).unwrap(), 16).unwrap())
            .collect()
    }

    #[test]
    fn formats_known_records() {
        let mut line = String::new();
        record_line(&mut line, 0, 6);
        assert_eq!(line, ":0300000000000006F7\n");

        line.clear();
        record_line(&mut line, 1, 0x000803);
        assert_eq!(line, ":0300010000000803F1\n");
    }

    #[test]
    fn stream_has_one_record_per_address_plus_eof() {
        let stream = render_hex(&compile("(quote a)").unwrap());
        let lines: Vec<&str> = stream.lines().collect();
        assert_eq!(lines.len(), IMAGE_WORDS + 1);
        assert_eq!(lines[IMAGE_WORDS], ":00000001FF");
        // Every address appears in order.
        assert!(lines[0].starts_with(":030000"));
        assert!(lines[1023].starts_with(":0303FF"));
    }

    #[test]
    fn pads_unused_addresses_with_zero_words() {
        let stream = render_hex(&compile("(quote a)").unwrap());
        // Address 1000 = 0x03E8 holds word 0.
        assert!(stream.contains(":0303E80000000012\n"));
    }

    #[test]
    fn every_record_sums_to_zero() {
        let stream = render_hex(&compile("(if (eq? a b) 1 2)").unwrap());
        for line in stream.lines() {
            let sum: u8 = record_bytes(line)
                .into_iter()
                .fold(0u8, |acc, byte| acc.wrapping_add(byte));
            assert_eq!(sum, 0, "record {line:?} does not balance");
        }
    }

    #[test]
    fn word_listing_matches_the_image() {
        let listing = render_words(&compile("(quote a)").unwrap());
        assert_eq!(listing, "6\n2051\n1048591\n4096\n2196480\n5258240\n");
    }
}
