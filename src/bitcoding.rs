//! Bit-stream encoding: mode indicator, character-count indicator, the
//! three implemented payload encoders (Numeric, Alphanumeric, Bytes),
//! terminator and pad-byte filling.

use crate::config::{ECCLevel, Encoding, Error, Version};
use crate::tables;

use bitstream_io::{BigEndian, BitWrite, BitWriter};

pub type QrBitWriter = BitWriter<Vec<u8>, BigEndian>;

fn mode_indicator(mode: Encoding) -> u32 {
    match mode {
        Encoding::Numeric => 0b0001,
        Encoding::Alphanumeric => 0b0010,
        Encoding::Bytes => 0b0100,
        Encoding::Kanji => 0b1000,
    }
}

fn map_alphanumeric(c: u8) -> Result<u8, Error> {
    match c {
        0x30..=0x39 => Ok(c - 0x30),
        0x41..=0x5A => Ok(c - 0x37),
        0x20 => Ok(36),
        0x24 => Ok(37),
        0x25 => Ok(38),
        0x2A => Ok(39),
        0x2B => Ok(40),
        0x2D => Ok(41),
        0x2E => Ok(42),
        0x2F => Ok(43),
        0x3A => Ok(44),
        _ => Err(Error::ModeViolation),
    }
}

fn encode_numeric_data(stream: &mut QrBitWriter, input: &[u8]) -> Result<(), Error> {
    for triple in input.chunks(3) {
        let mut code: u32 = 0;
        for &b in triple {
            if !b.is_ascii_digit() {
                return Err(Error::ModeViolation);
            }
            code = code * 10 + (b - 0x30) as u32;
        }
        let bits = match triple.len() {
            3 => 10,
            2 => 7,
            1 => 4,
            _ => unreachable!(),
        };
        stream.write(bits, code).unwrap();
    }
    Ok(())
}

fn encode_alphanumeric_data(stream: &mut QrBitWriter, input: &[u8]) -> Result<(), Error> {
    for pair in input.chunks(2) {
        if pair.len() == 2 {
            let code = map_alphanumeric(pair[0])? as u32 * 45 + map_alphanumeric(pair[1])? as u32;
            stream.write(11, code).unwrap();
        } else {
            let code = map_alphanumeric(pair[0])? as u32;
            stream.write(6, code).unwrap();
        }
    }
    Ok(())
}

fn encode_byte_data(stream: &mut QrBitWriter, input: &[u8]) -> Result<(), Error> {
    for &b in input {
        stream.write(8, b as u32).unwrap();
    }
    Ok(())
}

/// Writes the full data segment header (mode indicator, character-count
/// indicator) and payload for `mode`, given `version` (needed for the
/// character-count indicator's bit width). Returns the number of bits
/// written, since the caller needs that to size the terminator.
pub fn encode_data_segment(
    stream: &mut QrBitWriter,
    input: &[u8],
    mode: Encoding,
    version: Version,
) -> Result<u32, Error> {
    let info = tables::per_version(version.value());
    stream.write(4, mode_indicator(mode)).unwrap();
    let cc_bits = info.cc_indicator_bits(mode);
    stream.write(cc_bits, input.len() as u32).unwrap();
    match mode {
        Encoding::Numeric => encode_numeric_data(stream, input)?,
        Encoding::Alphanumeric => encode_alphanumeric_data(stream, input)?,
        Encoding::Bytes => encode_byte_data(stream, input)?,
        Encoding::Kanji => return Err(Error::NotImplemented),
    }
    Ok(4 + cc_bits + payload_bits(mode, input.len() as u32))
}

fn payload_bits(mode: Encoding, len: u32) -> u32 {
    match mode {
        Encoding::Numeric => 10 * (len / 3) + [0, 4, 7][(len % 3) as usize],
        Encoding::Alphanumeric => 11 * (len / 2) + [0, 6][(len % 2) as usize],
        Encoding::Bytes => 8 * len,
        Encoding::Kanji => 13 * len,
    }
}

/// Appends the terminator (up to 4 zero bits, fewer if there is no room)
/// and pads with zero bits to the next byte boundary, given the number of
/// bits already written and the symbol's total data capacity in bits.
pub fn finish_and_pad(stream: &mut QrBitWriter, bits_written: u32, total_data_bits: u32) {
    let terminator_len = (total_data_bits - bits_written).min(4);
    for _ in 0..terminator_len {
        stream.write_bit(false).unwrap();
    }
    stream.byte_align().unwrap();
}

/// Encodes a full data segment into `n_data_words` codewords: header,
/// payload, terminator, byte alignment, then `0xEC`/`0x11` padding.
pub fn encode_payload(
    input: &[u8],
    mode: Encoding,
    version: Version,
    level: ECCLevel,
) -> Result<Vec<u8>, Error> {
    let info = tables::per_version(version.value());
    let n_data_words = info.per_level(level).n_data_words;
    let total_data_bits = n_data_words * 8;

    let mut stream: QrBitWriter = BitWriter::new(Vec::new());
    let bits_written = encode_data_segment(&mut stream, input, mode, version)?;
    if bits_written > total_data_bits {
        return Err(Error::PayloadTooLarge);
    }
    finish_and_pad(&mut stream, bits_written, total_data_bits);
    let mut bytes = stream.into_writer();

    if bytes.len() as u32 > n_data_words {
        return Err(Error::PayloadTooLarge);
    }

    let mut toggle = true;
    while (bytes.len() as u32) < n_data_words {
        bytes.push(if toggle { 0xEC } else { 0x11 });
        toggle = !toggle;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_triplet_encoding_matches_iso_example() {
        // ISO/IEC 18004's worked example: "0123456" splits into "012"
        // (10 bits: 0000001100), "345" (10 bits: 0101011001), "67"
        // (7 bits: 1000011) -> pad to bytes: 00000011 00010101 10011000 011
        let mut stream: QrBitWriter = BitWriter::new(Vec::new());
        encode_numeric_data(&mut stream, b"01234567").unwrap();
        stream.write_bit(false).unwrap();
        stream.byte_align().unwrap();
        let bytes = stream.into_writer();
        assert_eq!(bytes, vec![0b00000011, 0b00010101, 0b10011000, 0b0_1100000]);
    }

    #[test]
    fn alphanumeric_rejects_lowercase() {
        let mut stream: QrBitWriter = BitWriter::new(Vec::new());
        assert!(encode_alphanumeric_data(&mut stream, b"hello").is_err());
    }

    #[test]
    fn numeric_rejects_non_digit() {
        let mut stream: QrBitWriter = BitWriter::new(Vec::new());
        assert!(encode_numeric_data(&mut stream, b"12a4").is_err());
    }

    #[test]
    fn payload_is_padded_with_alternating_bytes() {
        let version = Version::new(1).unwrap();
        let bytes = encode_payload(b"12345", Encoding::Numeric, version, ECCLevel::H).unwrap();
        let info = tables::per_version(1);
        assert_eq!(bytes.len() as u32, info.per_level(ECCLevel::H).n_data_words);
        assert_eq!(*bytes.last().unwrap(), 0x11);
    }

    #[test]
    fn bit8_encode_matches_the_worked_example() {
        let payload = b"https://github.com/caozhanhao/qrcode.mbt";
        let builder = crate::config::Builder::new(payload.len(), None, None, Encoding::Bytes, None).unwrap();
        let bytes = encode_payload(payload, Encoding::Bytes, builder.version, builder.level).unwrap();
        assert_eq!(
            bytes,
            vec![
                66, 134, 135, 71, 71, 7, 51, 162, 242, 246, 118, 151, 70, 135, 86, 34, 230, 54,
                246, 210, 246, 54, 22, 247, 166, 134, 22, 230, 134, 22, 242, 247, 23, 38, 54, 246,
                70, 82, 230, 214, 39, 64, 236, 17, 236, 17,
            ]
        );
    }

    #[test]
    fn numeric_encode_matches_the_worked_example() {
        let payload = b"443365478499";
        let builder = crate::config::Builder::new(payload.len(), None, None, Encoding::Numeric, None).unwrap();
        let bytes = encode_payload(payload, Encoding::Numeric, builder.version, builder.level).unwrap();
        assert_eq!(bytes, vec![16, 49, 188, 58, 95, 223, 108, 0, 236]);
    }
}
