//! Block interleaving: splits the padded data codewords into the blocks
//! `tables::PerLevelInfo::block_groups` describes, generates EC codewords
//! per block, then interleaves data and EC codewords column-by-column as
//! ISO/IEC 18004 §8.6 requires.

use crate::config::{ECCLevel, Version};
use crate::rscoding;
use crate::tables;

/// Splits `data` into per-block slices following `block_groups`, in block
/// order (all of group 1's blocks, then all of group 2's).
fn split_blocks(data: &[u8], groups: &[tables::BlockGroup]) -> Vec<&[u8]> {
    let mut blocks = Vec::new();
    let mut offset = 0;
    for group in groups {
        for _ in 0..group.n_blocks {
            let len = group.data_words_per_block as usize;
            blocks.push(&data[offset..offset + len]);
            offset += len;
        }
    }
    blocks
}

/// Produces the final interleaved codeword stream (data columns, then EC
/// columns, then the trailing remainder bits are left to the caller) for a
/// fully padded data segment of `n_data_words` bytes.
pub fn interleave(data: &[u8], version: Version, level: ECCLevel) -> Vec<u8> {
    let info = tables::per_version(version.value());
    let per_level = info.per_level(level);
    let data_blocks = split_blocks(data, &per_level.block_groups);

    let ec_blocks: Vec<Vec<u8>> = data_blocks
        .iter()
        .map(|block| rscoding::generate_ec_words(block, &per_level.generator_log))
        .collect();

    let max_data_len = data_blocks.iter().map(|b| b.len()).max().unwrap_or(0);
    let ec_len = per_level.generator_log.len();

    let mut out = Vec::with_capacity(data.len() + data_blocks.len() * ec_len);
    for col in 0..max_data_len {
        for block in &data_blocks {
            if col < block.len() {
                out.push(block[col]);
            }
        }
    }
    for col in 0..ec_len {
        for block in &ec_blocks {
            out.push(block[col]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_block_interleave_is_identity_plus_ec() {
        let version = Version::new(1).unwrap();
        let data = vec![
            0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
            0xEC, 0x11, 0xEC, 0x11, 0xEC,
        ];
        let out = interleave(&data, version, ECCLevel::L);
        assert_eq!(&out[..data.len()], &data[..]);
        assert_eq!(out.len(), data.len() + 7);
    }

    #[test]
    fn multi_block_interleave_preserves_total_codeword_count() {
        let version = Version::new(5).unwrap();
        let info = tables::per_version(5);
        let level = info.per_level(ECCLevel::Q);
        let data = vec![0u8; level.n_data_words as usize];
        let out = interleave(&data, version, ECCLevel::Q);
        let total_ec: u32 = level.block_groups.iter().map(|g| g.n_blocks * g.ec_words_per_block).sum();
        assert_eq!(out.len() as u32, level.n_data_words + total_ec);
    }

    #[test]
    fn interleave_matches_the_worked_example() {
        let payload = b"https://github.com/caozhanhao/qrcode.mbt";
        let builder =
            crate::config::Builder::new(payload.len(), None, None, crate::config::Encoding::Bytes, None).unwrap();
        let data = crate::bitcoding::encode_payload(payload, crate::config::Encoding::Bytes, builder.version, builder.level).unwrap();
        let out = interleave(&data, builder.version, builder.level);
        let expected_prefix = [
            66, 151, 22, 54, 134, 70, 247, 246, 135, 135, 166, 70, 71, 86, 134, 82,
        ];
        assert_eq!(&out[..expected_prefix.len()], &expected_prefix[..]);
    }

    #[test]
    fn multi_block_interleave_alternates_blocks_per_column() {
        let version = Version::new(5).unwrap();
        let info = tables::per_version(5);
        let level = info.per_level(ECCLevel::Q);
        assert!(level.block_groups.len() >= 1);
        let data: Vec<u8> = (0..level.n_data_words as u32).map(|i| (i % 251) as u8).collect();
        let out = interleave(&data, version, ECCLevel::Q);
        let blocks = split_blocks(&data, &level.block_groups);
        // First codeword of every block appears, in block order, before
        // the second codeword of any block.
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(out[i], block[0]);
        }
    }
}
