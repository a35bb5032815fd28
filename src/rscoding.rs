//! Reed-Solomon error-correction codeword generation over GF(256).

use crate::tables;

/// Computes the `generator_log.len()` error-correction codewords for one
/// block of `data` codewords, given the block's precomputed generator
/// polynomial (in exponent/log form, as built by `tables::PerLevelInfo`).
///
/// This is standard polynomial long division of `data` (shifted up by the
/// EC word count) by the generator, carried out a byte at a time with a
/// scratch buffer sized for the largest possible block (123 data words +
/// 30 EC words, the widest version-40 block).
pub fn generate_ec_words(data: &[u8], generator_log: &[u8]) -> Vec<u8> {
    const MAX_BLK_SIZE: usize = 123;
    const MAX_EC_SIZE: usize = 30;
    debug_assert!(data.len() <= MAX_BLK_SIZE);
    debug_assert!(generator_log.len() <= MAX_EC_SIZE);

    let ec_len = generator_log.len();
    let mut tmp = vec![0u8; data.len() + ec_len];
    tmp[..data.len()].copy_from_slice(data);

    for i in 0..data.len() {
        let factor = tmp[i];
        if factor == 0 {
            continue;
        }
        for (m, &g) in generator_log.iter().enumerate() {
            tmp[i + 1 + m] ^= tables::gf_mul(factor, tables::exp(g));
        }
    }

    tmp[data.len()..].to_vec()
}
