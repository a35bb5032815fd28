//! Static per-version metadata: dimensions, alignment coordinates, GF(256)
//! arithmetic, Reed-Solomon generator polynomials, block layout and the
//! version-info BCH word. Everything here is process-wide read-only data,
//! computed once behind a `lazy_static`.

use crate::config::{ECCLevel, Encoding};

use std::collections::HashMap;

fn build_exp_table() -> [u8; 256] {
    let mut exp = [0u8; 256];
    let mut x: u16 = 1;
    for i in 0..255 {
        exp[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11D;
        }
    }
    exp[255] = exp[0];
    exp
}

fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut log = [0u8; 256];
    for i in 0..255 {
        log[exp[i] as usize] = i as u8;
    }
    log
}

lazy_static::lazy_static! {
    /// Antilog (exponent -> field element) table for GF(256) with the
    /// ISO/IEC 18004 primitive polynomial 0x11D. Cross-checked against the
    /// equivalent table in the kernel's panic-screen QR encoder.
    static ref EXP_TABLE: [u8; 256] = build_exp_table();

    /// Log (field element -> exponent) table, the inverse of `EXP_TABLE`.
    /// `LOG_TABLE[0]` is unused (log of zero is undefined) and never read.
    static ref LOG_TABLE: [u8; 256] = build_log_table(&EXP_TABLE);
}

/// Looks up the GF(256) field element for a given exponent, the inverse of
/// the (private) log table. Used to turn a generator polynomial's
/// exponent-form coefficients back into field elements during EC encoding.
pub fn exp(e: u8) -> u8 {
    EXP_TABLE[e as usize]
}

/// Multiplies two GF(256) field elements via the log/antilog tables.
pub fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        0
    } else {
        let sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
        EXP_TABLE[sum % 255]
    }
}

/// Builds the Reed-Solomon generator polynomial of the given `degree`
/// (i.e. for `degree` EC codewords), returned as `degree` coefficients in
/// exponent (log) form, highest-degree coefficient first. The construction
/// multiplies `(x - 2^0)(x - 2^1)...(x - 2^(degree-1))` in GF(256), the
/// standard method used by every production QR encoder.
fn build_generator_log(degree: usize) -> Vec<u8> {
    let mut coefs = vec![0u8; degree];
    coefs[degree - 1] = 1;
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            coefs[j] = gf_mul(coefs[j], root);
            if j + 1 < degree {
                coefs[j] ^= coefs[j + 1];
            }
        }
        root = gf_mul(root, 0x02);
    }
    coefs.iter().map(|&c| LOG_TABLE[c as usize]).collect()
}

/// Error-correction codewords per block, indexed `[level][version-1]`.
/// Level order: L, M, Q, H (matching `ECCLevel`'s declaration order).
const ECC_CODEWORDS_PER_BLOCK: [[i16; 40]; 4] = [
    [7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28],
    [13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
    [17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30],
];

/// Number of error-correction blocks, indexed `[level][version-1]`.
const NUM_ERROR_CORRECTION_BLOCKS: [[i16; 40]; 4] = [
    [1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25],
    [1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49],
    [1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68],
    [1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81],
];

fn ecc_level_index(level: ECCLevel) -> usize {
    match level {
        ECCLevel::L => 0,
        ECCLevel::M => 1,
        ECCLevel::Q => 2,
        ECCLevel::H => 3,
    }
}

/// A single block in a data/EC block group: all blocks in a group share the
/// same layout.
#[derive(Clone, Copy, Debug)]
pub struct BlockGroup {
    pub n_blocks: u32,
    pub data_words_per_block: u32,
    pub ec_words_per_block: u32,
}

/// Metadata that depends on both `Version` and `ECCLevel`.
#[derive(Clone, Debug)]
pub struct PerLevelInfo {
    pub n_data_words: u32,
    pub block_groups: Vec<BlockGroup>,
    pub generator_log: Vec<u8>,
    capacity: HashMap<Encoding, u32>,
}

impl PerLevelInfo {
    /// Maximum number of characters/bytes/digits of `mode` this
    /// version/level combination can carry, after accounting for the mode
    /// indicator, character-count indicator and terminator.
    pub fn capacity(&self, mode: Encoding) -> u32 {
        self.capacity[&mode]
    }
}

/// Metadata that depends only on `Version`.
#[derive(Clone, Debug)]
pub struct PerVersionInfo {
    pub version: u8,
    pub dimension: i32,
    pub alignment_coords: Vec<i32>,
    pub remainder_bits: u32,
    pub cc_indicator_bits: [u32; 4],
    pub version_info_word: Option<u32>,
    pub per_level: [PerLevelInfo; 4],
}

fn cc_indicator_bits(version: u8, mode: Encoding) -> u32 {
    let band = if version <= 9 {
        0
    } else if version <= 26 {
        1
    } else {
        2
    };
    match (band, mode) {
        (0, Encoding::Numeric) => 10,
        (0, Encoding::Alphanumeric) => 9,
        (0, Encoding::Bytes) => 8,
        (0, Encoding::Kanji) => 8,
        (1, Encoding::Numeric) => 12,
        (1, Encoding::Alphanumeric) => 11,
        (1, Encoding::Bytes) => 16,
        (1, Encoding::Kanji) => 10,
        (_, Encoding::Numeric) => 14,
        (_, Encoding::Alphanumeric) => 13,
        (_, Encoding::Bytes) => 16,
        (_, Encoding::Kanji) => 12,
    }
}

/// Total modules available for data + EC + remainder, before any function
/// pattern is subtracted. Matches the closed-form count used by every
/// production encoder rather than summing reserved regions by hand.
fn num_raw_data_modules(version: i32) -> u32 {
    let mut result: i64 = (16 * version as i64 + 128) * version as i64 + 64;
    if version >= 2 {
        let numalign = version / 7 + 2;
        result -= ((25 * numalign - 10) * numalign - 55) as i64;
        if version >= 7 {
            result -= 36;
        }
    }
    result as u32
}

/// Alignment pattern center coordinates (standard row/col terms, symmetric
/// across both axes), per ISO/IEC 18004 Annex E. Computed by the same
/// closed-form recurrence nayuki's reference encoder uses, rather than
/// transcribed as a 40-entry literal table.
fn alignment_coords(version: i32) -> Vec<i32> {
    if version == 1 {
        return Vec::new();
    }
    let num_align = version / 7 + 2;
    let step = if version == 32 {
        26
    } else {
        (version * 4 + num_align * 2 + 1) / (num_align * 2 - 2) * 2
    };
    let mut result = vec![6];
    let mut pos = version * 4 + 10;
    for _ in 1..num_align {
        result.push(pos);
        pos -= step;
    }
    result.reverse();
    result
}

fn version_info_word(version: u32) -> u32 {
    let mut rem = version;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    (version << 12) | rem
}

fn build_per_level(version: u8, mode_bits: &[u32; 4], level: ECCLevel) -> PerLevelInfo {
    let v = version as usize;
    let idx = ecc_level_index(level);
    let ec_words_per_block = ECC_CODEWORDS_PER_BLOCK[idx][v - 1] as u32;
    let n_blocks = NUM_ERROR_CORRECTION_BLOCKS[idx][v - 1] as u32;

    let raw_codewords = num_raw_data_modules(version as i32) / 8;
    let short_block_total = raw_codewords / n_blocks;
    let n_short_blocks = n_blocks - raw_codewords % n_blocks;

    let mut block_groups = Vec::new();
    if n_short_blocks > 0 {
        block_groups.push(BlockGroup {
            n_blocks: n_short_blocks,
            data_words_per_block: short_block_total - ec_words_per_block,
            ec_words_per_block,
        });
    }
    if n_blocks > n_short_blocks {
        block_groups.push(BlockGroup {
            n_blocks: n_blocks - n_short_blocks,
            data_words_per_block: short_block_total + 1 - ec_words_per_block,
            ec_words_per_block,
        });
    }

    let n_data_words: u32 = block_groups.iter().map(|g| g.n_blocks * g.data_words_per_block).sum();
    let capacity_bits_total = n_data_words * 8;

    let mut capacity = HashMap::new();
    for &mode in &[Encoding::Numeric, Encoding::Alphanumeric, Encoding::Bytes, Encoding::Kanji] {
        let overhead = 4 + mode_bits[mode_index(mode)];
        let usable = capacity_bits_total.saturating_sub(overhead);
        let cap = match mode {
            Encoding::Bytes => usable / 8,
            Encoding::Numeric => {
                let triples = usable / 10;
                let rem = usable % 10;
                let extra = if rem >= 7 { 2 } else if rem >= 4 { 1 } else { 0 };
                triples * 3 + extra
            }
            Encoding::Alphanumeric => {
                let pairs = usable / 11;
                let rem = usable % 11;
                let extra = if rem >= 6 { 1 } else { 0 };
                pairs * 2 + extra
            }
            Encoding::Kanji => usable / 13,
        };
        capacity.insert(mode, cap);
    }

    PerLevelInfo {
        n_data_words,
        block_groups,
        generator_log: build_generator_log(ec_words_per_block as usize),
        capacity,
    }
}

fn mode_index(mode: Encoding) -> usize {
    match mode {
        Encoding::Numeric => 0,
        Encoding::Alphanumeric => 1,
        Encoding::Bytes => 2,
        Encoding::Kanji => 3,
    }
}

fn build_per_version(version: u8) -> PerVersionInfo {
    let dim = version as i32 * 4 + 17;
    let mode_bits = [
        cc_indicator_bits(version, Encoding::Numeric),
        cc_indicator_bits(version, Encoding::Alphanumeric),
        cc_indicator_bits(version, Encoding::Bytes),
        cc_indicator_bits(version, Encoding::Kanji),
    ];
    PerVersionInfo {
        version,
        dimension: dim,
        alignment_coords: alignment_coords(version as i32),
        remainder_bits: num_raw_data_modules(version as i32) % 8,
        cc_indicator_bits: mode_bits,
        version_info_word: if version >= 7 { Some(version_info_word(version as u32)) } else { None },
        per_level: [
            build_per_level(version, &mode_bits, ECCLevel::L),
            build_per_level(version, &mode_bits, ECCLevel::M),
            build_per_level(version, &mode_bits, ECCLevel::Q),
            build_per_level(version, &mode_bits, ECCLevel::H),
        ],
    }
}

lazy_static::lazy_static! {
    static ref PER_VERSION: Vec<PerVersionInfo> = (1u8..=40).map(build_per_version).collect();
}

/// Looks up the static metadata for `version` (1..=40).
pub fn per_version(version: u8) -> &'static PerVersionInfo {
    &PER_VERSION[version as usize - 1]
}

impl PerVersionInfo {
    pub fn per_level(&self, level: ECCLevel) -> &PerLevelInfo {
        &self.per_level[ecc_level_index(level)]
    }

    pub fn cc_indicator_bits(&self, mode: Encoding) -> u32 {
        self.cc_indicator_bits[mode_index(mode)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Alignment coordinates for a handful of versions spanning every
    // branch of the closed-form recurrence, taken from ISO/IEC 18004
    // Annex E.
    #[test]
    fn alignment_coord_table_matches_annex_e() {
        assert_eq!(alignment_coords(3), vec![6, 22]);
        assert_eq!(alignment_coords(10), vec![6, 28, 50]);
        assert_eq!(alignment_coords(15), vec![6, 26, 48, 70]);
        assert_eq!(alignment_coords(20), vec![6, 34, 62, 90]);
        assert_eq!(alignment_coords(27), vec![6, 34, 62, 90, 118]);
        assert_eq!(alignment_coords(33), vec![6, 30, 58, 86, 114, 142]);
        assert_eq!(alignment_coords(40), vec![6, 30, 58, 86, 114, 142, 170]);
    }

    #[test]
    fn version_1_has_no_alignment_pattern() {
        assert!(alignment_coords(1).is_empty());
    }

    #[test]
    fn gf256_exp_log_are_inverses() {
        for v in 1u32..255 {
            assert_eq!(LOG_TABLE[EXP_TABLE[v as usize] as usize] as u32, v % 255);
        }
    }

    #[test]
    fn generator_degree_one_is_identity() {
        // x - 2^0 = x - 1 = x + 1 over GF(256); log(1) = 0.
        assert_eq!(build_generator_log(1), vec![0]);
    }

    #[test]
    fn version1_level_l_capacity_matches_known_values() {
        let info = per_version(1);
        let l = info.per_level(ECCLevel::L);
        assert_eq!(l.n_data_words, 19);
        assert_eq!(l.capacity(Encoding::Bytes), 17);
        assert_eq!(l.capacity(Encoding::Numeric), 41);
        assert_eq!(l.capacity(Encoding::Alphanumeric), 25);
    }

    #[test]
    fn dimension_formula() {
        assert_eq!(per_version(1).dimension, 21);
        assert_eq!(per_version(40).dimension, 177);
    }

    #[test]
    fn version_info_word_present_only_from_version_7() {
        assert!(per_version(6).version_info_word.is_none());
        assert!(per_version(7).version_info_word.is_some());
    }
}
