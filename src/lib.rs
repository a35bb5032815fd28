//! QR Code symbol encoder core (ISO/IEC 18004, versions 1 through 40).
//!
//! This crate turns a payload and a requested encoding mode into a fully
//! assembled, masked QR Code module matrix. Rendering that matrix to an
//! image, terminal, or any other medium is left to the caller.

mod bitcoding;
pub mod config;
mod geometry;
mod interleave;
mod rscoding;
mod serialization;
mod tables;

pub use config::{Builder, ECCLevel, Encoding, Error, Version};

/// A fully assembled QR Code symbol: the chosen version/level/mode/mask
/// and the final module grid.
///
/// `modules[x][y]` uses a bottom-left origin: `x` is the column counted
/// from the left edge, `y` the row counted from the bottom edge. Dark
/// modules are `true`.
pub struct QRCode {
    pub version: Version,
    pub level: ECCLevel,
    pub mode: Encoding,
    pub mask: u8,
    pub modules: Vec<Vec<bool>>,
}

impl QRCode {
    /// The symbol's side length in modules.
    pub fn dimension(&self) -> usize {
        self.modules.len()
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[x][y]
    }
}

impl Builder {
    /// Encodes `payload` (interpreted according to this builder's `mode`)
    /// into a complete `QRCode`.
    pub fn generate(&self, payload: &[u8]) -> Result<QRCode, Error> {
        let codewords = bitcoding::encode_payload(payload, self.mode, self.version, self.level)?;
        let interleaved = interleave::interleave(&codewords, self.version, self.level);
        let assembled = serialization::assemble(self.version, self.level, &interleaved);

        let (mut matrix, chosen_mask) = match self.mask {
            Some(mask) => (serialization::masking::apply_mask(&assembled, mask), mask),
            None => serialization::masking::apply_best_mask(&assembled),
        };
        serialization::finalize(&mut matrix, self.version, self.level, chosen_mask);

        Ok(QRCode {
            version: self.version,
            level: self.level,
            mode: self.mode,
            mask: chosen_mask,
            modules: matrix.modules,
        })
    }
}
