//! Public configuration types: the data/error-correction enums, the
//! checked `Version` newtype, the crate's `Error` type, and the `Builder`
//! that ties auto-selection of version/level to symbol generation.

use crate::tables;

use std::fmt;

/// The four data encoding modes a segment can use.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum Encoding {
    Numeric,
    Alphanumeric,
    Bytes,
    Kanji,
}

/// The four error-correction levels, in ascending order of recovery
/// capacity (also the order `tables` indexes them by).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, PartialOrd, Ord)]
pub enum ECCLevel {
    L,
    M,
    Q,
    H,
}

impl ECCLevel {
    /// The 2-bit value written into the format-info word; `L=01, M=00,
    /// Q=11, H=10`, i.e. this level's table index XOR 1.
    pub fn format_bits(self) -> u32 {
        let idx = match self {
            ECCLevel::L => 0,
            ECCLevel::M => 1,
            ECCLevel::Q => 2,
            ECCLevel::H => 3,
        };
        idx ^ 1
    }
}

/// A checked QR version number, 1 through 40.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, PartialOrd, Ord)]
pub struct Version(u8);

impl Version {
    pub fn new(v: u8) -> Result<Version, Error> {
        if (1..=40).contains(&v) {
            Ok(Version(v))
        } else {
            Err(Error::VersionUnavailable)
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Errors this crate can report, from construction through generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The requested (or every remaining) version is out of range.
    VersionUnavailable,
    /// No EC level satisfies the request at any available version.
    LevelUnavailable,
    /// The payload does not fit the symbol's data capacity.
    PayloadTooLarge,
    /// The payload contains a character not representable in the chosen
    /// mode (e.g. a non-digit byte in `Numeric` mode).
    ModeViolation,
    /// The requested mode is recognized but not encodable by this crate.
    NotImplemented,
    /// The requested mask index is outside the valid `0..=7` range.
    InvalidMask,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::VersionUnavailable => write!(f, "no symbol version satisfies this request"),
            Error::LevelUnavailable => write!(f, "no error-correction level satisfies this request"),
            Error::PayloadTooLarge => write!(f, "payload exceeds the symbol's data capacity"),
            Error::ModeViolation => write!(f, "payload contains a character not valid for the selected mode"),
            Error::NotImplemented => write!(f, "mode is not implemented by this encoder"),
            Error::InvalidMask => write!(f, "mask index must be in the range 0..=7"),
        }
    }
}

impl std::error::Error for Error {}

/// Picks the smallest version, at the strongest EC level the payload still
/// fits, honoring any caller-supplied constraints: prefer higher EC (H, then
/// Q, then M, then L), and within a level the smallest version that fits.
pub struct Builder {
    pub version: Version,
    pub level: ECCLevel,
    pub mode: Encoding,
    pub mask: Option<u8>,
}

impl Builder {
    /// `data_length` is measured in the native unit of `mode` (digits for
    /// `Numeric`, characters for `Alphanumeric`, bytes for `Bytes`/`Kanji`
    /// pairs).
    pub fn new(
        data_length: usize,
        version: Option<Version>,
        level: Option<ECCLevel>,
        mode: Encoding,
        mask: Option<u8>,
    ) -> Result<Builder, Error> {
        if mode == Encoding::Kanji {
            return Err(Error::NotImplemented);
        }

        if matches!(mask, Some(m) if m > 7) {
            return Err(Error::InvalidMask);
        }

        let levels: Vec<ECCLevel> = match level {
            Some(l) => vec![l],
            None => vec![ECCLevel::H, ECCLevel::Q, ECCLevel::M, ECCLevel::L],
        };

        let versions: Vec<Version> = match version {
            Some(v) => vec![v],
            None => (1..=40u8).map(Version).collect(),
        };

        for &lvl in &levels {
            for &v in &versions {
                let info = tables::per_version(v.value());
                if (info.per_level(lvl).capacity(mode) as usize) >= data_length {
                    return Ok(Builder { version: v, level: lvl, mode, mask });
                }
            }
        }

        match (version, level) {
            // Both pinned: the single (version, level) combination was
            // checked and didn't fit, not a search exhaustion.
            (Some(_), Some(_)) => Err(Error::PayloadTooLarge),
            // Version pinned, level searched: every level at that version
            // was too small.
            (Some(_), None) => Err(Error::LevelUnavailable),
            // Version searched (level pinned or auto): no version up to 40
            // fits at any level the search considered.
            (None, _) => Err(Error::VersionUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_rejects_out_of_range() {
        assert!(Version::new(0).is_err());
        assert!(Version::new(41).is_err());
        assert!(Version::new(1).is_ok());
        assert!(Version::new(40).is_ok());
    }

    #[test]
    fn ecc_level_format_bits_match_known_encoding() {
        assert_eq!(ECCLevel::L.format_bits(), 1);
        assert_eq!(ECCLevel::M.format_bits(), 0);
        assert_eq!(ECCLevel::Q.format_bits(), 3);
        assert_eq!(ECCLevel::H.format_bits(), 2);
    }

    #[test]
    fn builder_picks_strongest_level_that_fits() {
        // "HELLO WORLD" is 11 alphanumeric characters; version 1-H can
        // only carry 10, so auto-selection must fall through to Q (or a
        // larger version at H).
        let b = Builder::new(11, Some(Version::new(1).unwrap()), None, Encoding::Alphanumeric, None).unwrap();
        assert!(b.level <= ECCLevel::Q);
    }

    #[test]
    fn builder_rejects_kanji() {
        assert_eq!(Builder::new(1, None, None, Encoding::Kanji, None).unwrap_err(), Error::NotImplemented);
    }

    #[test]
    fn builder_grows_version_when_unconstrained() {
        let b = Builder::new(3000, None, Some(ECCLevel::L), Encoding::Bytes, None).unwrap();
        assert!(b.version.value() > 20);
    }

    #[test]
    fn fixed_version_and_level_that_do_not_fit_report_payload_too_large() {
        let version = Version::new(1).unwrap();
        let err = Builder::new(100, Some(version), Some(ECCLevel::H), Encoding::Bytes, None).unwrap_err();
        assert_eq!(err, Error::PayloadTooLarge);
    }

    #[test]
    fn fixed_version_with_no_fitting_level_reports_level_unavailable() {
        // Version 1 tops out at 17 bytes (level L); no level fits 3000.
        let version = Version::new(1).unwrap();
        let err = Builder::new(3000, Some(version), None, Encoding::Bytes, None).unwrap_err();
        assert_eq!(err, Error::LevelUnavailable);
    }

    #[test]
    fn unconstrained_version_with_no_fit_anywhere_reports_version_unavailable() {
        // No version/level combination carries this many bytes.
        let err = Builder::new(10_000_000, None, None, Encoding::Bytes, None).unwrap_err();
        assert_eq!(err, Error::VersionUnavailable);

        let err = Builder::new(10_000_000, None, Some(ECCLevel::L), Encoding::Bytes, None).unwrap_err();
        assert_eq!(err, Error::VersionUnavailable);
    }

    #[test]
    fn mask_out_of_range_is_rejected_at_construction() {
        let err = Builder::new(1, None, None, Encoding::Bytes, Some(8)).unwrap_err();
        assert_eq!(err, Error::InvalidMask);
        let err = Builder::new(1, None, None, Encoding::Bytes, Some(255)).unwrap_err();
        assert_eq!(err, Error::InvalidMask);
    }

    #[test]
    fn mask_within_range_is_accepted() {
        let b = Builder::new(1, None, None, Encoding::Bytes, Some(7)).unwrap();
        assert_eq!(b.mask, Some(7));
    }
}
