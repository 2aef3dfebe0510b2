//! Loosely-formatted dotted version strings.
//!
//! Update artifacts carry their version as a small plain-text marker whose
//! content is not guaranteed to be clean (`v1.5.2-beta`, trailing whitespace,
//! UTF-8 BOM from a text editor). Parsing therefore normalizes aggressively:
//! every character that is not an ASCII digit or a dot is stripped before the
//! numeric fields are read, and anything unparsable collapses to `0.0.0`,
//! which never triggers an update prompt.

use std::fmt::{self, Display, Formatter};

/// A dotted-numeric version (major.minor.build).
///
/// Ordering is field-by-field numeric, so `1.4` equals `1.4.0` and
/// `1.10.0` is greater than `1.9.9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub build: u64,
}

impl Version {
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        build: 0,
    };

    pub fn new(major: u64, minor: u64, build: u64) -> Self {
        Self { major, minor, build }
    }

    /// Parses a loosely-formatted version string.
    ///
    /// Non-digit, non-dot characters are stripped first; missing fields
    /// default to zero and fields beyond the third are ignored. Empty or
    /// garbage input yields [`Version::ZERO`].
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

        let mut fields = normalized.split('.').filter(|part| !part.is_empty()).map_while(|part| part.parse::<u64>().ok());

        Version {
            major: fields.next().unwrap_or(0),
            minor: fields.next().unwrap_or(0),
            build: fields.next().unwrap_or(0),
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}
