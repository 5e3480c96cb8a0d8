//! Bin identifiers.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::{Result, SmplbinError};

/// Opaque 128-bit random token naming a bin.
///
/// The canonical hyphenated form is both the metadata primary key and the
/// name of the bin's upload directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinId(Uuid);

impl BinId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a caller-supplied id.
    ///
    /// A malformed id cannot name an existing bin, so it is reported as
    /// `NotFound` rather than bad input.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
            .map_err(|_| SmplbinError::NotFound("bin".to_string()))
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BinId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl TryFrom<String> for BinId {
    type Error = uuid::Error;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}
