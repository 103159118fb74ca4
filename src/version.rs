//! Revision description, used by both CRINEX and RINEX headers
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Version is used to describe CRINEX and RINEX revisions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    /// Version major number
    pub major: u8,
    /// Version minor number
    pub minor: u8,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParsingError {
    #[error("empty version")]
    Empty,
    #[error("failed to parse version")]
    ParseIntError(#[from] std::num::ParseIntError),
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl std::str::FromStr for Version {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParsingError::Empty);
        }
        match s.split_once('.') {
            Some((major, minor)) => {
                // RINEX revisions may use several digits: "3.05", "2.11"
                let minor = minor.trim();
                Ok(Self {
                    major: major.trim().parse::<u8>()?,
                    minor: if minor.is_empty() {
                        0
                    } else {
                        minor.parse::<u8>()?
                    },
                })
            },
            None => Ok(Self {
                major: s.parse::<u8>()?,
                minor: 0,
            }),
        }
    }
}

impl Version {
    /// Builds a new [Version]
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}
