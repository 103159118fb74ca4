use thiserror::Error;

use crate::{hatanaka::Error as HatanakaError, version::ParsingError as VersionParsingError};

/// Errors that may rise while parsing the header section
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    /// First line does not carry the CRINEX VERS / TYPE label,
    /// or second line does not carry the CRINEX PROG / DATE label
    #[error("not a CRINEX file")]
    NotACrinex,
    /// Only CRINEX 1.x and 3.x exist
    #[error("non supported CRINEX revision {0}")]
    NonSupportedCrxVersion(String),
    /// Valid header lines should be 60 byte long at least
    #[error("header line too short")]
    HeaderLineTooShort,
    #[error("failed to parse compression date")]
    DatetimeParsing,
    #[error("bad compression date format")]
    DatetimeFormat,
    #[error("version parsing error")]
    VersionParsing(#[from] VersionParsingError),
    /// CRINEX only applies to Observation RINEX
    #[error("not an observation RINEX")]
    NotObsRinexData,
    #[error("unknown constellation \"{0}\"")]
    ConstellationParsing(String),
    /// Observable definitions are needed to decompress the file body
    #[error("no observables defined in header")]
    MissingObservables,
    /// Observable definitions do not match the declared number of observables
    #[error("bad {0} observables definition")]
    BadObservables(String),
    #[error("header delimiter not found")]
    MissingHeaderDelimiter,
}

/// Errors that may rise when decompressing a complete CRINEX stream
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("header parsing error: {0}")]
    Parsing(#[from] ParsingError),
    /// Decompression error, with the physical line (1-based) and
    /// its raw content.
    #[error("line #{line}: {error} (\"{content}\")")]
    Decompression {
        line: usize,
        content: String,
        #[source]
        error: HatanakaError,
    },
}

impl Error {
    /// Returns the decompression condition, if this is one.
    pub fn hatanaka(&self) -> Option<&HatanakaError> {
        match self {
            Self::Decompression { error, .. } => Some(error),
            _ => None,
        }
    }
    /// Returns the physical line number (1-based) this error relates to,
    /// if this is a decompression error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Decompression { line, .. } => Some(*line),
            _ => None,
        }
    }
}
