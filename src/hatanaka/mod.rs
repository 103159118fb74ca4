//! Y. Hatanaka "Compact" RINEX (CRINEX) decompression.
//!
//! The body of a CRINEX file is made of epoch descriptions, receiver clock offsets
//! and satellite data lines. Each of them is differentiated against its previous
//! occurrence, using either the numerical differentiation scheme ([NumDiff])
//! or the text differentiation scheme ([TextDiff]).
use thiserror::Error;

use gnss::prelude::Constellation;

use crate::error::ParsingError;

mod clock;
mod crinex;
mod decompressor;
mod epoch;
mod layout;
mod numdiff;
mod observation;
mod textdiff;

pub use clock::ClockOffset;
pub use crinex::CRINEX;
pub(crate) use crinex::PROG_DATE_LABEL;
pub use decompressor::{
    Decompressor, DecompressorExpert, DecompressorExpertIO, DecompressorIO, State,
};
pub use epoch::{EpochDecoder, EpochEvent, EpochFlag};
pub use layout::{ColumnSpec, Layout, Revision};
pub use numdiff::{DiffField, NumDiff};
pub use observation::ObservationDecoder;
pub use textdiff::TextDiff;

/// Decompression conditions. None of them is recovered internally:
/// the content is not guessed when the input is malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Recovered value does not fit in its column
    #[error("value {value} does not fit in {width} characters")]
    FormatOverflow { value: i64, width: usize },
    /// Text copy requested but no reference line exists
    #[error("missing reference line")]
    MissingReferenceLine,
    /// Input ended while more lines were structurally required
    #[error("truncated stream")]
    TruncatedStream,
    /// Data line carries more fields than declared observables
    #[error("column count mismatch: expecting {expected}, got {found}")]
    ColumnCountMismatch { expected: usize, found: usize },
    /// Compression order must be at least one
    #[error("invalid compression order {0}")]
    InvalidOrder(usize),
    /// Compression order exceeds what this decompressor supports
    #[error("compression order {0} exceeds maximal order {1}")]
    OrderTooBig(usize, usize),
    #[error("malformed numerical field \"{0}\"")]
    MalformedField(String),
    #[error("epoch description is too short")]
    EpochFormat,
    #[error("invalid epoch flag")]
    EpochFlag,
    #[error("failed to parse number of satellites")]
    NumSatParsing,
    #[error("failed to parse satellite \"{0}\"")]
    SVParsing(String),
    /// Observables were not specified for this constellation
    #[error("no observables specified for {0}")]
    UnknownObservables(Constellation),
    #[error("bad CRINEX1 epoch description")]
    BadV1Format,
    #[error("bad CRINEX3 epoch description")]
    BadV3Format,
    #[error("non ascii content")]
    NonAsciiContent,
    /// Header information following an event epoch could not be interpreted
    #[error("header update: {0}")]
    HeaderUpdate(ParsingError),
}
