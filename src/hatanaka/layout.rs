//! Column layout of the decompressed content
use std::collections::HashMap;
use std::str::FromStr;

use gnss::prelude::{Constellation, SV};

use crate::{
    hatanaka::{Error, NumDiff},
    version::Version,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CRINEX revision, which defines the structure of the epoch description
/// and of the data lines.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Revision {
    /// CRINEX1, used to compress RINEX2
    V1,
    /// CRINEX3, used to compress RINEX3 and RINEX4
    #[default]
    V3,
}

impl Revision {
    /// Deduces [Revision] from CRINEX [Version]
    pub fn from_version(version: Version) -> Option<Self> {
        match version.major {
            1 => Some(Self::V1),
            3 => Some(Self::V3),
            _ => None,
        }
    }

    /// Character that starts a literal epoch description
    pub const fn marker(&self) -> char {
        match self {
            Self::V1 => '&',
            Self::V3 => '>',
        }
    }

    /// Character that starts the uncompressed epoch description
    pub(crate) const fn epoch_prefix(&self) -> char {
        match self {
            Self::V1 => ' ',
            Self::V3 => '>',
        }
    }

    /// Offset of the epoch flag, within the recovered description
    /// (first column removed)
    pub(crate) const fn flag_offset(&self) -> usize {
        match self {
            Self::V1 => 27,
            Self::V3 => 30,
        }
    }

    /// Offset of the first satellite, within the recovered description
    pub(crate) const fn sv_offset(&self) -> usize {
        match self {
            Self::V1 => 31,
            Self::V3 => 40,
        }
    }

    /// Default receiver clock offset column
    pub const fn clock_spec(&self) -> ColumnSpec {
        match self {
            Self::V1 => ColumnSpec::new(12, 9, 3),
            Self::V3 => ColumnSpec::new(15, 12, 3),
        }
    }
}

/// [ColumnSpec] describes one numerical column of the decompressed content.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ColumnSpec {
    /// Formatted width
    pub width: usize,
    /// Number of decimal places
    pub decimals: usize,
    /// Differentiation order used when a column is not explicitly
    /// initialized.
    pub order: usize,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self::OBSERVATION
    }
}

impl ColumnSpec {
    /// Standard observation column: F14.3, compressed at order 3
    pub const OBSERVATION: Self = Self::new(14, 3, 3);

    pub const fn new(width: usize, decimals: usize, order: usize) -> Self {
        Self {
            width,
            decimals,
            order,
        }
    }
}

/// [Layout] is the caller-side configuration of the decompressor.
/// It is usually deduced from the header section (see [crate::header::Header]),
/// but may be provided manually when the CRINEX body is streamed without its header.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Layout {
    /// CRINEX revision
    pub revision: Revision,
    /// Constellation of satellites whose system identifier is blank
    pub default_constellation: Constellation,
    /// Receiver clock offset column
    pub clock: ColumnSpec,
    /// Numerical columns, per constellation.
    /// [Constellation::Mixed] applies to every satellite (RINEX2).
    pub columns: HashMap<Constellation, Vec<ColumnSpec>>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Revision::default())
    }
}

impl Layout {
    /// Builds a new [Layout] for this [Revision], without observables.
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            clock: revision.clock_spec(),
            default_constellation: Constellation::GPS,
            columns: HashMap::with_capacity(4),
        }
    }

    /// Declares `count` standard observables for this [Constellation]
    pub fn with_observables(&self, constellation: Constellation, count: usize) -> Self {
        self.with_columns(constellation, vec![ColumnSpec::OBSERVATION; count])
    }

    /// Declares custom columns for this [Constellation]
    pub fn with_columns(&self, constellation: Constellation, columns: Vec<ColumnSpec>) -> Self {
        let mut s = self.clone();
        s.columns.insert(constellation, columns);
        s
    }

    /// Copies and returns with custom clock offset column
    pub fn with_clock_spec(&self, clock: ColumnSpec) -> Self {
        let mut s = self.clone();
        s.clock = clock;
        s
    }

    /// Copies and returns with default [Constellation]
    pub fn with_default_constellation(&self, constellation: Constellation) -> Self {
        let mut s = self.clone();
        s.default_constellation = constellation;
        s
    }

    /// Columns of this satellite
    pub fn columns(&self, sv: &SV) -> Option<&[ColumnSpec]> {
        if let Some(columns) = self.columns.get(&Constellation::Mixed) {
            return Some(columns);
        }
        let constellation = if sv.constellation.is_sbas() {
            Constellation::SBAS
        } else {
            sv.constellation
        };
        self.columns.get(&constellation).map(|c| c.as_slice())
    }

    /// Returns the largest order declared by this [Layout]
    pub fn max_order(&self) -> usize {
        self.columns
            .values()
            .flatten()
            .map(|c| c.order)
            .chain(std::iter::once(self.clock.order))
            .max()
            .unwrap_or(0)
    }

    /// Verifies that every declared column may be decompressed
    /// with a `M` order decompressor.
    pub(crate) fn validate<const M: usize>(&self) -> Result<(), Error> {
        let _ = NumDiff::<M>::new(self.clock)?;
        for spec in self.columns.values().flatten() {
            let _ = NumDiff::<M>::new(*spec)?;
        }
        Ok(())
    }

    /// Parses the 3 character satellite identifier. A blank system identifier
    /// refers to [Self::default_constellation].
    pub fn parse_sv(&self, content: &str) -> Result<SV, Error> {
        let trimmed = content.trim_end();
        if trimmed.trim_start().is_empty() || !content.is_ascii() {
            return Err(Error::SVParsing(content.to_string()));
        }
        if content.starts_with(' ') {
            let prn = trimmed
                .trim()
                .parse::<u8>()
                .map_err(|_| Error::SVParsing(content.to_string()))?;
            Ok(SV::new(self.default_constellation, prn))
        } else {
            SV::from_str(trimmed).map_err(|_| Error::SVParsing(content.to_string()))
        }
    }
}
