//! CRINEX header section: collects what the decompressor needs
use std::collections::HashMap;
use std::str::FromStr;

use gnss::prelude::Constellation;

use crate::{
    error::ParsingError,
    hatanaka::{Layout, CRINEX, PROG_DATE_LABEL},
    version::Version,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Header] gathers the CRINEX specifications and the RINEX definitions
/// that describe the compressed body. Only the first two lines (CRINEX
/// specific) are consumed: every other line belongs to the RINEX header.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Header {
    /// CRINEX compression infos
    pub crinex: Option<CRINEX>,
    /// RINEX revision
    pub version: Option<Version>,
    /// Constellation declared in RINEX VERSION / TYPE
    pub constellation: Option<Constellation>,
    /// Observable codes, per constellation.
    /// RINEX2 definitions apply to every constellation and are stored as [Constellation::Mixed].
    pub observables: HashMap<Constellation, Vec<String>>,
    /// True once END OF HEADER was encountered
    pub complete: bool,
    /// Declared number of observables, per constellation
    declared: HashMap<Constellation, usize>,
    /// Observable definition being parsed (may span several lines)
    pending: Option<Constellation>,
    /// Lines consumed so far
    lines: usize,
}

impl Header {
    /// Consumes a new header line. Returns true if this line
    /// belongs to the RINEX header, and should be forwarded.
    pub fn parse_line(&mut self, line: &str) -> Result<bool, ParsingError> {
        let index = self.lines;
        self.lines += 1;
        match index {
            0 => {
                self.crinex = Some(CRINEX::default().with_version_type(line)?);
                Ok(false)
            },
            1 => {
                let crinex = self.crinex.as_ref().ok_or(ParsingError::NotACrinex)?;
                let label = line.get(60..).map(|s| s.trim()).unwrap_or("");
                if !label.eq(PROG_DATE_LABEL) {
                    return Err(ParsingError::NotACrinex);
                }
                self.crinex = Some(crinex.with_prog_date(line)?);
                Ok(false)
            },
            _ => {
                self.parse_rinex_line(line)?;
                Ok(true)
            },
        }
    }

    /// Interprets one RINEX header line
    pub(crate) fn parse_rinex_line(&mut self, line: &str) -> Result<(), ParsingError> {
        if !line.is_ascii() {
            // comments only
            return Ok(());
        }
        let (content, label) = match (line.get(..60), line.get(60..)) {
            (Some(content), Some(label)) => (content, label.trim()),
            _ => return Ok(()),
        };

        match label {
            "RINEX VERSION / TYPE" => {
                self.version = Some(Version::from_str(&content[..9])?);
                if !content[20..21].eq("O") {
                    return Err(ParsingError::NotObsRinexData);
                }
                let constellation = content[40..41].trim();
                if !constellation.is_empty() {
                    self.constellation = Some(
                        Constellation::from_str(constellation)
                            .map_err(|_| ParsingError::ConstellationParsing(constellation.to_string()))?,
                    );
                }
            },
            "# / TYPES OF OBSERV" => {
                let count = content[..6].trim();
                if !count.is_empty() {
                    self.declare(Constellation::Mixed, count)?;
                }
                self.collect(&content[6..]);
            },
            "SYS / # / OBS TYPES" => {
                let system = content[..1].trim();
                if !system.is_empty() {
                    let constellation = Constellation::from_str(system)
                        .map_err(|_| ParsingError::ConstellationParsing(system.to_string()))?;
                    self.declare(constellation, &content[3..6])?;
                }
                self.collect(&content[7..]);
            },
            "END OF HEADER" => {
                self.complete = true;
                self.pending = None;
            },
            _ => {},
        }
        Ok(())
    }

    /// Starts a new observable definition
    fn declare(&mut self, constellation: Constellation, count: &str) -> Result<(), ParsingError> {
        let count = count
            .trim()
            .parse::<usize>()
            .map_err(|_| ParsingError::BadObservables(constellation.to_string()))?;
        self.declared.insert(constellation, count);
        self.observables
            .insert(constellation, Vec::with_capacity(count));
        self.pending = Some(constellation);
        Ok(())
    }

    /// Collects observable codes for the pending definition
    fn collect(&mut self, content: &str) {
        if let Some(constellation) = self.pending {
            if let Some(codes) = self.observables.get_mut(&constellation) {
                codes.extend(content.split_whitespace().map(|s| s.to_string()));
            }
        }
    }

    /// Updates given [Layout] with the observables gathered so far.
    pub(crate) fn update_layout(&self, layout: &Layout) -> Result<Layout, ParsingError> {
        let mut layout = layout.clone();
        for (constellation, codes) in self.observables.iter() {
            let declared = self.declared.get(constellation).copied().unwrap_or(0);
            if declared != codes.len() {
                return Err(ParsingError::BadObservables(constellation.to_string()));
            }
            layout = layout.with_observables(*constellation, codes.len());
        }
        Ok(layout)
    }

    /// Returns the decompression [Layout] this [Header] describes.
    pub fn layout(&self) -> Result<Layout, ParsingError> {
        let crinex = self.crinex.as_ref().ok_or(ParsingError::NotACrinex)?;
        let revision = crinex.revision()?;

        if self.observables.is_empty() {
            return Err(ParsingError::MissingObservables);
        }

        let default_constellation = match self.constellation {
            Some(Constellation::Mixed) | None => Constellation::GPS,
            Some(constellation) => constellation,
        };

        let layout = Layout::new(revision).with_default_constellation(default_constellation);
        self.update_layout(&layout)
    }
}

impl FromStr for Header {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut header = Self::default();
        for line in s.lines() {
            header.parse_line(line)?;
            if header.complete {
                return Ok(header);
            }
        }
        Err(ParsingError::MissingHeaderDelimiter)
    }
}
