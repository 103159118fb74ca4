//! Epoch description decoding
use std::str::FromStr;

use gnss::prelude::SV;
use num_integer::div_ceil;

use crate::hatanaka::{Error, Layout, Revision, TextDiff};

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [EpochFlag] validates an epoch,
/// or describes possible events that occurred
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EpochFlag {
    /// Epoch is sane
    #[default]
    Ok,
    /// Power failure since previous epoch
    PowerFailure,
    /// Antenna is being moved at current epoch
    AntennaBeingMoved,
    /// Site has changed, received has moved since last epoch
    NewSiteOccupation,
    /// New information to come after this epoch
    HeaderInformationFollows,
    /// External event - significant event in this epoch
    ExternalEvent,
    /// Cycle slip at this epoch
    CycleSlip,
}

impl EpochFlag {
    /// Returns True if self is a valid epoch
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
    /// Returns True if this epoch is followed by special records rather
    /// than observations. The number of satellites field then counts those records.
    pub fn is_event(self) -> bool {
        matches!(
            self,
            Self::AntennaBeingMoved
                | Self::NewSiteOccupation
                | Self::HeaderInformationFollows
                | Self::ExternalEvent
        )
    }
}

impl FromStr for EpochFlag {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(Self::Ok),
            "1" => Ok(Self::PowerFailure),
            "2" => Ok(Self::AntennaBeingMoved),
            "3" => Ok(Self::NewSiteOccupation),
            "4" => Ok(Self::HeaderInformationFollows),
            "5" => Ok(Self::ExternalEvent),
            "6" => Ok(Self::CycleSlip),
            _ => Err(Error::EpochFlag),
        }
    }
}

impl std::fmt::Display for EpochFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Ok => "0".fmt(f),
            Self::PowerFailure => "1".fmt(f),
            Self::AntennaBeingMoved => "2".fmt(f),
            Self::NewSiteOccupation => "3".fmt(f),
            Self::HeaderInformationFollows => "4".fmt(f),
            Self::ExternalEvent => "5".fmt(f),
            Self::CycleSlip => "6".fmt(f),
        }
    }
}

/// Nature of a compressed epoch description
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EpochEvent {
    /// Literal epoch description: every satellite kernel must be dropped
    Reinitialize,
    /// Epoch description differentiated against the previous one
    Differential,
}

/// [EpochDecoder] recovers the epoch descriptions, stored without
/// their first column.
#[derive(Debug, Clone)]
pub struct EpochDecoder {
    revision: Revision,
    text: TextDiff,
}

impl EpochDecoder {
    pub fn new(revision: Revision) -> Self {
        Self {
            revision,
            text: TextDiff::new(0),
        }
    }

    /// Drops the reference description
    pub fn reset(&mut self) {
        self.text.reset();
    }

    /// Classifies this compressed epoch description
    pub fn classify(&self, line: &str) -> Result<EpochEvent, Error> {
        match (self.revision, line.chars().next()) {
            (Revision::V1, Some('&')) | (Revision::V3, Some('>')) => Ok(EpochEvent::Reinitialize),
            (Revision::V1, Some('>')) => Err(Error::BadV1Format),
            (Revision::V3, Some('&')) => Err(Error::BadV3Format),
            _ => Ok(EpochEvent::Differential),
        }
    }

    /// Decodes a new compressed epoch description
    pub fn decode(&mut self, line: &str) -> Result<EpochEvent, Error> {
        let event = self.classify(line)?;
        let content = line.get(1..).unwrap_or("");
        match event {
            EpochEvent::Reinitialize => {
                if !content.is_ascii() {
                    return Err(Error::NonAsciiContent);
                }
                #[cfg(feature = "log")]
                debug!("epoch reinitialization: {}", content);
                self.text.force_init(content);
            },
            EpochEvent::Differential => {
                let _ = self.text.decompress(content)?;
            },
        }
        Ok(event)
    }

    /// Latest recovered description
    pub fn description(&self) -> Option<&str> {
        self.text.reference()
    }

    fn field(&self, start: usize, end: usize) -> Result<&str, Error> {
        self.description()
            .ok_or(Error::MissingReferenceLine)?
            .get(start..end)
            .ok_or(Error::EpochFormat)
    }

    /// Epoch flag of the latest description
    pub fn flag(&self) -> Result<EpochFlag, Error> {
        let offset = self.revision.flag_offset();
        let flag = self.field(offset, offset + 1)?;
        if flag.trim().is_empty() {
            // blank flag is tolerated
            Ok(EpochFlag::Ok)
        } else {
            EpochFlag::from_str(flag)
        }
    }

    /// Number of satellites (or special records) of the latest description
    pub fn numsat(&self) -> Result<usize, Error> {
        let offset = self.revision.flag_offset() + 1;
        self.field(offset, offset + 3)?
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::NumSatParsing)
    }

    /// Satellites of the latest description, bounded by the declared
    /// number of satellites. Returns parsed identity and raw identifier.
    pub fn satellites(&self, layout: &Layout) -> Result<Vec<(SV, String)>, Error> {
        let numsat = self.numsat()?;
        let offset = self.revision.sv_offset();
        let mut satellites = Vec::with_capacity(numsat);
        for i in 0..numsat {
            let start = offset + i * 3;
            let id = self.field(start, start + 3)?;
            let sv = layout.parse_sv(id)?;
            satellites.push((sv, id.to_string()));
        }
        Ok(satellites)
    }

    /// Formats the latest description, with possible clock offset, into RINEX.
    pub fn format(&self, clock: Option<&str>) -> Result<String, Error> {
        let description = self.description().ok_or(Error::MissingReferenceLine)?;
        let flag = self.flag()?;
        let prefix = self.revision.epoch_prefix();
        let numsat = self.numsat()?;

        match self.revision {
            Revision::V3 => {
                let mut formatted = format!("{}{}", prefix, self.field(0, 34)?);
                if let Some(clock) = clock {
                    if !flag.is_event() {
                        formatted.push_str("      ");
                        formatted.push_str(clock);
                    }
                }
                Ok(formatted)
            },
            Revision::V1 => {
                let mut formatted = format!("{}{}", prefix, self.field(0, 31)?);
                if flag.is_event() {
                    return Ok(formatted);
                }

                let offset = self.revision.sv_offset();
                let nb_lines = div_ceil(numsat, 12);

                for line in 0..nb_lines {
                    if line > 0 {
                        formatted.push('\n');
                        formatted.push_str(&" ".repeat(32));
                    }
                    let start = offset + line * 36;
                    let end = offset + std::cmp::min(numsat, (line + 1) * 12) * 3;
                    formatted.push_str(description.get(start..end).ok_or(Error::EpochFormat)?);

                    if line == 0 {
                        if let Some(clock) = clock {
                            formatted = format!("{:<68}{}", formatted, clock);
                        }
                    }
                }
                if nb_lines == 0 {
                    if let Some(clock) = clock {
                        formatted = format!("{:<68}{}", formatted, clock);
                    }
                }
                Ok(formatted)
            },
        }
    }
}
