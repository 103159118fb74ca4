//! CRINEX Header definitions
use std::str::FromStr;

use hifitime::Epoch;

use crate::{error::ParsingError, hatanaka::Revision, version::Version};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label of the first CRINEX header line
pub(crate) const VERSION_LABEL: &str = "CRINEX VERS   / TYPE";

/// Label of the second CRINEX header line
pub(crate) const PROG_DATE_LABEL: &str = "CRINEX PROG / DATE";

/*
 * Infaillible `Epoch::now()` call.
 */
fn now() -> Epoch {
    Epoch::now().unwrap_or(Epoch::from_gregorian_utc_at_midnight(2000, 1, 1))
}

/*
 * Parses the %b month format
 */
fn parse_formatted_month(content: &str) -> Result<u8, ParsingError> {
    match content {
        "Jan" => Ok(1),
        "Feb" => Ok(2),
        "Mar" => Ok(3),
        "Apr" => Ok(4),
        "May" => Ok(5),
        "Jun" => Ok(6),
        "Jul" => Ok(7),
        "Aug" => Ok(8),
        "Sep" => Ok(9),
        "Oct" => Ok(10),
        "Nov" => Ok(11),
        "Dec" => Ok(12),
        _ => Err(ParsingError::DatetimeFormat),
    }
}

/// CRINEX specifications
#[derive(Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CRINEX {
    /// Compression program version
    pub version: Version,
    /// Compression program name
    pub prog: String,
    /// Date of compression
    pub date: Epoch,
}

impl CRINEX {
    /// Defines compression algorithm revision
    pub fn with_version(&self, version: Version) -> Self {
        let mut s = self.clone();
        s.version = version;
        s
    }

    /// Defines compression program name
    pub fn with_prog(&self, prog: &str) -> Self {
        let mut s = self.clone();
        s.prog = prog.to_string();
        s
    }

    /// Defines date of compression
    pub fn with_date(&self, e: Epoch) -> Self {
        let mut s = self.clone();
        s.date = e;
        s
    }

    /// Returns the compression [Revision]
    pub fn revision(&self) -> Result<Revision, ParsingError> {
        Revision::from_version(self.version)
            .ok_or_else(|| ParsingError::NonSupportedCrxVersion(self.version.to_string()))
    }

    /// Parses the first header line
    pub(crate) fn with_version_type(&self, line: &str) -> Result<Self, ParsingError> {
        if line.len() < 60 {
            return Err(ParsingError::HeaderLineTooShort);
        }
        if !line.is_ascii() || !line[60..].trim().eq(VERSION_LABEL) {
            return Err(ParsingError::NotACrinex);
        }
        let field = line.split_at(20).0.trim();
        let version = Version::from_str(field).map_err(|e| {
            // numerical, yet out of range
            if !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
                ParsingError::NonSupportedCrxVersion(field.to_string())
            } else {
                ParsingError::VersionParsing(e)
            }
        })?;
        let s = self.with_version(version);
        let _ = s.revision()?;
        Ok(s)
    }

    /// Parse and append prog+date fields
    pub(crate) fn with_prog_date(&self, prog_date: &str) -> Result<Self, ParsingError> {
        if prog_date.len() < 60 || !prog_date.is_ascii() {
            return Err(ParsingError::HeaderLineTooShort);
        }

        let (prog, rem) = prog_date.split_at(20);
        let (_, rem) = rem.split_at(20);
        let datetime_str = rem.split_at(20).0.trim();

        let mut i = 0;
        let mut year = 0_i32;
        let mut month = 0_u8;
        let mut day = 0_u8;
        let mut hour = 0_u8;
        let mut mins = 0_u8;

        for (index, datetime) in datetime_str.split_ascii_whitespace().enumerate() {
            match index {
                0 => {
                    for (index, parsed) in datetime.split('-').enumerate() {
                        let parsed = parsed.trim();
                        match index {
                            0 => {
                                day = parsed
                                    .parse::<u8>()
                                    .or(Err(ParsingError::DatetimeParsing))?;
                            },
                            1 => {
                                month = parse_formatted_month(parsed)?;
                            },
                            2 => {
                                year = parsed
                                    .parse::<i32>()
                                    .or(Err(ParsingError::DatetimeParsing))?;
                            },
                            _ => {},
                        }
                    }
                },
                1 => {
                    for (index, parsed) in datetime.split(':').enumerate() {
                        let parsed = parsed.trim();
                        match index {
                            0 => {
                                hour = parsed
                                    .parse::<u8>()
                                    .or(Err(ParsingError::DatetimeParsing))?;
                            },
                            1 => {
                                mins = parsed
                                    .parse::<u8>()
                                    .or(Err(ParsingError::DatetimeParsing))?;
                            },
                            _ => {},
                        }
                    }
                },
                _ => {},
            }

            i += 1;
        }

        if i != 2 || month == 0 {
            return Err(ParsingError::DatetimeFormat);
        }

        // 2 digit year: first compressions date back to the 90s
        if year < 80 {
            year += 2000;
        } else if year < 100 {
            year += 1900;
        }

        let epoch = Epoch::maybe_from_gregorian_utc(year, month, day, hour, mins, 0, 0)
            .or(Err(ParsingError::DatetimeParsing))?;

        let s = self.with_prog(prog.trim());
        let s = s.with_date(epoch);
        Ok(s)
    }
}

impl Default for CRINEX {
    fn default() -> Self {
        Self {
            version: Version { major: 3, minor: 0 },
            prog: format!("crinex-{}", env!("CARGO_PKG_VERSION")),
            date: now(),
        }
    }
}

impl std::str::FromStr for CRINEX {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut crinex = Self::default();
        let mut lines = s.lines();

        // We expect one line separator.
        // Content should follow standard ordering
        let line = lines.next().ok_or(ParsingError::NotACrinex)?;
        crinex = crinex.with_version_type(line)?;

        let line = lines.next().ok_or(ParsingError::NotACrinex)?;
        if line.len() < 60 {
            return Err(ParsingError::HeaderLineTooShort);
        }
        if !line.is_ascii() || !line[60..].trim().eq(PROG_DATE_LABEL) {
            return Err(ParsingError::NotACrinex);
        }
        crinex.with_prog_date(line)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_crinex_3() {
        let crinex = CRINEX {
            version: Version::new(3, 0),
            prog: "RNX2CRX ver.4.0.7".to_string(),
            date: Epoch::from_str("2021-01-02T00:01:00 UTC").unwrap(),
        };

        let content =
            "3.0                 COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     CRINEX PROG / DATE";

        let decoded = CRINEX::from_str(content).unwrap();
        assert_eq!(decoded, crinex);
        assert_eq!(decoded.revision(), Ok(Revision::V3));
    }

    #[test]
    fn test_crinex_1() {
        let crinex = CRINEX {
            version: Version::new(1, 0),
            prog: "test".to_string(),
            date: Epoch::from_str("2015-10-20T09:08:00 UTC").unwrap(),
        };

        let content =
            "1.0                 COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
test                                    20-Oct-15 09:08     CRINEX PROG / DATE";

        let decoded = CRINEX::from_str(content).unwrap();
        assert_eq!(decoded, crinex);
        assert_eq!(decoded.revision(), Ok(Revision::V1));
    }

    #[test]
    fn last_century() {
        let crinex = CRINEX::default()
            .with_prog_date(
                "RNX2CRX ver.4.0                         12-Feb-98 10:17     CRINEX PROG / DATE",
            )
            .unwrap();
        assert_eq!(
            crinex.date,
            Epoch::from_str("1998-02-12T10:17:00 UTC").unwrap()
        );
    }

    #[test]
    fn test_with_prog_date() {
        let crinex = CRINEX::default();

        let crinex = crinex
            .with_prog_date(
                "RNX2CRX ver.4.0.7                       28-Dec-21 00:17     CRINEX PROG / DATE",
            )
            .unwrap();
        assert_eq!(crinex.prog, "RNX2CRX ver.4.0.7");

        let _ = crinex
            .with_prog_date("RNX2CRX ver.4.0.7                       28-Dec-21 00:17     ")
            .unwrap();

        assert_eq!(
            crinex.with_prog_date(
                "RNX2CRX ver.4.0.7                       28-Abc-21 00:17     CRINEX PROG / DATE",
            ),
            Err(ParsingError::DatetimeFormat)
        );
    }

    #[test]
    fn bad_labels() {
        let content =
            "3.0                 COMPACT RINEX FORMAT                    RINEX VERSION / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     CRINEX PROG / DATE";
        assert_eq!(CRINEX::from_str(content), Err(ParsingError::NotACrinex));

        let content =
            "3.0                 COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     PGM / RUN BY / DATE";
        assert_eq!(CRINEX::from_str(content), Err(ParsingError::NotACrinex));

        let content =
            "999.0               COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     CRINEX PROG / DATE";
        assert_eq!(
            CRINEX::from_str(content),
            Err(ParsingError::NonSupportedCrxVersion("999.0".to_string()))
        );

        let content =
            "v3                  COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     CRINEX PROG / DATE";
        assert!(matches!(
            CRINEX::from_str(content),
            Err(ParsingError::VersionParsing(_))
        ));

        let content =
            "2.0                 COMPACT RINEX FORMAT                    CRINEX VERS   / TYPE
RNX2CRX ver.4.0.7                       02-Jan-21 00:01     CRINEX PROG / DATE";
        assert_eq!(
            CRINEX::from_str(content),
            Err(ParsingError::NonSupportedCrxVersion("2.0".to_string()))
        );
    }
}
