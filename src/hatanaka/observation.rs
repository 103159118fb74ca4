//! Satellite data lines
use std::collections::{hash_map::Entry, HashMap};

use gnss::prelude::SV;

use crate::hatanaka::{DiffField, Error, Layout, NumDiff, Revision, TextDiff};

#[cfg(feature = "log")]
use log::debug;

/// Number of observables per line, in RINEX2
const V1_OBS_PER_LINE: usize = 5;

/// [ObservationDecoder] owns one [NumDiff] kernel per satellite and column,
/// and one [TextDiff] kernel per satellite for the LLI and SSI flags.
/// Kernels are created on first encounter and dropped when the satellite
/// leaves the epoch description.
#[derive(Debug, Clone, Default)]
pub struct ObservationDecoder<const M: usize> {
    kernels: HashMap<(SV, usize), NumDiff<M>>,
    flags: HashMap<SV, TextDiff>,
}

impl<const M: usize> ObservationDecoder<M> {
    pub fn new() -> Self {
        Self {
            kernels: HashMap::with_capacity(128),
            flags: HashMap::with_capacity(32),
        }
    }

    /// Drops every kernel
    pub fn reset(&mut self) {
        self.kernels.clear();
        self.flags.clear();
    }

    /// Drops the kernels of satellites that are not part of this list
    pub fn retain(&mut self, satellites: &[SV]) {
        self.flags.retain(|sv, _| {
            let keep = satellites.contains(sv);
            #[cfg(feature = "log")]
            {
                if !keep {
                    debug!("{} removed", sv);
                }
            }
            keep
        });
        self.kernels.retain(|(sv, _), _| satellites.contains(sv));
    }

    /// Returns true if kernels exist for this satellite
    pub fn contains(&self, sv: &SV) -> bool {
        self.flags.contains_key(sv)
    }

    /// Recovered value of this column, if any
    pub fn value(&self, sv: &SV, column: usize) -> Option<i64> {
        self.kernels.get(&(*sv, column)).and_then(|k| k.value())
    }

    /// Decodes one compressed data line of this satellite.
    /// `id` is the satellite identifier, as written in the epoch description.
    pub fn decode(&mut self, layout: &Layout, sv: SV, id: &str, line: &str) -> Result<String, Error> {
        let columns = layout
            .columns(&sv)
            .ok_or(Error::UnknownObservables(sv.constellation))?;

        if !line.is_ascii() {
            return Err(Error::NonAsciiContent);
        }

        let numobs = columns.len();
        let mut fields = Vec::with_capacity(numobs);
        let mut offset = 0;

        for _ in 0..numobs {
            if offset >= line.len() {
                // early line termination: no more observations
                fields.push(DiffField::Missing);
                continue;
            }
            let end = line[offset..]
                .find(' ')
                .map(|i| offset + i)
                .unwrap_or(line.len());
            fields.push(DiffField::parse(&line[offset..end])?);
            offset = end + 1;
        }

        // LLI and SSI flags are digits, '&' blanks a flag
        let flags = line.get(offset..).unwrap_or("");
        let valid = flags
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b' ' || b == b'&');
        if !valid || flags.len() > 2 * numobs {
            let extra = flags.split_whitespace().count().max(1);
            return Err(Error::ColumnCountMismatch {
                expected: numobs,
                found: numobs + extra,
            });
        }

        let flags = self
            .flags
            .entry(sv)
            .or_insert_with(|| TextDiff::with_reference(2 * numobs, ""))
            .decompress(flags)?
            .to_string();

        let mut formatted = Vec::with_capacity(numobs);

        for (index, (field, spec)) in fields.iter().zip(columns.iter()).enumerate() {
            let value = match field {
                DiffField::Missing => None,
                field => {
                    let kernel = match self.kernels.entry((sv, index)) {
                        Entry::Occupied(e) => e.into_mut(),
                        Entry::Vacant(e) => {
                            e.insert(NumDiff::<M>::new(*spec)?)
                        },
                    };
                    match kernel.apply(field)? {
                        Some(value) => Some(kernel.format(value)?),
                        None => None,
                    }
                },
            };

            let lli = flags.get(2 * index..2 * index + 1).unwrap_or(" ");
            let ssi = flags.get(2 * index + 1..2 * index + 2).unwrap_or(" ");

            formatted.push(format!(
                "{}{}{}",
                value.unwrap_or_else(|| " ".repeat(spec.width)),
                lli,
                ssi
            ));
        }

        match layout.revision {
            Revision::V3 => {
                let mut content = id.to_string();
                for observation in formatted.iter() {
                    content.push_str(observation);
                }
                Ok(content.trim_end().to_string())
            },
            Revision::V1 => {
                let lines = formatted
                    .chunks(V1_OBS_PER_LINE)
                    .map(|chunk| chunk.concat().trim_end().to_string())
                    .collect::<Vec<_>>();
                Ok(lines.join("\n"))
            },
        }
    }
}
