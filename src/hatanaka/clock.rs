//! Receiver clock offset
use crate::hatanaka::{ColumnSpec, DiffField, Error, NumDiff};

#[cfg(feature = "log")]
use log::debug;

/// [ClockOffset] recovers the receiver clock offset, which follows every
/// epoch description. It owns a dedicated [NumDiff] kernel, independent
/// of the satellite kernels: it is not affected by epoch reinitialization.
#[derive(Debug, Clone)]
pub struct ClockOffset<const M: usize> {
    kernel: NumDiff<M>,
}

impl<const M: usize> ClockOffset<M> {
    pub fn new(spec: ColumnSpec) -> Result<Self, Error> {
        Ok(Self {
            kernel: NumDiff::new(spec)?,
        })
    }

    /// Decodes the compressed clock offset line.
    /// An empty line carries the latest value forward.
    pub fn decode(&mut self, line: &str) -> Result<Option<i64>, Error> {
        match DiffField::parse(line)? {
            DiffField::Missing => {
                #[cfg(feature = "log")]
                {
                    if let Some(value) = self.kernel.value() {
                        debug!("clock offset carried forward: {}", value);
                    }
                }
                Ok(self.kernel.value())
            },
            field => self.kernel.apply(&field),
        }
    }

    /// Latest recovered value, in units of the column
    pub fn value(&self) -> Option<i64> {
        self.kernel.value()
    }

    /// Formats the latest recovered value, if any.
    pub fn format(&self) -> Result<Option<String>, Error> {
        match self.kernel.value() {
            Some(value) => Ok(Some(self.kernel.format(value)?)),
            None => Ok(None),
        }
    }

    /// Drops the clock history
    pub fn reset(&mut self) {
        self.kernel.reset();
    }
}
