//! Y. Hatanaka numerical differentiation
use crate::hatanaka::{ColumnSpec, Error};

/// Compressed numerical field, as found in the CRINEX body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DiffField {
    /// Blank field: no observation
    Missing,
    /// Literal value, (re)initializing the kernel at this order
    Init { order: usize, value: i64 },
    /// Differentiated value
    Delta(i64),
}

impl DiffField {
    /// Interprets a compressed numerical field
    pub fn parse(content: &str) -> Result<Self, Error> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::Missing);
        }
        if let Some((order, value)) = trimmed.split_once('&') {
            let order = order
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::MalformedField(trimmed.to_string()))?;
            let value = value
                .trim()
                .parse::<i64>()
                .map_err(|_| Error::MalformedField(trimmed.to_string()))?;
            Ok(Self::Init { order, value })
        } else {
            let delta = trimmed
                .parse::<i64>()
                .map_err(|_| Error::MalformedField(trimmed.to_string()))?;
            Ok(Self::Delta(delta))
        }
    }
}

/// [NumDiff] is the numerical differentiation kernel designed by Y. Hatanaka.
/// It recovers one fixed point numerical column from its successive differences.
/// `M` is the maximal order this kernel supports.
///
/// Right after (re)initialization, the kernel ramps up: the k-th value
/// following the literal one is a k-th order difference, until the nominal
/// order is reached.
#[derive(Debug, Clone)]
pub struct NumDiff<const M: usize> {
    /// Nominal order
    order: usize,
    /// Number of values recovered since initialization, saturates at order
    len: usize,
    /// Latest recovered value
    value: i64,
    /// `diffs[k]` is the (k+1)-th order difference of the latest value
    diffs: [i64; M],
    /// Column description
    spec: ColumnSpec,
}

impl<const M: usize> NumDiff<M> {
    /// Builds a new [NumDiff] kernel for this column.
    pub fn new(spec: ColumnSpec) -> Result<Self, Error> {
        Self::check_order(spec.order)?;
        Ok(Self {
            spec,
            len: 0,
            value: 0,
            order: spec.order,
            diffs: [0; M],
        })
    }

    fn check_order(order: usize) -> Result<(), Error> {
        if order == 0 {
            Err(Error::InvalidOrder(order))
        } else if order > M {
            Err(Error::OrderTooBig(order, M))
        } else {
            Ok(())
        }
    }

    /// Returns current nominal order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns column description
    pub fn spec(&self) -> ColumnSpec {
        self.spec
    }

    /// Returns latest recovered value, if any
    pub fn value(&self) -> Option<i64> {
        if self.len > 0 {
            Some(self.value)
        } else {
            None
        }
    }

    /// Drops the history: next value starts a new ramp up.
    /// Nominal order is preserved.
    pub fn reset(&mut self) {
        self.len = 0;
        self.value = 0;
        self.diffs = [0; M];
    }

    /// Force kernel (re)initialization with literal value, at given order.
    pub fn force_init(&mut self, value: i64, order: usize) -> Result<(), Error> {
        Self::check_order(order)?;
        self.reset();
        self.order = order;
        self.value = value;
        self.len = 1;
        Ok(())
    }

    /// Recovers a new value from given difference.
    /// On a kernel without history, the difference is the literal value.
    pub fn decompress(&mut self, delta: i64) -> i64 {
        if self.len == 0 {
            self.value = delta;
            self.len = 1;
            return self.value;
        }

        let k = self.len.min(self.order);
        self.diffs[k - 1] = delta;
        for j in (0..k - 1).rev() {
            self.diffs[j] = self.diffs[j].saturating_add(self.diffs[j + 1]);
        }
        self.value = self.value.saturating_add(self.diffs[0]);
        self.len = (self.len + 1).min(self.order);
        self.value
    }

    /// Formats given value according to the column description.
    pub fn format(&self, value: i64) -> Result<String, Error> {
        format_fixed(value, self.spec.width, self.spec.decimals)
    }

    /// Recovers and formats a new value.
    pub fn accept(&mut self, delta: i64) -> Result<String, Error> {
        let value = self.decompress(delta);
        self.format(value)
    }

    /// Applies the compressed field. Returns the recovered value,
    /// or None when the field is blank (kernel state is preserved).
    pub fn apply(&mut self, field: &DiffField) -> Result<Option<i64>, Error> {
        match field {
            DiffField::Missing => Ok(None),
            DiffField::Init { order, value } => {
                self.force_init(*value, *order)?;
                Ok(Some(*value))
            },
            DiffField::Delta(delta) => Ok(Some(self.decompress(*delta))),
        }
    }
}

/// Fortran like F<width>.<decimals> formatting of a fixed point integer
/// expressed in units of 10^-decimals.
pub(crate) fn format_fixed(value: i64, width: usize, decimals: usize) -> Result<String, Error> {
    let overflow = Error::FormatOverflow { value, width };
    let scale = 10_u64
        .checked_pow(decimals as u32)
        .ok_or_else(|| overflow.clone())?;

    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let (integer, fraction) = (abs / scale, abs % scale);

    let formatted = if decimals > 0 {
        format!(
            "{}{}.{:0decimals$}",
            sign,
            integer,
            fraction,
            decimals = decimals
        )
    } else {
        format!("{}{}", sign, integer)
    };

    if formatted.len() > width {
        return Err(overflow);
    }

    Ok(format!("{:>width$}", formatted, width = width))
}
