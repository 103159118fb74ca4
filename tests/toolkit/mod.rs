//! Test side CRINEX encoding, used to generate compressed streams
#![allow(dead_code)]

use rand::{distributions::Alphanumeric, Rng};

/// Formats a header line: content followed by its label, at column 60.
pub fn header_line(content: &str, label: &str) -> String {
    format!("{:<60}{}", content, label)
}

/// Fixed point formatting of a recovered value
pub fn fixed(value: i64, width: usize, decimals: u32) -> String {
    let scale = 10_u64.pow(decimals);
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let formatted = format!(
        "{}{}.{:0decimals$}",
        sign,
        abs / scale,
        abs % scale,
        decimals = decimals as usize
    );
    format!("{:>width$}", formatted, width = width)
}

/// Standard observation: F14.3 followed by LLI and SSI flags
pub fn observation(value: Option<i64>, lli: char, ssi: char) -> String {
    match value {
        Some(value) => format!("{}{}{}", fixed(value, 14, 3), lli, ssi),
        None => format!("{}{}{}", " ".repeat(14), lli, ssi),
    }
}

/// Text differentiation of `new` against `reference`
pub fn textdiff(reference: &str, new: &str) -> String {
    let reference = reference.as_bytes();
    let new = new.as_bytes();
    let len = reference.len().max(new.len());
    let mut compressed = String::with_capacity(len);
    for i in 0..len {
        let prev = reference.get(i).copied().unwrap_or(b' ');
        let next = new.get(i).copied().unwrap_or(b' ');
        if prev == next {
            compressed.push(' ');
        } else if next == b' ' {
            compressed.push('&');
        } else {
            compressed.push(next as char);
        }
    }
    compressed.trim_end().to_string()
}

/// Numerical differentiation encoder, mirror of the decoding kernel
#[derive(Debug, Clone)]
pub struct NumEncoder {
    order: usize,
    len: usize,
    value: i64,
    diffs: Vec<i64>,
}

impl NumEncoder {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            len: 0,
            value: 0,
            diffs: vec![0; order],
        }
    }

    pub fn reset(&mut self) {
        self.len = 0;
        self.value = 0;
        self.diffs = vec![0; self.order];
    }

    /// Compresses a new value
    pub fn compress(&mut self, value: i64) -> String {
        if self.len == 0 {
            self.value = value;
            self.len = 1;
            return format!("{}&{}", self.order, value);
        }
        let k = self.len.min(self.order);
        let mut diffs = vec![0; k];
        diffs[0] = value - self.value;
        for j in 1..k {
            diffs[j] = diffs[j - 1] - self.diffs[j - 1];
        }
        self.diffs[..k].copy_from_slice(&diffs);
        self.value = value;
        self.len = (self.len + 1).min(self.order);
        diffs[k - 1].to_string()
    }
}

/// Builds a compressed data line from the compressed fields and flags
pub fn data_line(fields: &[Option<String>], flags: &str) -> String {
    let mut line = fields
        .iter()
        .map(|f| f.clone().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ");
    if !flags.is_empty() {
        line.push(' ');
        line.push_str(flags);
    }
    line
}

/// Random program name, for CRINEX PROG / DATE
pub fn random_prog(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn encoder_ramp_up() {
        let mut encoder = NumEncoder::new(3);
        let compressed = [1000, 1010, 1025, 1046, 1073]
            .iter()
            .map(|v| encoder.compress(*v))
            .collect::<Vec<_>>();
        assert_eq!(compressed, vec!["3&1000", "10", "5", "1", "0"]);
    }
    #[test]
    fn text_encoding() {
        assert_eq!(textdiff("ABCD", "ABXD"), "  X");
        assert_eq!(textdiff("ABCD", "AB"), "  &&");
        assert_eq!(textdiff("AB", "ABCD"), "  CD");
    }
}
