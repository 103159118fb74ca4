//! Y. Hatanaka lossless TextDiff algorithm
use crate::hatanaka::Error;

/// [TextDiff] is a structure that implements the Text diff. algorithm
/// designed by Y. Hatanaka, which is a lossless text compression algorithm.
/// Each compressed character is interpreted against the column it lands on:
/// - a whitespace copies the previously recovered character,
/// - '&' blanks that column,
/// - any other character replaces the previous one.
///
/// Columns not covered by the compressed content retain their previous value.
/// The recovered content is at least `width` wide, and grows when
/// longer content is received.
#[derive(Debug, Clone, Default)]
pub struct TextDiff {
    /// Minimal width of the recovered content
    width: usize,
    /// Reference content. None until the first content is recovered.
    buffer: Option<String>,
}

impl TextDiff {
    /// Creates a new [TextDiff] without reference content: the first
    /// content to decompress must be literal and at least `width` wide.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            buffer: None,
        }
    }

    /// Creates a new [TextDiff] with reference content.
    /// An empty reference means blank columns.
    pub fn with_reference(width: usize, data: &str) -> Self {
        let mut s = Self::new(width);
        s.force_init(data);
        s
    }

    /// Force kernel reset using new content
    pub fn force_init(&mut self, data: &str) {
        self.buffer = Some(format!("{:<width$}", data, width = self.width));
    }

    /// Drops the reference content
    pub fn reset(&mut self) {
        self.buffer = None;
    }

    /// Returns the reference content, which is the latest recovered content.
    pub fn reference(&self) -> Option<&str> {
        self.buffer.as_deref()
    }

    /// Decompresses given data. Returns recovered content.
    pub fn decompress(&mut self, data: &str) -> Result<&str, Error> {
        if !data.is_ascii() {
            return Err(Error::NonAsciiContent);
        }

        let mut recovered = match &self.buffer {
            Some(buffer) => buffer.as_bytes().to_vec(),
            None => {
                // without reference, content must be literal and cover the minimal width
                if data.is_empty() || data.len() < self.width || data.contains(' ') {
                    return Err(Error::MissingReferenceLine);
                }
                Vec::with_capacity(self.width.max(data.len()))
            },
        };

        if recovered.len() < self.width {
            recovered.resize(self.width, b' ');
        }
        if recovered.len() < data.len() {
            recovered.resize(data.len(), b' ');
        }

        for (i, byte) in data.bytes().enumerate() {
            match byte {
                b' ' => {},
                b'&' => recovered[i] = b' ',
                byte => recovered[i] = byte,
            }
        }

        let recovered = String::from_utf8(recovered).map_err(|_| Error::NonAsciiContent)?;
        Ok(self.buffer.insert(recovered).as_str())
    }

    /// Decompresses the `[start, end)` section of given content.
    /// Section is bounded to the content.
    pub fn accept(&mut self, data: &str, start: usize, end: usize) -> Result<String, Error> {
        let end = end.min(data.len());
        let start = start.min(end);
        let section = data.get(start..end).ok_or(Error::NonAsciiContent)?;
        Ok(self.decompress(section)?.to_string())
    }
}
