//! CRINEX decompression from direct I/O

use std::{
    collections::VecDeque,
    io::{BufRead, BufReader, Lines, Read},
};

use crate::{
    error::{Error, ParsingError},
    hatanaka::{decompressor::DecompressorExpert, Layout},
    header::Header,
};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "flate2")]
use std::{fs::File, path::Path};

#[cfg(feature = "log")]
use log::error;

/// [DecompressorIO] is a [DecompressorExpertIO] that works directly
/// on any [Read]able I/O interface. Use it to decompress a complete
/// CRINEX file (header and body) into readable RINEX, line by line.
/// It implements the same internal parameters as the historical CRX2RNX tool.
pub type DecompressorIO<R> = DecompressorExpertIO<5, R>;

/// Unlike [DecompressorIO], [DecompressorExpertIO] is not limited in the decompression
/// algorithm and gives you all flexibility. This is needed if your data compressor
/// used a compression order above 5.
///
/// [DecompressorExpertIO] is an [Iterator] of recovered RINEX lines (without \n termination).
/// The CRINEX specific header lines are dropped, the RINEX header lines are forwarded as is.
/// Errors are reported with the faulty line number (1-based) and content.
/// Iteration stops on first error.
pub struct DecompressorExpertIO<const M: usize, R: Read> {
    /// Internal LinesIter. The decompressor works on a line basis.
    lines: Lines<BufReader<R>>,
    /// Number of lines consumed so far
    line: usize,
    /// Header section, until complete
    header: Header,
    /// Internal Decompressor, once the header has been parsed.
    decomp: Option<DecompressorExpert<M>>,
    /// Recovered lines, pending
    pending: VecDeque<String>,
    /// Internal buffer
    buf: String,
    /// Latest body line
    last: String,
    /// True once iteration ended
    done: bool,
}

impl<const M: usize, R: Read> DecompressorExpertIO<M, R> {
    /// Builds a new [DecompressorExpertIO] from [Read]able interface,
    /// and implements the buffering for you.
    /// The stream should start with the CRINEX header section.
    pub fn from_read(reader: R) -> Self {
        Self::from_bufread(BufReader::new(reader))
    }

    /// Builds a new [DecompressorExpertIO] from your own Buffered Reader implementation.
    /// Refer to [Self::from_read] for more information.
    pub fn from_bufread(reader: BufReader<R>) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
            header: Header::default(),
            decomp: None,
            pending: VecDeque::with_capacity(8),
            buf: String::with_capacity(1024),
            last: String::new(),
            done: false,
        }
    }

    /// Builds a new [DecompressorExpertIO] that only streams the CRINEX body.
    /// The header section has been skipped, and is described by [Layout].
    pub fn from_body(reader: R, layout: Layout) -> Result<Self, Error> {
        let mut s = Self::from_read(reader);
        s.header.complete = true;
        s.decomp = Some(
            DecompressorExpert::<M>::new(layout).map_err(|error| Error::Decompression {
                line: 0,
                content: String::new(),
                error,
            })?,
        );
        Ok(s)
    }

    /// Returns the [Header] gathered so far
    pub fn header(&self) -> &Header {
        &self.header
    }

    fn fail(&mut self, content: &str, error: crate::hatanaka::Error) -> Error {
        #[cfg(feature = "log")]
        error!("line #{}: {}", self.line, error);
        self.done = true;
        Error::Decompression {
            line: self.line,
            content: content.to_string(),
            error,
        }
    }

    /// Consumes one header line
    fn consume_header(&mut self, line: String) -> Result<(), Error> {
        if self.header.parse_line(&line)? {
            self.pending.push_back(line);
        }
        if self.header.complete {
            let layout = self.header.layout()?;
            let decomp = DecompressorExpert::<M>::new(layout).map_err(|e| self.fail("", e))?;
            self.decomp = Some(decomp);
        }
        Ok(())
    }

    /// Consumes one body line
    fn consume_body(&mut self, line: String) -> Result<(), Error> {
        self.buf.clear();
        let result = match &mut self.decomp {
            Some(decomp) => decomp.decompress(&line, &mut self.buf),
            None => return Err(Error::Parsing(ParsingError::MissingHeaderDelimiter)),
        };
        match result {
            Ok(_) => {
                self.pending
                    .extend(self.buf.lines().map(|line| line.to_string()));
                self.last = line;
                Ok(())
            },
            Err(e) => Err(self.fail(&line, e)),
        }
    }

    /// End of stream
    fn conclude(&mut self) -> Result<(), Error> {
        self.done = true;
        let result = match &self.decomp {
            Some(decomp) => decomp.finish(),
            None => return Err(Error::Parsing(ParsingError::MissingHeaderDelimiter)),
        };
        result.map_err(|error| {
            let content = std::mem::take(&mut self.last);
            self.fail(&content, error)
        })
    }
}

impl<const M: usize, R: Read> Iterator for DecompressorExpertIO<M, R> {
    type Item = Result<String, Error>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.pending.pop_front() {
                return Some(Ok(line));
            }
            if self.done {
                return None;
            }

            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                },
                None => {
                    return match self.conclude() {
                        Ok(_) => None,
                        Err(e) => Some(Err(e)),
                    };
                },
            };

            self.line += 1;

            let result = if self.decomp.is_none() {
                self.consume_header(line)
            } else {
                self.consume_body(line)
            };

            if let Err(e) = result {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

#[cfg(feature = "flate2")]
#[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
impl<const M: usize> DecompressorExpertIO<M, GzDecoder<File>> {
    /// Builds a new [DecompressorExpertIO] from Gzip compressed CRINEX file.
    pub fn from_gzip_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let fd = File::open(path)?;
        Ok(Self::from_read(GzDecoder::new(fd)))
    }
}

#[cfg(feature = "flate2")]
#[cfg_attr(docsrs, doc(cfg(feature = "flate2")))]
impl<const M: usize> DecompressorExpertIO<M, Box<dyn Read>> {
    /// Builds a new [DecompressorExpertIO] from local CRINEX file,
    /// Gzip compressed if its name terminates with ".gz".
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let fd = File::open(path)?;
        let gzip = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false);
        let reader: Box<dyn Read> = if gzip {
            Box::new(GzDecoder::new(fd))
        } else {
            Box::new(fd)
        };
        Ok(Self::from_read(reader))
    }
}
