//! CRINEX decompression module
use gnss::prelude::SV;

use crate::{
    hatanaka::{ClockOffset, EpochDecoder, EpochEvent, EpochFlag, Error, Layout, ObservationDecoder},
    header::Header,
};

mod io;

pub use io::{DecompressorExpertIO, DecompressorIO};

#[cfg(feature = "log")]
use log::debug;

/// [Decompressor] is a structure to decompress CRINEX (compressed compacted RINEX)
/// into readable RINEX. It is scaled to operate according to the historical CRX2RNX tool,
/// which limits itself to M=5 in the differentiation algorithm.
/// If you want complete control over the decompression algorithm, prefer [DecompressorExpert].
///
/// [Decompressor] implements the CRINEX decompression algorithm, following
/// the specifications written by Y. Hatanaka. Like RINEX, CRINEX (compact) RINEX
/// is a line based format (\n termination), this structures works on a line basis.
/// It only applies to the file body: the header section is described by the [Layout].
///
/// ```
/// use crinex::prelude::*;
///
/// let layout = Layout::new(Revision::V3)
///     .with_observables(Constellation::GPS, 2);
///
/// let mut decompressor = Decompressor::new(layout)
///     .unwrap();
///
/// let mut rinex = String::new();
/// for line in [
///     "> 2021 01 01 00 00 00.0000000  0  1      G01",
///     "",
///     "3&20000000000 3&105000000000",
/// ] {
///     decompressor.decompress(line, &mut rinex)
///         .unwrap();
/// }
///
/// assert!(decompressor.finish().is_ok());
/// assert_eq!(
///     rinex,
///     "> 2021 01 01 00 00 00.0000000  0  1
/// G01  20000000.000   105000000.000
/// ");
/// ```
pub type Decompressor = DecompressorExpert<5>;

/// Internal Finite [State] Machine
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum State {
    #[default]
    /// Gathering Epoch descriptor.
    Epoch,
    /// Gathering Clock offset, recovering complete epoch description.
    Clock,
    /// Observations gathering and recovering.
    Observation,
    /// Special records following an event epoch, forwarded as is.
    Records,
}

/// [DecompressorExpert] gives you full control over the maximal compression order.
/// When decoding, we adapt to the compression order applied when the stream was encoded,
/// as long as it does not exceed `M`.
#[derive(Debug, Clone)]
pub struct DecompressorExpert<const M: usize> {
    /// Column layout
    layout: Layout,
    /// Internal Finite [State] Machine.
    state: State,
    /// Epoch description kernel
    epoch: EpochDecoder,
    /// Clock offset kernel
    clock: ClockOffset<M>,
    /// Observation kernels
    observations: ObservationDecoder<M>,
    /// Satellites of the ongoing epoch, with their raw identifier
    satellites: Vec<(SV, String)>,
    /// Satellite pointer, inside epoch
    sv_ptr: usize,
    /// Remaining special records
    records: usize,
    /// Header definitions possibly following an event
    header_update: Option<Header>,
}

impl<const M: usize> DecompressorExpert<M> {
    /// Builds new CRINEX decompressor for this [Layout].
    /// Fails if one of the columns uses a compression order greater than `M`.
    pub fn new(layout: Layout) -> Result<Self, Error> {
        layout.validate::<M>()?;
        #[cfg(feature = "log")]
        debug!("{:?} - compression order {}", layout.revision, layout.max_order());
        Ok(Self {
            state: State::default(),
            epoch: EpochDecoder::new(layout.revision),
            clock: ClockOffset::new(layout.clock)?,
            observations: ObservationDecoder::new(),
            satellites: Vec::with_capacity(32),
            sv_ptr: 0,
            records: 0,
            header_update: None,
            layout,
        })
    }

    /// Returns current [Layout]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns current [State]
    pub fn state(&self) -> State {
        self.state
    }

    /// Drops every satellite kernel. The clock offset kernel is preserved.
    pub fn reinitialize(&mut self) {
        #[cfg(feature = "log")]
        debug!("reinitialization");
        self.observations.reset();
    }

    /// Decompresses following line and pushes recovered content into `output`.
    /// Inputs
    ///  - line: trimed line (no \n termination), which is consistent with
    ///    [std::io::Lines].
    ///  - output: destination buffer. Each recovered line is \n terminated.
    ///
    /// Returns
    ///  - size: produced size (total bytes recovered).
    ///
    /// Depending on current state, several input lines may be needed
    /// to recover a new line. Recovered content may span several lines as well,
    /// especially when working with a V1 stream.
    pub fn decompress(&mut self, line: &str, output: &mut String) -> Result<usize, Error> {
        let size = output.len();
        match self.state {
            State::Epoch => self.run_epoch(line, output)?,
            State::Clock => self.run_clock(line, output)?,
            State::Observation => self.run_observation(line, output)?,
            State::Records => self.run_records(line, output)?,
        }
        Ok(output.len() - size)
    }

    /// Declares end of stream. Fails if the stream was interrupted
    /// while more lines were expected.
    pub fn finish(&self) -> Result<(), Error> {
        match self.state {
            State::Epoch => Ok(()),
            _ => Err(Error::TruncatedStream),
        }
    }

    /// Process following line, in [State::Epoch]
    fn run_epoch(&mut self, line: &str, output: &mut String) -> Result<(), Error> {
        if self.epoch.decode(line)? == EpochEvent::Reinitialize {
            self.reinitialize();
        }

        let flag = self.epoch.flag()?;
        let numsat = self.epoch.numsat()?;

        if flag.is_event() {
            output.push_str(&self.epoch.format(None)?);
            output.push('\n');

            self.records = numsat;
            if numsat > 0 {
                if flag == EpochFlag::HeaderInformationFollows {
                    // header section is to be continued
                    self.header_update = Some(Header::default());
                }
                self.state = State::Records;
            }
            return Ok(());
        }

        self.satellites = self.epoch.satellites(&self.layout)?;

        let svs = self
            .satellites
            .iter()
            .map(|(sv, _)| *sv)
            .collect::<Vec<_>>();

        self.observations.retain(&svs);
        self.sv_ptr = 0;
        self.state = State::Clock;
        Ok(())
    }

    /// Process following line, in [State::Clock].
    /// Epoch description is recovered once the clock offset is known.
    fn run_clock(&mut self, line: &str, output: &mut String) -> Result<(), Error> {
        let _ = self.clock.decode(line)?;
        let clock = self.clock.format()?;

        output.push_str(&self.epoch.format(clock.as_deref())?);
        output.push('\n');

        self.state = if self.satellites.is_empty() {
            State::Epoch
        } else {
            State::Observation
        };
        Ok(())
    }

    /// Process following line, in [State::Observation]
    fn run_observation(&mut self, line: &str, output: &mut String) -> Result<(), Error> {
        let (sv, id) = self
            .satellites
            .get(self.sv_ptr)
            .ok_or(Error::TruncatedStream)?;

        let recovered = self.observations.decode(&self.layout, *sv, id, line)?;
        output.push_str(&recovered);
        output.push('\n');

        self.sv_ptr += 1;
        if self.sv_ptr == self.satellites.len() {
            self.state = State::Epoch;
        }
        Ok(())
    }

    /// Process following line, in [State::Records]
    fn run_records(&mut self, line: &str, output: &mut String) -> Result<(), Error> {
        output.push_str(line);
        output.push('\n');

        if let Some(header) = &mut self.header_update {
            header.parse_rinex_line(line).map_err(Error::HeaderUpdate)?;
        }

        self.records = self.records.saturating_sub(1);
        if self.records == 0 {
            if let Some(header) = self.header_update.take() {
                if !header.observables.is_empty() {
                    #[cfg(feature = "log")]
                    debug!("observables update: {:?}", header.observables);
                    self.layout = header
                        .update_layout(&self.layout)
                        .map_err(Error::HeaderUpdate)?;
                    self.layout.validate::<M>()?;
                }
            }
            self.state = State::Epoch;
        }
        Ok(())
    }
}
