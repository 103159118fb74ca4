//! Command line tool to decompress CRINEX files
mod cli;

use cli::Cli;

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use crinex::prelude::DecompressorIO;
use env_logger::{Builder, Target};
use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Crinex(#[from] crinex::Error),
    #[error("failed to determine input file name")]
    FileName,
}

/// Deduces RINEX file name from CRINEX file name.
///  - .gz termination is dropped
///  - .crx becomes .rnx (V3 file names)
///  - .YYd becomes .YYo, .YYD becomes .YYO (V2 file names)
fn output_filename(input: &Path) -> Result<String, Error> {
    let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or(Error::FileName)?;

    let name = name
        .strip_suffix(".gz")
        .or_else(|| name.strip_suffix(".GZ"))
        .unwrap_or(name);

    if let Some(stem) = name.strip_suffix(".crx") {
        return Ok(format!("{}.rnx", stem));
    }
    if let Some(stem) = name.strip_suffix(".CRX") {
        return Ok(format!("{}.RNX", stem));
    }
    let bytes = name.as_bytes();
    let len = bytes.len();
    if len > 3 && bytes[len - 4] == b'.' && bytes[len - 3..len - 1].iter().all(u8::is_ascii_digit) {
        match bytes[len - 1] {
            b'd' => return Ok(format!("{}o", &name[..len - 1])),
            b'D' => return Ok(format!("{}O", &name[..len - 1])),
            _ => {},
        }
    }
    Ok(format!("{}.rnx", name))
}

fn main() -> Result<(), Error> {
    let mut builder = Builder::from_default_env();
    builder
        .target(Target::Stdout)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let cli = Cli::new();
    let input_path = cli.input_path();

    let output_path = match cli.output_path() {
        Some(path) => path,
        None => {
            let name = output_filename(&input_path)?;
            match input_path.parent() {
                Some(parent) => parent.join(name),
                None => PathBuf::from(name),
            }
        },
    };

    info!("decompressing \"{}\"..", input_path.display());

    let decompressor = DecompressorIO::<Box<dyn Read>>::from_file(&input_path)?;

    let fd = File::create(&output_path)?;
    let mut writer = BufWriter::new(fd);

    for line in decompressor {
        let line = line?;
        writeln!(writer, "{}", line)?;
    }

    writer.flush()?;
    info!("\"{}\" generated", output_path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::output_filename;
    use std::path::Path;

    #[test]
    fn output_filenames() {
        for (input, expected) in [
            ("ESBC00DNK_R_20201770000_01D_30S_MO.crx", "ESBC00DNK_R_20201770000_01D_30S_MO.rnx"),
            ("ESBC00DNK_R_20201770000_01D_30S_MO.crx.gz", "ESBC00DNK_R_20201770000_01D_30S_MO.rnx"),
            ("data/AJAC3550.21d", "AJAC3550.21o"),
            ("data/AJAC3550.21D", "AJAC3550.21O"),
            ("AJAC3550.21d.gz", "AJAC3550.21o"),
            ("compressed", "compressed.rnx"),
            ("version.2d", "version.2d.rnx"),
        ] {
            assert_eq!(output_filename(Path::new(input)).unwrap(), expected);
        }
    }
}
