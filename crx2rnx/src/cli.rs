use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

pub struct Cli {
    /// arguments passed by user
    pub matches: ArgMatches,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: {
                Command::new("crx2rnx")
                    .version(env!("CARGO_PKG_VERSION"))
                    .about("Compact RINEX decompression tool")
                    .arg_required_else_help(true)
                    .color(ColorChoice::Always)
                    .arg(
                        Arg::new("filepath")
                            .short('f')
                            .long("fp")
                            .action(ArgAction::Set)
                            .required(true)
                            .help("Input CRINEX file. Gzip compressed files (.gz) are supported."),
                    )
                    .arg(
                        Arg::new("output")
                            .short('o')
                            .long("output")
                            .action(ArgAction::Set)
                            .help(
                                "Custom output filename. Otherwise, it is deduced from the input name,
which will not work correctly if your input does not follow standard conventions.",
                            ),
                    )
                    .get_matches()
            },
        }
    }
    /// Input file path
    pub fn input_path(&self) -> PathBuf {
        let path = self
            .matches
            .get_one::<String>("filepath")
            .map(|s| s.as_str())
            .unwrap_or_default();
        Path::new(path).to_path_buf()
    }
    /// Custom output file path
    pub fn output_path(&self) -> Option<PathBuf> {
        self.matches
            .get_one::<String>("output")
            .map(|s| Path::new(s).to_path_buf())
    }
}
