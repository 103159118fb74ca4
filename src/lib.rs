#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate gnss_rs as gnss;

pub mod hatanaka;
pub mod header;
pub mod version;

mod error;

pub use error::{Error, ParsingError};

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        error::{Error, ParsingError},
        hatanaka::{
            ColumnSpec, Decompressor, DecompressorExpert, DecompressorExpertIO, DecompressorIO,
            EpochFlag, Layout, NumDiff, Revision, TextDiff, CRINEX,
        },
        header::Header,
        version::Version,
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::Epoch;
}
