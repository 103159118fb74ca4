mod toolkit;

use crinex::prelude::*;
use toolkit::{header_line, observation, textdiff};

fn header() -> Vec<String> {
    vec![
        header_line(
            "3.0                 COMPACT RINEX FORMAT",
            "CRINEX VERS   / TYPE",
        ),
        header_line(
            "RNX2CRX ver.4.0.7                       02-Jan-21 00:01",
            "CRINEX PROG / DATE",
        ),
        header_line(
            "     3.04           OBSERVATION DATA    M",
            "RINEX VERSION / TYPE",
        ),
        header_line("G    3 C1C L1C S1C", "SYS / # / OBS TYPES"),
        header_line("R    2 C1C L1C", "SYS / # / OBS TYPES"),
        header_line("", "END OF HEADER"),
    ]
}

/// Epoch description, without its first column
fn description(mins: u8, secs: u8, flag: u8, numsat: usize, sats: &str) -> String {
    let desc = format!(
        " 2021 01 01 00 {:02} {:02}.0000000  {}{:>3}",
        mins, secs, flag, numsat
    );
    if sats.is_empty() {
        desc
    } else {
        format!("{}      {}", desc, sats)
    }
}

fn epoch_line(description: &str, clock: &str) -> String {
    format!(">{}      {}", &description[..34], clock)
}

fn data(id: &str, observations: &[String]) -> String {
    format!("{}{}", id, observations.concat())
        .trim_end()
        .to_string()
}

#[test]
fn v3_decompression() {
    let epoch_1 = description(0, 0, 0, 3, "G01G07R03");
    let epoch_2 = description(0, 30, 0, 2, "G01R03");
    let epoch_3 = description(1, 0, 0, 3, "G01G07R03");
    let epoch_4 = description(1, 30, 4, 2, "");
    let epoch_5 = description(2, 0, 0, 1, "G01");

    let comment = header_line("ANTENNA SWAP", "COMMENT");
    let update = header_line("G    2 C1C L1C", "SYS / # / OBS TYPES");

    let mut content = header();
    content.extend(
        [
            format!(">{}", epoch_1),
            "3&123456789012".to_string(),
            "3&20000000000 3&105000000000 3&45000    8 5".to_string(),
            "3&21000000000 3&110000000000".to_string(),
            "3&19000000000 3&101000000000".to_string(),
            // G07 is lost, clock is carried forward
            format!(" {}", textdiff(&epoch_1, &epoch_2)),
            "".to_string(),
            "1000 -2000 10".to_string(),
            "".to_string(),
            // G07 is back
            format!(" {}", textdiff(&epoch_2, &epoch_3)),
            "100".to_string(),
            "  5    & &".to_string(),
            "3&22000000000".to_string(),
            "1000 1000".to_string(),
            // header update
            format!(">{}", epoch_4),
            comment.clone(),
            update.clone(),
            format!(">{}", epoch_5),
            "".to_string(),
            "3&20000005000 3&105000005000".to_string(),
        ]
        .into_iter(),
    );

    let content = content.join("\n");

    let recovered = DecompressorIO::from_read(content.as_bytes())
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    let mut expected = header()[2..].to_vec();
    expected.extend(
        [
            epoch_line(&epoch_1, " 0.123456789012"),
            data(
                "G01",
                &[
                    observation(Some(20000000000), ' ', ' '),
                    observation(Some(105000000000), ' ', '8'),
                    observation(Some(45000), ' ', '5'),
                ],
            ),
            data(
                "G07",
                &[
                    observation(Some(21000000000), ' ', ' '),
                    observation(Some(110000000000), ' ', ' '),
                ],
            ),
            data(
                "R03",
                &[
                    observation(Some(19000000000), ' ', ' '),
                    observation(Some(101000000000), ' ', ' '),
                ],
            ),
            epoch_line(&epoch_2, " 0.123456789012"),
            data(
                "G01",
                &[
                    observation(Some(20000001000), ' ', ' '),
                    observation(Some(104999998000), ' ', '8'),
                    observation(Some(45010), ' ', '5'),
                ],
            ),
            "R03".to_string(),
            epoch_line(&epoch_3, " 0.123456789112"),
            data(
                "G01",
                &[
                    observation(None, ' ', ' '),
                    observation(None, ' ', ' '),
                    observation(Some(45025), ' ', ' '),
                ],
            ),
            data("G07", &[observation(Some(22000000000), ' ', ' ')]),
            data(
                "R03",
                &[
                    observation(Some(19000001000), ' ', ' '),
                    observation(Some(101000001000), ' ', ' '),
                ],
            ),
            format!(">{}", epoch_4),
            comment,
            update,
            epoch_line(&epoch_5, " 0.123456789112"),
            data(
                "G01",
                &[
                    observation(Some(20000005000), ' ', ' '),
                    observation(Some(105000005000), ' ', ' '),
                ],
            ),
        ]
        .into_iter(),
    );

    assert_eq!(recovered.len(), expected.len());
    for (i, (recovered, expected)) in recovered.iter().zip(expected.iter()).enumerate() {
        assert_eq!(recovered, expected, "failed at line {}", i);
    }
}

#[test]
fn v3_layout_from_header() {
    let content = header().join("\n");
    let mut decompressor = DecompressorIO::from_read(content.as_bytes());
    let forwarded = decompressor
        .by_ref()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(forwarded.len(), 4);

    let header = decompressor.header();
    assert!(header.complete);
    assert_eq!(header.version, Some(Version::new(3, 4)));

    let crinex = header.crinex.as_ref().unwrap();
    assert_eq!(crinex.version, Version::new(3, 0));
    assert_eq!(crinex.prog, "RNX2CRX ver.4.0.7");
    assert_eq!(
        crinex.date,
        Epoch::from_gregorian_utc(2021, 1, 2, 0, 1, 0, 0)
    );

    let layout = header.layout().unwrap();
    assert_eq!(layout.revision, Revision::V3);
    assert_eq!(
        layout.columns(&SV::new(Constellation::GPS, 1)).map(|c| c.len()),
        Some(3)
    );
}

#[test]
fn v3_headerless_body() {
    let layout = Layout::new(Revision::V3)
        .with_observables(Constellation::GPS, 1)
        .with_observables(Constellation::Galileo, 2);

    let epoch = description(0, 0, 0, 2, "E05G01");
    let content = [
        format!(">{}", epoch),
        "".to_string(),
        "3&1000 3&2000".to_string(),
        "3&-500".to_string(),
    ]
    .join("\n");

    let recovered = DecompressorIO::from_body(content.as_bytes(), layout)
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();

    assert_eq!(
        recovered,
        vec![
            format!(">{}", &epoch[..34]),
            data(
                "E05",
                &[
                    observation(Some(1000), ' ', ' '),
                    observation(Some(2000), ' ', ' ')
                ]
            ),
            data("G01", &[observation(Some(-500), ' ', ' ')]),
        ]
    );
}

#[test]
fn v3_errors_report_line() {
    let epoch = description(0, 0, 0, 1, "G01");
    let mut content = header();
    content.push(format!(">{}", epoch));
    content.push("".to_string());
    content.push("3&1000 3&2000 3&3000 3&4000 3&5000".to_string());

    let content = content.join("\n");
    let error = DecompressorIO::from_read(content.as_bytes())
        .find_map(|line| line.err())
        .unwrap();

    assert_eq!(error.line(), Some(9));
    assert_eq!(
        error.hatanaka(),
        Some(&crinex::hatanaka::Error::ColumnCountMismatch {
            expected: 3,
            found: 5
        })
    );
    match error {
        Error::Decompression { content, .. } => {
            assert_eq!(content, "3&1000 3&2000 3&3000 3&4000 3&5000");
        },
        e => panic!("unexpected error {}", e),
    }
}

#[test]
fn v3_body_without_reference_epoch() {
    let layout = Layout::new(Revision::V3).with_observables(Constellation::GPS, 1);
    let content = ["", "", "3&1000"].join("\n");

    let error = DecompressorIO::from_body(content.as_bytes(), layout)
        .unwrap()
        .find_map(|line| line.err())
        .unwrap();

    assert_eq!(error.line(), Some(1));
    assert_eq!(
        error.hatanaka(),
        Some(&crinex::hatanaka::Error::MissingReferenceLine)
    );
}
