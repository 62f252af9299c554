//! Thermo layout detection and vector name extraction

use crate::scanner::find_from;
use crate::types::{Layout, Result, ThermoError, FOOTER_MARKER, MULTI_SEPARATOR, STEP_NAME};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// `TotEng   =` style keyword in a multi-line block
fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s(\S*)\s*=").expect("valid keyword pattern"))
}

/// Layout and vector names found in a log file
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoHeader {
    pub layout: Layout,
    pub names: Vec<String>,
}

/// Detect the thermo layout of `text` and extract the ordered vector names.
///
/// Multi-line blocks take priority over one-line headers. Returns `Ok(None)`
/// when no complete header is present yet, which is normal for a log that the
/// producer has only just started writing. A header that is not valid UTF-8
/// is a parse error, as it is for entries.
pub fn detect(text: &[u8]) -> Result<Option<ThermoHeader>> {
    if let Some(start) = find_from(text, Layout::Multi.marker(), 0) {
        let names = multi_names(text, start)?;
        return Ok(names.map(|names| ThermoHeader {
            layout: Layout::Multi,
            names,
        }));
    }
    if let Some(start) = find_from(text, Layout::Single.marker(), 0) {
        let names = single_names(text, start)?;
        return Ok(names.map(|names| ThermoHeader {
            layout: Layout::Single,
            names,
        }));
    }
    Ok(None)
}

fn header_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes)
        .map_err(|e| ThermoError::Parse(format!("invalid UTF-8 in thermo header: {}", e)))
}

/// Keywords of the first multi-line block, prefixed with `Step`
fn multi_names(text: &[u8], start: usize) -> Result<Option<Vec<String>>> {
    // A run with a single block has no trailing separator, only the footer
    let Some(end) = find_from(text, MULTI_SEPARATOR.as_bytes(), start)
        .or_else(|| find_from(text, FOOTER_MARKER.as_bytes(), start))
    else {
        return Ok(None);
    };
    let block = header_text(&text[start..end])?;

    let mut names = vec![STEP_NAME.to_string()];
    names.extend(
        keyword_pattern()
            .captures_iter(block)
            .map(|caps| caps[1].to_string()),
    );
    debug!(vectors = names.len(), "Detected multi-line thermo layout");
    Ok(Some(names))
}

/// Column names of a one-line header, verbatim
fn single_names(text: &[u8], start: usize) -> Result<Option<Vec<String>>> {
    let Some(end) = find_from(text, b"\n", start) else {
        return Ok(None);
    };
    let line = header_text(&text[start..end])?;
    let names: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    debug!(vectors = names.len(), "Detected one-line thermo layout");
    Ok(Some(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTI_LOG: &str = "\
LAMMPS (30 Jul 2016)
run 100
---------------- Step        0 ----- CPU =      0.0000 (sec) ----------------
TotEng   =        -6.7733 KinEng   =         1.4979 Temp     =         1.0000
PotEng   =        -8.2712 Press    =        -5.0200
---------------- Step       50 ----- CPU =      0.1000 (sec) ----------------
TotEng   =        -6.7740 KinEng   =         0.7652 Temp     =         0.5108
PotEng   =        -7.5392 Press    =         0.2113
Loop time of 0.2 on 1 procs for 100 steps with 4000 atoms
";

    #[test]
    fn test_detect_multi() {
        let header = detect(MULTI_LOG.as_bytes()).unwrap().expect("header");
        assert_eq!(header.layout, Layout::Multi);
        assert_eq!(
            header.names,
            ["Step", "CPU", "TotEng", "KinEng", "Temp", "PotEng", "Press"]
        );
    }

    #[test]
    fn test_detect_multi_single_block_run() {
        let text = "\
---------------- Step        0 ----- CPU =      0.0000 (sec) ----------------
TotEng   =        -6.7733 KinEng   =         1.4979
Loop time of 0.2 on 1 procs for 0 steps with 4000 atoms
";
        let header = detect(text.as_bytes()).unwrap().expect("header");
        assert_eq!(header.names, ["Step", "CPU", "TotEng", "KinEng"]);
    }

    #[test]
    fn test_detect_single() {
        let text = "units lj\nStep Temp E_pair Press\n0 1.44 -6.77 -5.02\n";
        let header = detect(text.as_bytes()).unwrap().expect("header");
        assert_eq!(header.layout, Layout::Single);
        assert_eq!(header.names, ["Step", "Temp", "E_pair", "Press"]);
    }

    #[test]
    fn test_detect_indented_single_header() {
        let text = "   Step          Temp          E_pair    \n         0   3              -6.7733681 \n";
        let header = detect(text.as_bytes()).unwrap().expect("header");
        assert_eq!(header.names, ["Step", "Temp", "E_pair"]);
    }

    #[test]
    fn test_detect_nothing_yet() {
        assert_eq!(detect(b"").unwrap(), None);
        assert_eq!(detect(b"LAMMPS (30 Jul 2016)\nunits lj\n").unwrap(), None);
        // header line still being written
        assert_eq!(detect(b"Step Temp E_pa").unwrap(), None);
    }

    #[test]
    fn test_detect_invalid_utf8_header() {
        let single = detect(b"Step Temp \xffE\n0 1 2\n").unwrap_err();
        assert!(matches!(single, ThermoError::Parse(_)), "{}", single);

        let multi = detect(b"----- Step 0 ----- CPU = 0.0\n\xff = 1.0\nLoop time of 1\n").unwrap_err();
        assert!(matches!(multi, ThermoError::Parse(_)), "{}", multi);

        // bytes outside the header are left to the entry parser
        let header = detect(b"Step A\n\xff\n").unwrap().expect("header");
        assert_eq!(header.names, ["Step", "A"]);
    }
}
