//! Thermo entry parser
//!
//! Turns the text of one chunk into fixed-width numeric rows.

use crate::types::{Layout, Result, Row, ThermoError, MULTI_SEPARATOR};
use regex::Regex;
use std::sync::OnceLock;

fn step_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Step\s*(\S*)\s").expect("valid step pattern"))
}

fn value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"=\s*(\S*)").expect("valid value pattern"))
}

/// Parse every entry of a chunk into rows of exactly `nvec` values
pub fn parse_chunk(layout: Layout, chunk: &[u8], nvec: usize) -> Result<Vec<Row>> {
    let text = std::str::from_utf8(chunk)
        .map_err(|e| ThermoError::Parse(format!("invalid UTF-8 in thermo output: {}", e)))?;

    match layout {
        Layout::Multi => parse_multi(text, nvec),
        Layout::Single => parse_single(text, nvec),
    }
}

fn parse_multi(text: &str, nvec: usize) -> Result<Vec<Row>> {
    let mut rows = Vec::new();

    for section in text.split(MULTI_SEPARATOR) {
        if section.trim().is_empty() {
            continue;
        }
        let step = step_pattern()
            .captures(section)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()))
            .ok_or_else(|| {
                ThermoError::Parse(format!("thermo block without Step: '{}'", first_line(section)))
            })?;

        let mut row = Vec::with_capacity(nvec);
        row.push(parse_value(step)?);
        for caps in value_pattern().captures_iter(section) {
            row.push(parse_value(caps.get(1).map_or("", |m| m.as_str()))?);
        }

        if row.len() != nvec {
            return Err(ThermoError::Parse(format!(
                "thermo block at step {} has {} fields, expected {}",
                step,
                row.len(),
                nvec
            )));
        }
        rows.push(row);
    }

    Ok(rows)
}

fn parse_single(text: &str, nvec: usize) -> Result<Vec<Row>> {
    let mut rows = Vec::new();

    for line in text.lines() {
        let mut row = Vec::with_capacity(nvec);
        for token in line.split_whitespace() {
            row.push(parse_value(token)?);
        }
        if row.is_empty() {
            continue;
        }
        if row.len() != nvec {
            return Err(ThermoError::Parse(format!(
                "thermo line has {} fields, expected {}: '{}'",
                row.len(),
                nvec,
                line.trim()
            )));
        }
        rows.push(row);
    }

    Ok(rows)
}

#[inline]
fn parse_value(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| ThermoError::Parse(format!("non-numeric thermo value '{}'", token)))
}

fn first_line(section: &str) -> &str {
    section.trim().lines().next().unwrap_or("")
}
