//! Fixed-column text listing of processes.
//!
//! Columns, in order: mass, analysis, era, channel, bin, id, process, sig, rate,
//! shape. `shape` is 1 when the process has a histogram, a pdf or a dataset.
//!
//! `Display` and `From<&Process>` print the stored rate, since resolving the
//! normalization function needs the [`ModelArena`]. Use
//! [`ProcessRow::with_arena`] for the rate including the normalization term.

use std::fmt::{self, Write};

use ns_core::Result;
use serde::Serialize;

use crate::arena::ModelArena;
use crate::process::Process;

/// One listing row, also serializable for machine-readable reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRow {
    /// Mass hypothesis.
    pub mass: String,
    /// Analysis tag.
    pub analysis: String,
    /// Data-taking era.
    pub era: String,
    /// Decay channel.
    pub channel: String,
    /// Category name.
    pub bin: String,
    /// Numeric category id.
    pub bin_id: i32,
    /// Process name.
    pub process: String,
    /// Signal flag.
    pub signal: bool,
    /// Stored rate, or the normalized rate for [`ProcessRow::with_arena`].
    pub rate: f64,
    /// Whether a histogram, pdf or dataset is attached.
    pub has_model: bool,
}

impl From<&Process> for ProcessRow {
    fn from(p: &Process) -> Self {
        let m = p.meta();
        Self {
            mass: m.mass.clone(),
            analysis: m.analysis.clone(),
            era: m.era.clone(),
            channel: m.channel.clone(),
            bin: m.bin.clone(),
            bin_id: m.bin_id,
            process: m.process.clone(),
            signal: p.signal(),
            rate: p.rate(),
            has_model: p.has_model(),
        }
    }
}

impl ProcessRow {
    /// Row whose rate includes the process's normalization function.
    pub fn with_arena(p: &Process, arena: &ModelArena) -> Result<Self> {
        Ok(Self { rate: p.normalized_rate(arena)?, ..Self::from(p) })
    }
}

impl fmt::Display for ProcessRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<6} {:<9} {:<6} {:<8} {:<28} {:<3} {:<16} {:<4} {:<10} {:<5}",
            self.mass,
            self.analysis,
            self.era,
            self.channel,
            self.bin,
            self.bin_id,
            self.process,
            u8::from(self.signal),
            format_g(self.rate, 5),
            u8::from(self.has_model),
        )
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&ProcessRow::from(self), f)
    }
}

/// Column titles, aligned like the rows.
pub fn header_line() -> String {
    format!(
        "{:<6} {:<9} {:<6} {:<8} {:<28} {:<3} {:<16} {:<4} {:<10} {:<5}",
        "mass", "analysis", "era", "channel", "bin", "id", "process", "sig", "rate", "shape"
    )
}

/// Write the header block: divider, titles, divider.
pub fn write_header<W: Write>(out: &mut W) -> fmt::Result {
    let line = header_line();
    let div = "-".repeat(line.len());
    writeln!(out, "{div}")?;
    writeln!(out, "{line}")?;
    writeln!(out, "{div}")
}

/// Write the header once, then one row per process.
pub fn write_table<W: Write>(out: &mut W, processes: &[Process]) -> fmt::Result {
    write_header(out)?;
    for p in processes {
        writeln!(out, "{p}")?;
    }
    Ok(())
}

/// Format like printf `%.{precision}g`: shortest of fixed or exponent notation,
/// trailing zeros removed.
pub fn format_g(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".into() } else { "0".into() };
    }
    if value.is_nan() {
        return "nan".into();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".into() } else { "-inf".into() };
    }
    let p = precision.max(1);
    // Exponent after rounding to `p` significant digits.
    let sci = format!("{:.*e}", p - 1, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= p as i32 {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}
