use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use log::debug;

use super::model::{ColumnMapping, Spectrum};

// ---------------------------------------------------------------------------
// Sweep-file parsing
// ---------------------------------------------------------------------------

/// Parse a touchstone-like sweep from text.
///
/// Format: whitespace-delimited columns, one sample per line. Lines starting
/// with `#` or `!` are headers/comments and skipped. Column 0 is the
/// frequency in Hz; the real/imaginary columns come from `columns` (see
/// [`ColumnMapping`] — the indices have varied between file flavours, so the
/// caller states them explicitly).
pub fn parse_sweep(text: &str, columns: ColumnMapping) -> Result<Spectrum> {
    let mut frequencies = Vec::new();
    let mut real = Vec::new();
    let mut imag = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        let needed = columns.real_col.max(columns.imag_col) + 1;
        if fields.len() < needed {
            bail!(
                "line {}: expected at least {needed} columns, found {}",
                line_no + 1,
                fields.len()
            );
        }

        frequencies.push(parse_field(fields[0], line_no, 0)?);
        real.push(parse_field(fields[columns.real_col], line_no, columns.real_col)?);
        imag.push(parse_field(fields[columns.imag_col], line_no, columns.imag_col)?);
    }

    Spectrum::new(frequencies, real, imag).context("building spectrum from sweep file")
}

fn parse_field(field: &str, line_no: usize, col: usize) -> Result<f64> {
    field.parse::<f64>().with_context(|| {
        format!(
            "line {}, column {col}: '{field}' is not a number",
            line_no + 1
        )
    })
}

/// Read a sweep file from disk and parse it.
pub fn load_sweep(path: &Path, columns: ColumnMapping) -> Result<Spectrum> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sweep file {}", path.display()))?;
    let spectrum = parse_sweep(&text, columns)
        .with_context(|| format!("parsing sweep file {}", path.display()))?;
    debug!(
        "loaded {} samples from {} ({:.3}–{:.3} GHz)",
        spectrum.len(),
        path.display(),
        spectrum.frequencies[0] / 1e9,
        spectrum.frequencies[spectrum.len() - 1] / 1e9
    );
    Ok(spectrum)
}

// ---------------------------------------------------------------------------
// File timestamps
// ---------------------------------------------------------------------------

/// A sweep file's effective measurement timestamp: the later of its creation
/// and modification times, in local time, truncated to the minute.
///
/// Minute truncation keeps `NaiveDateTime` ordering identical to the
/// lexicographic order of the `YYYY-MM-DD HH:MM` rendering used in exports.
pub fn file_timestamp(path: &Path) -> Result<NaiveDateTime> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("reading metadata for {}", path.display()))?;
    let modified = meta
        .modified()
        .with_context(|| format!("modification time unavailable for {}", path.display()))?;
    // Creation time is not supported on every filesystem; fall back to mtime.
    let stamp = match meta.created() {
        Ok(created) => created.max(modified),
        Err(_) => modified,
    };

    let local: DateTime<Local> = stamp.into();
    local
        .naive_local()
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .context("truncating timestamp to the minute")
}

/// Load a batch of DUT sweep files, pairing each spectrum with its file
/// timestamp. Order follows the input paths; the aggregator sorts later.
pub fn load_batch(
    paths: &[impl AsRef<Path>],
    columns: ColumnMapping,
) -> Result<Vec<(Spectrum, NaiveDateTime)>> {
    paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            let spectrum = load_sweep(path, columns)?;
            let timestamp = file_timestamp(path)?;
            Ok((spectrum, timestamp))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PORT: &str = "\
! VNA sweep export
# Hz S RI R 50
1.0e9  0.9 -0.1  0.5 0.25  0.0 0.0  0.0 0.0
1.5e9  0.8 -0.2  0.4 0.30  0.0 0.0  0.0 0.0
2.0e9  0.7 -0.3  0.3 0.35  0.0 0.0  0.0 0.0
";

    #[test]
    fn parses_s21_columns_and_skips_comments() {
        let sp = parse_sweep(TWO_PORT, ColumnMapping::S21).unwrap();
        assert_eq!(sp.len(), 3);
        assert_eq!(sp.frequencies, vec![1.0e9, 1.5e9, 2.0e9]);
        assert_eq!(sp.real, vec![0.5, 0.4, 0.3]);
        assert_eq!(sp.imag, vec![0.25, 0.30, 0.35]);
    }

    #[test]
    fn parses_s11_columns_from_the_same_rows() {
        let sp = parse_sweep(TWO_PORT, ColumnMapping::S11).unwrap();
        assert_eq!(sp.real, vec![0.9, 0.8, 0.7]);
        assert_eq!(sp.imag, vec![-0.1, -0.2, -0.3]);
    }

    #[test]
    fn rejects_rows_with_too_few_columns() {
        let err = parse_sweep("1.0e9 0.5\n", ColumnMapping::S21).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        let text = "1.0e9 0.0 0.0 abc 0.1\n";
        let err = parse_sweep(text, ColumnMapping::S21).unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn comment_only_input_is_an_empty_spectrum_error() {
        let err = parse_sweep("! nothing here\n# still nothing\n", ColumnMapping::S21).unwrap_err();
        assert!(err.to_string().contains("spectrum"));
    }
}
