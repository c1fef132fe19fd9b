//! Line parser: one raw text record into positional channel values.
//!
//! Records look like `<seq>,<ch0>,<ch1>,...`. The leading sequence column is
//! dropped. A field that is empty or not a finite decimal number becomes
//! `NaN`, which downstream code reads as "no sample for this channel".

/// Field delimiter within a record.
pub const FIELD_DELIMITER: char = ',';

/// Parsed values of one record, positionally aligned to channel indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedLine {
    values: Vec<f64>,
}

impl ParsedLine {
    /// Build a parsed line directly from values (NaN marks a missing sample).
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value for a channel, or `None` if the field was missing, malformed,
    /// or beyond the end of the record.
    #[inline]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().filter(|v| !v.is_nan())
    }

    /// Raw values including `NaN` sentinels.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of channel fields in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Whether a line carries no record at all.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse a single record.
///
/// Returns `None` for blank lines. Otherwise every field after the first is
/// converted; conversion failures yield `NaN` at that position and never
/// abort the rest of the line.
pub fn parse_line(line: &str) -> Option<ParsedLine> {
    if is_blank(line) {
        return None;
    }

    let values = line
        .split(FIELD_DELIMITER)
        .skip(1)
        .map(parse_field)
        .collect();

    Some(ParsedLine { values })
}

/// Split a raw frame into its lines, keeping order. Handles `\r\n` endings.
pub fn split_frame(frame: &str) -> impl Iterator<Item = &str> {
    frame.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l))
}

#[inline]
fn parse_field(field: &str) -> f64 {
    match field.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}
