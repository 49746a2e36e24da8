//! Field ingestion from text (CSV-like) and structured records.
//!
//! Text rows are tokenized on commas and whitespace. Rows with fewer than
//! four tokens are dropped; rows whose first four tokens are not all finite
//! numbers are treated as headers or comments and dropped too. Nothing here
//! is fatal: an input with no usable rows yields an empty result, which the
//! caller reports as "no usable field" while the engine keeps its constant
//! flow.

use crate::datum::FieldDatum;
use crate::error::FlowError;

/// Maximum number of characters of a skipped header echoed to the log.
const HEADER_ECHO_CHARS: usize = 60;

/// Result of parsing a text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedField {
    pub rows: Vec<FieldDatum>,
    /// Rows that had four or more tokens but were not numeric.
    pub skipped: usize,
    /// The first non-numeric row seen before any data, if any.
    pub header: Option<String>,
}

impl ParsedField {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses `x y dx dy` rows separated by commas and/or whitespace.
///
/// Extra tokens after the fourth are ignored. A header row is logged once.
pub fn parse_text(text: &str) -> ParsedField {
    let mut parsed = ParsedField::default();

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let tokens: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .take(4)
            .collect();
        if tokens.len() < 4 {
            continue;
        }

        match parse_row(&tokens) {
            Some(datum) => parsed.rows.push(datum),
            None => {
                parsed.skipped += 1;
                if parsed.header.is_none() && parsed.rows.is_empty() {
                    let echo: String = line.chars().take(HEADER_ECHO_CHARS).collect();
                    log::info!("skipping header line: {echo}");
                    parsed.header = Some(echo);
                }
            }
        }
    }

    if parsed.rows.is_empty() {
        log::warn!("field text contained no usable rows");
    }
    parsed
}

fn parse_row(tokens: &[&str]) -> Option<FieldDatum> {
    let mut v = [0.0_f64; 4];
    for (slot, token) in v.iter_mut().zip(tokens) {
        let n: f64 = token.parse().ok()?;
        if !n.is_finite() {
            return None;
        }
        *slot = n;
    }
    Some(FieldDatum::new(v[0], v[1], v[2], v[3]))
}

/// Validates already-structured records.
///
/// Returns `FlowError::NonFiniteDatum` for the first record with a NaN or
/// infinite component.
pub fn from_records(records: Vec<FieldDatum>) -> Result<Vec<FieldDatum>, FlowError> {
    if let Some(index) = records.iter().position(|d| !d.is_finite()) {
        return Err(FlowError::NonFiniteDatum { index });
    }
    Ok(records)
}

/// Parses a JSON array of `{x, y, dx, dy}` objects and validates it like
/// [`from_records`].
pub fn parse_json(text: &str) -> Result<Vec<FieldDatum>, FlowError> {
    let records: Vec<FieldDatum> =
        serde_json::from_str(text).map_err(|e| FlowError::InvalidJson(e.to_string()))?;
    from_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Text parsing --

    #[test]
    fn parses_comma_and_whitespace_rows() {
        let parsed = parse_text("0,0,1,0\n1 2 3 4\n5,\t6 , 7,8\n");
        assert_eq!(
            parsed.rows,
            vec![
                FieldDatum::new(0.0, 0.0, 1.0, 0.0),
                FieldDatum::new(1.0, 2.0, 3.0, 4.0),
                FieldDatum::new(5.0, 6.0, 7.0, 8.0),
            ]
        );
        assert_eq!(parsed.skipped, 0);
        assert!(parsed.header.is_none());
    }

    #[test]
    fn handles_crlf_and_blank_lines() {
        let parsed = parse_text("1,1,0,1\r\n\r\n\n2,2,1,0\r\n");
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn skips_short_rows_silently() {
        let parsed = parse_text("1,2,3\n4,5,6,7\n8\n");
        assert_eq!(parsed.rows, vec![FieldDatum::new(4.0, 5.0, 6.0, 7.0)]);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn header_is_skipped_and_recorded_once() {
        let parsed = parse_text("x,y,dx,dy\n# comment row here\n0,0,1,1\nfoo,bar,baz,qux\n");
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.header.as_deref(), Some("x,y,dx,dy"));
    }

    #[test]
    fn header_echo_is_truncated() {
        let long = format!("{}\n0,0,0,0\n", "h,".repeat(100));
        let parsed = parse_text(&long);
        assert_eq!(parsed.header.unwrap().chars().count(), 60);
    }

    #[test]
    fn extra_columns_are_ignored() {
        let parsed = parse_text("1,2,3,4,5,6\n1,2,3,4,label\n");
        assert_eq!(parsed.rows.len(), 2);
    }

    #[test]
    fn non_finite_tokens_are_skipped() {
        let parsed = parse_text("NaN,0,1,0\n0,inf,1,0\n0,0,1,0\n");
        assert_eq!(parsed.rows, vec![FieldDatum::new(0.0, 0.0, 1.0, 0.0)]);
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn empty_or_invalid_input_yields_no_rows() {
        assert!(parse_text("").is_empty());
        assert!(parse_text("a,b,c,d\ne,f,g,h\n").is_empty());
    }

    #[test]
    fn scientific_notation_and_signs_parse() {
        let parsed = parse_text("-1.5e2,+3,0.25,-4E-1\n");
        assert_eq!(parsed.rows, vec![FieldDatum::new(-150.0, 3.0, 0.25, -0.4)]);
    }

    // -- Structured records --

    #[test]
    fn from_records_accepts_finite_values() {
        let rows = vec![FieldDatum::new(0.0, 1.0, 2.0, 3.0)];
        assert_eq!(from_records(rows.clone()).unwrap(), rows);
    }

    #[test]
    fn from_records_rejects_non_finite_with_index() {
        let rows = vec![
            FieldDatum::new(0.0, 1.0, 2.0, 3.0),
            FieldDatum::new(0.0, f64::NAN, 2.0, 3.0),
        ];
        assert!(matches!(
            from_records(rows),
            Err(FlowError::NonFiniteDatum { index: 1 })
        ));
    }

    #[test]
    fn parse_json_reads_sample_array() {
        let rows = parse_json(r#"[{"x":0,"y":0,"dx":1,"dy":0},{"x":1,"y":1,"dx":0,"dy":-1}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].dy, -1.0);
    }

    #[test]
    fn parse_json_empty_array_is_ok_and_empty() {
        assert!(parse_json("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_json_rejects_malformed_input() {
        assert!(matches!(parse_json("{\"x\": 1}"), Err(FlowError::InvalidJson(_))));
    }
}
