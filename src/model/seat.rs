//! Seat coordinates: label syntax, grid bounds and selection limits.
//!
//! Every show uses the same rectangular grid of [`ROWS`] rows (`A`–`J`) by [`COLUMNS`]
//! columns (`1`–`10`). Labels are case-insensitive on input and always rendered in their
//! canonical uppercase form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of rows in the grid (`A` through `J`).
pub const ROWS: u8 = 10;
/// Number of seats per row (`1` through `10`).
pub const COLUMNS: u8 = 10;
/// Total number of addressable seats.
pub const CAPACITY: usize = ROWS as usize * COLUMNS as usize;
/// Default per-request seat limit.
pub const MAX_SEATS_PER_REQUEST: usize = 6;

/// Errors produced while parsing or validating seat selections.
///
/// Every variant that concerns specific seats lists *all* offending entries so a client can
/// fix its whole request in one round trip.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeatError {
    #[error("Invalid seat format: {}", .0.join(", "))]
    InvalidFormat(Vec<String>),

    #[error("Too many seats: requested {requested}, maximum {max}")]
    TooManySeats { requested: usize, max: usize },

    #[error("At least one seat must be selected")]
    EmptySelection,

    #[error("Duplicate seats: {}", .0.join(", "))]
    DuplicateSeat(Vec<String>),
}

/// A single seat in the grid, e.g. `B7`.
///
/// Ordering is row-major, so `A2 < A10 < B1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatLabel {
    row: u8,
    column: u8,
}

impl SeatLabel {
    /// Builds a label from a zero-based row index and a one-based column.
    pub fn new(row: u8, column: u8) -> Option<Self> {
        (row < ROWS && (1..=COLUMNS).contains(&column)).then_some(Self { row, column })
    }

    /// Parses a raw label such as `" b7 "`.
    pub fn parse(raw: &str) -> Result<Self, SeatError> {
        Self::parse_canonical(raw).ok_or_else(|| SeatError::InvalidFormat(vec![raw.to_string()]))
    }

    fn parse_canonical(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return None;
        }
        let digits = chars.as_str();
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let column: u8 = digits.parse().ok()?;
        Self::new(letter as u8 - b'A', column)
    }

    /// Row letter, `'A'`–`'J'`.
    pub fn row_letter(&self) -> char {
        char::from(b'A' + self.row)
    }

    /// One-based column number.
    pub fn column(&self) -> u8 {
        self.column
    }

    /// Every seat of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = SeatLabel> {
        (0..ROWS).flat_map(|row| (1..=COLUMNS).map(move |column| SeatLabel { row, column }))
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.column)
    }
}

impl FromStr for SeatLabel {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SeatLabel {
    type Error = SeatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SeatLabel> for String {
    fn from(label: SeatLabel) -> Self {
        label.to_string()
    }
}

/// Parses every label, dropping repeats after canonicalisation.
///
/// Unlike [`validate_selection`] there is no count limit and duplicates are not an error,
/// so releasing seats is always accepted as long as each label is well formed.
pub fn parse_labels<S: AsRef<str>>(raw: &[S]) -> Result<Vec<SeatLabel>, SeatError> {
    let mut seen = BTreeSet::new();
    let mut labels = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for entry in raw {
        match SeatLabel::parse_canonical(entry.as_ref()) {
            Some(label) if seen.insert(label) => labels.push(label),
            Some(_) => {}
            None => invalid.push(entry.as_ref().to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(SeatError::InvalidFormat(invalid));
    }
    Ok(labels)
}

/// Validates a raw selection and returns the canonical labels in request order.
///
/// Checks, in order: empty selection, seat count against `max`, label syntax (collecting
/// every invalid entry), then duplicates after canonicalisation (`"A1"` and `"a1"` collide).
pub fn validate_selection<S: AsRef<str>>(raw: &[S], max: usize) -> Result<Vec<SeatLabel>, SeatError> {
    if raw.is_empty() {
        return Err(SeatError::EmptySelection);
    }
    if raw.len() > max {
        return Err(SeatError::TooManySeats {
            requested: raw.len(),
            max,
        });
    }

    let mut labels = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for entry in raw {
        match SeatLabel::parse_canonical(entry.as_ref()) {
            Some(label) => labels.push(label),
            None => invalid.push(entry.as_ref().to_string()),
        }
    }
    if !invalid.is_empty() {
        return Err(SeatError::InvalidFormat(invalid));
    }

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for label in &labels {
        if !seen.insert(*label) {
            duplicates.insert(*label);
        }
    }
    if !duplicates.is_empty() {
        return Err(SeatError::DuplicateSeat(
            duplicates.iter().map(ToString::to_string).collect(),
        ));
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalises() {
        let label = SeatLabel::parse(" b7 ").unwrap();
        assert_eq!(label.to_string(), "B7");
        assert_eq!(label.row_letter(), 'B');
        assert_eq!(label.column(), 7);
        assert_eq!(SeatLabel::parse("j10").unwrap().to_string(), "J10");
    }

    #[test]
    fn test_parse_rejects_out_of_grid_and_malformed() {
        for raw in ["K1", "A0", "A11", "A01", "1A", "", "  ", "AA1", "A-1", "A1x", "Ä1", "A+1"] {
            assert_eq!(
                SeatLabel::parse(raw),
                Err(SeatError::InvalidFormat(vec![raw.to_string()])),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_ordering_is_row_major() {
        let mut labels: Vec<SeatLabel> = ["B1", "A10", "A2"].iter().map(|s| s.parse().unwrap()).collect();
        labels.sort();
        let rendered: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["A2", "A10", "B1"]);
    }

    #[test]
    fn test_grid_enumeration() {
        let all: Vec<SeatLabel> = SeatLabel::all().collect();
        assert_eq!(all.len(), CAPACITY);
        assert_eq!(all[0].to_string(), "A1");
        assert_eq!(all[CAPACITY - 1].to_string(), "J10");
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let label: SeatLabel = serde_json::from_str("\"c3\"").unwrap();
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"C3\"");
        assert!(serde_json::from_str::<SeatLabel>("\"Z9\"").is_err());
    }

    #[test]
    fn test_validate_selection_happy_path() {
        let labels = validate_selection(&["a1", "A2", " b3"], MAX_SEATS_PER_REQUEST).unwrap();
        let rendered: Vec<String> = labels.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["A1", "A2", "B3"]);
    }

    #[test]
    fn test_validate_selection_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(validate_selection(&empty, 6), Err(SeatError::EmptySelection));

        assert_eq!(
            validate_selection(&["A1", "A2", "A3", "A4", "A5", "A6", "A7"], 6),
            Err(SeatError::TooManySeats { requested: 7, max: 6 })
        );

        assert_eq!(
            validate_selection(&["A1", "K1", "B0", "C3"], 6),
            Err(SeatError::InvalidFormat(vec!["K1".into(), "B0".into()]))
        );

        assert_eq!(
            validate_selection(&["A1", "a1"], 6),
            Err(SeatError::DuplicateSeat(vec!["A1".into()]))
        );
    }

    #[test]
    fn test_parse_labels_is_lenient_but_strict_on_syntax() {
        let labels = parse_labels(&["A1", "a1", "B2", "C3", "D4", "E5", "F6", "G7"]).unwrap();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0].to_string(), "A1");

        let empty: [&str; 0] = [];
        assert!(parse_labels(&empty).unwrap().is_empty());
        assert_eq!(parse_labels(&["A1", "Z0"]), Err(SeatError::InvalidFormat(vec!["Z0".into()])));
    }
}
