//! Grid data structures

use calamine::{Data, ExcelDateTime, Range};
use chrono::NaiveDateTime;
use std::fmt;

/// A normalized, non-empty cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    /// Normalize a raw calamine cell. Blank, whitespace-only and error cells become `None`.
    pub fn from_data(data: &Data) -> Option<Scalar> {
        match data {
            Data::Empty | Data::Error(_) => None,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::text(s),
            Data::Float(f) => Some(Scalar::Number(*f)),
            Data::Int(i) => Some(Scalar::Number(*i as f64)),
            Data::Bool(b) => Some(Scalar::Text(if *b { "TRUE" } else { "FALSE" }.to_string())),
            Data::DateTime(dt) => Some(Scalar::from_date(dt)),
        }
    }

    /// Date cells become month-day text ("03-10"). Durations and serials that do
    /// not convert keep the serial number.
    fn from_date(dt: &ExcelDateTime) -> Scalar {
        match dt.as_datetime() {
            Some(datetime) if dt.is_datetime() => Scalar::Text(month_day(&datetime)),
            _ => Scalar::Number(dt.as_f64()),
        }
    }

    /// Build a text scalar, trimming it and rejecting whitespace-only input
    pub fn text(s: &str) -> Option<Scalar> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Scalar::Text(trimmed.to_string()))
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => match whole_number(*n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
        }
    }
}

fn month_day(datetime: &NaiveDateTime) -> String {
    datetime.format("%m-%d").to_string()
}

/// Integer value of `n` when its fractional part is zero
pub(crate) fn whole_number(n: f64) -> Option<i64> {
    // Outside this range f64 can no longer represent every integer
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

/// One sheet row with cells aligned to absolute column indices
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    /// 0-based row index within the sheet
    pub index: u32,
    pub cells: Vec<Option<Scalar>>,
}

impl Row {
    pub fn new(index: u32, cells: Vec<Option<Scalar>>) -> Self {
        Self { index, cells }
    }

    /// Get the value at a column, if any
    pub fn get(&self, col: usize) -> Option<&Scalar> {
        self.cells.get(col).and_then(Option::as_ref)
    }

    /// First non-empty cell and its column
    pub fn first_populated(&self) -> Option<(usize, &Scalar)> {
        self.cells
            .iter()
            .enumerate()
            .find_map(|(col, cell)| cell.as_ref().map(|value| (col, value)))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

/// A single worksheet exposed as a lazy sequence of normalized rows
#[derive(Debug, Clone)]
pub struct Grid {
    pub name: String,
    range: Range<Data>,
}

impl Grid {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Used size as (rows, cols), counted from A1
    pub fn dimensions(&self) -> (u32, u32) {
        match self.range.end() {
            Some((row, col)) if !self.range.is_empty() => (row + 1, col + 1),
            _ => (0, 0),
        }
    }

    /// Iterate rows in sheet order. Cells are padded so that `Row::get(col)` uses
    /// absolute column indices even when the used range does not start at column A.
    pub fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        let (row_start, col_start) = self.range.start().unwrap_or((0, 0));
        self.range
            .rows()
            .enumerate()
            .map(move |(offset, cells)| {
                let mut values = vec![None; col_start as usize];
                values.extend(cells.iter().map(Scalar::from_data));
                Row::new(row_start + offset as u32, values)
            })
    }
}

/// Convert a column number to letters (0 -> A, 1 -> B, etc.)
pub fn column_letter(mut col: u32) -> String {
    let mut result = String::new();
    loop {
        result.insert(0, (b'A' + (col % 26) as u8) as char);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    result
}

/// Excel-style reference (e.g. "D2") for a 0-based position
pub fn cell_reference(row: u32, col: u32) -> String {
    format!("{}{}", column_letter(col), row + 1)
}
