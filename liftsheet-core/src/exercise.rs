//! Exercise row parsing

use crate::classifier::is_exercise_candidate;
use crate::config::{ColumnMapping, Layout};
use crate::document::Exercise;
use crate::reader::workbook::whole_number;
use crate::reader::{Row, Scalar};

/// Parse a data row under the active column mapping.
///
/// Returns `None` when the row is not an exercise (missing identifier or name,
/// identifier without both a letter and a digit, or deny-listed identifier).
pub fn parse_exercise_row(
    row: &Row,
    columns: &ColumnMapping,
    layout: &Layout,
    day: u32,
    week: u32,
) -> Option<Exercise> {
    if !is_exercise_candidate(row, columns, layout) {
        return None;
    }

    let field = |col: Option<usize>| {
        col.and_then(|c| row.get(c))
            .map(Scalar::to_string)
            .unwrap_or_default()
    };

    Some(Exercise {
        id: field(Some(columns.id)),
        name: field(Some(columns.name)),
        tempo: columns
            .tempo
            .and_then(|c| row.get(c))
            .map(normalize_tempo)
            .unwrap_or_default(),
        sets_reps: field(columns.sets_reps),
        rest: field(columns.rest),
        results: field(columns.results),
        day,
        week,
    })
}

/// Render a tempo cell: whole numbers lose their ".0", everything else is trimmed text
pub fn normalize_tempo(value: &Scalar) -> String {
    match value {
        Scalar::Number(_) => value.to_string(),
        Scalar::Text(text) => normalize_tempo_text(text),
    }
}

/// Text form of the tempo rule, idempotent on its own output
pub fn normalize_tempo_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.contains('.') {
        if let Some(whole) = trimmed.parse::<f64>().ok().and_then(whole_number) {
            return whole.to_string();
        }
    }
    trimmed.to_string()
}
