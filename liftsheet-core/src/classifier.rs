//! Marker and exercise row classification

use crate::config::{ColumnMapping, Layout, MarkerKind, MatchPosition};
use crate::reader::Row;
use regex::Regex;
use std::sync::OnceLock;

/// Structural meaning of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    NoMarker,
    Day { label: String },
    Week { label: String, column_start: usize },
    Block { label: String },
}

impl Marker {
    pub fn label(&self) -> Option<&str> {
        match self {
            Marker::NoMarker => None,
            Marker::Day { label } | Marker::Week { label, .. } | Marker::Block { label } => {
                Some(label)
            }
        }
    }
}

struct CompiledRule {
    needle: String,
    kind: MarkerKind,
    position: MatchPosition,
}

/// Matches the first populated cell of a row against a layout's marker rules
pub struct MarkerClassifier {
    rules: Vec<CompiledRule>,
}

impl MarkerClassifier {
    pub fn new(layout: &Layout) -> Self {
        let rules = layout
            .markers
            .iter()
            .map(|rule| CompiledRule {
                needle: rule.pattern.trim().to_lowercase(),
                kind: rule.kind,
                position: rule.position,
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, row: &Row) -> Marker {
        let Some((column, value)) = row.first_populated() else {
            return Marker::NoMarker;
        };
        // Numbers never label a section
        let Some(label) = value.as_text() else {
            return Marker::NoMarker;
        };
        let haystack = label.to_lowercase();

        let matched = self.rules.iter().find(|rule| match rule.position {
            MatchPosition::Prefix => haystack.starts_with(&rule.needle),
            MatchPosition::Contains => haystack.contains(&rule.needle),
        });

        let label = label.to_string();
        match matched.map(|rule| rule.kind) {
            None => Marker::NoMarker,
            Some(MarkerKind::Day) => Marker::Day { label },
            Some(MarkerKind::Week) => Marker::Week {
                label,
                column_start: column,
            },
            Some(MarkerKind::Block) => Marker::Block { label },
        }
    }
}

fn digits() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

/// First run of digits in the label's leading segment (before any ':').
/// Labels without digits yield 0.
pub fn extract_number(label: &str) -> u32 {
    let leading = label.split(':').next().unwrap_or_default();
    digits()
        .find(leading)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Text after the first ':' of a day label, trimmed
pub fn day_name(label: &str) -> String {
    label
        .split_once(':')
        .map(|(_, name)| name.trim().to_string())
        .unwrap_or_default()
}

/// Whether the row carries an "A1"-style identifier and a name under `columns`
pub fn is_exercise_candidate(row: &Row, columns: &ColumnMapping, layout: &Layout) -> bool {
    let Some(id) = row.get(columns.id) else {
        return false;
    };
    if row.get(columns.name).is_none() {
        return false;
    }
    let id = id.to_string();
    let has_letter = id.chars().any(char::is_alphabetic);
    let has_digit = id.chars().any(|c| c.is_ascii_digit());
    has_letter && has_digit && !layout.is_denied_id(&id)
}
