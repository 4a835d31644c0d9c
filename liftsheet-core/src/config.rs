//! Layout configuration: marker rules and column mappings per sheet dialect

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Kind of structural marker a rule recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Day,
    Week,
    Block,
}

/// Where the pattern must occur in the first populated cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPosition {
    #[default]
    Prefix,
    Contains,
}

/// A case-insensitive marker pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRule {
    pub pattern: String,
    pub kind: MarkerKind,
    #[serde(default)]
    pub position: MatchPosition,
}

impl MarkerRule {
    pub fn prefix(pattern: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            position: MatchPosition::Prefix,
        }
    }

    pub fn contains(pattern: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            position: MatchPosition::Contains,
        }
    }
}

/// Column positions (0-based) of the exercise fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub id: usize,
    pub name: usize,
    #[serde(default)]
    pub tempo: Option<usize>,
    #[serde(default)]
    pub sets_reps: Option<usize>,
    #[serde(default)]
    pub rest: Option<usize>,
    #[serde(default)]
    pub results: Option<usize>,
}

impl ColumnMapping {
    /// Contiguous mapping: id, name, tempo, sets/reps, rest, results
    pub fn sequential(id: usize) -> Self {
        Self {
            id,
            name: id + 1,
            tempo: Some(id + 2),
            sets_reps: Some(id + 3),
            rest: Some(id + 4),
            results: Some(id + 5),
        }
    }

    /// Shift the data columns by `start`, keeping id and name in place
    pub fn offset_data(&self, start: usize) -> Self {
        Self {
            id: self.id,
            name: self.name,
            tempo: self.tempo.map(|c| c + start),
            sets_reps: self.sets_reps.map(|c| c + start),
            rest: self.rest.map(|c| c + start),
            results: self.results.map(|c| c + start),
        }
    }
}

/// How the base mapping relates to the column of a week marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnMode {
    #[default]
    Absolute,
    /// Data columns are offsets from the week marker's column
    WeekRelative,
}

/// A week laid out side by side with others in the same rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lane {
    pub week: u32,
    pub columns: ColumnMapping,
}

/// Complete description of one sheet dialect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(default)]
    pub program: Option<String>,
    pub markers: Vec<MarkerRule>,
    pub columns: ColumnMapping,
    #[serde(default)]
    pub column_mode: ColumnMode,
    #[serde(default)]
    pub lanes: Vec<Lane>,
    /// Identifier tokens that are never exercises (restated sub-headers)
    #[serde(default)]
    pub deny_ids: Vec<String>,
}

impl Layout {
    /// Load a layout from a TOML file and validate it
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ExtractError::LayoutFile {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: Layout = toml::from_str(&content).map_err(|source| ExtractError::LayoutParse {
            path: path.to_path_buf(),
            source,
        })?;
        layout.validate()?;
        Ok(layout)
    }

    /// Check the layout for contradictions the walker cannot resolve
    pub fn validate(&self) -> Result<()> {
        if !self.markers.iter().any(|rule| rule.kind == MarkerKind::Day) {
            return Err(ExtractError::InvalidLayout(format!(
                "layout '{}' has no day marker rule",
                self.name
            )));
        }
        if let Some(rule) = self.markers.iter().find(|rule| rule.pattern.trim().is_empty()) {
            return Err(ExtractError::InvalidLayout(format!(
                "layout '{}' has an empty {:?} marker pattern",
                self.name, rule.kind
            )));
        }

        let mut mappings = vec![&self.columns];
        mappings.extend(self.lanes.iter().map(|lane| &lane.columns));
        if mappings.iter().any(|columns| columns.id == columns.name) {
            return Err(ExtractError::InvalidLayout(format!(
                "layout '{}' maps identifier and name to the same column",
                self.name
            )));
        }

        let mut weeks = HashSet::new();
        for lane in &self.lanes {
            if lane.week == 0 {
                return Err(ExtractError::InvalidLayout(format!(
                    "layout '{}' has a lane with week 0",
                    self.name
                )));
            }
            if !weeks.insert(lane.week) {
                return Err(ExtractError::InvalidLayout(format!(
                    "layout '{}' declares week {} twice",
                    self.name, lane.week
                )));
            }
        }

        Ok(())
    }

    /// Column mapping for a week whose marker was found at `column_start`
    pub fn columns_for_week(&self, column_start: usize) -> ColumnMapping {
        match self.column_mode {
            ColumnMode::Absolute => self.columns.clone(),
            ColumnMode::WeekRelative => self.columns.offset_data(column_start),
        }
    }

    /// Whether the identifier is deny-listed (case-insensitive)
    pub fn is_denied_id(&self, id: &str) -> bool {
        self.deny_ids
            .iter()
            .any(|denied| denied.eq_ignore_ascii_case(id))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Dialect::Flat.layout()
    }
}

/// Built-in sheet dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// One week at a time, DAY/WEEK headers, contiguous columns
    Flat,
    /// Week 1 and week 2 side by side in the same rows
    SideBySide,
    /// Week / Day / Block headers matched anywhere in the label
    Blocks,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Flat, Dialect::SideBySide, Dialect::Blocks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Flat => "flat",
            Dialect::SideBySide => "side-by-side",
            Dialect::Blocks => "blocks",
        }
    }

    pub fn layout(&self) -> Layout {
        let deny_ids = vec!["TEMPO".to_string(), "SETS".to_string()];
        match self {
            Dialect::Flat => Layout {
                name: self.as_str().to_string(),
                program: None,
                markers: vec![
                    MarkerRule::prefix("DAY", MarkerKind::Day),
                    MarkerRule::prefix("WEEK", MarkerKind::Week),
                ],
                columns: ColumnMapping::sequential(0),
                column_mode: ColumnMode::Absolute,
                lanes: Vec::new(),
                deny_ids,
            },
            Dialect::SideBySide => {
                let lane = |week, first: usize| Lane {
                    week,
                    columns: ColumnMapping {
                        id: 0,
                        name: 1,
                        tempo: Some(first),
                        sets_reps: Some(first + 1),
                        rest: Some(first + 2),
                        results: Some(first + 3),
                    },
                };
                Layout {
                    name: self.as_str().to_string(),
                    program: None,
                    markers: vec![
                        MarkerRule::prefix("DAY", MarkerKind::Day),
                        MarkerRule::prefix("WEEK", MarkerKind::Week),
                    ],
                    columns: lane(1, 3).columns,
                    column_mode: ColumnMode::Absolute,
                    lanes: vec![lane(1, 3), lane(2, 8)],
                    deny_ids,
                }
            }
            Dialect::Blocks => Layout {
                name: self.as_str().to_string(),
                program: None,
                markers: vec![
                    MarkerRule::contains("Week", MarkerKind::Week),
                    MarkerRule::contains("Day", MarkerKind::Day),
                    MarkerRule::contains("Block", MarkerKind::Block),
                ],
                columns: ColumnMapping::sequential(0),
                column_mode: ColumnMode::Absolute,
                lanes: Vec::new(),
                deny_ids,
            },
        }
    }
}

impl FromStr for Dialect {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        Dialect::ALL
            .into_iter()
            .find(|dialect| dialect.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExtractError::InvalidLayout(format!("unknown dialect '{}'", s)))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
