//! Workbook overview: which rows a layout would treat as markers or exercises

use crate::classifier::{Marker, MarkerClassifier, is_exercise_candidate};
use crate::config::Layout;
use crate::error::Result;
use crate::reader::{self, Grid, cell_reference};
use serde::Serialize;
use std::path::Path;

/// A marker found while scanning a sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerHit {
    /// Excel-style reference of the labelling cell (e.g. "A3")
    pub cell: String,
    pub kind: &'static str,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetOverview {
    pub name: String,
    pub rows: u32,
    pub columns: u32,
    pub markers: Vec<MarkerHit>,
    pub exercise_rows: usize,
}

/// Scan a single grid with the given layout
pub fn inspect_grid(grid: &Grid, layout: &Layout) -> SheetOverview {
    let classifier = MarkerClassifier::new(layout);
    let (rows, columns) = grid.dimensions();
    let mut markers = Vec::new();
    let mut exercise_rows = 0;

    for row in grid.rows() {
        let marker = classifier.classify(&row);
        let kind = match &marker {
            Marker::NoMarker => {
                let mut mappings = vec![&layout.columns];
                mappings.extend(layout.lanes.iter().map(|lane| &lane.columns));
                if mappings
                    .into_iter()
                    .any(|columns| is_exercise_candidate(&row, columns, layout))
                {
                    exercise_rows += 1;
                }
                continue;
            }
            Marker::Day { .. } => "day",
            Marker::Week { .. } => "week",
            Marker::Block { .. } => "block",
        };
        let column = row.first_populated().map(|(col, _)| col).unwrap_or(0);
        markers.push(MarkerHit {
            cell: cell_reference(row.index, column as u32),
            kind,
            label: marker.label().unwrap_or_default().to_string(),
        });
    }

    SheetOverview {
        name: grid.name.clone(),
        rows,
        columns,
        markers,
        exercise_rows,
    }
}

/// Scan every sheet of a workbook
pub fn inspect_file<P: AsRef<Path>>(path: P, layout: &Layout) -> Result<Vec<SheetOverview>> {
    let grids = reader::read_all_grids(path)?;
    Ok(grids.iter().map(|grid| inspect_grid(grid, layout)).collect())
}
