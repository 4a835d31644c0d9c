//! Spreadsheet reader using calamine

use crate::error::{ExtractError, Result};
use calamine::{Reader, Sheets, open_workbook_auto};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

pub mod workbook;

pub use workbook::{Grid, Row, Scalar, cell_reference, column_letter};

/// Selects a worksheet by 0-based position or by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// Digits-only input is an index, anything else a sheet name
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.parse::<usize>() {
            Ok(index) => Ok(SheetSelector::Index(index)),
            Err(_) => Ok(SheetSelector::Name(trimmed.to_string())),
        }
    }
}

impl fmt::Display for SheetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(index) => write!(f, "#{}", index),
            SheetSelector::Name(name) => write!(f, "'{}'", name),
        }
    }
}

/// Open a spreadsheet and return the selected sheet as a grid
pub fn read_grid<P: AsRef<Path>>(path: P, selector: &SheetSelector) -> Result<Grid> {
    let path = path.as_ref();
    let mut workbook = open_source(path)?;
    let sheet_names = workbook.sheet_names();

    let name = match selector {
        SheetSelector::Index(index) => sheet_names.get(*index).cloned(),
        SheetSelector::Name(name) => sheet_names.iter().find(|s| *s == name).cloned(),
    }
    .ok_or_else(|| ExtractError::SheetNotFound(selector.to_string()))?;

    let grid = load_grid(&mut workbook, path, &name)?;
    let (rows, cols) = grid.dimensions();
    info!(sheet = %name, rows, cols, "loaded sheet");
    Ok(grid)
}

/// Open a spreadsheet and return every sheet as a grid, in workbook order
pub fn read_all_grids<P: AsRef<Path>>(path: P) -> Result<Vec<Grid>> {
    let path = path.as_ref();
    let mut workbook = open_source(path)?;
    let sheet_names = workbook.sheet_names();

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in &sheet_names {
        grids.push(load_grid(&mut workbook, path, name)?);
    }
    Ok(grids)
}

fn open_source(path: &Path) -> Result<Sheets<BufReader<File>>> {
    if !path.exists() {
        return Err(ExtractError::SourceNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "opening workbook");
    open_workbook_auto(path).map_err(|e| ExtractError::UnreadableSource {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn load_grid(workbook: &mut Sheets<BufReader<File>>, path: &Path, name: &str) -> Result<Grid> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| ExtractError::UnreadableSource {
            path: path.to_path_buf(),
            reason: format!("sheet '{}': {}", name, e),
        })?;
    Ok(Grid::new(name, range))
}
