//! liftsheet-core: structured workout programs from hand-formatted spreadsheets
//!
//! Rows flow one way: the grid adapter normalizes cells, the layout walker
//! consults the marker classifier for every row, hands data rows to the
//! exercise parser and collects the results in a document assembler.

pub mod classifier;
pub mod config;
pub mod document;
pub mod error;
pub mod exercise;
pub mod inspect;
pub mod reader;
pub mod walker;

use std::path::Path;
use tracing::{info, warn};

pub use config::{ColumnMapping, Dialect, Layout};
pub use document::{Program, Summary};
pub use error::{ExtractError, Result};
pub use reader::{Grid, SheetSelector};
pub use walker::LayoutWalker;

/// Main extraction interface
pub struct Extractor {
    layout: Layout,
}

impl Extractor {
    /// Create an extractor for a validated layout
    pub fn new(layout: Layout) -> Result<Self> {
        layout.validate()?;
        Ok(Self { layout })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Walk an already loaded sheet
    pub fn extract_grid(&self, grid: &Grid) -> Program {
        if grid.is_empty() {
            warn!(sheet = %grid.name, "sheet is empty");
        }
        let program = LayoutWalker::new(&self.layout, &grid.name).walk(grid.rows());
        let summary = program.summary();
        info!(
            sheet = %grid.name,
            layout = %self.layout.name,
            weeks = summary.weeks,
            days = summary.days,
            exercises = summary.exercises,
            "extraction finished"
        );
        program
    }

    /// Read one sheet of a spreadsheet file and extract its program
    pub fn extract_file<P: AsRef<Path>>(&self, path: P, selector: &SheetSelector) -> Result<Program> {
        let grid = reader::read_grid(path, selector)?;
        Ok(self.extract_grid(&grid))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            layout: Layout::default(),
        }
    }
}
