//! Layout walker: streams rows through the classifier and builds the program

use crate::classifier::{Marker, MarkerClassifier, day_name, extract_number, is_exercise_candidate};
use crate::config::{Lane, Layout};
use crate::document::{Block, Day, DocumentAssembler, Program};
use crate::exercise::parse_exercise_row;
use crate::reader::Row;
use tracing::debug;

/// Innermost open section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkerState {
    Idle,
    InWeek,
    InDay,
    InBlock,
}

/// Single-pass state machine over sheet rows.
///
/// One `Day` is kept open per active lane. Flat layouts have a single lane that
/// follows the latest week marker; side-by-side layouts use the configured lanes
/// and parse every exercise row once per lane.
pub struct LayoutWalker<'a> {
    layout: &'a Layout,
    classifier: MarkerClassifier,
    state: WalkerState,
    assembler: DocumentAssembler,
    title_pending: bool,
    lanes: Vec<Lane>,
    open_days: Vec<Day>,
}

impl<'a> LayoutWalker<'a> {
    /// `fallback_name` names the program when neither the layout nor the sheet's
    /// title row provides one
    pub fn new(layout: &'a Layout, fallback_name: &str) -> Self {
        let name = layout.program.as_deref().unwrap_or(fallback_name);
        Self {
            layout,
            classifier: MarkerClassifier::new(layout),
            state: WalkerState::Idle,
            assembler: DocumentAssembler::new(name),
            title_pending: layout.program.is_none(),
            lanes: Vec::new(),
            open_days: Vec::new(),
        }
    }

    pub fn state(&self) -> WalkerState {
        self.state
    }

    /// Walk all rows and return the assembled program
    pub fn walk<I: IntoIterator<Item = Row>>(mut self, rows: I) -> Program {
        for row in rows {
            self.step(&row);
        }
        self.finish()
    }

    /// Process one row
    pub fn step(&mut self, row: &Row) {
        if row.is_blank() {
            return;
        }

        let marker = self.classifier.classify(row);
        let title_row = self.title_pending;
        self.title_pending = false;

        match marker {
            Marker::Week {
                label,
                column_start,
            } => self.open_week(row, &label, column_start),
            Marker::Day { label } => self.open_day(row, &label),
            Marker::Block { label } => self.open_block(row, &label),
            Marker::NoMarker => {
                if !self.open_days.is_empty() {
                    self.add_exercises(row);
                } else if title_row
                    && !is_exercise_candidate(row, &self.layout.columns, self.layout)
                {
                    if let Some(title) = row.first_populated().and_then(|(_, v)| v.as_text()) {
                        debug!(row = row.index + 1, title, "program title");
                        self.assembler.set_name(title);
                    }
                } else {
                    debug!(row = row.index + 1, "row outside any day skipped");
                }
            }
        }
    }

    /// Flush open sections and return the program
    pub fn finish(mut self) -> Program {
        self.close_day();
        self.state = WalkerState::Idle;
        self.assembler.finish()
    }

    fn open_week(&mut self, row: &Row, label: &str, column_start: usize) {
        self.close_day();
        let week = extract_number(label);
        debug!(row = row.index + 1, week, label, "week marker");

        if self.layout.lanes.is_empty() {
            self.assembler.ensure_week(week);
            self.lanes = vec![Lane {
                week,
                columns: self.layout.columns_for_week(column_start),
            }];
        } else {
            // Side-by-side weeks come from the layout, the marker only ends the day
            self.start_lanes();
        }
        self.state = WalkerState::InWeek;
    }

    fn open_day(&mut self, row: &Row, label: &str) {
        self.close_day();
        if self.lanes.is_empty() {
            self.start_lanes();
        }

        let number = extract_number(label);
        let name = day_name(label);
        debug!(row = row.index + 1, day = number, label, "day marker");
        self.open_days = self
            .lanes
            .iter()
            .map(|_| Day::new(number, name.clone()))
            .collect();
        self.state = WalkerState::InDay;
    }

    fn open_block(&mut self, row: &Row, label: &str) {
        if self.open_days.is_empty() {
            debug!(row = row.index + 1, label, "block marker outside a day skipped");
            return;
        }
        debug!(row = row.index + 1, label, "block marker");
        for day in &mut self.open_days {
            day.blocks.push(Block {
                name: label.to_string(),
                exercises: Vec::new(),
            });
        }
        self.state = WalkerState::InBlock;
    }

    fn add_exercises(&mut self, row: &Row) {
        let in_block = self.state == WalkerState::InBlock;
        let mut parsed = false;
        for (lane, day) in self.lanes.iter().zip(self.open_days.iter_mut()) {
            let Some(exercise) =
                parse_exercise_row(row, &lane.columns, self.layout, day.day, lane.week)
            else {
                continue;
            };
            parsed = true;
            match day.blocks.last_mut() {
                Some(block) if in_block => block.exercises.push(exercise),
                _ => day.exercises.push(exercise),
            }
        }
        if !parsed {
            debug!(row = row.index + 1, "non-exercise row skipped");
        }
    }

    /// Activate the configured lanes, or an implicit week 1 when the sheet never
    /// declared a week
    fn start_lanes(&mut self) {
        self.lanes = if self.layout.lanes.is_empty() {
            vec![Lane {
                week: 1,
                columns: self.layout.columns.clone(),
            }]
        } else {
            self.layout.lanes.clone()
        };
        for lane in &self.lanes {
            self.assembler.ensure_week(lane.week);
        }
    }

    fn close_day(&mut self) {
        if self.open_days.is_empty() {
            return;
        }
        let days = std::mem::take(&mut self.open_days);
        for (lane, day) in self.lanes.iter().zip(days) {
            self.assembler.push_day(lane.week, day);
        }
        self.state = WalkerState::InWeek;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnMode, Dialect};
    use crate::reader::Scalar;

    fn row(index: u32, cells: &[&str]) -> Row {
        Row::new(index, cells.iter().map(|c| Scalar::text(c)).collect())
    }

    fn rows(lines: &[&[&str]]) -> Vec<Row> {
        lines
            .iter()
            .enumerate()
            .map(|(i, cells)| row(i as u32, cells))
            .collect()
    }

    #[test]
    fn test_flat_layout_without_week_markers() {
        let layout = Dialect::Flat.layout();
        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["Davey Jone's Pump"],
            &["DAY 1: Upper Pull/Lower Push"],
            &["", "", "TEMPO", "SETS/REPS", "REST", "RESULTS"],
            &["A1", "Bench Press", "211", "3x10", "90s", ""],
            &["A2", "Chin Up", "311", "3x8", "90s", "8,8,7"],
            &[],
            &["DAY 2: Upper Pull"],
            &["TEMPO", "SETS"],
            &["A1", "Row", "2010", "4x8", "60s"],
        ]));

        assert_eq!(program.program, "Davey Jone's Pump");
        assert_eq!(program.weeks.len(), 1);
        let week = &program.weeks[0];
        assert_eq!(week.week, 1);
        assert_eq!(week.days.len(), 2);
        assert_eq!(week.days[0].day, 1);
        assert_eq!(week.days[0].day_name, "Upper Pull/Lower Push");
        assert_eq!(week.days[0].exercises.len(), 2);
        assert_eq!(week.days[0].exercises[1].results, "8,8,7");
        assert_eq!(week.days[1].day, 2);
        assert_eq!(week.days[1].exercises.len(), 1);
        assert_eq!(week.days[1].exercises[0].id, "A1");
        assert_eq!(week.days[1].exercises[0].day, 2);
    }

    #[test]
    fn test_week_markers_switch_weeks() {
        let layout = Dialect::Flat.layout();
        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["WEEK 2"],
            &["DAY 1"],
            &["A1", "Squat", "3010", "5x5", "3min"],
            &["WEEK 1"],
            &["DAY 1"],
            &["A1", "Squat", "3010", "5x3", "3min"],
            &["WEEK 2"],
            &["DAY 2"],
            &["B1", "Deadlift", "", "3x3"],
        ]));

        // First occurrence order, repeated weeks merged
        let weeks: Vec<u32> = program.weeks.iter().map(|w| w.week).collect();
        assert_eq!(weeks, vec![2, 1]);
        assert_eq!(program.weeks[0].days.len(), 2);
        assert_eq!(program.weeks[0].days[1].exercises[0].week, 2);
        assert_eq!(program.weeks[1].days[0].exercises[0].sets_reps, "5x3");
        // No title row: falls back to the sheet name
        assert_eq!(program.program, "Sheet1");
    }

    #[test]
    fn test_week_relative_columns() {
        let mut layout = Dialect::Flat.layout();
        layout.column_mode = ColumnMode::WeekRelative;
        layout.columns.tempo = Some(0);
        layout.columns.sets_reps = Some(1);
        layout.columns.rest = Some(2);
        layout.columns.results = Some(3);

        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["", "", "", "WEEK 1"],
            &["DAY 1"],
            &["A1", "Press", "", "211", "3x10", "90s", "done"],
        ]));
        let exercise = &program.weeks[0].days[0].exercises[0];
        assert_eq!(exercise.tempo, "211");
        assert_eq!(exercise.sets_reps, "3x10");
        assert_eq!(exercise.rest, "90s");
        assert_eq!(exercise.results, "done");
    }

    #[test]
    fn test_side_by_side_lanes() {
        let layout = Dialect::SideBySide.layout();
        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["Davey Jone's Pump"],
            &["", "", "", "WEEK 1", "", "", "", "", "WEEK 2"],
            &["DAY 1: Upper Pull"],
            &["A1", "Pull Up", "", "311", "3x8", "90s", "", "", "311", "3x10", "90s", ""],
            &["A2", "Dip", "", "211", "3x12", "60s"],
            &["DAY 2: Legs"],
            &["B1", "Squat", "", "3010", "5x5", "2min", "", "", "3010", "5x3", "2min", "100kg"],
        ]));

        assert_eq!(program.program, "Davey Jone's Pump");
        assert_eq!(program.weeks.len(), 2);
        let week1 = &program.weeks[0];
        let week2 = &program.weeks[1];
        assert_eq!((week1.week, week2.week), (1, 2));
        assert_eq!(week1.days.len(), 2);
        assert_eq!(week2.days.len(), 2);
        assert_eq!(week2.days[0].day_name, "Upper Pull");

        // Each row is parsed once per lane, columns differ per week
        assert_eq!(week1.days[0].exercises.len(), 2);
        assert_eq!(week2.days[0].exercises.len(), 2);
        assert_eq!(week1.days[0].exercises[0].sets_reps, "3x8");
        assert_eq!(week2.days[0].exercises[0].sets_reps, "3x10");
        assert_eq!(week2.days[0].exercises[1].sets_reps, "");
        assert_eq!(week2.days[1].exercises[0].results, "100kg");
        assert_eq!(week2.days[1].exercises[0].week, 2);
    }

    #[test]
    fn test_blocks_layout() {
        let layout = Dialect::Blocks.layout();
        let program = LayoutWalker::new(&layout, "Sheet4").walk(rows(&[
            &["Week 1-2"],
            &["Day 1: Push"],
            &["A1", "Warm-up Row", "", "5min"],
            &["Block 1"],
            &["B1", "Incline Press", "3010", "4x8"],
            &["B2", "Fly", "2020", "3x12"],
            &["Block 2"],
            &["C1", "Pushdown", "2010", "3x15"],
            &["Day 2: Pull"],
            &["Block 1"],
            &["D1", "Row", "2011", "4x10"],
        ]));

        assert_eq!(program.weeks.len(), 1);
        assert_eq!(program.weeks[0].week, 1);
        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].exercises.len(), 1);
        assert_eq!(days[0].blocks.len(), 2);
        assert_eq!(days[0].blocks[0].name, "Block 1");
        assert_eq!(days[0].blocks[0].exercises.len(), 2);
        assert_eq!(days[0].blocks[1].exercises[0].id, "C1");
        assert_eq!(days[1].blocks[0].exercises[0].day, 2);
        assert_eq!(days[0].exercise_count(), 4);
    }

    #[test]
    fn test_state_transitions() {
        let layout = Dialect::Blocks.layout();
        let mut walker = LayoutWalker::new(&layout, "Sheet1");
        assert_eq!(walker.state(), WalkerState::Idle);

        walker.step(&row(0, &["Block 0"]));
        assert_eq!(walker.state(), WalkerState::Idle);
        walker.step(&row(1, &["Week 3"]));
        assert_eq!(walker.state(), WalkerState::InWeek);
        walker.step(&row(2, &["Day 1"]));
        assert_eq!(walker.state(), WalkerState::InDay);
        walker.step(&row(3, &["Block A"]));
        assert_eq!(walker.state(), WalkerState::InBlock);
        walker.step(&row(4, &["A1", "Curl"]));
        assert_eq!(walker.state(), WalkerState::InBlock);
        walker.step(&row(5, &["Week 4"]));
        assert_eq!(walker.state(), WalkerState::InWeek);

        let program = walker.finish();
        assert_eq!(program.weeks.len(), 2);
        assert_eq!(program.weeks[0].days[0].blocks[0].exercises[0].week, 3);
        assert!(program.weeks[1].days.is_empty());
    }

    #[test]
    fn test_empty_day_is_emitted() {
        let layout = Dialect::Flat.layout();
        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["DAY 1"],
            &["DAY 2"],
            &["A1", "Lunge"],
        ]));
        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert!(days[0].exercises.is_empty());
        assert_eq!(days[1].exercises.len(), 1);
    }

    #[test]
    fn test_exercises_before_any_day_are_skipped() {
        let layout = Dialect::Flat.layout();
        let program = LayoutWalker::new(&layout, "Sheet1").walk(rows(&[
            &["A1", "Orphan"],
            &["WEEK 1"],
            &["A2", "Orphan too"],
        ]));
        assert_eq!(program.program, "Sheet1");
        assert_eq!(program.weeks.len(), 1);
        assert!(program.weeks[0].days.is_empty());
    }

    #[test]
    fn test_layout_program_name_wins() {
        let mut layout = Dialect::Flat.layout();
        layout.program = Some("Britanica".to_string());
        let program =
            LayoutWalker::new(&layout, "Sheet1").walk(rows(&[&["Some Title"], &["DAY 1"]]));
        assert_eq!(program.program, "Britanica");
    }

    #[test]
    fn test_empty_input() {
        let layout = Dialect::Flat.layout();
        let program = LayoutWalker::new(&layout, "Empty").walk(Vec::new());
        assert_eq!(program.program, "Empty");
        assert!(program.weeks.is_empty());
    }
}
