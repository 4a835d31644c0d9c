//! Output document model and assembly

use crate::error::{ExtractError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Top-level extracted document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub program: String,
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Week {
    pub week: u32,
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day: u32,
    pub day_name: String,
    pub exercises: Vec<Exercise>,
    /// Only populated by layouts with block markers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
}

impl Day {
    pub fn new(day: u32, day_name: impl Into<String>) -> Self {
        Self {
            day,
            day_name: day_name.into(),
            exercises: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Exercises directly under the day plus those inside its blocks
    pub fn exercise_count(&self) -> usize {
        self.exercises.len()
            + self
                .blocks
                .iter()
                .map(|block| block.exercises.len())
                .sum::<usize>()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub tempo: String,
    pub sets_reps: String,
    pub rest: String,
    pub results: String,
    pub day: u32,
    pub week: u32,
}

/// Diagnostic counts over a program
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub weeks: usize,
    pub days: usize,
    pub blocks: usize,
    pub exercises: usize,
    pub per_week: Vec<WeekSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub week: u32,
    pub days: Vec<(u32, String, usize)>,
}

impl WeekSummary {
    pub fn exercises(&self) -> usize {
        self.days.iter().map(|(_, _, count)| count).sum()
    }
}

impl Program {
    pub fn summary(&self) -> Summary {
        let per_week: Vec<WeekSummary> = self
            .weeks
            .iter()
            .map(|week| WeekSummary {
                week: week.week,
                days: week
                    .days
                    .iter()
                    .map(|day| (day.day, day.day_name.clone(), day.exercise_count()))
                    .collect(),
            })
            .collect();

        let days = self.weeks.iter().flat_map(|w| &w.days);
        Summary {
            weeks: self.weeks.len(),
            days: days.clone().count(),
            blocks: days.clone().map(|d| d.blocks.len()).sum(),
            exercises: days.map(Day::exercise_count).sum(),
            per_week,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the program as indented UTF-8 JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_failure = |source: std::io::Error| ExtractError::WriteFailure {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_failure)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| write_failure(e.into()))?;
        writer.write_all(b"\n").map_err(write_failure)?;
        writer.flush().map_err(write_failure)
    }
}

/// Collects weeks and days in encounter order
#[derive(Debug, Default)]
pub struct DocumentAssembler {
    name: String,
    weeks: Vec<Week>,
}

impl DocumentAssembler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weeks: Vec::new(),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Position of the week, creating it at the end on first sight
    pub fn ensure_week(&mut self, week: u32) -> usize {
        match self.weeks.iter().position(|w| w.week == week) {
            Some(index) => index,
            None => {
                self.weeks.push(Week {
                    week,
                    days: Vec::new(),
                });
                self.weeks.len() - 1
            }
        }
    }

    pub fn push_day(&mut self, week: u32, day: Day) {
        let index = self.ensure_week(week);
        self.weeks[index].days.push(day);
    }

    pub fn finish(self) -> Program {
        Program {
            program: self.name,
            weeks: self.weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: &str, day: u32, week: u32) -> Exercise {
        Exercise {
            id: id.to_string(),
            name: format!("Exercise {}", id),
            day,
            week,
            ..Default::default()
        }
    }

    fn sample() -> Program {
        let mut assembler = DocumentAssembler::new("Davey Jone's Pump");
        let mut day1 = Day::new(1, "Upper Pull");
        day1.exercises.push(exercise("A1", 1, 1));
        day1.exercises.push(exercise("A2", 1, 1));
        let mut day2 = Day::new(2, "");
        day2.blocks.push(Block {
            name: "Block 1".to_string(),
            exercises: vec![exercise("B1", 2, 1)],
        });
        assembler.push_day(1, day1);
        assembler.push_day(1, day2);
        assembler.push_day(2, Day::new(1, "Upper Pull"));
        assembler.finish()
    }

    #[test]
    fn test_assembler_keeps_encounter_order() {
        let mut assembler = DocumentAssembler::new("p");
        assert_eq!(assembler.ensure_week(3), 0);
        assert_eq!(assembler.ensure_week(1), 1);
        assert_eq!(assembler.ensure_week(3), 0);
        assembler.push_day(1, Day::new(2, ""));
        assembler.push_day(1, Day::new(1, ""));

        let program = assembler.finish();
        let weeks: Vec<u32> = program.weeks.iter().map(|w| w.week).collect();
        assert_eq!(weeks, vec![3, 1]);
        let days: Vec<u32> = program.weeks[1].days.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![2, 1]);
    }

    #[test]
    fn test_summary() {
        let summary = sample().summary();
        assert_eq!(summary.weeks, 2);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.blocks, 1);
        assert_eq!(summary.exercises, 3);
        assert_eq!(summary.per_week[0].exercises(), 3);
        assert_eq!(summary.per_week[1].days, vec![(1, "Upper Pull".to_string(), 0)]);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["program"], "Davey Jone's Pump");
        let day = &json["weeks"][0]["days"][0];
        assert_eq!(day["day"], 1);
        assert_eq!(day["dayName"], "Upper Pull");
        assert!(day.get("blocks").is_none());
        assert_eq!(day["exercises"][0]["id"], "A1");
        assert_eq!(day["exercises"][0]["setsReps"], "");
        assert_eq!(json["weeks"][0]["days"][1]["blocks"][0]["name"], "Block 1");
    }

    #[test]
    fn test_round_trip_counts() {
        let program = sample();
        let parsed: Program = serde_json::from_str(&program.to_json().unwrap()).unwrap();
        assert_eq!(parsed.summary(), program.summary());
        assert_eq!(parsed, program);
    }

    #[test]
    fn test_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.json");
        let err = sample().write_json(&target).unwrap_err();
        assert!(matches!(err, ExtractError::WriteFailure { .. }));
    }

    #[test]
    fn test_empty_program_is_well_formed() {
        let program = DocumentAssembler::new("Empty").finish();
        let json: serde_json::Value = serde_json::from_str(&program.to_json().unwrap()).unwrap();
        assert_eq!(json["weeks"].as_array().unwrap().len(), 0);
        assert_eq!(program.summary(), Summary::default());
    }
}
