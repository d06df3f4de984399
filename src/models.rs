use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rated survey columns plus the `avg` aggregate, in chart axis order.
pub const SKILL_COLUMNS: [&str; 13] = [
    "viz", "stats", "math", "art", "ui", "code", "graph", "hci", "eval", "comm", "collab", "GIT",
    "avg",
];

pub const SKILL_COUNT: usize = SKILL_COLUMNS.len();

pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

pub type SkillRow = [f64; SKILL_COUNT];

/// Histogram label for free-text cells the respondent left empty.
pub const BLANK_LABEL: &str = "(blank)";

/// Stable per-member identifier, derived from the alias and its occurrence
/// ordinal so it survives table sorting and reloads of the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(pub Uuid);

impl RecordKey {
    const NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_2c4e_9b3d_4f8a_a07c_51e2_d9b6_3f10);

    pub fn derive(alias: &str, ordinal: usize) -> Self {
        let name = format!("{alias}\u{1f}{ordinal}");
        RecordKey(Uuid::new_v5(&Self::NAMESPACE, name.as_bytes()))
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberRecord {
    pub key: RecordKey,
    pub alias: String,
    pub major: String,
    pub degree: String,
    pub interests: String,
    pub previous_courses: String,
    pub skills: SkillRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub key: RecordKey,
    pub cells: Vec<CellValue>,
}

/// Identity, descriptive and numeric columns shown in the member table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<DisplayRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub value: CellValue,
    pub count: usize,
}

impl DisplayTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Columns the histogram can be driven by: everything but the identity column.
    pub fn choosable_columns(&self) -> &[String] {
        self.columns.get(1..).unwrap_or_default()
    }

    /// Frequency of each distinct value in a column. Numeric values come back
    /// ascending, text values in order of first appearance, blank text last
    /// under `BLANK_LABEL`. Counts always add up to the number of rows.
    pub fn distribution(&self, column: usize) -> Vec<Bin> {
        let mut numbers: Vec<f64> = Vec::new();
        let mut texts: Vec<Bin> = Vec::new();
        let mut text_slots: HashMap<&str, usize> = HashMap::new();
        let mut blanks = 0usize;

        for row in &self.rows {
            match row.cells.get(column) {
                Some(CellValue::Number(value)) => numbers.push(*value),
                Some(CellValue::Text(text)) if text.is_empty() => blanks += 1,
                Some(CellValue::Text(text)) => {
                    let slot = *text_slots.entry(text.as_str()).or_insert_with(|| {
                        texts.push(Bin {
                            value: CellValue::Text(text.clone()),
                            count: 0,
                        });
                        texts.len() - 1
                    });
                    texts[slot].count += 1;
                }
                _ => {}
            }
        }

        numbers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mut bins: Vec<Bin> = Vec::new();
        for value in numbers {
            let value = CellValue::Number(value);
            if let Some(last) = bins.last_mut() {
                if last.value == value {
                    last.count += 1;
                    continue;
                }
            }
            bins.push(Bin { value, count: 1 });
        }

        bins.extend(texts);
        if blanks > 0 {
            bins.push(Bin {
                value: CellValue::Text(BLANK_LABEL.to_string()),
                count: blanks,
            });
        }
        bins
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSummary {
    pub skill: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}
