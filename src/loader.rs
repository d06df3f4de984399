use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::{
    CellValue, DisplayRow, DisplayTable, MemberRecord, RecordKey, SkillRow, RATING_MAX,
    RATING_MIN, SKILL_COLUMNS, SKILL_COUNT,
};

pub const DEFAULT_CSV: &str = "Self-Introduction to IVIS24 (Responses).csv";

pub const ALIAS_COLUMN: &str = "ALIAS";
pub const MAJOR_COLUMN: &str = "MAJOR";
pub const DEGREE_COLUMN: &str = "What degree are you pursuing?";
pub const INTERESTS_COLUMN: &str = "Interests";
pub const COURSES_COLUMN: &str =
    "What courses have you completed that are relevant to Information Visualization, where and when?";

/// Survey administration fields that say nothing about group fit.
pub const ADMIN_COLUMNS: [&str; 7] = [
    "Timestamp",
    "If you are studying at a university other than KTH, which is it?",
    "In what year did you start your university degree ?",
    "What year and month you expect to graduate?",
    "Do you use KTH Canvas?",
    "If you are working towards a master's degree, what is the status of your thesis? You:",
    "Unnamed: 23",
];

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct SurveyRow {
    #[serde(rename = "ALIAS")]
    alias: Option<String>,
    #[serde(rename = "MAJOR")]
    major: Option<String>,
    #[serde(rename = "What degree are you pursuing?")]
    degree: Option<String>,
    #[serde(rename = "Interests")]
    interests: Option<String>,
    #[serde(
        rename = "What courses have you completed that are relevant to Information Visualization, where and when?"
    )]
    previous_courses: Option<String>,
    viz: Option<f64>,
    stats: Option<f64>,
    math: Option<f64>,
    art: Option<f64>,
    ui: Option<f64>,
    code: Option<f64>,
    graph: Option<f64>,
    hci: Option<f64>,
    eval: Option<f64>,
    comm: Option<f64>,
    collab: Option<f64>,
    #[serde(rename = "GIT")]
    git: Option<f64>,
    avg: Option<f64>,
}

impl SurveyRow {
    fn skills(&self) -> [Option<f64>; SKILL_COUNT] {
        [
            self.viz,
            self.stats,
            self.math,
            self.art,
            self.ui,
            self.code,
            self.graph,
            self.hci,
            self.eval,
            self.comm,
            self.collab,
            self.git,
            self.avg,
        ]
    }

    fn has_alias(&self) -> bool {
        self.alias.as_deref().is_some_and(|alias| !alias.is_empty())
    }
}

/// Survey data loaded once at startup and shared read-only by every renderer.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub dropped_rows: usize,
    records: Vec<MemberRecord>,
    matrix: Vec<SkillRow>,
    table: DisplayTable,
    skill_names: Vec<String>,
}

impl Dataset {
    pub fn records(&self) -> &[MemberRecord] {
        &self.records
    }

    /// Skill ratings by row, aligned with `records()`.
    pub fn matrix(&self) -> &[SkillRow] {
        &self.matrix
    }

    pub fn table(&self) -> &DisplayTable {
        &self.table
    }

    pub fn skill_names(&self) -> &[String] {
        &self.skill_names
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn row_of(&self, key: RecordKey) -> Option<usize> {
        self.records.iter().position(|record| record.key == key)
    }
}

pub fn load_dataset(path: &Path) -> anyhow::Result<Dataset> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open survey file {}", path.display()))?;
    read_dataset(file, &path.display().to_string())
}

pub fn read_dataset<R: Read>(input: R, source: &str) -> anyhow::Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read header row of {source}"))?
        .clone();
    check_headers(&headers, source)?;

    let mut rows = Vec::new();
    let mut raw = csv::StringRecord::new();
    while reader
        .read_record(&mut raw)
        .with_context(|| format!("failed to read {source}"))?
    {
        let line = raw.position().map(|pos| pos.line()).unwrap_or_default();
        let row: SurveyRow = raw
            .deserialize(Some(&headers))
            .with_context(|| format!("malformed row at line {line} of {source}"))?;
        rows.push((line, row));
    }

    let total = rows.len();
    let rows = drop_anonymous(rows);
    let dropped_rows = total - rows.len();

    let mut records = Vec::with_capacity(rows.len());
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (line, row) in rows {
        let alias = row.alias.clone().unwrap_or_default();
        let ordinal = seen.entry(alias.clone()).or_insert(0);
        if *ordinal > 0 {
            tracing::warn!(alias = %alias, line, "duplicate alias in survey data");
        }
        let key = RecordKey::derive(&alias, *ordinal);
        *ordinal += 1;

        let skills = parse_skills(&row, line, source)?;
        records.push(MemberRecord {
            key,
            alias,
            major: row.major.unwrap_or_default(),
            degree: row.degree.unwrap_or_default(),
            interests: row.interests.unwrap_or_default(),
            previous_courses: row.previous_courses.unwrap_or_default(),
            skills,
        });
    }

    tracing::info!(
        source,
        retained = records.len(),
        dropped = dropped_rows,
        "survey data loaded"
    );

    let matrix = records.iter().map(|record| record.skills).collect();
    let table = build_display_table(&records);

    Ok(Dataset {
        source: source.to_string(),
        loaded_at: Utc::now(),
        dropped_rows,
        records,
        matrix,
        table,
        skill_names: SKILL_COLUMNS.iter().map(|name| name.to_string()).collect(),
    })
}

fn check_headers(headers: &csv::StringRecord, source: &str) -> anyhow::Result<()> {
    let required = [
        ALIAS_COLUMN,
        MAJOR_COLUMN,
        DEGREE_COLUMN,
        INTERESTS_COLUMN,
        COURSES_COLUMN,
    ]
    .into_iter()
    .chain(SKILL_COLUMNS);

    let missing: Vec<&str> = required
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        bail!("{source} is missing required columns: {}", missing.join(", "));
    }

    for header in headers.iter() {
        if header.is_empty() || ADMIN_COLUMNS.contains(&header) {
            tracing::debug!(column = header, "dropping administrative column");
        }
    }

    Ok(())
}

/// Removes rows without an alias. Applying it to its own output is a no-op.
fn drop_anonymous(rows: Vec<(u64, SurveyRow)>) -> Vec<(u64, SurveyRow)> {
    rows.into_iter().filter(|(_, row)| row.has_alias()).collect()
}

fn parse_skills(row: &SurveyRow, line: u64, source: &str) -> anyhow::Result<SkillRow> {
    let mut skills = [0.0; SKILL_COUNT];
    for (slot, (name, value)) in SKILL_COLUMNS.iter().zip(row.skills()).enumerate() {
        let Some(value) = value else {
            bail!("line {line} of {source}: missing rating for {name}");
        };
        if !value.is_finite() || !(RATING_MIN..=RATING_MAX).contains(&value) {
            bail!(
                "line {line} of {source}: rating {value} for {name} is outside {RATING_MIN}..={RATING_MAX}"
            );
        }
        skills[slot] = value;
    }
    Ok(skills)
}

fn build_display_table(records: &[MemberRecord]) -> DisplayTable {
    let columns = [ALIAS_COLUMN, MAJOR_COLUMN, DEGREE_COLUMN]
        .into_iter()
        .chain(SKILL_COLUMNS)
        .map(str::to_string)
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            let mut cells = vec![
                CellValue::Text(record.alias.clone()),
                CellValue::Text(record.major.clone()),
                CellValue::Text(record.degree.clone()),
            ];
            cells.extend(record.skills.iter().map(|value| CellValue::Number(*value)));
            DisplayRow {
                key: record.key,
                cells,
            }
        })
        .collect();

    DisplayTable { columns, rows }
}
