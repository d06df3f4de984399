use serde::Serialize;

use crate::loader::Dataset;
use crate::selection::ColumnChoice;
use crate::signal::Region;

pub const TITLE: &str = "DH2321 - Group Visualisation Tool";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: &'static str,
    pub notes: Vec<&'static str>,
}

/// Static page structure the shell renders once; only the regions are
/// patched afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub title: &'static str,
    pub overview: Section,
    pub details: Section,
    pub column_options: Vec<String>,
    pub default_column: String,
    pub table_columns: Vec<String>,
    pub regions: Vec<Region>,
}

pub fn page_layout(dataset: &Dataset, initial: &ColumnChoice, regions: Vec<Region>) -> PageLayout {
    PageLayout {
        title: TITLE,
        overview: Section {
            heading: "Overview",
            notes: Vec::new(),
        },
        details: Section {
            heading: "Group Members Details",
            notes: vec![
                "Select Users in the Table below to compare their skills and interests.",
                "Each column can be sorted in ascending/descending order, as well as filtered by typing in the box below the column name",
            ],
        },
        column_options: dataset.table().choosable_columns().to_vec(),
        default_column: initial.name().to_string(),
        table_columns: dataset.table().columns.clone(),
        regions,
    }
}
