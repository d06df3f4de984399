use std::fmt::Write;

use crate::loader::Dataset;
use crate::models::SkillSummary;

pub fn summarize_skills(dataset: &Dataset) -> Vec<SkillSummary> {
    dataset
        .skill_names()
        .iter()
        .enumerate()
        .map(|(slot, skill)| {
            let values = dataset.matrix().iter().map(|row| row[slot]);
            let (total, min, max) = values.fold(
                (0.0, f64::INFINITY, f64::NEG_INFINITY),
                |(total, min, max), value| (total + value, min.min(value), max.max(value)),
            );
            let count = dataset.len();
            SkillSummary {
                skill: skill.clone(),
                mean: if count == 0 { 0.0 } else { total / count as f64 },
                min: if count == 0 { 0.0 } else { min },
                max: if count == 0 { 0.0 } else { max },
            }
        })
        .collect()
}

pub fn build_summary(dataset: &Dataset) -> String {
    let summaries = summarize_skills(dataset);
    let mut output = String::new();

    let _ = writeln!(output, "# Group Skill Overview");
    let _ = writeln!(
        output,
        "Loaded {} members from {} ({} rows without an alias dropped)",
        dataset.len(),
        dataset.source,
        dataset.dropped_rows
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Histogram Columns");
    for column in dataset.table().choosable_columns() {
        let _ = writeln!(output, "- {column}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Skill Ratings");

    if dataset.is_empty() {
        let _ = writeln!(output, "No members in this survey.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: mean {:.1} (range {:.1} to {:.1})",
                summary.skill, summary.mean, summary.min, summary.max
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_dataset;
    use crate::loader::tests::{sample_dataset, survey_csv};

    #[test]
    fn means_follow_skill_order() {
        let dataset = sample_dataset();
        let summaries = summarize_skills(&dataset);
        assert_eq!(summaries.len(), dataset.skill_names().len());
        assert_eq!(summaries[0].skill, "viz");
        assert!((summaries[0].mean - 6.5).abs() < 0.001);
        assert_eq!(summaries[0].min, 5.0);
        assert_eq!(summaries[0].max, 8.0);
    }

    #[test]
    fn empty_survey_summarizes_to_zero() {
        let dataset = read_dataset(survey_csv(&[]).as_bytes(), "empty.csv").unwrap();
        let summaries = summarize_skills(&dataset);
        assert!(summaries.iter().all(|s| s.mean == 0.0 && s.max == 0.0));
        assert!(build_summary(&dataset).contains("No members in this survey."));
    }

    #[test]
    fn summary_lists_columns_and_ratings() {
        let dataset = sample_dataset();
        let text = build_summary(&dataset);
        assert!(
            text.contains("Loaded 2 members from sample.csv (1 rows without an alias dropped)")
        );
        assert!(text.contains("- MAJOR"));
        assert!(text.contains("- viz: mean 6.5 (range 5.0 to 8.0)"));
    }
}
