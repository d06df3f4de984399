use serde::Serialize;

use crate::figure::{
    Axis, BarTrace, ColorBar, Figure, HeatmapTrace, Layout, Polar, PolarTrace, RadialAxis, Title,
    Trace,
};
use crate::loader::Dataset;
use crate::models::{MemberRecord, RecordKey, SkillRow, RATING_MAX, RATING_MIN};
use crate::selection::{ColumnChoice, Selection};
use crate::signal::Fragment;

pub const NO_SELECTION: &str = "No User Selected";

const HEATMAP_COLORSCALE: &str = "Plasma";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoCard {
    pub key: RecordKey,
    pub member: String,
    pub major: String,
    pub interests: String,
    pub previous_courses: String,
}

/// Distribution of one display column over every member, whatever is selected.
pub fn histogram(dataset: &Dataset, column: &ColumnChoice) -> Fragment {
    let bins = dataset.table().distribution(column.index());
    let (x, y): (Vec<_>, Vec<_>) = bins.into_iter().map(|bin| (bin.value, bin.count)).unzip();

    Fragment::Figure(Figure {
        data: vec![Trace::Bar(BarTrace {
            x,
            y,
            name: column.name().to_string(),
        })],
        layout: Layout {
            title: Some(Title::new(format!("Histogram for {}", column.name()))),
            xaxis: Some(Axis::titled(column.name())),
            yaxis: Some(Axis::titled("count")),
            ..Layout::default()
        },
    })
}

pub fn radar(dataset: &Dataset, selection: &Selection) -> Fragment {
    let theta = dataset.skill_names().to_vec();

    if selection.is_empty() {
        return Fragment::Figure(Figure {
            data: vec![Trace::Scatterpolar(PolarTrace {
                r: vec![0.0; theta.len()],
                theta,
                mode: "lines",
                fill: None,
                name: None,
            })],
            layout: Layout::sized(),
        });
    }

    let data = members(dataset, selection)
        .map(|(record, skills)| {
            Trace::Scatterpolar(PolarTrace {
                r: skills.to_vec(),
                theta: theta.clone(),
                mode: "lines+markers",
                fill: Some("toself"),
                name: Some(record.alias.clone()),
            })
        })
        .collect();

    Fragment::Figure(Figure {
        data,
        layout: Layout {
            polar: Some(Polar {
                radialaxis: RadialAxis {
                    visible: true,
                    range: [RATING_MIN, RATING_MAX],
                },
            }),
            showlegend: Some(true),
            ..Layout::sized()
        },
    })
}

pub fn heatmap(dataset: &Dataset, selection: &Selection) -> Fragment {
    let skills = dataset.skill_names().to_vec();

    let trace = if selection.is_empty() {
        HeatmapTrace {
            z: vec![vec![0.0; skills.len()]],
            x: skills,
            y: None,
            colorscale: HEATMAP_COLORSCALE,
            zmin: RATING_MIN,
            zmax: RATING_MAX,
            colorbar: None,
        }
    } else {
        let (y, z): (Vec<_>, Vec<_>) = members(dataset, selection)
            .map(|(record, ratings)| (record.alias.clone(), ratings.to_vec()))
            .unzip();
        HeatmapTrace {
            z,
            x: skills,
            y: Some(y),
            colorscale: HEATMAP_COLORSCALE,
            zmin: RATING_MIN,
            zmax: RATING_MAX,
            colorbar: Some(ColorBar {
                title: Title::new("Rating"),
            }),
        }
    };

    Fragment::Figure(Figure {
        data: vec![Trace::Heatmap(trace)],
        layout: Layout {
            xaxis: Some(Axis::titled("Skills")),
            yaxis: Some(Axis::titled("Users")),
            ..Layout::sized()
        },
    })
}

pub fn info_cards(dataset: &Dataset, selection: &Selection) -> Fragment {
    if selection.is_empty() {
        return Fragment::Notice(NO_SELECTION.to_string());
    }

    let cards = members(dataset, selection)
        .map(|(record, _)| InfoCard {
            key: record.key,
            member: record.alias.clone(),
            major: record.major.clone(),
            interests: record.interests.clone(),
            previous_courses: record.previous_courses.clone(),
        })
        .collect();

    Fragment::Cards(cards)
}

// Rows were bounds-checked when the selection was built against this dataset.
fn members<'a>(
    dataset: &'a Dataset,
    selection: &'a Selection,
) -> impl Iterator<Item = (&'a MemberRecord, &'a SkillRow)> + 'a {
    selection
        .rows()
        .iter()
        .map(move |&row| (&dataset.records()[row], &dataset.matrix()[row]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{sample_dataset, survey_csv};
    use crate::loader::{read_dataset, DEGREE_COLUMN};
    use crate::models::{CellValue, BLANK_LABEL, SKILL_COUNT};

    fn figure(fragment: Fragment) -> Figure {
        match fragment {
            Fragment::Figure(figure) => figure,
            other => panic!("expected a figure, got {other:?}"),
        }
    }

    fn polar(trace: &Trace) -> &PolarTrace {
        match trace {
            Trace::Scatterpolar(polar) => polar,
            other => panic!("expected a polar trace, got {other:?}"),
        }
    }

    fn heat(trace: &Trace) -> &HeatmapTrace {
        match trace {
            Trace::Heatmap(heat) => heat,
            other => panic!("expected a heatmap trace, got {other:?}"),
        }
    }

    #[test]
    fn histogram_covers_distinct_values_of_every_column() {
        let dataset = sample_dataset();
        for name in dataset.table().choosable_columns() {
            let column = ColumnChoice::new(&dataset, name).unwrap();
            let figure = figure(histogram(&dataset, &column));
            let Trace::Bar(bar) = &figure.data[0] else {
                panic!("expected a bar trace");
            };
            let expected = dataset.table().distribution(column.index());
            assert!(!bar.x.is_empty(), "empty histogram for {name}");
            assert_eq!(bar.x.len(), expected.len());
            assert_eq!(bar.y.iter().sum::<usize>(), dataset.len());
        }
    }

    #[test]
    fn histogram_is_titled_by_column() {
        let dataset = sample_dataset();
        let column = ColumnChoice::new(&dataset, "viz").unwrap();
        let figure = figure(histogram(&dataset, &column));
        assert_eq!(figure.layout.title, Some(Title::new("Histogram for viz")));
        let Trace::Bar(bar) = &figure.data[0] else {
            panic!("expected a bar trace");
        };
        assert_eq!(bar.x, vec![CellValue::Number(5.0), CellValue::Number(8.0)]);
        assert_eq!(bar.y, vec![1, 1]);
    }

    #[test]
    fn histogram_of_all_blank_column_has_one_bar() {
        let csv = survey_csv(&[
            "t,A,CS,,,,5,4,3,2,6,7,5,4,3,6,7,8,5",
            "t,B,Media,,,,8,6,5,7,9,4,6,8,5,7,8,3,6",
        ]);
        let dataset = read_dataset(csv.as_bytes(), "blank-degree.csv").unwrap();
        let column = ColumnChoice::new(&dataset, DEGREE_COLUMN).unwrap();
        let figure = figure(histogram(&dataset, &column));
        let Trace::Bar(bar) = &figure.data[0] else {
            panic!("expected a bar trace");
        };
        assert_eq!(bar.x, vec![CellValue::Text(BLANK_LABEL.to_string())]);
        assert_eq!(bar.y, vec![2]);
    }

    #[test]
    fn radar_placeholder_is_single_zero_trace() {
        let dataset = sample_dataset();
        let figure = figure(radar(&dataset, &Selection::empty()));
        assert_eq!(figure.data.len(), 1);
        let trace = polar(&figure.data[0]);
        assert_eq!(trace.r, vec![0.0; SKILL_COUNT]);
        assert_eq!(trace.theta, dataset.skill_names());
        assert_eq!(trace.name, None);
    }

    #[test]
    fn radar_draws_one_labelled_trace_per_selected_member() {
        let dataset = sample_dataset();
        let selection = Selection::from_rows(&dataset, &[1]).unwrap();
        let figure = figure(radar(&dataset, &selection));
        assert_eq!(figure.data.len(), 1);
        let trace = polar(&figure.data[0]);
        assert_eq!(trace.name.as_deref(), Some("B"));
        assert_eq!(trace.r[0], 8.0);
        assert_eq!(trace.fill, Some("toself"));
        assert_eq!(trace.mode, "lines+markers");
        assert_eq!(figure.layout.showlegend, Some(true));
        let polar_layout = figure.layout.polar.expect("radial axis");
        assert_eq!(polar_layout.radialaxis.range, [0.0, 10.0]);
    }

    #[test]
    fn radar_follows_selection_order() {
        let dataset = sample_dataset();
        let selection = Selection::from_rows(&dataset, &[1, 0]).unwrap();
        let figure = figure(radar(&dataset, &selection));
        let names: Vec<_> = figure
            .data
            .iter()
            .map(|trace| polar(trace).name.clone().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn heatmap_placeholder_is_single_zero_row() {
        let dataset = sample_dataset();
        let figure = figure(heatmap(&dataset, &Selection::empty()));
        let trace = heat(&figure.data[0]);
        assert_eq!(trace.z, vec![vec![0.0; SKILL_COUNT]]);
        assert_eq!(trace.x.len(), SKILL_COUNT);
        assert_eq!(trace.y, None);
    }

    #[test]
    fn heatmap_rows_follow_selection() {
        let dataset = sample_dataset();
        let selection = Selection::from_rows(&dataset, &[0, 1]).unwrap();
        let figure = figure(heatmap(&dataset, &selection));
        let trace = heat(&figure.data[0]);
        assert_eq!(trace.z.len(), 2);
        assert_eq!(trace.y, Some(vec!["A".to_string(), "B".to_string()]));
        assert_eq!(trace.z[1], dataset.matrix()[1].to_vec());
        assert_eq!((trace.zmin, trace.zmax), (0.0, 10.0));
    }

    #[test]
    fn info_cards_placeholder_when_nothing_selected() {
        let dataset = sample_dataset();
        assert_eq!(
            info_cards(&dataset, &Selection::empty()),
            Fragment::Notice(NO_SELECTION.to_string())
        );
    }

    #[test]
    fn info_cards_follow_selection_and_blank_missing_text() {
        let dataset = sample_dataset();
        let selection = Selection::from_rows(&dataset, &[1, 0]).unwrap();
        let Fragment::Cards(cards) = info_cards(&dataset, &selection) else {
            panic!("expected cards");
        };
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].member, "B");
        assert_eq!(cards[0].major, "Media Technology");
        assert_eq!(cards[0].interests, "");
        assert_eq!(cards[0].previous_courses, "");
        assert_eq!(cards[1].member, "A");
        assert_eq!(cards[1].previous_courses, "DH2320");
    }

    #[test]
    #[should_panic]
    fn selection_from_a_larger_survey_is_not_silently_truncated() {
        let larger = read_dataset(
            survey_csv(&[
                "t,A,CS,Master,,,1,1,1,1,1,1,1,1,1,1,1,1,1",
                "t,B,CS,Master,,,1,1,1,1,1,1,1,1,1,1,1,1,1",
                "t,C,CS,Master,,,1,1,1,1,1,1,1,1,1,1,1,1,1",
            ])
            .as_bytes(),
            "larger.csv",
        )
        .unwrap();
        let selection = Selection::from_rows(&larger, &[0, 2]).unwrap();
        info_cards(&sample_dataset(), &selection);
    }

    #[test]
    fn renderers_are_idempotent() {
        let dataset = sample_dataset();
        let selection = Selection::from_rows(&dataset, &[0, 1]).unwrap();
        assert_eq!(radar(&dataset, &selection), radar(&dataset, &selection));
        assert_eq!(heatmap(&dataset, &selection), heatmap(&dataset, &selection));
        assert_eq!(
            info_cards(&dataset, &selection),
            info_cards(&dataset, &selection)
        );
    }
}
