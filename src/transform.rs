use crate::data::{cell_as_f64, cell_to_text, ProjectedRow, RowContextExtractor};
use crate::ir::{PointRecord, PointValue, ResolvedChannels, ResolvedField, SeriesData};
use crate::scale::{SizeScale, SymbolSizer};
use crate::style::StyleTree;
use std::collections::HashMap;

/// Main entry point: split projected rows into series and build every point
pub fn build_series(
    rows: &[ProjectedRow],
    channels: &ResolvedChannels,
    styles: &StyleTree,
    extractor: &dyn RowContextExtractor,
) -> Vec<SeriesData> {
    // 1. One size scale shared by every series
    let scale = channels
        .size
        .first()
        .and_then(|field| SizeScale::from_rows(rows, &field.column));
    let sizer = SymbolSizer::from_styles(scale, styles);

    // 2. Partition rows
    let partitions = partition_rows(rows, channels.color.first());

    // 3. Build points per partition
    partitions
        .into_iter()
        .map(|partition| {
            let points = partition
                .rows
                .iter()
                .map(|row| build_point(row, channels, &sizer, partition.key.is_some(), extractor))
                .collect();

            match partition.key {
                Some(key) => SeriesData {
                    color: channels.color.first().and_then(|field| {
                        let color = field.binding.palette_color(&key).map(str::to_string);
                        if color.is_none() {
                            log::debug!("no palette color for key '{}', leaving it to the surface", key);
                        }
                        color
                    }),
                    name: key,
                    points,
                },
                None => SeriesData {
                    name: channels.group_label(),
                    color: None,
                    points,
                },
            }
        })
        .collect()
}

struct Partition<'a> {
    /// Color key; `None` for the implicit single series
    key: Option<String>,
    rows: Vec<&'a ProjectedRow>,
}

/// Split rows by the color field's value, in order of first appearance.
/// Without a color field every row lands in one implicit partition.
fn partition_rows<'a>(rows: &'a [ProjectedRow], color: Option<&ResolvedField>) -> Vec<Partition<'a>> {
    if rows.is_empty() {
        return Vec::new();
    }

    let Some(color) = color else {
        return vec![Partition {
            key: None,
            rows: rows.iter().collect(),
        }];
    };

    let mut partitions: Vec<Partition<'a>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let key = cell_to_text(&row.cell(&color.column));
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            partitions.push(Partition {
                key: Some(key),
                rows: Vec::new(),
            });
            partitions.len() - 1
        });
        partitions[slot].rows.push(row);
    }
    partitions
}

fn build_point(
    row: &ProjectedRow,
    channels: &ResolvedChannels,
    sizer: &SymbolSizer,
    color_grouped: bool,
    extractor: &dyn RowContextExtractor,
) -> PointRecord {
    let name = channels
        .group
        .iter()
        .map(|f| cell_to_text(&row.cell(&f.column)))
        .collect::<Vec<_>>()
        .join("-");

    let size = resolve_size(row, channels.size.first(), sizer.scale());

    let value = PointValue {
        aggregates: channels.aggregate.iter().map(|f| row.cell(&f.column)).collect(),
        infos: channels.info.iter().map(|f| row.cell(&f.column)).collect(),
        size,
        color_key: if color_grouped {
            channels.color.first().map(|f| row.cell(&f.column))
        } else {
            None
        },
    };

    PointRecord {
        name,
        symbol_size: sizer.size(size),
        value,
        row_context: extractor.extract(row),
    }
}

/// The row's size cell, or `(max - min) / 2` when the cell is absent, zero or not a number
fn resolve_size(row: &ProjectedRow, field: Option<&ResolvedField>, scale: Option<SizeScale>) -> f64 {
    let fallback = scale.map_or(0.0, |s| s.default_value());
    field
        .and_then(|f| row.get(&f.column))
        .and_then(cell_as_f64)
        .filter(|v| *v != 0.0)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{project_rows, Column, Dataset, PassThrough};
    use crate::config::FieldBinding;
    use serde_json::json;

    fn field(col: &str) -> ResolvedField {
        ResolvedField {
            binding: FieldBinding::new(col),
            column: col.to_string(),
            display_name: col.to_string(),
        }
    }

    fn make_rows() -> Vec<ProjectedRow> {
        let data = Dataset::new(
            vec![Column::new("category"), Column::new("value"), Column::new("size")],
            vec![
                vec![json!("A"), json!(10), json!(5)],
                vec![json!("B"), json!(20), json!(15)],
                vec![json!("A"), json!(30), json!(25)],
            ],
        )
        .unwrap();
        project_rows(&data)
    }

    fn make_channels() -> ResolvedChannels {
        ResolvedChannels {
            group: vec![field("category")],
            aggregate: vec![field("value")],
            size: vec![field("size")],
            ..Default::default()
        }
    }

    #[test]
    fn test_implicit_single_series() {
        let series = build_series(&make_rows(), &make_channels(), &StyleTree::default(), &PassThrough);
        assert_eq!(series.len(), 1);
        let s = &series[0];
        assert_eq!(s.name, "category");
        assert_eq!(s.color, None);
        let names: Vec<&str> = s.points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A"]);
        assert_eq!(s.points[1].value.to_positional(), vec![json!(20), json!(15.0)]);
        assert_eq!(s.points[0].row_context["category"], json!("A"));
    }

    #[test]
    fn test_color_grouping() {
        let mut channels = make_channels();
        let mut color = field("category");
        color.binding = FieldBinding::new("category").with_palette([("A", "#f00")]);
        channels.color = vec![color];

        let series = build_series(&make_rows(), &channels, &StyleTree::default(), &PassThrough);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "A");
        assert_eq!(series[0].color.as_deref(), Some("#f00"));
        assert_eq!(series[0].points.len(), 2);
        assert_eq!(series[1].name, "B");
        assert_eq!(series[1].color, None);
        assert_eq!(series[1].points[0].value.color_key, Some(json!("B")));
    }

    #[test]
    fn test_size_scale_is_global() {
        let mut channels = make_channels();
        channels.color = vec![field("category")];
        let series = build_series(&make_rows(), &channels, &StyleTree::default(), &PassThrough);

        // "B" holds the only mid-range value; its size is relative to the whole dataset
        let b = &series[1].points[0];
        let a_small = &series[0].points[0];
        let a_large = &series[0].points[1];
        assert!(a_small.symbol_size < b.symbol_size);
        assert!(b.symbol_size < a_large.symbol_size);
    }

    #[test]
    fn test_falsy_size_uses_default() {
        let data = Dataset::new(
            vec![Column::new("value"), Column::new("size")],
            vec![
                vec![json!(1), json!(4)],
                vec![json!(2), json!(0)],
                vec![json!(3), json!(null)],
                vec![json!(4), json!(12)],
            ],
        )
        .unwrap();
        let channels = ResolvedChannels {
            aggregate: vec![field("value")],
            size: vec![field("size")],
            ..Default::default()
        };
        let series = build_series(&project_rows(&data), &channels, &StyleTree::default(), &PassThrough);
        let sizes: Vec<f64> = series[0].points.iter().map(|p| p.value.size).collect();
        // zero is falsy; the default is (12 - 0) / 2
        assert_eq!(sizes, vec![4.0, 6.0, 6.0, 12.0]);
    }

    #[test]
    fn test_implicit_series_without_group_is_unnamed() {
        let channels = ResolvedChannels {
            aggregate: vec![field("value")],
            ..Default::default()
        };
        let series = build_series(&make_rows(), &channels, &StyleTree::default(), &PassThrough);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "");
        assert!(series[0].points.iter().all(|p| p.name.is_empty()));
    }

    #[test]
    fn test_non_numeric_size_uses_default() {
        let data = Dataset::new(
            vec![Column::new("value"), Column::new("size")],
            vec![
                vec![json!(1), json!(2)],
                vec![json!(2), json!("n/a")],
                vec![json!(3), json!("")],
                vec![json!(4), json!(10)],
            ],
        )
        .unwrap();
        let channels = ResolvedChannels {
            aggregate: vec![field("value")],
            size: vec![field("size")],
            ..Default::default()
        };
        let series = build_series(&project_rows(&data), &channels, &StyleTree::default(), &PassThrough);
        let sizes: Vec<f64> = series[0].points.iter().map(|p| p.value.size).collect();
        // text cells are skipped by the scale and take (10 - 2) / 2
        assert_eq!(sizes, vec![2.0, 4.0, 4.0, 10.0]);
    }

    #[test]
    fn test_empty_rows() {
        let series = build_series(&[], &make_channels(), &StyleTree::default(), &PassThrough);
        assert!(series.is_empty());
    }

    #[test]
    fn test_no_size_channel_is_finite() {
        let channels = ResolvedChannels {
            aggregate: vec![field("value")],
            ..Default::default()
        };
        let series = build_series(&make_rows(), &channels, &StyleTree::default(), &PassThrough);
        for p in &series[0].points {
            assert!(p.symbol_size.is_finite());
            assert_eq!(p.value.size, 0.0);
        }
    }
}
