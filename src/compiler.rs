use crate::guides::{
    build_axis, build_grid, build_label, build_label_layout, build_legend, AxisOrientation,
    TooltipFormatter,
};
use crate::ir::{
    ChartOptions, ItemStyle, PointSpec, ResolvedChannels, SeriesData, SeriesSpec, TooltipSpec,
};
use crate::style::StyleTree;

const SERIES_TYPE: &str = "scatter";
const SYMBOL: &str = "circle";

/// Compile built series into the options object handed to the surface.
///
/// Both axes are value axes over the positional value record: x reads
/// dimension 0 and y dimension 1. Each axis is titled by the aggregate that
/// occupies its dimension; with a single aggregate the y axis is untitled.
pub fn compile_options(
    series: &[SeriesData],
    channels: &ResolvedChannels,
    styles: &StyleTree,
) -> ChartOptions {
    let x_axis = build_axis(styles, AxisOrientation::X, channels.aggregate.first());
    let y_axis = build_axis(styles, AxisOrientation::Y, channels.aggregate.get(1));

    let series_names: Vec<String> = series.iter().map(|s| s.name.clone()).collect();
    let label = build_label(styles);

    let series_specs = series
        .iter()
        .map(|s| SeriesSpec {
            kind: SERIES_TYPE,
            name: s.name.clone(),
            symbol: SYMBOL,
            item_style: ItemStyle { color: s.color.clone() },
            label: label.clone(),
            label_layout: build_label_layout(),
            data: s.points.iter().map(PointSpec::from).collect(),
        })
        .collect();

    ChartOptions {
        tooltip: TooltipSpec {
            trigger: "item",
            formatter: TooltipFormatter::new(channels),
        },
        legend: build_legend(styles, &series_names),
        grid: build_grid(styles),
        x_axis,
        y_axis,
        series: series_specs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldBinding;
    use crate::ir::{PointRecord, PointValue, ResolvedField};
    use serde_json::{json, Value};

    fn field(name: &str) -> ResolvedField {
        ResolvedField {
            binding: FieldBinding::new(name),
            column: name.to_string(),
            display_name: name.to_string(),
        }
    }

    fn point(name: &str, x: f64) -> PointRecord {
        PointRecord {
            name: name.to_string(),
            value: PointValue {
                aggregates: vec![json!(x)],
                infos: vec![],
                size: 0.0,
                color_key: None,
            },
            symbol_size: 19.0,
            row_context: Value::Null,
        }
    }

    fn make_series() -> Vec<SeriesData> {
        vec![
            SeriesData {
                name: "A".to_string(),
                color: Some("#f00".to_string()),
                points: vec![point("x", 1.0), point("y", 2.0)],
            },
            SeriesData {
                name: "B".to_string(),
                color: None,
                points: vec![point("y", 3.0), point("z", 4.0)],
            },
        ]
    }

    #[test]
    fn test_single_aggregate_keeps_value_y_axis() {
        let channels = ResolvedChannels {
            aggregate: vec![field("sales")],
            ..Default::default()
        };
        let options = compile_options(&make_series(), &channels, &StyleTree::default());

        assert_eq!(options.x_axis.kind, "value");
        assert_eq!(options.x_axis.name.as_deref(), Some("sales"));
        assert_eq!(options.y_axis.kind, "value");
        assert_eq!(options.y_axis.name, None);

        let json = options.to_json();
        assert_eq!(json["yAxis"]["type"], json!("value"));
        assert!(json["yAxis"].get("data").is_none());
    }

    #[test]
    fn test_two_aggregates_use_value_axes() {
        let channels = ResolvedChannels {
            aggregate: vec![field("sales"), field("profit")],
            ..Default::default()
        };
        let options = compile_options(&make_series(), &channels, &StyleTree::default());
        assert_eq!(options.y_axis.kind, "value");
        assert_eq!(options.y_axis.name.as_deref(), Some("profit"));
    }

    #[test]
    fn test_series_specs_and_legend() {
        let channels = ResolvedChannels {
            aggregate: vec![field("sales")],
            ..Default::default()
        };
        let options = compile_options(&make_series(), &channels, &StyleTree::default());
        assert_eq!(options.legend.data, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(options.series.len(), 2);

        let json = options.to_json();
        assert_eq!(json["series"][0]["type"], json!("scatter"));
        assert_eq!(json["series"][0]["itemStyle"]["color"], json!("#f00"));
        assert!(json["series"][1]["itemStyle"].get("color").is_none());
        assert_eq!(json["series"][0]["labelLayout"]["hideOverlap"], json!(true));
        assert_eq!(json["series"][0]["data"][1]["symbolSize"], json!(19.0));
        assert_eq!(json["tooltip"], json!({"trigger": "item"}));
    }
}
