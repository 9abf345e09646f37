use crate::ir::{AxisLabelSpec, AxisSpec, LineToggle, ResolvedField};
use crate::style::StyleTree;

const AXIS_TYPE: &str = "value";

/// One of the two orthogonal axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    X,
    Y,
}

impl AxisOrientation {
    fn group(self) -> &'static str {
        match self {
            AxisOrientation::X => "xAxis",
            AxisOrientation::Y => "yAxis",
        }
    }

    /// Split lines of the x axis are vertical, those of the y axis horizontal;
    /// both live in the shared `splitLine` group under different keys.
    fn split_line_keys(self) -> (&'static str, &'static str) {
        match self {
            AxisOrientation::X => ("showVerticalLine", "verticalLineStyle"),
            AxisOrientation::Y => ("showHorizonLine", "horizonLineStyle"),
        }
    }
}

/// Build one axis.
///
/// Defaults for unset keys: axis line, labels, title and split lines are
/// shown; the axis is not inverted; name placement and bounds are left to
/// the plotting library.
pub fn build_axis(
    styles: &StyleTree,
    orientation: AxisOrientation,
    field: Option<&ResolvedField>,
) -> AxisSpec {
    let group = [orientation.group()];
    let (show_split, split_style) = orientation.split_line_keys();

    let show_title = styles.bool(&group, "showTitleAndUnit").unwrap_or(true);

    AxisSpec {
        kind: AXIS_TYPE,
        show: true,
        inverse: styles.bool(&group, "inverseAxis").unwrap_or(false),
        name: if show_title { field.map(|f| f.display_name.clone()) } else { None },
        name_location: styles.string(&group, "nameLocation").map(str::to_string),
        name_gap: styles.number(&group, "nameGap"),
        name_rotate: styles.number(&group, "nameRotate"),
        min: styles.number(&group, "min"),
        max: styles.number(&group, "max"),
        axis_line: LineToggle {
            show: styles.bool(&group, "showAxis").unwrap_or(true),
            line_style: styles.line_style(&group, "lineStyle"),
        },
        axis_label: AxisLabelSpec {
            show: styles.bool(&group, "showLabel").unwrap_or(true),
            font: styles.font(&group, "font"),
        },
        split_line: LineToggle {
            show: styles.bool(&["splitLine"], show_split).unwrap_or(true),
            line_style: styles.line_style(&["splitLine"], split_style),
        },
    }
}
