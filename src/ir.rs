use crate::config::FieldBinding;
use crate::format::NumberFormat;
use crate::guides::legend::LegendPosition;
use crate::guides::tooltip::TooltipFormatter;
use crate::style::{FontStyle, LineStyle};
use serde::Serialize;
use serde_json::{Map, Number, Value};

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// A binding whose key has been matched against exactly one dataset column
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub binding: FieldBinding,
    /// Dataset column name the binding reads from
    pub column: String,
    pub display_name: String,
}

impl ResolvedField {
    pub fn format(&self) -> Option<&NumberFormat> {
        self.binding.format.as_ref()
    }
}

/// Channels with every binding resolved against the dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedChannels {
    pub group: Vec<ResolvedField>,
    pub aggregate: Vec<ResolvedField>,
    pub size: Vec<ResolvedField>,
    pub color: Vec<ResolvedField>,
    pub info: Vec<ResolvedField>,
}

impl ResolvedChannels {
    /// Group-field display names joined with `-`
    pub fn group_label(&self) -> String {
        self.group
            .iter()
            .map(|f| f.display_name.as_str())
            .collect::<Vec<_>>()
            .join("-")
    }
}

// =============================================================================
// Phase 2: Transformation
// =============================================================================

/// Values of one point, by channel
#[derive(Debug, Clone, PartialEq)]
pub struct PointValue {
    pub aggregates: Vec<Value>,
    pub infos: Vec<Value>,
    /// Resolved size value (row cell or the scale's default)
    pub size: f64,
    /// Series key when the points are color-grouped
    pub color_key: Option<Value>,
}

impl PointValue {
    /// Positional layout handed to the plotting library:
    /// `[aggregates.., infos.., size, color_key?]`
    pub fn to_positional(&self) -> Vec<Value> {
        let mut out = Vec::with_capacity(self.aggregates.len() + self.infos.len() + 2);
        out.extend(self.aggregates.iter().cloned());
        out.extend(self.infos.iter().cloned());
        out.push(Number::from_f64(self.size).map_or(Value::Null, Value::Number));
        if let Some(key) = &self.color_key {
            out.push(key.clone());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Group-field values joined with `-`
    pub name: String,
    pub value: PointValue,
    pub symbol_size: f64,
    /// Opaque drill-down payload; never part of the geometry
    pub row_context: Value,
}

/// One renderable group of points
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesData {
    pub name: String,
    pub color: Option<String>,
    pub points: Vec<PointRecord>,
}

// =============================================================================
// Phase 3: Render spec (option object of the plotting library)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub tooltip: TooltipSpec,
    pub legend: LegendSpec,
    pub grid: GridSpec,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<SeriesSpec>,
}

impl ChartOptions {
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipSpec {
    pub trigger: &'static str,
    /// Invoked by the surface on hover; not part of the serialized options
    #[serde(skip)]
    pub formatter: TooltipFormatter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSpec {
    pub show: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub orient: Orient,
    /// Preset the layout was derived from
    #[serde(skip)]
    pub position: LegendPosition,
    #[serde(flatten)]
    pub layout: LegendLayout,
    pub data: Vec<String>,
    pub selected: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_style: Option<FontStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orient {
    Horizontal,
    Vertical,
}

/// Margin and anchor rectangle of a legend preset
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LegendLayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSpec {
    pub contain_label: bool,
    pub left: Value,
    pub right: Value,
    pub top: Value,
    pub bottom: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisSpec {
    /// Both axes are value axes reading the point's positional value
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub show: bool,
    pub inverse: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub axis_line: LineToggle,
    pub axis_label: AxisLabelSpec,
    pub split_line: LineToggle,
}

/// A show flag plus optional line style (axis line, split line)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineToggle {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabelSpec {
    pub show: bool,
    #[serde(flatten)]
    pub font: Option<FontStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSpec {
    pub show: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Always the point name
    pub formatter: &'static str,
    #[serde(flatten)]
    pub font: Option<FontStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub hide_overlap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSpec {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub symbol: &'static str,
    pub item_style: ItemStyle,
    pub label: LabelSpec,
    pub label_layout: LabelLayout,
    pub data: Vec<PointSpec>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One data item of a series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointSpec {
    pub name: String,
    pub value: Vec<Value>,
    pub symbol_size: f64,
    pub row_data: Value,
}

impl From<&PointRecord> for PointSpec {
    fn from(point: &PointRecord) -> Self {
        PointSpec {
            name: point.name.clone(),
            value: point.value.to_positional(),
            symbol_size: point.symbol_size,
            row_data: point.row_context.clone(),
        }
    }
}
