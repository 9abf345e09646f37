use crate::format::{format_cell, NumberFormat};
use crate::ir::{PointRecord, ResolvedChannels, ResolvedField};
use serde::Deserialize;
use serde_json::Value;

/// Separator between tooltip lines
pub const TOOLTIP_LINE_BREAK: &str = "<br />";

/// Where a tooltip field's value sits in a point's value record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueSlot {
    Aggregate(usize),
    Info(usize),
    Size,
    ColorKey,
}

#[derive(Debug, Clone, PartialEq)]
struct TooltipField {
    label: String,
    slot: ValueSlot,
    format: Option<NumberFormat>,
}

/// A hovered point as reported by the surface
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct HoverPoint {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Vec<Value>,
}

impl From<&PointRecord> for HoverPoint {
    fn from(point: &PointRecord) -> Self {
        HoverPoint {
            name: point.name.clone(),
            value: point.value.to_positional(),
        }
    }
}

/// Tooltip text builder, bound to one channel layout.
///
/// It decodes the positional value list `[aggregates.., infos.., size,
/// color_key?]` by slot, so each number lands next to the right field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TooltipFormatter {
    group_title: Option<String>,
    fields: Vec<TooltipField>,
    aggregate_count: usize,
    info_count: usize,
}

impl TooltipFormatter {
    pub fn new(channels: &ResolvedChannels) -> Self {
        let group_title = if channels.group.is_empty() {
            None
        } else {
            Some(channels.group_label())
        };

        let field = |f: &ResolvedField, slot: ValueSlot| TooltipField {
            label: f.display_name.clone(),
            slot,
            format: f.format().cloned(),
        };

        let mut fields = Vec::new();
        fields.extend(
            channels
                .aggregate
                .iter()
                .enumerate()
                .map(|(i, f)| field(f, ValueSlot::Aggregate(i))),
        );
        fields.extend(
            channels
                .info
                .iter()
                .enumerate()
                .map(|(i, f)| field(f, ValueSlot::Info(i))),
        );
        // only the first size and color bindings carry a value
        if let Some(f) = channels.size.first() {
            fields.push(field(f, ValueSlot::Size));
        }
        if let Some(f) = channels.color.first() {
            fields.push(field(f, ValueSlot::ColorKey));
        }

        Self {
            group_title,
            fields,
            aggregate_count: channels.aggregate.len(),
            info_count: channels.info.len(),
        }
    }

    fn position(&self, slot: ValueSlot) -> usize {
        match slot {
            ValueSlot::Aggregate(i) => i,
            ValueSlot::Info(i) => self.aggregate_count + i,
            ValueSlot::Size => self.aggregate_count + self.info_count,
            ValueSlot::ColorKey => self.aggregate_count + self.info_count + 1,
        }
    }

    /// Text for one hover event; several points are separated by a line break.
    pub fn format(&self, points: &[HoverPoint]) -> String {
        points
            .iter()
            .map(|p| self.lines(p).join(TOOLTIP_LINE_BREAK))
            .collect::<Vec<_>>()
            .join(TOOLTIP_LINE_BREAK)
    }

    pub fn format_point(&self, point: &PointRecord) -> String {
        self.format(&[HoverPoint::from(point)])
    }

    fn lines(&self, point: &HoverPoint) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.fields.len() + 1);
        if let Some(title) = &self.group_title {
            lines.push(format!("{}: {}", title, point.name));
        }
        for field in &self.fields {
            let cell = point
                .value
                .get(self.position(field.slot))
                .cloned()
                .unwrap_or(Value::Null);
            lines.push(format!("{}: {}", field.label, format_cell(&cell, field.format.as_ref())));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldBinding;
    use serde_json::json;

    fn field(name: &str) -> ResolvedField {
        ResolvedField {
            binding: FieldBinding::new(name),
            column: name.to_string(),
            display_name: name.to_string(),
        }
    }

    fn make_channels() -> ResolvedChannels {
        ResolvedChannels {
            aggregate: vec![field("sales")],
            info: vec![field("region")],
            size: vec![field("volume")],
            color: vec![field("category")],
            ..Default::default()
        }
    }

    #[test]
    fn test_positional_decoding() {
        let formatter = TooltipFormatter::new(&make_channels());
        let text = formatter.format(&[HoverPoint {
            name: String::new(),
            value: vec![json!(42), json!("north"), json!(17), json!("A")],
        }]);
        let lines: Vec<&str> = text.split(TOOLTIP_LINE_BREAK).collect();
        assert_eq!(lines, vec!["sales: 42", "region: north", "volume: 17", "category: A"]);
    }

    #[test]
    fn test_group_title_line() {
        let mut channels = make_channels();
        channels.group = vec![field("city"), field("store")];
        let formatter = TooltipFormatter::new(&channels);
        let text = formatter.format(&[HoverPoint {
            name: "Paris-North".to_string(),
            value: vec![json!(1), json!("x"), json!(2), json!("A")],
        }]);
        assert!(text.starts_with("city-store: Paris-North"));
    }

    #[test]
    fn test_missing_positions_render_dash() {
        let formatter = TooltipFormatter::new(&make_channels());
        let text = formatter.format(&[HoverPoint {
            name: String::new(),
            value: vec![json!(1)],
        }]);
        assert!(text.contains("region: -"));
    }

    #[test]
    fn test_binding_format_applies() {
        let mut channels = make_channels();
        channels.aggregate[0].binding = FieldBinding::new("sales").with_format(NumberFormat::numeric(2));
        let formatter = TooltipFormatter::new(&channels);
        let text = formatter.format(&[HoverPoint {
            name: String::new(),
            value: vec![json!(3), json!("n"), json!(1), json!("A")],
        }]);
        assert!(text.starts_with("sales: 3.00"));
    }

    #[test]
    fn test_hover_point_from_payload() {
        let hover: HoverPoint =
            serde_json::from_value(json!({"name": "A", "value": [1, 2], "seriesName": "s"})).unwrap();
        assert_eq!(hover.name, "A");
        assert_eq!(hover.value.len(), 2);
    }
}
