use crate::ir::{LegendLayout, LegendSpec, Orient};
use crate::style::StyleTree;
use serde_json::{json, Map, Value};

/// Fixed legend placements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

impl LegendPosition {
    /// Unknown or missing positions fall back to `Right`
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("top") => LegendPosition::Top,
            Some("bottom") => LegendPosition::Bottom,
            Some("left") => LegendPosition::Left,
            _ => LegendPosition::Right,
        }
    }

    pub fn orient(self) -> Orient {
        match self {
            LegendPosition::Top | LegendPosition::Bottom => Orient::Horizontal,
            LegendPosition::Left | LegendPosition::Right => Orient::Vertical,
        }
    }

    pub fn layout(self) -> LegendLayout {
        match self {
            LegendPosition::Top => LegendLayout {
                top: Some(json!(8)),
                left: Some(json!(8)),
                right: Some(json!(8)),
                height: Some(json!(32)),
                ..Default::default()
            },
            LegendPosition::Bottom => LegendLayout {
                bottom: Some(json!(8)),
                left: Some(json!(8)),
                right: Some(json!(8)),
                height: Some(json!(32)),
                ..Default::default()
            },
            LegendPosition::Left => LegendLayout {
                left: Some(json!(8)),
                top: Some(json!(16)),
                bottom: Some(json!(24)),
                width: Some(json!(96)),
                ..Default::default()
            },
            LegendPosition::Right => LegendLayout {
                right: Some(json!(8)),
                top: Some(json!(16)),
                bottom: Some(json!(24)),
                width: Some(json!(96)),
                ..Default::default()
            },
        }
    }
}

/// Build the legend for the given series names.
///
/// Defaults: shown, `scroll` type, right-hand placement, every series selected.
pub fn build_legend(styles: &StyleTree, series_names: &[String]) -> LegendSpec {
    let group = ["legend"];
    let position = LegendPosition::parse(styles.string(&group, "position"));
    let select_all = styles.bool(&group, "selectAll").unwrap_or(true);

    let selected: Map<String, Value> = series_names
        .iter()
        .map(|name| (name.clone(), Value::Bool(select_all)))
        .collect();

    LegendSpec {
        show: styles.bool(&group, "showLegend").unwrap_or(true),
        kind: styles.string(&group, "type").unwrap_or("scroll").to_string(),
        orient: position.orient(),
        position,
        layout: position.layout(),
        data: series_names.to_vec(),
        selected,
        text_style: styles.font(&group, "font"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_presets() {
        assert_eq!(LegendPosition::parse(Some("top")).orient(), Orient::Horizontal);
        assert_eq!(LegendPosition::parse(Some("BOTTOM")), LegendPosition::Bottom);
        assert_eq!(LegendPosition::parse(Some("left")).orient(), Orient::Vertical);
        assert_eq!(LegendPosition::parse(Some("middle")), LegendPosition::Right);
        assert_eq!(LegendPosition::parse(None), LegendPosition::Right);

        let top = LegendPosition::Top.layout();
        assert_eq!(top.height, Some(json!(32)));
        assert_eq!(top.bottom, None);
        let right = LegendPosition::Right.layout();
        assert_eq!(right.width, Some(json!(96)));
    }

    #[test]
    fn test_legend_selection() {
        let names = vec!["A".to_string(), "B".to_string()];
        let legend = build_legend(&StyleTree::default(), &names);
        assert!(legend.show);
        assert_eq!(legend.kind, "scroll");
        assert_eq!(legend.data, names);
        assert_eq!(legend.selected["A"], json!(true));

        let styles = StyleTree::from_value(json!({
            "legend": {"selectAll": false, "position": "bottom", "type": "plain"}
        }));
        let legend = build_legend(&styles, &names);
        assert_eq!(legend.selected["B"], json!(false));
        assert_eq!(legend.orient, Orient::Horizontal);
        assert_eq!(legend.kind, "plain");
    }

    #[test]
    fn test_legend_serializes_layout_flat() {
        let legend = build_legend(&StyleTree::default(), &[]);
        let value = serde_json::to_value(&legend).unwrap();
        assert_eq!(value["right"], json!(8));
        assert_eq!(value["orient"], json!("vertical"));
        assert_eq!(value["data"], json!([]));
        assert!(value.get("textStyle").is_none());
    }
}
