use crate::ir::{LabelLayout, LabelSpec};
use crate::style::StyleTree;

/// Template rendering a point's name
pub const NAME_TEMPLATE: &str = "{b}";

/// Point labels: hidden unless `label.showLabel` is set, placed on top by default.
pub fn build_label(styles: &StyleTree) -> LabelSpec {
    let group = ["label"];
    LabelSpec {
        show: styles.bool(&group, "showLabel").unwrap_or(false),
        position: Some(styles.string(&group, "position").unwrap_or("top").to_string()),
        formatter: NAME_TEMPLATE,
        font: styles.font(&group, "font"),
    }
}

/// Overlapping labels are hidden, never jittered.
pub fn build_label_layout() -> LabelLayout {
    LabelLayout { hide_overlap: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_defaults() {
        let label = build_label(&StyleTree::default());
        assert!(!label.show);
        assert_eq!(label.position.as_deref(), Some("top"));
        assert_eq!(label.formatter, "{b}");
    }

    #[test]
    fn test_label_styles() {
        let styles = StyleTree::from_value(json!({
            "label": {"showLabel": true, "position": "inside", "font": {"color": "#fff", "fontSize": 11}}
        }));
        let label = build_label(&styles);
        assert!(label.show);
        assert_eq!(label.position.as_deref(), Some("inside"));

        let value = serde_json::to_value(&label).unwrap();
        assert_eq!(value["color"], json!("#fff"));
        assert_eq!(value["fontSize"], json!(11.0));
    }
}
