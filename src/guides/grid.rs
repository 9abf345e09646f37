use crate::ir::GridSpec;
use crate::style::StyleTree;
use serde_json::{json, Value};

/// Plot area margins from the `margin` style group
pub fn build_grid(styles: &StyleTree) -> GridSpec {
    let group = ["margin"];
    let side = |key: &str, default: &str| -> Value {
        styles.dimension(&group, key).unwrap_or_else(|| json!(default))
    };

    GridSpec {
        contain_label: styles.bool(&group, "containLabel").unwrap_or(true),
        left: side("left", "5%"),
        right: side("right", "5%"),
        top: side("top", "15%"),
        bottom: side("bottom", "5%"),
    }
}
