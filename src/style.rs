//! Style Lookup
//!
//! Resolves named style values out of the nested style tree the chart editor
//! produces. The tree maps a group name to a map of keys; a value is either a
//! primitive, a style object (font, line style) or another group.
//!
//! ```text
//! styles
//! ├── scatter       { cycleRatio }
//! ├── label         { showLabel, position, font }
//! ├── legend        { showLegend, type, position, selectAll, font }
//! ├── xAxis / yAxis { showAxis, inverseAxis, lineStyle, showLabel, font, ... }
//! ├── splitLine     { showHorizonLine, horizonLineStyle, showVerticalLine, verticalLineStyle }
//! └── margin        { containLabel, left, right, top, bottom }
//! ```
//!
//! Lookups never fail: an absent group or key yields `None`, which callers
//! turn into "use the plotting library's default".

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested group -> key -> value style configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleTree {
    groups: Map<String, Value>,
}

impl StyleTree {
    pub fn new(groups: Map<String, Value>) -> Self {
        Self { groups }
    }

    /// Build a tree from a JSON object; any other JSON value yields an empty tree.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(groups) => Self { groups },
            _ => Self::default(),
        }
    }

    /// Find a (possibly nested) group, e.g. `["splitLine", "splitLineX"]`.
    pub fn group(&self, path: &[&str]) -> Option<&Map<String, Value>> {
        let (first, rest) = path.split_first()?;
        let mut current = self.groups.get(*first)?.as_object()?;
        for segment in rest {
            current = current.get(*segment)?.as_object()?;
        }
        Some(current)
    }

    pub fn get(&self, path: &[&str], key: &str) -> Option<&Value> {
        self.group(path)?.get(key).filter(|v| !v.is_null())
    }

    /// Resolve several (group path, key) pairs at once; the result is
    /// positionally aligned with `queries`.
    pub fn lookup<'a>(&'a self, queries: &[(&[&str], &str)]) -> Vec<Option<&'a Value>> {
        queries
            .iter()
            .map(|(path, key)| self.get(path, key))
            .collect()
    }

    pub fn bool(&self, path: &[&str], key: &str) -> Option<bool> {
        self.get(path, key)?.as_bool()
    }

    /// Numeric value; numeric strings (as emitted by text inputs) are accepted.
    pub fn number(&self, path: &[&str], key: &str) -> Option<f64> {
        let number = match self.get(path, key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|f| f.is_finite())
    }

    pub fn string(&self, path: &[&str], key: &str) -> Option<&str> {
        self.get(path, key)?.as_str()
    }

    /// Raw value for keys that accept both numbers and strings (`"5%"`, `12`).
    pub fn dimension(&self, path: &[&str], key: &str) -> Option<Value> {
        match self.get(path, key)? {
            v @ (Value::Number(_) | Value::String(_)) => Some(v.clone()),
            _ => None,
        }
    }

    pub fn font(&self, path: &[&str], key: &str) -> Option<FontStyle> {
        self.object(path, key)
    }

    pub fn line_style(&self, path: &[&str], key: &str) -> Option<LineStyle> {
        self.object(path, key)
    }

    fn object<T: DeserializeOwned>(&self, path: &[&str], key: &str) -> Option<T> {
        let value = self.get(path, key)?;
        if !value.is_object() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                log::debug!("ignoring malformed style {}.{}: {}", path.join("."), key, err);
                None
            }
        }
    }
}

/// Font settings; serialized with the plotting library's text-style keys
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Line settings (axis lines, split lines)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// solid / dashed / dotted
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_styles() -> StyleTree {
        StyleTree::from_value(json!({
            "scatter": {"cycleRatio": 12},
            "legend": {"showLegend": true, "position": "top", "font": {"fontSize": 14, "color": "#333"}},
            "splitLine": {
                "showVerticalLine": false,
                "splitLineX": {"lineStyle": {"color": "#ccc", "width": 1, "type": "dashed"}}
            },
            "margin": {"left": "5%", "top": 40, "containLabel": null},
            "xAxis": {"min": "10", "max": "abc", "font": "bold"}
        }))
    }

    #[test]
    fn test_get_primitives() {
        let styles = make_styles();
        assert_eq!(styles.number(&["scatter"], "cycleRatio"), Some(12.0));
        assert_eq!(styles.bool(&["legend"], "showLegend"), Some(true));
        assert_eq!(styles.string(&["legend"], "position"), Some("top"));
        assert_eq!(styles.number(&["xAxis"], "min"), Some(10.0));
        assert_eq!(styles.number(&["xAxis"], "max"), None);
    }

    #[test]
    fn test_missing_resolves_to_none() {
        let styles = make_styles();
        assert_eq!(styles.get(&["nope"], "x"), None);
        assert_eq!(styles.get(&["legend"], "nope"), None);
        assert_eq!(styles.get(&[], "x"), None);
        // explicit null counts as missing
        assert_eq!(styles.get(&["margin"], "containLabel"), None);
        assert_eq!(StyleTree::default().bool(&["legend"], "showLegend"), None);
    }

    #[test]
    fn test_nested_group_addressing() {
        let styles = make_styles();
        let line = styles.line_style(&["splitLine", "splitLineX"], "lineStyle").unwrap();
        assert_eq!(line.color.as_deref(), Some("#ccc"));
        assert_eq!(line.kind.as_deref(), Some("dashed"));
        assert_eq!(styles.bool(&["splitLine"], "showVerticalLine"), Some(false));
    }

    #[test]
    fn test_lookup_is_positional() {
        let styles = make_styles();
        let legend: &[&str] = &["legend"];
        let scatter: &[&str] = &["scatter"];
        let values = styles.lookup(&[
            (legend, "position"),
            (legend, "missing"),
            (scatter, "cycleRatio"),
        ]);
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], Some(&json!("top")));
        assert_eq!(values[1], None);
        assert_eq!(values[2], Some(&json!(12)));
    }

    #[test]
    fn test_font_and_malformed_objects() {
        let styles = make_styles();
        let font = styles.font(&["legend"], "font").unwrap();
        assert_eq!(font.font_size, Some(14.0));
        assert_eq!(font.color.as_deref(), Some("#333"));
        assert_eq!(styles.font(&["xAxis"], "font"), None);
    }

    #[test]
    fn test_dimension_values() {
        let styles = make_styles();
        assert_eq!(styles.dimension(&["margin"], "left"), Some(json!("5%")));
        assert_eq!(styles.dimension(&["margin"], "top"), Some(json!(40)));
        assert_eq!(styles.dimension(&["margin"], "right"), None);
    }
}
