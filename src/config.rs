// Chart configuration as produced by the chart editor

use crate::channel::ChannelKind;
use crate::format::NumberFormat;
use crate::style::StyleTree;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete chart configuration: channel-grouped field bindings plus styles
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default)]
    pub datas: Vec<DataSection>,
    #[serde(default)]
    pub styles: StyleTree,
}

impl ChartConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("Failed to parse chart configuration")
    }
}

/// One editor section (e.g. "metrics") holding bindings of a single channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSection {
    #[serde(default)]
    pub key: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(default)]
    pub rows: Vec<FieldBinding>,
}

impl DataSection {
    pub fn new(kind: ChannelKind, rows: Vec<FieldBinding>) -> Self {
        Self {
            key: String::new(),
            kind,
            rows,
        }
    }
}

/// A dataset column assigned to a channel, plus per-channel metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldBinding {
    pub col_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<Alias>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<NumberFormat>,
}

impl FieldBinding {
    pub fn new(col_name: impl Into<String>) -> Self {
        Self {
            col_name: col_name.into(),
            ..Default::default()
        }
    }

    pub fn with_aggregate(mut self, aggregate: AggregateKind) -> Self {
        self.aggregate = Some(aggregate);
        self
    }

    pub fn with_alias(mut self, name: impl Into<String>) -> Self {
        self.alias = Some(Alias { name: name.into() });
        self
    }

    pub fn with_palette<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.color = Some(ColorConfig {
            colors: entries
                .into_iter()
                .map(|(key, value)| ColorEntry {
                    key: key.into(),
                    value: value.into(),
                })
                .collect(),
        });
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Key of the dataset column this binding reads: `SUM(col)` when aggregated.
    pub fn column_key(&self) -> String {
        match &self.aggregate {
            Some(agg) => format!("{}({})", agg, self.col_name),
            None => self.col_name.clone(),
        }
    }

    /// Name shown to the user: the alias if set, otherwise the column key.
    pub fn display_name(&self) -> String {
        match &self.alias {
            Some(alias) if !alias.name.is_empty() => alias.name.clone(),
            _ => self.column_key(),
        }
    }

    /// Palette color configured for a color-channel key, if any.
    pub fn palette_color(&self, key: &str) -> Option<&str> {
        self.color
            .as_ref()?
            .colors
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregateKind {
    Sum,
    Avg,
    Count,
    CountDistinct,
    Max,
    Min,
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AggregateKind::Sum => "SUM",
            AggregateKind::Avg => "AVG",
            AggregateKind::Count => "COUNT",
            AggregateKind::CountDistinct => "COUNT_DISTINCT",
            AggregateKind::Max => "MAX",
            AggregateKind::Min => "MIN",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alias {
    #[serde(default)]
    pub name: String,
}

/// Key -> color palette of a color-channel binding
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorConfig {
    #[serde(default)]
    pub colors: Vec<ColorEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorEntry {
    pub key: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = ChartConfig::from_json_str(
            r##"{
                "datas": [
                    {"key": "dimension", "type": "group", "rows": [{"colName": "category"}]},
                    {"key": "metrics", "type": "aggregate",
                     "rows": [{"colName": "value", "aggregate": "SUM", "alias": {"name": "Total"}}]},
                    {"key": "filter", "type": "filter", "rows": [{"colName": "region"}]},
                    {"key": "color", "type": "color",
                     "rows": [{"colName": "category", "color": {"colors": [{"key": "A", "value": "#f00"}]}}]}
                ],
                "styles": {"scatter": {"cycleRatio": 12}}
            }"##,
        )
        .unwrap();

        assert_eq!(config.datas.len(), 4);
        assert_eq!(config.datas[0].kind, ChannelKind::Group);
        assert_eq!(config.datas[2].kind, ChannelKind::Other);
        let metric = &config.datas[1].rows[0];
        assert_eq!(metric.column_key(), "SUM(value)");
        assert_eq!(metric.display_name(), "Total");
        assert_eq!(config.datas[3].rows[0].palette_color("A"), Some("#f00"));
        assert_eq!(config.datas[3].rows[0].palette_color("B"), None);
    }

    #[test]
    fn test_missing_sections_default() {
        let config = ChartConfig::from_json_str("{}").unwrap();
        assert!(config.datas.is_empty());
    }

    #[test]
    fn test_display_name_falls_back_to_key() {
        let binding = FieldBinding::new("amount").with_aggregate(AggregateKind::CountDistinct);
        assert_eq!(binding.display_name(), "COUNT_DISTINCT(amount)");
        assert_eq!(FieldBinding::new("amount").with_alias("").display_name(), "amount");
    }
}
