use crate::data::{cell_as_f64, cell_to_text, Cell};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number format attached to a field binding
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    #[serde(default, rename = "type")]
    pub kind: FormatKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<usize>,
    #[serde(default)]
    pub use_thousand_separator: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Default,
    Numeric,
    Percentage,
    Currency,
    Scientific,
}

impl NumberFormat {
    pub fn numeric(decimal_places: usize) -> Self {
        Self {
            kind: FormatKind::Numeric,
            decimal_places: Some(decimal_places),
            ..Default::default()
        }
    }

    pub fn format(&self, value: f64) -> String {
        let body = match self.kind {
            FormatKind::Default => plain_number(value),
            FormatKind::Numeric => self.fixed(value),
            FormatKind::Percentage => format!("{}%", self.fixed(value * 100.0)),
            FormatKind::Currency => {
                let symbol = if self.prefix.is_some() { "" } else { "$" };
                format!("{}{}", symbol, self.fixed(value))
            }
            FormatKind::Scientific => format!("{:.*e}", self.decimal_places.unwrap_or(2), value),
        };
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or(""),
            body,
            self.suffix.as_deref().unwrap_or("")
        )
    }

    fn fixed(&self, value: f64) -> String {
        let text = match self.decimal_places {
            Some(dp) => format!("{:.*}", dp, value),
            None => plain_number(value),
        };
        if self.use_thousand_separator {
            group_thousands(&text)
        } else {
            text
        }
    }
}

/// Tooltip text of a cell: numbers go through the binding's format, text
/// passes through, null renders as `-`.
pub fn format_cell(cell: &Cell, format: Option<&NumberFormat>) -> String {
    match cell {
        Value::Null => "-".to_string(),
        Value::Number(_) => match (format, cell_as_f64(cell)) {
            (Some(fmt), Some(v)) => fmt.format(v),
            (None, Some(v)) => plain_number(v),
            _ => cell_to_text(cell),
        },
        other => cell_to_text(other),
    }
}

fn plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", text),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(pos) => rest.split_at(pos),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}{}{}", sign, grouped, frac_part)
}
