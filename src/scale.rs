use crate::data::{cell_as_f64, ProjectedRow};
use crate::style::StyleTree;

/// Smallest symbol size (px) a point can get
pub const MIN_SYMBOL_SIZE: f64 = 4.0;
/// Largest symbol size (px) a point can get
pub const MAX_SYMBOL_SIZE: f64 = 80.0;
/// Growth (px) from the smallest to the largest size value when `scatter.cycleRatio` is unset
pub const DEFAULT_CYCLE_RATIO: f64 = 30.0;

/// Shared (min, max) of the size channel across the whole dataset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    pub min: f64,
    pub max: f64,
}

impl SizeScale {
    /// Scan all rows for `column`. Non-numeric cells are skipped; `None`
    /// when no row carries a number.
    pub fn from_rows(rows: &[ProjectedRow], column: &str) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for row in rows {
            if let Some(v) = row.get(column).and_then(cell_as_f64) {
                if v < min { min = v; }
                if v > max { max = v; }
            }
        }

        if min == f64::INFINITY {
            None
        } else {
            Some(SizeScale { min, max })
        }
    }

    /// Size value used for rows whose size cell is absent or falsy
    pub fn default_value(&self) -> f64 {
        (self.max - self.min) / 2.0
    }

    fn is_degenerate(&self) -> bool {
        let span = self.max - self.min;
        !(span.is_finite() && span > 0.0)
    }

    /// Position of `value` inside the scale, clamped to [0, 1]. `None` when min == max.
    pub fn normalize(&self, value: f64) -> Option<f64> {
        if self.is_degenerate() || !value.is_finite() {
            return None;
        }
        Some(((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0))
    }
}

/// Maps size values to symbol sizes in `[MIN_SYMBOL_SIZE, MAX_SYMBOL_SIZE]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolSizer {
    scale: Option<SizeScale>,
    cycle_ratio: f64,
}

impl SymbolSizer {
    pub fn new(scale: Option<SizeScale>, cycle_ratio: f64) -> Self {
        let cycle_ratio = if cycle_ratio.is_finite() { cycle_ratio.max(0.0) } else { DEFAULT_CYCLE_RATIO };
        Self { scale, cycle_ratio }
    }

    pub fn from_styles(scale: Option<SizeScale>, styles: &StyleTree) -> Self {
        let ratio = styles
            .number(&["scatter"], "cycleRatio")
            .unwrap_or(DEFAULT_CYCLE_RATIO);
        Self::new(scale, ratio)
    }

    pub fn scale(&self) -> Option<SizeScale> {
        self.scale
    }

    /// Size used when there is no spread to normalize against
    pub fn flat_size(&self) -> f64 {
        self.grow(0.5)
    }

    pub fn size(&self, value: f64) -> f64 {
        match self.scale.and_then(|s| s.normalize(value)) {
            Some(t) => self.grow(t),
            None => self.flat_size(),
        }
    }

    fn grow(&self, t: f64) -> f64 {
        (MIN_SYMBOL_SIZE + t * self.cycle_ratio).clamp(MIN_SYMBOL_SIZE, MAX_SYMBOL_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{project_rows, Column, Dataset};
    use serde_json::json;

    fn rows(sizes: Vec<serde_json::Value>) -> Vec<ProjectedRow> {
        let data = Dataset::new(
            vec![Column::new("size")],
            sizes.into_iter().map(|s| vec![s]).collect(),
        )
        .unwrap();
        project_rows(&data)
    }

    #[test]
    fn test_scale_from_rows() {
        let scale = SizeScale::from_rows(&rows(vec![json!(15), json!(5), json!("x"), json!(25)]), "size").unwrap();
        assert_eq!(scale, SizeScale { min: 5.0, max: 25.0 });
        assert_eq!(scale.default_value(), 10.0);
    }

    #[test]
    fn test_scale_empty() {
        assert!(SizeScale::from_rows(&rows(vec![]), "size").is_none());
        assert!(SizeScale::from_rows(&rows(vec![json!(null)]), "size").is_none());
    }

    #[test]
    fn test_size_is_monotonic_and_bounded() {
        let sizer = SymbolSizer::new(Some(SizeScale { min: 5.0, max: 25.0 }), 30.0);
        let mut last = 0.0;
        for v in [0.0, 5.0, 10.0, 17.5, 25.0, 100.0] {
            let s = sizer.size(v);
            assert!(s >= last);
            assert!((MIN_SYMBOL_SIZE..=MAX_SYMBOL_SIZE).contains(&s));
            last = s;
        }
        assert_eq!(sizer.size(5.0), MIN_SYMBOL_SIZE);
        assert_eq!(sizer.size(25.0), MIN_SYMBOL_SIZE + 30.0);
    }

    #[test]
    fn test_degenerate_scale_uses_flat_size() {
        let sizer = SymbolSizer::new(Some(SizeScale { min: 7.0, max: 7.0 }), 30.0);
        let s = sizer.size(7.0);
        assert!(s.is_finite());
        assert_eq!(s, sizer.flat_size());
        assert_eq!(SymbolSizer::new(None, 30.0).size(3.0), sizer.flat_size());
    }

    #[test]
    fn test_huge_ratio_is_clamped() {
        let sizer = SymbolSizer::new(Some(SizeScale { min: 0.0, max: 1.0 }), 1e9);
        assert_eq!(sizer.size(1.0), MAX_SYMBOL_SIZE);
        let negative = SymbolSizer::new(Some(SizeScale { min: 0.0, max: 1.0 }), -5.0);
        assert_eq!(negative.size(1.0), MIN_SYMBOL_SIZE);
    }

    #[test]
    fn test_cycle_ratio_from_styles() {
        let styles = StyleTree::from_value(json!({"scatter": {"cycleRatio": 10}}));
        let sizer = SymbolSizer::from_styles(Some(SizeScale { min: 0.0, max: 1.0 }), &styles);
        assert_eq!(sizer.size(1.0), MIN_SYMBOL_SIZE + 10.0);
    }
}
