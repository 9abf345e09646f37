// Library exports for scatterspec

pub mod channel;
pub mod color;
pub mod config;
pub mod data;
pub mod format;
pub mod graph;
pub mod lifecycle;
pub mod style;

// Pipeline
pub mod ir;
pub mod resolve;
pub mod transform;
pub mod scale;
pub mod compiler;
pub mod guides;
pub mod runtime;

use serde::Deserialize;

pub use channel::{ChannelKind, ChannelRequirement};
pub use config::ChartConfig;
pub use data::Dataset;
pub use ir::ChartOptions;
pub use lifecycle::ScatterChart;
pub use runtime::build_chart_options;

#[derive(Debug, Clone, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}
