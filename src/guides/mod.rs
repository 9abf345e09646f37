// Guide builders: pure functions from style lookups (and series names) to
// the declarative axis, legend, label, grid and tooltip parts of the options

pub mod axis;
pub mod grid;
pub mod label;
pub mod legend;
pub mod tooltip;

pub use axis::{build_axis, AxisOrientation};
pub use grid::build_grid;
pub use label::{build_label, build_label_layout};
pub use legend::{build_legend, LegendPosition};
pub use tooltip::{HoverPoint, TooltipFormatter};
