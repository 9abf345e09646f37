// Pipeline executor: dataset + chart configuration -> chart options

use crate::channel::{ChannelRequirement, Channels};
use crate::compiler;
use crate::config::ChartConfig;
use crate::data::{self, Dataset, PassThrough, RowContextExtractor};
use crate::ir::ChartOptions;
use crate::resolve;
use crate::transform;
use anyhow::{Context, Result};

/// Build the chart options for a dataset and configuration.
///
/// Returns `Ok(None)` when the configuration does not satisfy the chart's
/// channel requirement; the caller is expected to clear its output.
pub fn build_chart_options(
    dataset: &Dataset,
    config: &ChartConfig,
    requirement: &ChannelRequirement,
) -> Result<Option<ChartOptions>> {
    build_chart_options_with(dataset, config, requirement, &PassThrough)
}

/// Same as [`build_chart_options`], with a custom row context extractor
pub fn build_chart_options_with(
    dataset: &Dataset,
    config: &ChartConfig,
    requirement: &ChannelRequirement,
    extractor: &dyn RowContextExtractor,
) -> Result<Option<ChartOptions>> {
    // 1. Classify and gate
    let channels = Channels::classify(&config.datas);
    if let Some((kind, count)) = requirement.first_violation(&channels) {
        log::debug!(
            "channel requirement not met ({:?} has {} bindings), nothing to render",
            kind,
            count
        );
        return Ok(None);
    }

    // 2. Resolve bindings against the dataset columns
    let resolved = resolve::resolve_channels(&channels, dataset)
        .context("Failed to resolve chart bindings")?;

    // 3. Project rows and build series
    let rows = data::project_rows(dataset);
    let series = transform::build_series(&rows, &resolved, &config.styles, extractor);
    log::debug!(
        "built {} series from {} rows",
        series.len(),
        rows.len()
    );

    // 4. Compile to options
    Ok(Some(compiler::compile_options(&series, &resolved, &config.styles)))
}
