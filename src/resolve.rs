use crate::channel::Channels;
use crate::config::FieldBinding;
use crate::data::Dataset;
use crate::ir::{ResolvedChannels, ResolvedField};
use anyhow::{Context, Result};

/// Resolve every classified binding against the dataset columns
pub fn resolve_channels(channels: &Channels, dataset: &Dataset) -> Result<ResolvedChannels> {
    Ok(ResolvedChannels {
        group: resolve_fields(&channels.group, dataset)?,
        aggregate: resolve_fields(&channels.aggregate, dataset)?,
        size: resolve_fields(&channels.size, dataset)?,
        color: resolve_fields(&channels.color, dataset)?,
        info: resolve_fields(&channels.info, dataset)?,
    })
}

fn resolve_fields(bindings: &[FieldBinding], dataset: &Dataset) -> Result<Vec<ResolvedField>> {
    bindings
        .iter()
        .map(|binding| resolve_field(binding, dataset))
        .collect()
}

/// Resolve a single binding: its key must match exactly one dataset column
pub fn resolve_field(binding: &FieldBinding, dataset: &Dataset) -> Result<ResolvedField> {
    let key = binding.column_key();
    let idx = dataset
        .resolve_column(&key)
        .with_context(|| format!("Cannot bind field '{}'", binding.display_name()))?;

    Ok(ResolvedField {
        binding: binding.clone(),
        column: dataset.columns()[idx].name.clone(),
        display_name: binding.display_name(),
    })
}
