//! Channel classification.
//!
//! Every field binding plays exactly one semantic role (channel). The editor
//! groups bindings into sections; classification flattens the sections into
//! one ordered list per channel and checks the chart's requirement.

use crate::config::{DataSection, FieldBinding};
use serde::{Deserialize, Serialize};

/// Semantic role of a bound field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Group,
    Aggregate,
    Size,
    Color,
    Info,
    /// Sections this chart does not plot (filters and the like)
    #[serde(other)]
    Other,
}

/// Bindings classified by channel, declaration order preserved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Channels {
    pub group: Vec<FieldBinding>,
    pub aggregate: Vec<FieldBinding>,
    pub size: Vec<FieldBinding>,
    pub color: Vec<FieldBinding>,
    pub info: Vec<FieldBinding>,
}

impl Channels {
    pub fn classify(sections: &[DataSection]) -> Self {
        let mut channels = Channels::default();
        for section in sections {
            let target = match section.kind {
                ChannelKind::Group => &mut channels.group,
                ChannelKind::Aggregate => &mut channels.aggregate,
                ChannelKind::Size => &mut channels.size,
                ChannelKind::Color => &mut channels.color,
                ChannelKind::Info => &mut channels.info,
                ChannelKind::Other => continue,
            };
            target.extend(section.rows.iter().cloned());
        }
        channels
    }

    pub fn of(&self, kind: ChannelKind) -> &[FieldBinding] {
        match kind {
            ChannelKind::Group => &self.group,
            ChannelKind::Aggregate => &self.aggregate,
            ChannelKind::Size => &self.size,
            ChannelKind::Color => &self.color,
            ChannelKind::Info => &self.info,
            ChannelKind::Other => &[],
        }
    }
}

/// Allowed number of bindings for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelRange {
    pub min: usize,
    pub max: Option<usize>,
}

impl ChannelRange {
    pub fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    pub fn between(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

/// What a chart kind needs before it can render anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequirement {
    ranges: Vec<(ChannelKind, ChannelRange)>,
}

impl ChannelRequirement {
    pub fn new(ranges: Vec<(ChannelKind, ChannelRange)>) -> Self {
        Self { ranges }
    }

    /// Scatter charts need at least one aggregate; everything else is optional.
    pub fn scatter() -> Self {
        Self::new(vec![(ChannelKind::Aggregate, ChannelRange::at_least(1))])
    }

    /// First channel whose binding count falls outside its range.
    pub fn first_violation(&self, channels: &Channels) -> Option<(ChannelKind, usize)> {
        self.ranges.iter().find_map(|(kind, range)| {
            let count = channels.of(*kind).len();
            (!range.contains(count)).then_some((*kind, count))
        })
    }

    pub fn is_satisfied_by(&self, channels: &Channels) -> bool {
        self.first_violation(channels).is_none()
    }
}

impl Default for ChannelRequirement {
    fn default() -> Self {
        Self::scatter()
    }
}
