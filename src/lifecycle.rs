//! Host-facing lifecycle of a scatter chart.
//!
//! A chart moves `Unmounted -> Mounted -> (updated)* -> Disposed`. The host
//! drives it through the capability traits below; every call after
//! disposal is a no-op.

use crate::channel::ChannelRequirement;
use crate::config::ChartConfig;
use crate::data::{Dataset, PassThrough, RowContextExtractor};
use crate::ir::ChartOptions;
use crate::runtime;
use anyhow::{Context, Result};
use serde_json::Value;
use std::rc::Rc;

/// Interaction callback, invoked with the surface's event payload
pub type EventHandler = Rc<dyn Fn(&Value)>;

/// Size hints forwarded on resize; `None` keeps the current extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeHints {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Host context: interaction callbacks keyed by event name
#[derive(Clone, Default)]
pub struct ChartContext {
    pub events: Vec<(String, EventHandler)>,
}

impl ChartContext {
    pub fn on(mut self, event: impl Into<String>, handler: impl Fn(&Value) + 'static) -> Self {
        self.events.push((event.into(), Rc::new(handler)));
        self
    }
}

/// A drawing surface owned by the chart (the plotting library instance)
pub trait RenderSurface {
    /// Replace the rendered options wholesale
    fn set_option(&mut self, options: &ChartOptions) -> Result<()>;
    fn clear(&mut self);
    fn resize(&mut self, hints: &SizeHints) -> Result<()>;
    fn on(&mut self, event: &str, handler: EventHandler);
    fn dispose(&mut self);
}

/// Something a surface can be created in
pub trait Container {
    type Surface: RenderSurface;

    fn init_surface(&mut self, context: &ChartContext) -> Result<Self::Surface>;
}

/// Inputs of one update. Either may be missing while the host is loading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartProps<'a> {
    pub dataset: Option<&'a Dataset>,
    pub config: Option<&'a ChartConfig>,
}

pub trait Mountable<C: Container> {
    fn mount(&mut self, container: Option<&mut C>, context: &ChartContext) -> Result<()>;
}

pub trait Updatable {
    fn update(&mut self, props: ChartProps<'_>) -> Result<()>;
}

pub trait Resizable {
    fn resize(&mut self, hints: &SizeHints, context: &ChartContext) -> Result<()>;
}

pub trait Disposable {
    fn unmount(&mut self);
}

enum State<S> {
    Unmounted,
    Mounted(S),
    Disposed,
}

/// Scatter chart bound to one render surface
pub struct ScatterChart<S: RenderSurface> {
    state: State<S>,
    requirement: ChannelRequirement,
    extractor: Box<dyn RowContextExtractor>,
}

impl<S: RenderSurface> Default for ScatterChart<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: RenderSurface> ScatterChart<S> {
    pub fn new() -> Self {
        Self {
            state: State::Unmounted,
            requirement: ChannelRequirement::scatter(),
            extractor: Box::new(PassThrough),
        }
    }

    pub fn with_requirement(mut self, requirement: ChannelRequirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn with_extractor(mut self, extractor: impl RowContextExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn is_mounted(&self) -> bool {
        matches!(self.state, State::Mounted(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self.state, State::Disposed)
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            State::Mounted(surface) => Some(surface),
            _ => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        match &mut self.state {
            State::Mounted(surface) => Some(surface),
            _ => None,
        }
    }

    fn render(&self, dataset: &Dataset, config: &ChartConfig) -> Result<Option<ChartOptions>> {
        runtime::build_chart_options_with(dataset, config, &self.requirement, self.extractor.as_ref())
    }
}

impl<S, C> Mountable<C> for ScatterChart<S>
where
    S: RenderSurface,
    C: Container<Surface = S>,
{
    fn mount(&mut self, container: Option<&mut C>, context: &ChartContext) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        let Some(container) = container else {
            log::debug!("mount without a container, skipping");
            return Ok(());
        };

        let mut surface = container
            .init_surface(context)
            .context("Failed to initialize render surface")?;
        for (event, handler) in &context.events {
            surface.on(event, Rc::clone(handler));
        }

        if let State::Mounted(mut previous) = std::mem::replace(&mut self.state, State::Mounted(surface)) {
            previous.dispose();
        }
        Ok(())
    }
}

impl<S: RenderSurface> Updatable for ScatterChart<S> {
    fn update(&mut self, props: ChartProps<'_>) -> Result<()> {
        if !self.is_mounted() {
            return Ok(());
        }

        let options = match (props.dataset, props.config) {
            (Some(dataset), Some(config)) => match self.render(dataset, config) {
                Ok(options) => options,
                Err(err) => {
                    log::warn!("scatter chart not rendered: {:#}", err);
                    None
                }
            },
            _ => {
                log::debug!("dataset or configuration missing, clearing chart");
                None
            }
        };

        let Some(surface) = self.surface_mut() else {
            return Ok(());
        };
        match options {
            Some(options) => surface
                .set_option(&options)
                .context("Failed to apply chart options"),
            None => {
                surface.clear();
                Ok(())
            }
        }
    }
}

impl<S: RenderSurface> Resizable for ScatterChart<S> {
    fn resize(&mut self, hints: &SizeHints, _context: &ChartContext) -> Result<()> {
        match self.surface_mut() {
            Some(surface) => surface.resize(hints).context("Failed to resize render surface"),
            None => Ok(()),
        }
    }
}

impl<S: RenderSurface> Disposable for ScatterChart<S> {
    fn unmount(&mut self) {
        if let State::Mounted(mut surface) = std::mem::replace(&mut self.state, State::Disposed) {
            surface.dispose();
        }
    }
}
