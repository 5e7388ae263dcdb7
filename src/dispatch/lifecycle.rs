use super::pipeline::{ActivePipeline, QueryPipeline};
use crate::core::errors::Result;
use crate::stream::Subscription;
use crate::ui::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Inactive,
    Active,
}

/// Owns the single pipeline run for one surface.
///
/// Driven from the interactive thread: `activate` when the surface is shown,
/// `deactivate` when it is hidden. Every activation builds the pipeline from scratch.
pub struct LifecycleController {
    pipeline: QueryPipeline,
    surface: Surface,
    active: Option<ActivePipeline>,
}

impl LifecycleController {
    pub fn new(pipeline: QueryPipeline, surface: Surface) -> Self {
        Self {
            pipeline,
            surface,
            active: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        match &self.active {
            Some(_) => LifecycleState::Active,
            None => LifecycleState::Inactive,
        }
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.active.as_ref().map(ActivePipeline::subscription)
    }

    pub fn pending(&self) -> usize {
        self.active.as_ref().map_or(0, ActivePipeline::pending)
    }

    /// Starts the pipeline. Already running: nothing happens. A pipeline that stopped
    /// on its own is replaced.
    pub fn activate(&mut self) -> Result<()> {
        if let Some(active) = &self.active {
            if !active.is_disposed() {
                tracing::debug!("search pipeline already active");
                return Ok(());
            }
            self.active = None;
        }

        let active = self.pipeline.start(&self.surface)?;
        tracing::info!("search pipeline active");
        self.active = Some(active);
        Ok(())
    }

    /// Disposes the running pipeline, if any, and clears the slot.
    pub fn deactivate(&mut self) {
        if let Some(active) = self.active.take() {
            active.dispose();
            tracing::info!("search pipeline inactive");
        }
    }
}

impl Drop for LifecycleController {
    fn drop(&mut self) {
        self.deactivate();
    }
}
