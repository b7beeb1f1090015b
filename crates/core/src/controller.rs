//! Owned controller wiring a sepia observer into an RTC engine
//!
//! The engine itself is an external collaborator reached through
//! [`RtcEngine`]. [`VideoRawDataController`] owns the engine for as long as
//! the filter is installed: `create` registers the observer, `dispose`
//! unregisters it and hands the engine back. There is no process-wide state.

use std::sync::Arc;

use crate::config::Config;
use crate::filter::SepiaParams;
use crate::observer::{SepiaFrameObserver, VideoFrameObserver};
use crate::{Error, Result};

/// The subset of an RTC engine the controller drives
pub trait RtcEngine {
    /// Install `observer`, replacing any previous one; `None` removes it
    fn register_video_frame_observer(
        &mut self,
        observer: Option<Arc<dyn VideoFrameObserver>>,
    ) -> Result<()>;

    /// Opaque handle identifying the underlying engine instance
    fn native_handle(&self) -> u64;
}

/// Installs a [`SepiaFrameObserver`] on an engine for the controller's lifetime
pub struct VideoRawDataController<E: RtcEngine> {
    engine: Option<E>,
    observer: Arc<SepiaFrameObserver>,
}

impl<E: RtcEngine> VideoRawDataController<E> {
    /// Build the observer from `config` and register it with `engine`
    pub fn create(mut engine: E, config: &Config) -> Result<Self> {
        let observer = Arc::new(SepiaFrameObserver::new(
            config.filter,
            config.observer.clone(),
        )?);
        engine.register_video_frame_observer(Some(observer.clone() as Arc<dyn VideoFrameObserver>))?;

        tracing::info!(
            "Sepia observer registered on engine {:#x}",
            engine.native_handle()
        );

        Ok(Self {
            engine: Some(engine),
            observer,
        })
    }

    /// Handle of the engine this controller owns
    pub fn native_handle(&self) -> u64 {
        self.engine.as_ref().map_or(0, |e| e.native_handle())
    }

    /// The registered observer
    pub fn observer(&self) -> &Arc<SepiaFrameObserver> {
        &self.observer
    }

    /// Retune the filter without re-registering
    pub fn update_params(&self, params: SepiaParams) -> Result<()> {
        self.observer.set_params(params)
    }

    /// Unregister the observer and return the engine
    pub fn dispose(mut self) -> Result<E> {
        let mut engine = self
            .engine
            .take()
            .ok_or_else(|| Error::Execution("controller already disposed".into()))?;
        engine.register_video_frame_observer(None)?;
        tracing::info!(
            "Sepia observer unregistered from engine {:#x}",
            engine.native_handle()
        );
        Ok(engine)
    }
}

impl<E: RtcEngine> Drop for VideoRawDataController<E> {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            if let Err(e) = engine.register_video_frame_observer(None) {
                tracing::warn!("Failed to unregister sepia observer on drop: {}", e);
            }
        }
    }
}
