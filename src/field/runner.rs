use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::surface::DrawList;
use super::{ParticleField, Viewport};
use crate::mood::MoodReader;

/// Access to a running frame loop: the latest frame and a way to resize.
#[derive(Debug, Clone)]
pub struct FieldHandle {
    frames: watch::Receiver<Arc<DrawList>>,
    viewport: Arc<watch::Sender<Viewport>>,
}

impl FieldHandle {
    pub fn latest(&self) -> Arc<DrawList> {
        self.frames.borrow().clone()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    pub fn frames(&self) -> watch::Receiver<Arc<DrawList>> {
        self.frames.clone()
    }

    pub fn resize(&self, viewport: Viewport) {
        self.viewport.send_replace(viewport);
    }
}

/// Steps `field` once per tick, reading the mood color fresh each frame, and
/// publishes every frame. Ends when `shutdown_rx` fires.
pub fn spawn_frame_loop(
    mut field: ParticleField,
    mood: MoodReader,
    fps: u32,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> (FieldHandle, JoinHandle<()>) {
    let first = field.frame(&mood.current());
    let (frame_tx, frame_rx) = watch::channel(Arc::new(first));
    let (viewport_tx, mut viewport_rx) = watch::channel(field.viewport());

    let period = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(fps, viewport = ?field.viewport(), "Particle field started");

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if viewport_rx.has_changed().unwrap_or(false) {
                        let viewport = *viewport_rx.borrow_and_update();
                        tracing::debug!(?viewport, "Particle field resized");
                        field.resize(viewport);
                    }
                    let frame = field.frame(&mood.current());
                    frame_tx.send_replace(Arc::new(frame));
                }
                _ = shutdown_rx.recv() => break,
            }
        }
        tracing::info!(frames = field.frame_number(), "Particle field stopped");
    });

    (
        FieldHandle {
            frames: frame_rx,
            viewport: Arc::new(viewport_tx),
        },
        task,
    )
}
