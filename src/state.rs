use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::field::runner::{spawn_frame_loop, FieldHandle};
use crate::field::ParticleField;
use crate::flow::FlowController;
use crate::mood::{mood_signal, MoodReader};
use crate::services::generator::GenerativeClient;
use crate::services::session_flow::SessionFlow;

#[derive(Clone)]
pub struct AppState {
    flow: SessionFlow,
    field: FieldHandle,
    mood: MoodReader,
    config: Arc<Config>,
    shutdown_tx: broadcast::Sender<()>,
    sse_connections: Arc<AtomicUsize>,
    started_at: Instant,
}

impl AppState {
    /// Wires the controller, the generator client and the particle field.
    /// Must run inside a tokio runtime; the returned handle is the frame
    /// loop, which ends on `shutdown_tx`.
    pub fn new(config: &Config, shutdown_tx: broadcast::Sender<()>) -> (Self, JoinHandle<()>) {
        let (publisher, mood) = mood_signal();
        let client = GenerativeClient::new(&config.generator);
        let flow = SessionFlow::new(FlowController::new(publisher), client);

        let (field, frame_loop) = spawn_frame_loop(
            ParticleField::new(&config.field),
            mood.clone(),
            config.field.fps,
            shutdown_tx.subscribe(),
        );

        let state = Self {
            flow,
            field,
            mood,
            config: Arc::new(config.clone()),
            shutdown_tx,
            sse_connections: Arc::new(AtomicUsize::new(0)),
            started_at: Instant::now(),
        };
        (state, frame_loop)
    }

    pub fn flow(&self) -> &SessionFlow {
        &self.flow
    }

    pub fn field(&self) -> &FieldHandle {
        &self.field
    }

    pub fn mood(&self) -> &MoodReader {
        &self.mood
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn shutdown_rx(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn sse_connections(&self) -> &Arc<AtomicUsize> {
        &self.sse_connections
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
