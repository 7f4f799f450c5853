use axum::Router;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use lexicon_prime::config::{Config, FieldConfig, GeneratorConfig, LimitsConfig};
use lexicon_prime::routes::build_router;
use lexicon_prime::state::AppState;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    shutdown_tx: broadcast::Sender<()>,
    frame_loop: Option<JoinHandle<()>>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(handle) = self.frame_loop.take() {
            handle.abort();
        }
    }
}

pub fn test_config() -> Config {
    // Built directly so parallel tests never race on environment variables.
    Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        cors_origin: "http://localhost:5173".to_string(),
        static_dir: "static".to_string(),
        generator: GeneratorConfig::mock(),
        field: FieldConfig {
            width: 320.0,
            height: 240.0,
            fps: 30,
            seed: Some(7),
        },
        limits: LimitsConfig::default(),
    }
}

pub async fn spawn_with_config(config: Config) -> TestApp {
    let (shutdown_tx, _) = broadcast::channel::<()>(8);
    let (state, frame_loop) = AppState::new(&config, shutdown_tx.clone());
    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        shutdown_tx,
        frame_loop: Some(frame_loop),
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with_config(test_config()).await
}
