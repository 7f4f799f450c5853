use std::sync::Arc;

use tokio::sync::{broadcast, Mutex, MutexGuard};

use crate::flow::events::FlowEvent;
use crate::flow::snapshot::FlowSnapshot;
use crate::flow::{Completion, FlowController, FlowError, GenerationRequest, ImageJob, Submitted};
use crate::services::generator::GenerativeClient;
use crate::services::image_tasks::ImageTasks;

/// Runs the controller's suspension points: the session generation call and
/// the per-word image calls. The controller lock is only taken between
/// awaits.
#[derive(Debug, Clone)]
pub struct SessionFlow {
    controller: Arc<Mutex<FlowController>>,
    client: GenerativeClient,
    images: Arc<ImageTasks>,
}

impl SessionFlow {
    pub fn new(controller: FlowController, client: GenerativeClient) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
            client,
            images: Arc::new(ImageTasks::new()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, FlowController> {
        self.controller.lock().await
    }

    pub async fn snapshot(&self) -> FlowSnapshot {
        self.controller.lock().await.snapshot()
    }

    pub async fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.controller.lock().await.subscribe()
    }

    pub async fn pending_images(&self) -> usize {
        self.images.pending().await
    }

    pub fn client(&self) -> &GenerativeClient {
        &self.client
    }

    pub async fn submit(&self, input: &str) -> Result<Submitted, FlowError> {
        let submitted = self.controller.lock().await.submit(input)?;
        match &submitted {
            Submitted::Generate(request) => self.dispatch_generation(request.clone()).await,
            Submitted::Installed(jobs) => self.dispatch_images(jobs.clone()).await,
            Submitted::Selecting | Submitted::Failed(_) => {}
        }
        Ok(submitted)
    }

    pub async fn analyze_selection(&self) -> Result<GenerationRequest, FlowError> {
        let request = self.controller.lock().await.analyze_selection()?;
        self.dispatch_generation(request.clone()).await;
        Ok(request)
    }

    async fn dispatch_generation(&self, request: GenerationRequest) {
        self.images.abort_stale(request.ticket).await;
        let flow = self.clone();
        tokio::spawn(async move {
            flow.run_generation(request).await;
        });
    }

    async fn run_generation(&self, request: GenerationRequest) {
        let result = self.client.generate_session(&request).await;
        let completion = self
            .controller
            .lock()
            .await
            .complete_generation(request.ticket, result);

        match completion {
            Completion::Installed(jobs) => self.dispatch_images(jobs).await,
            Completion::Failed(failure) => {
                tracing::info!(ticket = %request.ticket, ?failure, "Returned to input after failed generation");
            }
            Completion::Stale => {}
        }
    }

    async fn dispatch_images(&self, jobs: Vec<ImageJob>) {
        let Some(ticket) = jobs.first().map(|j| j.ticket) else {
            return;
        };
        self.images.abort_stale(ticket).await;
        tracing::debug!(%ticket, count = jobs.len(), "Dispatching image generation");

        for job in jobs {
            let flow = self.clone();
            let (ticket, index) = (job.ticket, job.index);
            self.images
                .spawn(ticket, index, async move {
                    flow.run_image(job).await;
                })
                .await;
        }
    }

    async fn run_image(&self, job: ImageJob) {
        let image = self.client.generate_image(&job.prompt).await;
        let stored = self
            .controller
            .lock()
            .await
            .merge_image(job.ticket, job.index, image);
        if !stored {
            tracing::debug!(ticket = %job.ticket, index = job.index, "Image left absent");
        }
        self.images.finish(job.ticket, job.index).await;
    }
}
