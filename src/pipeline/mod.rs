//! Strictly ordered execution of visual work. Producers enqueue boxed async
//! jobs; a single consumer task drains them one at a time, so operations
//! derived from snapshot N+1 can never start before snapshot N's have
//! finished. The ordering guarantee is structural (one consumer), not a lock.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::errors::ClientResult;

type JobFuture = Pin<Box<dyn Future<Output = ClientResult<()>> + Send>>;
type JobFactory = Box<dyn FnOnce() -> JobFuture + Send>;

struct Job {
    label: String,
    factory: JobFactory,
}

/// Handle to the single-consumer animation queue. Cloneable; all clones feed
/// the same consumer.
#[derive(Clone)]
pub struct AnimationPipeline {
    tx: mpsc::UnboundedSender<Job>,
    depth: Arc<AtomicUsize>,
    idle_tx: Arc<watch::Sender<usize>>,
    idle_rx: watch::Receiver<usize>,
}

impl AnimationPipeline {
    /// Spawns the consumer task and returns the producer handle. The consumer
    /// stops when every handle is dropped.
    pub fn start() -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let (idle_tx, idle_rx) = watch::channel(0usize);
        let idle_tx = Arc::new(idle_tx);
        let depth = Arc::new(AtomicUsize::new(0));

        let consumer_depth = depth.clone();
        let consumer_idle = idle_tx.clone();
        let handle = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                debug!("animation job '{}' starting", job.label);
                let outcome = std::panic::AssertUnwindSafe((job.factory)())
                    .catch_unwind()
                    .await;
                match outcome {
                    Ok(Ok(())) => debug!("animation job '{}' finished", job.label),
                    // A failing job must not stall the queue; the next
                    // snapshot corrects any visual drift.
                    Ok(Err(e)) => error!("animation job '{}' failed: {}", job.label, e),
                    Err(_) => error!("animation job '{}' panicked", job.label),
                }
                let remaining = consumer_depth.fetch_sub(1, Ordering::SeqCst) - 1;
                let _ = consumer_idle.send(remaining);
            }
            debug!("animation pipeline consumer stopped");
        });

        (
            Self {
                tx,
                depth,
                idle_tx,
                idle_rx,
            },
            handle,
        )
    }

    /// Appends a job. The factory runs only once its predecessor has settled.
    pub fn enqueue<F, Fut>(&self, label: impl Into<String>, factory: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ClientResult<()>> + Send + 'static,
    {
        let label = label.into();
        let pending = self.depth.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.idle_tx.send(pending);
        let job = Job {
            label: label.clone(),
            factory: Box::new(move || Box::pin(factory()) as JobFuture),
        };
        if self.tx.send(job).is_err() {
            // Consumer gone; only reachable during shutdown.
            self.depth.fetch_sub(1, Ordering::SeqCst);
            error!("animation job '{}' dropped: pipeline stopped", label);
        }
    }

    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Resolves once the queue is empty and no job is running.
    pub async fn wait_idle(&self) {
        let mut rx = self.idle_rx.clone();
        loop {
            if *rx.borrow() == 0 {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use parking_lot::Mutex;
    use std::time::Duration;

    #[tokio::test]
    async fn jobs_run_in_enqueue_order() {
        let (pipeline, _handle) = AnimationPipeline::start();
        let log: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));

        for i in 0..5u32 {
            let log = log.clone();
            pipeline.enqueue(format!("job-{}", i), move || async move {
                // Earlier jobs sleep longer; order must still hold.
                tokio::time::sleep(Duration::from_millis(u64::from(5 - i))).await;
                log.lock().push(i);
                Ok(())
            });
        }

        pipeline.wait_idle().await;
        assert_eq!(*log.lock(), vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn failing_job_does_not_stop_the_queue() {
        let (pipeline, _handle) = AnimationPipeline::start();
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        pipeline.enqueue("bad", || async { Err(ClientError::internal("tween rejected")) });
        let after = log.clone();
        pipeline.enqueue("good", move || async move {
            after.lock().push("ran");
            Ok(())
        });

        pipeline.wait_idle().await;
        assert_eq!(*log.lock(), vec!["ran"]);
    }

    #[tokio::test]
    async fn panicking_job_is_isolated() {
        let (pipeline, _handle) = AnimationPipeline::start();
        let log: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        pipeline.enqueue("explodes", || async { panic!("mesh not loaded") });
        let after = log.clone();
        pipeline.enqueue("survivor", move || async move {
            after.lock().push("ran");
            Ok(())
        });

        pipeline.wait_idle().await;
        assert_eq!(*log.lock(), vec!["ran"]);
    }

    #[tokio::test]
    async fn a_job_never_starts_before_its_predecessor_settles() {
        let (pipeline, _handle) = AnimationPipeline::start();
        let running = Arc::new(AtomicUsize::new(0));
        let overlap = Arc::new(AtomicUsize::new(0));

        for i in 0..4 {
            let running = running.clone();
            let overlap = overlap.clone();
            pipeline.enqueue(format!("job-{}", i), move || async move {
                if running.fetch_add(1, Ordering::SeqCst) > 0 {
                    overlap.fetch_add(1, Ordering::SeqCst);
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        pipeline.wait_idle().await;
        assert_eq!(overlap.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn wait_idle_resolves_immediately_when_empty() {
        let (pipeline, _handle) = AnimationPipeline::start();
        pipeline.wait_idle().await;
        assert_eq!(pipeline.depth(), 0);
    }
}
