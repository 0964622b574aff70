//! Off-screen image preloading on a dedicated worker thread.
//!
//! Jobs go in through a bounded channel; each job produces exactly one
//! `LoadFinished` event on the controller's event channel, carrying the
//! load token and the geometry snapshot needed to place the result. The
//! worker never cancels in-flight fetches; staleness is resolved at the
//! controller by token comparison.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use image::ImageReader;
use tracing::{debug, trace, warn};

use crate::events::{ControllerEvent, LoadOutcome};
use crate::geometry::{AnchorBox, Viewport};
use crate::panel::LoadToken;

/// Maximum queued jobs; hovers arriving faster than this are dropped and
/// reported as a failed submit.
const MAX_QUEUE_SIZE: usize = 64;

/// Shutdown poll interval for the worker.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Natural dimensions of a successfully probed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDims {
    pub width: u32,
    pub height: u32,
}

/// The platform image-loading primitive: source in, natural dimensions or
/// failure out. Fetch-level decoding stays outside the controller core.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, source: &str) -> Result<ImageDims>;
}

/// Fetcher for hosts whose sources are local files; accepts plain paths or
/// `file://` URLs and probes dimensions without a full decode.
pub struct FileFetcher;

impl ImageFetcher for FileFetcher {
    fn fetch(&self, source: &str) -> Result<ImageDims> {
        let path = source.strip_prefix("file://").unwrap_or(source);
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read image: {path}"))?;
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .context("Failed to guess image format")?;
        let (width, height) = reader
            .into_dimensions()
            .with_context(|| format!("Failed to read dimensions: {path}"))?;
        Ok(ImageDims { width, height })
    }
}

struct LoadJob {
    token: LoadToken,
    anchor: AnchorBox,
    viewport: Viewport,
}

/// Worker-backed preloader. Dropping it shuts the worker down.
pub struct Preloader {
    job_tx: Sender<LoadJob>,
    worker: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl Preloader {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, events: Sender<ControllerEvent>) -> Self {
        let (job_tx, job_rx) = flume::bounded(MAX_QUEUE_SIZE);
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker = thread::Builder::new()
            .name("zoom-preload".into())
            .spawn({
                let shutdown = Arc::clone(&shutdown);
                move || worker_loop(job_rx, events, fetcher, shutdown)
            })
            .expect("Failed to spawn preload worker");

        Self {
            job_tx,
            worker: Some(worker),
            shutdown,
        }
    }

    /// Submits a load for `token`. Returns false if the job could not be
    /// queued, in which case no completion event will arrive for it.
    pub fn load(&self, token: LoadToken, anchor: AnchorBox, viewport: Viewport) -> bool {
        let job = LoadJob {
            token,
            anchor,
            viewport,
        };
        match self.job_tx.try_send(job) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(job)) => {
                warn!(source = job.token.source(), "preload queue full, dropping");
                false
            }
            Err(flume::TrySendError::Disconnected(job)) => {
                warn!(source = job.token.source(), "preload worker gone");
                false
            }
        }
    }
}

impl Drop for Preloader {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop(
    rx: Receiver<LoadJob>,
    tx: Sender<ControllerEvent>,
    fetcher: Arc<dyn ImageFetcher>,
    shutdown: Arc<AtomicBool>,
) {
    debug!("preload worker started");

    loop {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(job) => {
                trace!(source = job.token.source(), "preloading");
                let outcome = match fetcher.fetch(job.token.source()) {
                    Ok(dims) => LoadOutcome::Loaded {
                        width: dims.width,
                        height: dims.height,
                    },
                    Err(e) => LoadOutcome::Failed {
                        error: format!("{e:#}"),
                    },
                };
                let event = ControllerEvent::LoadFinished {
                    token: job.token,
                    anchor: job.anchor,
                    viewport: job.viewport,
                    outcome,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!("preload worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FixedFetcher {
        dims: ImageDims,
    }

    impl ImageFetcher for FixedFetcher {
        fn fetch(&self, _source: &str) -> Result<ImageDims> {
            Ok(self.dims)
        }
    }

    struct FailingFetcher;

    impl ImageFetcher for FailingFetcher {
        fn fetch(&self, source: &str) -> Result<ImageDims> {
            Err(anyhow!("no such image: {source}"))
        }
    }

    fn recv_finished(rx: &Receiver<ControllerEvent>) -> (LoadToken, LoadOutcome) {
        match rx.recv_timeout(Duration::from_secs(2)) {
            Ok(ControllerEvent::LoadFinished { token, outcome, .. }) => (token, outcome),
            other => panic!("expected load completion, got {other:?}"),
        }
    }

    fn anchor() -> AnchorBox {
        AnchorBox::new(vec![10], 20)
    }

    fn viewport() -> Viewport {
        Viewport {
            width: 1024,
            height: 768,
        }
    }

    #[test]
    fn test_successful_load_reports_dimensions() {
        let (tx, rx) = flume::unbounded();
        let fetcher = Arc::new(FixedFetcher {
            dims: ImageDims {
                width: 800,
                height: 600,
            },
        });
        let preloader = Preloader::new(fetcher, tx);

        let token = LoadToken::for_tests(1, "a.jpg");
        assert!(preloader.load(token.clone(), anchor(), viewport()));

        let (finished, outcome) = recv_finished(&rx);
        assert_eq!(finished, token);
        match outcome {
            LoadOutcome::Loaded { width, height } => {
                assert_eq!((width, height), (800, 600));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_load_reports_error() {
        let (tx, rx) = flume::unbounded();
        let preloader = Preloader::new(Arc::new(FailingFetcher), tx);

        let token = LoadToken::for_tests(7, "missing.jpg");
        assert!(preloader.load(token, anchor(), viewport()));

        let (_, outcome) = recv_finished(&rx);
        match outcome {
            LoadOutcome::Failed { error } => assert!(error.contains("missing.jpg")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn test_file_fetcher_reads_real_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        image::DynamicImage::new_rgb8(5, 3).save(&path).unwrap();

        let dims = FileFetcher.fetch(path.to_str().unwrap()).unwrap();
        assert_eq!(
            dims,
            ImageDims {
                width: 5,
                height: 3
            }
        );

        let via_url = FileFetcher
            .fetch(&format!("file://{}", path.display()))
            .unwrap();
        assert_eq!(via_url, dims);
    }

    #[test]
    fn test_file_fetcher_missing_path_errors() {
        let err = FileFetcher.fetch("/nonexistent/zoom.png").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read image"));
    }
}
