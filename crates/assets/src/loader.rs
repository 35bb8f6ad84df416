use crate::{AssetEvent, AssetRequest, load_blocking};
use std::sync::Arc;

type Sink = Arc<dyn Fn(AssetEvent) + Send + Sync>;

/// Spawns one worker thread per request and hands each result to the sink.
///
/// Failures are delivered as [`AssetEvent::Failed`]; the sink is called
/// exactly once per request.
#[derive(Clone)]
pub struct AssetLoader {
    sink: Sink,
}

impl AssetLoader {
    pub fn new(sink: impl Fn(AssetEvent) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    pub fn request(&self, request: AssetRequest) {
        tracing::debug!(kind = request.kind(), path = %request.path().display(), "asset requested");
        let sink = Arc::clone(&self.sink);
        let job = request.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("asset-{}", request.kind()))
            .spawn(move || sink(complete(job)));
        if let Err(e) = spawned {
            (self.sink)(AssetEvent::Failed {
                request,
                error: format!("failed to spawn loader thread: {e}"),
            });
        }
    }

    pub fn request_all(&self, requests: impl IntoIterator<Item = AssetRequest>) {
        for request in requests {
            self.request(request);
        }
    }
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader").finish_non_exhaustive()
    }
}

fn complete(request: AssetRequest) -> AssetEvent {
    match load_blocking(&request) {
        Ok(event) => event,
        Err(e) => AssetEvent::Failed {
            request,
            error: e.to_string(),
        },
    }
}
