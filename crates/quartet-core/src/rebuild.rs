//! Filesystem-driven rebuilds for engines without a native watch mode.
//!
//! Watches the project root recursively, drops changes that match the
//! exclusion globs, and recompiles the step after each burst of changes,
//! reusing the previous compilation's cache.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glob::Pattern;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use quartet_config::{InputConfig, OutputConfig};
use tokio::sync::mpsc;

use crate::artifact::CacheHandle;
use crate::capability::{BundlingEngine, CompiledBuild, WatchOptions, WatchStream};
use crate::error::EngineError;
use crate::watch::WatchEvent;

const CHANNEL_CAPACITY: usize = 100;

/// Decides which changed paths may trigger a rebuild.
#[derive(Debug, Clone)]
pub struct ChangeFilter {
    root: PathBuf,
    exclude: Vec<Pattern>,
    ignore_dirs: Vec<PathBuf>,
}

impl ChangeFilter {
    /// # Errors
    ///
    /// Returns an error if an exclusion glob is malformed.
    pub fn new(options: &WatchOptions) -> Result<Self, EngineError> {
        let exclude = options
            .exclude
            .iter()
            .map(|glob| {
                Pattern::new(glob).map_err(|e| {
                    EngineError::with_source(format!("invalid watch exclusion '{}'", glob), e)
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            root: options.root.clone(),
            exclude,
            ignore_dirs: options.ignore_dirs.clone(),
        })
    }

    /// Whether a change at `path` should be ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        let Ok(rel_path) = path.strip_prefix(&self.root) else {
            return true;
        };

        if self.ignore_dirs.iter().any(|dir| path.starts_with(dir)) {
            return true;
        }

        let components: Vec<&str> = rel_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        // Hidden files and directories (.git, editor swap files).
        if components.iter().any(|name| name.starts_with('.')) {
            return true;
        }

        // Match every suffix so nested dependency directories are caught too.
        (0..components.len()).any(|start| {
            let candidate = components[start..].join("/");
            self.exclude.iter().any(|pattern| pattern.matches(&candidate))
        })
    }
}

/// What woke the watch loop up.
enum Wake {
    Changed(PathBuf),
    WatcherError(EngineError),
    Closed,
}

type ChangeReceiver = mpsc::Receiver<notify::Result<Vec<PathBuf>>>;

/// Start a rebuild watcher for one step.
///
/// # Errors
///
/// Returns an error if the exclusion globs are invalid or the root cannot be
/// watched.
pub fn watch_with_rebuilds<E: BundlingEngine>(
    engine: Arc<E>,
    input: InputConfig,
    output: OutputConfig,
    options: WatchOptions,
) -> Result<WatchStream, EngineError> {
    let filter = ChangeFilter::new(&options)?;
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        let batch = res.map(|event| match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => event.paths,
            _ => Vec::new(),
        });
        let _ = tx.blocking_send(batch);
    })
    .map_err(|e| EngineError::with_source("failed to create file watcher", e))?;

    watcher
        .watch(&options.root, RecursiveMode::Recursive)
        .map_err(|e| {
            EngineError::with_source(format!("failed to watch {}", options.root.display()), e)
        })?;

    let debounce = options.debounce;
    let stream = async_stream::stream! {
        // Dropping the watcher stops the notifications.
        let _watcher = watcher;
        let mut cache: Option<CacheHandle> = None;

        'cycles: loop {
            yield WatchEvent::Start;
            yield WatchEvent::BundleStart;

            let started = Instant::now();
            match rebuild(engine.as_ref(), &input, &output, cache.take()).await {
                Ok(handle) => {
                    cache = Some(handle);
                    yield WatchEvent::BundleEnd { duration: started.elapsed() };
                }
                Err(err) => {
                    yield WatchEvent::Error(err);
                }
            }
            yield WatchEvent::End;

            loop {
                match next_change(&mut rx, &filter, debounce).await {
                    Wake::Changed(path) => {
                        tracing::debug!(path = %path.display(), "change detected");
                        break;
                    }
                    Wake::WatcherError(err) => {
                        yield WatchEvent::Error(err);
                    }
                    Wake::Closed => {
                        yield WatchEvent::Fatal(EngineError::new("file watcher stopped"));
                        break 'cycles;
                    }
                }
            }
        }
    };

    Ok(Box::pin(stream))
}

async fn rebuild<E: BundlingEngine>(
    engine: &E,
    input: &InputConfig,
    output: &OutputConfig,
    cache: Option<CacheHandle>,
) -> Result<CacheHandle, EngineError> {
    let build = engine.compile(input, cache).await?;
    build.write(output).await?;
    Ok(build.cache_handle())
}

/// Wait for the next relevant change, then swallow the rest of its burst.
async fn next_change(rx: &mut ChangeReceiver, filter: &ChangeFilter, debounce: Duration) -> Wake {
    loop {
        let paths = match rx.recv().await {
            None => return Wake::Closed,
            Some(Err(e)) => {
                return Wake::WatcherError(EngineError::with_source("file watcher error", e));
            }
            Some(Ok(paths)) => paths,
        };

        let Some(path) = paths.into_iter().find(|p| !filter.is_ignored(p)) else {
            continue;
        };

        tokio::time::sleep(debounce).await;
        while let Ok(batch) = rx.try_recv() {
            if let Err(e) = batch {
                tracing::warn!(error = %e, "file watcher error during debounce");
            }
        }
        return Wake::Changed(path);
    }
}
