//! RT-safe garbage collection for sample data
//!
//! A global `basedrop` collector lives on its own thread. Sample frames are
//! wrapped in `Shared<T>` so the audio thread can hold a reference to a
//! sample while the UI replaces it, and the final drop only enqueues the
//! pointer instead of freeing megabytes of audio inside the audio callback.
//!
//! ```ignore
//! use basedrop::Shared;
//! use sampler_core::gc::gc_handle;
//!
//! let frames = Shared::new(&gc_handle(), vec![vec![0.0f32; 48_000]]);
//! let for_audio = frames.clone();
//! drop(frames);
//! drop(for_audio); // queued for the collector thread
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, OnceLock};
use std::thread;
use std::time::Duration;

use basedrop::{Collector, Handle};

static GC_HANDLE: OnceLock<Handle> = OnceLock::new();

/// Default pause between collection passes
pub const DEFAULT_COLLECT_INTERVAL_MS: u64 = 100;

/// Shortest pause the collector accepts
const MIN_COLLECT_INTERVAL_MS: u64 = 1;

/// Read by the collector thread before every pause
static COLLECT_INTERVAL_MS: AtomicU64 = AtomicU64::new(DEFAULT_COLLECT_INTERVAL_MS);

/// Change how often dropped samples are reclaimed
///
/// Takes effect on the collector's next pass, whether or not the thread has
/// started yet. Set from `playback.gc_interval_ms`.
pub fn set_collect_interval(interval: Duration) {
    let ms = (interval.as_millis() as u64).max(MIN_COLLECT_INTERVAL_MS);
    COLLECT_INTERVAL_MS.store(ms, Ordering::Relaxed);
    log::debug!("set_collect_interval: {}ms", ms);
}

pub fn collect_interval() -> Duration {
    Duration::from_millis(COLLECT_INTERVAL_MS.load(Ordering::Relaxed))
}

fn spawn_collector() -> Handle {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("sampler-gc".to_string())
        .spawn(move || {
            // Collector is !Sync, so it has to be built on its own thread
            let mut collector = Collector::new();
            tx.send(collector.handle()).expect("sampler-gc: handle channel closed");

            log::info!("sampler-gc: started, collecting every {:?}", collect_interval());

            loop {
                collector.collect();
                thread::sleep(collect_interval());
            }
        })
        .expect("sampler-gc: failed to spawn thread");

    rx.recv().expect("sampler-gc: thread exited before sending its handle")
}

/// Handle for wrapping sample data in `Shared<T>`; starts the collector on first use
pub fn gc_handle() -> Handle {
    GC_HANDLE.get_or_init(spawn_collector).clone()
}
