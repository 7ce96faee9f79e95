use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::LocalSpawner;
use futures::task::LocalSpawnExt as _;

use crate::event::{DecodeFailure, EventBus};
use crate::renderer::RenderTarget;
use crate::snapshot::{Snapshot, SnapshotDecoder};

/// Schedules snapshot restores into a render target.
///
/// Each request gets a generation number. A decode that completes after a
/// newer request (or after `supersede`) is dropped, so the target always ends
/// up showing the most recently requested step.
pub(crate) struct Restorer<T> {
    target: Rc<RefCell<T>>,
    decoder: Rc<dyn SnapshotDecoder>,
    spawner: LocalSpawner,
    generation: Rc<Cell<u64>>,
    /// Generation of the last request that finished or was dropped
    settled: Rc<Cell<u64>>,
    pending: Rc<Cell<usize>>,
    decode_failed: Rc<EventBus<DecodeFailure>>,
}

impl<T> Clone for Restorer<T> {
    fn clone(&self) -> Self {
        Self {
            target: Rc::clone(&self.target),
            decoder: Rc::clone(&self.decoder),
            spawner: self.spawner.clone(),
            generation: Rc::clone(&self.generation),
            settled: Rc::clone(&self.settled),
            pending: Rc::clone(&self.pending),
            decode_failed: Rc::clone(&self.decode_failed),
        }
    }
}

impl<T: RenderTarget + 'static> Restorer<T> {
    pub(crate) fn new(
        target: Rc<RefCell<T>>,
        decoder: Rc<dyn SnapshotDecoder>,
        spawner: LocalSpawner,
        decode_failed: Rc<EventBus<DecodeFailure>>,
    ) -> Self {
        Self {
            target,
            decoder,
            spawner,
            generation: Rc::new(Cell::new(0)),
            settled: Rc::new(Cell::new(0)),
            pending: Rc::new(Cell::new(0)),
            decode_failed,
        }
    }

    pub(crate) fn request(&self, cursor: usize, snapshot: Snapshot) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);

        let size = self.target.borrow().size();
        let decoding = self.decoder.decode(snapshot, size);

        let target = Rc::clone(&self.target);
        let latest = Rc::clone(&self.generation);
        let settled = Rc::clone(&self.settled);
        let pending = Rc::clone(&self.pending);
        let decode_failed = Rc::clone(&self.decode_failed);

        let task = async move {
            let result = decoding.await;
            pending.set(pending.get() - 1);

            if latest.get() != generation {
                log::debug!("Discarding stale restore of history step {cursor}");
                return;
            }
            settled.set(generation);

            match result {
                Ok(image) => {
                    let mut target = target.borrow_mut();
                    let [width, height] = target.size();
                    if image.dimensions() == (width, height) {
                        target.restore(&image);
                    } else {
                        log::warn!(
                            "Restored step {cursor} is {:?} but target is {width}x{height}; keeping current content",
                            image.dimensions()
                        );
                    }
                }
                Err(error) => {
                    log::error!("Failed to restore history step {cursor}: {error}");
                    decode_failed.emit(&DecodeFailure { cursor, error });
                }
            }
        };

        self.pending.set(self.pending.get() + 1);
        if let Err(e) = self.spawner.spawn_local(task) {
            self.pending.set(self.pending.get() - 1);
            self.settled.set(generation);
            log::error!("Failed to schedule restore of history step {cursor}: {e}");
        }
    }

    /// Invalidates every in-flight restore
    pub(crate) fn supersede(&self) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.settled.set(generation);
    }

    /// True while the most recent request has not been applied yet.
    /// Superseded requests still in flight do not count.
    pub(crate) fn is_restoring(&self) -> bool {
        self.settled.get() != self.generation.get()
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending.get()
    }
}
