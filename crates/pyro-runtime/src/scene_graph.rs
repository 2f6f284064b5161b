//! In-memory scene used by headless runs and tests

use pyro_core::{EmitterId, Primitive, PrimitiveHandle, Scene};
use std::collections::{HashMap, HashSet};

/// Bookkeeping implementation of [`Scene`].
///
/// Tracks which primitives are live, which were removed but not yet
/// disposed, and counts any release that happened twice so lifecycle bugs
/// show up as numbers instead of silent leaks.
#[derive(Default)]
pub struct SceneGraph {
    live: HashMap<PrimitiveHandle, Primitive>,
    removed: HashSet<PrimitiveHandle>,
    disposed: HashSet<PrimitiveHandle>,
    next_handle: u64,
    double_releases: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, handle: PrimitiveHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn get(&self, handle: PrimitiveHandle) -> Option<&Primitive> {
        self.live.get(&handle)
    }

    /// Number of primitives currently drawn
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live primitives belonging to one emitter
    pub fn primitives_for(&self, emitter: EmitterId) -> usize {
        self.live.values().filter(|p| p.emitter == emitter).count()
    }

    /// Primitives removed from the scene but never disposed
    pub fn leaked_count(&self) -> usize {
        self.removed.len()
    }

    pub fn disposed_count(&self) -> usize {
        self.disposed.len()
    }

    /// Removes or disposes that targeted an already-released handle
    pub fn double_releases(&self) -> usize {
        self.double_releases
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, primitive: Primitive) -> PrimitiveHandle {
        self.next_handle += 1;
        let handle = PrimitiveHandle(self.next_handle);
        log::trace!(
            "scene add {:?} for emitter {} ({} points)",
            primitive.kind,
            primitive.emitter,
            primitive.point_count
        );
        self.live.insert(handle, primitive);
        handle
    }

    fn remove(&mut self, handle: PrimitiveHandle) {
        if self.live.remove(&handle).is_some() {
            self.removed.insert(handle);
        } else {
            log::warn!("scene remove of unknown primitive {:?}", handle);
            self.double_releases += 1;
        }
    }

    fn dispose(&mut self, handle: PrimitiveHandle) {
        if self.live.contains_key(&handle) {
            log::warn!("disposing primitive {:?} that is still in the scene", handle);
            self.live.remove(&handle);
        }
        self.removed.remove(&handle);
        if !self.disposed.insert(handle) {
            self.double_releases += 1;
        }
    }
}
