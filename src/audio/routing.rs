use std::collections::{BTreeMap, HashMap};

use crate::{
    foundation::core::{AudioNodeHandle, BusHandle, ElementHandle},
    media::lifecycle::LifecycleManager,
};

/// Host audio graph the compositor routes segment audio into.
pub trait AudioRouter {
    /// Create an output bus for `track_index`.
    fn create_bus(&mut self, track_index: usize) -> BusHandle;

    /// Wrap a media element as an audio node. `None` if the element has no usable audio.
    fn create_media_node(&mut self, element: ElementHandle) -> Option<AudioNodeHandle>;

    /// Route `node` into `bus`.
    fn connect(&mut self, node: AudioNodeHandle, bus: BusHandle);

    /// Remove `node` from whatever it is routed into.
    fn disconnect(&mut self, node: AudioNodeHandle);

    /// Set the gain applied to `node`.
    fn set_gain(&mut self, _node: AudioNodeHandle, _gain: f64) {}
}

/// Per-track audio buses and the instance-to-node cache.
#[derive(Default)]
pub struct AudioManager {
    router: Option<Box<dyn AudioRouter>>,
    buses: BTreeMap<usize, BusHandle>,
    // `None` marks an instance whose node could not be created; it is not retried.
    nodes: HashMap<String, Option<AudioNodeHandle>>,
}

impl AudioManager {
    /// Manager routing through `router`.
    pub fn new(router: Box<dyn AudioRouter>) -> Self {
        Self {
            router: Some(router),
            ..Self::default()
        }
    }

    /// `true` if a router is attached.
    pub fn has_router(&self) -> bool {
        self.router.is_some()
    }

    /// Bus for `track_index`, creating it on first request. `None` without a router.
    pub fn bus_for_track(&mut self, track_index: usize) -> Option<BusHandle> {
        let router = self.router.as_mut()?;
        Some(
            *self
                .buses
                .entry(track_index)
                .or_insert_with(|| router.create_bus(track_index)),
        )
    }

    /// Connect live instances on bussed tracks, creating each instance's node at most once.
    /// Nodes of instances that are gone are disconnected.
    pub fn update(&mut self, instances: &LifecycleManager) {
        let Some(router) = self.router.as_mut() else {
            return;
        };

        self.nodes.retain(|id, node| {
            let live = instances.get(id).is_some();
            if !live && let Some(n) = node {
                router.disconnect(*n);
            }
            live
        });

        for inst in instances.instances() {
            let Some(&bus) = self.buses.get(&inst.track_index()) else {
                continue;
            };
            if self.nodes.contains_key(inst.id()) {
                continue;
            }
            let node = match inst.audio_element() {
                Some(el) => {
                    let node = router.create_media_node(el);
                    if node.is_none() {
                        tracing::warn!(segment = %inst.id(), "no audio node for element; skipping");
                    }
                    node
                }
                None => None,
            };
            if let Some(n) = node {
                router.connect(n, bus);
                router.set_gain(n, inst.volume());
            }
            self.nodes.insert(inst.id().to_owned(), node);
        }
    }

    /// Disconnect every node and forget the cache. Buses are kept.
    pub fn reset(&mut self) {
        if let Some(router) = self.router.as_mut() {
            for n in self.nodes.values().flatten() {
                router.disconnect(*n);
            }
        }
        self.nodes.clear();
    }

    /// Number of connected nodes.
    pub fn connected(&self) -> usize {
        self.nodes.values().flatten().count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/routing.rs"]
mod tests;
