use super::*;
use crate::media::factory::FactoryRegistry;
use crate::playlist::def::SegmentDef;
use crate::playlist::dsl::PlaylistBuilder;
use crate::timeline::classify::classify;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Graph {
    next: u64,
    refuse: bool,
    connected: Vec<(AudioNodeHandle, BusHandle)>,
    disconnected: Vec<AudioNodeHandle>,
    nodes_created: usize,
    gains: Vec<f64>,
}

struct Router(Rc<RefCell<Graph>>);

impl AudioRouter for Router {
    fn create_bus(&mut self, _track_index: usize) -> BusHandle {
        let mut g = self.0.borrow_mut();
        g.next += 1;
        BusHandle(g.next)
    }

    fn create_media_node(&mut self, _element: ElementHandle) -> Option<AudioNodeHandle> {
        let mut g = self.0.borrow_mut();
        g.nodes_created += 1;
        if g.refuse {
            return None;
        }
        g.next += 1;
        Some(AudioNodeHandle(g.next))
    }

    fn connect(&mut self, node: AudioNodeHandle, bus: BusHandle) {
        self.0.borrow_mut().connected.push((node, bus));
    }

    fn disconnect(&mut self, node: AudioNodeHandle) {
        self.0.borrow_mut().disconnected.push(node);
    }

    fn set_gain(&mut self, _node: AudioNodeHandle, gain: f64) {
        self.0.borrow_mut().gains.push(gain);
    }
}

fn live_manager() -> LifecycleManager {
    let p = PlaylistBuilder::new()
        .track([SegmentDef::video("a", 0.0, 5.0)
            .with_src("a.mp4")
            .with_volume(0.5)])
        .track([SegmentDef::image("still", 0.0, 5.0).with_src("still.png")])
        .build()
        .unwrap();
    let mut m = LifecycleManager::new(FactoryRegistry::headless());
    m.ensure_ready(&classify(&p, 1.0), 1.0).unwrap();
    m
}

#[test]
fn connects_once_per_instance_on_bussed_tracks() {
    let graph = Rc::new(RefCell::new(Graph::default()));
    let mut audio = AudioManager::new(Box::new(Router(graph.clone())));
    let bus = audio.bus_for_track(0).unwrap();
    assert_eq!(audio.bus_for_track(0), Some(bus));

    let m = live_manager();
    audio.update(&m);
    audio.update(&m);
    let g = graph.borrow();
    assert_eq!(g.nodes_created, 1);
    assert_eq!(g.connected.len(), 1);
    assert_eq!(g.connected[0].1, bus);
    assert_eq!(g.gains, [0.5]);
    assert_eq!(audio.connected(), 1);
}

#[test]
fn failed_node_is_skipped_and_not_retried() {
    let graph = Rc::new(RefCell::new(Graph {
        refuse: true,
        ..Graph::default()
    }));
    let mut audio = AudioManager::new(Box::new(Router(graph.clone())));
    audio.bus_for_track(0);
    let m = live_manager();
    audio.update(&m);
    audio.update(&m);
    assert_eq!(graph.borrow().nodes_created, 1);
    assert_eq!(audio.connected(), 0);
}

#[test]
fn reset_and_destroyed_instances_disconnect() {
    let graph = Rc::new(RefCell::new(Graph::default()));
    let mut audio = AudioManager::new(Box::new(Router(graph.clone())));
    audio.bus_for_track(0);
    let mut m = live_manager();
    audio.update(&m);
    audio.reset();
    assert_eq!(graph.borrow().disconnected.len(), 1);

    audio.update(&m);
    assert_eq!(graph.borrow().nodes_created, 2);
    m.clear();
    audio.update(&m);
    assert_eq!(graph.borrow().disconnected.len(), 2);
    assert_eq!(audio.connected(), 0);
}

#[test]
fn without_router_everything_is_a_no_op() {
    let mut audio = AudioManager::default();
    assert!(!audio.has_router());
    assert_eq!(audio.bus_for_track(0), None);
    audio.update(&live_manager());
    assert_eq!(audio.connected(), 0);
}
