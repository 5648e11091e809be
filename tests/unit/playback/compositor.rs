use super::*;
use crate::effects::presets::EffectPreset;
use crate::media::headless::{HeadlessFactory, SharedJournal, SourceCall};
use crate::playlist::def::SegmentDef;
use crate::playlist::dsl::{PlaylistBuilder, preset_binding};
use crate::render::headless::{HeadlessRenderer, RenderLog};
use std::cell::{Cell, RefCell};

struct Rig {
    comp: Compositor,
    log: Rc<RefCell<RenderLog>>,
    journal: SharedJournal,
    events: Rc<RefCell<Vec<PlaybackEvent>>>,
}

fn rig(ready_after: usize) -> Rig {
    let renderer = HeadlessRenderer::new(Resolution::new(640, 360));
    let log = renderer.log();
    let factory = HeadlessFactory::new(ready_after);
    let journal = factory.journal();
    let mut comp = Compositor::new(
        Box::new(renderer),
        FactoryRegistry::with_headless(&factory),
        CompositorOpts::default(),
    )
    .unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [
        EventKind::Play,
        EventKind::Pause,
        EventKind::Ended,
        EventKind::Seek,
    ] {
        let sink = events.clone();
        comp.add_event_listener(kind, move |_, e| sink.borrow_mut().push(*e));
    }
    Rig {
        comp,
        log,
        journal,
        events,
    }
}

fn seg(id: &str, start: f64, duration: f64) -> SegmentDef {
    SegmentDef::video(id, start, duration).with_src(format!("{id}.mp4"))
}

fn single() -> Playlist {
    PlaylistBuilder::new()
        .track([seg("v1", 0.0, 4.0)])
        .build()
        .unwrap()
}

#[test]
fn idle_until_played() {
    let mut r = rig(0);
    assert_eq!(r.comp.tick(0.1).unwrap(), TickOutcome::Idle);
    r.comp.set_playlist(single()).unwrap();
    assert_eq!(r.comp.tick(0.1).unwrap(), TickOutcome::Idle);
    assert_eq!(r.comp.state(), PlaybackState::Idle);
    assert_eq!(r.comp.duration(), 4.0);
}

#[test]
fn plays_through_and_ends() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.play();

    let out = r.comp.tick(1.0).unwrap();
    assert_eq!(
        out,
        TickOutcome::Rendered {
            segments: vec!["v1".into()]
        }
    );
    assert_eq!(r.comp.current_time(), 1.0);
    for _ in 0..3 {
        r.comp.tick(1.0).unwrap();
    }
    assert_eq!(r.comp.current_time(), 4.0);

    assert_eq!(r.comp.tick(1.0).unwrap(), TickOutcome::Ended);
    assert_eq!(r.comp.state(), PlaybackState::Paused);
    assert_eq!(r.comp.current_time(), 0.0);
    assert_eq!(
        *r.events.borrow(),
        [
            PlaybackEvent::Play { playhead: 0.0 },
            PlaybackEvent::Ended { playhead: 4.0 },
        ]
    );
    assert_eq!(r.log.borrow().clears, 4);
}

#[test]
fn replay_after_end_restarts_sources_from_their_offset() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.play();
    for _ in 0..4 {
        r.comp.tick(1.0).unwrap();
    }
    assert_eq!(r.comp.tick(1.0).unwrap(), TickOutcome::Ended);

    // The played instance is rebuilt and parked at the start.
    {
        let j = r.journal.borrow();
        assert_eq!(j.count("v1", &SourceCall::Destroy), 1);
        assert_eq!(j.count("v1", &SourceCall::Create), 2);
        assert_eq!(j.count("v1", &SourceCall::Seek(0.0)), 2);
    }
    assert_eq!(r.comp.instance_ids(), ["v1"]);
    assert!(!r.comp.instance("v1").unwrap().has_played());
    assert!(
        !r.events
            .borrow()
            .iter()
            .any(|e| matches!(e, PlaybackEvent::Seek { .. }))
    );

    r.journal.borrow_mut().clear();
    r.comp.play();
    assert!(matches!(
        r.comp.tick(0.5).unwrap(),
        TickOutcome::Rendered { .. }
    ));
    let calls = r.journal.borrow().calls_for("v1");
    assert_eq!(calls.first(), Some(&SourceCall::Play));
    assert!(!calls.contains(&SourceCall::Destroy));
    assert_eq!(r.comp.current_time(), 0.5);
}

#[test]
fn stall_holds_playhead_and_rendering() {
    let mut r = rig(2);
    r.comp.set_playlist(single()).unwrap();
    r.comp.play();
    assert_eq!(r.comp.tick(0.5).unwrap(), TickOutcome::Stalled);
    assert_eq!(r.comp.tick(0.5).unwrap(), TickOutcome::Stalled);
    assert_eq!(r.comp.current_time(), 0.0);
    assert_eq!(r.log.borrow().clears, 0);
    assert!(matches!(
        r.comp.tick(0.5).unwrap(),
        TickOutcome::Rendered { .. }
    ));
    assert_eq!(r.comp.current_time(), 0.5);
}

#[test]
fn track_zero_is_drawn_last() {
    let mut r = rig(0);
    let p = PlaylistBuilder::new()
        .track([seg("top", 0.0, 5.0)])
        .track([seg("bottom", 0.0, 5.0)])
        .build()
        .unwrap();
    r.comp.set_playlist(p).unwrap();
    r.comp.play();
    let out = r.comp.tick(0.1).unwrap();
    assert_eq!(
        out,
        TickOutcome::Rendered {
            segments: vec!["bottom".into(), "top".into()]
        }
    );
    assert_eq!(r.log.borrow().last_frame_sources(), ["bottom", "top"]);
}

#[test]
fn render_params_merge_base_defaults_and_overrides() {
    let mut r = rig(0);
    let p = PlaylistBuilder::new()
        .track([seg("a", 0.0, 10.0)])
        .track([seg("b", 8.0, 10.0)])
        .effect(
            "fade",
            preset_binding(EffectPreset::FadeInOut, ["a"]).with_param("outTime", 2.0),
        )
        .transition("xfade", ["a", "b"])
        .build()
        .unwrap();
    r.comp.set_playlist(p).unwrap();
    r.comp.seek(9.0).unwrap();
    r.comp.play();
    r.comp.tick(0.0).unwrap();

    let log = r.log.borrow();
    let frame = log.last_frame();
    assert_eq!(frame.len(), 2);
    let a = frame.iter().find(|d| d.source == "a").unwrap();
    assert_eq!(a.params["progress"].as_number(), Some(0.9));
    assert_eq!(a.params["duration"].as_number(), Some(10.0));
    assert_eq!(a.params["inTime"].as_number(), Some(1.0));
    assert_eq!(a.params["outTime"].as_number(), Some(2.0));
    assert_eq!(a.params["transition_progress"].as_number(), Some(0.5));
    assert_eq!(a.params["transition_input_index"].as_number(), Some(0.0));
    assert_eq!(
        a.params["output_resolution"],
        ParamValue::Vec2([640.0, 360.0])
    );

    let b = frame.iter().find(|d| d.source == "b").unwrap();
    assert_eq!(b.params["transition_input_index"].as_number(), Some(1.0));
    assert!(!b.params.contains_key("inTime"));
    assert_ne!(a.program, b.program);
}

#[test]
fn seek_keeps_state_and_rebuilds_instances() {
    let mut r = rig(0);
    let p = PlaylistBuilder::new()
        .track([seg("a", 0.0, 5.0), seg("b", 5.0, 5.0)])
        .build()
        .unwrap();
    r.comp.set_playlist(p).unwrap();
    r.comp.play();
    r.comp.tick(1.0).unwrap();
    assert_eq!(r.comp.instance_ids(), ["a", "b"]);

    r.comp.seek(7.0).unwrap();
    assert_eq!(r.comp.state(), PlaybackState::Playing);
    assert_eq!(r.comp.instance_ids(), ["b"]);
    assert_eq!(r.journal.borrow().count("a", &SourceCall::Destroy), 1);
    assert_eq!(r.journal.borrow().count("b", &SourceCall::Seek(2.0)), 1);
    assert_eq!(
        r.events.borrow().last(),
        Some(&PlaybackEvent::Seek { target: 7.0 })
    );

    r.comp.pause();
    r.comp.seek(1.0).unwrap();
    assert_eq!(r.comp.state(), PlaybackState::Paused);
    assert!(r.comp.seek(f64::NAN).is_err());
    r.comp.seek(-3.0).unwrap();
    assert_eq!(r.comp.current_time(), 0.0);
}

#[test]
fn invalid_playlist_keeps_previous() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.seek(2.0).unwrap();
    let bad = PlaylistBuilder::new()
        .track([seg("a", 0.0, 10.0), seg("b", 2.0, 10.0)])
        .into_def();
    let err = r.comp.set_playlist_def(&bad).unwrap_err();
    assert_eq!(err.as_validation().unwrap().code.code(), 4);
    assert_eq!(r.comp.duration(), 4.0);
    assert_eq!(r.comp.current_time(), 2.0);
    assert_eq!(r.comp.instance_ids(), ["v1"]);
}

#[test]
fn replacing_playlist_destroys_instances_and_reseeks() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.seek(1.0).unwrap();
    let next = PlaylistBuilder::new()
        .track([seg("w", 0.0, 3.0)])
        .build()
        .unwrap();
    r.comp.set_playlist(next).unwrap();
    assert_eq!(r.journal.borrow().count("v1", &SourceCall::Destroy), 1);
    assert_eq!(r.comp.instance_ids(), ["w"]);
    assert_eq!(r.journal.borrow().count("w", &SourceCall::Seek(1.0)), 1);
}

#[test]
fn shader_errors_fail_assignment() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    let bad = PlaylistBuilder::new()
        .track([seg("x", 0.0, 1.0)])
        .effect(
            "broken",
            crate::playlist::dsl::shader_binding("#error nope", ["x"]),
        )
        .build()
        .unwrap();
    let err = r.comp.set_playlist(bad).unwrap_err();
    assert!(matches!(err, PlaybackError::ShaderCompile { .. }));
    assert_eq!(r.comp.duration(), 4.0);
}

#[test]
fn playback_rate_scales_and_freezes() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.play();
    r.comp.set_playback_rate(2.0).unwrap();
    r.comp.tick(0.5).unwrap();
    assert_eq!(r.comp.current_time(), 1.0);

    r.comp.set_playback_rate(-1.0).unwrap();
    assert_eq!(r.comp.opts().playback_rate, 0.0);
    assert!(matches!(
        r.comp.tick(0.5).unwrap(),
        TickOutcome::Rendered { .. }
    ));
    assert_eq!(r.comp.current_time(), 1.0);
    assert!(r.comp.set_playback_rate(f64::INFINITY).is_err());
}

#[test]
fn preload_loads_without_starting_playback() {
    let mut r = rig(0);
    r.comp.set_playlist(single()).unwrap();
    r.comp.preload().unwrap();
    assert_eq!(r.comp.state(), PlaybackState::Idle);
    assert_eq!(r.comp.current_time(), 0.0);
    assert_eq!(r.comp.instance_ids(), ["v1"]);
    let calls = r.journal.borrow().calls_for("v1");
    assert_eq!(calls.last(), Some(&SourceCall::Pause));
}

#[test]
fn unsupported_type_is_returned_from_seek() {
    let mut r = rig(0);
    let p = PlaylistBuilder::new()
        .track([SegmentDef {
            type_tag: Some("hologram".into()),
            ..seg("h", 0.0, 1.0)
        }])
        .build();
    let err = r.comp.set_playlist(p.unwrap()).unwrap_err();
    assert!(matches!(err, PlaybackError::UnsupportedSegmentType { .. }));
}

struct CountingListener {
    renders: Cell<usize>,
}

impl SegmentListener for CountingListener {
    fn on_render(&self, _segment_id: &str) {
        self.renders.set(self.renders.get() + 1);
    }
}

#[test]
fn segment_listeners_attach_before_creation() {
    let mut r = rig(0);
    let l = Rc::new(CountingListener {
        renders: Cell::new(0),
    });
    let id = r.comp.register_segment_listener("v1", l.clone());
    r.comp.set_playlist(single()).unwrap();
    r.comp.play();
    r.comp.tick(0.1).unwrap();
    r.comp.tick(0.1).unwrap();
    assert_eq!(l.renders.get(), 2);
    assert!(r.comp.unregister_segment_listener(id));
    r.comp.tick(0.1).unwrap();
    assert_eq!(l.renders.get(), 2);
}

#[test]
fn active_transitions_follow_playhead() {
    let mut r = rig(0);
    let p = PlaylistBuilder::new()
        .track([seg("a", 0.0, 10.0)])
        .track([seg("b", 8.0, 10.0)])
        .transition("xfade", ["a", "b"])
        .build()
        .unwrap();
    r.comp.set_playlist(p).unwrap();
    assert!(r.comp.active_transitions().is_empty());
    r.comp.seek(9.0).unwrap();
    let t = r.comp.active_transitions();
    assert_eq!(t.len(), 1);
    assert_eq!(t[0].progress, 0.5);
}
