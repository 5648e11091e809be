use super::*;
use crate::playlist::dsl::PlaylistBuilder;
use crate::playlist::def::SegmentDef;
use crate::timeline::classify::classify;

fn seg(id: &str, start: f64, duration: f64) -> SegmentDef {
    SegmentDef::video(id, start, duration).with_src(format!("{id}.mp4"))
}

fn crossfade() -> Playlist {
    PlaylistBuilder::new()
        .track([seg("a", 0.0, 10.0)])
        .track([seg("b", 8.0, 10.0)])
        .transition("xfade", ["a", "b"])
        .build()
        .unwrap()
}

#[test]
fn halfway_through_overlap() {
    let p = crossfade();
    let c = classify(&p, 9.0);
    let active = active_transitions(&p, &c, 9.0);
    assert_eq!(active.len(), 1);
    let t = &active[0];
    assert_eq!(t.id, "xfade");
    assert_eq!(t.overlap_start, 8.0);
    assert_eq!(t.overlap_end, 10.0);
    assert_eq!(t.progress, 0.5);
    assert_eq!(t.input_index("b"), Some(1));
    assert_eq!(t.input_index("zzz"), None);
}

#[test]
fn inactive_unless_all_inputs_play() {
    let p = crossfade();
    for at in [2.0, 10.0, 12.0] {
        let c = classify(&p, at);
        assert!(active_transitions(&p, &c, at).is_empty(), "at {at}");
    }
}

#[test]
fn multiple_transitions_in_declaration_order() {
    let p = PlaylistBuilder::new()
        .track([seg("a", 0.0, 10.0)])
        .track([seg("b", 5.0, 10.0)])
        .track([seg("c", 6.0, 10.0)])
        .transition("second", ["b", "c"])
        .transition("first", ["a", "b"])
        .transition("idle", ["a", "missing"])
        .build()
        .unwrap();
    let c = classify(&p, 7.0);
    let active = active_transitions(&p, &c, 7.0);
    let ids: Vec<_> = active.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["second", "first"]);
    assert_eq!(active[1].progress, 0.4);
}

#[test]
fn empty_window_does_not_divide_by_zero() {
    assert_eq!(overlap_progress(5.0, 5.0, 4.0), 0.0);
    assert_eq!(overlap_progress(5.0, 5.0, 5.0), 1.0);
    assert_eq!(overlap_progress(5.0, 3.0, 4.0), 1.0);
}

#[test]
fn progress_is_unclamped_until_asked() {
    let t = ActiveTransition {
        id: "t".into(),
        inputs: SmallVec::new(),
        overlap_start: 0.0,
        overlap_end: 1.0,
        progress: overlap_progress(0.0, 1.0, 1.5),
    };
    assert_eq!(t.progress, 1.5);
    assert_eq!(t.clamped_progress(), 1.0);
}
