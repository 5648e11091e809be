use super::*;
use crate::playlist::def::{PlaylistDef, SegmentDef};

fn seg(id: &str, start: f64, duration: f64) -> SegmentDef {
    SegmentDef::video(id, start, duration).with_src(format!("{id}.mp4"))
}

fn playlist(tracks: Vec<Vec<SegmentDef>>) -> Playlist {
    Playlist::from_def(&PlaylistDef {
        tracks,
        ..PlaylistDef::default()
    })
    .unwrap()
}

fn ids(v: &[TrackedSegment<'_>]) -> Vec<String> {
    v.iter().map(|t| t.segment.id.clone()).collect()
}

#[test]
fn single_segment_mid_playback() {
    let p = playlist(vec![vec![seg("v1", 0.0, 4.0)]]);
    let c = classify(&p, 2.0);
    assert_eq!(ids(&c.currently_playing), ["v1"]);
    assert!(c.to_play.is_empty());
    assert!(c.finished.is_empty());
    assert_eq!(p.duration(), 4.0);
}

#[test]
fn boundary_belongs_to_the_next_segment() {
    let p = playlist(vec![vec![seg("a", 0.0, 4.0), seg("b", 4.0, 4.0)]]);
    let c = classify(&p, 4.0);
    assert_eq!(ids(&c.finished), ["a"]);
    assert_eq!(ids(&c.currently_playing), ["b"]);
    assert!(c.to_play.is_empty());

    let c = classify(&p, 8.0);
    assert_eq!(ids(&c.finished), ["a", "b"]);
    assert!(c.is_exhausted());
}

#[test]
fn zero_duration_segment_is_never_playing() {
    let p = playlist(vec![vec![seg("z", 1.0, 0.0)]]);
    assert_eq!(ids(&classify(&p, 0.5).to_play), ["z"]);
    assert_eq!(ids(&classify(&p, 1.0).finished), ["z"]);
}

#[test]
fn to_play_is_sorted_by_start_across_tracks() {
    let p = playlist(vec![
        vec![seg("a", 5.0, 1.0), seg("b", 9.0, 1.0)],
        vec![seg("c", 2.0, 1.0), seg("d", 5.0, 1.0)],
    ]);
    let c = classify(&p, 0.0);
    assert_eq!(ids(&c.to_play), ["c", "a", "d", "b"]);
    assert_eq!(c.to_play[1].track_index, 0);
    assert_eq!(c.to_play[2].track_index, 1);
}

#[test]
fn currently_playing_keeps_track_order() {
    let p = playlist(vec![
        vec![seg("top", 0.0, 10.0)],
        vec![seg("mid", 0.0, 10.0)],
        vec![seg("bottom", 0.0, 10.0)],
    ]);
    let c = classify(&p, 3.0);
    assert_eq!(ids(&c.currently_playing), ["top", "mid", "bottom"]);
    assert!(c.is_playing("mid"));
    assert!(!c.is_playing("nope"));
}

#[test]
fn partition_covers_every_segment_exactly_once() {
    let p = playlist(vec![
        vec![seg("a", 0.0, 2.0), seg("b", 2.0, 3.0), seg("c", 7.0, 0.0)],
        vec![seg("d", 1.0, 4.0), seg("e", 6.0, 2.5)],
    ]);
    let total = p.segments().count();
    let mut t = -1.0;
    while t <= 10.0 {
        let c = classify(&p, t);
        assert_eq!(c.len(), total, "at {t}");
        let mut all: Vec<_> = ids(&c.to_play);
        all.extend(ids(&c.currently_playing));
        all.extend(ids(&c.finished));
        all.sort();
        all.dedup();
        assert_eq!(all.len(), total, "at {t}");
        t += 0.25;
    }
}

#[test]
fn phase_follows_the_segment_span() {
    let p = playlist(vec![vec![seg("a", 2.0, 3.0)]]);
    let s = p.segment("a").unwrap();
    for t in [1.0, 2.0, 4.999, 5.0, 6.0] {
        let expected = if s.span().contains(t) {
            SegmentPhase::Playing
        } else if t < s.span().start {
            SegmentPhase::ToPlay
        } else {
            SegmentPhase::Finished
        };
        assert_eq!(phase_at(s, t), expected, "at {t}");
    }
    assert_eq!(phase_at(s, 5.0), SegmentPhase::Finished);
    assert_eq!(s.end(), s.span().end);
}
