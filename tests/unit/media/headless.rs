use super::*;
use crate::media::factory::FactoryRegistry;
use crate::playlist::def::{PlaylistDef, SegmentDef};
use crate::playlist::model::Playlist;

fn playlist() -> Playlist {
    Playlist::from_def(&PlaylistDef {
        tracks: vec![vec![
            SegmentDef::video("v", 0.0, 2.0).with_src("v.mp4"),
            SegmentDef::canvas("c", 2.0, 2.0)
                .with_element(ElementHandle(9))
                .with_size(320, 240),
            SegmentDef {
                type_tag: Some("hologram".into()),
                ..SegmentDef::video("h", 4.0, 1.0).with_src("h.bin")
            },
        ]],
        ..PlaylistDef::default()
    })
    .unwrap()
}

#[test]
fn becomes_ready_after_configured_polls() {
    let p = playlist();
    let factory = HeadlessFactory::new(2);
    let mut s = factory
        .create(SegmentKind::Video, p.segment("v").unwrap())
        .unwrap();
    assert!(!s.is_ready());
    assert!(!s.load().unwrap());
    assert!(!s.is_ready());
    assert!(!s.is_ready());
    assert!(s.is_ready());
    s.destroy();
    assert!(!s.is_ready());
}

#[test]
fn zero_delay_loads_synchronously() {
    let p = playlist();
    let factory = HeadlessFactory::default();
    let mut s = factory
        .create(SegmentKind::Video, p.segment("v").unwrap())
        .unwrap();
    assert!(s.load().unwrap());
    assert!(s.is_ready());
    assert!(s.audio_element().is_some());
}

#[test]
fn canvas_uses_segment_size_and_has_no_audio() {
    let p = playlist();
    let registry = FactoryRegistry::headless();
    let s = registry.create(p.segment("c").unwrap()).unwrap();
    assert_eq!(s.resolution(), Resolution::new(320, 240));
    assert_eq!(s.audio_element(), None);
}

#[test]
fn registry_rejects_unknown_and_unregistered_kinds() {
    let p = playlist();
    let err = FactoryRegistry::headless()
        .create(p.segment("h").unwrap())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        crate::PlaybackError::UnsupportedSegmentType { .. }
    ));

    let empty = FactoryRegistry::new();
    assert!(!empty.supports(SegmentKind::Video));
    assert!(empty.create(p.segment("v").unwrap()).is_err());
}

#[test]
fn journal_records_calls_in_order() {
    let p = playlist();
    let factory = HeadlessFactory::default();
    let journal = factory.journal();
    let mut s = factory
        .create(SegmentKind::Video, p.segment("v").unwrap())
        .unwrap();
    s.load().unwrap();
    s.seek(1.5);
    s.play();
    s.pause();
    s.destroy();
    assert_eq!(
        journal.borrow().calls_for("v"),
        [
            SourceCall::Create,
            SourceCall::Load,
            SourceCall::Seek(1.5),
            SourceCall::Play,
            SourceCall::Pause,
            SourceCall::Destroy,
        ]
    );
}
