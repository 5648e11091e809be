use super::*;
use crate::playlist::def::{PlaylistDef, SegmentDef};

fn sample() -> Playlist {
    Playlist::from_def(&PlaylistDef {
        tracks: vec![
            vec![
                SegmentDef::video("a", 0.0, 5.0).with_src("a.mp4"),
                SegmentDef::video("b", 5.0, 5.0).with_src("b.mp4"),
            ],
            vec![SegmentDef::image("c", 2.0, 4.0).with_src("c.png")],
        ],
        ..PlaylistDef::default()
    })
    .unwrap()
}

#[test]
fn blocks_scale_with_time_and_rows() {
    let o = timeline_overview(&sample(), Size::new(100.0, 40.0), None);
    assert_eq!(o.blocks.len(), 3);
    assert_eq!(o.blocks[0].rect, Rect::new(0.0, 0.0, 50.0, 20.0));
    assert_eq!(o.blocks[1].rect, Rect::new(50.0, 0.0, 100.0, 20.0));
    assert_eq!(o.blocks[2].rect, Rect::new(20.0, 20.0, 60.0, 40.0));
    assert!(o.playhead.is_none());
}

#[test]
fn colors_alternate_within_a_track() {
    let o = timeline_overview(&sample(), Size::new(100.0, 40.0), None);
    assert_ne!(o.blocks[0].color, o.blocks[1].color);
    assert_eq!(o.blocks[0].color, kind_colors(SegmentKind::Video)[0]);
    assert_eq!(o.blocks[2].color, kind_colors(SegmentKind::Image)[0]);
}

#[test]
fn playhead_marker_is_one_pixel_wide() {
    let o = timeline_overview(&sample(), Size::new(100.0, 40.0), Some(2.5));
    let m = o.playhead.unwrap();
    assert_eq!(m, Rect::new(25.0, 0.0, 26.0, 40.0));
    assert_eq!(o.playhead_color(), PLAYHEAD_COLOR);

    let o = timeline_overview(&sample(), Size::new(100.0, 40.0), Some(11.0));
    assert!(o.playhead.is_none());
}

#[test]
fn empty_playlist_has_no_blocks() {
    let p = Playlist::from_def(&PlaylistDef::default()).unwrap();
    let o = timeline_overview(&p, Size::new(100.0, 40.0), Some(0.0));
    assert!(o.blocks.is_empty());
    assert!(o.playhead.is_none());
}
