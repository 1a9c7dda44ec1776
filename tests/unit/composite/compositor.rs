use super::*;
use crate::{
    foundation::core::{Delay, TRANSPARENT},
    foundation::error::GifFramesError,
    frame::indexed::{DisposalMode, Palette},
};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

fn full(canvas: Canvas, index: u8, palette: Palette) -> IndexedFrame {
    IndexedFrame {
        rect: canvas.full_rect(),
        indices: vec![index; canvas.pixel_count()],
        palette,
        transparent: None,
        disposal: DisposalMode::RetainBackground,
        delay: Delay(10),
    }
}

#[test]
fn border_strips_cover_complement() {
    let canvas = Canvas::new(10, 8).unwrap();
    let rect = PixelRect::new(2, 3, 4, 2);
    let strips = border_strips(rect, canvas);
    assert_eq!(
        strips.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
        vec![
            BorderSide::Top,
            BorderSide::Left,
            BorderSide::Right,
            BorderSide::Bottom
        ]
    );
    let covered: usize = strips.iter().map(|(_, r)| r.area()).sum();
    assert_eq!(covered + rect.area(), canvas.pixel_count());
    for (_, s) in &strips {
        assert!(!s.intersects(rect));
    }
}

#[test]
fn border_strips_skip_degenerate_sides() {
    let canvas = Canvas::new(4, 4).unwrap();
    assert!(border_strips(canvas.full_rect(), canvas).is_empty());

    let top_left = border_strips(PixelRect::new(0, 0, 2, 2), canvas);
    assert_eq!(
        top_left.iter().map(|(s, _)| *s).collect::<Vec<_>>(),
        vec![BorderSide::Right, BorderSide::Bottom]
    );

    let empty = border_strips(PixelRect::EMPTY, canvas);
    assert_eq!(empty.len(), 1);
    assert_eq!(empty[0], (BorderSide::Bottom, canvas.full_rect()));
}

#[test]
fn empty_sequence_is_not_an_error() {
    let canvas = Canvas::new(4, 4).unwrap();
    let out = composite_with(&[], canvas, &TileScheduler::serial()).unwrap();
    assert!(out.is_empty());
}

#[test]
fn rect_outside_canvas_fails_before_any_work() {
    let canvas = Canvas::new(4, 4).unwrap();
    let palette = Palette::new(vec![RED]).unwrap();
    let good = full(canvas, 0, palette.clone());
    let bad = IndexedFrame {
        rect: PixelRect::new(3, 3, 2, 2),
        indices: vec![0; 4],
        ..good.clone()
    };
    let err = composite_with(&[good, bad], canvas, &TileScheduler::serial()).unwrap_err();
    match err {
        GifFramesError::InvalidGeometry(msg) => assert!(msg.starts_with("frame 1:")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn sub_rect_inherits_canvas_outside_and_draws_inside() {
    let canvas = Canvas::new(4, 4).unwrap();
    let first = full(canvas, 0, Palette::new(vec![RED]).unwrap());
    let second = IndexedFrame {
        rect: PixelRect::new(1, 1, 2, 1),
        indices: vec![0, 0],
        palette: Palette::new(vec![BLUE]).unwrap(),
        transparent: None,
        disposal: DisposalMode::RetainPrevious,
        delay: Delay(10),
    };
    let out = composite_with(&[first, second], canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out.len(), 2);
    assert!(out[0].data.chunks_exact(4).all(|p| p == RED));
    for y in 0..4 {
        for x in 0..4 {
            let expect = if y == 1 && (x == 1 || x == 2) {
                BLUE
            } else {
                RED
            };
            assert_eq!(out[1].pixel(x, y), expect, "pixel {x},{y}");
        }
    }
}

#[test]
fn transparent_index_reveals_background_and_leaves_it_untouched() {
    let canvas = Canvas::new(2, 1).unwrap();
    let first = full(canvas, 0, Palette::new(vec![RED]).unwrap());
    let second = IndexedFrame {
        rect: canvas.full_rect(),
        indices: vec![0, 1],
        palette: Palette::with_transparent_slot(vec![GREEN]).unwrap(),
        transparent: Some(1),
        disposal: DisposalMode::RetainPrevious,
        delay: Delay(10),
    };
    let third = IndexedFrame {
        indices: vec![1, 1],
        ..second.clone()
    };
    let out = composite_with(&[first, second, third], canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out[1].pixel(0, 0), GREEN);
    assert_eq!(out[1].pixel(1, 0), RED);
    assert_eq!(out[2].pixel(0, 0), GREEN);
    assert_eq!(out[2].pixel(1, 0), RED);
}

#[test]
fn slot_without_marker_is_drawn_literally() {
    let canvas = Canvas::new(1, 1).unwrap();
    let first = full(canvas, 0, Palette::new(vec![RED]).unwrap());
    let second = full(
        canvas,
        1,
        Palette::with_transparent_slot(vec![GREEN]).unwrap(),
    );
    let out = composite_with(&[first, second], canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out[1].pixel(0, 0), TRANSPARENT);
}

#[test]
fn empty_frame_repeats_previous_output() {
    let canvas = Canvas::new(3, 3).unwrap();
    let first = full(canvas, 0, Palette::new(vec![BLUE]).unwrap());
    let second = IndexedFrame::empty(DisposalMode::RetainPrevious, Delay(10));
    let out = composite_with(&[first, second], canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out[0], out[1]);
}

#[test]
fn parallel_tiles_match_serial() {
    let canvas = Canvas::new(37, 29).unwrap();
    let palette = Palette::with_transparent_slot(vec![RED, GREEN, BLUE]).unwrap();
    let mut frames = vec![full(canvas, 0, palette.clone())];
    for k in 0..3u32 {
        let rect = PixelRect::new(k * 3, k * 2, 30 - k * 4, 25 - k * 5);
        let indices = (0..rect.area()).map(|i| ((i as u32 + k) % 4) as u8).collect();
        frames.push(IndexedFrame {
            rect,
            indices,
            palette: palette.clone(),
            transparent: Some(3),
            disposal: DisposalMode::RetainPrevious,
            delay: Delay(4),
        });
    }

    let serial = composite_with(&frames, canvas, &TileScheduler::serial()).unwrap();
    let par = TileScheduler::new(&Threading {
        parallel: true,
        threads: Some(4),
        min_tile_side: 4,
    })
    .unwrap();
    assert_eq!(par.plan(frames[1].rect).len(), 4);
    let parallel = composite_with(&frames, canvas, &par).unwrap();
    assert_eq!(serial, parallel);
}
