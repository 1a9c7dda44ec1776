use super::*;

fn frame(rect: PixelRect, indices: Vec<u8>, palette: Palette) -> IndexedFrame {
    IndexedFrame {
        rect,
        indices,
        palette,
        transparent: None,
        disposal: DisposalMode::RetainPrevious,
        delay: Delay(10),
    }
}

#[test]
fn palette_slot_is_appended_transparent() {
    let p = Palette::with_transparent_slot(vec![[255, 0, 0, 255]]).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.transparent_slot(), Some(1));
    assert_eq!(p.get(1), Some(TRANSPARENT));
}

#[test]
fn palette_caps_at_256_entries() {
    assert!(Palette::new(vec![[0, 0, 0, 255]; 256]).is_ok());
    let err = Palette::new(vec![[0, 0, 0, 255]; 257]).unwrap_err();
    assert!(matches!(err, GifFramesError::PaletteOverflow(_)));

    let err = Palette::with_transparent_slot(vec![[0, 0, 0, 255]; 256]).unwrap_err();
    assert!(matches!(err, GifFramesError::PaletteOverflow(_)));
    assert!(Palette::with_transparent_slot(vec![[0, 0, 0, 255]; 255]).is_ok());
}

#[test]
fn validate_rejects_rect_outside_canvas() {
    let canvas = Canvas::new(4, 4).unwrap();
    let p = Palette::new(vec![[1, 1, 1, 255]]).unwrap();
    let f = frame(PixelRect::new(3, 0, 2, 1), vec![0, 0], p);
    assert!(matches!(
        f.validate(canvas),
        Err(GifFramesError::InvalidGeometry(_))
    ));
}

#[test]
fn validate_rejects_short_index_buffer() {
    let canvas = Canvas::new(4, 4).unwrap();
    let p = Palette::new(vec![[1, 1, 1, 255]]).unwrap();
    let f = frame(PixelRect::new(0, 0, 2, 2), vec![0, 0, 0], p);
    assert!(matches!(
        f.validate(canvas),
        Err(GifFramesError::InvalidGeometry(_))
    ));
}

#[test]
fn validate_rejects_out_of_range_indices() {
    let canvas = Canvas::new(4, 4).unwrap();
    let p = Palette::new(vec![[1, 1, 1, 255]]).unwrap();
    let f = frame(PixelRect::new(0, 0, 1, 2), vec![0, 1], p.clone());
    assert!(matches!(
        f.validate(canvas),
        Err(GifFramesError::Validation(_))
    ));

    let mut f = frame(PixelRect::new(0, 0, 1, 1), vec![0], p);
    f.transparent = Some(3);
    assert!(f.validate(canvas).is_err());
}

#[test]
fn empty_frame_is_valid() {
    let canvas = Canvas::new(4, 4).unwrap();
    IndexedFrame::empty(DisposalMode::RetainPrevious, Delay(5))
        .validate(canvas)
        .unwrap();
}
