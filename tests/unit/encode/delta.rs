use super::*;

const RED: Rgba8 = [255, 0, 0, 255];
const BLUE: Rgba8 = [0, 0, 255, 255];

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn identical_frames_give_empty_region() {
    let a = RasterFrame::solid(canvas(4, 4), RED);
    let t = diff_frames(&a, &a.clone());
    assert!(!t.reset);
    assert_eq!(t.mask.changed_count(), 0);
    assert_eq!(t.region, PixelRect::EMPTY);
    assert!(extract_delta(&a, &t).pixels.is_empty());
}

#[test]
fn region_is_minimal_bounding_rect() {
    let a = RasterFrame::solid(canvas(8, 6), RED);
    let mut b = a.clone();
    b.set_pixel(2, 1, BLUE);
    b.set_pixel(5, 4, BLUE);
    let t = diff_frames(&a, &b);
    assert!(!t.reset);
    assert_eq!(t.mask.changed_count(), 2);
    assert_eq!(t.region, PixelRect::new(2, 1, 4, 4));
}

#[test]
fn extraction_keeps_marked_and_blanks_unmarked() {
    let a = RasterFrame::solid(canvas(4, 4), RED);
    let mut b = a.clone();
    b.set_pixel(0, 0, BLUE);
    b.set_pixel(1, 1, [0, 255, 0, 255]);
    let t = diff_frames(&a, &b);
    let d = extract_delta(&b, &t);
    assert_eq!(d.rect, PixelRect::new(0, 0, 2, 2));
    assert_eq!(
        d.pixels,
        vec![BLUE, TRANSPARENT, TRANSPARENT, [0, 255, 0, 255]]
    );
    assert!(!d.explicit);
    assert!(d.needs_transparent_slot());
}

#[test]
fn alpha_decrease_forces_full_reset() {
    let a = RasterFrame::solid(canvas(3, 3), RED);
    let mut b = a.clone();
    b.set_pixel(1, 1, [255, 0, 0, 200]);
    let t = diff_frames(&a, &b);
    assert!(t.reset);
    assert_eq!(t.mask.changed_count(), 9);
    assert_eq!(t.region, canvas(3, 3).full_rect());

    let d = extract_delta(&b, &t);
    assert!(d.explicit);
    assert_eq!(d.pixels[4], [255, 0, 0, 200]);
    assert_eq!(d.pixels[0], RED);
}

#[test]
fn alpha_increase_is_a_plain_change() {
    let a = RasterFrame::transparent(canvas(2, 2));
    let b = RasterFrame::solid(canvas(2, 2), BLUE);
    let t = diff_frames(&a, &b);
    assert!(!t.reset);
    assert_eq!(t.region, canvas(2, 2).full_rect());
}

#[test]
fn full_region_is_explicit() {
    let f = RasterFrame::solid(canvas(2, 3), BLUE);
    let d = DeltaRegion::full(&f);
    assert!(d.explicit);
    assert_eq!(d.pixels.len(), 6);
    assert!(!d.needs_transparent_slot());
}
