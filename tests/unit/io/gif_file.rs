use super::*;
use crate::{
    composite::compositor::composite_with,
    encode::encoder::{EncodeOpts, encode_with_stats},
    encode::quantize::MedianCut,
    frame::raster::RasterFrame,
    schedule::tiles::TileScheduler,
};

const RED: Rgba8 = [255, 0, 0, 255];
const BLUE: Rgba8 = [0, 0, 255, 255];

fn encode_serial(frames: &[RasterFrame]) -> EncodedAnimation {
    let delays = vec![Delay(10); frames.len()];
    encode_with_stats(
        frames,
        &delays,
        &MedianCut::default(),
        &EncodeOpts::default(),
        &TileScheduler::serial(),
    )
    .unwrap()
    .0
}

fn through_bytes(anim: &EncodedAnimation) -> EncodedAnimation {
    let mut bytes = Vec::new();
    encode_gif(&mut bytes, anim).unwrap();
    decode_gif(bytes.as_slice()).unwrap()
}

#[test]
fn cropped_animation_survives_gif_bytes() {
    let canvas = Canvas::new(5, 4).unwrap();
    let a = RasterFrame::solid(canvas, RED);
    let mut b = a.clone();
    b.set_pixel(1, 1, BLUE);
    b.set_pixel(3, 2, BLUE);
    let mut c = b.clone();
    c.set_pixel(4, 3, [10, 200, 30, 255]);
    let frames = vec![a, b, c];

    let decoded = through_bytes(&encode_serial(&frames));
    assert_eq!(decoded.canvas, canvas);
    assert_eq!(decoded.frames.len(), 3);
    assert_eq!(decoded.frames[1].rect, PixelRect::new(1, 1, 3, 2));
    assert!(decoded.frames.iter().all(|f| f.delay == Delay(10)));

    let out = composite_with(&decoded.frames, decoded.canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out, frames);
}

#[test]
fn reveal_and_empty_frame_survive_gif_bytes() {
    let canvas = Canvas::new(2, 2).unwrap();
    let a = RasterFrame::solid(canvas, RED);
    let b = a.clone();
    let mut c = a.clone();
    c.set_pixel(1, 0, TRANSPARENT);
    let frames = vec![a, b, c];

    let decoded = through_bytes(&encode_serial(&frames));
    assert!(decoded.frames[1].rect.covers(canvas));
    assert_eq!(decoded.frames[1].disposal, DisposalMode::RetainBackground);
    assert_eq!(decoded.frames[2].transparent, None);

    let out = composite_with(&decoded.frames, decoded.canvas, &TileScheduler::serial()).unwrap();
    assert_eq!(out, frames);
}

#[test]
fn background_disposal_is_written_only_before_a_reset() {
    let canvas = Canvas::new(2, 1).unwrap();
    let full = |disposal, transparent| IndexedFrame {
        rect: canvas.full_rect(),
        indices: vec![0, 1],
        palette: Palette::with_transparent_slot(vec![RED]).unwrap(),
        transparent,
        disposal,
        delay: Delay(5),
    };
    let anim = EncodedAnimation {
        canvas,
        frames: vec![
            full(DisposalMode::RetainBackground, None),
            full(DisposalMode::RetainBackground, Some(1)),
            full(DisposalMode::RetainPrevious, None),
        ],
    };
    let decoded = through_bytes(&anim);
    let disposals: Vec<_> = decoded.frames.iter().map(|f| f.disposal).collect();
    assert_eq!(
        disposals,
        vec![
            DisposalMode::RetainPrevious,
            DisposalMode::RetainBackground,
            DisposalMode::RetainPrevious
        ]
    );
}

#[test]
fn oversized_canvas_is_rejected() {
    let anim = EncodedAnimation {
        canvas: Canvas::new(70_000, 1).unwrap(),
        frames: Vec::new(),
    };
    let err = encode_gif(Vec::new(), &anim).unwrap_err();
    assert!(matches!(err, GifFramesError::InvalidGeometry(_)));
}

#[test]
fn garbage_bytes_fail_to_decode() {
    let err = decode_gif(&b"not a gif"[..]).unwrap_err();
    assert!(matches!(err, GifFramesError::Other(_)));
}

#[test]
fn file_round_trip_through_disk() {
    let dir = std::path::PathBuf::from("target").join("unit_gif_file");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("anim.gif");

    let canvas = Canvas::new(3, 3).unwrap();
    let a = RasterFrame::solid(canvas, BLUE);
    let mut b = a.clone();
    b.set_pixel(2, 2, RED);
    let anim = encode_serial(&[a, b]);

    write_gif(&path, &anim).unwrap();
    let back = read_gif(&path).unwrap();
    assert_eq!(back.frames.len(), 2);
    assert_eq!(back.frames[1].rect, PixelRect::new(2, 2, 1, 1));
}

fn decode_with_image(bytes: Vec<u8>) -> Vec<Vec<u8>> {
    use image::AnimationDecoder as _;
    let decoder = image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes)).unwrap();
    decoder
        .into_frames()
        .collect_frames()
        .unwrap()
        .into_iter()
        .map(|f| f.into_buffer().into_raw())
        .collect()
}

#[test]
fn reveal_after_cropped_frame_clears_whole_canvas_in_other_decoders() {
    let canvas = Canvas::new(4, 4).unwrap();
    let a = RasterFrame::solid(canvas, RED);
    let mut b = a.clone();
    b.set_pixel(0, 0, BLUE);
    let mut c = b.clone();
    c.set_pixel(3, 3, TRANSPARENT);
    let frames = vec![a, b, c];

    let anim = encode_serial(&frames);
    assert_eq!(anim.frames[1].rect, PixelRect::new(0, 0, 1, 1));
    assert_eq!(anim.frames[1].disposal, DisposalMode::RetainBackground);

    let mut bytes = Vec::new();
    encode_gif(&mut bytes, &anim).unwrap();
    let rendered = decode_with_image(bytes);
    assert_eq!(rendered.len(), 3);
    for (i, (got, want)) in rendered.iter().zip(&frames).enumerate() {
        assert_eq!(got, &want.data, "frame {i}");
    }
}

#[test]
fn padding_adds_a_transparent_entry_when_the_palette_has_none() {
    let canvas = Canvas::new(3, 2).unwrap();
    let frame = IndexedFrame {
        rect: PixelRect::new(1, 1, 2, 1),
        indices: vec![0, 1],
        palette: Palette::new(vec![RED, BLUE]).unwrap(),
        transparent: None,
        disposal: DisposalMode::RetainBackground,
        delay: Delay(3),
    };
    let padded = pad_to_canvas(&frame, canvas).unwrap();
    assert!(padded.rect.covers(canvas));
    assert_eq!(padded.transparent, Some(2));
    assert_eq!(padded.palette.colors(), &[RED, BLUE, TRANSPARENT]);
    assert_eq!(padded.indices, vec![2, 2, 2, 2, 0, 1]);
}
