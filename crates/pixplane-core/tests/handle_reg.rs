//! Depth-erased handle regression test
//!
//! Destination slots are reused when their layout already matches, depth
//! conversion clips, and the info printout stays stable.

use pixplane_core::{
    AnyImage, Depth, Format, Image, ImageSpec, ImageVisitor, Rect, Sample, Size,
    ensure_compatible, ensure_compatible_with,
};
use pixplane_test::{RegParams, constant_image, ramp_image};

/// Sum of channel 0 over the ROI, in `f64`
struct RoiSum;

impl ImageVisitor for RoiSum {
    type Output = f64;

    fn visit<T: Sample>(self, image: &Image<T>) -> f64 {
        match image.view(0) {
            Ok(view) => view.iter().map(|v| v.to_f64_lossy()).sum(),
            Err(_) => f64::NAN,
        }
    }
}

#[test]
fn ensure_compatible_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("ensure_compatible");

    let mut references = Vec::new();
    for depth in Depth::ALL {
        for (format, channels) in [(Format::Gray, 1), (Format::Lab, 3), (Format::Matrix, 5)] {
            let roi = Rect::new(1, 2, 3, 3);
            let size = Size::new(6, 5);
            references.push(
                pixplane_core::make(depth, size, format, Some(channels), Some(roi)).unwrap(),
            );
        }
    }

    // --- Test 1: second call with the same reference never allocates ---
    for reference in &references {
        let mut slot = None;
        rp.compare_values(
            1.0,
            ensure_compatible(&mut slot, reference).unwrap() as u8 as f64,
            0.0,
        );
        rp.compare_values(
            0.0,
            ensure_compatible(&mut slot, reference).unwrap() as u8 as f64,
            0.0,
        );
        let out = slot.as_ref().unwrap();
        rp.compare_values(
            1.0,
            (ImageSpec::of(out) == ImageSpec::of(reference)) as u8 as f64,
            0.0,
        );
    }

    // --- Test 2: a slot reused across every reference ends up matching ---
    let mut slot: Option<AnyImage> = None;
    for reference in references.iter().chain(references.iter().rev()) {
        ensure_compatible(&mut slot, reference).unwrap();
        let out = slot.as_ref().unwrap();
        rp.compare_values(
            1.0,
            (ImageSpec::of(out) == ImageSpec::of(reference)) as u8 as f64,
            0.0,
        );
    }

    // --- Test 3: an ROI change alone does not allocate ---
    let reference = &references[0];
    let mut slot = None;
    ensure_compatible(&mut slot, reference).unwrap();
    let mut spec = ImageSpec::of(reference);
    spec.roi = Rect::new(0, 0, 6, 5);
    rp.compare_values(
        0.0,
        ensure_compatible_with(&mut slot, &spec).unwrap() as u8 as f64,
        0.0,
    );
    rp.compare_values(1.0, slot.as_ref().unwrap().roi().area() as f64 / 30.0, 0.0);

    assert!(rp.cleanup(), "ensure_compatible regression test failed");
}

#[test]
fn convert_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("convert");

    // --- Test 1: widening and back is lossless ---
    let src = ramp_image(Depth::U8, 16, 16, Format::Gray).unwrap();
    let wide = src.convert(Depth::F64).unwrap();
    let back = wide.convert(Depth::U8).unwrap();
    rp.compare_images(&src, &back);

    // --- Test 2: narrowing saturates ---
    let big = ramp_image(Depth::I32, 40, 10, Format::Gray).unwrap();
    let narrow = big.convert(Depth::U8).unwrap();
    let typed = narrow.as_image::<u8>().unwrap();
    rp.compare_values(39.0, typed.pixel(39, 0, 0).unwrap() as f64, 0.0);
    rp.compare_values(255.0, typed.pixel(39, 9, 0).unwrap() as f64, 0.0);
    let negative = constant_image(Depth::F32, 3, 3, Format::Gray, -12.5).unwrap();
    let clipped = negative.convert(Depth::U8).unwrap();
    rp.compare_values(
        0.0,
        clipped.as_image::<u8>().unwrap().pixel(1, 1, 0).unwrap() as f64,
        0.0,
    );

    // --- Test 3: depth-generic code through a visitor ---
    let mut img = constant_image(Depth::I16, 8, 8, Format::Gray, 3.0).unwrap();
    img.set_roi(Rect::new(2, 2, 4, 5)).unwrap();
    rp.compare_values(60.0, img.visit(RoiSum), 0.0);
    for depth in Depth::ALL {
        let converted = img.convert(depth).unwrap();
        rp.compare_values(60.0, converted.visit(RoiSum), 0.0);
    }

    assert!(rp.cleanup(), "convert regression test failed");
}

#[test]
fn info_reg() {
    let mut rp = RegParams::new("info");

    let mut img =
        pixplane_core::make(Depth::F32, Size::new(12, 8), Format::Yuv, None, None).unwrap();
    img.set_roi(Rect::new(2, 1, 8, 6)).unwrap();
    let copy = img.shallow_copy();

    let mut text = Vec::new();
    img.write_info(&mut text, "yuv").unwrap();
    copy.write_info(&mut text, "copy").unwrap();
    rp.write_data_and_check(&text, "txt").unwrap();

    let printed = String::from_utf8(text).unwrap();
    rp.compare_values(1.0, printed.contains("size = 12x8") as u8 as f64, 0.0);
    rp.compare_values(
        1.0,
        printed.contains("Shared { refs: 2 }") as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "info regression test failed");
}
