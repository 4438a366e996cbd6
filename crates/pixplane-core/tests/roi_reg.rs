//! ROI traversal regression test
//!
//! Every sample inside the ROI is visited exactly once in row-major order,
//! nothing outside it is touched, and windows around ROI positions read the
//! expected neighbors.

use pixplane_core::{Depth, Format, Point, Rect, RoiIter, Size};
use pixplane_test::{RegParams, ramp_image};

#[test]
fn roi_reg() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rp = RegParams::new("roi");

    // ramp: sample at (x, y) is x + y * 9
    let mut img = ramp_image(Depth::I32, 9, 7, Format::Gray).unwrap();

    // --- Test 1: exhaustive, ordered, in-bounds visitation ---
    let rois = [
        Rect::new(0, 0, 9, 7),
        Rect::new(2, 1, 4, 3),
        Rect::new(8, 6, 1, 1),
        Rect::new(0, 3, 9, 1),
        Rect::new(5, 0, 1, 7),
    ];
    for roi in rois {
        img.set_roi(roi).unwrap();
        let typed = img.as_image::<i32>().unwrap();
        let view = typed.view(0).unwrap();
        let visited: Vec<(Point, i32)> = view
            .iter()
            .with_positions()
            .map(|(p, &v)| (p, v))
            .collect();

        rp.compare_values(roi.area() as f64, visited.len() as f64, 0.0);
        let mut expected_order = true;
        let mut inside = true;
        for (i, (p, v)) in visited.iter().enumerate() {
            let ex = roi.x as i32 + (i as u32 % roi.width) as i32;
            let ey = roi.y as i32 + (i as u32 / roi.width) as i32;
            expected_order &= *p == Point::new(ex, ey) && *v == ex + ey * 9;
            inside &= roi.contains_point(*p);
        }
        rp.compare_values(1.0, expected_order as u8 as f64, 0.0);
        rp.compare_values(1.0, inside as u8 as f64, 0.0);

        // line iteration covers the same samples
        let from_rows: Vec<i32> = view.rows().flatten().copied().collect();
        let from_iter: Vec<i32> = visited.iter().map(|(_, v)| *v).collect();
        rp.compare_values(1.0, (from_rows == from_iter) as u8 as f64, 0.0);
    }

    // --- Test 2: ROI writes leave the outside untouched ---
    img.set_roi(Rect::new(3, 2, 3, 2)).unwrap();
    {
        let typed = img.as_image_mut::<i32>().unwrap();
        let mut view = typed.view_mut(0).unwrap();
        for v in view.iter_mut() {
            *v = -1;
        }
    }
    {
        let typed = img.as_image::<i32>().unwrap();
        let data = typed.channel_data(0).unwrap();
        let touched = data.iter().filter(|&&v| v == -1).count();
        rp.compare_values(6.0, touched as f64, 0.0);
        rp.compare_values(-1.0, typed.pixel(3, 2, 0).unwrap() as f64, 0.0);
        rp.compare_values(-1.0, typed.pixel(5, 3, 0).unwrap() as f64, 0.0);
        rp.compare_values(
            (6 + 2 * 9) as f64,
            typed.pixel(6, 2, 0).unwrap() as f64,
            0.0,
        );
        rp.compare_values(
            (3 + 4 * 9) as f64,
            typed.pixel(3, 4, 0).unwrap() as f64,
            0.0,
        );
    }

    // --- Test 3: invalid ROIs are rejected and the old one is kept ---
    img.set_roi(Rect::new(1, 1, 2, 2)).unwrap();
    rp.compare_values(
        1.0,
        img.set_roi(Rect::new(8, 0, 2, 1)).is_err() as u8 as f64,
        0.0,
    );
    rp.compare_values(
        1.0,
        img.set_roi(Rect::new(0, 5, 9, 3)).is_err() as u8 as f64,
        0.0,
    );
    rp.compare_values(1.0, (img.roi() == Rect::new(1, 1, 2, 2)) as u8 as f64, 0.0);

    // --- Test 4: windows around ROI positions ---
    let plane: Vec<u16> = (0..35).collect();
    let parent = RoiIter::new(&plane, 7, Rect::new(1, 1, 5, 3));
    let window: Vec<u16> = parent.window(Point::new(2, 2), Size::new(3, 3)).copied().collect();
    rp.compare_values(
        1.0,
        (window == vec![8, 9, 10, 15, 16, 17, 22, 23, 24]) as u8 as f64,
        0.0,
    );
    rp.compare_values(
        1.0,
        parent.checked_window(Point::new(1, 1), Size::new(3, 3)).is_none() as u8 as f64,
        0.0,
    );
    // even masks anchor at size / 2
    let even: Vec<u16> = parent.window(Point::new(3, 2), Size::new(2, 2)).copied().collect();
    rp.compare_values(1.0, (even == vec![9, 10, 16, 17]) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "roi regression test failed");
}
