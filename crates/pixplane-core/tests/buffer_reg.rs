//! Channel sharing regression test
//!
//! Shallow copies alias channel storage, detach makes it private again, and
//! structural edits never copy sample data.

use pixplane_core::{Depth, Format, Image, Ownership, Size, make};
use pixplane_test::{RegParams, ramp_image};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn buffer_reg() {
    init_logger();
    let mut rp = RegParams::new("buffer");

    // --- Test 1: aliased writes are visible through every shallow copy ---
    let mut a = Image::<i16>::with_format(Size::new(6, 4), Format::Rgb).unwrap();
    a.fill(7).unwrap();
    let mut b = a.shallow_copy();
    for ch in 0..3 {
        rp.compare_values(
            2.0,
            match a.ownership(ch).unwrap() {
                Ownership::Shared { refs } => refs as f64,
                _ => 0.0,
            },
            0.0,
        );
    }
    b.channel_data_aliased(1).unwrap()[5] = -300;
    rp.compare_values(-300.0, a.pixel(5, 0, 1).unwrap() as f64, 0.0);
    {
        let mut view = a.view_aliased(2).unwrap();
        for v in view.iter_mut() {
            *v = 11;
        }
    }
    rp.compare_values(11.0, b.pixel(3, 3, 2).unwrap() as f64, 0.0);

    // --- Test 2: exclusive writes are refused while aliased ---
    rp.compare_values(1.0, a.set_pixel(0, 0, 0, 1).is_err() as u8 as f64, 0.0);
    rp.compare_values(1.0, b.channel_data_mut(0).is_err() as u8 as f64, 0.0);

    // --- Test 3: detach gives independent storage ---
    b.detach().unwrap();
    rp.compare_values(1.0, b.is_exclusive() as u8 as f64, 0.0);
    b.set_pixel(0, 0, 0, 99).unwrap();
    rp.compare_values(7.0, a.pixel(0, 0, 0).unwrap() as f64, 0.0);
    rp.compare_values(99.0, b.pixel(0, 0, 0).unwrap() as f64, 0.0);
    // a is now the only holder left and may write exclusively
    rp.compare_values(1.0, a.set_pixel(0, 0, 0, 1).is_ok() as u8 as f64, 0.0);

    // --- Test 4: fill on a shared image detaches first ---
    let mut c = a.shallow_copy();
    c.fill(-1).unwrap();
    rp.compare_values(1.0, a.pixel(0, 0, 0).unwrap() as f64, 0.0);
    rp.compare_values(-1.0, c.pixel(0, 0, 0).unwrap() as f64, 0.0);

    // --- Test 5: channel edits share instead of copying ---
    let mut gray = Image::<i16>::with_format(Size::new(6, 4), Format::Gray).unwrap();
    gray.append_channel(&mut a, 2).unwrap();
    rp.compare_values(2.0, gray.channels() as f64, 0.0);
    rp.compare_values(1.0, (gray.format() == Format::Matrix) as u8 as f64, 0.0);
    let before = a.channel_ptr_range(2).unwrap();
    let after = gray.channel_ptr_range(1).unwrap();
    rp.compare_values(1.0, (before == after) as u8 as f64, 0.0);

    // --- Test 6: resize reallocates only on a size change ---
    let mut img = ramp_image(Depth::F32, 8, 8, Format::Gray).unwrap();
    let ptr = img.as_image::<f32>().unwrap().channel_ptr_range(0).unwrap();
    img.resize(Size::new(8, 8)).unwrap();
    let same = img.as_image::<f32>().unwrap().channel_ptr_range(0).unwrap();
    rp.compare_values(1.0, (ptr == same) as u8 as f64, 0.0);
    img.resize(Size::new(3, 5)).unwrap();
    let resized = img.as_image::<f32>().unwrap().channel_data(0).unwrap().len();
    rp.compare_values(15.0, resized as f64, 0.0);
    rp.compare_values(15.0, img.roi().area() as f64, 0.0);

    assert!(rp.cleanup(), "buffer regression test failed");
}

#[test]
fn external_planes_reg() {
    init_logger();
    let mut rp = RegParams::new("external_planes");

    let mut r = vec![1u8; 12];
    let mut g = vec![2u8; 12];
    let mut bl = vec![3u8; 12];
    {
        let planes = [r.as_mut_ptr(), g.as_mut_ptr(), bl.as_mut_ptr()];
        // SAFETY: the vectors outlive the image and are not touched while it lives
        let mut img = unsafe { Image::from_shared(&planes, Size::new(4, 3), Format::Rgb) }.unwrap();
        rp.compare_values(
            1.0,
            matches!(img.ownership(0).unwrap(), Ownership::Borrowed { .. }) as u8 as f64,
            0.0,
        );
        img.set_pixel(1, 1, 0, 200).unwrap();

        // a deep copy owns its samples
        let mut copy = img.deep_copy().unwrap();
        copy.set_pixel(0, 0, 1, 50).unwrap();
        let owned = matches!(copy.ownership(1).unwrap(), Ownership::Owned);
        rp.compare_values(1.0, owned as u8 as f64, 0.0);
    }
    rp.compare_values(200.0, r[5] as f64, 0.0);
    rp.compare_values(2.0, g[0] as f64, 0.0);

    // depth-erased construction agrees with the typed one
    let any = make(Depth::U8, Size::new(4, 3), Format::Rgb, None, None).unwrap();
    rp.compare_values(3.0, any.channels() as f64, 0.0);

    assert!(rp.cleanup(), "external planes regression test failed");
}
