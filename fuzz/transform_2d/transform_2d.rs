#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scalet::{Scalet, SubBand, TransformMethod, WaveletFamily};

#[derive(Arbitrary, Debug)]
struct Data {
    rows: u8,
    cols: u8,
    levels: u8,
    method: u8,
}

fuzz_target!(|data: Data| {
    if data.rows == 0 || data.cols == 0 || data.levels == 0 {
        return;
    }
    let (rows, cols) = (data.rows as usize % 64 + 1, data.cols as usize % 64 + 1);
    let method = match data.method % 3 {
        0 => TransformMethod::Dwt,
        1 => TransformMethod::Swt,
        _ => TransformMethod::Modwt,
    };
    let bank = Scalet::make_filter_bank_f64(WaveletFamily::Daubechies, 2).unwrap();
    let Ok(engine) = Scalet::make_2d_f64(bank, method, rows, cols, data.levels as usize % 4)
    else {
        return;
    };
    let mut image = vec![0.; rows * cols];
    for (i, dst) in image.iter_mut().enumerate() {
        *dst = (i % 17) as f64;
    }
    let sub_bands = engine.forward(&image).unwrap();
    for level in 1..=sub_bands.levels() {
        _ = sub_bands.extract_sub_band(level, SubBand::Diagonal).unwrap();
    }
    _ = engine.inverse(&sub_bands, (rows, cols)).unwrap();
});
