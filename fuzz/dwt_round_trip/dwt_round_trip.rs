#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scalet::{
    ConvolutionMethod, Scalet, SignalExtension, TransformMethod, supported_wavelets,
};

#[derive(Arbitrary, Debug)]
struct Data {
    length: u8,
    levels: u8,
    wavelet: u8,
    method: u8,
    periodic: bool,
    fft: bool,
}

fuzz_target!(|data: Data| {
    if data.length == 0 || data.levels == 0 {
        return;
    }
    let wavelets = supported_wavelets();
    let (family, order) = wavelets[data.wavelet as usize % wavelets.len()];
    let method = match data.method % 3 {
        0 => TransformMethod::Dwt,
        1 => TransformMethod::Swt,
        _ => TransformMethod::Modwt,
    };
    let length = data.length as usize;
    let bank = Scalet::make_filter_bank_f64(family, order).unwrap();
    let Ok(mut engine) = Scalet::make_dwt_f64(bank, length, method, data.levels as usize % 8)
    else {
        return;
    };
    if method == TransformMethod::Dwt && data.periodic {
        engine
            .configure_extension(SignalExtension::Periodic)
            .unwrap();
    }
    if method != TransformMethod::Modwt && data.fft {
        engine.configure_convolution(ConvolutionMethod::Fft).unwrap();
    }
    let mut signal = vec![0.; length];
    for (i, dst) in signal.iter_mut().enumerate() {
        *dst = i as f64 / length as f64;
    }
    let coefficients = engine.forward(&signal).unwrap();
    let restored = engine.inverse(&coefficients).unwrap();
    for (a, b) in signal.iter().zip(restored.iter()) {
        assert!((a - b).abs() < 1e-7, "ref {a}, derived {b}");
    }
});
