#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scalet::{Entropy, Scalet, SignalExtension, WaveletFamily};

#[derive(Arbitrary, Debug)]
struct Data {
    length: u8,
    levels: u8,
    order: u8,
    entropy: u8,
    periodic: bool,
}

fuzz_target!(|data: Data| {
    if data.length == 0 || data.levels == 0 {
        return;
    }
    let length = data.length as usize;
    let order = 1 + data.order as usize % 10;
    let bank = Scalet::make_filter_bank_f32(WaveletFamily::Daubechies, order).unwrap();
    let Ok(mut engine) = Scalet::make_packet_f32(bank, length, data.levels as usize % 6) else {
        return;
    };
    if data.periodic {
        engine.configure_extension(SignalExtension::Periodic);
    }
    let entropy = match data.entropy % 4 {
        0 => Entropy::Shannon,
        1 => Entropy::Threshold(0.1),
        2 => Entropy::Norm(1.5),
        _ => Entropy::LogEnergy,
    };
    engine.configure_entropy(entropy).unwrap();
    let mut signal = vec![0.; length];
    for (i, dst) in signal.iter_mut().enumerate() {
        *dst = (i % 5) as f32 - 2.;
    }
    let decomposition = engine.forward(&signal).unwrap();
    _ = engine.inverse(&decomposition).unwrap();
});
