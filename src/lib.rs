/*
 * // Copyright (c) Radzivon Bartoshyk 10/2025. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
#![allow(clippy::excessive_precision)]

use num_traits::{AsPrimitive, MulAdd};
use std::fmt::{Debug, Display};
use std::sync::Arc;

mod biorthogonal;
mod coiflet;
mod convolve1d;
mod cwt;
mod daubechies;
mod decimated;
mod dwt;
mod entropy;
mod err;
mod extension;
mod factory;
mod filter_bank;
mod filter_padding;
mod mla;
mod modwt;
mod mother_wavelet;
mod packet;
mod scales;
mod symlets;
mod transform2d;
mod tree;
mod util;

pub use convolve1d::ConvolutionMethod;
pub use cwt::{CwtCoefficients, CwtEngine};
pub use dwt::{DwtEngine, TransformConfig, TransformMethod, WaveletCoefficients};
pub use entropy::Entropy;
pub use err::ScaletError;
pub use extension::SignalExtension;
pub use factory::MAX_STATIONARY_LEVELS;
pub use filter_bank::{FilterBank, WaveletFamily, supported_wavelets};
pub use mother_wavelet::{MAX_PAUL_ORDER, MotherWavelet};
pub use packet::{PacketDecomposition, WaveletPacketEngine};
pub use scales::{ScaleType, Scales};
pub use transform2d::{SubBand, SubBandLevel, SubBands2D, Transform2DEngine};
pub use tree::{PacketTree, WaveletTreeEngine};
pub use util::{dwt_length, idwt_length};

/// Sample type accepted by every engine, implemented for `f32` and `f64`.
pub trait WaveletSample:
    rustfft::FftNum
    + MulAdd<Self, Output = Self>
    + AsPrimitive<f64>
    + Default
    + Display
    + Debug
    + Send
    + Sync
    + 'static
{
    /// `1 / sqrt(2)`
    const FRAC_1_SQRT_2: Self;
}

impl WaveletSample for f32 {
    const FRAC_1_SQRT_2: Self = std::f32::consts::FRAC_1_SQRT_2;
}

impl WaveletSample for f64 {
    const FRAC_1_SQRT_2: Self = std::f64::consts::FRAC_1_SQRT_2;
}

/// One analysis/synthesis level shared by the 1D, packet and 2D engines.
pub(crate) trait SingleLevelStep<T> {
    /// Splits `input` into `approx` and `details`, both of `output_length(input.len())`.
    fn forward(
        &self,
        input: &[T],
        approx: &mut [T],
        details: &mut [T],
        level: usize,
    ) -> Result<(), ScaletError>;

    /// Merges both bands back, `output` holds the recorded length of the finer level.
    fn inverse(
        &self,
        approx: &[T],
        details: &[T],
        output: &mut [T],
        level: usize,
    ) -> Result<(), ScaletError>;

    /// Band length produced from `input_length` samples.
    fn output_length(&self, input_length: usize) -> usize;
}

/// Constructors for every engine in single and double precision.
pub struct Scalet {}

impl Scalet {
    fn make_filter_bank<T: WaveletSample>(
        family: WaveletFamily,
        order: usize,
    ) -> Result<Arc<FilterBank<T>>, ScaletError>
    where
        f64: AsPrimitive<T>,
    {
        Ok(Arc::new(FilterBank::new(family, order)?))
    }

    /// Builds filters for `family` and `order` for `f32` signals.
    pub fn make_filter_bank_f32(
        family: WaveletFamily,
        order: usize,
    ) -> Result<Arc<FilterBank<f32>>, ScaletError> {
        Self::make_filter_bank(family, order)
    }

    /// Builds filters for `family` and `order` for `f64` signals.
    pub fn make_filter_bank_f64(
        family: WaveletFamily,
        order: usize,
    ) -> Result<Arc<FilterBank<f64>>, ScaletError> {
        Self::make_filter_bank(family, order)
    }

    /// Creates a multilevel 1D engine for `f32` signals.
    ///
    /// # Parameters
    /// - `filter_bank`: Wavelet filters, shared with other engines.
    /// - `signal_length`: Length of every signal passed to `forward`.
    /// - `method`: DWT, SWT or MODWT.
    /// - `levels`: Number of decomposition levels.
    pub fn make_dwt_f32(
        filter_bank: Arc<FilterBank<f32>>,
        signal_length: usize,
        method: TransformMethod,
        levels: usize,
    ) -> Result<DwtEngine<f32>, ScaletError> {
        DwtEngine::new(filter_bank, signal_length, method, levels)
    }

    /// Same as `make_dwt_f32`, but for double precision signals.
    pub fn make_dwt_f64(
        filter_bank: Arc<FilterBank<f64>>,
        signal_length: usize,
        method: TransformMethod,
        levels: usize,
    ) -> Result<DwtEngine<f64>, ScaletError> {
        DwtEngine::new(filter_bank, signal_length, method, levels)
    }

    pub fn make_packet_f32(
        filter_bank: Arc<FilterBank<f32>>,
        signal_length: usize,
        levels: usize,
    ) -> Result<WaveletPacketEngine<f32>, ScaletError> {
        WaveletPacketEngine::new(filter_bank, signal_length, levels)
    }

    pub fn make_packet_f64(
        filter_bank: Arc<FilterBank<f64>>,
        signal_length: usize,
        levels: usize,
    ) -> Result<WaveletPacketEngine<f64>, ScaletError> {
        WaveletPacketEngine::new(filter_bank, signal_length, levels)
    }

    pub fn make_tree_f32(
        filter_bank: Arc<FilterBank<f32>>,
        signal_length: usize,
        levels: usize,
    ) -> Result<WaveletTreeEngine<f32>, ScaletError> {
        WaveletTreeEngine::new(filter_bank, signal_length, levels)
    }

    pub fn make_tree_f64(
        filter_bank: Arc<FilterBank<f64>>,
        signal_length: usize,
        levels: usize,
    ) -> Result<WaveletTreeEngine<f64>, ScaletError> {
        WaveletTreeEngine::new(filter_bank, signal_length, levels)
    }

    /// Creates a separable 2D engine for row-major `rows x cols` `f32` images.
    pub fn make_2d_f32(
        filter_bank: Arc<FilterBank<f32>>,
        method: TransformMethod,
        rows: usize,
        cols: usize,
        levels: usize,
    ) -> Result<Transform2DEngine<f32>, ScaletError> {
        Transform2DEngine::new(filter_bank, method, rows, cols, levels)
    }

    /// Same as `make_2d_f32`, but for double precision images.
    pub fn make_2d_f64(
        filter_bank: Arc<FilterBank<f64>>,
        method: TransformMethod,
        rows: usize,
        cols: usize,
        levels: usize,
    ) -> Result<Transform2DEngine<f64>, ScaletError> {
        Transform2DEngine::new(filter_bank, method, rows, cols, levels)
    }

    /// Creates a continuous transform engine, `dt` is the sampling interval.
    pub fn make_cwt_f32(
        wavelet: MotherWavelet,
        signal_length: usize,
        dt: f64,
        total_scales: usize,
    ) -> Result<CwtEngine<f32>, ScaletError> {
        CwtEngine::new(wavelet, signal_length, dt, total_scales)
    }

    pub fn make_cwt_f64(
        wavelet: MotherWavelet,
        signal_length: usize,
        dt: f64,
        total_scales: usize,
    ) -> Result<CwtEngine<f64>, ScaletError> {
        CwtEngine::new(wavelet, signal_length, dt, total_scales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_constants() {
        assert!((f64::FRAC_1_SQRT_2 - 0.5f64.sqrt()).abs() < 1e-16);
        assert!((f32::FRAC_1_SQRT_2 - 0.5f32.sqrt()).abs() < 1e-7);
    }

    #[test]
    fn engines_are_send_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<DwtEngine<f32>>();
        assert_impl::<WaveletPacketEngine<f64>>();
        assert_impl::<WaveletTreeEngine<f64>>();
        assert_impl::<Transform2DEngine<f32>>();
        assert_impl::<CwtEngine<f64>>();
        assert_impl::<FilterBank<f64>>();
    }

    #[test]
    fn single_precision_round_trip() {
        let bank = Scalet::make_filter_bank_f32(WaveletFamily::Symlet, 4).unwrap();
        let signal = (0..100)
            .map(|i| (i as f32 * 0.13).sin() * 10. + (i % 7) as f32)
            .collect::<Vec<_>>();
        for method in [TransformMethod::Dwt, TransformMethod::Swt, TransformMethod::Modwt] {
            let engine = Scalet::make_dwt_f32(bank.clone(), 100, method, 3).unwrap();
            let coefficients = engine.forward(&signal).unwrap();
            let restored = engine.inverse(&coefficients).unwrap();
            for (a, b) in signal.iter().zip(restored.iter()) {
                assert!(
                    (a - b).abs() < 1e-4,
                    "reconstructed difference expected to be < 1e-4, but values were ref {a}, derived {b} for {method}"
                );
            }
        }
    }

    #[test]
    fn facade_matches_generic_constructors() {
        let bank = Scalet::make_filter_bank_f64(WaveletFamily::Daubechies, 4).unwrap();
        let signal = (0..64).map(|i| (i as f64).sqrt()).collect::<Vec<_>>();
        let facade = Scalet::make_dwt_f64(bank.clone(), 64, TransformMethod::Dwt, 3).unwrap();
        let generic = DwtEngine::new(bank.clone(), 64, TransformMethod::Dwt, 3).unwrap();
        assert_eq!(
            facade.forward(&signal).unwrap(),
            generic.forward(&signal).unwrap()
        );
        assert!(Scalet::make_tree_f64(bank.clone(), 64, 3).is_ok());
        assert!(Scalet::make_packet_f32(
            Scalet::make_filter_bank_f32(WaveletFamily::Haar, 1).unwrap(),
            64,
            6
        )
        .is_ok());
        assert!(Scalet::make_2d_f64(bank, TransformMethod::Swt, 8, 8, 2).is_ok());
        assert!(Scalet::make_cwt_f32(MotherWavelet::dog(2).unwrap(), 64, 1., 8).is_ok());
    }
}
