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
use crate::convolve1d::Convolve1d;
use crate::err::{ScaletError, try_vec};
use crate::filter_bank::FilterBank;
use crate::{SingleLevelStep, WaveletSample};
use num_traits::AsPrimitive;

/// Undecimated analysis/synthesis step shared by **SWT** and **MODWT**.
///
/// Filters are dilated by `2^(level - 1)` (à trous) and applied circularly, so every band
/// keeps the input length. MODWT rescales the filters by `1/sqrt(2)` and synthesizes with
/// the adjoint directly, SWT keeps unit filters and halves the synthesis.
pub(crate) struct MoDwtHandler<T> {
    pub(crate) h: Vec<T>,
    pub(crate) g: Vec<T>,
    pub(crate) h_synthesis: Vec<T>,
    pub(crate) g_synthesis: Vec<T>,
    pub(crate) convolution: Box<dyn Convolve1d<T> + Send + Sync>,
    pub(crate) stationary_wavelet_transform: bool,
}

impl<T: WaveletSample> MoDwtHandler<T>
where
    f64: AsPrimitive<T>,
{
    fn with_scale(
        filter_bank: &FilterBank<T>,
        convolution: Box<dyn Convolve1d<T> + Send + Sync>,
        scale: T,
        stationary_wavelet_transform: bool,
    ) -> Self {
        let scaled = |v: &[T]| v.iter().map(|&x| x * scale).collect::<Vec<_>>();
        let reversed = |v: &[T]| v.iter().rev().map(|&x| x * scale).collect::<Vec<_>>();
        Self {
            h: scaled(&filter_bank.dec_hi),
            g: scaled(&filter_bank.dec_lo),
            h_synthesis: reversed(&filter_bank.rec_hi),
            g_synthesis: reversed(&filter_bank.rec_lo),
            convolution,
            stationary_wavelet_transform,
        }
    }

    pub(crate) fn new(
        filter_bank: &FilterBank<T>,
        convolution: Box<dyn Convolve1d<T> + Send + Sync>,
    ) -> Self {
        Self::with_scale(filter_bank, convolution, T::FRAC_1_SQRT_2, false)
    }

    pub(crate) fn new_stationary(
        filter_bank: &FilterBank<T>,
        convolution: Box<dyn Convolve1d<T> + Send + Sync>,
    ) -> Self {
        Self::with_scale(filter_bank, convolution, 1f64.as_(), true)
    }

    #[inline]
    fn stride(level: usize) -> usize {
        1usize << level.saturating_sub(1)
    }
}

impl<T: WaveletSample> SingleLevelStep<T> for MoDwtHandler<T>
where
    f64: AsPrimitive<T>,
{
    fn forward(
        &self,
        input: &[T],
        approx: &mut [T],
        details: &mut [T],
        level: usize,
    ) -> Result<(), ScaletError> {
        if input.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if approx.len() != input.len() {
            return Err(ScaletError::SignalLengthMismatch(input.len(), approx.len()));
        }
        if details.len() != input.len() {
            return Err(ScaletError::SignalLengthMismatch(input.len(), details.len()));
        }
        let stride = Self::stride(level);
        self.convolution
            .circular(input, &self.g, stride, false, approx)?;
        self.convolution
            .circular(input, &self.h, stride, false, details)?;
        Ok(())
    }

    fn inverse(
        &self,
        approx: &[T],
        details: &[T],
        output: &mut [T],
        level: usize,
    ) -> Result<(), ScaletError> {
        if approx.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if details.len() != approx.len() {
            return Err(ScaletError::SignalLengthMismatch(approx.len(), details.len()));
        }
        if output.len() != approx.len() {
            return Err(ScaletError::SignalLengthMismatch(approx.len(), output.len()));
        }
        let stride = Self::stride(level);
        let mut scratch = try_vec![T::zero(); output.len()];

        self.convolution
            .circular(approx, &self.g_synthesis, stride, true, output)?;
        self.convolution
            .circular(details, &self.h_synthesis, stride, true, &mut scratch)?;

        if self.stationary_wavelet_transform {
            let half: T = 0.5f64.as_();
            for (dst, &src) in output.iter_mut().zip(scratch.iter()) {
                *dst = (*dst + src) * half;
            }
        } else {
            for (dst, &src) in output.iter_mut().zip(scratch.iter()) {
                *dst = *dst + src;
            }
        }
        Ok(())
    }

    fn output_length(&self, input_length: usize) -> usize {
        input_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolve1d::{ConvolutionMethod, make_convolution_1d};
    use crate::filter_bank::WaveletFamily;

    #[test]
    fn modwt_level_energy_is_preserved() {
        let bank = FilterBank::<f64>::new(WaveletFamily::Daubechies, 4).unwrap();
        let modwt = MoDwtHandler::new(&bank, make_convolution_1d(ConvolutionMethod::Direct));
        let input = (0..64)
            .map(|i| (i as f64 * 0.21).sin() + 0.3 * (i as f64 * 1.7).cos())
            .collect::<Vec<_>>();
        let mut approx = vec![0.; 64];
        let mut details = vec![0.; 64];
        modwt.forward(&input, &mut approx, &mut details, 1).unwrap();
        let energy = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>();
        let total = energy(&approx) + energy(&details);
        assert!(
            (total - energy(&input)).abs() < 1e-9,
            "energy expected to be preserved, but values were ref {}, derived {}",
            energy(&input),
            total
        );
    }

    #[test]
    fn stationary_round_trip_every_level() {
        let bank = FilterBank::<f64>::new(WaveletFamily::Biorthogonal, 35).unwrap();
        for method in [ConvolutionMethod::Direct, ConvolutionMethod::Fft] {
            let swt =
                MoDwtHandler::new_stationary(&bank, make_convolution_1d(method));
            let input = (0..19).map(|i| (i * i % 7) as f64 - 2.5).collect::<Vec<_>>();
            for level in 1..=6 {
                let mut approx = vec![0.; 19];
                let mut details = vec![0.; 19];
                swt.forward(&input, &mut approx, &mut details, level).unwrap();
                let mut output = vec![0.; 19];
                swt.inverse(&approx, &details, &mut output, level).unwrap();
                for (a, b) in input.iter().zip(output.iter()) {
                    assert!(
                        (a - b).abs() < 1e-10,
                        "reconstructed difference expected to be < 1e-10, but values were ref {a}, derived {b} at level {level}"
                    );
                }
            }
        }
    }
}
