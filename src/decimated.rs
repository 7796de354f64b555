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
use crate::err::ScaletError;
use crate::extension::SignalExtension;
use crate::filter_bank::FilterBank;
use crate::filter_padding::make_arena_1d;
use crate::util::{dwt_length, idwt_length};
use crate::{SingleLevelStep, WaveletSample};
use num_traits::AsPrimitive;
use std::sync::Arc;

/// Critically sampled analysis/synthesis step.
///
/// The signal is extended by `F - 1` samples on both sides, filtered and every second
/// sample is kept, giving `floor((N + F - 1) / 2)` coefficients per band.
pub(crate) struct DecimatedStep<T> {
    filter_bank: Arc<FilterBank<T>>,
    extension: SignalExtension,
    convolution: Box<dyn Convolve1d<T> + Send + Sync>,
}

impl<T: WaveletSample> DecimatedStep<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new(
        filter_bank: Arc<FilterBank<T>>,
        extension: SignalExtension,
        convolution: Box<dyn Convolve1d<T> + Send + Sync>,
    ) -> Self {
        Self {
            filter_bank,
            extension,
            convolution,
        }
    }
}

impl<T: WaveletSample> SingleLevelStep<T> for DecimatedStep<T>
where
    f64: AsPrimitive<T>,
{
    fn forward(
        &self,
        input: &[T],
        approx: &mut [T],
        details: &mut [T],
        _: usize,
    ) -> Result<(), ScaletError> {
        if input.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        let filter_length = self.filter_bank.filter_length();
        let output_length = dwt_length(input.len(), filter_length);
        if approx.len() != output_length {
            return Err(ScaletError::SignalLengthMismatch(
                output_length,
                approx.len(),
            ));
        }
        if details.len() != output_length {
            return Err(ScaletError::SignalLengthMismatch(
                output_length,
                details.len(),
            ));
        }

        let arena = make_arena_1d(input, filter_length - 1, self.extension)?;

        self.convolution
            .decimate(&arena, &self.filter_bank.dec_lo, filter_length, approx)?;
        self.convolution
            .decimate(&arena, &self.filter_bank.dec_hi, filter_length, details)?;
        Ok(())
    }

    fn inverse(
        &self,
        approx: &[T],
        details: &[T],
        output: &mut [T],
        _: usize,
    ) -> Result<(), ScaletError> {
        if approx.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if approx.len() != details.len() {
            return Err(ScaletError::SignalLengthMismatch(
                approx.len(),
                details.len(),
            ));
        }
        let filter_length = self.filter_bank.filter_length();
        let full_length = idwt_length(approx.len(), filter_length);
        if output.len() > full_length {
            return Err(ScaletError::SignalLengthMismatch(full_length, output.len()));
        }

        // the longer synthesis is truncated to the recorded finer length
        output.fill(T::zero());
        let offset = filter_length - 2;
        self.convolution
            .upsample_accumulate(approx, &self.filter_bank.rec_lo, offset, output)?;
        self.convolution
            .upsample_accumulate(details, &self.filter_bank.rec_hi, offset, output)?;
        Ok(())
    }

    fn output_length(&self, input_length: usize) -> usize {
        dwt_length(input_length, self.filter_bank.filter_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convolve1d::{ConvolutionMethod, make_convolution_1d};
    use crate::filter_bank::WaveletFamily;

    fn step(
        family: WaveletFamily,
        order: usize,
        extension: SignalExtension,
        method: ConvolutionMethod,
    ) -> DecimatedStep<f64> {
        DecimatedStep::new(
            Arc::new(FilterBank::new(family, order).unwrap()),
            extension,
            make_convolution_1d(method),
        )
    }

    #[test]
    fn haar_single_level() {
        let haar = step(
            WaveletFamily::Haar,
            1,
            SignalExtension::Periodic,
            ConvolutionMethod::Direct,
        );
        let input = [1., 3., 5., 11.];
        let mut approx = [0.; 2];
        let mut details = [0.; 2];
        haar.forward(&input, &mut approx, &mut details, 1).unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let expected_approx = [4. * s, 16. * s];
        let expected_details = [-2. * s, -6. * s];
        for i in 0..2 {
            assert!((approx[i] - expected_approx[i]).abs() < 1e-12);
            assert!((details[i] - expected_details[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn single_level_round_trip_odd() {
        for extension in [SignalExtension::Periodic, SignalExtension::Symmetric] {
            for method in [ConvolutionMethod::Direct, ConvolutionMethod::Fft] {
                let db3 = step(WaveletFamily::Daubechies, 3, extension, method);
                let input = (0..37)
                    .map(|i| (i as f64 * 0.3).cos() * 2. + i as f64 / 37.)
                    .collect::<Vec<_>>();
                let length = db3.output_length(input.len());
                assert_eq!(length, 21);
                let mut approx = vec![0.; length];
                let mut details = vec![0.; length];
                db3.forward(&input, &mut approx, &mut details, 1).unwrap();
                let mut output = vec![0.; input.len()];
                db3.inverse(&approx, &details, &mut output, 1).unwrap();
                for (i, (a, b)) in input.iter().zip(output.iter()).enumerate() {
                    assert!(
                        (a - b).abs() < 1e-10,
                        "reconstructed difference expected to be < 1e-10, but values were ref {a}, derived {b} at {i} for {extension} {method}"
                    );
                }
            }
        }
    }

    #[test]
    fn rejects_wrong_sizes() {
        let db2 = step(
            WaveletFamily::Daubechies,
            2,
            SignalExtension::Symmetric,
            ConvolutionMethod::Direct,
        );
        let mut approx = [0.; 3];
        let mut details = [0.; 4];
        assert_eq!(
            db2.forward(&[1., 2., 3., 4., 5.], &mut approx, &mut details, 1),
            Err(ScaletError::SignalLengthMismatch(4, 3))
        );
        let mut output = [0.; 9];
        assert!(db2.inverse(&[1.; 4], &[1.; 4], &mut output, 1).is_err());
    }
}
