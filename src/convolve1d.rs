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
use crate::WaveletSample;
use crate::err::{ScaletError, try_vec};
use crate::mla::fmla;
use num_complex::Complex;
use num_traits::{AsPrimitive, Zero};
use rustfft::{Fft, FftPlanner};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
/// Declares how filter convolutions are evaluated
pub enum ConvolutionMethod {
    /// Sliding dot products in time domain
    #[default]
    Direct,
    /// Multiply and inverse in frequency domain
    Fft,
}

impl Display for ConvolutionMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvolutionMethod::Direct => f.write_str("direct"),
            ConvolutionMethod::Fft => f.write_str("fft"),
        }
    }
}

/// Convolution kernels used by the single level steps.
///
/// Every implementation must produce the same values up to rounding.
pub(crate) trait Convolve1d<T> {
    /// `output[o] = sum_j kernel[j] * input[offset + 2o - j]`.
    ///
    /// Every referenced input index must exist, callers extend the signal beforehand.
    fn decimate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError>;

    /// `output[m] += sum_i input[i] * kernel[m + offset - 2i]` over the valid kernel taps.
    fn upsample_accumulate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError>;

    /// Circular convolution with the kernel dilated by `stride`.
    ///
    /// `output[n] = sum_k kernel[k] * input[(n - stride * k) mod N]`, or with `n + stride * k`
    /// when `adjoint` is set.
    fn circular(
        &self,
        input: &[T],
        kernel: &[T],
        stride: usize,
        adjoint: bool,
        output: &mut [T],
    ) -> Result<(), ScaletError>;
}

pub(crate) struct DirectConvolution1d<T> {
    pub(crate) phantom_data: PhantomData<T>,
}

impl<T: WaveletSample> Convolve1d<T> for DirectConvolution1d<T>
where
    f64: AsPrimitive<T>,
{
    fn decimate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        for (o, dst) in output.iter_mut().enumerate() {
            let center = offset + 2 * o;
            let mut sum = T::zero();
            for (j, &k) in kernel.iter().enumerate() {
                sum = fmla(sum, k, input[center - j]);
            }
            *dst = sum;
        }
        Ok(())
    }

    fn upsample_accumulate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        let taps = kernel.len();
        for (m, dst) in output.iter_mut().enumerate() {
            let shifted = m + offset;
            // kernel index shifted - 2i must fall into 0..taps
            let i_start = (shifted + 1).saturating_sub(taps).div_ceil(2);
            let i_end = (shifted / 2 + 1).min(input.len());
            let mut sum = *dst;
            for i in i_start..i_end {
                sum = fmla(sum, input[i], kernel[shifted - 2 * i]);
            }
            *dst = sum;
        }
        Ok(())
    }

    fn circular(
        &self,
        input: &[T],
        kernel: &[T],
        stride: usize,
        adjoint: bool,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        let n = input.len();
        if n == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if output.len() != n {
            return Err(ScaletError::SignalLengthMismatch(n, output.len()));
        }
        let shifts = kernel
            .iter()
            .enumerate()
            .map(|(k, &h)| ((stride * k) % n, h))
            .collect::<Vec<_>>();
        for (i, dst) in output.iter_mut().enumerate() {
            let mut sum = T::zero();
            for &(shift, h) in shifts.iter() {
                let idx = if adjoint {
                    (i + shift) % n
                } else {
                    (i + n - shift) % n
                };
                sum = fmla(sum, h, input[idx]);
            }
            *dst = sum;
        }
        Ok(())
    }
}

type FftPlans<T> = (Arc<dyn Fft<T>>, Arc<dyn Fft<T>>);

/// FFT convolution, forward and inverse plans are cached per transform length.
pub(crate) struct FftConvolution1d<T: WaveletSample> {
    plans: Mutex<HashMap<usize, FftPlans<T>>>,
}

impl<T: WaveletSample> FftConvolution1d<T>
where
    f64: AsPrimitive<T>,
{
    pub(crate) fn new() -> Self {
        Self {
            plans: Mutex::new(HashMap::new()),
        }
    }

    fn plans(&self, length: usize) -> FftPlans<T> {
        let mut plans = self.plans.lock().unwrap_or_else(|e| e.into_inner());
        plans
            .entry(length)
            .or_insert_with(|| {
                let mut planner = FftPlanner::<T>::new();
                (
                    planner.plan_fft_forward(length),
                    planner.plan_fft_inverse(length),
                )
            })
            .clone()
    }

    /// Full linear convolution of `input` and `kernel` of length `input + kernel - 1`.
    fn full_convolution(&self, input: &[T], kernel: &[T]) -> Result<Vec<T>, ScaletError> {
        let full_length = input.len() + kernel.len() - 1;
        let fft_length = full_length.next_power_of_two();

        let mut signal = try_vec![Complex::<T>::zero(); fft_length];
        let mut filter = try_vec![Complex::<T>::zero(); fft_length];
        for (dst, &src) in signal.iter_mut().zip(input.iter()) {
            *dst = Complex::new(src, T::zero());
        }
        for (dst, &src) in filter.iter_mut().zip(kernel.iter()) {
            *dst = Complex::new(src, T::zero());
        }

        self.multiply_spectra(&mut signal, &filter)?;

        let norm: T = (1f64 / fft_length as f64).as_();
        Ok(signal
            .iter()
            .take(full_length)
            .map(|x| x.re * norm)
            .collect())
    }

    fn multiply_spectra(
        &self,
        signal: &mut [Complex<T>],
        filter: &[Complex<T>],
    ) -> Result<(), ScaletError> {
        let mut filter = filter.to_vec();
        let (forward, inverse) = self.plans(signal.len());
        forward.process(signal);
        forward.process(&mut filter);
        for (dst, &h) in signal.iter_mut().zip(filter.iter()) {
            *dst = *dst * h;
        }
        inverse.process(signal);
        Ok(())
    }
}

impl<T: WaveletSample> Convolve1d<T> for FftConvolution1d<T>
where
    f64: AsPrimitive<T>,
{
    fn decimate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        let full = self.full_convolution(input, kernel)?;
        for (o, dst) in output.iter_mut().enumerate() {
            *dst = full[offset + 2 * o];
        }
        Ok(())
    }

    fn upsample_accumulate(
        &self,
        input: &[T],
        kernel: &[T],
        offset: usize,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        if input.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        let mut upsampled = try_vec![T::zero(); 2 * input.len() - 1];
        for (dst, &src) in upsampled.iter_mut().step_by(2).zip(input.iter()) {
            *dst = src;
        }
        let full = self.full_convolution(&upsampled, kernel)?;
        for (m, dst) in output.iter_mut().enumerate() {
            if let Some(&v) = full.get(m + offset) {
                *dst = *dst + v;
            }
        }
        Ok(())
    }

    fn circular(
        &self,
        input: &[T],
        kernel: &[T],
        stride: usize,
        adjoint: bool,
        output: &mut [T],
    ) -> Result<(), ScaletError> {
        let n = input.len();
        if n == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if output.len() != n {
            return Err(ScaletError::SignalLengthMismatch(n, output.len()));
        }

        let mut signal = try_vec![Complex::<T>::zero(); n];
        for (dst, &src) in signal.iter_mut().zip(input.iter()) {
            *dst = Complex::new(src, T::zero());
        }

        // dilated kernel folded onto the circle
        let mut filter = try_vec![Complex::<T>::zero(); n];
        for (k, &h) in kernel.iter().enumerate() {
            let shift = (stride * k) % n;
            let position = if adjoint { (n - shift) % n } else { shift };
            filter[position].re = filter[position].re + h;
        }

        self.multiply_spectra(&mut signal, &filter)?;

        let norm: T = (1f64 / n as f64).as_();
        for (dst, src) in output.iter_mut().zip(signal.iter()) {
            *dst = src.re * norm;
        }
        Ok(())
    }
}

pub(crate) fn make_convolution_1d<T: WaveletSample>(
    method: ConvolutionMethod,
) -> Box<dyn Convolve1d<T> + Send + Sync>
where
    f64: AsPrimitive<T>,
{
    match method {
        ConvolutionMethod::Direct => Box::new(DirectConvolution1d {
            phantom_data: PhantomData,
        }),
        ConvolutionMethod::Fft => Box::new(FftConvolution1d::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(length: usize) -> Vec<f64> {
        (0..length)
            .map(|i| (i as f64 * 0.37).sin() + (i as f64 / length as f64))
            .collect()
    }

    #[test]
    fn decimate_direct_matches_fft() {
        let input = signal(23);
        let kernel = [0.25, -0.5, 1.25, 0.75];
        let direct = make_convolution_1d::<f64>(ConvolutionMethod::Direct);
        let fft = make_convolution_1d::<f64>(ConvolutionMethod::Fft);
        let mut a = vec![0.; 9];
        let mut b = vec![0.; 9];
        direct.decimate(&input, &kernel, 4, &mut a).unwrap();
        fft.decimate(&input, &kernel, 4, &mut b).unwrap();
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (x - y).abs() < 1e-10,
                "difference expected to be < 1e-10, but values were direct {x}, fft {y} at {i}"
            );
        }
        let expected = kernel[0] * input[4] + kernel[1] * input[3] + kernel[2] * input[2]
            + kernel[3] * input[1];
        assert!((a[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn upsample_direct_matches_fft() {
        let input = signal(11);
        let kernel = [0.1, 0.7, -0.3, 0.2, 0.05, -0.4];
        let direct = make_convolution_1d::<f64>(ConvolutionMethod::Direct);
        let fft = make_convolution_1d::<f64>(ConvolutionMethod::Fft);
        let mut a = vec![1.; 18];
        let mut b = vec![1.; 18];
        direct.upsample_accumulate(&input, &kernel, 4, &mut a).unwrap();
        fft.upsample_accumulate(&input, &kernel, 4, &mut b).unwrap();
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert!(
                (x - y).abs() < 1e-10,
                "difference expected to be < 1e-10, but values were direct {x}, fft {y} at {i}"
            );
        }
    }

    #[test]
    fn circular_direct_matches_fft() {
        let input = signal(13);
        let kernel = [0.4, -0.2, 0.9, 0.3];
        let direct = make_convolution_1d::<f64>(ConvolutionMethod::Direct);
        let fft = make_convolution_1d::<f64>(ConvolutionMethod::Fft);
        for stride in [1usize, 2, 4, 8] {
            for adjoint in [false, true] {
                let mut a = vec![0.; 13];
                let mut b = vec![0.; 13];
                direct.circular(&input, &kernel, stride, adjoint, &mut a).unwrap();
                fft.circular(&input, &kernel, stride, adjoint, &mut b).unwrap();
                for (x, y) in a.iter().zip(b.iter()) {
                    assert!(
                        (x - y).abs() < 1e-10,
                        "difference expected to be < 1e-10, but values were direct {x}, fft {y}"
                    );
                }
            }
        }
    }

    #[test]
    fn fft_plans_are_reused_across_lengths() {
        let kernel = [0.25, -0.5, 1.25, 0.75];
        let direct = make_convolution_1d::<f64>(ConvolutionMethod::Direct);
        let fft = FftConvolution1d::<f64>::new();
        for length in [13usize, 23, 13] {
            let input = signal(length);
            let count = (length - kernel.len()) / 2 + 1;
            let mut a = vec![0.; count];
            let mut b = vec![0.; count];
            direct.decimate(&input, &kernel, 3, &mut a).unwrap();
            fft.decimate(&input, &kernel, 3, &mut b).unwrap();
            for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
                assert!(
                    (x - y).abs() < 1e-10,
                    "difference expected to be < 1e-10, but values were direct {x}, fft {y} at {i} of length {length}"
                );
            }
        }
        // 16 and 32 point plans
        assert_eq!(fft.plans.lock().unwrap().len(), 2);

        let input = signal(13);
        let mut a = vec![0.; 13];
        let mut b = vec![0.; 13];
        direct.circular(&input, &kernel, 2, false, &mut a).unwrap();
        fft.circular(&input, &kernel, 2, false, &mut b).unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-10);
        }
        assert_eq!(fft.plans.lock().unwrap().len(), 3);
    }
}
