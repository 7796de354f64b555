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
use crate::mother_wavelet::MotherWavelet;
use crate::scales::{ScaleType, Scales};
use num_complex::Complex;
use num_traits::AsPrimitive;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of a continuous transform, coefficients are laid out `[scale][time]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CwtCoefficients<T> {
    coefficients: Vec<Vec<Complex<T>>>,
    scales: Vec<f64>,
    periods: Vec<f64>,
    coi: Vec<f64>,
    mean: f64,
    dt: f64,
}

impl<T: WaveletSample> CwtCoefficients<T> {
    pub fn coefficients(&self) -> &[Vec<Complex<T>>] {
        &self.coefficients
    }

    pub fn coefficients_mut(&mut self) -> &mut [Vec<Complex<T>>] {
        &mut self.coefficients
    }

    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Equivalent Fourier period of every scale.
    pub fn periods(&self) -> &[f64] {
        &self.periods
    }

    /// Cone of influence per time point, in period units.
    pub fn coi(&self) -> &[f64] {
        &self.coi
    }

    /// Mean removed from the signal before the transform.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn total_scales(&self) -> usize {
        self.scales.len()
    }

    pub fn signal_length(&self) -> usize {
        self.coi.len()
    }

    /// `|W(s, t)|^2`, `[scale][time]`.
    pub fn power(&self) -> Vec<Vec<T>> {
        self.coefficients
            .iter()
            .map(|row| row.iter().map(|c| c.norm_sqr()).collect())
            .collect()
    }
}

/// FFT based continuous wavelet transform.
pub struct CwtEngine<T> {
    wavelet: MotherWavelet,
    signal_length: usize,
    dt: f64,
    scales: Scales,
    padded_length: usize,
    wavenumbers: Vec<f64>,
    fft_forward: Arc<dyn Fft<f64>>,
    fft_inverse: Arc<dyn Fft<f64>>,
    phantom_data: std::marker::PhantomData<T>,
}

/// Angular wavenumbers of an `npad` point FFT grid.
fn wavenumbers(npad: usize, dt: f64) -> Vec<f64> {
    let df = 2.0 * PI / (npad as f64 * dt);
    (0..npad)
        .map(|i| {
            if i == 0 {
                0.0
            } else if i <= npad / 2 {
                i as f64 * df
            } else {
                -((npad - i) as f64) * df
            }
        })
        .collect()
}

impl<T: WaveletSample> CwtEngine<T>
where
    f64: AsPrimitive<T>,
{
    /// Creates an engine with `total_scales` power-of-two scales starting at `2 * dt`
    /// with a quarter octave spacing.
    ///
    /// `dt` is the sampling interval of the signal.
    pub fn new(
        wavelet: MotherWavelet,
        signal_length: usize,
        dt: f64,
        total_scales: usize,
    ) -> Result<Self, ScaletError> {
        if signal_length == 0 || total_scales == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        if !(dt.is_finite() && dt > 0.) {
            return Err(ScaletError::InvalidScaleParameter);
        }
        let scales = Scales::generate(ScaleType::Power, 2. * dt, 0.25, Some(2), total_scales)?;
        let padded_length = signal_length.next_power_of_two();
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(padded_length);
        let fft_inverse = planner.plan_fft_inverse(padded_length);
        debug!(
            "cwt engine with {wavelet}, signal length {signal_length}, dt {dt}, {scales}"
        );
        Ok(Self {
            wavelet,
            signal_length,
            dt,
            scales,
            padded_length,
            wavenumbers: wavenumbers(padded_length, dt),
            fft_forward,
            fft_inverse,
            phantom_data: Default::default(),
        })
    }

    /// Replaces the scales with a generated progression of the current length.
    pub fn set_scales(
        &mut self,
        scale_type: ScaleType,
        s0: f64,
        dj: f64,
        power: Option<u32>,
    ) -> Result<(), ScaletError> {
        let scales = Scales::generate(scale_type, s0, dj, power, self.scales.len())?;
        debug!("cwt scales set to {scales}");
        self.scales = scales;
        Ok(())
    }

    /// Replaces the scales with a caller supplied sequence, the scale count follows it.
    pub fn set_scale_vector(&mut self, scales: &[f64], s0: f64, dj: f64) -> Result<(), ScaletError> {
        let scales = Scales::explicit(scales.to_vec(), s0, dj)?;
        debug!("cwt scales set to {scales}");
        self.scales = scales;
        Ok(())
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn wavelet(&self) -> MotherWavelet {
        self.wavelet
    }

    pub fn signal_length(&self) -> usize {
        self.signal_length
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    fn cone_of_influence(&self) -> Vec<f64> {
        let factor = self.wavelet.coi_factor();
        let n = self.signal_length;
        (0..n)
            .map(|t| factor * self.dt * t.min(n - 1 - t) as f64)
            .collect()
    }

    pub fn forward(&self, signal: &[T]) -> Result<CwtCoefficients<T>, ScaletError> {
        let n = self.signal_length;
        if signal.len() != n {
            return Err(ScaletError::SignalLengthMismatch(n, signal.len()));
        }
        trace!(
            "cwt forward over {} samples and {} scales",
            n,
            self.scales.len()
        );

        let mean = signal.iter().map(|&x| x.as_()).sum::<f64>() / n as f64;
        let mut spectrum = try_vec![Complex::new(0f64, 0f64); self.padded_length];
        for (dst, &src) in spectrum.iter_mut().zip(signal.iter()) {
            let v: f64 = src.as_();
            *dst = Complex::new(v - mean, 0.);
        }
        self.fft_forward.process(&mut spectrum);

        let norm = 1. / self.padded_length as f64;
        let mut coefficients = Vec::with_capacity(self.scales.len());
        let mut product = try_vec![Complex::new(0f64, 0f64); self.padded_length];
        for &scale in self.scales.values() {
            let daughter = self.wavelet.daughter(&self.wavenumbers, scale, self.dt);
            for ((dst, &s), &d) in product
                .iter_mut()
                .zip(spectrum.iter())
                .zip(daughter.iter())
            {
                *dst = s * d;
            }
            self.fft_inverse.process(&mut product);
            let mut row = try_vec![Complex::new(T::zero(), T::zero()); n];
            for (dst, &src) in row.iter_mut().zip(product.iter()) {
                *dst = Complex::new((src.re * norm).as_(), (src.im * norm).as_());
            }
            coefficients.push(row);
        }

        let fourier_factor = self.wavelet.fourier_factor();
        Ok(CwtCoefficients {
            coefficients,
            scales: self.scales.values().to_vec(),
            periods: self
                .scales
                .values()
                .iter()
                .map(|&s| s * fourier_factor)
                .collect(),
            coi: self.cone_of_influence(),
            mean,
            dt: self.dt,
        })
    }

    /// Response of the reconstruction sum to a unit amplitude tone.
    ///
    /// The sum does not depend on the tone while its band lies inside the scale
    /// range, so it is evaluated at the wavelet's peak frequency for the middle scale.
    fn reconstruction_gain(&self, weights: &[f64]) -> f64 {
        let values = self.scales.values();
        let center = (values[0] * values[values.len() - 1]).sqrt();
        let wavenumber = 2. * PI / (self.wavelet.fourier_factor() * center);
        // analytic wavelets see half of a real tone
        let fraction = if self.wavelet.is_analytic() { 0.5 } else { 1. };
        values
            .iter()
            .zip(weights.iter())
            .map(|(&scale, &w)| {
                let response = self.wavelet.daughter(&[wavenumber], scale, self.dt);
                w * response[0].re
            })
            .sum::<f64>()
            * fraction
    }

    /// Approximate reconstruction from the real part of the coefficients.
    ///
    /// Components whose frequency falls outside the scale range are lost and the
    /// accuracy near the edges follows the cone of influence.
    pub fn inverse(&self, coefficients: &CwtCoefficients<T>) -> Result<Vec<T>, ScaletError> {
        let n = self.signal_length;
        if coefficients.scales != self.scales.values()
            || coefficients.coefficients.len() != self.scales.len()
            || coefficients.coefficients.iter().any(|row| row.len() != n)
        {
            return Err(ScaletError::CoefficientsLayoutMismatch);
        }
        trace!(
            "cwt inverse over {} samples and {} scales",
            n,
            self.scales.len()
        );

        let weights = self.scales.reconstruction_weights();
        let gain = self.reconstruction_gain(&weights);
        let mean = coefficients.mean;
        if gain.abs() < f64::EPSILON {
            let mean_value: T = mean.as_();
            return Ok(try_vec![mean_value; n]);
        }

        let mut accumulated = try_vec![0f64; n];
        for (row, &w) in coefficients.coefficients.iter().zip(weights.iter()) {
            for (dst, c) in accumulated.iter_mut().zip(row.iter()) {
                let re: f64 = c.re.as_();
                *dst += w * re;
            }
        }
        let mut output = try_vec![T::zero(); n];
        for (dst, &v) in output.iter_mut().zip(accumulated.iter()) {
            *dst = (v / gain + mean).as_();
        }
        Ok(output)
    }
}

impl<T> Display for CwtEngine<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wavelet: {}", self.wavelet)?;
        writeln!(f, "Signal length: {}", self.signal_length)?;
        writeln!(f, "Padded length: {}", self.padded_length)?;
        writeln!(f, "Sampling interval: {}", self.dt)?;
        write!(f, "Scales: {}", self.scales)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                3. + (2. * PI * t / 32.).sin() + 0.5 * (2. * PI * t / 11.).cos()
            })
            .collect()
    }

    #[test]
    fn defaults() {
        let engine =
            CwtEngine::<f64>::new(MotherWavelet::morlet(6.).unwrap(), 100, 0.5, 12).unwrap();
        let scales = engine.scales();
        assert_eq!(scales.len(), 12);
        assert_eq!(scales.s0(), 1.);
        assert_eq!(scales.dj(), 0.25);
        assert_eq!(scales.power(), Some(2));
        assert_eq!(scales.scale_type(), Some(ScaleType::Power));
        assert!(engine.to_string().contains("Padded length: 128"));
    }

    #[test]
    fn scale_configuration() {
        let mut engine =
            CwtEngine::<f64>::new(MotherWavelet::paul(4).unwrap(), 64, 1., 10).unwrap();
        assert_eq!(
            engine.set_scales(ScaleType::Power, 1., 0.1, None),
            Err(ScaletError::MissingPowerParameter)
        );
        engine.set_scales(ScaleType::Power, 1., 0.1, Some(2)).unwrap();
        for (j, &s) in engine.scales().values().iter().enumerate() {
            assert!((s - 2f64.powf(0.1 * j as f64)).abs() < 1e-12);
        }
        engine.set_scale_vector(&[1., 2., 3., 5.], 1., 1.).unwrap();
        assert_eq!(engine.scales().len(), 4);
        let coefficients = engine.forward(&[1.; 64]).unwrap();
        assert_eq!(coefficients.total_scales(), 4);
        assert_eq!(
            engine.set_scale_vector(&[2., 1.], 1., 1.),
            Err(ScaletError::InvalidScaleParameter)
        );
        assert!(
            CwtEngine::<f64>::new(MotherWavelet::paul(4).unwrap(), 64, 0., 10).is_err()
        );
        assert_eq!(
            engine.forward(&[1.; 63]).unwrap_err(),
            ScaletError::SignalLengthMismatch(64, 63)
        );
    }

    #[test]
    fn constant_signal_has_no_coefficients() {
        let engine =
            CwtEngine::<f64>::new(MotherWavelet::dog(2).unwrap(), 50, 1., 8).unwrap();
        let coefficients = engine.forward(&[7.; 50]).unwrap();
        assert!((coefficients.mean() - 7.).abs() < 1e-12);
        for row in coefficients.coefficients() {
            assert_eq!(row.len(), 50);
            for c in row {
                assert!(c.norm() < 1e-12, "coefficient expected to vanish, but it was {c}");
            }
        }
        let restored = engine.inverse(&coefficients).unwrap();
        for v in restored {
            assert!((v - 7.).abs() < 1e-12);
        }
    }

    #[test]
    fn power_peaks_at_signal_period() {
        let n = 256;
        let engine =
            CwtEngine::<f64>::new(MotherWavelet::morlet(6.).unwrap(), n, 1., 29).unwrap();
        let signal = (0..n)
            .map(|i| (2. * PI * i as f64 / 32.).sin())
            .collect::<Vec<_>>();
        let coefficients = engine.forward(&signal).unwrap();
        let power = coefficients.power();
        let mean_power = power
            .iter()
            .map(|row| row[64..192].iter().sum::<f64>())
            .collect::<Vec<_>>();
        let (peak, _) = mean_power
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |acc, (j, &p)| if p > acc.1 { (j, p) } else { acc });
        let period = coefficients.periods()[peak];
        assert!(
            (period / 32.).log2().abs() <= 0.25,
            "peak period expected near 32, but it was {period}"
        );
    }

    #[test]
    fn cone_of_influence() {
        let engine =
            CwtEngine::<f64>::new(MotherWavelet::morlet(6.).unwrap(), 9, 2., 4).unwrap();
        let coefficients = engine.forward(&[0., 1., 0., -1., 0., 1., 0., -1., 0.]).unwrap();
        let coi = coefficients.coi();
        let factor = MotherWavelet::morlet(6.).unwrap().coi_factor();
        assert_eq!(coi.len(), 9);
        assert_eq!(coi[0], 0.);
        assert_eq!(coi[8], 0.);
        assert!((coi[4] - factor * 2. * 4.).abs() < 1e-12);
        assert!((coi[2] - coi[6]).abs() < 1e-12);
    }

    #[test]
    fn approximate_reconstruction() {
        let n = 256;
        let signal = test_signal(n);
        for (wavelet, tolerance) in [
            (MotherWavelet::morlet(6.).unwrap(), 0.02),
            (MotherWavelet::paul(4).unwrap(), 0.05),
        ] {
            let engine = CwtEngine::<f64>::new(wavelet, n, 1., 29).unwrap();
            let coefficients = engine.forward(&signal).unwrap();
            let restored = engine.inverse(&coefficients).unwrap();
            for i in n / 4..3 * n / 4 {
                assert!(
                    (restored[i] - signal[i]).abs() < tolerance,
                    "{wavelet} reconstruction difference expected to be < {tolerance}, but values were ref {}, derived {} at {i}",
                    signal[i],
                    restored[i]
                );
            }
        }
    }

    #[test]
    fn dog_reconstruction() {
        let n = 256;
        let tone = (0..n)
            .map(|i| 2. + (2. * PI * i as f64 / 32.).sin())
            .collect::<Vec<f64>>();
        for (order, tolerance) in [(2, 0.08), (4, 0.01), (6, 0.01)] {
            let wavelet = MotherWavelet::dog(order).unwrap();
            let engine = CwtEngine::<f64>::new(wavelet, n, 1., 29).unwrap();
            let coefficients = engine.forward(&tone).unwrap();
            let restored = engine.inverse(&coefficients).unwrap();
            for i in n / 4..3 * n / 4 {
                assert!(
                    (restored[i] - tone[i]).abs() < tolerance,
                    "{wavelet} reconstruction difference expected to be < {tolerance}, but values were ref {}, derived {} at {i}",
                    tone[i],
                    restored[i]
                );
            }
        }
    }

    #[test]
    fn gaussian_transform_runs() {
        let n = 128;
        let signal = test_signal(n);
        let engine = CwtEngine::<f64>::new(MotherWavelet::dog(0).unwrap(), n, 1., 20).unwrap();
        let coefficients = engine.forward(&signal).unwrap();
        assert_eq!(coefficients.coefficients().len(), 20);
        for row in coefficients.coefficients() {
            assert_eq!(row.len(), n);
            assert!(row.iter().all(|v| v.re.is_finite() && v.im.is_finite()));
        }
        let restored = engine.inverse(&coefficients).unwrap();
        assert_eq!(restored.len(), n);
        assert!(restored.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn explicit_scale_reconstruction() {
        let n = 256;
        let signal = test_signal(n);
        let scales = (0..40).map(|j| 1.5 * 1.12f64.powi(j)).collect::<Vec<_>>();
        for (wavelet, tolerance) in [
            (MotherWavelet::morlet(6.).unwrap(), 0.02),
            (MotherWavelet::paul(4).unwrap(), 0.03),
        ] {
            let mut engine = CwtEngine::<f64>::new(wavelet, n, 1., 29).unwrap();
            engine.set_scale_vector(&scales, 1.5, 1.12f64.log2()).unwrap();
            assert_eq!(engine.scales().len(), 40);
            let coefficients = engine.forward(&signal).unwrap();
            let restored = engine.inverse(&coefficients).unwrap();
            for i in n / 4..3 * n / 4 {
                assert!(
                    (restored[i] - signal[i]).abs() < tolerance,
                    "{wavelet} reconstruction difference expected to be < {tolerance}, but values were ref {}, derived {} at {i}",
                    signal[i],
                    restored[i]
                );
            }
        }
    }

    #[test]
    fn single_precision() {
        let engine =
            CwtEngine::<f32>::new(MotherWavelet::morlet(6.).unwrap(), 256, 1., 29).unwrap();
        let signal = test_signal(256).iter().map(|&x| x as f32).collect::<Vec<_>>();
        let coefficients = engine.forward(&signal).unwrap();
        let restored = engine.inverse(&coefficients).unwrap();
        for i in 64..192 {
            assert!((restored[i] - signal[i]).abs() < 0.02);
        }
    }

    #[test]
    fn mismatched_coefficients() {
        let mut engine =
            CwtEngine::<f64>::new(MotherWavelet::morlet(5.).unwrap(), 32, 1., 6).unwrap();
        let coefficients = engine.forward(&[1.; 32]).unwrap();
        engine.set_scales(ScaleType::Linear, 1., 1., None).unwrap();
        assert_eq!(
            engine.inverse(&coefficients).unwrap_err(),
            ScaletError::CoefficientsLayoutMismatch
        );
    }
}
