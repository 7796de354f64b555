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
use num_complex::Complex;
use std::f64::consts::PI;
use std::fmt::{Display, Formatter};

/// Highest Paul order, the normalization factorial stays exact in `f64` well past it.
pub const MAX_PAUL_ORDER: u32 = 20;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Shape {
    Morlet(f64),
    Paul(u32),
    Dog(u32),
}

/// Analytic wavelet used by the continuous transform, defined in the frequency domain.
///
/// Only valid parameters can be constructed, see [`MotherWavelet::morlet`],
/// [`MotherWavelet::paul`] and [`MotherWavelet::dog`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MotherWavelet {
    shape: Shape,
}

impl MotherWavelet {
    /// Morlet with non-dimensional frequency `omega0` in `[4, 6]`.
    pub fn morlet(omega0: f64) -> Option<MotherWavelet> {
        if !(4.0..=6.0).contains(&omega0) {
            return None;
        }
        Some(MotherWavelet {
            shape: Shape::Morlet(omega0),
        })
    }

    /// Paul wavelet of order `m` in `0..=20`.
    pub fn paul(m: u32) -> Option<MotherWavelet> {
        if m > MAX_PAUL_ORDER {
            return None;
        }
        Some(MotherWavelet {
            shape: Shape::Paul(m),
        })
    }

    /// `m`-th derivative of a Gaussian, `m` must be even.
    ///
    /// `m = 0` is the Gaussian itself, it has a non zero mean and works only on
    /// mean removed signals.
    pub fn dog(m: u32) -> Option<MotherWavelet> {
        if m % 2 != 0 {
            return None;
        }
        Some(MotherWavelet {
            shape: Shape::Dog(m),
        })
    }

    pub fn name(&self) -> &'static str {
        match self.shape {
            Shape::Morlet(_) => "morlet",
            Shape::Paul(_) => "paul",
            Shape::Dog(_) => "dog",
        }
    }

    /// `omega0` for Morlet, the order for Paul and DOG.
    pub fn parameter(&self) -> f64 {
        match self.shape {
            Shape::Morlet(omega0) => omega0,
            Shape::Paul(m) | Shape::Dog(m) => m as f64,
        }
    }

    /// Ratio of the equivalent Fourier period to the scale.
    pub fn fourier_factor(&self) -> f64 {
        match self.shape {
            Shape::Morlet(omega0) => 4. * PI / (omega0 + (2. + omega0 * omega0).sqrt()),
            Shape::Paul(m) => 4. * PI / (2 * m + 1) as f64,
            Shape::Dog(m) => 2. * PI * (2. / (2 * m + 1) as f64).sqrt(),
        }
    }

    /// Factor turning a distance from the edge into the cone of influence, in period units.
    pub fn coi_factor(&self) -> f64 {
        match self.shape {
            Shape::Morlet(_) | Shape::Dog(_) => self.fourier_factor() / std::f64::consts::SQRT_2,
            Shape::Paul(_) => self.fourier_factor() * std::f64::consts::SQRT_2,
        }
    }

    /// Analytic wavelets carry no energy at negative frequencies.
    pub(crate) fn is_analytic(&self) -> bool {
        !matches!(self.shape, Shape::Dog(_))
    }

    /// Daughter wavelet at `scale` sampled on the angular `wavenumbers`.
    pub(crate) fn daughter(&self, wavenumbers: &[f64], scale: f64, dt: f64) -> Vec<Complex<f64>> {
        let energy = (2. * PI * scale / dt).sqrt();
        match self.shape {
            Shape::Morlet(omega0) => {
                let norm = energy * PI.powf(-0.25);
                wavenumbers
                    .iter()
                    .map(|&k| {
                        if k > 0. {
                            let exponent = -0.5 * (scale * k - omega0).powi(2);
                            Complex::new(norm * exponent.exp(), 0.)
                        } else {
                            Complex::new(0., 0.)
                        }
                    })
                    .collect()
            }
            Shape::Paul(m) => {
                // m * (2m - 1)! written as (2m)! / 2 so that m = 0 stays defined
                let factorial = (1..=2 * m).fold(1f64, |acc, i| acc * i as f64);
                let norm = energy * 2f64.powi(m as i32) / (factorial / 2.).sqrt();
                wavenumbers
                    .iter()
                    .map(|&k| {
                        if k > 0. {
                            let sk = scale * k;
                            Complex::new(norm * sk.powi(m as i32) * (-sk).exp(), 0.)
                        } else {
                            Complex::new(0., 0.)
                        }
                    })
                    .collect()
            }
            Shape::Dog(m) => {
                // evaluated in log space, sk^m and Gamma overflow for high orders
                let log_norm = energy.ln() - 0.5 * ln_gamma_half_integer(m);
                // i^m is real for even m
                let sign = if (m / 2) % 2 == 0 { 1. } else { -1. };
                let order = m as f64;
                wavenumbers
                    .iter()
                    .map(|&k| {
                        let sk = scale * k;
                        let magnitude = if m == 0 {
                            (log_norm - 0.5 * sk * sk).exp()
                        } else if sk == 0. {
                            0.
                        } else {
                            (log_norm + order * sk.abs().ln() - 0.5 * sk * sk).exp()
                        };
                        Complex::new(-sign * magnitude, 0.)
                    })
                    .collect()
            }
        }
    }
}

/// `ln Gamma(m + 1/2)` by recurrence from `Gamma(1/2) = sqrt(pi)`.
fn ln_gamma_half_integer(m: u32) -> f64 {
    (0..m).fold(0.5 * PI.ln(), |acc, i| acc + (i as f64 + 0.5).ln())
}

impl Display for MotherWavelet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.shape {
            Shape::Morlet(omega0) => f.write_fmt(format_args!("morlet({omega0})")),
            Shape::Paul(m) => f.write_fmt(format_args!("paul({m})")),
            Shape::Dog(m) => f.write_fmt(format_args!("dog({m})")),
        }
    }
}
