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
use crate::err::ScaletError;
use std::fmt::{Display, Formatter};

/// Additive cost used to pick the best packet basis, lower is better.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Entropy {
    /// `-sum p ln p` with `p = x^2 / E`, `E` is the signal energy
    #[default]
    Shannon,
    /// Count of coefficients with `|x| > t`
    Threshold(f64),
    /// `sum |x|^p`, `p >= 1`
    Norm(f64),
    /// `sum ln x^2` over non zero coefficients
    LogEnergy,
}

impl Display for Entropy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Entropy::Shannon => f.write_str("shannon"),
            Entropy::Threshold(t) => f.write_fmt(format_args!("threshold({t})")),
            Entropy::Norm(p) => f.write_fmt(format_args!("norm({p})")),
            Entropy::LogEnergy => f.write_str("logenergy"),
        }
    }
}

impl Entropy {
    pub(crate) fn validate(self) -> Result<(), ScaletError> {
        let valid = match self {
            Entropy::Shannon | Entropy::LogEnergy => true,
            Entropy::Threshold(t) => t.is_finite() && t >= 0.,
            Entropy::Norm(p) => p.is_finite() && p >= 1.,
        };
        if valid {
            Ok(())
        } else {
            Err(ScaletError::InvalidEntropyParameter(self))
        }
    }

    /// Cost of one node, `energy` is the energy of the decomposed signal.
    pub(crate) fn cost<T: WaveletSample>(self, coefficients: &[T], energy: f64) -> f64 {
        match self {
            Entropy::Shannon => {
                if energy == 0. {
                    return 0.;
                }
                let mut acc = 0f64;
                for &x in coefficients.iter() {
                    let v: f64 = x.as_();
                    let p = v * v / energy;
                    if p > 0. {
                        acc -= p * p.ln();
                    }
                }
                acc
            }
            Entropy::Threshold(t) => coefficients
                .iter()
                .filter(|&&x| {
                    let v: f64 = x.as_();
                    v.abs() > t
                })
                .count() as f64,
            Entropy::Norm(p) => coefficients
                .iter()
                .map(|&x| {
                    let v: f64 = x.as_();
                    v.abs().powf(p)
                })
                .sum(),
            Entropy::LogEnergy => {
                let mut acc = 0f64;
                for &x in coefficients.iter() {
                    let v: f64 = x.as_();
                    if v != 0. {
                        acc += (v * v).ln();
                    }
                }
                acc
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs() {
        let x = [3f64, -4., 0.];
        let energy = 25.;
        let shannon = Entropy::Shannon.cost(&x, energy);
        let p = [9. / 25., 16. / 25.];
        let expected = -(p[0] * f64::ln(p[0]) + p[1] * f64::ln(p[1]));
        assert!(
            (shannon - expected).abs() < 1e-12,
            "shannon difference expected to be < 1e-12, but values were ref {expected}, derived {shannon}"
        );
        assert_eq!(Entropy::Threshold(3.5).cost(&x, energy), 1.);
        assert_eq!(Entropy::Threshold(0.).cost(&x, energy), 2.);
        assert!((Entropy::Norm(1.).cost(&x, energy) - 7.).abs() < 1e-12);
        assert!((Entropy::Norm(2.).cost(&x, energy) - 25.).abs() < 1e-12);
        let log_energy = Entropy::LogEnergy.cost(&x, energy);
        assert!((log_energy - (9f64.ln() + 16f64.ln())).abs() < 1e-12);
        assert_eq!(Entropy::Shannon.cost(&[0f32; 4], 0.), 0.);
    }

    #[test]
    fn parameter_validation() {
        assert!(Entropy::Shannon.validate().is_ok());
        assert!(Entropy::Threshold(0.).validate().is_ok());
        assert!(Entropy::Norm(1.5).validate().is_ok());
        assert_eq!(
            Entropy::Threshold(-1.).validate(),
            Err(ScaletError::InvalidEntropyParameter(Entropy::Threshold(-1.)))
        );
        assert!(Entropy::Norm(0.5).validate().is_err());
        assert!(Entropy::Norm(f64::NAN).validate().is_err());
    }

    #[test]
    fn names() {
        assert_eq!(Entropy::Shannon.to_string(), "shannon");
        assert_eq!(Entropy::Threshold(0.5).to_string(), "threshold(0.5)");
        assert_eq!(Entropy::Norm(2.).to_string(), "norm(2)");
        assert_eq!(Entropy::LogEnergy.to_string(), "logenergy");
    }
}
