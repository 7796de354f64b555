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
use crate::err::ScaletError;
use std::fmt::{Display, Formatter};

/// Progression used to generate continuous transform scales.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub enum ScaleType {
    /// `s0 * power^(j * dj)`
    #[default]
    Power,
    /// `s0 + j * dj`
    Linear,
}

impl Display for ScaleType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleType::Power => f.write_str("power"),
            ScaleType::Linear => f.write_str("linear"),
        }
    }
}

/// Strictly increasing positive scale sequence with the parameters it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    scale_type: Option<ScaleType>,
    s0: f64,
    dj: f64,
    power: Option<u32>,
    values: Vec<f64>,
}

fn check_positive(value: f64) -> Result<(), ScaletError> {
    if value.is_finite() && value > 0. {
        Ok(())
    } else {
        Err(ScaletError::InvalidScaleParameter)
    }
}

impl Scales {
    /// Generates `total` scales.
    ///
    /// # Errors
    /// [`ScaletError::MissingPowerParameter`] for power scales without `power`,
    /// [`ScaletError::InvalidScaleParameter`] when `s0` or `dj` is not positive or `power < 2`.
    pub fn generate(
        scale_type: ScaleType,
        s0: f64,
        dj: f64,
        power: Option<u32>,
        total: usize,
    ) -> Result<Scales, ScaletError> {
        if total == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        check_positive(s0)?;
        check_positive(dj)?;
        let values = match scale_type {
            ScaleType::Power => {
                let power = power.ok_or(ScaletError::MissingPowerParameter)?;
                if power < 2 {
                    return Err(ScaletError::InvalidScaleParameter);
                }
                let base = power as f64;
                (0..total)
                    .map(|j| s0 * base.powf(j as f64 * dj))
                    .collect::<Vec<_>>()
            }
            ScaleType::Linear => (0..total).map(|j| s0 + j as f64 * dj).collect::<Vec<_>>(),
        };
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ScaletError::InvalidScaleParameter);
        }
        Ok(Scales {
            scale_type: Some(scale_type),
            s0,
            dj,
            power: match scale_type {
                ScaleType::Power => power,
                ScaleType::Linear => None,
            },
            values,
        })
    }

    /// Takes a caller supplied sequence, it must be positive and strictly increasing.
    pub fn explicit(values: Vec<f64>, s0: f64, dj: f64) -> Result<Scales, ScaletError> {
        if values.is_empty() {
            return Err(ScaletError::ZeroedBaseSize);
        }
        check_positive(s0)?;
        check_positive(dj)?;
        for &v in values.iter() {
            check_positive(v)?;
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ScaletError::InvalidScaleParameter);
        }
        Ok(Scales {
            scale_type: None,
            s0,
            dj,
            power: None,
            values,
        })
    }

    /// `None` for explicit sequences.
    pub fn scale_type(&self) -> Option<ScaleType> {
        self.scale_type
    }

    pub fn s0(&self) -> f64 {
        self.s0
    }

    pub fn dj(&self) -> f64 {
        self.dj
    }

    pub fn power(&self) -> Option<u32> {
        self.power
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Quadrature weights `d(ln s) / sqrt(s)` for the reconstruction sum.
    pub(crate) fn reconstruction_weights(&self) -> Vec<f64> {
        let ln = self.values.iter().map(|s| s.ln()).collect::<Vec<_>>();
        let last = ln.len() - 1;
        self.values
            .iter()
            .enumerate()
            .map(|(j, s)| {
                let step = if last == 0 {
                    1.
                } else if j == 0 {
                    ln[1] - ln[0]
                } else if j == last {
                    ln[last] - ln[last - 1]
                } else {
                    0.5 * (ln[j + 1] - ln[j - 1])
                };
                step / s.sqrt()
            })
            .collect()
    }
}

impl Display for Scales {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.scale_type, self.power) {
            (Some(ScaleType::Power), Some(power)) => f.write_fmt(format_args!(
                "{} power scales, s0 {}, dj {}, base {power}",
                self.values.len(),
                self.s0,
                self.dj
            )),
            (Some(scale_type), _) => f.write_fmt(format_args!(
                "{} {scale_type} scales, s0 {}, dj {}",
                self.values.len(),
                self.s0,
                self.dj
            )),
            (None, _) => f.write_fmt(format_args!(
                "{} explicit scales, s0 {}, dj {}",
                self.values.len(),
                self.s0,
                self.dj
            )),
        }
    }
}
