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
use crate::convolve1d::ConvolutionMethod;
use crate::err::{ScaletError, try_vec};
use crate::extension::SignalExtension;
use crate::factory::{check_convolution, make_single_level_step, max_levels};
use crate::filter_bank::FilterBank;
use crate::{SingleLevelStep, WaveletSample};
use num_traits::AsPrimitive;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, trace};

/// Multilevel decomposition scheme.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
pub enum TransformMethod {
    /// Critically sampled transform, bands halve at each level
    #[default]
    Dwt,
    /// Stationary (undecimated) transform, bands keep signal length
    Swt,
    /// Maximal overlap transform, undecimated with rescaled filters
    Modwt,
}

impl Display for TransformMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformMethod::Dwt => f.write_str("dwt"),
            TransformMethod::Swt => f.write_str("swt"),
            TransformMethod::Modwt => f.write_str("modwt"),
        }
    }
}

/// Everything that determines a 1D transform and its coefficient layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig<T> {
    pub filter_bank: Arc<FilterBank<T>>,
    pub signal_length: usize,
    pub levels: usize,
    pub method: TransformMethod,
    pub extension: SignalExtension,
    pub convolution: ConvolutionMethod,
}

impl<T> TransformConfig<T> {
    /// Length table `[A_J, D_J, D_(J-1), ..., D_1, N]`.
    pub fn lengths(&self) -> Vec<usize> {
        let filter_length = self.filter_bank.dec_lo.len();
        let mut per_level = Vec::with_capacity(self.levels);
        let mut current = self.signal_length;
        for _ in 0..self.levels {
            current = match self.method {
                TransformMethod::Dwt => crate::util::dwt_length(current, filter_length),
                TransformMethod::Swt | TransformMethod::Modwt => current,
            };
            per_level.push(current);
        }
        let mut lengths = Vec::with_capacity(self.levels + 2);
        lengths.push(*per_level.last().unwrap_or(&self.signal_length));
        lengths.extend(per_level.iter().rev());
        lengths.push(self.signal_length);
        lengths
    }
}

/// Flat coefficient buffer `[A_J, D_J, D_(J-1), ..., D_1]` with its length table.
///
/// Band offsets are derived from the table, nothing else is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletCoefficients<T> {
    data: Vec<T>,
    lengths: Vec<usize>,
}

impl<T> WaveletCoefficients<T> {
    /// Levels stored in the buffer.
    pub fn levels(&self) -> usize {
        self.lengths.len() - 2
    }

    /// `[len(A_J), len(D_J), ..., len(D_1), signal_length]`.
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_inner(self) -> Vec<T> {
        self.data
    }

    fn band_range(&self, position: usize) -> std::ops::Range<usize> {
        let start = self.lengths[..position].iter().sum::<usize>();
        start..start + self.lengths[position]
    }

    fn detail_position(&self, level: usize) -> Result<usize, ScaletError> {
        let levels = self.levels();
        if level == 0 || level > levels {
            return Err(ScaletError::LevelNotAvailable(level, levels));
        }
        Ok(levels - level + 1)
    }

    /// Coarsest approximation band `A_J`.
    pub fn approximation(&self) -> &[T] {
        &self.data[self.band_range(0)]
    }

    pub fn approximation_mut(&mut self) -> &mut [T] {
        let range = self.band_range(0);
        &mut self.data[range]
    }

    /// Detail band `D_level`, level 1 is the finest.
    pub fn detail(&self, level: usize) -> Result<&[T], ScaletError> {
        let position = self.detail_position(level)?;
        Ok(&self.data[self.band_range(position)])
    }

    pub fn detail_mut(&mut self, level: usize) -> Result<&mut [T], ScaletError> {
        let position = self.detail_position(level)?;
        let range = self.band_range(position);
        Ok(&mut self.data[range])
    }
}

/// 1D multilevel analysis and synthesis for DWT, SWT and MODWT.
pub struct DwtEngine<T> {
    config: TransformConfig<T>,
    step: Arc<dyn SingleLevelStep<T> + Send + Sync>,
}

impl<T: WaveletSample> DwtEngine<T>
where
    f64: AsPrimitive<T>,
{
    /// Creates an engine with symmetric extension for DWT (periodic for the undecimated
    /// methods) and direct convolution.
    ///
    /// # Errors
    /// [`ScaletError::ZeroedBaseSize`] for an empty signal,
    /// [`ScaletError::LevelsOutOfRange`] when `levels` is zero or `2^levels` exceeds
    /// the signal length for DWT.
    pub fn new(
        filter_bank: Arc<FilterBank<T>>,
        signal_length: usize,
        method: TransformMethod,
        levels: usize,
    ) -> Result<Self, ScaletError> {
        if signal_length == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        let max = max_levels(method, signal_length);
        if levels == 0 || levels > max {
            return Err(ScaletError::LevelsOutOfRange(levels, max));
        }
        let extension = match method {
            TransformMethod::Dwt => SignalExtension::Symmetric,
            TransformMethod::Swt | TransformMethod::Modwt => SignalExtension::Periodic,
        };
        let convolution = ConvolutionMethod::Direct;
        debug!(
            "{method} engine for {filter_bank}, signal length {signal_length}, {levels} levels"
        );
        let step = make_single_level_step(&filter_bank, method, extension, convolution);
        Ok(Self {
            config: TransformConfig {
                filter_bank,
                signal_length,
                levels,
                method,
                extension,
                convolution,
            },
            step,
        })
    }

    fn rebuild_step(&mut self) {
        self.step = make_single_level_step(
            &self.config.filter_bank,
            self.config.method,
            self.config.extension,
            self.config.convolution,
        );
    }

    /// Boundary extension is meaningful only for the decimated transform.
    pub fn configure_extension(&mut self, extension: SignalExtension) -> Result<(), ScaletError> {
        if self.config.method != TransformMethod::Dwt {
            return Err(ScaletError::InvalidExtensionForMethod(self.config.method));
        }
        debug!("{} extension set to {extension}", self.config.method);
        self.config.extension = extension;
        self.rebuild_step();
        Ok(())
    }

    /// FFT convolution is rejected for MODWT.
    pub fn configure_convolution(
        &mut self,
        convolution: ConvolutionMethod,
    ) -> Result<(), ScaletError> {
        check_convolution(self.config.method, convolution)?;
        debug!("{} convolution set to {convolution}", self.config.method);
        self.config.convolution = convolution;
        self.rebuild_step();
        Ok(())
    }

    pub fn config(&self) -> &TransformConfig<T> {
        &self.config
    }

    /// Expected length table of every buffer this engine produces or accepts.
    pub fn lengths(&self) -> Vec<usize> {
        self.config.lengths()
    }

    pub fn forward(&self, signal: &[T]) -> Result<WaveletCoefficients<T>, ScaletError> {
        if signal.len() != self.config.signal_length {
            return Err(ScaletError::SignalLengthMismatch(
                self.config.signal_length,
                signal.len(),
            ));
        }
        trace!(
            "{} forward over {} samples",
            self.config.method,
            signal.len()
        );

        let lengths = self.config.lengths();
        let total = lengths[..lengths.len() - 1].iter().sum::<usize>();
        let mut data = try_vec![T::zero(); total];

        let levels = self.config.levels;
        let mut current = signal.to_vec();
        // details are written from the back, finest level last
        let mut detail_end = total;
        for level in 1..=levels {
            let band = lengths[levels - level + 1];
            let mut approx = try_vec![T::zero(); band];
            let detail_start = detail_end - band;
            self.step.forward(
                &current,
                &mut approx,
                &mut data[detail_start..detail_end],
                level,
            )?;
            detail_end = detail_start;
            current = approx;
        }
        data[..lengths[0]].copy_from_slice(&current);

        Ok(WaveletCoefficients { data, lengths })
    }

    pub fn inverse(&self, coefficients: &WaveletCoefficients<T>) -> Result<Vec<T>, ScaletError> {
        if coefficients.lengths != self.config.lengths() {
            return Err(ScaletError::CoefficientsLayoutMismatch);
        }
        trace!(
            "{} inverse over {} coefficients",
            self.config.method,
            coefficients.data.len()
        );

        let levels = self.config.levels;
        let mut current = coefficients.approximation().to_vec();
        for level in (1..=levels).rev() {
            let target = coefficients.lengths[levels - level + 2];
            let mut output = try_vec![T::zero(); target];
            self.step.inverse(
                &current,
                coefficients.detail(level)?,
                &mut output,
                level,
            )?;
            current = output;
        }
        Ok(current)
    }
}

impl<T> Display for DwtEngine<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let config = &self.config;
        writeln!(f, "Wavelet: {}", config.filter_bank)?;
        writeln!(f, "Method: {}", config.method)?;
        writeln!(f, "Signal length: {}", config.signal_length)?;
        writeln!(f, "Levels: {}", config.levels)?;
        writeln!(f, "Extension: {}", config.extension)?;
        write!(f, "Convolution: {}", config.convolution)
    }
}
