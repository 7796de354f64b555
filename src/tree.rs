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
use crate::dwt::TransformMethod;
use crate::err::{ScaletError, try_vec};
use crate::extension::SignalExtension;
use crate::factory::{make_single_level_step, max_levels};
use crate::filter_bank::FilterBank;
use crate::util::dwt_length;
use crate::{SingleLevelStep, WaveletSample};
use num_traits::AsPrimitive;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, trace};

/// Complete binary tree of decimated sub-bands stored level by level.
///
/// Level 0 holds the signal itself, node `(level, index)` splits into the
/// approximation `(level + 1, 2 * index)` and the detail `(level + 1, 2 * index + 1)`.
/// All nodes of a level share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketTree<T> {
    data: Vec<T>,
    level_lengths: Vec<usize>,
}

impl<T> PacketTree<T> {
    /// Depth of the tree.
    pub fn levels(&self) -> usize {
        self.level_lengths.len() - 1
    }

    /// Length of every node at `level`, `[signal_length, ..., deepest]` over all levels.
    pub fn level_lengths(&self) -> &[usize] {
        &self.level_lengths
    }

    pub fn node_length(&self, level: usize) -> Result<usize, ScaletError> {
        self.level_lengths
            .get(level)
            .copied()
            .ok_or(ScaletError::LevelNotAvailable(level, self.levels()))
    }

    fn level_offset(&self, level: usize) -> usize {
        self.level_lengths[..level]
            .iter()
            .enumerate()
            .map(|(i, &len)| (1usize << i) * len)
            .sum()
    }

    fn node_range(&self, level: usize, index: usize) -> Result<std::ops::Range<usize>, ScaletError> {
        if level > self.levels() || index >= (1usize << level) {
            return Err(ScaletError::NodeOutOfRange(level, index));
        }
        let length = self.level_lengths[level];
        let start = self.level_offset(level) + index * length;
        Ok(start..start + length)
    }

    pub fn coefficients(&self, level: usize, index: usize) -> Result<&[T], ScaletError> {
        let range = self.node_range(level, index)?;
        Ok(&self.data[range])
    }

    pub fn coefficients_mut(&mut self, level: usize, index: usize) -> Result<&mut [T], ScaletError> {
        let range = self.node_range(level, index)?;
        Ok(&mut self.data[range])
    }

    /// Concatenation of the deepest level in index order.
    pub fn output(&self) -> &[T] {
        let offset = self.level_offset(self.levels());
        &self.data[offset..]
    }
}

/// Node lengths for levels `0..=levels`.
pub(crate) fn tree_level_lengths(signal_length: usize, filter_length: usize, levels: usize) -> Vec<usize> {
    let mut lengths = Vec::with_capacity(levels + 1);
    lengths.push(signal_length);
    for level in 0..levels {
        lengths.push(dwt_length(lengths[level], filter_length));
    }
    lengths
}

/// Splits every node of every level with `step`.
pub(crate) fn decompose_tree<T: WaveletSample>(
    step: &(dyn SingleLevelStep<T> + Send + Sync),
    signal: &[T],
    level_lengths: Vec<usize>,
) -> Result<PacketTree<T>, ScaletError> {
    let total = level_lengths
        .iter()
        .enumerate()
        .map(|(i, &len)| (1usize << i) * len)
        .sum::<usize>();
    let mut data = try_vec![T::zero(); total];
    data[..signal.len()].copy_from_slice(signal);

    let levels = level_lengths.len() - 1;
    let mut parent_offset = 0usize;
    for level in 0..levels {
        let parent_length = level_lengths[level];
        let child_length = level_lengths[level + 1];
        let child_offset = parent_offset + (1usize << level) * parent_length;
        let (head, tail) = data.split_at_mut(child_offset);
        let parents = &head[parent_offset..];
        for (index, parent) in parents.chunks_exact(parent_length).enumerate() {
            let children = &mut tail[2 * index * child_length..(2 * index + 2) * child_length];
            let (approx, details) = children.split_at_mut(child_length);
            step.forward(parent, approx, details, level + 1)?;
        }
        parent_offset = child_offset;
    }

    Ok(PacketTree {
        data,
        level_lengths,
    })
}

/// Full packet tree decomposition without reconstruction.
pub struct WaveletTreeEngine<T> {
    filter_bank: Arc<FilterBank<T>>,
    signal_length: usize,
    levels: usize,
    extension: SignalExtension,
    maximum_iterations: usize,
    step: Arc<dyn SingleLevelStep<T> + Send + Sync>,
}

impl<T: WaveletSample> WaveletTreeEngine<T>
where
    f64: AsPrimitive<T>,
{
    pub fn new(
        filter_bank: Arc<FilterBank<T>>,
        signal_length: usize,
        levels: usize,
    ) -> Result<Self, ScaletError> {
        if signal_length == 0 {
            return Err(ScaletError::ZeroedBaseSize);
        }
        let max = max_levels(TransformMethod::Dwt, signal_length);
        if levels == 0 || levels > max {
            return Err(ScaletError::LevelsOutOfRange(levels, max));
        }
        debug!("wavelet tree for {filter_bank}, signal length {signal_length}, {levels} levels");
        let extension = SignalExtension::default();
        let step = make_single_level_step(
            &filter_bank,
            TransformMethod::Dwt,
            extension,
            ConvolutionMethod::Direct,
        );
        Ok(Self {
            filter_bank,
            signal_length,
            levels,
            extension,
            maximum_iterations: levels,
            step,
        })
    }

    pub fn configure_extension(&mut self, extension: SignalExtension) {
        debug!("wavelet tree extension set to {extension}");
        self.extension = extension;
        self.step = make_single_level_step(
            &self.filter_bank,
            TransformMethod::Dwt,
            extension,
            ConvolutionMethod::Direct,
        );
    }

    pub fn extension(&self) -> SignalExtension {
        self.extension
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    pub fn maximum_iterations(&self) -> usize {
        self.maximum_iterations
    }

    /// Values below the configured level count are ignored.
    pub fn set_maximum_iterations(&mut self, iterations: usize) {
        if iterations >= self.levels {
            self.maximum_iterations = iterations;
        }
    }

    /// Node lengths for levels `0..=levels`, computed without decomposing.
    pub fn coefficient_lengths(&self) -> Vec<usize> {
        tree_level_lengths(
            self.signal_length,
            self.filter_bank.filter_length(),
            self.levels,
        )
    }

    pub fn node_length(&self, level: usize) -> Result<usize, ScaletError> {
        if level > self.levels {
            return Err(ScaletError::LevelNotAvailable(level, self.levels));
        }
        Ok(self.coefficient_lengths()[level])
    }

    pub fn forward(&self, signal: &[T]) -> Result<PacketTree<T>, ScaletError> {
        if signal.len() != self.signal_length {
            return Err(ScaletError::SignalLengthMismatch(
                self.signal_length,
                signal.len(),
            ));
        }
        trace!("wavelet tree forward over {} samples", signal.len());
        decompose_tree(self.step.as_ref(), signal, self.coefficient_lengths())
    }
}

impl<T> Display for WaveletTreeEngine<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wavelet: {}", self.filter_bank)?;
        writeln!(f, "Signal length: {}", self.signal_length)?;
        writeln!(f, "Levels: {}", self.levels)?;
        write!(f, "Extension: {}", self.extension)
    }
}
