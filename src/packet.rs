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
use crate::entropy::Entropy;
use crate::err::{ScaletError, try_vec};
use crate::extension::SignalExtension;
use crate::factory::{make_single_level_step, max_levels};
use crate::filter_bank::FilterBank;
use crate::tree::{PacketTree, decompose_tree, tree_level_lengths};
use crate::{SingleLevelStep, WaveletSample};
use num_traits::AsPrimitive;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use tracing::{debug, trace};

/// Packet tree together with the nodes chosen to represent the signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketDecomposition<T> {
    pub tree: PacketTree<T>,
    /// `(level, index)` pairs tiling the frequency axis from left to right
    pub basis: Vec<(usize, usize)>,
}

/// Wavelet packet analysis with best basis selection and reconstruction.
pub struct WaveletPacketEngine<T> {
    filter_bank: Arc<FilterBank<T>>,
    signal_length: usize,
    levels: usize,
    extension: SignalExtension,
    entropy: Entropy,
    step: Arc<dyn SingleLevelStep<T> + Send + Sync>,
}

impl<T: WaveletSample> WaveletPacketEngine<T>
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
        debug!("wavelet packet for {filter_bank}, signal length {signal_length}, {levels} levels");
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
            entropy: Entropy::default(),
            step,
        })
    }

    pub fn configure_extension(&mut self, extension: SignalExtension) {
        debug!("wavelet packet extension set to {extension}");
        self.extension = extension;
        self.step = make_single_level_step(
            &self.filter_bank,
            TransformMethod::Dwt,
            extension,
            ConvolutionMethod::Direct,
        );
    }

    /// # Errors
    /// [`ScaletError::InvalidEntropyParameter`] for a negative threshold or a norm below 1.
    pub fn configure_entropy(&mut self, entropy: Entropy) -> Result<(), ScaletError> {
        entropy.validate()?;
        debug!("wavelet packet entropy set to {entropy}");
        self.entropy = entropy;
        Ok(())
    }

    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    pub fn extension(&self) -> SignalExtension {
        self.extension
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

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

    pub fn forward(&self, signal: &[T]) -> Result<PacketDecomposition<T>, ScaletError> {
        if signal.len() != self.signal_length {
            return Err(ScaletError::SignalLengthMismatch(
                self.signal_length,
                signal.len(),
            ));
        }
        trace!("wavelet packet forward over {} samples", signal.len());
        let tree = decompose_tree(self.step.as_ref(), signal, self.coefficient_lengths())?;
        let basis = self.best_basis(&tree)?;
        Ok(PacketDecomposition { tree, basis })
    }

    /// Bottom up selection, a node is kept when its cost does not exceed
    /// the best cost of its two children.
    pub fn best_basis(&self, tree: &PacketTree<T>) -> Result<Vec<(usize, usize)>, ScaletError> {
        if tree.level_lengths() != self.coefficient_lengths().as_slice() {
            return Err(ScaletError::CoefficientsLayoutMismatch);
        }
        let energy = tree
            .coefficients(0, 0)?
            .iter()
            .map(|&x| {
                let v: f64 = x.as_();
                v * v
            })
            .sum::<f64>();

        let levels = self.levels;
        let mut best = try_vec![0f64; 1usize << levels];
        for (index, cost) in best.iter_mut().enumerate() {
            *cost = self.entropy.cost(tree.coefficients(levels, index)?, energy);
        }
        // keep[level][index], deepest level nodes are always terminal
        let mut keep = Vec::with_capacity(levels + 1);
        for level in 0..=levels {
            keep.push(try_vec![level == levels; 1usize << level]);
        }
        for level in (0..levels).rev() {
            let mut parents = try_vec![0f64; 1usize << level];
            for (index, parent) in parents.iter_mut().enumerate() {
                let cost = self.entropy.cost(tree.coefficients(level, index)?, energy);
                let children = best[2 * index] + best[2 * index + 1];
                if cost <= children {
                    *parent = cost;
                    keep[level][index] = true;
                } else {
                    *parent = children;
                }
            }
            best = parents;
        }

        let mut basis = Vec::new();
        let mut pending = vec![(0usize, 0usize)];
        while let Some((level, index)) = pending.pop() {
            if keep[level][index] {
                basis.push((level, index));
            } else {
                pending.push((level + 1, 2 * index + 1));
                pending.push((level + 1, 2 * index));
            }
        }
        Ok(basis)
    }

    /// Rebuilds the signal from the basis nodes only, other nodes are not read.
    pub fn inverse(&self, decomposition: &PacketDecomposition<T>) -> Result<Vec<T>, ScaletError> {
        let tree = &decomposition.tree;
        if tree.level_lengths() != self.coefficient_lengths().as_slice() {
            return Err(ScaletError::CoefficientsLayoutMismatch);
        }
        trace!(
            "wavelet packet inverse over {} basis nodes",
            decomposition.basis.len()
        );
        let mut selected = Vec::with_capacity(self.levels + 1);
        for level in 0..=self.levels {
            selected.push(try_vec![false; 1usize << level]);
        }
        for &(level, index) in decomposition.basis.iter() {
            if level > self.levels || index >= (1usize << level) {
                return Err(ScaletError::NodeOutOfRange(level, index));
            }
            selected[level][index] = true;
        }
        self.rebuild(tree, &selected, 0, 0)
    }

    fn rebuild(
        &self,
        tree: &PacketTree<T>,
        selected: &[Vec<bool>],
        level: usize,
        index: usize,
    ) -> Result<Vec<T>, ScaletError> {
        if selected[level][index] {
            return Ok(tree.coefficients(level, index)?.to_vec());
        }
        if level == self.levels {
            // the basis leaves part of the frequency axis uncovered
            return Err(ScaletError::CoefficientsLayoutMismatch);
        }
        let approx = self.rebuild(tree, selected, level + 1, 2 * index)?;
        let details = self.rebuild(tree, selected, level + 1, 2 * index + 1)?;
        let length = tree.node_length(level)?;
        let mut output = try_vec![T::zero(); length];
        self.step
            .inverse(&approx, &details, &mut output, level + 1)?;
        Ok(output)
    }
}

impl<T> Display for WaveletPacketEngine<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Wavelet: {}", self.filter_bank)?;
        writeln!(f, "Signal length: {}", self.signal_length)?;
        writeln!(f, "Levels: {}", self.levels)?;
        writeln!(f, "Extension: {}", self.extension)?;
        write!(f, "Entropy: {}", self.entropy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_bank::WaveletFamily;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn engine(family: WaveletFamily, order: usize, length: usize, levels: usize) -> WaveletPacketEngine<f64> {
        WaveletPacketEngine::new(Arc::new(FilterBank::new(family, order).unwrap()), length, levels)
            .unwrap()
    }

    fn basis_width(basis: &[(usize, usize)], levels: usize) -> usize {
        basis.iter().map(|&(level, _)| 1usize << (levels - level)).sum()
    }

    #[test]
    fn round_trip_with_every_entropy() {
        let mut rng = StdRng::seed_from_u64(42);
        let entropies = [
            Entropy::Shannon,
            Entropy::Threshold(0.2),
            Entropy::Norm(1.2),
            Entropy::LogEnergy,
        ];
        for (length, levels) in [(8usize, 2usize), (16, 3), (100, 4), (257, 3)] {
            let signal = (0..length)
                .map(|_| rng.random_range(-1.0..1.0))
                .collect::<Vec<f64>>();
            for extension in [SignalExtension::Periodic, SignalExtension::Symmetric] {
                for entropy in entropies {
                    let mut packet = engine(WaveletFamily::Symlet, 3, length, levels);
                    packet.configure_extension(extension);
                    packet.configure_entropy(entropy).unwrap();
                    let decomposition = packet.forward(&signal).unwrap();
                    assert_eq!(basis_width(&decomposition.basis, levels), 1 << levels);
                    let restored = packet.inverse(&decomposition).unwrap();
                    for (i, (a, b)) in signal.iter().zip(restored.iter()).enumerate() {
                        assert!(
                            (a - b).abs() < 1e-10,
                            "reconstructed difference expected to be < 1e-10, but values were ref {a}, derived {b} at {i} for {entropy} {extension} N={length}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn best_basis_of_constant_signal() {
        let mut packet = engine(WaveletFamily::Haar, 1, 8, 3);
        packet.configure_entropy(Entropy::Threshold(1e-9)).unwrap();
        let decomposition = packet.forward(&[1.; 8]).unwrap();
        assert_eq!(decomposition.basis, vec![(3, 0), (3, 1), (2, 1), (1, 1)]);

        packet.configure_entropy(Entropy::Threshold(1e9)).unwrap();
        let decomposition = packet.forward(&[1.; 8]).unwrap();
        assert_eq!(decomposition.basis, vec![(0, 0)]);
    }

    #[test]
    fn nodes_outside_basis_are_not_read() {
        let mut packet = engine(WaveletFamily::Daubechies, 2, 64, 3);
        packet.configure_entropy(Entropy::Norm(1.)).unwrap();
        let signal = (0..64)
            .map(|i| (i as f64 * 0.2).sin() + 0.1 * (i as f64 * 2.9).cos())
            .collect::<Vec<_>>();
        let mut decomposition = packet.forward(&signal).unwrap();
        decomposition.basis = vec![(1, 0), (2, 2), (3, 6), (3, 7)];
        decomposition.tree.coefficients_mut(0, 0).unwrap().fill(0.);
        decomposition.tree.coefficients_mut(3, 0).unwrap().fill(7.);
        let restored = packet.inverse(&decomposition).unwrap();
        for (a, b) in signal.iter().zip(restored.iter()) {
            assert!(
                (a - b).abs() < 1e-10,
                "reconstructed difference expected to be < 1e-10, but values were ref {a}, derived {b}"
            );
        }

        decomposition.basis = vec![(1, 0), (2, 2)];
        assert_eq!(
            packet.inverse(&decomposition).unwrap_err(),
            ScaletError::CoefficientsLayoutMismatch
        );
        decomposition.basis = vec![(2, 4)];
        assert_eq!(
            packet.inverse(&decomposition).unwrap_err(),
            ScaletError::NodeOutOfRange(2, 4)
        );
    }

    #[test]
    fn configuration_errors() {
        let mut packet = engine(WaveletFamily::Daubechies, 2, 32, 2);
        assert_eq!(
            packet.configure_entropy(Entropy::Norm(0.)),
            Err(ScaletError::InvalidEntropyParameter(Entropy::Norm(0.)))
        );
        assert_eq!(packet.entropy(), Entropy::Shannon);
        assert_eq!(packet.node_length(1), Ok(17));
        assert!(
            WaveletPacketEngine::<f64>::new(
                Arc::new(FilterBank::new(WaveletFamily::Haar, 1).unwrap()),
                32,
                6
            )
            .is_err()
        );
        let other = engine(WaveletFamily::Daubechies, 2, 32, 3);
        let decomposition = other.forward(&[1.; 32]).unwrap();
        assert_eq!(
            packet.inverse(&decomposition).unwrap_err(),
            ScaletError::CoefficientsLayoutMismatch
        );
    }
}
