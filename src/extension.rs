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
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Default)]
/// Declares how a signal is continued past its edges before each convolution pass
pub enum SignalExtension {
    /// Signal is wrapped around with rule `fgh|abcdefgh|abc`
    Periodic,
    /// Signal is mirrored without repeating the edge sample with rule `dcb|abcdefgh|gfe`
    #[default]
    Symmetric,
}

impl Display for SignalExtension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalExtension::Periodic => f.write_str("periodic"),
            SignalExtension::Symmetric => f.write_str("symmetric"),
        }
    }
}

impl SignalExtension {
    /// Maps any position on the infinite extended signal back into `0..length`.
    #[inline]
    pub(crate) fn source_index(self, position: isize, length: usize) -> usize {
        match self {
            SignalExtension::Periodic => position.rem_euclid(length as isize) as usize,
            SignalExtension::Symmetric => {
                if length == 1 {
                    return 0;
                }
                let period = 2 * (length as isize - 1);
                let folded = position.rem_euclid(period);
                if folded >= length as isize {
                    (period - folded) as usize
                } else {
                    folded as usize
                }
            }
        }
    }
}
