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
/// Computes the length of the **approximation/detail coefficients** after a single-level
/// discrete wavelet transform (DWT) on a 1D signal.
///
/// # Parameters
/// - `len`: Length of the input signal.
/// - `filter_length`: Length of the wavelet filter (number of taps).
///
/// # Returns
/// The number of coefficients in the resulting approximation or detail vector.
#[inline]
pub fn dwt_length(len: usize, filter_length: usize) -> usize {
    (len + filter_length - 1) / 2
}

/// Computes the length of the **reconstructed signal** from approximation coefficients
/// during the inverse discrete wavelet transform (IDWT).
///
/// The reconstructed signal may be one sample longer than the original when the original
/// length was odd, callers truncate to the recorded length.
#[inline]
pub fn idwt_length(approx_length: usize, filter_length: usize) -> usize {
    (2 * approx_length + 2).saturating_sub(filter_length)
}

/// Largest level count `J` such that `2^J <= length`.
#[inline]
pub(crate) fn max_dyadic_levels(length: usize) -> usize {
    if length == 0 {
        0
    } else {
        length.ilog2() as usize
    }
}

/// Out-of-place transpose of a row-major `rows x cols` matrix.
pub(crate) fn transpose<T: Copy>(src: &[T], dst: &mut [T], rows: usize, cols: usize) {
    debug_assert_eq!(src.len(), rows * cols);
    debug_assert_eq!(dst.len(), rows * cols);
    for (y, row) in src.chunks_exact(cols).enumerate() {
        for (x, &v) in row.iter().enumerate() {
            dst[x * rows + y] = v;
        }
    }
}

pub(crate) fn binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    let mut acc = 1f64;
    for i in 0..k {
        acc = acc * (n - i) as f64 / (i + 1) as f64;
    }
    acc
}
