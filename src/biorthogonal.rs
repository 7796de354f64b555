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
use crate::util::binomial;

/// Supported `biorNr.Nd` pairs encoded as `Nr * 10 + Nd`.
///
/// * **Nr** – order of the B-spline reconstruction low-pass filter
/// * **Nd** – vanishing moments of the dual decomposition low-pass filter
///
/// `bior2.2` is the **CDF 5/3** pair used in lossless JPEG 2000.
pub(crate) const BIORTHOGONAL_ORDERS: [usize; 12] = [11, 13, 15, 22, 24, 26, 28, 31, 33, 35, 37, 39];

fn polynomial_product(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut product = vec![0f64; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            product[i + j] += x * y;
        }
    }
    product
}

/// Cohen–Daubechies–Feauveau spline pair, returns `(dec_lo, rec_lo)`.
///
/// Reconstruction filter is `sqrt(2) * ((1 + z) / 2)^Nr`, decomposition filter is
/// `sqrt(2) * ((1 + z) / 2)^Nd * sum_k C(l - 1 + k, k) ((2 - z - 1/z) / 4)^k` with
/// `l = (Nr + Nd) / 2`. Both are zero padded to a common even length and centered.
pub(crate) fn biorthogonal_filters(code: usize) -> Option<(Vec<f64>, Vec<f64>)> {
    if !BIORTHOGONAL_ORDERS.contains(&code) {
        return None;
    }
    let nr = code / 10;
    let nd = code % 10;
    let l = (nr + nd) / 2;

    let primal = (0..=nr)
        .map(|k| std::f64::consts::SQRT_2 * binomial(nr, k) / (1u64 << nr) as f64)
        .collect::<Vec<_>>();

    // sum_k C(l-1+k, k) y^k scaled by z^(l-1) to keep powers non negative
    let mut remainder = vec![0f64; 2 * l - 1];
    let mut y_power = vec![1f64];
    for k in 0..l {
        let weight = binomial(l - 1 + k, k);
        for (i, &v) in y_power.iter().enumerate() {
            remainder[l - 1 - k + i] += weight * v;
        }
        y_power = polynomial_product(&y_power, &[-0.25, 0.5, -0.25]);
    }

    let mut dual = vec![std::f64::consts::SQRT_2];
    for _ in 0..nd {
        dual = polynomial_product(&dual, &[0.5, 0.5]);
    }
    let dual = polynomial_product(&dual, &remainder);

    let dec_lo = if nr % 2 == 1 {
        dual
    } else {
        std::iter::once(0f64).chain(dual).collect::<Vec<_>>()
    };
    let filter_length = dec_lo.len();

    let offset = (filter_length - primal.len()) / 2;
    let mut rec_lo = vec![0f64; filter_length];
    rec_lo[offset..offset + primal.len()].copy_from_slice(&primal);

    Some((dec_lo, rec_lo))
}
