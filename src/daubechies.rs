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
use num_complex::Complex;

pub(crate) const MAX_DAUBECHIES_ORDER: usize = 20;

/// Roots of a polynomial given by ascending coefficients, using Aberth iterations.
fn polynomial_roots(coefficients: &[f64]) -> Vec<Complex<f64>> {
    let degree = coefficients.len() - 1;
    if degree == 0 {
        return Vec::new();
    }
    let lead = coefficients[degree];
    let monic = coefficients.iter().map(|&c| c / lead).collect::<Vec<_>>();

    let eval = |z: Complex<f64>| -> (Complex<f64>, Complex<f64>) {
        let mut p = Complex::new(monic[degree], 0.);
        let mut dp = Complex::new(0., 0.);
        for &c in monic.iter().rev().skip(1) {
            dp = dp * z + p;
            p = p * z + c;
        }
        (p, dp)
    };

    // Cauchy bound keeps the initial guesses around the root annulus
    let radius = 1. + monic[..degree].iter().fold(0f64, |acc, c| acc.max(c.abs()));
    let mut roots = (0..degree)
        .map(|k| {
            let angle = 2. * std::f64::consts::PI * k as f64 / degree as f64 + 0.4;
            Complex::from_polar(radius * 0.5, angle)
        })
        .collect::<Vec<_>>();

    for _ in 0..500 {
        let mut max_step = 0f64;
        for i in 0..degree {
            let (p, dp) = eval(roots[i]);
            if p.norm() == 0. {
                continue;
            }
            let ratio = p / dp;
            let repulsion = roots
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .fold(Complex::new(0., 0.), |acc, (_, &r)| {
                    acc + Complex::new(1., 0.) / (roots[i] - r)
                });
            let step = ratio / (Complex::new(1., 0.) - ratio * repulsion);
            roots[i] -= step;
            max_step = max_step.max(step.norm());
        }
        if max_step < 1e-15 {
            break;
        }
    }

    for root in roots.iter_mut() {
        for _ in 0..3 {
            let (p, dp) = eval(*root);
            if dp.norm() == 0. {
                break;
            }
            *root -= p / dp;
        }
    }

    roots
}

/// Minimum phase Daubechies low pass decomposition filter with `order` vanishing moments.
///
/// Roots of the half band polynomial `P(y) = sum C(N-1+k, k) y^k` are mapped through
/// `y = (2 - z - 1/z) / 4` and the ones inside the unit circle are kept.
pub(crate) fn daubechies_dec_lo(order: usize) -> Vec<f64> {
    if order <= 1 {
        return vec![std::f64::consts::FRAC_1_SQRT_2; 2];
    }

    let half_band = (0..order)
        .map(|k| binomial(order - 1 + k, k))
        .collect::<Vec<_>>();

    let mut polynomial = vec![Complex::new(1., 0.)];
    let multiply = |poly: &[Complex<f64>], root: Complex<f64>| -> Vec<Complex<f64>> {
        // poly * (z - root)
        let mut next = vec![Complex::new(0., 0.); poly.len() + 1];
        for (i, &c) in poly.iter().enumerate() {
            next[i + 1] += c;
            next[i] -= c * root;
        }
        next
    };

    for y in polynomial_roots(&half_band) {
        let w = Complex::new(1., 0.) - y * 2.;
        let discriminant = (w * w - Complex::new(1., 0.)).sqrt();
        let candidate = w + discriminant;
        let inside = if candidate.norm() < 1. {
            candidate
        } else {
            w - discriminant
        };
        polynomial = multiply(&polynomial, inside);
    }

    for _ in 0..order {
        polynomial = multiply(&polynomial, Complex::new(-1., 0.));
    }

    let coefficients = polynomial.iter().map(|c| c.re).collect::<Vec<_>>();
    let sum: f64 = coefficients.iter().sum();
    let scale = std::f64::consts::SQRT_2 / sum;
    coefficients.iter().map(|&c| c * scale).collect()
}

/// Reconstruction low pass filter, the time reverse of [`daubechies_dec_lo`].
pub(crate) fn daubechies_rec_lo(order: usize) -> Vec<f64> {
    let mut filter = daubechies_dec_lo(order);
    filter.reverse();
    filter
}
