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
use crate::biorthogonal::{BIORTHOGONAL_ORDERS, biorthogonal_filters};
use crate::coiflet::coiflet_rec_lo;
use crate::daubechies::{MAX_DAUBECHIES_ORDER, daubechies_rec_lo};
use crate::err::ScaletError;
use crate::symlets::symlet_rec_lo;
use num_traits::AsPrimitive;
use std::fmt::{Display, Formatter};

/// Discrete wavelet families available to the filter bank.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum WaveletFamily {
    /// Two taps box filter, the order is ignored
    Haar,
    /// Minimum phase Daubechies wavelets `db1`..`db20`
    Daubechies,
    /// Least asymmetric Daubechies wavelets `sym2`..`sym10`
    Symlet,
    /// Coiflets `coif1`, `coif2`
    Coiflet,
    /// Spline biorthogonal pairs, order encoded as `Nr * 10 + Nd`
    Biorthogonal,
}

impl Display for WaveletFamily {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WaveletFamily::Haar => f.write_str("haar"),
            WaveletFamily::Daubechies => f.write_str("db"),
            WaveletFamily::Symlet => f.write_str("sym"),
            WaveletFamily::Coiflet => f.write_str("coif"),
            WaveletFamily::Biorthogonal => f.write_str("bior"),
        }
    }
}

/// Decomposition and reconstruction filters of a discrete wavelet.
///
/// All four filters share the same length. High pass filters are derived from
/// the low pass pair with `dec_hi[k] = (-1)^(k+1) rec_lo[k]` and
/// `rec_hi[k] = (-1)^k dec_lo[k]`, orthogonal families additionally have
/// `dec_lo` equal to the time reverse of `rec_lo`.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterBank<T> {
    family: WaveletFamily,
    order: usize,
    pub(crate) dec_lo: Vec<T>,
    pub(crate) dec_hi: Vec<T>,
    pub(crate) rec_lo: Vec<T>,
    pub(crate) rec_hi: Vec<T>,
}

impl<T: WaveletSample> FilterBank<T>
where
    f64: AsPrimitive<T>,
{
    /// Builds the filters for `family` and `order`.
    ///
    /// # Errors
    /// [`ScaletError::UnsupportedWavelet`] when the family does not define `order`.
    pub fn new(family: WaveletFamily, order: usize) -> Result<Self, ScaletError> {
        let unsupported = ScaletError::UnsupportedWavelet(family, order);
        let (dec_lo, rec_lo): (Vec<f64>, Vec<f64>) = match family {
            WaveletFamily::Haar => {
                let rec_lo = daubechies_rec_lo(1);
                (rec_lo.iter().rev().copied().collect(), rec_lo)
            }
            WaveletFamily::Daubechies => {
                if order == 0 || order > MAX_DAUBECHIES_ORDER {
                    return Err(unsupported);
                }
                let rec_lo = daubechies_rec_lo(order);
                (rec_lo.iter().rev().copied().collect(), rec_lo)
            }
            WaveletFamily::Symlet => {
                let rec_lo = symlet_rec_lo(order).ok_or(unsupported)?;
                (rec_lo.iter().rev().copied().collect(), rec_lo.to_vec())
            }
            WaveletFamily::Coiflet => {
                let rec_lo = coiflet_rec_lo(order).ok_or(unsupported)?;
                (rec_lo.iter().rev().copied().collect(), rec_lo.to_vec())
            }
            WaveletFamily::Biorthogonal => biorthogonal_filters(order).ok_or(unsupported)?,
        };

        let dec_hi = rec_lo
            .iter()
            .enumerate()
            .map(|(k, &v)| if k % 2 == 0 { -v } else { v })
            .collect::<Vec<_>>();
        let rec_hi = dec_lo
            .iter()
            .enumerate()
            .map(|(k, &v)| if k % 2 == 0 { v } else { -v })
            .collect::<Vec<_>>();

        let cast = |v: &[f64]| v.iter().map(|&x| x.as_()).collect::<Vec<T>>();

        Ok(FilterBank {
            family,
            order: if family == WaveletFamily::Haar { 1 } else { order },
            dec_lo: cast(&dec_lo),
            dec_hi: cast(&dec_hi),
            rec_lo: cast(&rec_lo),
            rec_hi: cast(&rec_hi),
        })
    }

    /// Parses names like `haar`, `db4`, `sym8`, `coif2` or `bior3.5`.
    pub fn from_name(name: &str) -> Result<Self, ScaletError> {
        let unknown = || ScaletError::UnknownWaveletName(name.to_string());
        let lowered = name.trim().to_ascii_lowercase();
        if lowered == "haar" {
            return Self::new(WaveletFamily::Haar, 1);
        }
        if let Some(pair) = lowered.strip_prefix("bior") {
            let (nr, nd) = pair.split_once('.').ok_or_else(unknown)?;
            let nr = nr.parse::<usize>().map_err(|_| unknown())?;
            let nd = nd.parse::<usize>().map_err(|_| unknown())?;
            if nd > 9 {
                return Err(unknown());
            }
            return Self::new(WaveletFamily::Biorthogonal, nr * 10 + nd);
        }
        let prefixes = [
            ("db", WaveletFamily::Daubechies),
            ("sym", WaveletFamily::Symlet),
            ("coif", WaveletFamily::Coiflet),
        ];
        for (prefix, family) in prefixes {
            if let Some(order) = lowered.strip_prefix(prefix) {
                let order = order.parse::<usize>().map_err(|_| unknown())?;
                return Self::new(family, order);
            }
        }
        Err(unknown())
    }

    pub fn family(&self) -> WaveletFamily {
        self.family
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of taps shared by all four filters.
    pub fn filter_length(&self) -> usize {
        self.dec_lo.len()
    }

    pub fn is_orthogonal(&self) -> bool {
        self.family != WaveletFamily::Biorthogonal || self.order == 11
    }

    pub fn dec_lo(&self) -> &[T] {
        &self.dec_lo
    }

    pub fn dec_hi(&self) -> &[T] {
        &self.dec_hi
    }

    pub fn rec_lo(&self) -> &[T] {
        &self.rec_lo
    }

    pub fn rec_hi(&self) -> &[T] {
        &self.rec_hi
    }
}

impl<T> Display for FilterBank<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.family {
            WaveletFamily::Haar => f.write_str("haar")?,
            WaveletFamily::Biorthogonal => {
                f.write_fmt(format_args!("bior{}.{}", self.order / 10, self.order % 10))?
            }
            family => f.write_fmt(format_args!("{family}{}", self.order))?,
        }
        f.write_fmt(format_args!(" ({} taps)", self.dec_lo.len()))
    }
}

/// Every `(family, order)` pair the filter bank accepts.
pub fn supported_wavelets() -> Vec<(WaveletFamily, usize)> {
    let mut pairs = vec![(WaveletFamily::Haar, 1)];
    pairs.extend((1..=MAX_DAUBECHIES_ORDER).map(|o| (WaveletFamily::Daubechies, o)));
    pairs.extend((2..=10).map(|o| (WaveletFamily::Symlet, o)));
    pairs.extend((1..=2).map(|o| (WaveletFamily::Coiflet, o)));
    pairs.extend(
        BIORTHOGONAL_ORDERS
            .iter()
            .map(|&o| (WaveletFamily::Biorthogonal, o)),
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db2_filters() {
        let bank = FilterBank::<f64>::new(WaveletFamily::Daubechies, 2).unwrap();
        let dec_lo = [
            -0.12940952255126037,
            0.2241438680420134,
            0.8365163037378079,
            0.48296291314453416,
        ];
        let dec_hi = [
            -0.48296291314453416,
            0.8365163037378079,
            -0.2241438680420134,
            -0.12940952255126037,
        ];
        for (i, (&a, &b)) in bank.dec_lo().iter().zip(dec_lo.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-10,
                "dec_lo difference expected to be < 1e-10, but values were ref {b}, derived {a} at {i}"
            );
        }
        for (i, (&a, &b)) in bank.dec_hi().iter().zip(dec_hi.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-10,
                "dec_hi difference expected to be < 1e-10, but values were ref {b}, derived {a} at {i}"
            );
        }
        assert!(bank.is_orthogonal());
        assert_eq!(bank.filter_length(), 4);
    }

    #[test]
    fn unsupported_orders() {
        assert_eq!(
            FilterBank::<f32>::new(WaveletFamily::Daubechies, 0).unwrap_err(),
            ScaletError::UnsupportedWavelet(WaveletFamily::Daubechies, 0)
        );
        assert!(FilterBank::<f32>::new(WaveletFamily::Daubechies, 21).is_err());
        assert!(FilterBank::<f32>::new(WaveletFamily::Symlet, 1).is_err());
        assert!(FilterBank::<f32>::new(WaveletFamily::Coiflet, 3).is_err());
        assert!(FilterBank::<f32>::new(WaveletFamily::Biorthogonal, 44).is_err());
    }

    #[test]
    fn parse_names() {
        let bank = FilterBank::<f64>::from_name("bior3.5").unwrap();
        assert_eq!(bank.family(), WaveletFamily::Biorthogonal);
        assert_eq!(bank.order(), 35);
        assert_eq!(bank.filter_length(), 12);
        assert!(!bank.is_orthogonal());
        assert_eq!(bank.to_string(), "bior3.5 (12 taps)");

        let bank = FilterBank::<f64>::from_name("sym8").unwrap();
        assert_eq!(bank.to_string(), "sym8 (16 taps)");
        assert_eq!(FilterBank::<f64>::from_name("Haar").unwrap().filter_length(), 2);
        assert_eq!(
            FilterBank::<f64>::from_name("meyer").unwrap_err(),
            ScaletError::UnknownWaveletName("meyer".to_string())
        );
        assert_eq!(
            FilterBank::<f64>::from_name("db42").unwrap_err(),
            ScaletError::UnsupportedWavelet(WaveletFamily::Daubechies, 42)
        );
    }

    #[test]
    fn quadrature_mirror_relations() {
        for (family, order) in supported_wavelets() {
            let bank = FilterBank::<f64>::new(family, order).unwrap();
            let length = bank.filter_length();
            assert!(length % 2 == 0, "{bank} must have even length");
            for k in 0..length {
                let sign = if k % 2 == 0 { 1. } else { -1. };
                assert_eq!(bank.dec_hi()[k], -sign * bank.rec_lo()[k]);
                assert_eq!(bank.rec_hi()[k], sign * bank.dec_lo()[k]);
                if bank.is_orthogonal() {
                    assert_eq!(bank.dec_lo()[k], bank.rec_lo()[length - 1 - k]);
                }
            }
            let sum: f64 = bank.dec_lo().iter().sum();
            assert!(
                (sum - std::f64::consts::SQRT_2).abs() < 1e-9,
                "{bank} low pass sum expected sqrt(2), but it was {sum}"
            );
        }
    }
}
