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
use crate::{ConvolutionMethod, Entropy, TransformMethod, WaveletFamily};
use std::error::Error;
use std::fmt::Formatter;

#[derive(Clone, Debug, PartialEq)]
pub enum ScaletError {
    OutOfMemory(usize),
    UnsupportedWavelet(WaveletFamily, usize),
    UnknownWaveletName(String),
    ZeroedBaseSize,
    LevelsOutOfRange(usize, usize),
    InvalidExtensionForMethod(TransformMethod),
    UnavailableConvolutionForMethod(ConvolutionMethod, TransformMethod),
    MissingPowerParameter,
    InvalidScaleParameter,
    InvalidEntropyParameter(Entropy),
    SignalLengthMismatch(usize, usize),
    CoefficientsLayoutMismatch,
    LevelNotAvailable(usize, usize),
    NodeOutOfRange(usize, usize),
}

impl Error for ScaletError {}

impl std::fmt::Display for ScaletError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaletError::OutOfMemory(length) => {
                f.write_fmt(format_args!("Cannot allocate {length} bytes to vector"))
            }
            ScaletError::UnsupportedWavelet(family, order) => {
                f.write_fmt(format_args!("Wavelet {family} of order {order} is not supported"))
            }
            ScaletError::UnknownWaveletName(name) => {
                f.write_fmt(format_args!("Unknown wavelet name '{name}'"))
            }
            ScaletError::ZeroedBaseSize => f.write_str("Zero sized input is not allowed"),
            ScaletError::LevelsOutOfRange(levels, max) => f.write_fmt(format_args!(
                "Decomposition levels {levels} out of range, must be in 1..={max}"
            )),
            ScaletError::InvalidExtensionForMethod(method) => f.write_fmt(format_args!(
                "Signal extension can be configured only for DWT, but method is {method}"
            )),
            ScaletError::UnavailableConvolutionForMethod(convolution, method) => f.write_fmt(
                format_args!("Convolution {convolution} is not available for {method}"),
            ),
            ScaletError::MissingPowerParameter => {
                f.write_str("Power scale type requires a power parameter")
            }
            ScaletError::InvalidScaleParameter => {
                f.write_str("Scales must be positive and strictly increasing")
            }
            ScaletError::InvalidEntropyParameter(entropy) => {
                f.write_fmt(format_args!("Invalid entropy parameter for {entropy}"))
            }
            ScaletError::SignalLengthMismatch(expected, actual) => f.write_fmt(format_args!(
                "Signal length expected to be {expected}, but it was {actual}"
            )),
            ScaletError::CoefficientsLayoutMismatch => {
                f.write_str("Coefficients layout does not match transform configuration")
            }
            ScaletError::LevelNotAvailable(level, levels) => f.write_fmt(format_args!(
                "Level {level} is not available, decomposition has {levels} levels"
            )),
            ScaletError::NodeOutOfRange(level, index) => {
                f.write_fmt(format_args!("Node ({level}, {index}) is out of tree range"))
            }
        }
    }
}

macro_rules! try_vec {
    () => {
        Vec::new()
    };
    ($elem:expr; $n:expr) => {{
        let n = $n;
        let mut v = Vec::new();
        v.try_reserve_exact(n)
            .map_err(|_| crate::err::ScaletError::OutOfMemory(n))?;
        v.resize(n, $elem);
        v
    }};
}

pub(crate) use try_vec;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            ScaletError::UnsupportedWavelet(WaveletFamily::Daubechies, 42).to_string(),
            "Wavelet db of order 42 is not supported"
        );
        assert_eq!(
            ScaletError::InvalidExtensionForMethod(TransformMethod::Swt).to_string(),
            "Signal extension can be configured only for DWT, but method is swt"
        );
        assert_eq!(
            ScaletError::UnavailableConvolutionForMethod(
                ConvolutionMethod::Fft,
                TransformMethod::Modwt
            )
            .to_string(),
            "Convolution fft is not available for modwt"
        );
        assert_eq!(
            ScaletError::LevelsOutOfRange(9, 3).to_string(),
            "Decomposition levels 9 out of range, must be in 1..=3"
        );
        assert_eq!(
            ScaletError::MissingPowerParameter.to_string(),
            "Power scale type requires a power parameter"
        );
    }

    fn sized(length: Result<usize, ScaletError>) -> Result<Vec<f32>, ScaletError> {
        Ok(try_vec![0f32; length?])
    }

    #[test]
    fn try_vec_propagates_length_errors() {
        assert_eq!(sized(Ok(5)).unwrap(), vec![0f32; 5]);
        assert_eq!(
            sized(Err(ScaletError::ZeroedBaseSize)).unwrap_err(),
            ScaletError::ZeroedBaseSize
        );
        assert_eq!(
            sized(Ok(usize::MAX)).unwrap_err(),
            ScaletError::OutOfMemory(usize::MAX)
        );
    }

    #[test]
    fn try_vec_evaluates_length_once() {
        let mut calls = 0usize;
        let mut next = || {
            calls += 1;
            3usize
        };
        let filled = (|| -> Result<Vec<u8>, ScaletError> { Ok(try_vec![7u8; next()]) })().unwrap();
        assert_eq!(filled, vec![7u8; 3]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_impl<T: Send + Sync + Error>() {}
        assert_impl::<ScaletError>();
    }
}
