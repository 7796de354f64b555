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
use crate::convolve1d::{ConvolutionMethod, make_convolution_1d};
use crate::decimated::DecimatedStep;
use crate::err::ScaletError;
use crate::extension::SignalExtension;
use crate::filter_bank::FilterBank;
use crate::modwt::MoDwtHandler;
use crate::{SingleLevelStep, TransformMethod, WaveletSample};
use num_traits::AsPrimitive;
use std::sync::Arc;

/// Deepest level accepted by the undecimated methods.
pub const MAX_STATIONARY_LEVELS: usize = 20;

/// Checks that `(method, convolution)` can run together.
pub(crate) fn check_convolution(
    method: TransformMethod,
    convolution: ConvolutionMethod,
) -> Result<(), ScaletError> {
    if method == TransformMethod::Modwt && convolution == ConvolutionMethod::Fft {
        return Err(ScaletError::UnavailableConvolutionForMethod(
            convolution,
            method,
        ));
    }
    Ok(())
}

/// Largest valid level count for a signal axis of `length` samples.
pub(crate) fn max_levels(method: TransformMethod, length: usize) -> usize {
    match method {
        TransformMethod::Dwt => crate::util::max_dyadic_levels(length),
        TransformMethod::Swt | TransformMethod::Modwt => MAX_STATIONARY_LEVELS,
    }
}

pub(crate) fn make_single_level_step<T: WaveletSample>(
    filter_bank: &Arc<FilterBank<T>>,
    method: TransformMethod,
    extension: SignalExtension,
    convolution: ConvolutionMethod,
) -> Arc<dyn SingleLevelStep<T> + Send + Sync>
where
    f64: AsPrimitive<T>,
{
    let executor = make_convolution_1d::<T>(convolution);
    match method {
        TransformMethod::Dwt => Arc::new(DecimatedStep::new(
            filter_bank.clone(),
            extension,
            executor,
        )),
        TransformMethod::Swt => Arc::new(MoDwtHandler::new_stationary(filter_bank, executor)),
        TransformMethod::Modwt => Arc::new(MoDwtHandler::new(filter_bank, executor)),
    }
}
