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
use crate::err::{ScaletError, try_vec};
use crate::extension::SignalExtension;

/// Writes `data` into the middle of `padded` and fills both margins from the extension rule.
pub(crate) fn write_arena_1d<T: Copy>(
    data: &[T],
    padded: &mut [T],
    pad_left: usize,
    pad_right: usize,
    extension: SignalExtension,
) -> Result<(), ScaletError> {
    if data.is_empty() {
        return Err(ScaletError::ZeroedBaseSize);
    }
    if padded.len() != pad_left + data.len() + pad_right {
        return Err(ScaletError::SignalLengthMismatch(
            pad_left + data.len() + pad_right,
            padded.len(),
        ));
    }

    padded[pad_left..pad_left + data.len()].copy_from_slice(data);

    let (head, rest) = padded.split_at_mut(pad_left);
    for (idx, dst) in head.iter_mut().enumerate() {
        let position = idx as isize - pad_left as isize;
        *dst = data[extension.source_index(position, data.len())];
    }

    let tail = &mut rest[data.len()..];
    for (idx, dst) in tail.iter_mut().enumerate() {
        let position = (data.len() + idx) as isize;
        *dst = data[extension.source_index(position, data.len())];
    }

    Ok(())
}

/// Allocates the extended copy of `data` with `pad` samples on each side.
pub(crate) fn make_arena_1d<T: Copy + Default>(
    data: &[T],
    pad: usize,
    extension: SignalExtension,
) -> Result<Vec<T>, ScaletError> {
    let mut padded = try_vec![T::default(); data.len() + 2 * pad];
    write_arena_1d(data, &mut padded, pad, pad, extension)?;
    Ok(padded)
}
