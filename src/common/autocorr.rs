use super::fft::{real_fft, MAX_REAL_FFT_SIZE};

/// Computes the length of the FFT needed to compute the autocorrelation
/// for a given window size and lag count to avoid circular convolution effects.
///
/// # Arguments
///
/// * `buffer_size` - The size of the input buffer.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft_size(buffer_size: usize, lag_count: usize) -> usize {
    assert!(lag_count <= buffer_size);
    let min_length = buffer_size + lag_count - 1;
    let mut result: usize = 8; // Start at microfft's minimum size
    while result < min_length {
        result <<= 1;
    }
    result
}

/// Returns true if the autocorrelation of a buffer of the given size can be
/// computed with [`autocorr_fft`] for all lags.
pub fn supports_autocorr_fft(buffer_size: usize) -> bool {
    buffer_size > 0 && autocorr_fft_size(buffer_size, buffer_size) <= MAX_REAL_FFT_SIZE
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using FFT.
///
/// The first `lag_count` elements of `result` receive the autocorrelation
/// at lags `0..lag_count`. The remaining elements are left in an unspecified state.
///
/// # Arguments
///
/// * `buffer` - Input buffer
/// * `result` - A buffer to write the result to. Must be [`autocorr_fft_size`] long.
/// * `scratch_buffer` - A scratch buffer of the same length as `result`.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft(
    buffer: &[f32],
    result: &mut [f32],
    scratch_buffer: &mut [f32],
    lag_count: usize,
) {
    // Sanity checks
    let fft_size = autocorr_fft_size(buffer.len(), lag_count);
    if result.len() != fft_size {
        panic!(
            "Got autocorr fft buffer of length {}, expected {}.",
            result.len(),
            fft_size
        )
    }
    if scratch_buffer.len() != result.len() {
        panic!("Autocorr fft scratch buffer must have the same length as the result buffer")
    }

    // Build FFT input signal
    result[..buffer.len()].copy_from_slice(buffer);
    for element in result.iter_mut().skip(buffer.len()) {
        *element = 0.0
    }

    // Perform the FFT in place
    let fft = real_fft(result);

    // Compute the power spectral density by point-wise multiplication by the complex conjugate.
    scratch_buffer[0] = fft[0].re * fft[0].re;
    let scratch_buffer_length = scratch_buffer.len();
    for (index, fft_value) in fft.iter().skip(1).enumerate() {
        let norm_sq = fft_value.norm_sqr();
        scratch_buffer[index + 1] = norm_sq;
        scratch_buffer[scratch_buffer_length - index - 1] = norm_sq;
    }
    scratch_buffer[fft.len()] = fft[0].im * fft[0].im;

    // The power spectral density is real and even, so a forward FFT
    // equals the inverse FFT up to a scaling factor.
    let ifft = real_fft(scratch_buffer);

    let scale = 1.0 / (fft_size as f32);
    for (result, ifft) in result.iter_mut().zip(ifft.iter()).take(lag_count) {
        *result = scale * ifft.re;
    }
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using time domain summation, i.e
/// `result[tau] = sum_j window[j] * window[j + tau]`.
pub fn autocorr_conv(window: &[f32], result: &mut [f32]) {
    let window_size = window.len();
    if window_size < result.len() {
        panic!("Result vector must not be longer than the window.");
    }

    for (tau, value) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for (xj, xj_plus_tau) in window.iter().zip(window[tau..].iter()) {
            sum += xj * xj_plus_tau;
        }
        *value = sum;
    }
}
