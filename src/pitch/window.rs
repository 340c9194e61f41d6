/// A rolling window holding the most recent samples of a stream.
///
/// Capture callbacks deliver chunks of arbitrary size; pushing them here
/// keeps the latest `window_size` samples, oldest first, ready to be
/// handed to a [`PitchEstimator`](super::PitchEstimator) once per polling cycle.
pub struct SampleWindow {
    samples: Box<[f32]>,
    // Number of samples pushed since creation or the last reset,
    // saturating at the window size.
    filled_count: usize,
}

impl SampleWindow {
    /// # Panics
    ///
    /// If `window_size` is 0.
    pub fn new(window_size: usize) -> Self {
        if window_size == 0 {
            panic!("Window size must be greater than 0")
        }
        SampleWindow {
            samples: vec![0.; window_size].into_boxed_slice(),
            filled_count: 0,
        }
    }

    /// Appends a chunk of samples, discarding the oldest ones.
    pub fn push(&mut self, chunk: &[f32]) {
        let window_size = self.samples.len();
        if chunk.len() >= window_size {
            self.samples
                .copy_from_slice(&chunk[chunk.len() - window_size..]);
        } else {
            self.samples.rotate_left(chunk.len());
            self.samples[window_size - chunk.len()..].copy_from_slice(chunk);
        }
        self.filled_count = (self.filled_count + chunk.len()).min(window_size);
    }

    /// The current window contents, oldest sample first. Until the window
    /// has been filled, the leading samples are zero.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Returns true once at least `window_size` samples have been pushed.
    pub fn is_filled(&self) -> bool {
        self.filled_count == self.samples.len()
    }

    pub fn window_size(&self) -> usize {
        self.samples.len()
    }

    /// Clears the window, for example when capture is restarted.
    pub fn reset(&mut self) {
        for sample in self.samples.iter_mut() {
            *sample = 0.0;
        }
        self.filled_count = 0;
    }
}
