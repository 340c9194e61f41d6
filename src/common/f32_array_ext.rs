//! `[f32]` extensions.

use micromath::F32Ext;

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the [root mean square](https://en.wikipedia.org/wiki/Root_mean_square)
    /// level.
    fn rms_level(&self) -> f32;
}

impl F32ArrayExt for [f32] {
    fn rms_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        };
        let mut rms: f32 = 0.;
        for sample in self.iter() {
            rms += sample * sample
        }
        F32Ext::sqrt(rms / (self.len() as f32))
    }
}
