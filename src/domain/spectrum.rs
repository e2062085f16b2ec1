// Frequency-domain view of a sample sequence
use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Unnormalized forward DFT, one bin per input sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    bins: Vec<Complex<f64>>,
}

impl Spectrum {
    pub fn of(values: &[f64]) -> Self {
        let mut bins: Vec<Complex<f64>> = values.iter().map(|&v| Complex::new(v, 0.0)).collect();
        if !bins.is_empty() {
            let fft = FftPlanner::<f64>::new().plan_fft_forward(bins.len());
            fft.process(&mut bins);
        }
        Self { bins }
    }

    /// `|X_k|` for every bin; this is what gets plotted.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.norm()).collect()
    }
}
