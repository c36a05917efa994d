use serde::Serialize;

use crate::config::{
    Canvas, Mode, PADDING_X, Params, PeakBlend, PeakLayout, STAR_COUNT, StarProfile,
};
use crate::rng::{Draw, RandomSource};

/// One sampled column of the outline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    pub top_y: f64,
    pub bottom_y: f64,
}

impl SamplePoint {
    pub fn amplitude(&self) -> f64 {
        (self.bottom_y - self.top_y) / 2.0
    }
}

/// A star-mode peak. `index_position` is in sample-index units and is
/// fractional only for `PeakLayout::Fractional`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeakDescriptor {
    pub index_position: f64,
    pub height_factor: f64,
    pub influence_radius: f64,
}

/// Guide marker: peak center at `(x, y)`, half-height `h`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeakMarker {
    pub x: f64,
    pub y: f64,
    pub h: f64,
}

/// Amplitudes (already noised and clamped) plus the peaks that shaped them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Envelope {
    pub amplitudes: Vec<f64>,
    pub peaks: Vec<PeakDescriptor>,
}

/// `f^sharpness` with `0^s = 0` for every `s`, so a zero factor never
/// turns into 1 or infinity.
#[inline]
fn shape(f: f64, sharpness: f64) -> f64 {
    if f <= 0.0 { 0.0 } else { f.powf(sharpness) }
}

/// Single-peak envelope factor at index `i`: 1 at the middle, 0 at both ends.
pub fn single_peak_factor(i: usize, segments: usize, sharpness: f64) -> f64 {
    let t = i as f64 / segments as f64;
    let center_factor = 1.0 - (t - 0.5).abs() / 0.5;
    shape(center_factor, sharpness)
}

/// Lay out the five peaks. Jitter (when enabled) draws one value per peak.
pub fn star_peaks<R: RandomSource + ?Sized>(
    segments: usize,
    profile: &StarProfile,
    rng: &mut R,
) -> Vec<PeakDescriptor> {
    let n = segments as f64;
    let influence_radius = (n / 10.0) * profile.spread;

    (0..STAR_COUNT)
        .map(|s| {
            let k = (s + 1) as f64;
            let exact = k * n / (STAR_COUNT + 1) as f64;
            let index_position = match profile.layout {
                PeakLayout::IndexSnapped => exact.round(),
                PeakLayout::Fractional => exact,
            };
            let mut height_factor = profile.heights[s];
            if profile.jitter {
                height_factor *= 0.9 + rng.next_unit(Draw::peak(s)) * 0.2;
            }
            PeakDescriptor {
                index_position,
                height_factor,
                influence_radius,
            }
        })
        .collect()
}

/// Relative contribution of one peak at sample `i`; zero at or beyond the
/// influence radius.
pub fn peak_contribution(peak: &PeakDescriptor, i: usize, sharpness: f64) -> f64 {
    let d = (i as f64 - peak.index_position).abs();
    if d >= peak.influence_radius {
        return 0.0;
    }
    peak.height_factor * shape(1.0 - d / peak.influence_radius, sharpness)
}

/// Combined star envelope factor at sample `i`.
pub fn star_factor(peaks: &[PeakDescriptor], i: usize, sharpness: f64, blend: PeakBlend) -> f64 {
    let contributions = peaks.iter().map(|p| peak_contribution(p, i, sharpness));
    match blend {
        PeakBlend::Max => contributions.fold(0.0, f64::max),
        PeakBlend::Sum => contributions.sum(),
    }
}

/// Sample `segments + 1` amplitudes. `params` must already be sanitized.
pub fn sample_envelope<R: RandomSource + ?Sized>(params: &Params, rng: &mut R) -> Envelope {
    let segments = params.segments;
    let peaks = match params.mode {
        Mode::Wave => Vec::new(),
        Mode::Star => star_peaks(segments, &params.star, rng),
    };

    let amplitudes = (0..=segments)
        .map(|i| {
            let factor = match params.mode {
                Mode::Wave => single_peak_factor(i, segments, params.sharpness),
                Mode::Star => star_factor(&peaks, i, params.sharpness, params.star.blend),
            };
            let mut amp = factor * params.max_amplitude;
            if params.noise_amount > 0.0 {
                amp += (rng.next_unit(Draw::noise(i)) - 0.5) * 2.0 * params.noise_amount;
            }
            amp.max(0.0)
        })
        .collect();

    Envelope { amplitudes, peaks }
}

/// Horizontal distance between neighboring samples.
#[inline]
pub fn step_x(params: &Params) -> f64 {
    params.line_length / params.segments as f64
}

/// Place amplitudes on the canvas around its centerline.
pub fn sample_points(params: &Params, canvas: &Canvas, amplitudes: &[f64]) -> Vec<SamplePoint> {
    let step = step_x(params);
    amplitudes
        .iter()
        .enumerate()
        .map(|(i, &amp)| SamplePoint {
            x: PADDING_X + i as f64 * step,
            top_y: canvas.center_y - amp,
            bottom_y: canvas.center_y + amp,
        })
        .collect()
}

/// Guide markers for the given peaks.
pub fn peak_markers(params: &Params, canvas: &Canvas, peaks: &[PeakDescriptor]) -> Vec<PeakMarker> {
    let step = step_x(params);
    peaks
        .iter()
        .map(|p| PeakMarker {
            x: PADDING_X + p.index_position * step,
            y: canvas.center_y,
            h: p.height_factor * params.max_amplitude,
        })
        .collect()
}
