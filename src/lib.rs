pub mod config;
pub mod envelope;
pub mod path;
pub mod render;
pub mod rng;

use std::time::Instant;

use serde::Serialize;

use config::{Mode, Outline, Params};
use envelope::{PeakDescriptor, PeakMarker, SamplePoint};
use path::Point;
use rng::RandomSource;

/// Everything the renderer needs from one recompute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Shape {
    pub mode: Mode,
    pub path: String,
    pub width: f64,
    pub height: f64,
    pub center_y: f64,
    pub points: Vec<SamplePoint>,
    pub peaks: Vec<PeakDescriptor>,
    pub markers: Vec<PeakMarker>,
}

/// Params to closed outline. Pure apart from the draws taken from `rng`:
/// with a seeded source the result depends only on `params`.
pub fn compute_shape<R: RandomSource + ?Sized>(params: &Params, rng: &mut R) -> Shape {
    let start = Instant::now();
    let params = params.sanitized();
    let canvas = params.canvas();

    // 1. Envelope (profile + noise, clamped)
    let envelope = envelope::sample_envelope(&params, rng);

    // 2. Place on canvas
    let points = envelope::sample_points(&params, &canvas, &envelope.amplitudes);
    let markers = envelope::peak_markers(&params, &canvas, &envelope.peaks);

    // 3. Outline: top left-to-right, bottom right-to-left
    let top: Vec<Point> = points.iter().map(|p| Point::new(p.x, p.top_y)).collect();
    let bottom: Vec<Point> = points
        .iter()
        .rev()
        .map(|p| Point::new(p.x, p.bottom_y))
        .collect();
    let path = match params.outline {
        Outline::Smooth => path::closed_outline(&top, &bottom),
        Outline::Polyline => path::polyline_outline(&top, &bottom, canvas.center_y),
    };

    tracing::debug!(
        mode = params.mode.as_str(),
        samples = points.len(),
        peaks = envelope.peaks.len(),
        path_len = path.len(),
        ms = start.elapsed().as_secs_f64() * 1000.0,
        "shape computed"
    );

    Shape {
        mode: params.mode,
        path,
        width: canvas.width,
        height: canvas.height,
        center_y: canvas.center_y,
        points,
        peaks: envelope.peaks,
        markers,
    }
}
