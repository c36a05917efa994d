use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal margin on each side of the line.
pub const PADDING_X: f64 = 50.0;
/// Vertical margin above and below the tallest possible peak.
pub const PADDING_Y: f64 = 40.0;

/// Number of peaks in star mode.
pub const STAR_COUNT: usize = 5;

/// Which envelope profile drives the outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single symmetric peak.
    #[default]
    Wave,
    /// Five-peak superposition.
    Star,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Wave => "wave",
            Mode::Star => "star",
        }
    }

    /// File name used when exporting a shape of this mode.
    pub fn export_file_name(self) -> &'static str {
        match self {
            Mode::Wave => "tacet-wave.svg",
            Mode::Star => "tacet-stars.svg",
        }
    }
}

/// Where the five peak centers sit along the line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakLayout {
    /// Centers at `round(k * segments / 6)`, always on a sample.
    #[default]
    IndexSnapped,
    /// Centers at `t = k / 6`, may fall between samples.
    Fractional,
}

/// How overlapping peak contributions combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakBlend {
    /// Strongest peak wins; the baseline stays flat between peaks.
    #[default]
    Max,
    /// Contributions add up where influence zones overlap.
    Sum,
}

/// How sampled points become the closed outline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outline {
    /// Midpoint-quadratic curves through the samples.
    #[default]
    Smooth,
    /// Straight segments from the centerline through every sample.
    Polyline,
}

/// Star-mode tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarProfile {
    pub layout: PeakLayout,
    pub blend: PeakBlend,
    /// Relative peak heights, left to right.
    pub heights: [f64; STAR_COUNT],
    /// Influence radius in units of `segments / 10`.
    pub spread: f64,
    /// Scale each height by a random factor in [0.9, 1.1].
    pub jitter: bool,
}

impl Default for StarProfile {
    fn default() -> Self {
        Self {
            layout: PeakLayout::IndexSnapped,
            blend: PeakBlend::Max,
            heights: [0.5, 0.7, 1.0, 0.7, 0.5],
            spread: 1.2,
            jitter: false,
        }
    }
}

impl StarProfile {
    /// Continuous placement with summed falloff: a radius of `segments / 11`
    /// and a steeper height ramp.
    pub fn classic() -> Self {
        Self {
            layout: PeakLayout::Fractional,
            blend: PeakBlend::Sum,
            heights: [0.2, 0.5, 1.0, 0.5, 0.2],
            spread: 10.0 / 11.0,
            jitter: false,
        }
    }
}

/// All tunable parameters, one per UI slider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Params {
    pub mode: Mode,

    // Geometry
    pub line_length: f64,
    pub max_amplitude: f64,
    pub segments: usize,
    pub sharpness: f64,

    // Noise
    pub noise_amount: f64,
    pub seed: u64,

    // Display only
    pub color: String,
    pub show_guides: bool,

    pub outline: Outline,
    pub star: StarProfile,
}

impl Default for Params {
    fn default() -> Self {
        Self::wave()
    }
}

impl Params {
    pub fn wave() -> Self {
        Self {
            mode: Mode::Wave,
            line_length: 600.0,
            max_amplitude: 60.0,
            segments: 60,
            sharpness: 2.0,
            noise_amount: 10.0,
            seed: 0,
            color: "#000000".into(),
            show_guides: false,
            outline: Outline::Smooth,
            star: StarProfile::default(),
        }
    }

    pub fn star() -> Self {
        Self {
            mode: Mode::Star,
            line_length: 600.0,
            max_amplitude: 70.0,
            segments: 80,
            sharpness: 2.0,
            noise_amount: 8.0,
            seed: 0,
            color: "#333333".into(),
            show_guides: true,
            outline: Outline::Smooth,
            star: StarProfile::default(),
        }
    }

    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Wave => Self::wave(),
            Mode::Star => Self::star(),
        }
    }

    /// Load a JSON parameter document. Missing fields take the defaults of
    /// the document's mode.
    pub fn from_json_file(path: &Path) -> Result<Self, ParamsError> {
        Ok(ParamsFile::read(path)?.into_params())
    }

    /// Bump the seed by one ("randomize").
    pub fn reroll(&mut self) {
        self.seed = self.seed.wrapping_add(1);
    }

    /// Copy with every numeric field forced into the range the sampler can
    /// handle: segments >= 1, amplitude/noise/sharpness >= 0, non-finite
    /// values replaced by the mode default.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::for_mode(self.mode);
        let finite_or = |v: f64, d: f64| if v.is_finite() { v } else { d };

        let mut star = self.star.clone();
        let star_defaults = StarProfile::default();
        star.spread = finite_or(star.spread, star_defaults.spread).max(0.0);
        for (h, d) in star.heights.iter_mut().zip(star_defaults.heights) {
            *h = finite_or(*h, d).max(0.0);
        }

        Self {
            mode: self.mode,
            line_length: finite_or(self.line_length, defaults.line_length),
            max_amplitude: finite_or(self.max_amplitude, defaults.max_amplitude).max(0.0),
            segments: self.segments.max(1),
            sharpness: finite_or(self.sharpness, defaults.sharpness).max(0.0),
            noise_amount: finite_or(self.noise_amount, defaults.noise_amount).max(0.0),
            seed: self.seed,
            color: self.color.clone(),
            show_guides: self.show_guides,
            outline: self.outline,
            star,
        }
    }

    /// Canvas dimensions derived from line length and amplitude.
    pub fn canvas(&self) -> Canvas {
        let width = self.line_length + PADDING_X * 2.0;
        let height = self.max_amplitude * 2.0 + PADDING_Y * 2.0;
        Canvas {
            width,
            height,
            center_y: height / 2.0,
        }
    }
}

/// Parameter document as written on disk. Every field is optional; `mode`
/// picks which defaults fill the gaps.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamsFile {
    pub mode: Option<Mode>,
    pub line_length: Option<f64>,
    pub max_amplitude: Option<f64>,
    pub segments: Option<usize>,
    pub sharpness: Option<f64>,
    pub noise_amount: Option<f64>,
    pub seed: Option<u64>,
    pub color: Option<String>,
    pub show_guides: Option<bool>,
    pub outline: Option<Outline>,
    pub star: Option<StarProfile>,
}

impl ParamsFile {
    pub fn read(path: &Path) -> Result<Self, ParamsError> {
        let text = std::fs::read_to_string(path).map_err(|source| ParamsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_params(self) -> Params {
        let d = Params::for_mode(self.mode.unwrap_or_default());
        Params {
            mode: d.mode,
            line_length: self.line_length.unwrap_or(d.line_length),
            max_amplitude: self.max_amplitude.unwrap_or(d.max_amplitude),
            segments: self.segments.unwrap_or(d.segments),
            sharpness: self.sharpness.unwrap_or(d.sharpness),
            noise_amount: self.noise_amount.unwrap_or(d.noise_amount),
            seed: self.seed.unwrap_or(d.seed),
            color: self.color.unwrap_or(d.color),
            show_guides: self.show_guides.unwrap_or(d.show_guides),
            outline: self.outline.unwrap_or(d.outline),
            star: self.star.unwrap_or(d.star),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    pub center_y: f64,
}

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("failed to read params file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid params JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// HTTP server settings, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl ServerConfig {
    /// `TACET_ADDR` overrides the bind address; an unparsable value keeps
    /// the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("TACET_ADDR") {
            match raw.parse() {
                Ok(addr) => config.addr = addr,
                Err(err) => tracing::warn!("ignoring TACET_ADDR={raw:?}: {err}"),
            }
        }
        config
    }
}
