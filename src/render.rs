use std::path::{Path, PathBuf};

use base64::Engine;
use thiserror::Error;

use crate::Shape;
use crate::config::{Mode, Params};
use crate::path::Num;

pub const SVG_MIME: &str = "image/svg+xml;charset=utf-8";

const GUIDE_COLOR: &str = "#ff6b35";
const GUIDE_OPACITY: f64 = 0.6;
const MARKER_RADIUS: f64 = 3.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("color must be #rgb, #rrggbb or #rrggbbaa, got {0:?}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// CSS hex color, validated so it can be dropped into an attribute as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color(String);

impl Color {
    pub fn parse(raw: &str) -> Result<Self, ColorError> {
        let raw = raw.trim();
        let valid = match raw.strip_prefix('#') {
            Some(hex) => {
                matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
            }
            None => false,
        };
        if valid {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(ColorError::Invalid(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display attributes. They never affect geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    pub color: Color,
    pub show_guides: bool,
}

impl Style {
    pub fn from_params(params: &Params) -> Result<Self, ColorError> {
        Ok(Self {
            color: Color::parse(&params.color)?,
            show_guides: params.show_guides,
        })
    }
}

fn centerline_opacity(mode: Mode) -> f64 {
    match mode {
        Mode::Wave => 0.4,
        Mode::Star => 0.2,
    }
}

/// Render a standalone SVG document: centerline, outline, and (star mode
/// with guides on) one axis line plus dot per peak.
pub fn render_svg(shape: &Shape, style: &Style) -> String {
    let (w, h) = (Num(shape.width), Num(shape.height));
    let cy = Num(shape.center_y);
    let color = style.color.as_str();

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    ));
    svg.push_str(&format!(
        r#"<line x1="0" y1="{cy}" x2="{w}" y2="{cy}" stroke="{color}" stroke-width="2" opacity="{}"/>"#,
        centerline_opacity(shape.mode)
    ));

    if !shape.path.is_empty() {
        svg.push_str(&format!(
            r#"<path d="{}" fill="{color}" stroke="{color}" stroke-width="1"/>"#,
            shape.path
        ));
    }

    if shape.mode == Mode::Star && style.show_guides {
        for m in &shape.markers {
            let x = Num(m.x);
            svg.push_str(&format!(
                r#"<g><line x1="{x}" y1="{}" x2="{x}" y2="{}" stroke="{GUIDE_COLOR}" stroke-width="1" opacity="{GUIDE_OPACITY}"/><circle cx="{x}" cy="{}" r="{MARKER_RADIUS}" fill="{GUIDE_COLOR}"/></g>"#,
                Num(m.y - m.h),
                Num(m.y + m.h),
                Num(m.y),
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

/// Snapshot of one rendered shape, ready to hand to a download or a file.
#[derive(Clone, Debug, PartialEq)]
pub struct Export {
    pub file_name: String,
    pub mime: &'static str,
    pub body: String,
}

impl Export {
    pub fn snapshot(shape: &Shape, style: &Style) -> Self {
        Self {
            file_name: shape.mode.export_file_name().to_string(),
            mime: SVG_MIME,
            body: render_svg(shape, style),
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }

    /// `data:` URL with the body base64-encoded.
    pub fn data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(self.body.as_bytes());
        format!("data:image/svg+xml;base64,{}", b64)
    }

    /// Write `file_name` into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.file_name);
        let io_err = |source| ExportError::Io {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;
        std::fs::write(&path, &self.body).map_err(io_err)?;
        Ok(path)
    }
}
