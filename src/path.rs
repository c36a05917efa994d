//! Midpoint-quadratic smoothing of point sequences into SVG path data.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Shortest round-trip formatting, `-0` printed as `0`.
pub(crate) struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", Num(self.x), Num(self.y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Move(Point),
    Line(Point),
    /// Control point, end point.
    Quad(Point, Point),
    Close,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Move(p) => write!(f, "M {p}"),
            Command::Line(p) => write!(f, "L {p}"),
            Command::Quad(c, p) => write!(f, "Q {c} {p}"),
            Command::Close => f.write_str("Z"),
        }
    }
}

/// How a smoothed sequence begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Start {
    /// Pen up: begins a new subpath.
    Move,
    /// Pen down: continues from wherever the previous sequence ended.
    Line,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    pub commands: Vec<Command>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append one smoothed sequence: each pair `(p0, p1)` becomes a quadratic
    /// with `p0` as control and their midpoint as end, then a line to the true
    /// last point. Fewer than two points append nothing.
    pub fn push_smoothed(&mut self, points: &[Point], start: Start) {
        let [first, .., last] = points else {
            return;
        };
        self.commands.push(match start {
            Start::Move => Command::Move(*first),
            Start::Line => Command::Line(*first),
        });
        for pair in points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            self.commands.push(Command::Quad(p0, p0.midpoint(p1)));
        }
        self.commands.push(Command::Line(*last));
    }

    pub fn close(&mut self) {
        self.commands.push(Command::Close);
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cmd) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

/// Smoothed path string for one sequence.
pub fn smooth_path(points: &[Point], start: Start) -> String {
    let mut path = PathData::new();
    path.push_smoothed(points, start);
    path.to_string()
}

/// Closed outline: `top` left to right, then `bottom` (already reversed,
/// right to left) continuing without a new move, then `Z`. Empty when `top`
/// has fewer than two points.
pub fn closed_outline(top: &[Point], bottom: &[Point]) -> String {
    let mut path = PathData::new();
    path.push_smoothed(top, Start::Move);
    if path.is_empty() {
        return String::new();
    }
    path.push_smoothed(bottom, Start::Line);
    path.close();
    path.to_string()
}

/// Straight-segment outline: a move to `(top[0].x, anchor_y)`, lines
/// through every `top` point, then every `bottom` point, then `Z`. Empty
/// when `top` has fewer than two points.
pub fn polyline_outline(top: &[Point], bottom: &[Point], anchor_y: f64) -> String {
    let [first, _, ..] = top else {
        return String::new();
    };
    let mut path = PathData::new();
    path.commands.push(Command::Move(Point::new(first.x, anchor_y)));
    path.commands.extend(top.iter().chain(bottom).map(|p| Command::Line(*p)));
    path.close();
    path.to_string()
}
