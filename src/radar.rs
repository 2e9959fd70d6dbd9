//! Geometry for the multi-axis statistics chart.
//!
//! Everything lives in a 100x100 box with y growing downward (screen
//! convention). Renderers with an upward y axis flip it themselves.

use std::f64::consts::{FRAC_PI_2, PI};

use thiserror::Error;

pub const CENTER: Point = Point { x: 50.0, y: 50.0 };
pub const MAX_RADIUS: f64 = 40.0;
pub const LABEL_RADIUS: f64 = 45.0;

// cos(+-pi/2) is ~6e-17, not zero.
const ALIGN_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    pub text: String,
    pub anchor: Point,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadarLayout {
    /// Score polygon, one vertex per axis.
    pub data: Vec<Point>,
    /// Outer reference polygon (spoke tips at full score).
    pub grid: Vec<Point>,
    /// Centre-to-tip spokes.
    pub spokes: Vec<Segment>,
    pub labels: Vec<AxisLabel>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("invalid chart input: at least one axis is required")]
    NoAxes,
    #[error("invalid chart input: score {score} for '{label}' is outside 0..=100")]
    ScoreOutOfRange { label: String, score: f64 },
}

impl RadarLayout {
    pub fn axis_count(&self) -> usize {
        self.data.len()
    }

    /// Edges of the closed score polygon, last vertex wrapping to the first.
    pub fn closed_outline(&self) -> Vec<Segment> {
        close_polygon(&self.data)
    }

    pub fn grid_outline(&self) -> Vec<Segment> {
        close_polygon(&self.grid)
    }
}

/// Angle of axis `index` out of `count`: axis 0 points up, the rest follow
/// clockwise at even spacing.
pub fn axis_angle(index: usize, count: usize) -> f64 {
    index as f64 * (2.0 * PI / count as f64) - FRAC_PI_2
}

pub fn polar(radius: f64, angle: f64) -> Point {
    Point {
        x: CENTER.x + radius * angle.cos(),
        y: CENTER.y + radius * angle.sin(),
    }
}

pub fn label_align(anchor_x: f64) -> TextAlign {
    if (anchor_x - CENTER.x).abs() <= ALIGN_EPSILON {
        TextAlign::Middle
    } else if anchor_x > CENTER.x {
        TextAlign::Start
    } else {
        TextAlign::End
    }
}

/// Lay out one chart. Input order is axis order; nothing is sorted.
pub fn radar_layout<L: AsRef<str>>(axes: &[(L, f64)]) -> Result<RadarLayout, ChartError> {
    if axes.is_empty() {
        return Err(ChartError::NoAxes);
    }
    if let Some((label, score)) = axes.iter().find(|(_, s)| !(0.0..=100.0).contains(s)) {
        return Err(ChartError::ScoreOutOfRange {
            label: label.as_ref().to_string(),
            score: *score,
        });
    }

    let count = axes.len();
    let mut layout = RadarLayout {
        data: Vec::with_capacity(count),
        grid: Vec::with_capacity(count),
        spokes: Vec::with_capacity(count),
        labels: Vec::with_capacity(count),
    };

    for (i, (label, score)) in axes.iter().enumerate() {
        let angle = axis_angle(i, count);
        let tip = polar(MAX_RADIUS, angle);
        let anchor = polar(LABEL_RADIUS, angle);

        layout.data.push(polar(score / 100.0 * MAX_RADIUS, angle));
        layout.grid.push(tip);
        layout.spokes.push(Segment {
            from: CENTER,
            to: tip,
        });
        layout.labels.push(AxisLabel {
            text: label.as_ref().to_string(),
            anchor,
            align: label_align(anchor.x),
        });
    }

    Ok(layout)
}

fn close_polygon(points: &[Point]) -> Vec<Segment> {
    let n = points.len();
    (0..n)
        .map(|i| Segment {
            from: points[i],
            to: points[(i + 1) % n],
        })
        .collect()
}
