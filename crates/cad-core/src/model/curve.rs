//! Parametric curves backing face edges (informational only)

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Curve geometry of one edge with its parameter interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadCurve {
    pub kind: CurveKind,
    pub interval_start: f64,
    pub interval_end: f64,
}

impl CadCurve {
    pub fn new(kind: CurveKind, interval_start: f64, interval_end: f64) -> Self {
        Self {
            kind,
            interval_start,
            interval_end,
        }
    }
}

/// Curve geometry variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CurveKind {
    Line {
        location: DVec3,
        direction: DVec3,
    },
    Circle {
        location: DVec3,
        radius: f64,
        x_axis: DVec3,
        y_axis: DVec3,
    },
    Ellipse {
        location: DVec3,
        major_radius: f64,
        minor_radius: f64,
        x_axis: DVec3,
        y_axis: DVec3,
    },
    Hyperbola {
        location: DVec3,
        major_radius: f64,
        minor_radius: f64,
        x_axis: DVec3,
        y_axis: DVec3,
    },
    Parabola {
        location: DVec3,
        focal_length: f64,
        x_axis: DVec3,
        y_axis: DVec3,
    },
    Bezier {
        poles: Vec<DVec3>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    BSpline {
        poles: Vec<DVec3>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
        #[serde(default)]
        knots: Option<Vec<f64>>,
        degree: u32,
        periodic: bool,
    },
    Offset {
        basis: Box<CadCurve>,
        direction: DVec3,
        length: f64,
    },
}

impl CurveKind {
    /// Type name shown in the part tree
    pub fn type_name(&self) -> &'static str {
        match self {
            CurveKind::Line { .. } => "Line",
            CurveKind::Circle { .. } => "Circle",
            CurveKind::Ellipse { .. } => "Ellipse",
            CurveKind::Hyperbola { .. } => "Hyperbola",
            CurveKind::Parabola { .. } => "Parabola",
            CurveKind::Bezier { .. } => "BezierCurve",
            CurveKind::BSpline { .. } => "BSplineCurve",
            CurveKind::Offset { .. } => "OffsetCurve",
        }
    }
}
