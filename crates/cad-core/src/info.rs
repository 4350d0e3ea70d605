//! Human-readable descriptions of selected elements

use std::fmt;

use glam::{DVec3, Mat4};

use crate::constants::EDGE_PAIR_STRIDE;
use crate::model::{CadAssembly, CadCurve, CurveKind};
use crate::tag::{PartTag, SubObject};
use crate::transform::local_transform;

/// Multi-line description of the element a tag refers to.
///
/// Returns `None` when the tag does not resolve in this assembly or when
/// there is nothing to say about the element.
pub fn describe(assembly: &CadAssembly, tag: PartTag) -> Option<String> {
    let part = assembly.part(tag.part)?;

    let lines = match tag.sub {
        SubObject::None => {
            let mut lines = Vec::new();
            if let Some(id) = part.id.as_deref().filter(|id| !id.is_empty()) {
                lines.push(format!("Id: {id}"));
            }
            let volume = part.volume.unwrap_or(0.0);
            let area = part.surface_area.unwrap_or(0.0);
            if volume > 0.0 || area > 0.0 {
                lines.push(format!("Volume: {volume}"));
                lines.push(format!("SurfaceArea: {area}"));
            }
            if let Some(bounds) = part.bounds.filter(|b| b.is_valid()) {
                lines.push(format!("X Bounds: min: {} max: {}", bounds.min.x, bounds.max.x));
                lines.push(format!("Y Bounds: min: {} max: {}", bounds.min.y, bounds.max.y));
                lines.push(format!("Z Bounds: min: {} max: {}", bounds.min.z, bounds.max.z));
            }
            if let Some(matrix) = local_transform(part) {
                lines.push("Transformation:".to_string());
                lines.push(matrix_text(&matrix));
            }
            lines
        }
        SubObject::Shell => {
            let shell = assembly.shell_of(tag.part)?;
            let mut lines = Vec::new();
            if let Some(id) = shell.id.as_deref().filter(|id| !id.is_empty()) {
                lines.push(format!("Id: {id}"));
            }
            lines.push(format!("Positions count: {}", shell.vertex_count()));
            lines.push(format!("Triangles count: {}", shell.triangle_count()));
            lines
        }
        SubObject::Face { face, edge: None } => {
            let face = assembly.shell_of(tag.part)?.faces.get(face)?;
            let mut lines = Vec::new();
            if let Some(area) = face.surface_area.filter(|a| *a > 0.0) {
                lines.push(format!("SurfaceArea: {area}"));
            }
            if face.vertex_buffer.is_some() {
                lines.push(format!("Positions count: {}", face.vertex_count()));
            }
            if face.triangle_indices.is_some() {
                lines.push(format!("Triangles count: {}", face.triangle_count()));
            }
            lines
        }
        SubObject::Face {
            face,
            edge: Some(pair_index),
        } => {
            let face = assembly.shell_of(tag.part)?.faces.get(face)?;
            let count = face
                .edge_indices
                .as_ref()?
                .get(pair_index + 1)
                .copied()
                .filter(|_| pair_index % EDGE_PAIR_STRIDE == 0)?;
            let mut lines = Vec::new();
            if let Some(length) = face.edge_length(pair_index) {
                lines.push(format!("EdgeLength: {length}"));
            }
            lines.push(format!(
                "Positions count: {}",
                (count as usize).saturating_sub(1) * 2
            ));
            lines
        }
    };

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Multi-line description of an edge curve, ending with its parameter interval
pub fn describe_curve(curve: &CadCurve) -> String {
    CurveInfo(curve).to_string()
}

/// [`describe_curve`] as a `Display` value
pub struct CurveInfo<'a>(pub &'a CadCurve);

impl fmt::Display for CurveInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let curve = self.0;
        match &curve.kind {
            CurveKind::Line {
                location,
                direction,
            } => {
                writeln!(f, "Location: {}", vec_text(*location))?;
                writeln!(f, "Direction: {}", vec_text(*direction))?;
            }
            CurveKind::Circle {
                location,
                radius,
                x_axis,
                y_axis,
            } => {
                writeln!(f, "Location: {}", vec_text(*location))?;
                writeln!(f, "Radius: {radius}")?;
                writeln!(f, "XAxis: {}", vec_text(*x_axis))?;
                writeln!(f, "YAxis: {}", vec_text(*y_axis))?;
            }
            CurveKind::Ellipse {
                location,
                major_radius,
                minor_radius,
                x_axis,
                y_axis,
            }
            | CurveKind::Hyperbola {
                location,
                major_radius,
                minor_radius,
                x_axis,
                y_axis,
            } => {
                writeln!(f, "Location: {}", vec_text(*location))?;
                writeln!(f, "MajorRadius: {major_radius}")?;
                writeln!(f, "MinorRadius: {minor_radius}")?;
                writeln!(f, "XAxis: {}", vec_text(*x_axis))?;
                writeln!(f, "YAxis: {}", vec_text(*y_axis))?;
            }
            CurveKind::Parabola {
                location,
                focal_length,
                x_axis,
                y_axis,
            } => {
                writeln!(f, "Location: {}", vec_text(*location))?;
                writeln!(f, "FocalLength: {focal_length}")?;
                writeln!(f, "XAxis: {}", vec_text(*x_axis))?;
                writeln!(f, "YAxis: {}", vec_text(*y_axis))?;
            }
            CurveKind::Bezier { poles, weights } => {
                writeln!(f, "Poles count: {}", poles.len())?;
                writeln!(f, "Weights count: {}", weights.as_ref().map_or(0, Vec::len))?;
            }
            CurveKind::BSpline {
                poles,
                weights,
                knots,
                degree,
                periodic,
            } => {
                writeln!(f, "Poles count: {}", poles.len())?;
                writeln!(f, "Weights count: {}", weights.as_ref().map_or(0, Vec::len))?;
                writeln!(f, "Knots count: {}", knots.as_ref().map_or(0, Vec::len))?;
                writeln!(f, "Degree: {degree}")?;
                writeln!(f, "IsPeriodic: {periodic}")?;
            }
            CurveKind::Offset {
                basis,
                direction,
                length,
            } => {
                writeln!(f, "BasisCurve: {}", basis.kind.type_name())?;
                writeln!(f, "OffsetDirection: {}", vec_text(*direction))?;
                writeln!(f, "OffsetLength: {length}")?;
            }
        }

        write!(
            f,
            "Interval: [{} {}]",
            curve.interval_start, curve.interval_end
        )
    }
}

fn vec_text(v: DVec3) -> String {
    format!("({} {} {})", v.x, v.y, v.z)
}

/// Matrix rows, translation in the last column
pub(crate) fn matrix_text(matrix: &Mat4) -> String {
    (0..4)
        .map(|r| {
            let row = matrix.row(r);
            format!("{} {} {} {}", row.x, row.y, row.z, row.w)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
