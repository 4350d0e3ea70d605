//! Text dump of a loaded assembly

use std::fmt;

use crate::model::{CadAssembly, PartId};
use crate::transform::local_transform;

/// Summary of an assembly: shells with their sizes, totals and the indented
/// part tree. Formatted through [`fmt::Display`].
pub struct AssemblyReport<'a> {
    assembly: &'a CadAssembly,
}

impl<'a> AssemblyReport<'a> {
    pub fn new(assembly: &'a CadAssembly) -> Self {
        Self { assembly }
    }

    fn write_part(&self, f: &mut fmt::Formatter<'_>, id: PartId, indent: usize) -> fmt::Result {
        let Some(part) = self.assembly.part(id) else {
            return Ok(());
        };

        let parent = part
            .parent
            .and_then(|p| self.assembly.part(p))
            .map_or("<none>".to_string(), |p| p.id.clone().unwrap_or_default());
        let shell = part
            .shell_index
            .map_or("-".to_string(), |i| i.to_string());

        write!(
            f,
            "{:indent$}{} '{}' Parent: {}  ShellIndex: {}",
            "",
            part.id.as_deref().unwrap_or(""),
            part.name.as_deref().unwrap_or(""),
            parent,
            shell,
        )?;

        if let Some(matrix) = local_transform(part) {
            write!(f, " Transformation:")?;
            for r in 0..4 {
                let row = matrix.row(r);
                write!(f, " [{} {} {} {}]", row.x, row.y, row.z, row.w)?;
            }
        }
        writeln!(f)?;

        for &child in &part.children {
            self.write_part(f, child, indent + 2)?;
        }
        Ok(())
    }
}

impl fmt::Display for AssemblyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Imported assembly:")?;
        writeln!(f, "Shells:")?;

        let mut total_positions = 0;
        let mut total_triangles = 0;
        for (i, shell) in self.assembly.shells().iter().enumerate() {
            let positions = shell.vertex_count();
            let triangles = shell.triangle_count();
            writeln!(
                f,
                "[{i}] {} '{}' FacesCount: {}; Positions count: {}; Triangles count: {}",
                shell.id.as_deref().unwrap_or(""),
                shell.name.as_deref().unwrap_or(""),
                shell.faces.len(),
                group_thousands(positions),
                group_thousands(triangles),
            )?;
            total_positions += positions;
            total_triangles += triangles;
        }

        writeln!(f)?;
        writeln!(f, "Total positions count: {}", group_thousands(total_positions))?;
        writeln!(f, "Total triangles count: {}", group_thousands(total_triangles))?;
        writeln!(f)?;
        writeln!(f, "Parts:")?;

        for &root in self.assembly.root_parts() {
            self.write_part(f, root, 0)?;
        }
        Ok(())
    }
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
