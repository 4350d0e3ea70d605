//! Assembly documents (RON)
//!
//! The on-disk form of an imported assembly. The importer writes one of these
//! and the viewer loads it; parent links are not stored and are rebuilt on
//! load, after which the forest is validated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DOCUMENT_VERSION;
use crate::model::assembly::AssemblyData;
use crate::model::{AssemblyError, CadAssembly};

/// Versioned document wrapper
#[derive(Debug, Serialize, Deserialize)]
struct AssemblyDocument {
    version: u32,
    assembly: AssemblyData,
}

/// Document loading / saving errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unsupported document version {found} (expected at most {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Invalid assembly structure: {0}")]
    Structure(#[from] AssemblyError),
}

/// Parse an assembly document from a RON string
pub fn from_ron_str(content: &str) -> Result<CadAssembly, ImportError> {
    let document: AssemblyDocument =
        ron::from_str(content).map_err(|e| ImportError::Parse(e.to_string()))?;

    if document.version > DOCUMENT_VERSION {
        return Err(ImportError::UnsupportedVersion {
            found: document.version,
            supported: DOCUMENT_VERSION,
        });
    }

    let assembly = CadAssembly::try_from(document.assembly)?;
    tracing::debug!(
        parts = assembly.part_count(),
        shells = assembly.shells().len(),
        "Parsed assembly document"
    );
    Ok(assembly)
}

/// Serialize an assembly document to a pretty RON string
pub fn to_ron_string(assembly: &CadAssembly) -> Result<String, ImportError> {
    let document = AssemblyDocument {
        version: DOCUMENT_VERSION,
        assembly: AssemblyData::from(assembly.clone()),
    };
    ron::ser::to_string_pretty(&document, ron::ser::PrettyConfig::default())
        .map_err(|e| ImportError::Serialize(e.to_string()))
}

/// Load an assembly document from a file
pub fn load_assembly(path: impl AsRef<Path>) -> Result<CadAssembly, ImportError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ImportError::Io(e.to_string()))?;
    let assembly = from_ron_str(&content)?;
    tracing::info!("Loaded assembly from {:?}", path);
    Ok(assembly)
}

/// Save an assembly document to a file
pub fn save_assembly(path: impl AsRef<Path>, assembly: &CadAssembly) -> Result<(), ImportError> {
    let path = path.as_ref();
    let content = to_ron_string(assembly)?;
    std::fs::write(path, content).map_err(|e| ImportError::Io(e.to_string()))?;
    Ok(())
}
