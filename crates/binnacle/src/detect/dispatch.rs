//! Detector selection and the subsystem error boundary
//!
//! Maps a file path to the detector that understands its format and
//! normalizes every outcome — including missing files, unreadable
//! content, and unmapped extensions — into one uniform
//! [`DiagramAnalysis`]. Nothing escapes this boundary as an error; the
//! rest of the pipeline can assume the analysis is always a valid,
//! fully-populated value.

use std::fs;
use std::path::Path;

use tracing::{debug, span, warn, Level};

use crate::core::{DetectError, DiagramAnalysis, Shape};
use crate::detect::{DrawioDetector, PlantUmlDetector, ShapeDetector};

/// Which detection strategy applies to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorKind {
    /// Raw-XML detection for DrawIO files
    Drawio,
    /// Raw-text detection for PlantUML files
    PlantUml,
    /// Shape-based detection after external normalization
    Shapes,
}

impl DetectorKind {
    /// Select a detector from the final path suffix, case-insensitively
    ///
    /// Formats without a source-aware detector (`.vsdx`, `.excalidraw`)
    /// and unknown extensions fall back to shape-based detection, which
    /// needs an externally-supplied shape list.
    pub fn for_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "drawio" => DetectorKind::Drawio,
            "puml" | "plantuml" => DetectorKind::PlantUml,
            _ => DetectorKind::Shapes,
        }
    }
}

/// Analyze a diagram file, selecting the detector by extension
///
/// Pass `bytes` when the caller has already read the file to avoid a
/// second read. This function is the error boundary for the detection
/// subsystem: it never returns an error. Missing files, unreadable
/// content, and extensions with no source-aware detector all yield the
/// canonical empty analysis.
pub fn analyze_file(path: impl AsRef<Path>, bytes: Option<&[u8]>) -> DiagramAnalysis {
    let path = path.as_ref();
    let dispatch_span = span!(Level::INFO, "analyze_file", path = %path.display());
    let _enter = dispatch_span.enter();

    match try_analyze_file(path, bytes) {
        Ok(analysis) => analysis,
        Err(error) => {
            warn!(path = %path.display(), %error, "Analysis failed, returning empty analysis");
            DiagramAnalysis::unknown()
        }
    }
}

/// Analyze an already-normalized shape list with the generic detector
pub fn analyze_shapes(shapes: &[Shape]) -> DiagramAnalysis {
    ShapeDetector::new().analyze(shapes)
}

fn try_analyze_file(path: &Path, bytes: Option<&[u8]>) -> Result<DiagramAnalysis, DetectError> {
    let kind = DetectorKind::for_path(path);
    debug!(?kind, "Selected detector");

    let owned;
    let content: &[u8] = match bytes {
        Some(bytes) => bytes,
        None => {
            owned = fs::read(path)?;
            &owned
        }
    };

    match kind {
        DetectorKind::Drawio => Ok(DrawioDetector::new().analyze_bytes(content)),
        DetectorKind::PlantUml => Ok(PlantUmlDetector::new().analyze_bytes(content)),
        DetectorKind::Shapes => {
            // No source-aware detector and no shape list at this layer;
            // callers with normalized shapes use analyze_shapes instead.
            let extension = path
                .extension()
                .and_then(|ext| ext.to_str())
                .unwrap_or("")
                .to_string();
            Err(DetectError::unsupported_extension(extension))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DiagramType;
    use std::path::PathBuf;

    #[test]
    fn test_detector_kind_by_extension() {
        assert_eq!(
            DetectorKind::for_path(Path::new("diagram.drawio")),
            DetectorKind::Drawio
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("diagram.puml")),
            DetectorKind::PlantUml
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("diagram.plantuml")),
            DetectorKind::PlantUml
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("diagram.vsdx")),
            DetectorKind::Shapes
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("diagram.excalidraw")),
            DetectorKind::Shapes
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("no_extension")),
            DetectorKind::Shapes
        );
    }

    #[test]
    fn test_extension_matching_is_case_insensitive() {
        assert_eq!(
            DetectorKind::for_path(Path::new("Diagram.DRAWIO")),
            DetectorKind::Drawio
        );
        assert_eq!(
            DetectorKind::for_path(Path::new("Diagram.PuML")),
            DetectorKind::PlantUml
        );
    }

    #[test]
    fn test_only_final_suffix_counts() {
        assert_eq!(
            DetectorKind::for_path(Path::new("backup.drawio.old")),
            DetectorKind::Shapes
        );
    }

    #[test]
    fn test_missing_file_returns_unknown() {
        let analysis = analyze_file(PathBuf::from("/no/such/file.drawio"), None);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
        assert!(analysis.patterns.is_empty());
    }

    #[test]
    fn test_unsupported_extension_returns_unknown() {
        let analysis = analyze_file("diagram.xyz", Some(b"whatever".as_slice()));
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[test]
    fn test_supplied_bytes_avoid_file_read() {
        // The path does not exist; the supplied bytes must be used
        let content: &[u8] = b"@startuml\nstate Idle\n@enduml";
        let analysis = analyze_file("/no/such/diagram.puml", Some(content));
        assert_eq!(analysis.detected_type, DiagramType::State);
        assert_eq!(analysis.confidence, 95.0);
    }

    #[test]
    fn test_analyze_shapes_delegates_to_shape_detector() {
        let shapes = vec![
            Shape::node("r1", "router", "core 10.0.0.1"),
            Shape::node("s1", "switch", "access"),
        ];
        let analysis = analyze_shapes(&shapes);
        assert_eq!(analysis.detected_type, DiagramType::Network);
    }

    #[test]
    fn test_analyze_shapes_empty_is_unknown() {
        let analysis = analyze_shapes(&[]);
        assert_eq!(analysis.detected_type, DiagramType::Unknown);
        assert_eq!(analysis.confidence, 0.0);
    }
}
