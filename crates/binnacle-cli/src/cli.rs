//! Command-line interface for the binnacle utility
//!
//! Provides a CLI to analyze diagram files and report the detected
//! diagram type, confidence, and supporting evidence.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use binnacle::core::logging::init_logging;
use binnacle::{analyze_file, DiagramAnalysis, DiagramType};

/// Binnacle - Detect diagram types with evidence-weighted confidence
#[derive(Parser)]
#[command(name = "binnacle")]
#[command(about = "A Rust utility to detect diagram types in heterogeneous diagram files")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a diagram file and report type, confidence, and evidence
    Analyze {
        /// Input diagram file (.drawio, .puml, .plantuml)
        #[arg(short, long)]
        input: PathBuf,

        /// Emit the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Detect the diagram type and print only its name
    Detect {
        /// Input diagram file (.drawio, .puml, .plantuml)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Show supported diagram types
    Types {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Main CLI application
pub struct BinnacleApp;

impl BinnacleApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Initialize logging with CLI flags (environment variables take precedence)
        let log_level_str = std::env::var("BINNACLE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("BINNACLE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Binnacle v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Analyze { input, json } => self.analyze_command(input, json, cli.verbose),
            Commands::Detect { input } => self.detect_command(input, cli.verbose),
            Commands::Types { json } => self.types_command(json, cli.verbose),
        }
    }

    /// Handle the analyze command
    fn analyze_command(&self, input: PathBuf, json: bool, verbose: bool) -> Result<()> {
        if !input.exists() {
            return Err(anyhow!("File not found: {}", input.display()));
        }

        let analysis = analyze_file(&input, None);
        info!(
            detected_type = %analysis.detected_type,
            confidence = analysis.confidence,
            "Analysis completed"
        );

        if json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        } else {
            print!("{}", render_report(&input, &analysis, verbose));
        }
        Ok(())
    }

    /// Handle the detect command
    fn detect_command(&self, input: PathBuf, verbose: bool) -> Result<()> {
        if !input.exists() {
            return Err(anyhow!("File not found: {}", input.display()));
        }

        let analysis = analyze_file(&input, None);

        if verbose {
            eprintln!(
                "Confidence: {}% ({})",
                analysis.confidence.round(),
                reliability_band(analysis.confidence)
            );
        }

        if analysis.detected_type == DiagramType::Unknown {
            eprintln!("Could not detect diagram type");
            return Err(anyhow!("Unknown diagram type"));
        }

        println!("{}", analysis.detected_type);
        Ok(())
    }

    /// Handle the types command
    fn types_command(&self, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Listing supported diagram types");
        }

        let detectable = DiagramType::detectable();

        if json {
            let types: Vec<serde_json::Value> = detectable
                .iter()
                .map(|diagram_type| {
                    serde_json::json!({
                        "name": diagram_type.to_string(),
                        "description": type_description(*diagram_type),
                    })
                })
                .collect();
            let listing = serde_json::json!({
                "supported_types": types,
                "total": detectable.len(),
            });
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Supported diagram types:");
            for diagram_type in detectable {
                println!(
                    "  {:<20} - {}",
                    diagram_type.to_string(),
                    type_description(*diagram_type)
                );
            }
            println!();
            println!("Total: {} diagram types supported", detectable.len());
        }

        Ok(())
    }
}

impl Default for BinnacleApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Reliability band for a 0-100 confidence value
fn reliability_band(confidence: f64) -> &'static str {
    if confidence >= 80.0 {
        "high (very reliable)"
    } else if confidence >= 60.0 {
        "medium (good)"
    } else if confidence >= 40.0 {
        "low (uncertain)"
    } else {
        "very low (unknown)"
    }
}

/// One-line description per diagram type
fn type_description(diagram_type: DiagramType) -> &'static str {
    match diagram_type {
        DiagramType::Flowchart => "Process flows with decisions and terminals",
        DiagramType::Sequence => "Actors and lifelines exchanging messages",
        DiagramType::Class => "Classes with attributes, methods, and associations",
        DiagramType::State => "States joined by guarded transitions",
        DiagramType::Component => "Components, interfaces, and dependencies",
        DiagramType::EntityRelationship => "Entities, relationships, and attributes",
        DiagramType::Network => "Network devices and addressing",
        DiagramType::Gantt => "Time-scheduled task bars",
        DiagramType::Mindmap => "Radial idea hierarchy",
        DiagramType::Timeline => "Events along a time axis",
        DiagramType::Unknown => "No type-specific evidence found",
    }
}

/// Render the human-readable analysis report
fn render_report(path: &std::path::Path, analysis: &DiagramAnalysis, verbose: bool) -> String {
    use std::fmt::Write as _;

    let mut report = String::new();
    let _ = writeln!(report, "Analyzing: {}", path.display());
    let _ = writeln!(report, "{}", "-".repeat(50));
    let _ = writeln!(report, "Detected type: {}", analysis.detected_type);
    let _ = writeln!(report, "Confidence: {}%", analysis.confidence.round());
    let _ = writeln!(
        report,
        "Reliability: {}",
        reliability_band(analysis.confidence)
    );

    if verbose {
        let _ = writeln!(report);
        let _ = writeln!(report, "Detection evidence:");

        // Strongest evidence first
        let mut sorted = analysis.patterns.clone();
        sorted.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        for pattern in &sorted {
            let _ = writeln!(
                report,
                "  {} ({}%)",
                pattern.diagram_type,
                pattern.confidence.round()
            );
            for evidence in &pattern.evidence {
                let _ = writeln!(report, "    - {}", evidence);
            }
        }

        let _ = writeln!(report);
        let _ = writeln!(report, "Metadata:");
        let _ = writeln!(report, "  Shapes: {}", analysis.metadata.total_shapes);
        let _ = writeln!(report, "  Edges: {}", analysis.metadata.total_edges);
        let _ = writeln!(
            report,
            "  Shape types: {}",
            analysis.metadata.shape_types.len()
        );

        let mut features: Vec<&str> = Vec::new();
        if analysis.metadata.has_specialized_shapes {
            features.push("specialized shapes");
        }
        if analysis.metadata.has_directional_flow {
            features.push("directional flow");
        }
        if analysis.metadata.has_hierarchy {
            features.push("hierarchy");
        }
        if analysis.metadata.has_temporal {
            features.push("temporal");
        }
        if analysis.metadata.has_data_model {
            features.push("data model");
        }
        if analysis.metadata.has_network_elements {
            features.push("network elements");
        }
        if !features.is_empty() {
            let _ = writeln!(report, "  Features: {}", features.join(", "));
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_reliability_bands() {
        assert_eq!(reliability_band(95.0), "high (very reliable)");
        assert_eq!(reliability_band(80.0), "high (very reliable)");
        assert_eq!(reliability_band(70.0), "medium (good)");
        assert_eq!(reliability_band(50.0), "low (uncertain)");
        assert_eq!(reliability_band(10.0), "very low (unknown)");
        assert_eq!(reliability_band(0.0), "very low (unknown)");
    }

    #[test]
    fn test_every_type_has_a_description() {
        for diagram_type in DiagramType::detectable() {
            assert!(!type_description(*diagram_type).is_empty());
        }
        assert!(!type_description(DiagramType::Unknown).is_empty());
    }

    #[test]
    fn test_render_report_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "states.puml", "@startuml\nstate Idle\n@enduml");
        let analysis = analyze_file(&path, None);

        let report = render_report(&path, &analysis, false);
        assert!(report.contains("Detected type: state"));
        assert!(report.contains("Confidence: 95%"));
        assert!(report.contains("Reliability: high (very reliable)"));
        assert!(!report.contains("Detection evidence:"));
    }

    #[test]
    fn test_render_report_verbose_lists_evidence() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "seq.puml",
            "@startuml\nparticipant Alice\nAlice -> Bob: hi\n@enduml",
        );
        let analysis = analyze_file(&path, None);

        let report = render_report(&path, &analysis, true);
        assert!(report.contains("Detection evidence:"));
        assert!(report.contains("sequence"));
        assert!(report.contains("Metadata:"));
    }

    #[test]
    fn test_analyze_command_missing_file_errors() {
        let app = BinnacleApp::new();
        let result = app.analyze_command(PathBuf::from("/no/such/file.puml"), false, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("File not found"));
    }

    #[test]
    fn test_detect_command_unknown_type_errors() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.puml", "just some plain text");

        let app = BinnacleApp::new();
        let result = app.detect_command(path, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_detect_command_succeeds_on_clear_input() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "states.puml", "@startuml\nstate Idle\n@enduml");

        let app = BinnacleApp::new();
        let result = app.detect_command(path, false);
        assert!(result.is_ok());
    }

    #[test]
    fn test_types_command_runs() {
        let app = BinnacleApp::new();
        assert!(app.types_command(false, false).is_ok());
        assert!(app.types_command(true, false).is_ok());
    }
}
