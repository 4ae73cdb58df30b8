//! Convert command implementation

use super::output;
use anyhow::{Context, Result};
use reporting_serializer::{ReportingSerializer, SerializerConfig, WireFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for convert command
pub struct ConvertConfig {
    pub file: PathBuf,
    /// Target format; inferred from the output file, else the other format
    pub to: Option<WireFormat>,
    pub pretty: bool,
    pub verbose: bool,
    pub output_file: Option<PathBuf>,
}

/// Convert a definition file between JSON and XML
pub async fn convert(config: ConvertConfig) -> Result<()> {
    let text = fs::read_to_string(&config.file)
        .with_context(|| format!("Failed to read definition file: {}", config.file.display()))?;
    let source = WireFormat::detect(&text)
        .or_else(|| extension_format(&config.file))
        .unwrap_or_default();

    let reader = ReportingSerializer::with_config(SerializerConfig {
        format: source,
        pretty: false,
    });
    let definition = reader
        .deserialize_definition(&text)
        .with_context(|| format!("Failed to read definition: {}", config.file.display()))?;

    let target = target_format(&config, source);
    if config.verbose {
        eprintln!(
            "Converting {} '{}' from {} to {}",
            definition.kind(),
            definition.name(),
            source,
            target
        );
    }

    let writer = ReportingSerializer::with_config(SerializerConfig {
        format: target,
        pretty: config.pretty,
    });
    let converted = writer
        .serialize(definition)
        .context("Failed to write definition")?;

    output::write_output(&converted, config.output_file.as_deref())
}

fn target_format(config: &ConvertConfig, source: WireFormat) -> WireFormat {
    config
        .to
        .or_else(|| config.output_file.as_deref().and_then(extension_format))
        .unwrap_or(match source {
            WireFormat::Json => WireFormat::Xml,
            WireFormat::Xml => WireFormat::Json,
        })
}

fn extension_format(path: &Path) -> Option<WireFormat> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(WireFormat::from_extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(to: Option<WireFormat>, output_file: Option<&str>) -> ConvertConfig {
        ConvertConfig {
            file: PathBuf::from("cohort.json"),
            to,
            pretty: false,
            verbose: false,
            output_file: output_file.map(PathBuf::from),
        }
    }

    #[test]
    fn test_target_format() {
        assert_eq!(target_format(&config(None, None), WireFormat::Json), WireFormat::Xml);
        assert_eq!(target_format(&config(None, None), WireFormat::Xml), WireFormat::Json);
        assert_eq!(
            target_format(&config(None, Some("out.json")), WireFormat::Json),
            WireFormat::Json
        );
        assert_eq!(
            target_format(&config(Some(WireFormat::Json), Some("out.xml")), WireFormat::Xml),
            WireFormat::Json
        );
    }
}
