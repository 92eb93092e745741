//! Specification document loading
//!
//! Reads a TOML or JSON document from disk or memory, deserializes it into
//! the raw document types and assembles a validated `Specification`.

use super::error::{InputError, InputResult};
use super::raw::RawSpecification;
use crate::config::compile_time::input::MAX_FILE_SIZE;
use crate::config::runtime::{BuilderPreferences, RuntimeConfig};
use crate::logging::codes;
use crate::spec::{SpecResult, Specification, SpecificationAssembler};
use crate::template::TemplateOptions;
use crate::{log_debug, log_error, log_info, log_success};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension, case-insensitively
    pub fn from_path(path: &Path) -> InputResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(InputError::UnsupportedFormat { extension }),
        }
    }

    pub fn parse(self, content: &str) -> InputResult<RawSpecification> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| InputError::Parse {
                format: self.to_string(),
                message: e.to_string(),
            }),
            Self::Json => serde_json::from_str(content).map_err(|e| InputError::Parse {
                format: self.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
        }
    }
}

/// Options applied while turning a document into a specification
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub template: TemplateOptions,
    pub builder: BuilderPreferences,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from_runtime(&RuntimeConfig::default())
    }
}

impl LoadOptions {
    pub fn from_runtime(config: &RuntimeConfig) -> Self {
        Self {
            template: TemplateOptions::from_preferences(&config.template),
            builder: config.builder.clone(),
        }
    }
}

impl RawSpecification {
    /// Validate the document and build every entry in declaration order
    pub fn into_specification(self, options: &LoadOptions) -> SpecResult<Specification> {
        let mut assembler = SpecificationAssembler::new(&self.header())?
            .with_template_options(options.template.clone())
            .with_preferences(options.builder.clone());

        for entry in &self.errors {
            let input = entry.to_input().map_err(|source| {
                let error = assembler.entry_error(&entry.code, source);
                log_error!(error.error_code(), &error.to_string(),
                    "index" => assembler.next_index()
                );
                error
            })?;
            assembler.add(input)?;
        }

        assembler.finish()
    }
}

pub fn parse_toml_str(content: &str) -> InputResult<RawSpecification> {
    DocumentFormat::Toml.parse(content)
}

pub fn parse_json_str(content: &str) -> InputResult<RawSpecification> {
    DocumentFormat::Json.parse(content)
}

pub fn from_toml_str(content: &str) -> InputResult<Specification> {
    from_toml_str_with(content, &LoadOptions::default())
}

pub fn from_toml_str_with(content: &str, options: &LoadOptions) -> InputResult<Specification> {
    Ok(parse_toml_str(content)?.into_specification(options)?)
}

pub fn from_json_str(content: &str) -> InputResult<Specification> {
    from_json_str_with(content, &LoadOptions::default())
}

pub fn from_json_str_with(content: &str, options: &LoadOptions) -> InputResult<Specification> {
    Ok(parse_json_str(content)?.into_specification(options)?)
}

/// Load and validate a specification file
pub fn load_file(path: impl AsRef<Path>) -> InputResult<Specification> {
    load_file_with(path, &LoadOptions::default())
}

pub fn load_file_with(path: impl AsRef<Path>, options: &LoadOptions) -> InputResult<Specification> {
    let path = path.as_ref();
    log_info!("Loading specification", "path" => path.display());

    let result = read_document(path).and_then(|(format, content)| {
        let raw = format.parse(&content)?;
        Ok(raw.into_specification(options)?)
    });

    match &result {
        Ok(spec) => {
            log_success!(codes::success::DOCUMENT_LOADED, "Loaded specification",
                "path" => path.display(),
                "errors" => spec.len()
            );
        }
        // Specification failures are logged where they happen
        Err(InputError::Spec(_)) => {}
        Err(error) => {
            log_error!(error.error_code(), &error.to_string(), "path" => path.display());
        }
    }

    result
}

/// Read a document's text after checking its existence, format, size and encoding
pub fn read_document(path: &Path) -> InputResult<(DocumentFormat, String)> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(InputError::FileNotFound { path: display });
    }

    let format = DocumentFormat::from_path(path)?;

    let metadata = std::fs::metadata(path).map_err(|e| InputError::Io {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let size = metadata.len();
    if size == 0 {
        return Err(InputError::EmptyFile { path: display });
    }
    if size > MAX_FILE_SIZE {
        return Err(InputError::FileTooLarge {
            size,
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| InputError::Io {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let content =
        String::from_utf8(bytes).map_err(|_| InputError::InvalidEncoding { path: display.clone() })?;

    if content.trim().is_empty() {
        return Err(InputError::EmptyFile { path: display });
    }

    log_debug!("Read specification document",
        "path" => &display,
        "format" => format,
        "bytes" => size
    );

    Ok((format, content))
}
