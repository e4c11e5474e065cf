use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::TAG_SEPARATOR;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
    #[serde(default)]
    pub output: OutputConfig,
    /// Sources in reconciliation order. The first source to report an
    /// identity decides its slug and spelling.
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

// ---------------------------------------------------------------------------
// Malformed records
// ---------------------------------------------------------------------------

/// What the engine does with a record that breaks the field contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Drop the record and count it in the summary.
    Skip,
}

impl std::fmt::Display for MalformedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub file: String,
    /// Owner → ROR id map, `url_matches` only.
    #[serde(default)]
    pub org_map: Option<String>,
    /// Evidence tag override. Required for `affiliation`.
    #[serde(default)]
    pub tag: Option<String>,
    /// Field delimiter for tabular sources. Defaults per kind and extension.
    #[serde(default)]
    pub delimiter: Option<char>,
}

impl SourceConfig {
    /// Tag applied to every record from this source.
    pub fn evidence_tag(&self) -> Option<&str> {
        self.tag.as_deref().or(self.kind.default_tag())
    }

    /// Configured delimiter as a byte. `None` when unset or not ASCII;
    /// `validate` rejects the latter.
    pub fn delimiter_byte(&self) -> Option<u8> {
        self.delimiter
            .filter(char::is_ascii)
            .and_then(|c| u8::try_from(c).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Repo metadata JSON lines joined with an owner → ROR map.
    UrlMatches,
    /// Organization mentions extracted from READMEs.
    NerTextExtraction,
    /// Hand-checked links carrying their own tags.
    HumanCurated,
    /// Author affiliations joined to software mentions.
    Affiliation,
    /// JOSS paper affiliations as JSON lines.
    Joss,
    /// OpenAIRE DOI → ROR joined with CZI DOI → repo.
    OpenaireCzi,
}

impl SourceKind {
    pub const ALL: [SourceKind; 6] = [
        Self::UrlMatches,
        Self::NerTextExtraction,
        Self::HumanCurated,
        Self::Affiliation,
        Self::Joss,
        Self::OpenaireCzi,
    ];

    /// Evidence tag used when the source config has none. `Affiliation`
    /// feeds several datasets and must always be tagged explicitly.
    pub fn default_tag(&self) -> Option<&'static str> {
        match self {
            Self::UrlMatches => Some("url_matches"),
            Self::NerTextExtraction => Some("ner_text_extraction"),
            Self::HumanCurated => Some("human_curated"),
            Self::Affiliation => None,
            Self::Joss => Some("joss_affiliation_links"),
            Self::OpenaireCzi => Some("openaire_czi"),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UrlMatches => write!(f, "url_matches"),
            Self::NerTextExtraction => write!(f, "ner_text_extraction"),
            Self::HumanCurated => write!(f, "human_curated"),
            Self::Affiliation => write!(f, "affiliation"),
            Self::Joss => write!(f, "joss"),
            Self::OpenaireCzi => write!(f, "openaire_czi"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv")]
    pub csv: String,
    #[serde(default = "default_json")]
    pub json: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: default_csv(),
            json: default_json(),
        }
    }
}

fn default_csv() -> String {
    "software_to_ror.csv".into()
}

fn default_json() -> String {
    "software_to_ror.json".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl PipelineConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: PipelineConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.sources.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least 1 source is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ReconError::ConfigValidation("source name must not be empty".into()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
            if source.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': file must not be empty",
                    source.name
                )));
            }

            if source.kind == SourceKind::UrlMatches && source.org_map.is_none() {
                return Err(ReconError::ConfigValidation(format!(
                    "source '{}': url_matches requires org_map",
                    source.name
                )));
            }

            if let Some(delimiter) = source.delimiter {
                if !delimiter.is_ascii() {
                    return Err(ReconError::ConfigValidation(format!(
                        "source '{}': delimiter {delimiter:?} must be a single ASCII character",
                        source.name
                    )));
                }
            }

            match source.evidence_tag() {
                None => {
                    return Err(ReconError::ConfigValidation(format!(
                        "source '{}': {} requires tag",
                        source.name, source.kind
                    )));
                }
                Some(tag) if tag.trim().is_empty() => {
                    return Err(ReconError::ConfigValidation(format!(
                        "source '{}': tag must not be empty",
                        source.name
                    )));
                }
                Some(tag) if tag.contains(TAG_SEPARATOR) => {
                    return Err(ReconError::ConfigValidation(format!(
                        "source '{}': tag '{tag}' contains '{TAG_SEPARATOR}'",
                        source.name
                    )));
                }
                Some(_) => {}
            }
        }

        if self.output.csv == self.output.json {
            return Err(ReconError::ConfigValidation(format!(
                "output.csv and output.json both point at '{}'",
                self.output.csv
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
