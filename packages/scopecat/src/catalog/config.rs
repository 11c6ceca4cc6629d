//! Catalog configuration.

use std::collections::BTreeMap;
use std::fs::read_to_string;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bon::Builder;
use color_eyre::eyre::{Context, Result, bail};
use serde_json::Value;
use tap::Pipe;

/// Configures a [`ScopedCatalog`](super::ScopedCatalog).
#[derive(Debug, Clone, Default, Builder)]
pub struct CatalogConfig {
    /// Backing JSON file. Without one the catalog lives in memory only.
    #[builder(into)]
    pub path: Option<PathBuf>,

    /// Forbid creating, renaming or commenting items and deleting whole
    /// items. Payload updates on existing items stay allowed.
    #[builder(default)]
    pub locked: bool,

    /// Words used in messages.
    #[builder(default)]
    pub labels: Labels,

    /// How payloads are rendered for display.
    #[builder(default)]
    pub payload_format: PayloadFormat,

    /// Items seeded before loading, as name to global payload.
    #[builder(default)]
    pub defaults: BTreeMap<String, Value>,

    /// Comments for seeded items. Names missing from `defaults` are ignored.
    #[builder(default)]
    pub comments: BTreeMap<String, String>,

    /// Folder that scope resolution starts from. Defaults to the process
    /// working directory, queried on every lookup.
    #[builder(into)]
    pub working_dir: Option<PathBuf>,
}

/// Words describing what a catalog holds.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Labels {
    #[builder(into)]
    pub item: String,

    #[builder(into)]
    pub payload: String,

    #[builder(into)]
    pub payload_plural: String,
}

impl Labels {
    /// Labels for a command alias catalog.
    pub fn alias() -> Self {
        Self::builder()
            .item("alias")
            .payload("alias command")
            .payload_plural("alias commands")
            .build()
    }

    /// Labels for a tool parameter catalog.
    pub fn parameter() -> Self {
        Self::builder()
            .item("parameter")
            .payload("parameter value")
            .payload_plural("parameter values")
            .build()
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::builder()
            .item("item")
            .payload("payload")
            .payload_plural("payloads")
            .build()
    }
}

/// Renders payloads as display strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    /// Strings verbatim, anything else as compact JSON.
    #[default]
    Plain,

    /// A list of strings as a shell-quoted command line. Other payloads
    /// fall back to [`PayloadFormat::Plain`].
    ShellCommand,
}

impl PayloadFormat {
    /// Render `payload` for display.
    pub fn format(self, payload: &Value) -> String {
        match (self, payload) {
            (_, Value::String(text)) => text.clone(),
            (Self::ShellCommand, Value::Array(words)) => match words
                .iter()
                .map(Value::as_str)
                .collect::<Option<Vec<_>>>()
            {
                Some(words) => shell_words::join(words),
                None => payload.to_string(),
            },
            _ => payload.to_string(),
        }
    }
}

/// Seed data for a catalog: default payloads and their comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Defaults {
    pub payloads: BTreeMap<String, Value>,
    pub comments: BTreeMap<String, String>,
}

impl Defaults {
    /// Read defaults from a JSON object file.
    ///
    /// Each entry is either a bare payload or an object of the form
    /// `{"value": <payload>, "comment": <text>}`. A missing file yields no
    /// defaults.
    #[tracing::instrument]
    pub fn read(path: &Path) -> Result<Self> {
        let content = match read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).context(format!("read defaults file: {path:?}")),
        };

        serde_json::from_str::<Value>(&content)
            .with_context(|| format!("parse defaults file: {path:?}"))?
            .pipe(Self::from_value)
            .with_context(|| format!("interpret defaults file: {path:?}"))
    }

    /// Interpret a parsed defaults document.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(entries) = value else {
            bail!("expected defaults to be an object");
        };

        let mut defaults = Self::default();
        for (name, entry) in entries {
            match entry {
                Value::Object(mut fields) if fields.contains_key("value") => {
                    if let Some(comment) = fields.remove("comment") {
                        let Value::String(comment) = comment else {
                            bail!("expected comment for {name:?} to be a string");
                        };
                        defaults.comments.insert(name.clone(), comment);
                    }
                    let payload = fields.remove("value").unwrap_or(Value::Null);
                    defaults.payloads.insert(name, payload);
                }
                payload => {
                    defaults.payloads.insert(name, payload);
                }
            }
        }
        Ok(defaults)
    }
}
