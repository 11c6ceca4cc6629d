//! The persisted catalog format.
//!
//! ```json
//! {
//!   "<name>": {
//!     "comment": "<optional text>",
//!     "payloads": {
//!       "": <global payload>,
//!       "<absolute scope path>": <payload>
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs::{self, read_to_string};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use derive_more::{Display, Error};
use serde::Serialize;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use super::config::Labels;
use super::item::ScopedItem;
use super::name::{GLOBAL_SCOPE, normalize_scope};

/// Problems found while loading a catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LoadError {
    #[display("Unable to read catalog: {message}")]
    Unreadable { message: String },

    #[display("Catalog is not valid JSON: {message}")]
    Malformed { message: String },

    #[display("Catalog data is not a JSON dictionary.")]
    NotAnObject,

    #[display("Item \"{name}\" data is not a dictionary.")]
    ItemNotObject { name: String },

    #[display("Bad {label} data: {name}")]
    BadPayloads { label: String, name: String },

    #[display("Scope is not an absolute path for {name}: {scope}")]
    RelativeScope { name: String, scope: String },
}

/// Problems writing a catalog file.
#[derive(Debug, Display, Error)]
pub enum SaveError {
    #[display("create folder {}: {source}", folder.display())]
    CreateFolder { folder: PathBuf, source: io::Error },

    #[display("serialize catalog: {source}")]
    Serialize { source: serde_json::Error },

    #[display("write catalog: {source}")]
    Write { source: io::Error },
}

/// Items read from a catalog file, along with everything that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loaded {
    pub items: Vec<ScopedItem>,
    pub errors: Vec<LoadError>,
}

/// Read a catalog file. A missing file is an empty catalog.
#[tracing::instrument(skip(labels))]
pub fn read(path: &Path, labels: &Labels) -> Loaded {
    let content = match read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Loaded::default(),
        Err(e) => {
            let message = e.to_string();
            return Loaded {
                items: Vec::new(),
                errors: vec![LoadError::Unreadable { message }],
            };
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(raw) => parse(raw, labels),
        Err(e) => Loaded {
            items: Vec::new(),
            errors: vec![LoadError::Malformed {
                message: e.to_string(),
            }],
        },
    }
}

/// Validate a parsed catalog document, keeping every well formed item.
pub fn parse(raw: Value, labels: &Labels) -> Loaded {
    let Value::Object(entries) = raw else {
        return Loaded {
            items: Vec::new(),
            errors: vec![LoadError::NotAnObject],
        };
    };

    let mut loaded = Loaded::default();
    for (name, data) in entries {
        match parse_item(&name, data, labels) {
            Ok(item) => loaded.items.push(item),
            Err(error) => {
                tracing::debug!(?name, %error, "skip catalog item");
                loaded.errors.push(error);
            }
        }
    }
    loaded.items.sort_by(|a, b| a.name.cmp(&b.name));
    loaded
}

fn parse_item(name: &str, data: Value, labels: &Labels) -> Result<ScopedItem, LoadError> {
    let Value::Object(mut data) = data else {
        return Err(LoadError::ItemNotObject { name: name.into() });
    };

    let bad_payloads = || LoadError::BadPayloads {
        label: labels.payload.clone(),
        name: name.into(),
    };
    let Some(Value::Object(mut payloads)) = data.remove("payloads") else {
        return Err(bad_payloads());
    };
    let Some(global_payload) = payloads.remove(GLOBAL_SCOPE) else {
        return Err(bad_payloads());
    };

    let comment = match data.remove("comment") {
        None | Some(Value::Null) => None,
        Some(Value::String(comment)) => Some(comment),
        Some(other) => {
            tracing::warn!(?name, comment = %other, "ignore non-text comment");
            None
        }
    };

    let mut payload_map = BTreeMap::new();
    for (scope, payload) in payloads {
        if !Path::new(&scope).is_absolute() {
            return Err(LoadError::RelativeScope {
                name: name.into(),
                scope,
            });
        }
        payload_map.insert(normalize_scope(&scope, None), payload);
    }

    Ok(ScopedItem::builder()
        .name(name)
        .global_payload(global_payload)
        .maybe_comment(comment)
        .payload_map(payload_map)
        .build())
}

#[derive(Serialize)]
struct ItemRecord<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    payloads: Map<String, Value>,
}

/// Render items in the persisted format: names sorted, global payload first
/// and the remaining scopes sorted.
pub fn render<'a>(items: impl IntoIterator<Item = &'a ScopedItem>) -> Result<String, SaveError> {
    let records = items
        .into_iter()
        .map(|item| {
            let record = ItemRecord {
                comment: item.comment.as_deref().filter(|comment| !comment.is_empty()),
                payloads: item
                    .payloads()
                    .map(|(scope, payload)| (scope.to_string(), payload.clone()))
                    .collect(),
            };
            (item.name.as_str(), record)
        })
        .collect::<BTreeMap<_, _>>();

    let mut json = serde_json::to_string_pretty(&records).map_err(|source| SaveError::Serialize { source })?;
    json.push('\n');
    Ok(json)
}

/// Write items to `path`, creating its folder if needed.
///
/// The content goes to a temporary file next to `path` first and is then
/// renamed over it, so readers never observe a partial file. An existing
/// file keeps its permissions; a new one is readable by its owner only.
#[tracing::instrument(skip(items))]
pub fn write<'a>(path: &Path, items: impl IntoIterator<Item = &'a ScopedItem>) -> Result<(), SaveError> {
    let json = render(items)?;

    let folder = match path.parent() {
        Some(folder) if !folder.as_os_str().is_empty() => folder.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&folder).map_err(|source| SaveError::CreateFolder {
        folder: folder.clone(),
        source,
    })?;

    let mut file = NamedTempFile::new_in(&folder).map_err(|source| SaveError::Write { source })?;
    file.write_all(json.as_bytes())
        .map_err(|source| SaveError::Write { source })?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(|source| SaveError::Write { source })?;
    }
    file.persist(path)
        .map_err(|e| SaveError::Write { source: e.error })?;

    tracing::debug!(?path, bytes = json.len(), "wrote catalog");
    Ok(())
}
