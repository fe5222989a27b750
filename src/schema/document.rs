use std::borrow::Cow;
use std::path::Path;

use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::file::loader;

/// A schema and the base URI its relative references resolve against.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    schema: Value,
    base_uri: Option<Url>,
}

impl SchemaDocument {
    /// Parses an inline schema. It has no base URI, so relative `$ref`s in
    /// it cannot be resolved.
    pub fn from_text(text: &str) -> Result<Self> {
        let schema = serde_json::from_str(text)
            .map_err(|e| Error::invalid_json("The JSON schema is not valid JSON", e))?;
        Ok(Self {
            schema,
            base_uri: None,
        })
    }

    /// Loads a schema from `path`, relative to the process working directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|source| Error::Io {
            path: ".".into(),
            source,
        })?;
        Self::from_file_in(&cwd, path)
    }

    /// Loads a schema from `path`, relative to `cwd`. The base URI becomes
    /// `file://<cwd>/<path>`.
    pub fn from_file_in<P: AsRef<Path>>(cwd: &Path, path: P) -> Result<Self> {
        let path = path.as_ref();
        let full_path = cwd.join(path);
        if !full_path.is_file() {
            return Err(Error::SchemaNotFound {
                path: path.to_path_buf(),
            });
        }

        let text = loader::read_text_file(&full_path)?;
        let schema = serde_json::from_str(&text).map_err(|e| {
            Error::invalid_json(format!("The JSON schema {} is not valid JSON", path.display()), e)
        })?;
        let base_uri = Url::from_file_path(&full_path).map_err(|()| Error::InvalidSchema {
            message: format!("cannot build a file URI for {}", full_path.display()),
        })?;
        log::debug!("loaded schema {} with base URI {}", path.display(), base_uri);

        Ok(Self {
            schema,
            base_uri: Some(base_uri),
        })
    }

    /// Wraps an already-parsed schema.
    pub fn from_value(schema: Value, base_uri: Option<Url>) -> Self {
        Self { schema, base_uri }
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    pub fn base_uri(&self) -> Option<&Url> {
        self.base_uri.as_ref()
    }

    /// The schema as handed to the validator. With a base URI, a schema
    /// without an identifier gets the base URI as its `$id`, and a relative
    /// identifier is resolved against it. Absolute identifiers are kept.
    pub(crate) fn with_base_id(&self) -> Cow<'_, Value> {
        let (Some(base_uri), Value::Object(members)) = (&self.base_uri, &self.schema) else {
            return Cow::Borrowed(&self.schema);
        };
        let key = if members.contains_key("$id") { "$id" } else { "id" };
        let id = match members.get(key) {
            None => base_uri.clone(),
            Some(Value::String(id)) => match Url::parse(id) {
                Ok(_) => return Cow::Borrowed(&self.schema),
                Err(_) => match base_uri.join(id) {
                    Ok(resolved) => resolved,
                    Err(e) => {
                        log::warn!(
                            "cannot resolve schema id '{}' against {}: {}",
                            id,
                            base_uri,
                            e
                        );
                        return Cow::Borrowed(&self.schema);
                    }
                },
            },
            Some(_) => return Cow::Borrowed(&self.schema),
        };
        let mut members = members.clone();
        members.insert(key.to_string(), Value::String(id.to_string()));
        Cow::Owned(Value::Object(members))
    }
}
