//! # Schema Catalog
//!
//! The handle the I/O layer holds: every compiled [`SourceSchema`] of one
//! schema description, its data root, and the record delimiter.
//!
//! ## Lifecycle
//!
//! Built once by [`SchemaCatalog::open`], [`SchemaCatalog::from_reader`],
//! or [`SchemaCatalog::from_rows`], then read-only. Each catalog owns its
//! own freshly compiled map; two catalogs never share schema state.
//!
//! ## Data Root
//!
//! The data root always ends with a path separator. When not configured,
//! it is the directory holding the schema file, so a layout like
//!
//! ```text
//! trace/schema.csv
//! trace/machine_events/part-00000.csv
//! trace/task_usage/part-00000.csv
//! ```
//!
//! needs no further configuration.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};

use tabschema_core::{LookupError, Record, SchemaError, TabschemaError};
use thiserror::Error;

use crate::compiler::SchemaCompiler;
use crate::config::CatalogConfig;
use crate::decoder::{RecordDecoder, RecordStream};
use crate::descriptor::{FieldAccessor, SourceSchema};
use crate::row::{parse_rows, SchemaRow};

/// Failure to build a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The schema description could not be read.
    #[error("cannot read schema '{path}': {source}")]
    Io {
        /// Path, or `<reader>` for in-memory input.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The schema description is malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// All compiled source schemas of one schema description.
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    data_root: PathBuf,
    delimiter: char,
    sources: BTreeMap<String, SourceSchema>,
}

impl SchemaCatalog {
    /// Read and compile the schema CSV at `path`.
    ///
    /// The data root is `config.data_root` if set, otherwise the directory
    /// holding `path`.
    ///
    /// # Errors
    ///
    /// `CatalogError::Io` if the file cannot be read, `CatalogError::Schema`
    /// if it is not a valid schema.
    pub fn open(path: impl AsRef<Path>, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let data_root = match &config.data_root {
            Some(root) => normalize_root(root),
            None => data_root_of(path),
        };

        let rows = parse_rows(&text)?;
        let catalog = Self::from_rows(&rows, data_root, config)?;
        tracing::info!(
            schema = %path.display(),
            data_root = %catalog.data_root.display(),
            sources = catalog.len(),
            "loaded schema catalog"
        );
        Ok(catalog)
    }

    /// Read and compile schema CSV from `reader`.
    ///
    /// `config.data_root` is ignored; `data_root` is used as given.
    pub fn from_reader<R: Read>(
        mut reader: R,
        data_root: impl AsRef<Path>,
        config: &CatalogConfig,
    ) -> Result<Self, CatalogError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|source| CatalogError::Io {
                path: "<reader>".to_string(),
                source,
            })?;
        let rows = parse_rows(&text)?;
        Ok(Self::from_rows(&rows, data_root, config)?)
    }

    /// Compile in-memory schema rows.
    ///
    /// `config.data_root` is ignored; `data_root` is used as given.
    pub fn from_rows(
        rows: &[SchemaRow],
        data_root: impl AsRef<Path>,
        config: &CatalogConfig,
    ) -> Result<Self, SchemaError> {
        let sources = SchemaCompiler::new(config.pattern_policy).compile(rows)?;
        Ok(Self {
            data_root: normalize_root(data_root.as_ref()),
            delimiter: config.delimiter,
            sources,
        })
    }

    /// Base directory of the source folders, ending with a separator.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Field delimiter used by decoders built from this catalog.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if the schema defines no sources.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Source keys, sorted.
    pub fn list_sources(&self) -> Vec<&str> {
        self.sources.keys().map(String::as_str).collect()
    }

    /// All source schemas, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = &SourceSchema> {
        self.sources.values()
    }

    /// The schema of `source_key`.
    ///
    /// # Errors
    ///
    /// `LookupError::UnknownSource`, listing the valid keys.
    pub fn schema_for(&self, source_key: &str) -> Result<&SourceSchema, LookupError> {
        self.sources
            .get(source_key)
            .ok_or_else(|| LookupError::UnknownSource {
                name: source_key.to_string(),
                available: self.sources.keys().cloned().collect(),
            })
    }

    /// Zero-based position of `label` in `source_key`.
    ///
    /// # Errors
    ///
    /// `LookupError::UnknownSource` or `LookupError::UnknownField`, each
    /// listing the valid names.
    pub fn index_of_field(&self, source_key: &str, label: &str) -> Result<usize, LookupError> {
        let schema = self.schema_for(source_key)?;
        schema
            .position_of(label)
            .ok_or_else(|| LookupError::UnknownField {
                source_key: source_key.to_string(),
                label: label.to_string(),
                available: schema.labels().map(str::to_string).collect(),
            })
    }

    /// One accessor per field of `source_key`, keyed by label.
    pub fn field_accessors(&self, source_key: &str) -> Result<HashMap<String, FieldAccessor>, LookupError> {
        let schema = self.schema_for(source_key)?;
        Ok(schema
            .fields()
            .iter()
            .map(|f| (f.label.clone(), FieldAccessor::new(f.position)))
            .collect())
    }

    /// Decoder for the records of `source_key`.
    pub fn decoder(&self, source_key: &str) -> Result<RecordDecoder<'_>, LookupError> {
        let schema = self.schema_for(source_key)?;
        Ok(RecordDecoder::new(schema).with_delimiter(self.delimiter))
    }

    /// Decode one line of `source_key`.
    pub fn decode(&self, source_key: &str, raw_line: &str) -> Result<Record, TabschemaError> {
        Ok(self.decoder(source_key)?.decode(raw_line)?)
    }

    /// Lazily decode the lines of `source_key` supplied by `lines`.
    ///
    /// The stream is single-pass unless `lines` can be recreated.
    pub fn stream_source<I>(
        &self,
        source_key: &str,
        lines: I,
    ) -> Result<RecordStream<'_, I::IntoIter>, LookupError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Ok(self.decoder(source_key)?.stream(lines))
    }

    /// Directory the data files of `source_key` live in: `<data_root>/<key>/`.
    pub fn source_dir(&self, source_key: &str) -> Result<PathBuf, LookupError> {
        let schema = self.schema_for(source_key)?;
        Ok(self.data_root.join(schema.source_key()).join(""))
    }
}

/// Append a trailing separator if missing; an empty path becomes `./`.
fn normalize_root(root: &Path) -> PathBuf {
    if root.as_os_str().is_empty() {
        return PathBuf::from(".").join("");
    }
    root.join("")
}

/// The directory holding `schema_path`, with a trailing separator.
fn data_root_of(schema_path: &Path) -> PathBuf {
    match schema_path.parent() {
        Some(parent) => normalize_root(parent),
        None => normalize_root(Path::new("")),
    }
}
