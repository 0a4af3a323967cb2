//! CSV Dataset Loader Module
//! Parses a season's uploaded CSV files into named Polars tables, memoized by
//! the identity of the upload set.

use polars::prelude::*;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No files uploaded")]
    NoFiles,
    #[error("Failed to load {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: PolarsError,
    },
}

/// A file handed over by the upload widget: its name and raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        Ok(Self { name, bytes })
    }

    /// Dataset name: the file name with its extension stripped.
    pub fn dataset_name(&self) -> String {
        Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Identity of an upload set. Equal keys mean equal names and contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadKey(u64);

/// All files uploaded for one season.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSet {
    files: Vec<UploadedFile>,
}

impl UploadSet {
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|f| f.name.clone()).collect()
    }

    /// Content hash over every (name, bytes) pair, independent of selection order.
    pub fn key(&self) -> UploadKey {
        let mut entries: Vec<(&str, &[u8])> = self
            .files
            .iter()
            .map(|f| (f.name.as_str(), f.bytes.as_slice()))
            .collect();
        entries.sort();

        let mut hasher = DefaultHasher::new();
        entries.len().hash(&mut hasher);
        for (name, bytes) in entries {
            name.hash(&mut hasher);
            bytes.hash(&mut hasher);
        }
        UploadKey(hasher.finish())
    }
}

/// Tables parsed from one season's uploads, keyed by dataset name.
#[derive(Debug, Clone, Default)]
pub struct DatasetBundle {
    tables: HashMap<String, DataFrame>,
}

impl DatasetBundle {
    pub fn get(&self, dataset: &str) -> Option<&DataFrame> {
        self.tables.get(dataset)
    }

    /// Dataset names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}

impl FromIterator<(String, DataFrame)> for DatasetBundle {
    fn from_iter<I: IntoIterator<Item = (String, DataFrame)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

/// Memoizing loader. Holds every bundle parsed this session.
#[derive(Default)]
pub struct DatasetLoader {
    cache: HashMap<UploadKey, Arc<DatasetBundle>>,
    parse_count: usize,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle already parsed for an identical upload set, if any.
    pub fn cached(&self, key: UploadKey) -> Option<Arc<DatasetBundle>> {
        self.cache.get(&key).cloned()
    }

    /// Cache a freshly parsed bundle and count the parse.
    pub fn store(&mut self, key: UploadKey, bundle: DatasetBundle) -> Arc<DatasetBundle> {
        let bundle = Arc::new(bundle);
        self.cache.insert(key, Arc::clone(&bundle));
        self.parse_count += 1;
        bundle
    }

    /// Number of upload sets actually parsed (cache misses).
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    /// Parse every file of an upload set, without touching any cache.
    /// Files are parsed in parallel; a later file with the same dataset name
    /// replaces an earlier one.
    pub fn parse(upload: &UploadSet) -> Result<DatasetBundle, LoaderError> {
        if upload.is_empty() {
            return Err(LoaderError::NoFiles);
        }

        let parsed: Vec<(String, DataFrame)> = upload
            .files()
            .par_iter()
            .map(|file| {
                let df = Self::read_csv_bytes(&file.bytes).map_err(|source| {
                    LoaderError::Parse {
                        file: file.name.clone(),
                        source,
                    }
                })?;
                Ok((file.dataset_name(), df))
            })
            .collect::<Result<_, LoaderError>>()?;

        for (name, df) in &parsed {
            log::info!("Parsed dataset '{}': {} rows, {} columns", name, df.height(), df.width());
        }

        Ok(parsed.into_iter().collect())
    }

    /// Read delimited text with a header row into a DataFrame.
    pub fn read_csv_bytes(bytes: &[u8]) -> PolarsResult<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()
    }
}
