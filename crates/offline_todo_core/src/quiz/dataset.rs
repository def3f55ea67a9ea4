//! Loading of the verse list and chapter metadata files.

use crate::model::ayah::{Ayah, QuranMeta, Surah};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type QuizDataResult<T> = Result<T, QuizDataError>;

#[derive(Debug)]
pub enum QuizDataError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        dataset: &'static str,
        source: serde_json::Error,
    },
}

impl Display for QuizDataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read dataset `{}`: {source}", path.display())
            }
            Self::Parse { dataset, source } => {
                write!(f, "failed to parse {dataset} dataset: {source}")
            }
        }
    }
}

impl Error for QuizDataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Immutable verse list plus chapter metadata.
#[derive(Debug, Clone)]
pub struct QuizDataset {
    ayahs: Vec<Ayah>,
    meta: QuranMeta,
}

impl QuizDataset {
    pub fn new(ayahs: Vec<Ayah>, meta: QuranMeta) -> Self {
        Self { ayahs, meta }
    }

    /// Parses both datasets from JSON text.
    pub fn from_json_str(ayahs_json: &str, meta_json: &str) -> QuizDataResult<Self> {
        let ayahs = serde_json::from_str::<Vec<Ayah>>(ayahs_json).map_err(|source| {
            QuizDataError::Parse {
                dataset: "ayah",
                source,
            }
        })?;
        let meta = serde_json::from_str::<QuranMeta>(meta_json).map_err(|source| {
            QuizDataError::Parse {
                dataset: "quran meta",
                source,
            }
        })?;
        Ok(Self::new(ayahs, meta))
    }

    /// Reads and parses both dataset files.
    ///
    /// # Side effects
    /// - Emits `quiz_load` logging events with duration and counts.
    pub fn load(ayahs_path: impl AsRef<Path>, meta_path: impl AsRef<Path>) -> QuizDataResult<Self> {
        let started_at = Instant::now();
        let result = read_file(ayahs_path.as_ref()).and_then(|ayahs_json| {
            let meta_json = read_file(meta_path.as_ref())?;
            Self::from_json_str(&ayahs_json, &meta_json)
        });

        match &result {
            Ok(dataset) => info!(
                "event=quiz_load module=quiz status=ok duration_ms={} ayahs={} surahs={}",
                started_at.elapsed().as_millis(),
                dataset.ayahs.len(),
                dataset.surahs().len()
            ),
            Err(err) => error!(
                "event=quiz_load module=quiz status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    pub fn ayahs(&self) -> &[Ayah] {
        &self.ayahs
    }

    pub fn meta(&self) -> &QuranMeta {
        &self.meta
    }

    pub fn surahs(&self) -> &[Surah] {
        &self.meta.data.surahs.references
    }

    pub fn surah(&self, number: u32) -> Option<&Surah> {
        self.surahs().iter().find(|surah| surah.number == number)
    }

    /// Selectable juz ids, from the metadata's juz markers.
    ///
    /// Falls back to `1..=count` when the markers are absent.
    pub fn juz_ids(&self) -> Vec<u32> {
        let juzs = &self.meta.data.juzs;
        if juzs.references.is_empty() {
            return (1..=juzs.count).collect();
        }
        juzs.references.iter().map(|marker| marker.juz).collect()
    }
}

fn read_file(path: &Path) -> QuizDataResult<String> {
    std::fs::read_to_string(path).map_err(|source| QuizDataError::Io {
        path: path.to_path_buf(),
        source,
    })
}
