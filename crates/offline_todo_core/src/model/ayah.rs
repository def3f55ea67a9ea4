//! Read-only verse and chapter records of the quiz datasets.
//!
//! Field names follow the camelCase JSON emitted by the alquran.cloud API
//! the datasets were exported from. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Chapter (surah) metadata, shared by verse records and the meta file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Surah {
    pub number: u32,
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
    pub revelation_type: String,
    pub number_of_ayahs: u32,
}

/// Prostration marker. The API emits `false` or a detail object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sajda {
    Flag(bool),
    Marker {
        id: u32,
        recommended: bool,
        obligatory: bool,
    },
}

impl Default for Sajda {
    fn default() -> Self {
        Self::Flag(false)
    }
}

impl Sajda {
    pub fn is_sajda(&self) -> bool {
        match self {
            Self::Flag(value) => *value,
            Self::Marker { .. } => true,
        }
    }
}

/// One verse with its positional metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ayah {
    /// Global verse number, 1..=6236 in a complete dataset.
    pub number: u32,
    pub text: String,
    pub surah: Surah,
    pub number_in_surah: u32,
    pub juz: u32,
    #[serde(default)]
    pub manzil: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub ruku: u32,
    #[serde(default)]
    pub hizb_quarter: u32,
    #[serde(default)]
    pub sajda: Sajda,
}

impl Ayah {
    /// `surah:ayah` reference, e.g. `2:255`.
    pub fn reference(&self) -> String {
        format!("{}:{}", self.surah.number, self.number_in_surah)
    }

    /// Link opening this verse in the Tanzil reader.
    pub fn tanzil_url(&self) -> String {
        format!("https://tanzil.net/#{}", self.reference())
    }
}

/// Start marker of a juz, page or similar division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JuzMarker {
    pub juz: u32,
    pub surah: u32,
    pub ayah: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMarker {
    pub page: u32,
    pub surah: u32,
    pub ayah: u32,
}

/// `{count, references}` section of the meta file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaSection<T> {
    pub count: u32,
    pub references: Vec<T>,
}

impl<T> Default for MetaSection<T> {
    fn default() -> Self {
        Self {
            count: 0,
            references: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AyahCount {
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuranMetaData {
    #[serde(default)]
    pub ayahs: AyahCount,
    pub surahs: MetaSection<Surah>,
    pub juzs: MetaSection<JuzMarker>,
    #[serde(default)]
    pub pages: MetaSection<PageMarker>,
}

/// Envelope of the chapter metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuranMeta {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub status: String,
    pub data: QuranMetaData,
}
