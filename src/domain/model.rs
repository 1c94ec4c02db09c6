use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Dog, Species::Cat];

    /// 上游供應商使用的英文關鍵字
    pub fn keyword(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }

    /// 查詢字串中代表此物種的詞（含法文）
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Species::Dog => &["dog", "dogs", "puppy", "chien", "chiens", "chiot"],
            Species::Cat => &["cat", "cats", "kitten", "chat", "chats", "chaton"],
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dog" | "dogs" | "chien" => Ok(Species::Dog),
            "cat" | "cats" | "chat" => Ok(Species::Cat),
            other => Err(format!("unsupported species: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && self.expires_at > now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub tokens: Vec<String>,
    /// 只有狗的目錄會有子品種
    pub sub_breeds: Vec<String>,
    /// 貓的目錄以供應商 id 取圖
    pub provider_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreedCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl BreedCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoQuery {
    pub raw_text: String,
}

impl PhotoQuery {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoSource {
    Premium,
    Breed(Species),
    Random(Species),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPhoto {
    pub url: String,
    #[serde(skip)]
    pub source: PhotoSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdoptionSearchParams {
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub species_type: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
    pub age: Option<String>,
    pub breed: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moment {
    pub id: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub photo: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub moments: Vec<Moment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub story: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetUpdate {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub species: Option<String>,
    pub birthday: Option<String>,
    pub avatar: Option<String>,
    pub story: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMoment {
    pub text: Option<String>,
    pub photo: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}
