use crate::core::catalog::BreedCatalogCache;
use crate::core::normalizer::{contains_all, normalize, token_set};
use crate::core::translator::{dog_breed_paths, BreedTranslator, RuleList};
use crate::domain::model::{CatalogEntry, Species};
use crate::domain::ports::BreedImageProvider;
use std::collections::HashSet;
use std::sync::Arc;

/// 階梯中每一步的結果。`NoMatch` 與 `Failed` 都會讓階梯往下走，
/// 分開只是為了日誌能看出是「沒對到品種」還是「上游壞了」。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Found(String),
    NoMatch,
    Failed(String),
}

impl StepOutcome {
    pub fn into_url(self) -> Option<String> {
        match self {
            StepOutcome::Found(url) => Some(url),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, StepOutcome::Found(_))
    }
}

/// 逐一嘗試的圖片請求，記住最後一個錯誤
struct Attempts {
    tried: usize,
    last_error: Option<String>,
}

impl Attempts {
    fn new() -> Self {
        Self {
            tried: 0,
            last_error: None,
        }
    }

    async fn try_key(&mut self, provider: &dyn BreedImageProvider, key: &str) -> Option<String> {
        self.tried += 1;
        match provider.image_for(key).await {
            Ok(Some(url)) => Some(url),
            Ok(None) => {
                tracing::debug!("🖼️ {} image '{}' returned no url", provider.species(), key);
                None
            }
            Err(e) => {
                tracing::debug!("🖼️ {} image '{}' failed: {}", provider.species(), key, e);
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    fn finish(self) -> StepOutcome {
        match self.last_error {
            Some(error) => StepOutcome::Failed(error),
            None => StepOutcome::NoMatch,
        }
    }
}

pub struct BreedResolver {
    catalogs: Arc<BreedCatalogCache>,
    translator: Arc<BreedTranslator>,
    dog_paths: RuleList<&'static str>,
}

impl BreedResolver {
    pub fn new(catalogs: Arc<BreedCatalogCache>, translator: Arc<BreedTranslator>) -> Self {
        Self {
            catalogs,
            translator,
            dog_paths: dog_breed_paths(),
        }
    }

    pub async fn resolve_breed_image(&self, species: Species, breed_text: &str) -> StepOutcome {
        match species {
            Species::Dog => self.resolve_dog(breed_text).await,
            Species::Cat => self.resolve_cat(breed_text).await,
        }
    }

    /// 原始詞加上翻譯後英文名稱的詞
    fn match_tokens(&self, species: Species, breed_text: &str) -> Vec<String> {
        let mut tokens = normalize(breed_text);
        if let Some(canonical) = self.translator.canonical(species, breed_text) {
            tokens.extend(normalize(canonical));
        }
        tokens
    }

    async fn resolve_dog(&self, breed_text: &str) -> StepOutcome {
        let provider = self.catalogs.provider(Species::Dog).clone();
        let mut attempts = Attempts::new();

        let tokens = normalize(breed_text);
        if let Some(path) = self.dog_paths.first_match(&tokens) {
            tracing::debug!("🐶 Explicit breed path '{}' for '{}'", path, breed_text);
            if let Some(url) = attempts.try_key(provider.as_ref(), path).await {
                return StepOutcome::Found(url);
            }
        }

        let catalog = self.catalogs.get_catalog(Species::Dog).await;
        let match_tokens = self.match_tokens(Species::Dog, breed_text);
        let present = token_set(&match_tokens);

        for entry in catalog.entries.iter().filter(|e| is_present(e, &present, None)) {
            for sub in entry.sub_breeds.iter().filter(|s| present.contains(s.as_str())) {
                let key = format!("{}/{}", entry.name, sub);
                if let Some(url) = attempts.try_key(provider.as_ref(), &key).await {
                    return StepOutcome::Found(url);
                }
            }
            if let Some(url) = attempts.try_key(provider.as_ref(), &entry.name).await {
                return StepOutcome::Found(url);
            }
        }

        attempts.finish()
    }

    async fn resolve_cat(&self, breed_text: &str) -> StepOutcome {
        let provider = self.catalogs.provider(Species::Cat).clone();
        let mut attempts = Attempts::new();

        let catalog = self.catalogs.get_catalog(Species::Cat).await;
        let keyword = Some(Species::Cat.keyword());

        // 先用翻譯後的英文名稱比對，再用原始文字
        let mut candidates: Vec<&CatalogEntry> = Vec::new();
        if let Some(canonical) = self.translator.canonical(Species::Cat, breed_text) {
            let canonical_tokens = normalize(canonical);
            let present = token_set(&canonical_tokens);
            candidates.extend(catalog.entries.iter().filter(|e| is_present(e, &present, keyword)));
        }
        let raw_tokens = normalize(breed_text);
        let present = token_set(&raw_tokens);
        for entry in catalog.entries.iter().filter(|e| is_present(e, &present, keyword)) {
            if !candidates.iter().any(|c| c.name == entry.name) {
                candidates.push(entry);
            }
        }

        for entry in candidates {
            let Some(id) = entry.provider_id.as_deref() else {
                continue;
            };
            if let Some(url) = attempts.try_key(provider.as_ref(), id).await {
                return StepOutcome::Found(url);
            }
        }

        attempts.finish()
    }

    pub async fn random_image(&self, species: Species) -> StepOutcome {
        match self.catalogs.provider(species).random_image().await {
            Ok(Some(url)) => StepOutcome::Found(url),
            Ok(None) => StepOutcome::NoMatch,
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }
}

/// 目錄項目的名稱詞是否都出現在輸入中；`ignore` 用來略過物種關鍵字本身
fn is_present(entry: &CatalogEntry, present: &HashSet<&str>, ignore: Option<&str>) -> bool {
    let required: Vec<&str> = entry
        .tokens
        .iter()
        .map(String::as_str)
        .filter(|t| Some(*t) != ignore)
        .collect();
    !required.is_empty() && contains_all(present, &required)
}
