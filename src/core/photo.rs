//! 照片解析的後備階梯：付費搜尋 → 品種圖片 → 物種隨機圖 → 佔位圖。

use crate::core::normalizer::normalize;
use crate::core::resolvers::{BreedResolver, StepOutcome};
use crate::domain::model::{PhotoQuery, PhotoSource, ResolvedPhoto, Species};
use crate::domain::ports::PremiumImageSearch;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LadderStep {
    Premium,
    Breed { species: Species, candidate: String },
    Random(Species),
}

impl LadderStep {
    fn source(&self) -> PhotoSource {
        match self {
            LadderStep::Premium => PhotoSource::Premium,
            LadderStep::Breed { species, .. } => PhotoSource::Breed(*species),
            LadderStep::Random(species) => PhotoSource::Random(*species),
        }
    }
}

/// 查詢是否提到此物種：詞中有物種關鍵字，或原文含英文關鍵字
fn mentions(species: Species, tokens: &[String], lowered: &str) -> bool {
    tokens
        .iter()
        .any(|t| species.keywords().contains(&t.as_str()))
        || lowered.contains(species.keyword())
}

/// 依查詢內容決定要嘗試的步驟，順序即優先順序（不含最後的佔位圖）
pub fn plan_ladder(raw_text: &str, premium_enabled: bool) -> Vec<LadderStep> {
    let tokens = normalize(raw_text);
    let lowered = raw_text.to_lowercase();
    let mut steps = Vec::new();

    if premium_enabled {
        steps.push(LadderStep::Premium);
    }

    for species in Species::ALL {
        if !mentions(species, &tokens, &lowered) {
            continue;
        }

        let candidate = tokens
            .iter()
            .filter(|t| !species.keywords().contains(&t.as_str()))
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        if !candidate.is_empty() {
            steps.push(LadderStep::Breed { species, candidate });
        }
        steps.push(LadderStep::Random(species));
    }

    steps
}

pub fn placeholder_url(base: &str, raw_text: &str) -> String {
    let text = if raw_text.is_empty() { "Pet" } else { raw_text };
    format!("{}&text={}", base, urlencoding::encode(text))
}

pub struct PhotoResolver {
    breeds: Arc<BreedResolver>,
    premium: Option<Arc<dyn PremiumImageSearch>>,
    placeholder_base: String,
}

impl PhotoResolver {
    pub fn new(
        breeds: Arc<BreedResolver>,
        premium: Option<Arc<dyn PremiumImageSearch>>,
        placeholder_base: &str,
    ) -> Self {
        Self {
            breeds,
            premium,
            placeholder_base: placeholder_base.to_string(),
        }
    }

    async fn run_step(&self, step: &LadderStep, query: &PhotoQuery) -> StepOutcome {
        match step {
            LadderStep::Premium => {
                let Some(premium) = &self.premium else {
                    return StepOutcome::NoMatch;
                };
                match premium.search(&query.raw_text).await {
                    Ok(Some(url)) => StepOutcome::Found(url),
                    Ok(None) => StepOutcome::NoMatch,
                    Err(e) => StepOutcome::Failed(e.to_string()),
                }
            }
            LadderStep::Breed { species, candidate } => {
                self.breeds.resolve_breed_image(*species, candidate).await
            }
            LadderStep::Random(species) => self.breeds.random_image(*species).await,
        }
    }

    /// 永遠回傳非空 URL
    pub async fn resolve(&self, query: &PhotoQuery) -> ResolvedPhoto {
        let steps = plan_ladder(&query.raw_text, self.premium.is_some());

        for step in &steps {
            match self.run_step(step, query).await {
                StepOutcome::Found(url) => {
                    tracing::info!("📸 '{}' resolved via {:?}", query.raw_text, step);
                    return ResolvedPhoto {
                        url,
                        source: step.source(),
                    };
                }
                StepOutcome::NoMatch => {
                    tracing::debug!("📸 {:?} had no match for '{}'", step, query.raw_text);
                }
                StepOutcome::Failed(reason) => {
                    tracing::warn!("📸 {:?} failed for '{}': {}", step, query.raw_text, reason);
                }
            }
        }

        tracing::info!("📸 '{}' fell back to placeholder", query.raw_text);
        ResolvedPhoto {
            url: placeholder_url(&self.placeholder_base, &query.raw_text),
            source: PhotoSource::Placeholder,
        }
    }
}
