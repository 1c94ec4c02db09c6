//! 法文品種名稱 → 上游供應商使用的英文名稱。
//!
//! 規則表依優先順序排列，第一個所有必要詞都出現的規則勝出，
//! 所以較長、較具體的詞組必須排在較短的重疊詞組之前。

use crate::core::normalizer::{contains_all, normalize, token_set};
use crate::domain::model::Species;
use regex::Regex;
use std::sync::LazyLock;

static CANONICAL_LOOKING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s.\-]+$").expect("canonical pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRule<T> {
    pub required_tokens: Vec<&'static str>,
    pub target: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleList<T> {
    rules: Vec<TranslationRule<T>>,
}

/// `rule_list![["a", "b"] => x, ["a"] => y]`，順序即優先順序
macro_rules! rule_list {
    ($([$($token:expr),+ $(,)?] => $target:expr),* $(,)?) => {
        RuleList::new(vec![
            $(TranslationRule {
                required_tokens: vec![$($token),+],
                target: $target,
            }),*
        ])
    };
}

impl<T> RuleList<T> {
    pub fn new(rules: Vec<TranslationRule<T>>) -> Self {
        Self { rules }
    }

    pub fn first_match(&self, tokens: &[String]) -> Option<&T> {
        let set = token_set(tokens);
        self.rules
            .iter()
            .find(|rule| contains_all(&set, &rule.required_tokens))
            .map(|rule| &rule.target)
    }

    /// 回傳命中的規則位置，方便測試與除錯
    pub fn position(&self, tokens: &[String]) -> Option<usize> {
        let set = token_set(tokens);
        self.rules
            .iter()
            .position(|rule| contains_all(&set, &rule.required_tokens))
    }
}

fn dog_names() -> RuleList<&'static str> {
    rule_list![
        ["bouledogue", "francais"] => "French Bulldog",
        ["bouledogue", "anglais"] => "English Bulldog",
        ["bouledogue", "americain"] => "American Bulldog",
        ["bouledogue"] => "Bulldog",
        ["berger", "allemand"] => "German Shepherd Dog",
        ["berger", "australien"] => "Australian Shepherd",
        ["berger", "belge"] => "Belgian Shepherd / Malinois",
        ["berger", "blanc", "suisse"] => "White German Shepherd",
        ["bouvier", "bernois"] => "Bernese Mountain Dog",
        ["epagneul", "breton"] => "Brittany Spaniel",
        ["dogue", "allemand"] => "Great Dane",
        ["dogue", "bordeaux"] => "Dogue de Bordeaux",
        ["saint", "bernard"] => "Saint Bernard",
        ["levrier", "afghan"] => "Afghan Hound",
        ["levrier"] => "Greyhound",
        ["caniche"] => "Poodle",
        ["teckel"] => "Dachshund",
        ["carlin"] => "Pug",
        ["bichon", "maltais"] => "Maltese",
        ["bichon"] => "Bichon Frise",
        ["golden"] => "Golden Retriever",
        ["labrador"] => "Labrador Retriever",
        ["colley"] => "Collie",
        ["loup", "saarloos"] => "Saarloos Wolfdog",
        ["chien", "loup"] => "Czechoslovakian Wolfdog",
        ["loup", "tchecoslovaque"] => "Czechoslovakian Wolfdog",
    ]
}

fn cat_names() -> RuleList<&'static str> {
    rule_list![
        ["sacre", "birmanie"] => "Birman",
        ["bleu", "russe"] => "Russian Blue",
        ["angora", "turc"] => "Turkish Angora",
        ["van", "turc"] => "Turkish Van",
        ["mau", "egyptien"] => "Egyptian Mau",
        ["foret", "norvegienne"] => "Norwegian Forest Cat",
        ["norvegien"] => "Norwegian Forest Cat",
        ["oreilles", "pliees"] => "Scottish Fold",
        ["ecossais"] => "Scottish Fold",
        ["devon", "rex"] => "Devon Rex",
        ["cornish", "rex"] => "Cornish Rex",
        ["exotique"] => "Exotic Shorthair",
        ["anglais"] => "British Shorthair",
        ["persan"] => "Persian",
        ["siamois"] => "Siamese",
        ["siberien"] => "Siberian",
        ["abyssin"] => "Abyssinian",
        ["chartreux"] => "Chartreux",
        ["bengale"] => "Bengal",
        ["sphinx"] => "Sphynx",
    ]
}

/// 直接對應到 Dog CEO 的 `breed[/sub]` 路徑，省去查目錄
pub fn dog_breed_paths() -> RuleList<&'static str> {
    rule_list![
        ["bouledogue", "francais"] => "bulldog/french",
        ["bouledogue", "anglais"] => "bulldog/english",
        ["bouledogue"] => "bulldog",
        ["berger", "allemand"] => "germanshepherd",
        ["berger", "australien"] => "australian/shepherd",
        ["berger", "belge"] => "malinois",
        ["bouvier", "bernois"] => "mountain/bernese",
        ["epagneul", "breton"] => "brittany",
        ["dogue", "allemand"] => "dane/great",
        ["saint", "bernard"] => "stbernard",
        ["levrier", "afghan"] => "hound/afghan",
        ["levrier"] => "greyhound",
        ["caniche", "nain"] => "poodle/miniature",
        ["caniche", "toy"] => "poodle/toy",
        ["caniche"] => "poodle",
        ["teckel"] => "dachshund",
        ["carlin"] => "pug",
        ["bichon", "maltais"] => "maltese",
        ["bichon"] => "frise/bichon",
        ["golden", "retriever"] => "retriever/golden",
        ["yorkshire"] => "terrier/yorkshire",
        ["jack", "russell"] => "terrier/russell",
        ["border", "collie"] => "collie/border",
        ["cocker"] => "spaniel/cocker",
    ]
}

#[derive(Debug, Clone)]
pub struct BreedTranslator {
    dog: RuleList<&'static str>,
    cat: RuleList<&'static str>,
}

impl Default for BreedTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl BreedTranslator {
    pub fn new() -> Self {
        Self::with_rules(dog_names(), cat_names())
    }

    pub fn with_rules(dog: RuleList<&'static str>, cat: RuleList<&'static str>) -> Self {
        Self { dog, cat }
    }

    fn rules_for(&self, species: Species) -> &RuleList<&'static str> {
        match species {
            Species::Dog => &self.dog,
            Species::Cat => &self.cat,
        }
    }

    pub fn canonical(&self, species: Species, text: &str) -> Option<&'static str> {
        let tokens = normalize(text);
        self.rules_for(species).first_match(&tokens).copied()
    }

    /// 盡力翻譯，永遠不會失敗
    pub fn translate(&self, species: Species, text: &str) -> String {
        if let Some(name) = self.canonical(species, text) {
            tracing::debug!("🔤 Translated {} breed '{}' -> '{}'", species, text, name);
            return name.to_string();
        }

        if CANONICAL_LOOKING.is_match(text) {
            return text.to_string();
        }

        text.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specific_phrase_wins_over_bare_breed() {
        let translator = BreedTranslator::new();
        assert_eq!(
            translator.translate(Species::Dog, "Bouledogue Français"),
            "French Bulldog"
        );
        assert_eq!(translator.translate(Species::Dog, "bouledogue"), "Bulldog");
    }

    #[test]
    fn rule_order_is_significant() {
        let reordered = rule_list![
            ["bouledogue"] => "Bulldog",
            ["bouledogue", "francais"] => "French Bulldog",
        ];
        let translator = BreedTranslator::with_rules(reordered, cat_names());
        assert_eq!(
            translator.translate(Species::Dog, "Bouledogue Français"),
            "Bulldog"
        );

        let tokens = normalize("Bouledogue Français");
        assert_eq!(dog_names().position(&tokens), Some(0));
    }

    #[test]
    fn translation_is_scoped_per_species() {
        let translator = BreedTranslator::new();
        assert_eq!(translator.translate(Species::Cat, "Persan"), "Persian");
        assert_eq!(translator.translate(Species::Dog, "Persan"), "Persan");
        assert_eq!(
            translator.translate(Species::Cat, "chat de la forêt norvégienne"),
            "Norwegian Forest Cat"
        );
    }

    #[test]
    fn english_breed_names_are_not_rewritten() {
        let translator = BreedTranslator::new();
        assert_eq!(
            translator.translate(Species::Cat, "Scottish Straight"),
            "Scottish Straight"
        );
        assert_eq!(translator.canonical(Species::Cat, "Scottish Straight"), None);
        assert_eq!(
            translator.translate(Species::Cat, "chat écossais à oreilles pliées"),
            "Scottish Fold"
        );
    }

    #[test]
    fn wolfdogs_map_to_wolfdog_breeds() {
        let translator = BreedTranslator::new();
        assert_eq!(
            translator.translate(Species::Dog, "Chien-loup tchécoslovaque"),
            "Czechoslovakian Wolfdog"
        );
        assert_eq!(
            translator.translate(Species::Dog, "chien-loup de Saarloos"),
            "Saarloos Wolfdog"
        );
        assert_eq!(
            translator.translate(Species::Dog, "loup tchécoslovaque"),
            "Czechoslovakian Wolfdog"
        );
    }

    #[test]
    fn ascii_input_passes_through_unchanged() {
        let translator = BreedTranslator::new();
        assert_eq!(
            translator.translate(Species::Dog, "Shiba Inu "),
            "Shiba Inu "
        );
        assert_eq!(
            translator.translate(Species::Dog, "St. Bernard-Mix"),
            "St. Bernard-Mix"
        );
    }

    #[test]
    fn other_input_is_trimmed() {
        let translator = BreedTranslator::new();
        assert_eq!(translator.translate(Species::Cat, "  Ragdoll #2 "), "Ragdoll #2");
        assert_eq!(translator.translate(Species::Dog, " 柴犬 "), "柴犬");
    }

    #[test]
    fn dog_paths_prefer_sub_breeds() {
        let paths = dog_breed_paths();
        assert_eq!(
            paths.first_match(&normalize("bouledogue francais")),
            Some(&"bulldog/french")
        );
        assert_eq!(paths.first_match(&normalize("caniche nain")), Some(&"poodle/miniature"));
        assert_eq!(paths.first_match(&normalize("beagle")), None);
    }
}
