//! 將自由文字切成小寫英文詞，所有比對都建立在這上面。

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static NON_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z]+").expect("non-letter pattern is valid"));

/// 將常見拉丁重音字母折回基本字母；其他字元原樣保留（之後會被當作分隔符）
fn fold_char(c: char, out: &mut String) {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => {
            out.push(c);
            return;
        }
    };
    out.push_str(folded);
}

pub fn normalize(text: &str) -> Vec<String> {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        fold_char(c, &mut folded);
    }

    NON_LETTERS
        .replace_all(&folded, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

pub fn token_set(tokens: &[String]) -> HashSet<&str> {
    tokens.iter().map(String::as_str).collect()
}

/// `required` 的每個詞都出現在 `tokens` 中
pub fn contains_all<S: AsRef<str>>(tokens: &HashSet<&str>, required: &[S]) -> bool {
    required.iter().all(|t| tokens.contains(t.as_ref()))
}
