//! Source language lookups: file extension to language, and language to the
//! naming suffix of its generated test files.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CodemakerError, Unsupported};

/// Languages the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Language {
    Java,
    #[serde(rename = "JAVASCRIPT")]
    JavaScript,
    Kotlin,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "JAVA",
            Language::JavaScript => "JAVASCRIPT",
            Language::Kotlin => "KOTLIN",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Extensions include the leading dot and are matched case-sensitively.
const EXTENSIONS: &[(&str, Language)] = &[(".java", Language::Java), (".js", Language::JavaScript)];

const TEST_SUFFIXES: &[(Language, &str)] = &[
    (Language::Java, "Test.java"),
    (Language::JavaScript, "_test.js"),
];

/// Maps an extension such as `.java` to its language.
pub fn resolve(extension: &str) -> Result<Language, CodemakerError> {
    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|&(_, lang)| lang)
        .ok_or_else(|| CodemakerError::UnsupportedLanguage(Unsupported::Extension(extension.to_string())))
}

/// Resolves the language of `path` from its extension.
pub fn resolve_path(path: &Path) -> Result<Language, CodemakerError> {
    resolve(&extension_of(path))
}

/// Suffix that replaces the source extension when naming a generated test file.
pub fn test_suffix(language: Language) -> Result<&'static str, CodemakerError> {
    TEST_SUFFIXES
        .iter()
        .find(|(lang, _)| *lang == language)
        .map(|&(_, suffix)| suffix)
        .ok_or_else(|| CodemakerError::UnsupportedLanguage(Unsupported::Language(language)))
}

/// The extension of `path` with its leading dot, or an empty string.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
