//! Supported languages and their editor/wire identifiers.

use std::{fmt, str::FromStr};

/// The closed set of languages the runner accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    C,
    Cpp,
    Python,
    Java,
    #[default]
    Nodejs,
}

/// Syntax mode understood by the editor pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    C,
    Cpp,
    Python,
    Java,
    Javascript,
}

impl EditorMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EditorMode::C => "c",
            EditorMode::Cpp => "cpp",
            EditorMode::Python => "python",
            EditorMode::Java => "java",
            EditorMode::Javascript => "javascript",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language `{0}` (expected one of: c, cpp, python, java, nodejs)")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Selector order.
    pub const ALL: [Language; 5] = [
        Language::C,
        Language::Cpp,
        Language::Python,
        Language::Java,
        Language::Nodejs,
    ];

    pub fn mode(self) -> EditorMode {
        match self {
            Language::C => EditorMode::C,
            Language::Cpp => EditorMode::Cpp,
            Language::Python => EditorMode::Python,
            Language::Java => EditorMode::Java,
            Language::Nodejs => EditorMode::Javascript,
        }
    }

    /// Identifier sent to the runner in the `language` field.
    pub fn wire_id(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Python => "python",
            Language::Java => "java",
            Language::Nodejs => "nodejs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Nodejs => "Node.js",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    /// Next language in selector order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous language in selector order, wrapping around.
    pub fn prev(self) -> Self {
        let len = Self::ALL.len();
        Self::ALL[(self.position() + len - 1) % len]
    }
}

pub fn mode_for(language: Language) -> EditorMode {
    language.mode()
}

pub fn wire_id_for(language: Language) -> &'static str {
    language.wire_id()
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_id())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            "python" | "py" => Ok(Language::Python),
            "java" => Ok(Language::Java),
            "nodejs" | "node" | "js" | "javascript" => Ok(Language::Nodejs),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_mode_and_wire_id() {
        for lang in Language::ALL {
            assert!(!mode_for(lang).as_str().is_empty());
            assert!(!wire_id_for(lang).is_empty());
        }
    }

    #[test]
    fn test_nodejs_is_default_and_maps_to_javascript_mode() {
        assert_eq!(Language::default(), Language::Nodejs);
        assert_eq!(mode_for(Language::Nodejs), EditorMode::Javascript);
        assert_eq!(wire_id_for(Language::Nodejs), "nodejs");
    }

    #[test]
    fn test_wire_ids_parse_back() {
        for lang in Language::ALL {
            assert_eq!(lang.wire_id().parse::<Language>(), Ok(lang));
        }
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let err = "rust".parse::<Language>().unwrap_err();
        assert_eq!(err, UnknownLanguage("rust".into()));
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Language::Nodejs.next(), Language::C);
        assert_eq!(Language::C.prev(), Language::Nodejs);
        let mut lang = Language::Python;
        for _ in 0..Language::ALL.len() {
            lang = lang.next();
        }
        assert_eq!(lang, Language::Python);
    }
}
