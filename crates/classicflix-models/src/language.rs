use serde::{Deserialize, Serialize};

/// UI language; selects which localized title/description is shown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppLanguage {
    En,
    #[default]
    Pt,
    It,
    Hi,
    Ru,
}

impl AppLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            AppLanguage::En => "en",
            AppLanguage::Pt => "pt",
            AppLanguage::It => "it",
            AppLanguage::Hi => "hi",
            AppLanguage::Ru => "ru",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(AppLanguage::En),
            "pt" | "pt-br" => Some(AppLanguage::Pt),
            "it" => Some(AppLanguage::It),
            "hi" => Some(AppLanguage::Hi),
            "ru" => Some(AppLanguage::Ru),
            _ => None,
        }
    }
}
