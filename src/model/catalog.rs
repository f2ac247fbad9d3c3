use serde::{Deserialize, Serialize};

use crate::model::entry::TsMessage;

fn default_version() -> String {
    "2.1".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

/// Documento TS completo: cabeçalho + mensagens em ordem de documento.
/// O agrupamento por contexto é reconstruído na serialização.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TsCatalog {
    #[serde(default = "default_version")]
    pub version: String,

    // Língua-alvo do catálogo (ex.: "pt_PT"). Determina a regra de plural.
    #[serde(default)]
    pub language: String,

    #[serde(default = "default_source_language", alias = "sourcelanguage")]
    pub source_language: String,

    #[serde(default)]
    pub messages: Vec<TsMessage>,
}

impl TsCatalog {
    pub fn new(language: impl Into<String>) -> Self {
        TsCatalog {
            version: default_version(),
            language: language.into(),
            source_language: default_source_language(),
            messages: Vec::new(),
        }
    }

    /// Nomes de contexto na ordem em que aparecem no documento.
    pub fn context_names(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for m in &self.messages {
            if !seen.contains(&m.context.as_str()) {
                seen.push(m.context.as_str());
            }
        }
        seen
    }
}
