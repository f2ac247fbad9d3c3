use serde::{Deserialize, Serialize};

/// Referência ao ponto do código-fonte da UI de onde a string foi extraída.
/// Metadado de tooling: não participa do lookup em runtime.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    pub filename: String,

    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TsMessage {
    pub message_id: String,

    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub source: String,

    // Comentário de desambiguação: faz parte da chave de identidade
    // quando presente (mesmo source dentro do mesmo contexto).
    #[serde(default)]
    pub comment: Option<String>,

    // Nota do extrator para o tradutor (não entra na chave).
    #[serde(default)]
    pub extracomment: Option<String>,

    #[serde(default)]
    pub translatorcomment: Option<String>,

    #[serde(default)]
    pub translation: String,

    #[serde(default)]
    pub numerus: bool,

    // Formas plurais, na ordem exigida pela regra da língua-alvo.
    // Só usado quando numerus == true.
    #[serde(default)]
    pub plural_forms: Vec<String>,

    #[serde(default)]
    pub status: MessageStatus,

    #[serde(default)]
    pub locations: Vec<Location>,
}

impl TsMessage {
    /// Chave de identidade (context, source, comment).
    pub fn key(&self) -> (String, String, Option<String>) {
        (
            self.context.clone(),
            self.source.clone(),
            self.comment.clone(),
        )
    }

    /// Entradas vanished/obsolete ficam no catálogo só como histórico:
    /// não são candidatas a lookup nem a tradução automática.
    pub fn is_active(&self) -> bool {
        !matches!(
            self.status,
            MessageStatus::Vanished | MessageStatus::Obsolete
        )
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Unfinished,
    Finished,
    Vanished,
    Obsolete,
}

impl Default for MessageStatus {
    fn default() -> Self {
        MessageStatus::Unfinished
    }
}

impl MessageStatus {
    /// Valor do atributo `type` do elemento `<translation>`.
    /// Finished é a ausência do atributo.
    pub fn ts_type(&self) -> Option<&'static str> {
        match self {
            MessageStatus::Finished => None,
            MessageStatus::Unfinished => Some("unfinished"),
            MessageStatus::Vanished => Some("vanished"),
            MessageStatus::Obsolete => Some("obsolete"),
        }
    }

    pub fn from_ts_type(value: &str) -> MessageStatus {
        match value {
            "vanished" => MessageStatus::Vanished,
            "obsolete" => MessageStatus::Obsolete,
            // "unfinished" e qualquer valor desconhecido: trata como
            // não terminado, nunca promove a Finished.
            _ => MessageStatus::Unfinished,
        }
    }
}
