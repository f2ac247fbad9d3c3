use serde::{Deserialize, Serialize};

fn default_ai_prompt_preset() -> String {
    "default".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub project_path: String,

    // Raiz da árvore de código da UI; os filename dos <location>
    // resolvem relativos a este diretório.
    #[serde(default, alias = "ui_root")]
    pub root_path: String,

    // Caminho do catálogo .ts do projeto.
    #[serde(default)]
    pub ts_path: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default, alias = "source_lang")]
    pub source_language: String,

    #[serde(default, alias = "target_lang")]
    pub target_language: String,

    #[serde(default = "default_ai_prompt_preset")]
    pub ai_prompt_preset: String,

    #[serde(default)]
    pub ai_custom_prompt_text: String,
}
