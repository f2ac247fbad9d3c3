use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::catalog::TsCatalog;
use crate::model::entry::{MessageStatus, TsMessage};
use crate::services::plural;

#[derive(Debug, Serialize, Deserialize)]
pub struct QaIssue {
    pub message_id: String,
    pub code: String,
    pub message: String,
}

fn issue(m: &TsMessage, code: &str, message: impl Into<String>) -> QaIssue {
    QaIssue {
        message_id: m.message_id.clone(),
        code: code.to_string(),
        message: message.into(),
    }
}

// Marcadores de argumento do Qt: %1..%99 e o marcador de quantidade %n/%Ln.
fn placeholders(re: &Regex, text: &str) -> HashSet<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

// Acelerador de teclado: '&' seguido de alfanumérico ("&& " é '&' literal).
fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            match chars.peek() {
                Some('&') => {
                    chars.next();
                }
                Some(next) if next.is_alphanumeric() => return true,
                _ => {}
            }
        }
    }
    false
}

pub fn run(catalog: &TsCatalog) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    let placeholder_re = Regex::new(r"%L?n|%\d{1,2}").unwrap();
    let required_forms = plural::form_count(&catalog.language);

    let mut seen: HashSet<(String, String, Option<String>)> = HashSet::new();

    for m in &catalog.messages {
        // Entradas históricas não contam para QA.
        if !m.is_active() {
            continue;
        }

        if !seen.insert(m.key()) {
            issues.push(issue(
                m,
                "DUPLICATE_MESSAGE",
                "Chave (contexto, source, comentário) duplicada no catálogo",
            ));
        }

        let source_trim = m.source.trim();
        let translation_trim = m.translation.trim();

        if m.numerus {
            if m.plural_forms.len() != required_forms {
                issues.push(issue(
                    m,
                    "PLURAL_FORM_COUNT_MISMATCH",
                    format!(
                        "Mensagem numerus com {} forma(s); '{}' exige {}",
                        m.plural_forms.len(),
                        catalog.language,
                        required_forms
                    ),
                ));
            }

            // %1..%99 têm de sobreviver em todas as formas preenchidas;
            // %n pode legitimamente desaparecer ("um dia").
            let args: Vec<String> = placeholders(&placeholder_re, &m.source)
                .into_iter()
                .filter(|p| p.starts_with('%') && p[1..].chars().all(|c| c.is_ascii_digit()))
                .collect();

            for (i, form) in m.plural_forms.iter().enumerate() {
                if form.trim().is_empty() {
                    continue;
                }
                for arg in &args {
                    if !form.contains(arg.as_str()) {
                        issues.push(issue(
                            m,
                            "PLACEHOLDER_MISMATCH",
                            format!("Forma plural {} perdeu o marcador {}", i, arg),
                        ));
                    }
                }
            }

            if m.status == MessageStatus::Finished
                && (m.plural_forms.is_empty()
                    || m.plural_forms.iter().any(|f| f.trim().is_empty()))
            {
                issues.push(issue(
                    m,
                    "STATUS_FINISHED_BUT_EMPTY",
                    "Status indica terminado, mas há forma plural vazia",
                ));
            }
        } else {
            if !m.plural_forms.is_empty() {
                issues.push(issue(
                    m,
                    "NOT_NUMERUS_WITH_FORMS",
                    "Formas plurais numa mensagem sem numerus=\"yes\"",
                ));
            }

            if m.status == MessageStatus::Finished && translation_trim.is_empty() {
                issues.push(issue(
                    m,
                    "STATUS_FINISHED_BUT_EMPTY",
                    "Status indica terminado, mas tradução está vazia",
                ));
            }

            if !translation_trim.is_empty() && translation_trim == source_trim {
                issues.push(issue(
                    m,
                    "SAME_AS_SOURCE",
                    "Tradução é idêntica ao texto de origem",
                ));
            }

            if !translation_trim.is_empty() {
                let src = placeholders(&placeholder_re, &m.source);
                let dst = placeholders(&placeholder_re, &m.translation);
                let mut missing: Vec<&String> = src.difference(&dst).collect();
                missing.sort();
                for p in missing {
                    issues.push(issue(
                        m,
                        "PLACEHOLDER_MISMATCH",
                        format!("Marcador {} da origem não aparece na tradução", p),
                    ));
                }

                if has_accelerator(&m.source) != has_accelerator(&m.translation) {
                    issues.push(issue(
                        m,
                        "ACCELERATOR_MISMATCH",
                        "Acelerador '&' presente só num dos lados",
                    ));
                }
            }
        }
    }

    issues
}
