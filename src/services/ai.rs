use crate::model::entry::{MessageStatus, TsMessage};
use crate::services::ai_types::{AiItemResult, AiRunReport};
use crate::services::plural;

use rand::{thread_rng, Rng};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::json;

use std::{thread, time::Duration};

pub struct AiConfig<'a> {
    pub provider: &'a str,
    pub api_key: &'a str,
    pub model: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

const MAX_RETRIES: usize = 3;
const BASE_DELAY_MS: u64 = 800;
const TIMEOUT_SECS: u64 = 60;

fn backoff(attempt: usize) -> Duration {
    let jitter: u64 = thread_rng().gen_range(0..200);
    let ms = BASE_DELAY_MS * (2_u64.pow(attempt as u32)) + jitter;
    Duration::from_millis(ms)
}

fn endpoint_for(provider: &str) -> Result<&'static str, String> {
    match provider {
        "openai" => Ok("https://api.openai.com/v1/chat/completions"),
        "deepseek" => Ok("https://api.deepseek.com/v1/chat/completions"),
        _ => Err("Unsupported provider".into()),
    }
}

/// Traduz as mensagens por terminar do catálogo via chat-completions.
/// Mensagens numerus geram um pedido por forma plural da língua-alvo.
pub fn translate_entries(entries: &mut [TsMessage], cfg: AiConfig) -> Result<AiRunReport, String> {
    let client = Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| e.to_string())?;

    let endpoint = endpoint_for(cfg.provider)?;

    let mut report = AiRunReport {
        succeeded: 0,
        failed: 0,
        items: Vec::new(),
    };

    for e in entries.iter_mut() {
        if !e.is_active() || e.status != MessageStatus::Unfinished {
            continue;
        }

        let outcome = if e.numerus {
            translate_numerus(&client, endpoint, e, &cfg)
        } else {
            translate_single(&client, endpoint, e, &cfg)
        };

        match outcome {
            Ok(()) => {
                e.status = MessageStatus::Finished;
                report.succeeded += 1;
                report.items.push(AiItemResult {
                    message_id: e.message_id.clone(),
                    ok: true,
                    error: None,
                });
            }
            Err(err) => {
                report.failed += 1;
                report.items.push(AiItemResult {
                    message_id: e.message_id.clone(),
                    ok: false,
                    error: Some(err),
                });
            }
        }
    }

    Ok(report)
}

fn translate_single(
    client: &Client,
    endpoint: &str,
    e: &mut TsMessage,
    cfg: &AiConfig,
) -> Result<(), String> {
    let prompt = build_prompt(e, cfg, None);
    let text = request_completion(client, endpoint, cfg, &prompt)?;

    if text.trim().is_empty() {
        return Err("AI returned an empty translation".into());
    }

    e.translation = text.trim().to_string();
    Ok(())
}

fn translate_numerus(
    client: &Client,
    endpoint: &str,
    e: &mut TsMessage,
    cfg: &AiConfig,
) -> Result<(), String> {
    let count = plural::form_count(cfg.target_lang);
    let mut forms: Vec<String> = Vec::with_capacity(count);

    for idx in 0..count {
        let prompt = build_prompt(e, cfg, Some(idx));
        let text = request_completion(client, endpoint, cfg, &prompt)?;

        let text = text.trim();
        if text.is_empty() {
            return Err(format!("AI returned an empty plural form (index {idx})"));
        }
        forms.push(text.to_string());
    }

    e.plural_forms = forms;
    Ok(())
}

// Um pedido com retry + backoff exponencial; devolve o texto da resposta.
fn request_completion(
    client: &Client,
    endpoint: &str,
    cfg: &AiConfig,
    prompt: &str,
) -> Result<String, String> {
    let body = json!({
        "model": cfg.model,
        "messages": [
            { "role": "system", "content": "You are a professional translator of desktop application user interfaces." },
            { "role": "user", "content": prompt }
        ],
        "temperature": 0.3
    });

    let mut last_err: Option<String> = None;

    for attempt in 0..MAX_RETRIES {
        let res = client
            .post(endpoint)
            .bearer_auth(cfg.api_key)
            .json(&body)
            .send();

        match res {
            Ok(resp) => {
                let status = resp.status();

                // Lê como texto primeiro para não perder a mensagem de
                // erro quando o corpo não é JSON.
                let text = match resp.text() {
                    Ok(t) => t,
                    Err(err) => {
                        last_err = Some(err.to_string());
                        thread::sleep(backoff(attempt));
                        continue;
                    }
                };

                if !status.is_success() {
                    last_err = Some(extract_error_message(status, &text));
                    if should_retry_http(status) && attempt + 1 < MAX_RETRIES {
                        thread::sleep(backoff(attempt));
                        continue;
                    }
                    break;
                }

                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(v) => {
                        if let Some(t) = v
                            .get("choices")
                            .and_then(|c| c.get(0))
                            .and_then(|c| c.get("message"))
                            .and_then(|m| m.get("content"))
                            .and_then(|c| c.as_str())
                        {
                            return Ok(t.to_string());
                        }
                        last_err = Some(
                            "Invalid AI response: missing choices[0].message.content".into(),
                        );
                        if attempt + 1 < MAX_RETRIES {
                            thread::sleep(backoff(attempt));
                            continue;
                        }
                    }
                    Err(_) => {
                        last_err = Some("Invalid JSON from AI".into());
                        if attempt + 1 < MAX_RETRIES {
                            thread::sleep(backoff(attempt));
                            continue;
                        }
                    }
                }
            }
            Err(err) => {
                last_err = Some(err.to_string());
                if attempt + 1 < MAX_RETRIES {
                    thread::sleep(backoff(attempt));
                    continue;
                }
            }
        }
    }

    Err(last_err.unwrap_or_else(|| "AI request failed".into()))
}

fn should_retry_http(status: StatusCode) -> bool {
    // 408/429/5xx tipicamente são temporários
    status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error()
}

fn extract_error_message(status: StatusCode, body_text: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body_text) {
        if let Some(msg) = v
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
        if let Some(msg) = v.get("message").and_then(|m| m.as_str()) {
            return format!("HTTP {}: {}", status.as_u16(), msg);
        }
    }

    let trimmed = body_text.trim();
    let snippet = if trimmed.len() > 400 {
        format!("{}...", &trimmed[..400])
    } else {
        trimmed.to_string()
    };

    format!("HTTP {}: {}", status.as_u16(), snippet)
}

fn build_prompt(entry: &TsMessage, cfg: &AiConfig, plural_idx: Option<usize>) -> String {
    let mut p = String::new();

    p.push_str(&format!(
        "Translate this desktop application UI string from {} to {}.\n",
        cfg.source_lang, cfg.target_lang
    ));

    if !entry.context.trim().is_empty() {
        p.push_str(&format!("UI component: {}\n", entry.context.trim()));
    }

    if let Some(comment) = &entry.comment {
        if !comment.trim().is_empty() {
            p.push_str(&format!("Disambiguation: {}\n", comment.trim()));
        }
    }

    if let Some(extra) = &entry.extracomment {
        if !extra.trim().is_empty() {
            p.push_str(&format!("Developer note: {}\n", extra.trim()));
        }
    }

    if let Some(idx) = plural_idx {
        p.push_str(&format!(
            "Grammatical number: {}. The %n (or %Ln) placeholder stands for the count and must be kept.\n",
            plural::form_hint(cfg.target_lang, idx)
        ));
    }

    p.push_str(
        "Keep placeholders like %1, %2 and &accelerators exactly as in the original. Reply with the translation only.\n",
    );

    p.push_str("Text:\n");
    p.push_str(entry.source.trim());

    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(source: &str, numerus: bool) -> TsMessage {
        TsMessage {
            message_id: "Formatter:0".into(),
            context: "Formatter".into(),
            source: source.into(),
            comment: None,
            extracomment: None,
            translatorcomment: None,
            translation: String::new(),
            numerus,
            plural_forms: Vec::new(),
            status: MessageStatus::Unfinished,
            locations: Vec::new(),
        }
    }

    #[test]
    fn prompt_carries_context_and_languages() {
        let m = message("Open Torrent", false);
        let cfg = AiConfig {
            provider: "openai",
            api_key: "k",
            model: "m",
            source_lang: "en",
            target_lang: "pt_PT",
        };
        let p = build_prompt(&m, &cfg, None);
        assert!(p.contains("from en to pt_PT"));
        assert!(p.contains("UI component: Formatter"));
        assert!(p.ends_with("Open Torrent"));
    }

    #[test]
    fn plural_prompt_names_the_form() {
        let m = message("%Ln day(s)", true);
        let cfg = AiConfig {
            provider: "openai",
            api_key: "k",
            model: "m",
            source_lang: "en",
            target_lang: "pt_PT",
        };
        assert!(build_prompt(&m, &cfg, Some(0)).contains("singular"));
        assert!(build_prompt(&m, &cfg, Some(1)).contains("plural"));
    }

    #[test]
    fn disambiguation_comment_enters_the_prompt() {
        let mut m = message("Status", false);
        m.comment = Some("Torrent status column".into());
        let cfg = AiConfig {
            provider: "deepseek",
            api_key: "k",
            model: "m",
            source_lang: "en",
            target_lang: "pt_PT",
        };
        assert!(build_prompt(&m, &cfg, None).contains("Disambiguation: Torrent status column"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        assert!(endpoint_for("acme").is_err());
        assert!(endpoint_for("openai").is_ok());
        assert!(endpoint_for("deepseek").is_ok());
    }

    #[test]
    fn retry_only_on_transient_http() {
        assert!(should_retry_http(StatusCode::TOO_MANY_REQUESTS));
        assert!(should_retry_http(StatusCode::BAD_GATEWAY));
        assert!(!should_retry_http(StatusCode::UNAUTHORIZED));
        assert!(!should_retry_http(StatusCode::BAD_REQUEST));
    }
}
