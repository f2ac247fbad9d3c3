use serde_json::{json, Value};

use crate::model::catalog::TsCatalog;
use crate::model::entry::TsMessage;
use crate::model::project::ProjectInfo;
use crate::parsers;
use crate::services::{ai, encoding, lookup, pipeline, project, qa, rebuild};

mod command;
use command::Command;

fn get_cmd(req: &Value) -> &str {
    req.get("cmd").and_then(|v| v.as_str()).unwrap_or("")
}

fn get_id(req: &Value) -> Value {
    req.get("id").cloned().unwrap_or(Value::Null)
}

fn get_payload<'a>(req: &'a Value) -> &'a Value {
    static EMPTY: Value = Value::Null;
    req.get("payload").unwrap_or(&EMPTY)
}

fn ok(id: Value, payload: Value) -> String {
    json!({
        "id": id,
        "status": "ok",
        "payload": payload
    })
    .to_string()
}

fn err(id: Value, message: impl Into<String>) -> String {
    json!({
        "id": id,
        "status": "error",
        "message": message.into()
    })
    .to_string()
}

fn catalog_from_payload(payload: &Value) -> Result<TsCatalog, String> {
    let catalog_val = payload
        .get("catalog")
        .cloned()
        .ok_or_else(|| "payload.catalog is required".to_string())?;

    serde_json::from_value::<TsCatalog>(catalog_val)
        .map_err(|e| format!("invalid payload.catalog: {e}"))
}

fn entries_from_payload(payload: &Value) -> Result<Vec<TsMessage>, String> {
    let arr = payload
        .get("entries")
        .and_then(|v| v.as_array())
        .ok_or_else(|| "payload.entries must be an array".to_string())?;

    let mut entries: Vec<TsMessage> = Vec::with_capacity(arr.len());

    for (i, v) in arr.iter().cloned().enumerate() {
        match serde_json::from_value::<TsMessage>(v) {
            Ok(e) => entries.push(e),
            Err(e) => return Err(format!("invalid entry at index {}: {}", i, e)),
        }
    }

    Ok(entries)
}

struct AiParams<'a> {
    provider: &'a str,
    api_key: &'a str,
    model: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

fn ai_params<'a>(payload: &'a Value) -> Result<AiParams<'a>, String> {
    let provider = payload.get("provider").and_then(|v| v.as_str()).unwrap_or("");
    let api_key = payload.get("api_key").and_then(|v| v.as_str()).unwrap_or("");
    let model = payload.get("model").and_then(|v| v.as_str()).unwrap_or("");
    let source_lang = payload.get("source_lang").and_then(|v| v.as_str()).unwrap_or("en");
    let target_lang = payload.get("target_lang").and_then(|v| v.as_str()).unwrap_or("pt_PT");

    if provider.is_empty() {
        return Err("payload.provider is required".into());
    }
    if api_key.is_empty() {
        return Err("payload.api_key is required".into());
    }
    if model.is_empty() {
        return Err("payload.model is required".into());
    }

    Ok(AiParams {
        provider,
        api_key,
        model,
        source_lang,
        target_lang,
    })
}

pub fn handle(input: &str) -> String {
    let req: Value = match serde_json::from_str(input) {
        Ok(v) => v,
        Err(_) => {
            return json!({
                "status": "error",
                "message": "invalid json"
            })
            .to_string();
        }
    };

    let id = get_id(&req);
    let payload = get_payload(&req);

    match Command::from(get_cmd(&req)) {
        Command::Ping => ok(id, json!({ "message": "traduz-core alive" })),

        Command::ParseTs => {
            let text = payload.get("text").and_then(|v| v.as_str()).unwrap_or("");
            if text.is_empty() {
                return err(id, "payload.text is required");
            }
            match parsers::ts::parse(text) {
                Ok(catalog) => ok(id, json!({ "catalog": catalog })),
                Err(e) => err(id, e),
            }
        }

        Command::RebuildTs => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            match rebuild::rebuild(&catalog) {
                Ok(text) => ok(id, json!({ "text": text })),
                Err(e) => err(id, e),
            }
        }

        Command::Translate => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };

            let context = payload.get("context").and_then(|v| v.as_str()).unwrap_or("");
            let source = payload.get("source").and_then(|v| v.as_str()).unwrap_or("");
            if source.is_empty() {
                return err(id, "payload.source is required");
            }
            let comment = payload.get("comment").and_then(|v| v.as_str());
            let count = payload.get("count").and_then(|v| v.as_u64());

            let table = lookup::LookupTable::build(&catalog);
            let text = match count {
                Some(n) => table.translate_n_with_comment(context, source, comment, n),
                None => table
                    .translate_with_comment(context, source, comment)
                    .to_string(),
            };

            ok(id, json!({ "text": text }))
        }

        Command::RunQa => {
            let catalog = match catalog_from_payload(payload) {
                Ok(c) => c,
                Err(e) => return err(id, e),
            };
            let issues = qa::run(&catalog);
            ok(id, json!({ "issues": issues }))
        }

        Command::DetectEncoding => {
            let path_str = payload.get("path").and_then(|v| v.as_str()).unwrap_or("");
            if path_str.is_empty() {
                return err(id, "payload.path is required");
            }
            let path = std::path::PathBuf::from(path_str);
            match encoding::detect_from_file(&path) {
                Ok(result) => ok(id, serde_json::to_value(result).unwrap_or(json!({}))),
                Err(e) => err(id, e),
            }
        }

        Command::TranslateEntries => {
            let params = match ai_params(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };

            let mut entries = match entries_from_payload(payload) {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };

            let cfg = ai::AiConfig {
                provider: params.provider,
                api_key: params.api_key,
                model: params.model,
                source_lang: params.source_lang,
                target_lang: params.target_lang,
            };
            match ai::translate_entries(&mut entries, cfg) {
                Ok(report) => ok(id, json!({ "entries": entries, "report": report })),
                Err(e) => err(id, e),
            }
        }

        Command::TranslateWithTm => {
            let params = match ai_params(payload) {
                Ok(p) => p,
                Err(e) => return err(id, e),
            };

            let mut entries = match entries_from_payload(payload) {
                Ok(v) => v,
                Err(e) => return err(id, e),
            };

            let cfg = pipeline::PipelineConfig {
                provider: params.provider,
                api_key: params.api_key,
                model: params.model,
                source_lang: params.source_lang,
                target_lang: params.target_lang,
            };
            match pipeline::run(&mut entries, cfg) {
                Ok(report) => ok(id, json!({ "entries": entries, "report": report })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectList => ok(id, json!({ "projects": project::list_projects() })),

        Command::ProjectCreate => {
            let name = payload.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let root_path = payload.get("root_path").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let ts_path = payload.get("ts_path").and_then(|v| v.as_str()).unwrap_or("").to_string();
            let encoding = payload.get("encoding").and_then(|v| v.as_str()).unwrap_or("utf-8").to_string();
            let source_language = payload.get("source_language").and_then(|v| v.as_str()).unwrap_or("en").to_string();
            let target_language = payload.get("target_language").and_then(|v| v.as_str()).unwrap_or("").to_string();

            if name.is_empty() {
                return err(id, "payload.name is required");
            }
            if ts_path.is_empty() {
                return err(id, "payload.ts_path is required");
            }
            if target_language.is_empty() {
                return err(id, "payload.target_language is required");
            }

            match project::create_project(
                name,
                root_path,
                ts_path,
                encoding,
                source_language,
                target_language,
            ) {
                Ok(p) => ok(id, json!({ "project_path": p.project_path })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectOpen => {
            let project_path = payload.get("project_path").and_then(|v| v.as_str()).unwrap_or("").to_string();
            if project_path.is_empty() {
                return err(id, "payload.project_path is required");
            }

            match project::open_project(project_path) {
                Ok(p) => ok(id, json!({ "project": p })),
                Err(e) => err(id, e),
            }
        }

        Command::ProjectSave => {
            let project_val = payload.get("project").cloned().unwrap_or(Value::Null);
            if project_val.is_null() {
                return err(id, "payload.project is required");
            }

            let p: ProjectInfo = match serde_json::from_value(project_val) {
                Ok(v) => v,
                Err(e) => return err(id, format!("invalid payload.project: {e}")),
            };

            match project::save_project(p) {
                Ok(saved) => ok(id, json!({ "project": saved })),
                Err(e) => err(id, e),
            }
        }

        Command::Unknown => err(id, "unknown command"),
    }
}
