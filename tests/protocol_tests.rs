//! Testes do protocolo JSON-por-linha, pela mesma porta que o front-end usa.

use serde_json::{json, Value};
use traduz_core::protocol;

fn call(req: Value) -> Value {
    serde_json::from_str(&protocol::handle(&req.to_string())).unwrap()
}

const DOC: &str = r#"<TS version="2.1" language="pt_PT" sourcelanguage="en">
<context>
    <name>Formatter</name>
    <message numerus="yes">
        <source>%Ln day(s)</source>
        <translation><numerusform>%Ln dia</numerusform><numerusform>%Ln dias</numerusform></translation>
    </message>
    <message>
        <source>Unknown</source>
        <translation>Desconhecido</translation>
    </message>
</context>
</TS>"#;

#[test]
fn ping_answers() {
    let resp = call(json!({ "id": 1, "cmd": "ping" }));
    assert_eq!(resp["status"], "ok");
    assert_eq!(resp["payload"]["message"], "traduz-core alive");
    assert_eq!(resp["id"], 1);
}

#[test]
fn invalid_json_is_reported() {
    let resp: Value = serde_json::from_str(&protocol::handle("isto não é json")).unwrap();
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "invalid json");
}

#[test]
fn unknown_command_is_an_error() {
    let resp = call(json!({ "id": 2, "cmd": "torrent.start" }));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "unknown command");
}

#[test]
fn parse_ts_returns_catalog() {
    let resp = call(json!({ "id": 3, "cmd": "parse_ts", "payload": { "text": DOC } }));
    assert_eq!(resp["status"], "ok", "{resp}");
    let catalog = &resp["payload"]["catalog"];
    assert_eq!(catalog["language"], "pt_PT");
    assert_eq!(catalog["messages"].as_array().unwrap().len(), 2);
    assert_eq!(catalog["messages"][0]["numerus"], true);
}

#[test]
fn parse_ts_rejects_malformed_document() {
    let resp = call(json!({ "id": 4, "cmd": "parse_ts", "payload": { "text": "<TS><context>" } }));
    assert_eq!(resp["status"], "error");
    assert!(resp["message"].as_str().unwrap().contains("invalid TS document"));
}

#[test]
fn parse_ts_requires_text() {
    let resp = call(json!({ "id": 5, "cmd": "parse_ts", "payload": {} }));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "payload.text is required");
}

#[test]
fn translate_command_selects_plural_form() {
    let parsed = call(json!({ "id": 6, "cmd": "parse_ts", "payload": { "text": DOC } }));
    let catalog = parsed["payload"]["catalog"].clone();

    let one = call(json!({
        "id": 7,
        "cmd": "translate",
        "payload": { "catalog": catalog, "context": "Formatter", "source": "%Ln day(s)", "count": 1 }
    }));
    assert_eq!(one["payload"]["text"], "1 dia");

    let five = call(json!({
        "id": 8,
        "cmd": "translate",
        "payload": { "catalog": catalog, "context": "Formatter", "source": "%Ln day(s)", "count": 5 }
    }));
    assert_eq!(five["payload"]["text"], "5 dias");
}

#[test]
fn translate_command_without_count() {
    let parsed = call(json!({ "id": 9, "cmd": "parse_ts", "payload": { "text": DOC } }));
    let catalog = parsed["payload"]["catalog"].clone();

    let resp = call(json!({
        "id": 10,
        "cmd": "translate",
        "payload": { "catalog": catalog, "context": "Formatter", "source": "Unknown" }
    }));
    assert_eq!(resp["payload"]["text"], "Desconhecido");

    // Entrada inexistente devolve a própria source.
    let missing = call(json!({
        "id": 11,
        "cmd": "translate",
        "payload": { "catalog": catalog, "context": "Formatter", "source": "Ratio" }
    }));
    assert_eq!(missing["payload"]["text"], "Ratio");
}

#[test]
fn run_qa_flags_data_defects() {
    let doc = r#"<TS version="2.1" language="pt_PT">
<context><name>C</name>
<message numerus="yes"><source>%Ln file(s)</source>
<translation><numerusform>%Ln ficheiro</numerusform></translation></message>
</context></TS>"#;
    let parsed = call(json!({ "id": 12, "cmd": "parse_ts", "payload": { "text": doc } }));
    let catalog = parsed["payload"]["catalog"].clone();

    let resp = call(json!({ "id": 13, "cmd": "run_qa", "payload": { "catalog": catalog } }));
    assert_eq!(resp["status"], "ok");
    let issues = resp["payload"]["issues"].as_array().unwrap();
    assert!(issues
        .iter()
        .any(|i| i["code"] == "PLURAL_FORM_COUNT_MISMATCH"));
}

#[test]
fn rebuild_ts_round_trips_through_protocol() {
    let parsed = call(json!({ "id": 14, "cmd": "parse_ts", "payload": { "text": DOC } }));
    let catalog = parsed["payload"]["catalog"].clone();

    let rebuilt = call(json!({ "id": 15, "cmd": "rebuild_ts", "payload": { "catalog": catalog } }));
    assert_eq!(rebuilt["status"], "ok");
    let text = rebuilt["payload"]["text"].as_str().unwrap();
    assert!(text.contains("<!DOCTYPE TS>"));

    let reparsed = call(json!({ "id": 16, "cmd": "parse_ts", "payload": { "text": text } }));
    assert_eq!(reparsed["payload"]["catalog"], parsed["payload"]["catalog"]);
}

#[test]
fn rebuild_ts_requires_catalog() {
    let resp = call(json!({ "id": 17, "cmd": "rebuild_ts", "payload": {} }));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "payload.catalog is required");
}

#[test]
fn translate_entries_validates_ai_params() {
    let resp = call(json!({
        "id": 18,
        "cmd": "translate_entries",
        "payload": { "entries": [] }
    }));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "payload.provider is required");
}

#[test]
fn detect_encoding_requires_path() {
    let resp = call(json!({ "id": 19, "cmd": "detect_encoding", "payload": {} }));
    assert_eq!(resp["status"], "error");
    assert_eq!(resp["message"], "payload.path is required");
}
