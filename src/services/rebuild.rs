use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::model::catalog::TsCatalog;
use crate::model::entry::TsMessage;

/// Reserializa o catálogo para XML TS, agrupando as mensagens por contexto
/// na ordem em que cada contexto aparece pela primeira vez.
///
/// A formatação é normalizada (indentação própria); o que se preserva é o
/// conteúdo: cada tuplo (contexto, source, comment, tradução/formas,
/// status, locations) sobrevive a parse → rebuild → parse.
pub fn rebuild(catalog: &TsCatalog) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::DocType(BytesText::new("TS")))
        .map_err(|e| e.to_string())?;

    let mut ts = BytesStart::new("TS");
    ts.push_attribute(("version", catalog.version.as_str()));
    if !catalog.language.is_empty() {
        ts.push_attribute(("language", catalog.language.as_str()));
    }
    if !catalog.source_language.is_empty() {
        ts.push_attribute(("sourcelanguage", catalog.source_language.as_str()));
    }
    writer
        .write_event(Event::Start(ts))
        .map_err(|e| e.to_string())?;

    for name in catalog.context_names() {
        writer
            .write_event(Event::Start(BytesStart::new("context")))
            .map_err(|e| e.to_string())?;

        write_text_element(&mut writer, "name", name)?;

        for m in catalog.messages.iter().filter(|m| m.context == name) {
            write_message(&mut writer, m)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("context")))
            .map_err(|e| e.to_string())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("TS")))
        .map_err(|e| e.to_string())?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');

    String::from_utf8(bytes).map_err(|e| format!("rebuilt TS is not valid UTF-8: {e}"))
}

fn write_message<W: std::io::Write>(
    writer: &mut Writer<W>,
    m: &TsMessage,
) -> Result<(), String> {
    let mut message = BytesStart::new("message");
    if m.numerus {
        message.push_attribute(("numerus", "yes"));
    }
    writer
        .write_event(Event::Start(message))
        .map_err(|e| e.to_string())?;

    for loc in &m.locations {
        let mut location = BytesStart::new("location");
        location.push_attribute(("filename", loc.filename.as_str()));
        if let Some(line) = loc.line {
            location.push_attribute(("line", line.to_string().as_str()));
        }
        writer
            .write_event(Event::Empty(location))
            .map_err(|e| e.to_string())?;
    }

    write_text_element(writer, "source", &m.source)?;

    if let Some(comment) = m.comment.as_deref() {
        write_text_element(writer, "comment", comment)?;
    }
    if let Some(extra) = m.extracomment.as_deref() {
        write_text_element(writer, "extracomment", extra)?;
    }
    if let Some(note) = m.translatorcomment.as_deref() {
        write_text_element(writer, "translatorcomment", note)?;
    }

    let mut translation = BytesStart::new("translation");
    if let Some(ts_type) = m.status.ts_type() {
        translation.push_attribute(("type", ts_type));
    }

    if m.numerus && !m.plural_forms.is_empty() {
        writer
            .write_event(Event::Start(translation))
            .map_err(|e| e.to_string())?;
        for form in &m.plural_forms {
            write_text_element(writer, "numerusform", form)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("translation")))
            .map_err(|e| e.to_string())?;
    } else if !m.numerus && !m.translation.is_empty() {
        writer
            .write_event(Event::Start(translation))
            .map_err(|e| e.to_string())?;
        writer
            .write_event(Event::Text(BytesText::new(&m.translation)))
            .map_err(|e| e.to_string())?;
        writer
            .write_event(Event::End(BytesEnd::new("translation")))
            .map_err(|e| e.to_string())?;
    } else {
        // Sem conteúdo: elemento vazio, para o parse de volta não
        // apanhar o whitespace da indentação como tradução.
        writer
            .write_event(Event::Empty(translation))
            .map_err(|e| e.to_string())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("message")))
        .map_err(|e| e.to_string())?;

    Ok(())
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), String> {
    if text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(|e| e.to_string())?;
    Ok(())
}
