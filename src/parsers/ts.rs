use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::model::catalog::TsCatalog;
use crate::model::entry::{Location, MessageStatus, TsMessage};

// Elemento-folha cujo texto estamos a acumular.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    ContextName,
    Source,
    Comment,
    ExtraComment,
    TranslatorComment,
    Translation,
    NumerusForm,
}

// Mensagem em construção enquanto o leitor anda pelo <message>.
struct MessageBuilder {
    source: Option<String>,
    comment: Option<String>,
    extracomment: Option<String>,
    translatorcomment: Option<String>,
    translation: String,
    numerus: bool,
    plural_forms: Vec<String>,
    status: MessageStatus,
    locations: Vec<Location>,
}

impl MessageBuilder {
    fn new(numerus: bool) -> Self {
        MessageBuilder {
            source: None,
            comment: None,
            extracomment: None,
            translatorcomment: None,
            translation: String::new(),
            numerus,
            plural_forms: Vec::new(),
            // Sem <translation>, a mensagem conta como por traduzir.
            status: MessageStatus::Unfinished,
            locations: Vec::new(),
        }
    }

    fn finish(self, context: &str, seq: usize) -> Result<TsMessage, String> {
        let source = self
            .source
            .ok_or_else(|| format!("message without <source> in context '{context}'"))?;

        Ok(TsMessage {
            message_id: format!("{context}:{seq}"),
            context: context.to_string(),
            source,
            comment: self.comment,
            extracomment: self.extracomment,
            translatorcomment: self.translatorcomment,
            translation: self.translation,
            numerus: self.numerus,
            plural_forms: self.plural_forms,
            status: self.status,
            locations: self.locations,
        })
    }
}

struct TsParser {
    catalog: TsCatalog,
    saw_root: bool,
    context_name: Option<String>,
    current: Option<MessageBuilder>,
    leaf: Option<Leaf>,
    text: String,
    // Sequência por contexto para gerar message_id estável.
    seq_by_context: HashMap<String, usize>,
    depth: usize,
}

/// Carrega um documento Qt Linguist TS.
///
/// Falha cedo em XML malformado, raiz errada, `<message>` fora de contexto
/// ou mensagem sem `<source>`. Entidades (`&amp;` etc.) são descodificadas.
pub fn parse(text: &str) -> Result<TsCatalog, String> {
    let mut reader = Reader::from_str(text);
    let mut parser = TsParser {
        catalog: TsCatalog::new(String::new()),
        saw_root: false,
        context_name: None,
        current: None,
        leaf: None,
        text: String::new(),
        seq_by_context: HashMap::new(),
        depth: 0,
    };

    loop {
        match reader.read_event() {
            Err(e) => {
                return Err(format!(
                    "invalid TS document: {} (byte {})",
                    e,
                    reader.buffer_position()
                ));
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) => {
                parser.depth += 1;
                parser.open(&e, false)?;
            }
            Ok(Event::Empty(e)) => parser.open(&e, true)?,
            Ok(Event::End(e)) => {
                parser.depth = parser.depth.saturating_sub(1);
                parser.close(e.name().as_ref())?;
            }
            Ok(Event::Text(t)) => {
                if parser.leaf.is_some() {
                    let chunk = t.unescape().map_err(|e| {
                        format!("invalid TS document: {} (byte {})", e, reader.buffer_position())
                    })?;
                    parser.text.push_str(&chunk);
                }
            }
            Ok(Event::CData(c)) => {
                if parser.leaf.is_some() {
                    match std::str::from_utf8(c.as_ref()) {
                        Ok(s) => parser.text.push_str(s),
                        Err(e) => return Err(format!("invalid TS document: {e}")),
                    }
                }
            }
            // Declaração, DOCTYPE TS, comentários XML: nada a fazer.
            Ok(_) => {}
        }
    }

    if !parser.saw_root {
        return Err("invalid TS document: missing <TS> root element".to_string());
    }

    // O leitor não acusa documento truncado por si só.
    if parser.depth != 0 {
        return Err("invalid TS document: unexpected end of document".to_string());
    }

    Ok(parser.catalog)
}

impl TsParser {
    fn open(&mut self, e: &BytesStart, is_empty: bool) -> Result<(), String> {
        let name = e.name().as_ref().to_vec();

        if !self.saw_root {
            if name != b"TS" {
                return Err(format!(
                    "not a TS document (root element is <{}>)",
                    String::from_utf8_lossy(&name)
                ));
            }
            self.saw_root = true;

            if let Some(v) = attr_value(e, b"version")? {
                self.catalog.version = v;
            }
            if let Some(v) = attr_value(e, b"language")? {
                self.catalog.language = v;
            }
            if let Some(v) = attr_value(e, b"sourcelanguage")? {
                self.catalog.source_language = v;
            }
            return Ok(());
        }

        match name.as_slice() {
            b"context" => {
                if self.current.is_some() {
                    return Err("unexpected <context> inside <message>".to_string());
                }
                self.context_name = Some(String::new());
            }

            b"name" if self.current.is_none() && self.context_name.is_some() => {
                self.begin_leaf(Leaf::ContextName);
            }

            b"message" => {
                if self.context_name.is_none() {
                    return Err("invalid TS document: <message> outside of a <context>".to_string());
                }
                if self.current.is_some() {
                    return Err("invalid TS document: nested <message>".to_string());
                }
                let numerus = attr_value(e, b"numerus")?.as_deref() == Some("yes");
                self.current = Some(MessageBuilder::new(numerus));
            }

            b"location" => {
                // Normalmente <location .../> vazio; line="+n" (modo
                // relativo) fica como None.
                if let Some(cur) = self.current.as_mut() {
                    if let Some(filename) = attr_value(e, b"filename")? {
                        let line = attr_value(e, b"line")?.and_then(|v| v.parse::<u32>().ok());
                        cur.locations.push(Location { filename, line });
                    }
                }
            }

            b"source" if self.current.is_some() => self.begin_leaf(Leaf::Source),
            b"comment" if self.current.is_some() => self.begin_leaf(Leaf::Comment),
            b"extracomment" if self.current.is_some() => self.begin_leaf(Leaf::ExtraComment),
            b"translatorcomment" if self.current.is_some() => {
                self.begin_leaf(Leaf::TranslatorComment)
            }

            b"translation" => {
                let cur = self
                    .current
                    .as_mut()
                    .ok_or_else(|| "unexpected <translation> outside <message>".to_string())?;

                cur.status = match attr_value(e, b"type")? {
                    Some(t) => MessageStatus::from_ts_type(&t),
                    None => MessageStatus::Finished,
                };

                if !is_empty {
                    self.begin_leaf(Leaf::Translation);
                }
            }

            b"numerusform" => {
                if self.leaf != Some(Leaf::Translation) {
                    return Err("unexpected <numerusform> outside <translation>".to_string());
                }
                if is_empty {
                    // <numerusform/> vazio: forma presente mas sem texto.
                    if let Some(cur) = self.current.as_mut() {
                        cur.plural_forms.push(String::new());
                    }
                } else {
                    self.begin_leaf(Leaf::NumerusForm);
                }
            }

            // Elementos que não interessam ao modelo (<byte>, <dependencies>,
            // extensões): ignorados sem quebrar o leitor.
            _ => {}
        }

        // Elemento vazio fecha já aqui (sem evento End correspondente).
        if is_empty {
            match name.as_slice() {
                b"source" | b"comment" | b"extracomment" | b"translatorcomment" | b"name"
                | b"message" | b"context" => {
                    self.close(&name)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn begin_leaf(&mut self, leaf: Leaf) {
        self.leaf = Some(leaf);
        self.text.clear();
    }

    fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    fn close(&mut self, name: &[u8]) -> Result<(), String> {
        match name {
            b"name" if self.leaf == Some(Leaf::ContextName) => {
                let text = self.take_text();
                self.context_name = Some(text);
                self.leaf = None;
            }

            b"source" if self.leaf == Some(Leaf::Source) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    cur.source = Some(text);
                }
                self.leaf = None;
            }

            b"comment" if self.leaf == Some(Leaf::Comment) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    cur.comment = Some(text);
                }
                self.leaf = None;
            }

            b"extracomment" if self.leaf == Some(Leaf::ExtraComment) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    cur.extracomment = Some(text);
                }
                self.leaf = None;
            }

            b"translatorcomment" if self.leaf == Some(Leaf::TranslatorComment) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    cur.translatorcomment = Some(text);
                }
                self.leaf = None;
            }

            b"numerusform" if self.leaf == Some(Leaf::NumerusForm) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    cur.plural_forms.push(text);
                }
                // Volta para dentro do <translation>.
                self.leaf = Some(Leaf::Translation);
                self.text.clear();
            }

            b"translation" if self.leaf == Some(Leaf::Translation) => {
                let text = self.take_text();
                if let Some(cur) = self.current.as_mut() {
                    if !cur.numerus {
                        cur.translation = text;
                    }
                    // Para numerus, o texto solto dentro de <translation>
                    // é só whitespace entre <numerusform>.
                }
                self.leaf = None;
            }

            b"message" => {
                let cur = self
                    .current
                    .take()
                    .ok_or_else(|| "unbalanced </message>".to_string())?;
                let context = self.context_name.clone().unwrap_or_default();
                let seq = self.seq_by_context.entry(context.clone()).or_insert(0);
                let msg = cur.finish(&context, *seq)?;
                *seq += 1;
                self.catalog.messages.push(msg);
            }

            b"context" => {
                self.context_name = None;
            }

            _ => {}
        }

        Ok(())
    }
}

fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>, String> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| format!("invalid attribute: {err}"))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|err| format!("invalid attribute value: {err}"))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
