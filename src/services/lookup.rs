use std::collections::HashMap;

use crate::model::catalog::TsCatalog;
use crate::model::entry::TsMessage;
use crate::services::plural;

type Key = (String, String, Option<String>);

/// Índice de lookup em runtime sobre um catálogo carregado.
///
/// A chave é (context, source, comment); entradas vanished/obsolete ficam
/// de fora. Em caso de chave duplicada a primeira ocorrência ganha (o QA
/// acusa o duplicado).
pub struct LookupTable {
    language: String,
    messages: Vec<TsMessage>,
    index: HashMap<Key, usize>,
}

impl LookupTable {
    pub fn build(catalog: &TsCatalog) -> LookupTable {
        let messages: Vec<TsMessage> = catalog
            .messages
            .iter()
            .filter(|m| m.is_active())
            .cloned()
            .collect();

        let mut index: HashMap<Key, usize> = HashMap::with_capacity(messages.len());
        for (i, m) in messages.iter().enumerate() {
            index.entry(m.key()).or_insert(i);
        }

        LookupTable {
            language: catalog.language.clone(),
            messages,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn find(&self, context: &str, source: &str, comment: Option<&str>) -> Option<&TsMessage> {
        let key = (
            context.to_string(),
            source.to_string(),
            comment.map(|c| c.to_string()),
        );

        if let Some(&i) = self.index.get(&key) {
            return Some(&self.messages[i]);
        }

        // Sem match exato com desambiguação: tenta sem comentário,
        // como o QTranslator faz.
        if comment.is_some() {
            let key = (context.to_string(), source.to_string(), None);
            if let Some(&i) = self.index.get(&key) {
                return Some(&self.messages[i]);
            }
        }

        None
    }

    /// Tradução de uma mensagem simples. Entrada em falta ou por traduzir
    /// devolve a própria string de origem.
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        self.translate_with_comment(context, source, None)
    }

    pub fn translate_with_comment<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        comment: Option<&str>,
    ) -> &'a str {
        match self.find(context, source, comment) {
            Some(m) if !m.numerus && !m.translation.is_empty() => m.translation.as_str(),
            _ => source,
        }
    }

    /// Tradução sensível à quantidade: escolhe a forma plural pela regra
    /// da língua do catálogo e substitui `%n`/`%Ln`.
    pub fn translate_n(&self, context: &str, source: &str, n: u64) -> String {
        self.translate_n_with_comment(context, source, None, n)
    }

    pub fn translate_n_with_comment(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: u64,
    ) -> String {
        let form = self.plural_form(context, source, comment, n);
        plural::format_count(form.unwrap_or(source), n)
    }

    /// Forma plural crua (sem substituir `%n`), ou None quando o catálogo
    /// não tem forma utilizável para esta quantidade.
    pub fn plural_form(
        &self,
        context: &str,
        source: &str,
        comment: Option<&str>,
        n: u64,
    ) -> Option<&str> {
        let m = self.find(context, source, comment)?;

        if m.numerus {
            let idx = plural::form_index(&self.language, n);
            match m.plural_forms.get(idx) {
                Some(form) if !form.is_empty() => Some(form.as_str()),
                _ => None,
            }
        } else if !m.translation.is_empty() {
            // Mensagem não-numerus consultada com quantidade: usa a
            // tradução única.
            Some(m.translation.as_str())
        } else {
            None
        }
    }
}
