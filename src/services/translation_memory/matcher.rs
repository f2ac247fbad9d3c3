use super::model::TmEntry;
use super::{hash, normalize};

pub fn exact_match<'a>(
    entries: &'a [TmEntry],
    source_lang: &str,
    target_lang: &str,
    source: &str,
) -> Option<&'a TmEntry> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return None;
    }

    let norm = normalize::normalize(trimmed);
    let h = hash::hash_norm(&norm);

    entries.iter().find(|e| {
        e.source_lang == source_lang
            && e.target_lang == target_lang
            && e.hash == h
            && e.normalized == norm
    })
}
