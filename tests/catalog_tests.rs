//! Ciclo completo sobre um catálogo no estilo do Transmission pt_PT:
//! parse, lookup com plurais, QA e round-trip de serialização.

use traduz_core::model::entry::MessageStatus;
use traduz_core::parsers::ts;
use traduz_core::services::{lookup::LookupTable, qa, rebuild};

const CATALOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pt_PT" sourcelanguage="en">
<context>
    <name>AboutDialog</name>
    <message>
        <location filename="../AboutDialog.ui" line="14"/>
        <source>About Transmission</source>
        <translation>Sobre o Transmission</translation>
    </message>
    <message>
        <location filename="../AboutDialog.cc" line="62"/>
        <source>C&amp;redits</source>
        <translation>C&amp;réditos</translation>
    </message>
</context>
<context>
    <name>Formatter</name>
    <message numerus="yes">
        <location filename="../Formatter.cc" line="157"/>
        <source>%Ln day(s)</source>
        <translation>
            <numerusform>%Ln dia</numerusform>
            <numerusform>%Ln dias</numerusform>
        </translation>
    </message>
    <message numerus="yes">
        <location filename="../Formatter.cc" line="160"/>
        <source>%Ln hour(s)</source>
        <translation>
            <numerusform>%Ln hora</numerusform>
            <numerusform>%Ln horas</numerusform>
        </translation>
    </message>
</context>
<context>
    <name>MainWindow</name>
    <message>
        <location filename="../MainWindow.ui" line="68"/>
        <source>&amp;Torrent</source>
        <translation>&amp;Torrent</translation>
    </message>
    <message>
        <location filename="../MainWindow.ui" line="104"/>
        <source>Queue</source>
        <translation type="unfinished"></translation>
    </message>
</context>
</TS>
"#;

fn table() -> LookupTable {
    LookupTable::build(&ts::parse(CATALOG).unwrap())
}

#[test]
fn every_finished_entry_resolves_to_nonempty_text() {
    let catalog = ts::parse(CATALOG).unwrap();
    let table = LookupTable::build(&catalog);

    for m in catalog
        .messages
        .iter()
        .filter(|m| m.status == MessageStatus::Finished && !m.numerus)
    {
        let text = table.translate(&m.context, &m.source);
        assert!(!text.is_empty(), "lookup vazio para {}", m.message_id);
    }
}

#[test]
fn formatter_day_counts_select_the_right_form() {
    let t = table();
    assert_eq!(t.plural_form("Formatter", "%Ln day(s)", None, 1), Some("%Ln dia"));
    assert_eq!(t.plural_form("Formatter", "%Ln day(s)", None, 5), Some("%Ln dias"));
    assert_eq!(t.translate_n("Formatter", "%Ln hour(s)", 1), "1 hora");
    assert_eq!(t.translate_n("Formatter", "%Ln hour(s)", 24), "24 horas");
}

#[test]
fn unfinished_falls_back_to_source() {
    let t = table();
    assert_eq!(t.translate("MainWindow", "Queue"), "Queue");
}

#[test]
fn accelerators_survive_lookup() {
    let t = table();
    assert_eq!(t.translate("AboutDialog", "C&redits"), "C&réditos");
}

#[test]
fn shipped_catalog_passes_qa() {
    let catalog = ts::parse(CATALOG).unwrap();
    let issues = qa::run(&catalog);
    // "&Torrent" → "&Torrent" é aceitável cá: marcas próprias ficam
    // iguais; o QA acusa SAME_AS_SOURCE e mais nada.
    assert!(issues.iter().all(|i| i.code == "SAME_AS_SOURCE"), "{issues:?}");
}

#[test]
fn round_trip_preserves_all_triples() {
    let original = ts::parse(CATALOG).unwrap();
    let rebuilt = ts::parse(&rebuild::rebuild(&original).unwrap()).unwrap();

    assert_eq!(original.messages.len(), rebuilt.messages.len());
    for (a, b) in original.messages.iter().zip(rebuilt.messages.iter()) {
        assert_eq!((&a.context, &a.source), (&b.context, &b.source));
        assert_eq!(a.translation, b.translation);
        assert_eq!(a.plural_forms, b.plural_forms);
        assert_eq!(a.status, b.status);
        assert_eq!(a.locations, b.locations);
    }
}

#[test]
fn double_round_trip_is_stable() {
    let first = rebuild::rebuild(&ts::parse(CATALOG).unwrap()).unwrap();
    let second = rebuild::rebuild(&ts::parse(&first).unwrap()).unwrap();
    assert_eq!(first, second);
}
