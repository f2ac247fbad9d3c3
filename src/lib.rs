//! traduz-core — motor headless do editor de traduções TraduzTS.
//!
//! Trabalha catálogos Qt Linguist TS (XML): carrega, valida, traduz e
//! reserializa. O binário fala um protocolo JSON-por-linha em
//! stdin/stdout com o front-end; a biblioteca expõe as mesmas peças:
//!
//! - [`parsers::ts`] — parse do documento TS
//! - [`services::rebuild`] — serialização de volta (round-trip)
//! - [`services::lookup`] — `translate(context, source, count?)` com
//!   regras de plural por língua
//! - [`services::qa`] — validação do catálogo
//! - [`services::pipeline`] — preenchimento via TM + IA

pub mod model;
pub mod parsers;
pub mod protocol;
pub mod services;
