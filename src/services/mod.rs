pub mod ai;
pub mod ai_types;
pub mod encoding;
pub mod lookup;
pub mod pipeline;
pub mod plural;
pub mod project;
pub mod qa;
pub mod rebuild;
pub mod translation_memory;
