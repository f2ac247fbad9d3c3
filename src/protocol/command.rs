#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    ParseTs,
    RebuildTs,
    Translate,
    RunQa,
    DetectEncoding,
    TranslateEntries,
    TranslateWithTm,
    ProjectList,
    ProjectCreate,
    ProjectOpen,
    ProjectSave,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "parse_ts" => Command::ParseTs,
            "rebuild_ts" => Command::RebuildTs,
            "translate" => Command::Translate,
            "run_qa" => Command::RunQa,
            "detect_encoding" | "encoding.detect" => Command::DetectEncoding,
            "translate_entries" => Command::TranslateEntries,
            "translate_with_tm" => Command::TranslateWithTm,
            "project.list" => Command::ProjectList,
            "project.create" => Command::ProjectCreate,
            "project.open" => Command::ProjectOpen,
            "project.save" => Command::ProjectSave,
            _ => Command::Unknown,
        }
    }
}
