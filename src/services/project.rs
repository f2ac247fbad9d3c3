use std::fs;
use std::path::{Path, PathBuf};

use crate::model::project::ProjectInfo;

fn projects_base_dir() -> PathBuf {
    if let Ok(local) = std::env::var("LOCALAPPDATA") {
        return PathBuf::from(local).join("TraduzTS").join("Projects");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("Projects")
}

fn ensure_dir(dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("failed to create projects dir: {e}"))
}

/// Converte o nome (que pode vir como path completo) em nome seguro de
/// diretório: basename + só carateres inofensivos.
fn safe_project_dir_name(name: &str) -> String {
    let mut n = name.trim().to_string();

    if n.contains('\\') || n.contains('/') {
        if let Some(bn) = Path::new(&n).file_name().and_then(|s| s.to_str()) {
            n = bn.to_string();
        }
    }

    let mut out = String::with_capacity(n.len());
    for ch in n.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == ' ' || ch == '_' || ch == '-' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }

    let out = out.trim().trim_matches('.').to_string();
    if out.is_empty() {
        "Project".to_string()
    } else {
        out
    }
}

pub fn list_projects() -> Vec<ProjectInfo> {
    list_projects_in(&projects_base_dir())
}

fn list_projects_in(base: &Path) -> Vec<ProjectInfo> {
    let mut projects = Vec::new();

    if let Ok(entries) = fs::read_dir(base) {
        for entry in entries.flatten() {
            let path = entry.path().join("project.json");
            if path.exists() {
                if let Ok(data) = fs::read_to_string(&path) {
                    if let Ok(project) = serde_json::from_str::<ProjectInfo>(&data) {
                        projects.push(project);
                    }
                }
            }
        }
    }

    projects
}

pub fn create_project(
    name: String,
    root_path: String,
    ts_path: String,
    encoding: String,
    source_language: String,
    target_language: String,
) -> Result<ProjectInfo, String> {
    create_project_in(
        &projects_base_dir(),
        name,
        root_path,
        ts_path,
        encoding,
        source_language,
        target_language,
    )
}

fn create_project_in(
    base: &Path,
    name: String,
    root_path: String,
    ts_path: String,
    encoding: String,
    source_language: String,
    target_language: String,
) -> Result<ProjectInfo, String> {
    ensure_dir(base)?;

    let safe_name = safe_project_dir_name(&name);
    let project_dir = base.join(&safe_name);

    if project_dir.exists() {
        return Err("project already exists".into());
    }

    fs::create_dir_all(&project_dir).map_err(|_| "failed to create project directory")?;

    let project = ProjectInfo {
        name,
        project_path: project_dir.to_string_lossy().to_string(),
        root_path,
        ts_path,
        encoding,
        source_language,
        target_language,
        ai_prompt_preset: "default".to_string(),
        ai_custom_prompt_text: String::new(),
    };

    let json = serde_json::to_string_pretty(&project).map_err(|_| "failed to serialize project")?;

    fs::write(project_dir.join("project.json"), json).map_err(|_| "failed to write project.json")?;

    Ok(project)
}

pub fn open_project(project_path: String) -> Result<ProjectInfo, String> {
    let path = Path::new(&project_path).join("project.json");

    if !path.exists() {
        return Err("project.json not found".into());
    }

    let data = fs::read_to_string(path).map_err(|_| "failed to read project.json")?;

    serde_json::from_str::<ProjectInfo>(&data).map_err(|_| "invalid project.json".into())
}

pub fn save_project(project: ProjectInfo) -> Result<ProjectInfo, String> {
    save_project_in(&projects_base_dir(), project)
}

fn save_project_in(base: &Path, mut project: ProjectInfo) -> Result<ProjectInfo, String> {
    let project_dir: PathBuf = {
        let pp = project.project_path.trim().to_string();
        if pp.is_empty() {
            base.join(safe_project_dir_name(&project.name))
        } else {
            PathBuf::from(pp)
        }
    };

    fs::create_dir_all(&project_dir)
        .map_err(|e| format!("failed to create project directory: {e}"))?;

    project.project_path = project_dir.to_string_lossy().to_string();

    if project.ai_prompt_preset.trim().is_empty() {
        project.ai_prompt_preset = "default".to_string();
    }
    if project.encoding.trim().is_empty() {
        project.encoding = "utf-8".to_string();
    }

    let json = serde_json::to_string_pretty(&project)
        .map_err(|e| format!("failed to serialize project: {e}"))?;

    fs::write(project_dir.join("project.json"), json)
        .map_err(|e| format!("failed to write project.json: {e}"))?;

    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_open_and_list_round_trip() {
        let base = TempDir::new().unwrap();

        let created = create_project_in(
            base.path(),
            "Transmission pt_PT".into(),
            "/src/transmission/qt".into(),
            "translations/transmission_pt.ts".into(),
            "utf-8".into(),
            "en".into(),
            "pt_PT".into(),
        )
        .unwrap();

        let opened = open_project(created.project_path.clone()).unwrap();
        assert_eq!(opened.name, "Transmission pt_PT");
        assert_eq!(opened.target_language, "pt_PT");
        assert_eq!(opened.ts_path, "translations/transmission_pt.ts");

        let listed = list_projects_in(base.path());
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn duplicate_create_is_rejected() {
        let base = TempDir::new().unwrap();
        let make = || {
            create_project_in(
                base.path(),
                "Projeto".into(),
                String::new(),
                String::new(),
                "utf-8".into(),
                "en".into(),
                "pt_PT".into(),
            )
        };
        make().unwrap();
        assert!(make().is_err());
    }

    #[test]
    fn save_fills_defaults_and_path() {
        let base = TempDir::new().unwrap();
        let project = ProjectInfo {
            name: "Novo".into(),
            ..Default::default()
        };

        let saved = save_project_in(base.path(), project).unwrap();
        assert!(!saved.project_path.is_empty());
        assert_eq!(saved.ai_prompt_preset, "default");
        assert_eq!(saved.encoding, "utf-8");

        let opened = open_project(saved.project_path.clone()).unwrap();
        assert_eq!(opened.name, "Novo");
    }

    #[test]
    fn dir_name_sanitization() {
        assert_eq!(safe_project_dir_name("C:\\Users\\x\\ATRI"), "ATRI");
        assert_eq!(safe_project_dir_name("pt_PT: torrents"), "pt_PT_ torrents");
        assert_eq!(safe_project_dir_name("  ."), "Project");
    }
}
