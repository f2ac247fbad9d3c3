use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use regex::Regex;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize)]
pub struct EncodingDetectionResult {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
    // Valor do encoding= da declaração XML, quando existe.
    pub declared: Option<String>,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetectionResult, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;
    Ok(detect_from_bytes(&bytes))
}

pub fn detect_from_bytes(bytes: &[u8]) -> EncodingDetectionResult {
    // BOM primeiro: resolve sozinho.
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return bom_result("utf-8-sig", "utf-8", bytes);
    }
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return bom_result("utf-16le", "utf-16", bytes);
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return bom_result("utf-16be", "utf-16", bytes);
    }

    let declared = declared_encoding(bytes);

    // UTF-8 é o default do XML; se os bytes são UTF-8 válido não vale a
    // pena adivinhar (o chardetng responde windows-1252 para ASCII puro).
    let (best, mut confidence) = if std::str::from_utf8(bytes).is_ok() {
        (
            "utf-8".to_string(),
            estimate_confidence(bytes, encoding_rs::UTF_8),
        )
    } else {
        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);

        let encoding = detector.guess(None, true);
        (
            encoding.name().to_lowercase(),
            estimate_confidence(bytes, encoding),
        )
    };

    // Declaração XML a confirmar a detecção sobe a confiança;
    // em conflito, a declaração entra como candidata forte.
    let mut candidates = Vec::new();

    match &declared {
        Some(decl) if decl.eq_ignore_ascii_case(&best) => {
            confidence = (confidence + 0.10).min(0.99);
            candidates.push(EncodingCandidate {
                name: best.clone(),
                confidence,
            });
        }
        Some(decl) => {
            candidates.push(EncodingCandidate {
                name: best.clone(),
                confidence,
            });
            candidates.push(EncodingCandidate {
                name: decl.to_lowercase(),
                confidence: (confidence - 0.05).max(0.0),
            });
        }
        None => {
            candidates.push(EncodingCandidate {
                name: best.clone(),
                confidence,
            });
        }
    }

    if best == "utf-8" {
        candidates.push(EncodingCandidate {
            name: "windows-1252".into(),
            confidence: (confidence - 0.30).max(0.0),
        });
    }

    EncodingDetectionResult {
        best,
        confidence,
        candidates,
        declared,
    }
}

fn bom_result(best: &str, alt: &str, bytes: &[u8]) -> EncodingDetectionResult {
    EncodingDetectionResult {
        best: best.into(),
        confidence: 0.99,
        candidates: vec![
            EncodingCandidate {
                name: best.into(),
                confidence: 0.99,
            },
            EncodingCandidate {
                name: alt.into(),
                confidence: 0.90,
            },
        ],
        declared: declared_encoding(bytes),
    }
}

// Lê o encoding= da declaração <?xml ...?> nos primeiros bytes.
// Só olha para o prefixo: a declaração, quando existe, vem no início.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let head_len = bytes.len().min(256);
    let head = String::from_utf8_lossy(&bytes[..head_len]);

    let re = Regex::new(r#"<\?xml[^>]*encoding\s*=\s*["']([A-Za-z0-9._-]+)["']"#).unwrap();
    re.captures(&head)
        .map(|caps| caps[1].to_lowercase())
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    let len = text.len();
    if len < 64 {
        0.55
    } else if len < 512 {
        0.70
    } else if len < 4096 {
        0.82
    } else {
        0.90
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn utf8_bom_wins() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<?xml version=\"1.0\"?><TS></TS>");
        let r = detect_from_bytes(&bytes);
        assert_eq!(r.best, "utf-8-sig");
        assert!(r.confidence > 0.9);
    }

    #[test]
    fn utf16_boms_are_recognized() {
        assert_eq!(detect_from_bytes(&[0xFF, 0xFE, 0x3C, 0x00]).best, "utf-16le");
        assert_eq!(detect_from_bytes(&[0xFE, 0xFF, 0x00, 0x3C]).best, "utf-16be");
    }

    #[test]
    fn xml_declaration_is_reported() {
        let doc = b"<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS></TS>";
        let r = detect_from_bytes(doc);
        assert_eq!(r.declared.as_deref(), Some("utf-8"));
        assert_eq!(r.best, "utf-8");
    }

    #[test]
    fn declaration_mismatch_becomes_candidate() {
        let doc = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<TS></TS>";
        let r = detect_from_bytes(doc);
        assert_eq!(r.declared.as_deref(), Some("iso-8859-1"));
        assert!(r.candidates.iter().any(|c| c.name == "iso-8859-1"));
    }

    #[test]
    fn detect_from_file_reads_disk() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all("<?xml version=\"1.0\" encoding=\"utf-8\"?><TS language=\"pt_PT\"></TS>".as_bytes())
            .unwrap();
        let r = detect_from_file(f.path()).unwrap();
        assert_eq!(r.best, "utf-8");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(detect_from_file(Path::new("/nonexistent/pt_PT.ts")).is_err());
    }
}
