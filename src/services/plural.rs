// Regras de plural por língua-alvo, no espírito da tabela de numerus do
// Qt Linguist. A língua vem do cabeçalho do catálogo ("pt_PT", "fr", ...).

fn split_tag(lang: &str) -> (String, Option<String>) {
    let norm = lang.trim().replace('-', "_");
    let mut parts = norm.splitn(2, '_');
    let base = parts.next().unwrap_or("").to_lowercase();
    let region = parts.next().map(|r| r.to_uppercase());
    (base, region)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    // ja, zh, ko, th, vi, id: uma forma única.
    Single,
    // en, de, es, it, pt_PT, ...: singular quando n == 1.
    TwoOne,
    // fr, pt_BR: singular quando n < 2 (0 e 1).
    TwoLessThanTwo,
    // ru, uk, be, sr, hr, bs: singular / paucal / plural.
    Slavic,
    // pl: como Slavic mas 1 só no n == 1 exato.
    Polish,
    // cs, sk: 1 / 2-4 / resto.
    CzechSlovak,
}

fn rule_for(lang: &str) -> Rule {
    let (base, region) = split_tag(lang);

    match base.as_str() {
        "ja" | "zh" | "ko" | "th" | "vi" | "id" => Rule::Single,
        "fr" | "oc" => Rule::TwoLessThanTwo,
        // Português europeu usa n == 1; o brasileiro junta o zero ao
        // singular ("0 dia"), como o francês.
        "pt" => {
            if region.as_deref() == Some("BR") {
                Rule::TwoLessThanTwo
            } else {
                Rule::TwoOne
            }
        }
        "ru" | "uk" | "be" | "sr" | "hr" | "bs" | "sh" => Rule::Slavic,
        "pl" => Rule::Polish,
        "cs" | "sk" => Rule::CzechSlovak,
        // Desconhecida: regra do inglês.
        _ => Rule::TwoOne,
    }
}

/// Quantas formas um `<message numerus="yes">` tem de fornecer nesta língua.
pub fn form_count(lang: &str) -> usize {
    match rule_for(lang) {
        Rule::Single => 1,
        Rule::TwoOne | Rule::TwoLessThanTwo => 2,
        Rule::Slavic | Rule::Polish | Rule::CzechSlovak => 3,
    }
}

/// Índice da forma a usar para a quantidade `n`.
pub fn form_index(lang: &str, n: u64) -> usize {
    match rule_for(lang) {
        Rule::Single => 0,
        Rule::TwoOne => {
            if n == 1 {
                0
            } else {
                1
            }
        }
        Rule::TwoLessThanTwo => {
            if n < 2 {
                0
            } else {
                1
            }
        }
        Rule::Slavic => {
            if n % 10 == 1 && n % 100 != 11 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        Rule::Polish => {
            if n == 1 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        Rule::CzechSlovak => {
            if n == 1 {
                0
            } else if (2..=4).contains(&n) {
                1
            } else {
                2
            }
        }
    }
}

/// Descrição da forma `idx`, para prompts de tradução automática.
pub fn form_hint(lang: &str, idx: usize) -> &'static str {
    match (form_count(lang), idx) {
        (1, _) => "universal (any count)",
        (2, 0) => "singular",
        (2, _) => "plural",
        (3, 0) => "singular (n = 1)",
        (3, 1) => "paucal (small counts, e.g. 2-4)",
        (3, _) => "plural (remaining counts)",
        _ => "plural",
    }
}

/// Substitui os marcadores de quantidade `%n` / `%Ln` pelo valor.
pub fn format_count(form: &str, n: u64) -> String {
    let value = n.to_string();
    form.replace("%Ln", &value).replace("%n", &value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portuguese_has_two_forms_singular_on_one() {
        assert_eq!(form_count("pt_PT"), 2);
        assert_eq!(form_index("pt_PT", 1), 0);
        assert_eq!(form_index("pt_PT", 0), 1);
        assert_eq!(form_index("pt_PT", 5), 1);
    }

    #[test]
    fn brazilian_portuguese_joins_zero_to_singular() {
        assert_eq!(form_index("pt_BR", 0), 0);
        assert_eq!(form_index("pt_BR", 1), 0);
        assert_eq!(form_index("pt_BR", 2), 1);
    }

    #[test]
    fn french_rule_is_less_than_two() {
        assert_eq!(form_index("fr", 0), 0);
        assert_eq!(form_index("fr_FR", 1), 0);
        assert_eq!(form_index("fr", 2), 1);
    }

    #[test]
    fn japanese_single_form() {
        assert_eq!(form_count("ja"), 1);
        assert_eq!(form_index("ja", 7), 0);
    }

    #[test]
    fn russian_three_forms() {
        assert_eq!(form_count("ru"), 3);
        assert_eq!(form_index("ru", 1), 0);
        assert_eq!(form_index("ru", 21), 0);
        assert_eq!(form_index("ru", 3), 1);
        assert_eq!(form_index("ru", 12), 2);
        assert_eq!(form_index("ru", 5), 2);
        assert_eq!(form_index("ru", 111), 2);
    }

    #[test]
    fn czech_paucal_range() {
        assert_eq!(form_index("cs", 1), 0);
        assert_eq!(form_index("cs", 3), 1);
        assert_eq!(form_index("cs", 22), 2);
    }

    #[test]
    fn hyphen_tags_and_unknown_languages() {
        assert_eq!(form_index("pt-PT", 1), 0);
        // Desconhecida cai na regra do inglês.
        assert_eq!(form_count("tlh"), 2);
        assert_eq!(form_index("tlh", 1), 0);
    }

    #[test]
    fn count_substitution_handles_both_markers() {
        assert_eq!(format_count("%Ln dias", 5), "5 dias");
        assert_eq!(format_count("%n of %Ln", 3), "3 of 3");
        assert_eq!(format_count("sem marcador", 9), "sem marcador");
    }
}
