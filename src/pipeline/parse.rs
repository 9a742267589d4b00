//! Parsing: candidate name and final score out of free-text model output.
//!
//! The scoring model is an untrusted text producer. The only contract is
//! that it was *asked* to write `Nome do candidato: N` and `Nota final: X`
//! somewhere in its answer. In practice models wrap labels in markdown
//! bold, change capitalisation, append `/100` or `pontos`, or forget a label
//! entirely. [`parse_analysis`] is a total, pure function over that text:
//! it never fails, and a missing field degrades to a default.
//!
//! ## Rules
//!
//! 1. Empty text → no name, score 0.
//! 2. Name: first case-insensitive `nome do candidato:`; the rest of that
//!    line, trimmed. An empty remainder counts as no name.
//! 3. Score: first case-insensitive `nota final:` immediately followed
//!    (after optional whitespace) by ASCII digits. Values above 100 clamp to
//!    100; digit runs that do not fit an integer give 0.
//! 4. Labels may sit anywhere in the text, but the words of a label share
//!    one line. Markdown emphasis (`**`, `__`) around the label, its colon
//!    or its value is tolerated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structured fields recovered from an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResult {
    pub candidate_name: Option<String>,
    /// 0–100. Also 0 when no score could be read.
    pub score: u8,
}

static RE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)nome[ \t]+do[ \t]+candidato[*_]*[ \t]*:[*_]*[ \t]*([^\r\n]*)").unwrap()
});

static RE_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)nota[ \t]+final[*_]*[ \t]*:[*_]*\s*[*_]*([0-9]+)").unwrap()
});

/// Extract the candidate name and final score from `analysis`.
pub fn parse_analysis(analysis: &str) -> ParsedResult {
    if analysis.trim().is_empty() {
        return ParsedResult::default();
    }

    ParsedResult {
        candidate_name: parse_name(analysis),
        score: parse_score(analysis),
    }
}

fn parse_name(analysis: &str) -> Option<String> {
    let caps = RE_NAME.captures(analysis)?;
    let name = caps[1].trim().trim_matches(['*', '_']).trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn parse_score(analysis: &str) -> u8 {
    let Some(caps) = RE_SCORE.captures(analysis) else {
        debug!("No score marker found in analysis; defaulting to 0");
        return 0;
    };
    match caps[1].parse::<u32>() {
        Ok(n) => n.min(100) as u8,
        Err(_) => {
            debug!("Score '{}' does not fit an integer; defaulting to 0", &caps[1]);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text() {
        assert_eq!(parse_analysis(""), ParsedResult::default());
        assert_eq!(parse_analysis("   \n"), ParsedResult::default());
    }

    #[test]
    fn name_and_score_with_suffix() {
        let r = parse_analysis("Nome do candidato: Maria Silva\n...\nNota final: 92/100");
        assert_eq!(r.candidate_name.as_deref(), Some("Maria Silva"));
        assert_eq!(r.score, 92);
    }

    #[test]
    fn score_anywhere_any_case() {
        for text in [
            "Nota final: 85",
            "blah blah NOTA FINAL: 85 pontos",
            "Conclusão.\nnota final:85",
            "Resumo... Nota Final:   85.",
        ] {
            assert_eq!(parse_analysis(text).score, 85, "text: {text:?}");
        }
    }

    #[test]
    fn non_digit_score_is_zero() {
        assert_eq!(parse_analysis("Nota final: alta").score, 0);
        assert_eq!(parse_analysis("Nota final: oitenta").score, 0);
    }

    #[test]
    fn missing_labels_default() {
        let r = parse_analysis("O candidato tem boa experiência em Python.");
        assert_eq!(r.candidate_name, None);
        assert_eq!(r.score, 0);
    }

    #[test]
    fn first_match_wins() {
        let r = parse_analysis(
            "Nome do candidato: Ana\nNota final: 70\nRevisão\nNome do candidato: Bia\nNota final: 90",
        );
        assert_eq!(r.candidate_name.as_deref(), Some("Ana"));
        assert_eq!(r.score, 70);
    }

    #[test]
    fn label_without_digits_does_not_hide_a_later_score() {
        let r = parse_analysis("A nota final: será calculada abaixo.\n\nNota final: 64");
        assert_eq!(r.score, 64);
    }

    #[test]
    fn markdown_bold_labels() {
        let r = parse_analysis("**Nome do candidato:** João Souza\n\n**Nota final:** 88");
        assert_eq!(r.candidate_name.as_deref(), Some("João Souza"));
        assert_eq!(r.score, 88);

        let r = parse_analysis("**Nome do candidato**: João Souza\n**Nota final**: 77");
        assert_eq!(r.candidate_name.as_deref(), Some("João Souza"));
        assert_eq!(r.score, 77);
    }

    #[test]
    fn bold_values() {
        let r = parse_analysis("Nome do candidato: **Maria Silva**\nNota final: **85**/100");
        assert_eq!(r.candidate_name.as_deref(), Some("Maria Silva"));
        assert_eq!(r.score, 85);

        let r = parse_analysis("Nome do candidato: __Maria Silva__\nNota final: __70__");
        assert_eq!(r.candidate_name.as_deref(), Some("Maria Silva"));
        assert_eq!(r.score, 70);
    }

    #[test]
    fn labels_do_not_span_lines() {
        let r = parse_analysis(
            "O nome do\ncandidato: não informado no texto.\nNome do candidato: Bia\n\
             A nota\nfinal: 10 pontos a mais.\nNota final: 66",
        );
        assert_eq!(r.candidate_name.as_deref(), Some("Bia"));
        assert_eq!(r.score, 66);
    }

    #[test]
    fn trailing_punctuation_is_kept() {
        let r = parse_analysis("Nome do candidato: Carlos Lima.");
        assert_eq!(r.candidate_name.as_deref(), Some("Carlos Lima."));
    }

    #[test]
    fn empty_name_counts_as_missing() {
        let r = parse_analysis("Nome do candidato:\nNota final: 50");
        assert_eq!(r.candidate_name, None);
        assert_eq!(r.score, 50);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(parse_analysis("Nota final: 150").score, 100);
        assert_eq!(parse_analysis("Nota final: 99999999999999999999").score, 0);
    }

    #[test]
    fn crlf_line_endings() {
        let r = parse_analysis("Nome do candidato: Rita Alves\r\nNota final: 81\r\n");
        assert_eq!(r.candidate_name.as_deref(), Some("Rita Alves"));
        assert_eq!(r.score, 81);
    }

    #[test]
    fn parsing_is_idempotent() {
        let text = "Nome do candidato: Paula\nNota final: 73";
        assert_eq!(parse_analysis(text), parse_analysis(text));
    }
}
