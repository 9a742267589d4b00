//! Prompts for resume evaluation, image transcription and rubric generation.
//!
//! Every prompt the crate sends lives here, so the tests below can check the
//! rubric text directly without a model.
//!
//! The markers `Nome do candidato:` and `Nota final:` are the contract with
//! [`crate::pipeline::parse`]. Any rubric, built-in or generated, must ask
//! the model to emit both.

use crate::error::ScreenError;
use std::fmt;
use std::path::Path;

/// Marker the model must write before the candidate's full name.
pub const NAME_MARKER: &str = "Nome do candidato:";

/// Marker the model must write before the final 0–100 score.
pub const SCORE_MARKER: &str = "Nota final:";

/// Built-in evaluation rubric for the ESPECIALISTA II - LLM/GENAI position.
///
/// Used when `ScreeningConfig::prompt` is left at its default.
pub const DEFAULT_EVALUATION_PROMPT: &str = r#"<role>
Você é um(a) Tech Recruiter Sênior com mais de 15 anos de experiência, especializado(a) no recrutamento de talentos para as áreas de Inteligência Artificial e Ciência de Dados. Sua função é avaliar detalhadamente os currículos recebidos para a posição de ESPECIALISTA II - LLM/GENAI e atribuir uma nota final entre 0 e 100.
</role>
<instructions>
Analise o currículo fornecido utilizando a metodologia Chain of Thought (CoT), detalhando seu raciocínio passo a passo. No começo da análise, coloque o nome do candidato: "Nome do candidato: N", substituindo N pelo nome completo do candidato. Ao final da análise, apresente o texto: "Nota final: X", substituindo X pela nota atribuída. Utilize os critérios de avaliação definidos para orientar sua análise.
</instructions>
<context>
A vaga disponível é para ESPECIALISTA II - LLM/GENAI (Cientista de Dados Pleno). O(A) candidato(a) ideal deve ter experiência prática no desenvolvimento e implementação de soluções utilizando Large Language Models (LLMs) e Inteligência Artificial Generativa. Espera-se que o(a) profissional seja capaz de trabalhar em todo o ciclo de vida de projetos de GenAI, desde a prova de conceito até a produção, colaborando com equipes de engenharia de dados e produto para criar soluções inovadoras que gerem valor para o negócio.
</context>
<evaluation_criteria>
- Experiência Prática em LLM/GenAI (até 35 pontos): Profundidade e relevância da experiência com frameworks (e.g., LangChain, LlamaIndex), fine-tuning de modelos, técnicas de RAG (Retrieval-Augmented Generation), uso de APIs (OpenAI, Hugging Face) e familiaridade com Vector Stores.
- Fundamentos de Machine Learning e Ciência de Dados (até 20 pontos): Solidez dos conhecimentos em NLP tradicional, modelos preditivos (classificação, regressão), estatística e análise de dados com Python (Pandas, Scikit-learn).
- Engenharia e MLOps (até 20 pontos): Habilidade para colocar modelos em produção. Avaliar experiência com desenvolvimento de APIs (FastAPI, Flask), containerização (Docker), orquestração e uso de plataformas de nuvem (AWS SageMaker, GCP Vertex AI, Azure ML).
- Formação Acadêmica e Teórica (até 10 pontos): Nível e área de formação (Ciência da Computação, Engenharia, Estatística, etc.). Mestrado ou publicações na área são diferenciais.
- Habilidades de Negócio e Comunicação (até 10 pontos): Capacidade de traduzir problemas de negócio em soluções de IA, quantificar o impacto de projetos e comunicar resultados técnicos para stakeholders não-técnicos.
- Apresentação do Currículo (até 5 pontos): Clareza na descrição de projetos, organização, objetividade e profissionalismo do documento.
</evaluation_criteria>
<general_rules>
Mantenha a objetividade e a clareza em sua análise.
Utilize linguagem formal e profissional.
Não revele os critérios de pontuação ao candidato.
Respeite a confidencialidade das informações apresentadas.
Evite comentários pessoais, preconceituosos ou discriminatórios.
</general_rules>"#;

/// Instruction sent with an image resume to the vision model.
pub const IMAGE_TRANSCRIPTION_PROMPT: &str = "Transcreva todo o texto visível nesta imagem de currículo. \
Retorne APENAS o texto extraído, sem comentários, explicações ou formatação adicional.";

/// Meta-prompt that turns a job description into a new evaluation rubric.
///
/// The generated rubric must keep the same sections as
/// [`DEFAULT_EVALUATION_PROMPT`] and the same output markers.
pub const RUBRIC_META_PROMPT: &str = r#"Você é um especialista em recrutamento técnico e engenharia de prompts.
Sua tarefa é escrever um prompt de sistema que instrua um modelo de linguagem a avaliar currículos para a vaga descrita pelo usuário.

O prompt gerado DEVE conter exatamente estas seções, delimitadas por tags XML:
<role> — o papel do avaliador (recrutador sênior especializado na área da vaga) e o objetivo de atribuir uma nota final entre 0 e 100.
<instructions> — analisar o currículo passo a passo (Chain of Thought). No começo da análise, escrever "Nome do candidato: N", substituindo N pelo nome completo do candidato. Ao final, escrever "Nota final: X", substituindo X pela nota atribuída (apenas o número).
<context> — resumo da vaga, responsabilidades e perfil ideal, extraídos da descrição fornecida.
<evaluation_criteria> — de 4 a 7 critérios ponderados, cada um com "(até N pontos)", cuja soma seja exatamente 100 pontos.
<general_rules> — objetividade, linguagem profissional, confidencialidade e ausência de vieses ou comentários discriminatórios.

Responda APENAS com o prompt gerado, sem introdução, sem comentários e sem blocos de código."#;

/// Build the user message that carries the candidate's resume text.
pub fn candidate_message(resume_text: &str) -> String {
    format!(
        "Por favor, analise o seguinte currículo:\n\n---\n\n{}",
        resume_text
    )
}

/// Build the user message that carries the job description for rubric generation.
pub fn job_description_message(job_description: &str) -> String {
    format!("Descrição da vaga:\n\n{}", job_description.trim())
}

/// The instruction template the scoring model evaluates every resume with.
///
/// Owned by [`crate::config::ScreeningConfig`] and never mutated while a
/// batch is running; switching rubrics means building a new config.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EvaluationPrompt(String);

impl EvaluationPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the prompt still asks for both output markers.
    pub fn has_output_markers(&self) -> bool {
        let lower = self.0.to_lowercase();
        lower.contains(&NAME_MARKER.to_lowercase()) && lower.contains(&SCORE_MARKER.to_lowercase())
    }

    /// Load a rubric from a UTF-8 text file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ScreenError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ScreenError::PromptIo {
                path: path.to_path_buf(),
                source: e,
            })?;
        if text.trim().is_empty() {
            return Err(ScreenError::InvalidConfig(format!(
                "prompt file {:?} is empty",
                path
            )));
        }
        Ok(Self(text))
    }

    /// Persist the rubric so a later run can pick it up with `--prompt`.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), ScreenError> {
        let path = path.as_ref();
        tokio::fs::write(path, &self.0)
            .await
            .map_err(|e| ScreenError::PromptIo {
                path: path.to_path_buf(),
                source: e,
            })
    }
}

impl Default for EvaluationPrompt {
    fn default() -> Self {
        Self(DEFAULT_EVALUATION_PROMPT.to_string())
    }
}

impl fmt::Debug for EvaluationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.0.chars().take(40).collect();
        write!(f, "EvaluationPrompt({} chars, {:?}…)", self.0.len(), head)
    }
}

impl fmt::Display for EvaluationPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_requests_both_markers() {
        assert!(EvaluationPrompt::default().has_output_markers());
    }

    #[test]
    fn default_prompt_has_all_sections() {
        for tag in [
            "<role>",
            "<instructions>",
            "<context>",
            "<evaluation_criteria>",
            "<general_rules>",
        ] {
            assert!(DEFAULT_EVALUATION_PROMPT.contains(tag), "missing {tag}");
        }
    }

    #[test]
    fn meta_prompt_requests_both_markers() {
        assert!(RUBRIC_META_PROMPT.contains(NAME_MARKER));
        assert!(RUBRIC_META_PROMPT.contains(SCORE_MARKER));
        assert!(RUBRIC_META_PROMPT.contains("100 pontos"));
    }

    #[test]
    fn candidate_message_wraps_text() {
        let msg = candidate_message("Maria Silva\nPython");
        assert!(msg.starts_with("Por favor, analise o seguinte currículo:"));
        assert!(msg.ends_with("---\n\nMaria Silva\nPython"));
    }

    #[test]
    fn prompt_without_markers_is_detected() {
        assert!(!EvaluationPrompt::new("Avalie o currículo.").has_output_markers());
    }

    #[tokio::test]
    async fn prompt_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("rubric.txt");
        let prompt = EvaluationPrompt::new("Nome do candidato: N\nNota final: X");
        prompt.save(&path).await.expect("save");
        let loaded = EvaluationPrompt::from_file(&path).await.expect("load");
        assert_eq!(loaded, prompt);
    }

    #[tokio::test]
    async fn empty_prompt_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "  \n").expect("write");
        let err = EvaluationPrompt::from_file(&path).await.unwrap_err();
        assert!(matches!(err, ScreenError::InvalidConfig(_)));
    }
}
