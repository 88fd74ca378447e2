//! Prompt templates.
//!
//! Each template embeds the prepared context and spells out the exact JSON
//! shape the model must return, matching the schema the answer is later
//! validated against.

use std::fmt;

use crate::ingestion::PromptContext;

const DEFAULT_QUESTION: &str = "Provide a concise summary.";

/// Available prompt templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Template {
    PdfAnalysis,
    TitleExtraction,
    SectionExtraction,
    DocumentExplanation,
    ReportGeneration,
}

impl Template {
    pub const ALL: [Template; 5] = [
        Self::PdfAnalysis,
        Self::TitleExtraction,
        Self::SectionExtraction,
        Self::DocumentExplanation,
        Self::ReportGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PdfAnalysis => "pdf_analysis",
            Self::TitleExtraction => "title_extraction",
            Self::SectionExtraction => "section_extraction",
            Self::DocumentExplanation => "document_explanation",
            Self::ReportGeneration => "report_generation",
        }
    }

    /// Render the prompt for `ctx`.
    pub fn render(&self, ctx: &PromptContext) -> String {
        let language = display_language(&ctx.language);
        match self {
            Self::PdfAnalysis => format!(
                "You are an expert academic assistant. Analyze the provided context and respond in {language}.\n\
                 Return a strict JSON object with the shape:\n\
                 {{\n  \"slides\": [\n    {{ \"title\": \"string\", \"content\": [\"bullet\", \"...\"] }}\n  ],\n  \"summary\": \"string\"\n}}\n\
                 Do not include any extra keys or prose.\n\
                 CONTENT:\n{}",
                ctx.context
            ),
            Self::TitleExtraction => format!(
                "Extract a concise document title from the following content and return:\n\
                 {{ \"title\": \"string\" }}\n\
                 CONTENT:\n{}",
                ctx.context
            ),
            Self::SectionExtraction => format!(
                "Identify the main document sections and return:\n\
                 {{ \"sections\": [{{ \"title\": \"string\", \"description\": \"string\" }}] }}\n\
                 CONTENT:\n{}",
                ctx.context
            ),
            Self::DocumentExplanation => format!(
                "You answer user questions about the document in {language}.\n\
                 Respond with:\n\
                 {{ \"summary\": \"string\", \"answer\": \"string\" }}\n\
                 QUESTION:\n{}\n\
                 CONTEXT:\n{}",
                ctx.question
                    .as_deref()
                    .filter(|q| !q.trim().is_empty())
                    .unwrap_or(DEFAULT_QUESTION),
                ctx.context
            ),
            Self::ReportGeneration => format!(
                "Generate a professional academic report using this structured data:\n{}\n\
                 Return a JSON object {{ \"summary\": \"string\", \"sections\": [{{ \"title\": \"...\", \"content\": [\"...\"] }}] }}.",
                ctx.insights.as_deref().unwrap_or_default()
            ),
        }
        .trim()
        .to_string()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case language label; anything but Arabic is answered in English.
fn display_language(tag: &str) -> &'static str {
    match tag {
        "ar" => "AR",
        _ => "EN",
    }
}
