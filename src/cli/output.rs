use std::fmt::Write as FmtWrite;

use crate::models::{Chunk, OutputFormat};
use crate::utils::preview;

const PREVIEW_CHARS: usize = 200;
const VECTOR_PREVIEW_LEN: usize = 8;

pub trait Formatter {
    fn format_chunks(&self, source: &str, chunks: &[Chunk]) -> String;
    fn format_ingest_stats(&self, stats: &IngestStats) -> String;
    fn format_embedding(&self, embedding: &EmbeddingInfo) -> String;
    fn format_message(&self, message: &str) -> String;
    fn format_error(&self, error: &str) -> String;
}

#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files_scanned: u64,
    pub files_ingested: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub chunks_created: u64,
    pub chunks_stored: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone)]
pub struct EmbeddingInfo {
    pub model: String,
    pub text: String,
    pub vector: Vec<f32>,
}

fn vector_preview(vector: &[f32]) -> String {
    let head: Vec<String> = vector
        .iter()
        .take(VECTOR_PREVIEW_LEN)
        .map(|v| format!("{:.4}", v))
        .collect();
    if vector.len() > VECTOR_PREVIEW_LEN {
        format!("[{}, ...]", head.join(", "))
    } else {
        format!("[{}]", head.join(", "))
    }
}

fn metadata_summary(chunk: &Chunk) -> String {
    chunk
        .metadata
        .iter()
        .map(|(key, value)| match value.as_str() {
            Some(s) => format!("{}={}", key, s),
            None => format!("{}={}", key, value),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_chunks(&self, source: &str, chunks: &[Chunk]) -> String {
        if chunks.is_empty() {
            return format!("No chunks produced from: {}\n", source);
        }

        let mut output = String::new();
        writeln!(output, "Chunks for: {}", source).unwrap();
        writeln!(output, "Produced {} chunks\n", chunks.len()).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            writeln!(output, "{}. [{} chars]", i + 1, chunk.char_count()).unwrap();
            writeln!(output, "   Metadata: {}", metadata_summary(chunk)).unwrap();
            writeln!(output, "   ---").unwrap();
            for line in preview(&chunk.text, PREVIEW_CHARS).lines() {
                writeln!(output, "   {}", line).unwrap();
            }
            writeln!(output).unwrap();
        }

        output
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        writeln!(output, "Ingestion Complete").unwrap();
        writeln!(output, "------------------").unwrap();
        writeln!(output, "Files scanned: {}", stats.files_scanned).unwrap();
        writeln!(output, "Files ingested: {}", stats.files_ingested).unwrap();
        writeln!(output, "Files skipped: {}", stats.files_skipped).unwrap();
        writeln!(output, "Files failed: {}", stats.files_failed).unwrap();
        writeln!(output, "Chunks created: {}", stats.chunks_created).unwrap();
        writeln!(output, "Chunks stored: {}", stats.chunks_stored).unwrap();
        writeln!(output, "Duration: {}ms", stats.duration_ms).unwrap();
        output
    }

    fn format_embedding(&self, embedding: &EmbeddingInfo) -> String {
        let mut output = String::new();
        writeln!(output, "Model: {}", embedding.model).unwrap();
        writeln!(output, "Dimension: {}", embedding.vector.len()).unwrap();
        writeln!(output, "Vector: {}", vector_preview(&embedding.vector)).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("{}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}\n", error)
    }
}

pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render(&self, json: &serde_json::Value) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(json)
        } else {
            serde_json::to_string(json)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl Formatter for JsonFormatter {
    fn format_chunks(&self, source: &str, chunks: &[Chunk]) -> String {
        self.render(&serde_json::json!({
            "source": source,
            "total": chunks.len(),
            "chunks": chunks,
        }))
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        self.render(&serde_json::json!({
            "files_scanned": stats.files_scanned,
            "files_ingested": stats.files_ingested,
            "files_skipped": stats.files_skipped,
            "files_failed": stats.files_failed,
            "chunks_created": stats.chunks_created,
            "chunks_stored": stats.chunks_stored,
            "duration_ms": stats.duration_ms,
        }))
    }

    fn format_embedding(&self, embedding: &EmbeddingInfo) -> String {
        self.render(&serde_json::json!({
            "model": embedding.model,
            "text": embedding.text,
            "dimension": embedding.vector.len(),
            "vector": embedding.vector,
        }))
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({"message": message}).to_string()
    }

    fn format_error(&self, error: &str) -> String {
        serde_json::json!({"error": error}).to_string()
    }
}

pub struct MarkdownFormatter;

impl Formatter for MarkdownFormatter {
    fn format_chunks(&self, source: &str, chunks: &[Chunk]) -> String {
        if chunks.is_empty() {
            return format!("## No chunks produced\n\nSource: `{}`\n", source);
        }

        let mut output = String::new();
        writeln!(output, "## Chunks for `{}`\n", source).unwrap();
        writeln!(output, "*{} chunks*\n", chunks.len()).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            writeln!(output, "### {}. {} chars\n", i + 1, chunk.char_count()).unwrap();
            writeln!(output, "- **Metadata:** {}\n", metadata_summary(chunk)).unwrap();
            writeln!(output, "```").unwrap();
            writeln!(output, "{}", preview(&chunk.text, PREVIEW_CHARS)).unwrap();
            writeln!(output, "```\n").unwrap();
        }

        output
    }

    fn format_ingest_stats(&self, stats: &IngestStats) -> String {
        let mut output = String::new();
        writeln!(output, "## Ingestion Complete\n").unwrap();
        writeln!(output, "| Metric | Value |").unwrap();
        writeln!(output, "|--------|-------|").unwrap();
        writeln!(output, "| Files scanned | {} |", stats.files_scanned).unwrap();
        writeln!(output, "| Files ingested | {} |", stats.files_ingested).unwrap();
        writeln!(output, "| Files skipped | {} |", stats.files_skipped).unwrap();
        writeln!(output, "| Files failed | {} |", stats.files_failed).unwrap();
        writeln!(output, "| Chunks created | {} |", stats.chunks_created).unwrap();
        writeln!(output, "| Chunks stored | {} |", stats.chunks_stored).unwrap();
        writeln!(output, "| Duration | {}ms |", stats.duration_ms).unwrap();
        output
    }

    fn format_embedding(&self, embedding: &EmbeddingInfo) -> String {
        let mut output = String::new();
        writeln!(output, "## Embedding\n").unwrap();
        writeln!(output, "- **Model:** `{}`", embedding.model).unwrap();
        writeln!(output, "- **Dimension:** {}", embedding.vector.len()).unwrap();
        writeln!(output, "- **Vector:** `{}`", vector_preview(&embedding.vector)).unwrap();
        output
    }

    fn format_message(&self, message: &str) -> String {
        format!("> {}\n", message)
    }

    fn format_error(&self, error: &str) -> String {
        format!("> ⚠️ **Error:** {}\n", error)
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawDocument;

    fn sample_chunks() -> Vec<Chunk> {
        let parent = RawDocument::new("", "report.pdf").with_metadata("page", 0);
        vec![
            Chunk::from_parent(&parent, "first chunk".to_string()),
            Chunk::from_parent(&parent, "second chunk".to_string()),
        ]
    }

    #[test]
    fn test_text_chunks() {
        let output = TextFormatter.format_chunks("report.pdf", &sample_chunks());
        assert!(output.contains("Produced 2 chunks"));
        assert!(output.contains("page=0, source=report.pdf"));
        assert!(output.contains("second chunk"));
    }

    #[test]
    fn test_json_chunks_are_parseable() {
        let output = JsonFormatter::new(false).format_chunks("report.pdf", &sample_chunks());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["chunks"][1]["metadata"]["source"], "report.pdf");
    }

    #[test]
    fn test_empty_chunks() {
        assert!(
            MarkdownFormatter
                .format_chunks("a.txt", &[])
                .contains("No chunks produced")
        );
    }

    #[test]
    fn test_vector_preview_truncates() {
        assert_eq!(vector_preview(&[0.5, 1.0]), "[0.5000, 1.0000]");
        assert!(vector_preview(&[0.0; 20]).ends_with(", ...]"));
    }

    #[test]
    fn test_ingest_stats_formats() {
        let stats = IngestStats {
            files_scanned: 3,
            files_ingested: 2,
            files_skipped: 1,
            chunks_created: 10,
            ..Default::default()
        };
        assert!(
            TextFormatter
                .format_ingest_stats(&stats)
                .contains("Files ingested: 2")
        );
        let json: serde_json::Value =
            serde_json::from_str(&JsonFormatter::new(true).format_ingest_stats(&stats)).unwrap();
        assert_eq!(json["chunks_created"], 10);
    }
}
