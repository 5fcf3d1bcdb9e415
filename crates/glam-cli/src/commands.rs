//! Subcommand implementations.
//!
//! Each command renders into a `String` so output can be tested without a
//! process; `main` prints it.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam_compiler::{analyze, CheckResult};
use glam_lexer::Lexer;
use glam_parser::Parser;
use glam_types::ast::{Program, Stmt};
use glam_types::{CompileErrors, GlamError, SourceFile, Type};
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Rendered output of a command and whether it found errors.
pub struct Outcome {
    pub output: String,
    pub failed: bool,
}

// ══════════════════════════════════════════════════════════════════════════════
// check
// ══════════════════════════════════════════════════════════════════════════════

/// One file's entry in the JSON report.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub result: CheckResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bindings: Vec<Binding>,
}

/// A top-level `let` and its checked type.
#[derive(Debug, Serialize)]
pub struct Binding {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

pub fn check_files(
    files: &[impl AsRef<Path>],
    format: OutputFormat,
    dump_types: bool,
) -> Result<Outcome, CliError> {
    let mut reports = Vec::with_capacity(files.len());
    for path in files {
        let path = path.as_ref();
        let source = read_source(path)?;
        reports.push(check_one(&path.display().to_string(), &source, dump_types));
    }
    let failed = reports.iter().any(|r| !r.result.success);
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&reports)? + "\n",
        OutputFormat::Text => render_text(&reports),
    };
    Ok(Outcome { output, failed })
}

/// Check a single in-memory source.
pub fn check_one(file: &str, source: &str, dump_types: bool) -> FileReport {
    let analysis = analyze(source, file);
    let bindings = match (&analysis.program, dump_types && analysis.type_checked) {
        (Some(program), true) => top_level_bindings(program),
        _ => Vec::new(),
    };
    debug!(file, errors = analysis.errors.total_errors, "checked");
    FileReport {
        file: file.to_string(),
        result: CheckResult::new(source, analysis.errors),
        bindings,
    }
}

/// Names and types of the top-level `let` declarations, in source order.
fn top_level_bindings(program: &Program) -> Vec<Binding> {
    program
        .stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Let(l) => {
                let ty = l
                    .value
                    .as_ref()
                    .and_then(|v| v.ty().cloned())
                    .unwrap_or_else(|| Type::from_annotation(&l.type_ann));
                Some(Binding {
                    name: l.name.name.clone(),
                    ty: ty.to_string(),
                })
            }
            _ => None,
        })
        .collect()
}

fn render_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    for report in reports {
        render_errors(&mut out, &report.result.errors);
        for binding in &report.bindings {
            let _ = writeln!(out, "{}: {}: {}", report.file, binding.name, binding.ty);
        }
        if report.result.success {
            let _ = writeln!(out, "{}: ok", report.file);
        }
    }
    out
}

fn render_errors(out: &mut String, errors: &CompileErrors) {
    for err in &errors.errors {
        let _ = writeln!(out, "{}:{err}", err.file);
        if !err.source_line.is_empty() {
            out.push_str(&caret_hint(err));
        }
    }
    let dropped = errors.total_errors.saturating_sub(errors.errors.len());
    if dropped > 0 {
        let _ = writeln!(out, "... and {dropped} more errors");
    }
}

/// The offending source line, carets under the span, and the message
/// centred beneath the carets.
fn caret_hint(err: &GlamError) -> String {
    let line_len = err.source_line.chars().count();
    let start = (err.span.start_col as usize).saturating_sub(1).min(line_len);
    let end = if err.span.end_line == err.span.start_line {
        (err.span.end_col as usize).min(line_len)
    } else {
        line_len
    };
    let width = end.saturating_sub(start).max(1);
    let mid = start + width / 2;
    let pad = mid.saturating_sub(err.message.chars().count() / 2);

    let mut hint = String::new();
    let _ = writeln!(hint, "    | {}", err.source_line);
    let _ = writeln!(hint, "    | {}{}", " ".repeat(start), "^".repeat(width));
    let _ = writeln!(hint, "    | {}{}", " ".repeat(pad), err.message);
    hint
}

// ══════════════════════════════════════════════════════════════════════════════
// ast / tokens
// ══════════════════════════════════════════════════════════════════════════════

pub fn print_ast(path: &Path) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    Ok(render_ast(&path.display().to_string(), &source))
}

pub fn render_ast(file: &str, source: &str) -> Outcome {
    let sf = SourceFile::new(file, source);
    let lex = Lexer::new(&sf).lex();
    let mut errors = lex.errors;
    let parsed = Parser::new(lex.tokens, &sf).parse();
    errors.extend(parsed.errors);

    let mut output = String::new();
    if let Some(program) = &parsed.program {
        let _ = writeln!(output, "{program:#?}");
    }
    render_errors(&mut output, &errors);
    Outcome {
        output,
        failed: errors.has_errors(),
    }
}

pub fn print_tokens(path: &Path) -> Result<Outcome, CliError> {
    let source = read_source(path)?;
    Ok(render_tokens(&path.display().to_string(), &source))
}

pub fn render_tokens(file: &str, source: &str) -> Outcome {
    let sf = SourceFile::new(file, source);
    let lex = Lexer::new(&sf).lex();
    let mut output = String::new();
    for token in &lex.tokens {
        let _ = writeln!(
            output,
            "{:>4}:{:<4} {:?}",
            token.span.start_line, token.span.start_col, token.kind
        );
    }
    render_errors(&mut output, &lex.errors);
    Outcome {
        output,
        failed: lex.errors.has_errors(),
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam_types::{ErrorCode, Span};

    #[test]
    fn text_report_for_valid_file() {
        let report = check_one("ok.glam", "let x: int = 1", false);
        let text = render_text(&[report]);
        assert_eq!(text, "ok.glam: ok\n");
    }

    #[test]
    fn text_report_shows_error_and_source_line() {
        let report = check_one("bad.glam", "let x: int = true", false);
        assert!(!report.result.success);
        let text = render_text(&[report]);
        assert!(text.starts_with("bad.glam:1:1: E201 [type] "), "{text}");
        assert!(text.contains("    | let x: int = true"));
    }

    #[test]
    fn caret_hint_marks_span_and_centres_message() {
        let err = GlamError::new(
            "t.glam",
            ErrorCode::TYPE_MISMATCH,
            "Expected string, got int.",
            Span::new(1, 17, 1, 17),
            "let b: string = a",
        );
        let expected = [
            "    | let b: string = a",
            "    |                 ^",
            "    |     Expected string, got int.",
        ]
        .join("\n");
        assert_eq!(caret_hint(&err), expected + "\n");
    }

    #[test]
    fn caret_hint_covers_whole_span() {
        let err = GlamError::new("t.glam", ErrorCode::TYPE_MISMATCH, "bad", Span::new(1, 5, 1, 7), "f(1, true)");
        let hint = caret_hint(&err);
        assert!(hint.contains("    |     ^^^\n"), "{hint}");
        assert!(hint.ends_with("    |     bad\n"), "{hint}");
    }

    #[test]
    fn dump_types_lists_bindings() {
        let report = check_one(
            "t.glam",
            "let n: int = 1\nlet f: (int) -> bool = fn(x: int): bool => x > n\nlet s: string?",
            true,
        );
        let text = render_text(&[report]);
        assert!(text.contains("t.glam: n: int\n"));
        assert!(text.contains("t.glam: f: (int) -> bool\n"));
        assert!(text.contains("t.glam: s: string?\n"));
    }

    #[test]
    fn dump_types_skipped_on_error() {
        let report = check_one("t.glam", "let n: int = true", true);
        assert!(report.bindings.is_empty());
    }

    #[test]
    fn json_report_is_flat() {
        let report = check_one("j.glam", "let b: bool = 1 < 2", true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["file"], "j.glam");
        assert_eq!(json["success"], true);
        assert_eq!(json["bindings"][0]["type"], "bool");
        assert_eq!(json["source_hash"].as_str().map(str::len), Some(64));
    }

    #[test]
    fn tokens_are_listed_with_positions() {
        let outcome = render_tokens("t.glam", "let a");
        assert!(!outcome.failed);
        assert!(outcome.output.contains("Let"));
        assert!(outcome.output.contains("Identifier(\"a\")"));
        assert!(outcome.output.contains("Eof"));
    }

    #[test]
    fn ast_reports_syntax_errors() {
        let outcome = render_ast("a.glam", "let = 1");
        assert!(outcome.failed);
        assert!(outcome.output.contains("E100"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = check_files(&["/nonexistent/file.glam"], OutputFormat::Text, false)
            .err()
            .expect("read should fail");
        assert!(matches!(err, CliError::Read { .. }));
    }
}
