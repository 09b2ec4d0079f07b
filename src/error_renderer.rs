//! Error rendering using ariadne
//!
//! Syntax errors carry a byte span and are rendered as a report with the
//! offending source underlined. Security and runtime errors have no span
//! and render as a single line.

use std::io::Write;

use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};

use crate::{Diagnostic, Error, Severity};

const SOURCE_ID: &str = "<expression>";

/// Render an error to stderr
///
/// # Example
/// ```no_run
/// use warded::{Engine, EngineOptions, render_error};
///
/// let engine = Engine::new(EngineOptions::default());
///
/// let source = "1 + * 2";
/// if let Err(e) = engine.compile(source) {
///     render_error(source, &e.into());
/// }
/// ```
pub fn render_error(source: &str, error: &Error) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(source: &str, error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, true)
}

/// Render an error to a String (useful for logs, web UIs, etc.)
pub fn render_error_to_string(source: &str, error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// # Example
/// ```
/// use warded::{Engine, render_error_to_string_no_color};
///
/// let source = "(1 + 2";
/// let err = Engine::default().compile(source).unwrap_err();
/// let output = render_error_to_string_no_color(source, &err.into());
/// assert!(output.contains("P003"));
/// ```
pub fn render_error_to_string_no_color(source: &str, error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    source: &str,
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let diagnostic = error.to_diagnostic();
    match &diagnostic.span {
        Some(span) => render_report(source, &diagnostic, span.0.clone(), writer, use_color),
        None => render_line(&diagnostic, writer),
    }
}

fn render_line(diagnostic: &Diagnostic, writer: &mut dyn Write) -> std::io::Result<()> {
    match &diagnostic.code {
        Some(code) => writeln!(writer, "{}[{code}]: {}", diagnostic.severity, diagnostic.message)?,
        None => writeln!(writer, "{}: {}", diagnostic.severity, diagnostic.message)?,
    }
    if let Some(help) = &diagnostic.help {
        writeln!(writer, "help: {help}")?;
    }
    Ok(())
}

fn render_report(
    source: &str,
    diagnostic: &Diagnostic,
    span: std::ops::Range<usize>,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
    };

    // ariadne works in characters, spans are bytes.
    let span = char_offset(source, span.start)..char_offset(source, span.end);

    let mut report = Report::build(kind, (SOURCE_ID, span.clone()))
        .with_message(&diagnostic.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diagnostic.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((SOURCE_ID, span))
            .with_message(&diagnostic.message)
            .with_color(colors.next()),
    );

    if let Some(help) = &diagnostic.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

fn char_offset(source: &str, byte: usize) -> usize {
    let byte = byte.min(source.len());
    source
        .char_indices()
        .take_while(|(i, _)| *i < byte)
        .count()
}
