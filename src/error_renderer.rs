//! Error rendering using ariadne
//!
//! Parse errors are drawn against the formula text with the offending
//! position underlined. Every other error has no location and is printed as a
//! single line.

use crate::{Error, ParseError};
use ariadne::{ColorGenerator, IndexType, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<formula>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use formulon::{parse, render_error};
///
/// if let Err(e) = parse("1 + (2") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for logs and UIs)
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Parse(parse_error) => render_parse_error(parse_error, writer, use_color),
        other => writeln!(writer, "Error: {}", other),
    }
}

fn render_parse_error(
    error: &ParseError,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let start = error.position.min(error.input.len());
    let width = error.input[start..]
        .chars()
        .next()
        .map_or(0, char::len_utf8);
    let span = start..start + width;

    let config = ariadne::Config::default()
        .with_color(use_color)
        .with_index_type(IndexType::Byte);

    let message = error.kind.to_string();
    let mut report = Report::build(ReportKind::Error, (SOURCE_ID, span.clone()))
        .with_message(format!("Parse error at position {}", error.position))
        .with_config(config)
        .with_label(
            Label::new((SOURCE_ID, span))
                .with_message(&message)
                .with_color(colors.next()),
        );

    if let Some(help) = error.help() {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(error.input.as_str())), &mut *writer)
}
