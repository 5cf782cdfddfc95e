use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::ExportError;

/// Encode headers and rendered rows as CSV text: every cell quoted, embedded quotes
/// doubled, null cells as `""`, rows joined by `\n` without a trailing newline.
pub fn encode_csv(headers: &[String], rows: &[Vec<Option<String>>]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}
