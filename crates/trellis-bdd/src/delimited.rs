//! Minimal comma-separated record handling.
//!
//! Only what example files and selector lists need: comma separators,
//! double-quoted fields and `""` as an escaped quote. Records never span
//! lines.

use thiserror::Error;

/// Errors raised while splitting a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DelimitedError {
    /// A quoted field was not closed before the end of the record.
    #[error("unterminated quoted field starting at column {column}")]
    UnterminatedQuote {
        /// 1-based character column of the opening quote.
        column: usize,
    },
    /// Text followed a closing quote without a separator.
    #[error("unexpected character '{found}' after quoted field at column {column}")]
    TrailingCharacters {
        /// 1-based character column of the offending character.
        column: usize,
        /// The offending character.
        found: char,
    },
}

/// Split one record into its fields.
///
/// Unquoted fields are trimmed; quoted fields are taken verbatim between
/// their quotes.
pub(crate) fn split_record(line: &str) -> Result<Vec<String>, DelimitedError> {
    let mut fields = Vec::new();
    let mut chars = line.chars().enumerate().peekable();
    loop {
        while chars.next_if(|&(_, c)| is_blank(c)).is_some() {}
        let field = if let Some((start, _)) = chars.next_if(|&(_, c)| c == '"') {
            let value = read_quoted(&mut chars, start)?;
            while chars.next_if(|&(_, c)| is_blank(c)).is_some() {}
            if let Some(&(column, found)) = chars.peek().filter(|&&(_, c)| c != ',') {
                return Err(DelimitedError::TrailingCharacters {
                    column: column + 1,
                    found,
                });
            }
            value
        } else {
            let mut value = String::new();
            while let Some((_, c)) = chars.next_if(|&(_, c)| c != ',') {
                value.push(c);
            }
            value.trim_end().to_string()
        };
        fields.push(field);
        if chars.next().is_none() {
            return Ok(fields);
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn read_quoted<I>(
    chars: &mut std::iter::Peekable<I>,
    start: usize,
) -> Result<String, DelimitedError>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut value = String::new();
    while let Some((_, c)) = chars.next() {
        if c != '"' {
            value.push(c);
        } else if chars.next_if(|&(_, next)| next == '"').is_some() {
            value.push('"');
        } else {
            return Ok(value);
        }
    }
    Err(DelimitedError::UnterminatedQuote { column: start + 1 })
}

/// Render one record.
///
/// Each field comes with a flag forcing quotes; fields that would not split
/// back unchanged are quoted regardless.
pub(crate) fn join_record<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    fields
        .into_iter()
        .map(|(field, quote)| {
            if quote || needs_quotes(field) {
                format!("\"{}\"", field.replace('"', "\"\""))
            } else {
                field.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn needs_quotes(field: &str) -> bool {
    field.contains([',', '"']) || field.trim() != field
}
