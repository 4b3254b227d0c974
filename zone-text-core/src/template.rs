use std::collections::BTreeMap;

use thiserror::Error;

/// Errors that can occur while rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A placeholder named a field that was not supplied.
    #[error("template field `{0}` was not supplied")]
    MissingField(String),
    /// An opening `{{` has no matching `}}`.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated { offset: usize },
    /// A placeholder with no field name, e.g. `{{ }}`.
    #[error("empty placeholder at byte {offset}")]
    EmptyPlaceholder { offset: usize },
}

/// Named values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    values: BTreeMap<String, String>,
}

impl Fields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Return the value for `name` if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Render `template`, replacing every `{{ name }}` placeholder with the
/// matching value from `fields`.
///
/// Whitespace inside the braces is ignored. Text outside placeholders is
/// copied verbatim and fields not referenced by the template are ignored.
pub fn render(template: &str, fields: &Fields) -> Result<String, RenderError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut consumed = 0;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let offset = consumed + start;
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(RenderError::Unterminated { offset })?;

        let name = after_open[..end].trim();
        if name.is_empty() {
            return Err(RenderError::EmptyPlaceholder { offset });
        }
        let value = fields
            .get(name)
            .ok_or_else(|| RenderError::MissingField(name.to_string()))?;
        out.push_str(value);

        let advance = start + 2 + end + 2;
        consumed += advance;
        rest = &rest[advance..];
    }

    out.push_str(rest);
    Ok(out)
}
