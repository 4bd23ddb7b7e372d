//! Mustache rendering of template bodies over a JSON context.
//!
//! Parsing, sections and the context stack come from `ramhorns`. The
//! [`Content`] impl here decides how JSON values look and behave so the
//! output matches mustache.js: HTML escaping on `{{name}}`, raw output on
//! `{{{name}}}` / `{{& name}}`, JavaScript number and array formatting, and
//! JavaScript truthiness for sections.

use ramhorns::encoding::Encoder;
use ramhorns::traits::ContentSequence;
use ramhorns::{Content, Section, Template};
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid template: {0}")]
    Template(#[from] ramhorns::Error),

    #[error("unsupported tag: {0}")]
    Unsupported(String),
}

/// Renders template bodies against a JSON context.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    escape_html: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { escape_html: true }
    }
}

impl Renderer {
    pub fn new(escape_html: bool) -> Self {
        Self { escape_html }
    }

    /// Render `template` against `context`.
    ///
    /// Names that resolve nowhere on the context stack render as empty text.
    pub fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        if template.contains("{{=") {
            return Err(RenderError::Unsupported("set delimiter".to_string()));
        }

        let source = strip_standalone_tags(template);
        let compiled = Template::new(source.as_ref())?;

        Ok(compiled.render(&Scope {
            value: context,
            escape_html: self.escape_html,
        }))
    }
}

/// Mustache drops lines that hold nothing but one section, inverted,
/// closing or comment tag, together with their line break.
fn strip_standalone_tags(template: &str) -> Cow<'_, str> {
    if !template.split_inclusive('\n').any(is_standalone_line) {
        return Cow::Borrowed(template);
    }

    Cow::Owned(
        template
            .split_inclusive('\n')
            .filter(|line| !is_standalone_line(line))
            .collect(),
    )
}

fn is_standalone_line(line: &str) -> bool {
    let tag = line.trim();
    let Some(inner) = tag
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
    else {
        return false;
    };

    !inner.contains("{{")
        && !inner.contains("}}")
        && matches!(inner.chars().next(), Some('#' | '^' | '/' | '!'))
}

/// One frame of the context stack.
#[derive(Clone, Copy)]
struct Scope<'v> {
    value: &'v Value,
    escape_html: bool,
}

impl<'v> Scope<'v> {
    fn wrap(&self, value: &'v Value) -> Scope<'v> {
        Scope {
            value,
            escape_html: self.escape_html,
        }
    }

    /// Resolve a dotted name inside this frame. Numeric segments index arrays.
    fn lookup(&self, name: &str) -> Option<Scope<'v>> {
        if name == "." {
            return Some(*self);
        }

        let mut current = self.value;
        for part in name.split('.') {
            current = match current {
                Value::Object(map) => map.get(part)?,
                Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(self.wrap(current))
    }
}

impl Content for Scope<'_> {
    fn is_truthy(&self) -> bool {
        is_truthy(self.value)
    }

    fn render_escaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        let text = display(self.value);
        if self.escape_html {
            encoder.write_unescaped(&escape_html(&text))
        } else {
            encoder.write_unescaped(&text)
        }
    }

    fn render_unescaped<E: Encoder>(&self, encoder: &mut E) -> Result<(), E::Error> {
        encoder.write_unescaped(&display(self.value))
    }

    fn render_section<C, E>(&self, section: Section<C>, encoder: &mut E) -> Result<(), E::Error>
    where
        C: ContentSequence,
        E: Encoder,
    {
        match self.value {
            Value::Array(items) => {
                for item in items {
                    section.with(&self.wrap(item)).render(encoder)?;
                }
                Ok(())
            }
            _ if self.is_truthy() => section.with(self).render(encoder),
            _ => Ok(()),
        }
    }

    fn render_inverse<C, E>(&self, section: Section<C>, encoder: &mut E) -> Result<(), E::Error>
    where
        C: ContentSequence,
        E: Encoder,
    {
        if self.is_truthy() {
            Ok(())
        } else {
            section.render(encoder)
        }
    }

    fn render_field_escaped<E: Encoder>(
        &self,
        _hash: u64,
        name: &str,
        encoder: &mut E,
    ) -> Result<bool, E::Error> {
        match self.lookup(name) {
            Some(field) => field.render_escaped(encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_unescaped<E: Encoder>(
        &self,
        _hash: u64,
        name: &str,
        encoder: &mut E,
    ) -> Result<bool, E::Error> {
        match self.lookup(name) {
            Some(field) => field.render_unescaped(encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_section<P, E>(
        &self,
        _hash: u64,
        name: &str,
        section: Section<P>,
        encoder: &mut E,
    ) -> Result<bool, E::Error>
    where
        P: ContentSequence,
        E: Encoder,
    {
        match self.lookup(name) {
            Some(field) => field.render_section(section, encoder).map(|_| true),
            None => Ok(false),
        }
    }

    fn render_field_inverse<P, E>(
        &self,
        _hash: u64,
        name: &str,
        section: Section<P>,
        encoder: &mut E,
    ) -> Result<bool, E::Error>
    where
        P: ContentSequence,
        E: Encoder,
    {
        match self.lookup(name) {
            Some(field) => field.render_inverse(section, encoder).map(|_| true),
            None => Ok(false),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// String form of a value as JavaScript would print it.
fn display(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Number(n) => Cow::Owned(display_number(n)),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Null => Cow::Borrowed(""),
        Value::Array(items) => Cow::Owned(
            items
                .iter()
                .map(|item| display(item).into_owned())
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Cow::Borrowed("[object Object]"),
    }
}

fn display_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    // `31.0` prints as `31`, like a JS number
    n.as_f64().map(|f| f.to_string()).unwrap_or_default()
}

fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'', '/', '`', '=']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
