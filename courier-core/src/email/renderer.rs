//! Template rendering
//!
//! Templates are stored text (usually HTML) with `[Name]` placeholders.
//! Rendering is a single pass of plain substring replacement per
//! substitution; there is no escaping, no recursion, and unknown
//! placeholders are left as-is.
//!
//! Template bytes are decoded leniently: a leading UTF-8 byte order mark is
//! dropped and undecodable bytes become U+FFFD. Only a failed read is an error.

use std::collections::BTreeMap;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Template rendering error types
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to read template: {0}")]
    Read(#[from] std::io::Error),
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Placeholder substitution renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a new renderer
    pub fn new() -> Self {
        Self
    }

    /// Drain `stream` and substitute every `[key]` with its value
    pub async fn render<R>(
        &self,
        mut stream: R,
        substitutions: &BTreeMap<String, String>,
    ) -> Result<String, RenderError>
    where
        R: AsyncRead + Unpin,
    {
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).await?;
        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes.as_slice());
        let template = String::from_utf8_lossy(content);

        Ok(self.substitute(&template, substitutions))
    }

    /// Substitute placeholders in an in-memory template
    ///
    /// Keys are applied in map order; a value containing another key's
    /// placeholder is substituted again if that key comes later.
    pub fn substitute(&self, template: &str, substitutions: &BTreeMap<String, String>) -> String {
        let mut result = template.to_string();

        for (key, value) in substitutions {
            let placeholder = format!("[{}]", key);
            result = result.replace(&placeholder, value);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io::Cursor;

    fn data(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_render_welcome_template() {
        let renderer = TemplateRenderer::new();
        let stream = Cursor::new(b"<div>Welcome [UserName] to </div>".to_vec());

        let rendered = renderer
            .render(stream, &data(&[("UserName", "userTest")]))
            .await
            .unwrap();

        assert_eq!(rendered, "<div>Welcome userTest to </div>");
    }

    #[tokio::test]
    async fn test_render_drains_stream() {
        let renderer = TemplateRenderer::new();
        let mut stream = Cursor::new(b"Hello [Name]".to_vec());

        renderer
            .render(&mut stream, &data(&[("Name", "Ada")]))
            .await
            .unwrap();

        assert_eq!(stream.position(), 12);
    }

    #[tokio::test]
    async fn test_render_read_failure() {
        let renderer = TemplateRenderer::new();
        let stream = tokio_test::io::Builder::new()
            .read(b"<div>Welcome ")
            .read_error(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            ))
            .build();

        let result = renderer
            .render(stream, &data(&[("UserName", "userTest")]))
            .await;

        match result {
            Err(RenderError::Read(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset)
            }
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_render_replaces_undecodable_bytes() {
        let renderer = TemplateRenderer::new();
        let stream = Cursor::new(b"Caf\xe9 [Name]".to_vec());

        let rendered = renderer
            .render(stream, &data(&[("Name", "Ada")]))
            .await
            .unwrap();

        assert_eq!(rendered, "Caf\u{FFFD} Ada");
    }

    #[tokio::test]
    async fn test_render_strips_byte_order_mark() {
        let renderer = TemplateRenderer::new();
        let stream = Cursor::new(b"\xEF\xBB\xBF<div>[Name]</div>".to_vec());

        let rendered = renderer
            .render(stream, &data(&[("Name", "Ada")]))
            .await
            .unwrap();

        assert_eq!(rendered, "<div>Ada</div>");
    }

    #[tokio::test]
    async fn test_render_keeps_inner_byte_order_mark() {
        let renderer = TemplateRenderer::new();
        let stream = Cursor::new(b"a\xEF\xBB\xBFb".to_vec());

        let rendered = renderer.render(stream, &BTreeMap::new()).await.unwrap();

        assert_eq!(rendered, "a\u{FEFF}b");
    }

    #[rstest]
    #[case::repeated("[Name] loves [Name]", &[("Name", "Alice")], "Alice loves Alice")]
    #[case::multiple("[First] [Last]!", &[("First", "John"), ("Last", "Doe")], "John Doe!")]
    #[case::missing_key("Hello, [Name]!", &[("Other", "x")], "Hello, [Name]!")]
    #[case::case_sensitive("Hello, [name]!", &[("Name", "Ada")], "Hello, [name]!")]
    #[case::not_regex("a.b [x.y]", &[("x.y", "ok")], "a.b ok")]
    #[case::empty_value("Hi [Name].", &[("Name", "")], "Hi .")]
    fn test_substitute(
        #[case] template: &str,
        #[case] pairs: &[(&str, &str)],
        #[case] expected: &str,
    ) {
        let renderer = TemplateRenderer::new();
        assert_eq!(renderer.substitute(template, &data(pairs)), expected);
    }

    #[test]
    fn test_substitute_empty_map_is_identity() {
        let renderer = TemplateRenderer::new();
        let template = "<p>[Unused] stays</p>";

        assert_eq!(renderer.substitute(template, &BTreeMap::new()), template);
    }

    #[test]
    fn test_substitute_value_with_later_placeholder_is_expanded() {
        // "A" sorts before "B", so the value inserted for A is scanned for [B]
        let renderer = TemplateRenderer::new();
        let substitutions = data(&[("A", "[B]"), ("B", "bee")]);

        assert_eq!(renderer.substitute("[A]", &substitutions), "bee");
    }

    #[test]
    fn test_substitute_value_with_earlier_placeholder_is_kept() {
        let renderer = TemplateRenderer::new();
        let substitutions = data(&[("A", "ay"), ("B", "[A]")]);

        assert_eq!(renderer.substitute("[B]", &substitutions), "[A]");
    }
}
