//! Host document the root component is mounted into

use crate::app::component::Component;
use crate::error::{CliError, Result};

/// Element id of the default mount point
pub const DEFAULT_MOUNT_ID: &str = "app";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub id: String,
    pub content: String,
    /// Name of the root component mounted here, if any
    pub mounted: Option<&'static str>,
}

/// A minimal page: a title and a flat list of body elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    elements: Vec<Element>,
}

impl Document {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
        }
    }

    /// The page the front-end is served in: a single empty `<div id="app">`
    pub fn host_page() -> Self {
        Self::new("Train Search").with_element("div", DEFAULT_MOUNT_ID)
    }

    pub fn with_element(mut self, tag: impl Into<String>, id: impl Into<String>) -> Self {
        self.elements.push(Element {
            tag: tag.into(),
            id: id.into(),
            content: String::new(),
            mounted: None,
        });
        self
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Elements that hold a mounted root component
    pub fn mounted(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.mounted.is_some())
    }

    /// Render `component` into the element matched by `selector` (`#<id>`),
    /// replacing its content. A document holds at most one root.
    pub fn mount(&mut self, selector: &str, component: &dyn Component) -> Result<&Element> {
        let id = parse_selector(selector)?;

        if let Some(existing) = self.mounted().next() {
            return Err(CliError::AlreadyMounted(existing.id.clone()));
        }

        let element = self
            .elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CliError::MountPointNotFound(id.to_string()))?;

        element.content = component.render();
        element.mounted = Some(component.name());

        Ok(element)
    }

    pub fn to_html(&self) -> String {
        let body: String = self
            .elements
            .iter()
            .map(|e| format!("    <{tag} id=\"{id}\">{}</{tag}>\n", e.content, tag = e.tag, id = escape(&e.id)))
            .collect();

        format!(
            "<!DOCTYPE html>\n<html>\n  <head>\n    <title>{}</title>\n  </head>\n  <body>\n{}  </body>\n</html>\n",
            escape(&self.title),
            body
        )
    }
}

/// Extract the element id from an `#id` selector
pub fn parse_selector(selector: &str) -> Result<&str> {
    match selector.strip_prefix('#') {
        Some(id) if !id.is_empty() && !id.contains(|c: char| c.is_whitespace() || c == '#') => {
            Ok(id)
        },
        _ => Err(CliError::InvalidSelector(selector.to_string())),
    }
}

/// Escape text for use inside HTML content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::app::component::App;

    #[test]
    fn test_parse_selector() {
        assert_eq!(parse_selector("#app").unwrap(), "app");
        for bad in ["app", "#", "#a b", ".app", "##app"] {
            assert!(matches!(parse_selector(bad), Err(CliError::InvalidSelector(_))), "{bad}");
        }
    }

    #[test]
    fn test_mount_renders_into_target() {
        let mut doc = Document::host_page().with_element("footer", "footer");

        doc.mount("#app", &App::new("http://localhost:8899")).unwrap();

        let app = doc.element_by_id("app").unwrap();
        assert!(!app.content.is_empty());
        assert_eq!(app.mounted, Some("App"));
        assert!(doc.element_by_id("footer").unwrap().content.is_empty());
        assert_eq!(doc.mounted().count(), 1);
    }

    #[test]
    fn test_mount_missing_target() {
        let mut doc = Document::new("empty");
        let err = doc.mount("#app", &App::new("http://localhost:8899")).unwrap_err();
        assert!(matches!(err, CliError::MountPointNotFound(ref id) if id == "app"));
    }

    #[test]
    fn test_mount_twice_rejected() {
        let mut doc = Document::host_page().with_element("div", "other");
        doc.mount("#app", &App::new("http://localhost:8899")).unwrap();

        let err = doc.mount("#other", &App::new("http://localhost:8899")).unwrap_err();

        assert!(matches!(err, CliError::AlreadyMounted(ref id) if id == "app"));
        assert!(doc.element_by_id("other").unwrap().mounted.is_none());
    }

    #[test]
    fn test_to_html() {
        let html = Document::host_page().to_html();
        assert!(html.contains("<title>Train Search</title>"));
        assert!(html.contains(r#"<div id="app"></div>"#));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
