//! UI components

/// A unit of the component tree that renders to HTML
pub trait Component {
    fn name(&self) -> &'static str;

    fn render(&self) -> String;
}

/// Root component of the Train Search front-end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    api_base: String,
}

impl App {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

impl Component for App {
    fn name(&self) -> &'static str {
        "App"
    }

    fn render(&self) -> String {
        format!(
            r#"<div class="train-search" data-api-base="{}"><h1>Train Search</h1></div>"#,
            super::document::escape(&self.api_base)
        )
    }
}
