//! Page fragments: the `.page` container extracted from fetched markup.

use scraper::{Html, Selector};

use crate::error::RouterError;

/// Class marking a page container.
pub const PAGE_CLASS: &str = "page";

/// Class marking the page currently on screen.
pub const ACTIVE_CLASS: &str = "active";

/// A page container lifted out of a fetched fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFragment {
    tag: String,
    /// Attributes other than `class`.
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    inner_html: String,
}

impl PageFragment {
    /// Extract the first `.page` element from `html`.
    ///
    /// Markup without one (an error page, the application shell served for a
    /// missing file) is malformed.
    pub fn parse(html: &str) -> Result<Self, RouterError> {
        let selector = Selector::parse(&format!(".{PAGE_CLASS}"))
            .map_err(|e| RouterError::MalformedFragment(format!("{e:?}")))?;
        let document = Html::parse_fragment(html);
        let element = document
            .select(&selector)
            .next()
            .ok_or_else(|| RouterError::MalformedFragment("no .page container".into()))?;

        let value = element.value();
        Ok(Self {
            tag: value.name().to_string(),
            attrs: value
                .attrs()
                .filter(|(name, _)| *name != "class")
                .map(|(name, v)| (name.to_string(), v.to_string()))
                .collect(),
            classes: value.classes().map(str::to_string).collect(),
            inner_html: element.inner_html(),
        })
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name == "id")
            .map(|(_, v)| v.as_str())
    }

    pub fn is_active(&self) -> bool {
        self.classes.iter().any(|c| c == ACTIVE_CLASS)
    }

    pub fn set_active(&mut self, active: bool) {
        self.classes.retain(|c| c != ACTIVE_CLASS);
        if active {
            self.classes.push(ACTIVE_CLASS.to_string());
        }
    }

    pub fn inner_html(&self) -> &str {
        &self.inner_html
    }

    /// Serialize back to markup.
    pub fn to_html(&self) -> String {
        let mut out = format!("<{}", self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
        }
        if !self.classes.is_empty() {
            out.push_str(&format!(" class=\"{}\"", escape_attr(&self.classes.join(" "))));
        }
        out.push('>');
        out.push_str(&self.inner_html);
        out.push_str(&format!("</{}>", self.tag));
        out
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
