//! The document the router renders into.
//!
//! [`Document`] is the seam between navigation logic and whatever displays
//! the result. [`MemoryDocument`] keeps everything in memory; the CLI and the
//! tests render into it.

use portal_core::models::auth::User;

use crate::fragment::PageFragment;

/// Interactive element re-bound after each navigation, since the previous
/// bindings went away with the replaced markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Intercept in-app links in the header.
    HeaderLinks,
    /// The logout control of the user header.
    LogoutControl,
    LoginForm,
    RegisterForm,
    /// Load and show the session user's profile.
    Dashboard,
}

/// Rendering surface driven by the navigator.
pub trait Document {
    /// Current location path.
    fn location(&self) -> &str;

    /// Record a client-side transition in history.
    fn push_history(&mut self, path: &str);

    /// Remove the active marker from every mounted page.
    fn deactivate_pages(&mut self);

    /// Put `page` into the application container, replacing its content.
    fn mount_page(&mut self, page: PageFragment);

    fn set_header(&mut self, html: String);

    /// `None` empties the footer.
    fn set_footer(&mut self, html: Option<String>);

    fn bind(&mut self, bindings: &[Binding]);

    /// Full page load of `path`, discarding client state.
    fn hard_redirect(&mut self, path: &str);

    /// Remember the logged-in user locally.
    fn cache_session(&mut self, user: &User);

    /// Forget any locally remembered session.
    fn clear_session_cache(&mut self);

    fn show_error(&mut self, message: &str);

    fn show_user(&mut self, user: &User);
}

/// In-memory [`Document`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    location: String,
    history: Vec<String>,
    header: String,
    footer: Option<String>,
    pages: Vec<PageFragment>,
    bindings: Vec<Binding>,
    redirects: Vec<String>,
    session: Option<User>,
    errors: Vec<String>,
    shown_user: Option<User>,
}

impl MemoryDocument {
    /// A blank document whose location is `path`.
    pub fn new(path: &str) -> Self {
        Self {
            location: path.to_string(),
            history: vec![path.to_string()],
            header: String::new(),
            footer: None,
            pages: Vec::new(),
            bindings: Vec::new(),
            redirects: Vec::new(),
            session: None,
            errors: Vec::new(),
            shown_user: None,
        }
    }

    pub fn pages(&self) -> &[PageFragment] {
        &self.pages
    }

    pub fn active_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_active()).count()
    }

    /// The active page, if exactly one is marked.
    pub fn active_page(&self) -> Option<&PageFragment> {
        let mut active = self.pages.iter().filter(|p| p.is_active());
        match (active.next(), active.next()) {
            (Some(page), None) => Some(page),
            _ => None,
        }
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn footer(&self) -> Option<&str> {
        self.footer.as_deref()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Every hard redirect so far, oldest first.
    pub fn redirects(&self) -> &[String] {
        &self.redirects
    }

    pub fn cached_session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn shown_user(&self) -> Option<&User> {
        self.shown_user.as_ref()
    }
}

impl Document for MemoryDocument {
    fn location(&self) -> &str {
        &self.location
    }

    fn push_history(&mut self, path: &str) {
        self.location = path.to_string();
        self.history.push(path.to_string());
    }

    fn deactivate_pages(&mut self) {
        for page in &mut self.pages {
            page.set_active(false);
        }
    }

    fn mount_page(&mut self, page: PageFragment) {
        self.pages.clear();
        self.pages.push(page);
        self.shown_user = None;
    }

    fn set_header(&mut self, html: String) {
        self.header = html;
    }

    fn set_footer(&mut self, html: Option<String>) {
        self.footer = html;
    }

    fn bind(&mut self, bindings: &[Binding]) {
        self.bindings = bindings.to_vec();
    }

    fn hard_redirect(&mut self, path: &str) {
        self.location = path.to_string();
        self.redirects.push(path.to_string());
        // A full load starts from an empty document.
        self.pages.clear();
        self.bindings.clear();
        self.header.clear();
        self.footer = None;
        self.shown_user = None;
    }

    fn cache_session(&mut self, user: &User) {
        self.session = Some(user.clone());
    }

    fn clear_session_cache(&mut self) {
        self.session = None;
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_user(&mut self, user: &User) {
        self.shown_user = Some(user.clone());
    }
}
