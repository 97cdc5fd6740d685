//! Route table: which fragment each path renders, which paths need a
//! session, which paths hide the footer.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::Binding;

/// Path rendered for anything not in the table.
pub const NOT_FOUND_PATH: &str = "/404";

/// Where failed session checks and logouts land.
pub const LOGIN_PATH: &str = "/login";

/// Chrome fragment locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    pub header: String,
    pub footer: String,
    pub user_header: String,
    pub user_footer: String,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            header: "/components/header.html".into(),
            footer: "/components/footer.html".into(),
            user_header: "/components/userheader.html".into(),
            user_footer: "/components/userfooter.html".into(),
        }
    }
}

/// Header and footer fragments to show around a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub header: String,
    /// `None` hides the footer entirely.
    pub footer: Option<String>,
}

/// Static route table.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pages: BTreeMap<String, String>,
    authenticated: BTreeSet<String>,
    without_footer: BTreeSet<String>,
    page_scripts: BTreeMap<String, Binding>,
    components: Components,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::canonical()
    }
}

impl RouteTable {
    /// The application's route table.
    pub fn canonical() -> Self {
        let pages = [
            ("/", "/pages/home.html"),
            ("/register", "/pages/register.html"),
            (LOGIN_PATH, "/pages/login.html"),
            ("/dashboard", "/pages/dashboard.html"),
            ("/profile", "/pages/profile.html"),
            ("/history", "/pages/history.html"),
            (NOT_FOUND_PATH, "/pages/404.html"),
        ];
        let page_scripts = [
            (LOGIN_PATH, Binding::LoginForm),
            ("/register", Binding::RegisterForm),
            ("/dashboard", Binding::Dashboard),
        ];

        Self {
            pages: pages
                .into_iter()
                .map(|(path, fragment)| (path.to_string(), fragment.to_string()))
                .collect(),
            authenticated: ["/dashboard", "/profile", "/history"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            without_footer: [LOGIN_PATH, "/register"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            page_scripts: page_scripts
                .into_iter()
                .map(|(path, binding)| (path.to_string(), binding))
                .collect(),
            components: Components::default(),
        }
    }

    /// Replace or add the fragment for `path`.
    pub fn with_page(mut self, path: &str, fragment: &str) -> Self {
        self.pages.insert(path.to_string(), fragment.to_string());
        self
    }

    pub fn not_found_path(&self) -> &str {
        NOT_FOUND_PATH
    }

    pub fn login_path(&self) -> &str {
        LOGIN_PATH
    }

    /// Strip query and hash, then map unknown paths to the not-found path.
    pub fn resolve<'a>(&self, requested: &'a str) -> &'a str {
        let path = requested
            .split(['?', '#'])
            .next()
            .filter(|p| !p.is_empty())
            .unwrap_or("/");
        if self.pages.contains_key(path) {
            path
        } else {
            NOT_FOUND_PATH
        }
    }

    /// Fragment resource for a known path.
    pub fn fragment(&self, path: &str) -> Option<&str> {
        self.pages.get(path).map(String::as_str)
    }

    pub fn requires_auth(&self, path: &str) -> bool {
        self.authenticated.contains(path)
    }

    /// All paths that need a session.
    pub fn authenticated_paths(&self) -> impl Iterator<Item = &str> {
        self.authenticated.iter().map(String::as_str)
    }

    /// Header/footer for a (resolved) path.
    pub fn chrome(&self, path: &str) -> Chrome {
        let user = self.requires_auth(path);
        let header = if user {
            &self.components.user_header
        } else {
            &self.components.header
        };
        let footer = if self.without_footer.contains(path) {
            None
        } else if user {
            Some(self.components.user_footer.clone())
        } else {
            Some(self.components.footer.clone())
        };
        Chrome {
            header: header.clone(),
            footer,
        }
    }

    /// Interactive elements to bind once `path` is on screen.
    pub fn bindings(&self, path: &str) -> Vec<Binding> {
        let mut bindings = vec![Binding::HeaderLinks];
        if self.requires_auth(path) {
            bindings.push(Binding::LogoutControl);
        }
        if let Some(script) = self.page_scripts.get(path) {
            bindings.push(*script);
        }
        bindings
    }
}
