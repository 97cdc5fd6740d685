//! The navigation state machine.
//!
//! One [`Navigator`] owns one [`Document`]. Each navigation resolves the
//! path, gates authenticated routes on a session check, fetches the page
//! fragment (falling back to the not-found page once), swaps it in as the only
//! active page, reloads the chrome and re-binds interactive elements.
//!
//! Navigations are serialized. Starting one cancels the one in flight, whose
//! pending network call is dropped at its next suspension point, and then
//! waits for the document before touching it. A navigation superseded after
//! mounting its page leaves that page and the old chrome in place; the newer
//! navigation holds the document next and replaces both.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, info, warn};
use portal_core::models::api::LoginRequest;
use tokio::sync::Mutex as AsyncMutex;
use tokio_util::sync::CancellationToken;

use crate::backend::{Backend, LOGIN_FAILED, LoginOutcome, SessionCheck};
use crate::document::{Binding, Document};
use crate::error::RouterError;
use crate::fragment::PageFragment;
use crate::routes::RouteTable;

/// Upper bound on any single network call made during a navigation.
pub const DEFAULT_NETWORK_TIMEOUT: Duration = Duration::from_secs(10);

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// `path` is on screen. For unknown or unloadable paths this is the
    /// not-found path.
    Rendered { path: String },
    /// The session check failed and the document was sent elsewhere.
    Redirected { to: String },
    /// A newer navigation took over before this one finished.
    Superseded,
    /// Neither the page nor the not-found page could be shown.
    Failed { path: String, reason: String },
}

pub struct Navigator<B, D> {
    routes: RouteTable,
    backend: B,
    document: AsyncMutex<D>,
    current: Mutex<CancellationToken>,
    timeout: Duration,
}

impl<B, D> Navigator<B, D>
where
    B: Backend,
    D: Document + Send,
{
    pub fn new(routes: RouteTable, backend: B, document: D) -> Self {
        Self {
            routes,
            backend,
            document: AsyncMutex::new(document),
            current: Mutex::new(CancellationToken::new()),
            timeout: DEFAULT_NETWORK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lock the document for inspection. Navigations wait while it is held.
    pub async fn document(&self) -> tokio::sync::MutexGuard<'_, D> {
        self.document.lock().await
    }

    pub fn into_document(self) -> D {
        self.document.into_inner()
    }

    /// Navigate to wherever the document currently is.
    pub async fn start(&self) -> Navigation {
        let location = self.document.lock().await.location().to_string();
        self.navigate(&location).await
    }

    /// Navigate to `requested` without touching history.
    pub async fn navigate(&self, requested: &str) -> Navigation {
        self.transition(requested, false).await
    }

    /// Back/forward landed on `path`; render it without a new history entry.
    pub async fn restore(&self, path: &str) -> Navigation {
        self.transition(path, false).await
    }

    /// An in-app link was activated.
    ///
    /// Only same-origin absolute paths are intercepted; anything else is
    /// left to the browser and yields `None`.
    pub async fn follow_link(&self, href: &str) -> Option<Navigation> {
        if !href.starts_with('/') || href.starts_with("//") {
            return None;
        }
        Some(self.transition(href, true).await)
    }

    /// Clear the local session, tell the server, and land on the login page.
    pub async fn logout(&self) {
        let token = self.supersede();
        let mut doc = self.document.lock().await;
        doc.clear_session_cache();
        match self.call(&token, self.backend.logout()).await {
            Ok(()) => info!("logged out"),
            Err(e) => warn!("logout request failed: {e}"),
        }
        doc.hard_redirect(self.routes.login_path());
    }

    /// Submit the login form.
    pub async fn submit_login(&self, request: LoginRequest) -> Result<LoginOutcome, RouterError> {
        let token = self.supersede();
        let mut doc = self.document.lock().await;
        let outcome = match self.call(&token, self.backend.login(&request)).await {
            Ok(outcome) => outcome,
            Err(RouterError::Superseded) => return Err(RouterError::Superseded),
            Err(e) => {
                warn!("login request failed: {e}");
                doc.show_error(LOGIN_FAILED);
                return Err(e);
            }
        };
        match &outcome {
            LoginOutcome::Accepted { user, redirect } => {
                info!("logged in as {}", user.email);
                doc.cache_session(user);
                doc.hard_redirect(redirect);
            }
            LoginOutcome::Rejected { message } => doc.show_error(message),
        }
        Ok(outcome)
    }

    async fn transition(&self, requested: &str, push: bool) -> Navigation {
        let token = self.supersede();
        let mut doc = self.document.lock().await;
        if token.is_cancelled() {
            return Navigation::Superseded;
        }
        if push {
            doc.push_history(requested);
        }
        match self.run(requested, &token, &mut *doc).await {
            Ok(navigation) => navigation,
            Err(RouterError::Superseded) => {
                debug!("navigation to {requested} superseded");
                Navigation::Superseded
            }
            Err(e) => Navigation::Failed {
                path: requested.to_string(),
                reason: e.to_string(),
            },
        }
    }

    async fn run(
        &self,
        requested: &str,
        token: &CancellationToken,
        doc: &mut D,
    ) -> Result<Navigation, RouterError> {
        let path = self.routes.resolve(requested);

        if self.routes.requires_auth(path) {
            match self.call(token, self.backend.validate_session()).await {
                Ok(SessionCheck::Valid(identity)) => {
                    debug!("session valid for {}", identity.email);
                }
                Ok(check) => {
                    info!("session {check:?} for {path}, redirecting to login");
                    doc.clear_session_cache();
                    return Ok(self.redirect_to_login(doc));
                }
                Err(RouterError::Superseded) => return Err(RouterError::Superseded),
                Err(e) => {
                    warn!("session check failed: {e}");
                    return Ok(self.redirect_to_login(doc));
                }
            }
        }

        let (path, mut page) = match self.load_page(path, token).await {
            Ok(page) => (path, page),
            Err(RouterError::Superseded) => return Err(RouterError::Superseded),
            Err(e) if path != self.routes.not_found_path() => {
                warn!("failed to load {path}: {e}");
                let fallback = self.routes.not_found_path();
                match self.load_page(fallback, token).await {
                    Ok(page) => (fallback, page),
                    Err(RouterError::Superseded) => return Err(RouterError::Superseded),
                    Err(e) => return Ok(self.fail(fallback, e)),
                }
            }
            Err(e) => return Ok(self.fail(path, e)),
        };

        doc.deactivate_pages();
        page.set_active(true);
        doc.mount_page(page);

        self.load_chrome(path, token, doc).await?;

        let bindings = self.routes.bindings(path);
        doc.bind(&bindings);
        if bindings.contains(&Binding::Dashboard) {
            match self.call(token, self.backend.current_user()).await {
                Ok(user) => doc.show_user(&user),
                Err(RouterError::Superseded) => return Err(RouterError::Superseded),
                Err(e) => {
                    warn!("failed to load user data: {e}");
                    doc.show_error("Failed to load user data");
                }
            }
        }

        debug!("rendered {path}");
        Ok(Navigation::Rendered {
            path: path.to_string(),
        })
    }

    async fn load_page(
        &self,
        path: &str,
        token: &CancellationToken,
    ) -> Result<PageFragment, RouterError> {
        let resource = self
            .routes
            .fragment(path)
            .ok_or_else(|| RouterError::UnknownRoute(path.to_string()))?;
        let html = self.call(token, self.backend.fetch_fragment(resource)).await?;
        PageFragment::parse(&html)
    }

    /// Chrome failures leave the previous chrome in place.
    async fn load_chrome(
        &self,
        path: &str,
        token: &CancellationToken,
        doc: &mut D,
    ) -> Result<(), RouterError> {
        let chrome = self.routes.chrome(path);

        match self.call(token, self.backend.fetch_fragment(&chrome.header)).await {
            Ok(html) => doc.set_header(html),
            Err(RouterError::Superseded) => return Err(RouterError::Superseded),
            Err(e) => warn!("failed to load header {}: {e}", chrome.header),
        }

        match chrome.footer {
            None => doc.set_footer(None),
            Some(footer) => match self.call(token, self.backend.fetch_fragment(&footer)).await {
                Ok(html) => doc.set_footer(Some(html)),
                Err(RouterError::Superseded) => return Err(RouterError::Superseded),
                Err(e) => warn!("failed to load footer {footer}: {e}"),
            },
        }
        Ok(())
    }

    fn redirect_to_login(&self, doc: &mut D) -> Navigation {
        let to = self.routes.login_path();
        doc.hard_redirect(to);
        Navigation::Redirected { to: to.to_string() }
    }

    fn fail(&self, path: &str, e: RouterError) -> Navigation {
        warn!("giving up on {path}: {e}");
        Navigation::Failed {
            path: path.to_string(),
            reason: e.to_string(),
        }
    }

    /// Cancel the navigation in flight and hand out a token for the next one.
    fn supersede(&self) -> CancellationToken {
        let mut current = lock(&self.current);
        current.cancel();
        *current = CancellationToken::new();
        current.clone()
    }

    /// Run a backend call under the navigation's token and the network timeout.
    async fn call<T>(
        &self,
        token: &CancellationToken,
        fut: impl Future<Output = Result<T, RouterError>>,
    ) -> Result<T, RouterError> {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(RouterError::Superseded),
            res = tokio::time::timeout(self.timeout, fut) => res.unwrap_or(Err(RouterError::Timeout)),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
