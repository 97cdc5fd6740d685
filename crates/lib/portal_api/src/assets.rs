//! Static frontend: application shell, page fragments and chrome fragments.
//!
//! The static root has two halves. `public/` is served as-is, with the shell
//! as fallback. `protected/` is only reachable through the exact gated
//! routes in [`PROTECTED_PAGES`]; the file server never sees it, so no
//! spelling of a URL can reach those files without a session.

use std::path::{Path, PathBuf};

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::routes::PROTECTED_PAGES;

/// Shell served for any path that is not a file.
pub const INDEX_HTML: &str = "index.html";

/// Subdirectory of the static root served to everyone.
pub const PUBLIC_DIR: &str = "public";

/// Subdirectory of the static root holding the gated page fragments.
pub const PROTECTED_DIR: &str = "protected";

/// On-disk location of a gated page, e.g. `/pages/dashboard.html` maps to
/// `<root>/protected/pages/dashboard.html`.
pub fn protected_file(static_dir: &Path, page: &str) -> PathBuf {
    static_dir
        .join(PROTECTED_DIR)
        .join(page.trim_start_matches('/'))
}

/// Routes for the page fragments that sit behind the auth gate.
///
/// The caller layers the gate on top.
pub fn protected_pages<S>(static_dir: &Path) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    PROTECTED_PAGES.iter().fold(Router::new(), |router, &page| {
        router.route_service(page, ServeFile::new(protected_file(static_dir, page)))
    })
}

/// Everything under the public root, falling back to the shell.
pub fn static_files(static_dir: &Path) -> ServeDir<ServeFile> {
    let public = static_dir.join(PUBLIC_DIR);
    let shell = ServeFile::new(public.join(INDEX_HTML));
    ServeDir::new(public).fallback(shell)
}
