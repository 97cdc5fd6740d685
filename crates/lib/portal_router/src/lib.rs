//! # portal_router
//!
//! Client-side router for Portal.
//!
//! A [`Navigator`] resolves paths against a [`RouteTable`], checks the session
//! for authenticated routes through a [`Backend`], fetches page and chrome
//! fragments and splices them into a [`Document`]. Navigations are
//! serialized: starting a new one cancels whatever is still in flight.

pub mod backend;
pub mod document;
pub mod error;
pub mod fragment;
pub mod navigator;
pub mod routes;

pub use backend::{Backend, HttpBackend, LoginOutcome, SessionCheck};
pub use document::{Binding, Document, MemoryDocument};
pub use error::RouterError;
pub use fragment::PageFragment;
pub use navigator::{Navigation, Navigator};
pub use routes::{Chrome, RouteTable};
