//! SellerMap - nearby sellers on a map
//!
//! This library provides the client core of the SellerMap app: a viewport
//! driven fetch loop that keeps the set of nearby sellers in sync with what
//! the map shows, together with the REST client, location and session
//! abstractions it depends on.
//!
//! # Modules
//!
//! - [`orchestrator`]: debounced, staleness-guarded viewport fetches
//! - [`api`]: reqwest client for the seller backend
//! - [`location`]: device location abstraction
//! - [`session`]: login state on top of a credential store
//! - [`geo`] / [`entity`]: data model
//! - [`config`] / [`logging`]: ambient setup shared with the CLI

use std::future::Future;
use std::pin::Pin;

pub mod api;
pub mod config;
pub mod entity;
pub mod geo;
pub mod location;
pub mod logging;
pub mod orchestrator;
pub mod session;

/// Boxed future type for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
