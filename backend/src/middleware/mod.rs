//! Handler and middleware composition
//!
//! A [`Handler`] is the terminal behaviour of a route. A [`Middleware`]
//! wraps a handler in another handler. [`compose`] stacks middlewares so
//! that the first one listed is the outermost: it runs first on the way in
//! and last on the way out.
//!
//! Handlers come in two shapes, picked when a route is registered:
//! [`Handler::no_context`] for handlers that ignore the request, and
//! [`Handler::with_context`] for handlers that take the request and the
//! [`RequestContext`] built up by the middlewares around them.

mod error;

pub use error::with_error_handler;

use crate::auth::Identity;
use crate::error::{ApiError, ApiResult};
use axum::{extract::Request, response::Response};
use std::{future::Future, pin::Pin, sync::Arc};

/// Boxed future returned by every handler
pub type HandlerFuture = Pin<Box<dyn Future<Output = ApiResult<Response>> + Send>>;

type NoContextFn = dyn Fn() -> HandlerFuture + Send + Sync;
type ContextFn = dyn Fn(Request, RequestContext) -> HandlerFuture + Send + Sync;

/// Per-request values produced by middlewares for the wrapped handler.
///
/// Lives for one handler invocation.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    identity: Option<Identity>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a verified identity
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// The verified identity, or 401 when the route was not wrapped in auth
    pub fn require_identity(&self) -> ApiResult<Identity> {
        self.identity
            .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))
    }
}

/// A route handler, tagged by call shape
#[derive(Clone)]
pub enum Handler {
    /// Ignores the request and its context
    NoContext(Arc<NoContextFn>),
    /// Receives the request and the context built by the middlewares
    WithContext(Arc<ContextFn>),
}

impl Handler {
    pub fn no_context<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Response>> + Send + 'static,
    {
        Handler::NoContext(Arc::new(move || Box::pin(f()) as HandlerFuture))
    }

    pub fn with_context<F, Fut>(f: F) -> Self
    where
        F: Fn(Request, RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ApiResult<Response>> + Send + 'static,
    {
        Handler::WithContext(Arc::new(move |request, ctx| {
            Box::pin(f(request, ctx)) as HandlerFuture
        }))
    }

    /// Invoke the handler in the shape it was registered with
    pub fn call(&self, request: Request, ctx: RequestContext) -> HandlerFuture {
        match self {
            Handler::NoContext(f) => f(),
            Handler::WithContext(f) => f(request, ctx),
        }
    }
}

/// Wraps a handler in another handler
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Handler) -> Handler + Send + Sync>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Handler) -> Handler + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The middleware that returns its handler unchanged
    pub fn identity() -> Self {
        Self::new(|handler| handler)
    }

    pub fn wrap(&self, handler: Handler) -> Handler {
        (self.0)(handler)
    }
}

/// Compose middlewares right to left; the first listed ends up outermost.
///
/// Composing nothing yields [`Middleware::identity`].
pub fn compose(middlewares: impl IntoIterator<Item = Middleware>) -> Middleware {
    let middlewares: Vec<Middleware> = middlewares.into_iter().collect();
    Middleware::new(move |handler| {
        middlewares
            .iter()
            .rev()
            .fold(handler, |wrapped, middleware| middleware.wrap(wrapped))
    })
}
