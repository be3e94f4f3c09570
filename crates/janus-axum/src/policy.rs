//! Route policies enforced downstream of the Janus layer.
//!
//! [`RequireAuthLayer`] is the strict half of the request gate: the Janus
//! layer only annotates requests, and this layer turns a missing annotation
//! into a rejection for the routes it wraps.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::error::AuthRejection;
use crate::extractors::AuthContextExt;
use janus_types::Role;

/// Tower layer that rejects requests without an authenticated context.
///
/// Apply it with `Router::route_layer` so `404`s for unknown paths are not
/// turned into `401`s.
#[derive(Debug, Clone, Default)]
pub struct RequireAuthLayer {
    required_role: Option<Role>,
}

impl RequireAuthLayer {
    /// Require any authenticated user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            required_role: None,
        }
    }

    /// Require an authenticated user holding `role`.
    #[must_use]
    pub fn role(role: Role) -> Self {
        Self {
            required_role: Some(role),
        }
    }

    /// Require an administrator.
    #[must_use]
    pub fn admin() -> Self {
        Self::role(Role::Admin)
    }
}

impl<S> Layer<S> for RequireAuthLayer {
    type Service = RequireAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAuthService {
            inner,
            required_role: self.required_role,
        }
    }
}

/// Service produced by [`RequireAuthLayer`].
#[derive(Debug, Clone)]
pub struct RequireAuthService<S> {
    inner: S,
    required_role: Option<Role>,
}

impl<S> Service<Request<Body>> for RequireAuthService<S>
where
    S: Service<Request<Body>, Response = Response>,
{
    type Response = Response;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let rejection = match req.extensions().get::<AuthContextExt>() {
            None => Some(AuthRejection::Unauthenticated),
            Some(ext) => match self.required_role {
                Some(role) if !ext.0.has_role(role) => {
                    Some(AuthRejection::InsufficientRole(role.to_string()))
                }
                _ => None,
            },
        };

        match rejection {
            Some(rejection) => ResponseFuture::Reject {
                response: Some(rejection.into_response()),
            },
            None => ResponseFuture::Inner {
                future: self.inner.call(req),
            },
        }
    }
}

pin_project! {
    /// Response future for [`RequireAuthService`].
    #[project = ResponseFutureProj]
    pub enum ResponseFuture<F> {
        Reject { response: Option<Response> },
        Inner { #[pin] future: F },
    }
}

impl<F, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response, E>>,
{
    type Output = Result<Response, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            ResponseFutureProj::Reject { response } => {
                Poll::Ready(Ok(response.take().expect("polled after completion")))
            }
            ResponseFutureProj::Inner { future } => future.poll(cx),
        }
    }
}
