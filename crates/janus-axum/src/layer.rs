//! Tower middleware layer for Janus integration.
//!
//! The [`JanusLayer`] resolves bearer tokens into an [`AuthContext`] on the
//! request extensions. It never rejects a request itself: a missing or bad
//! token just leaves the context absent, and the route policies and
//! extractors downstream decide what that means. Responding identically to
//! absent and invalid credentials keeps verification failures opaque to
//! callers.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{header, Request};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::context::AuthContext;
use crate::extractors::AuthContextExt;
use janus_auth_core::SharedAuthService;

type ResolveFuture = Pin<Box<dyn Future<Output = Option<AuthContext>> + Send>>;

/// Pull the bearer token out of the Authorization header.
fn extract_bearer(req: &Request<Body>) -> Option<String> {
    let header = req.headers().get(header::AUTHORIZATION)?;
    let value = header.to_str().ok()?;
    value.strip_prefix("Bearer ").map(str::to_string)
}

/// Tower layer that adds Janus authentication to requests.
#[derive(Clone)]
pub struct JanusLayer {
    auth: SharedAuthService,
}

impl JanusLayer {
    /// Create a new Janus layer backed by the given auth service.
    #[must_use]
    pub fn new(auth: SharedAuthService) -> Self {
        Self { auth }
    }
}

impl<S> Layer<S> for JanusLayer {
    type Service = JanusService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        JanusService {
            inner,
            auth: self.auth.clone(),
        }
    }
}

/// The Janus authentication service.
#[derive(Clone)]
pub struct JanusService<S> {
    inner: S,
    auth: SharedAuthService,
}

impl<S> Service<Request<Body>> for JanusService<S>
where
    S: Service<Request<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = JanusServiceFuture<S>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        // Hand the polled-ready instance to the future, keep the clone
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);

        let token = extract_bearer(&req);
        let auth = self.auth.clone();
        let future: ResolveFuture = Box::pin(async move {
            let token = token?;
            let resolution = auth.resolve_bearer(&token).await.ok()?;
            Some(AuthContext::for_user(&resolution.user))
        });

        JanusServiceFuture {
            state: FutureState::Resolving {
                future,
                inner: Some(inner),
                req: Some(req),
            },
        }
    }
}

pin_project! {
    /// Future for the Janus service.
    pub struct JanusServiceFuture<S>
    where
        S: Service<Request<Body>>,
    {
        #[pin]
        state: FutureState<S>,
    }
}

pin_project! {
    #[project = FutureStateProj]
    enum FutureState<S>
    where
        S: Service<Request<Body>>,
    {
        Resolving {
            future: ResolveFuture,
            inner: Option<S>,
            req: Option<Request<Body>>,
        },
        Calling {
            #[pin]
            future: S::Future,
        },
    }
}

impl<S> Future for JanusServiceFuture<S>
where
    S: Service<Request<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Output = Result<S::Response, S::Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        loop {
            let this = self.as_mut().project();

            match this.state.project() {
                FutureStateProj::Resolving { future, inner, req } => {
                    let context = match future.as_mut().poll(cx) {
                        Poll::Ready(context) => context,
                        Poll::Pending => return Poll::Pending,
                    };

                    let mut request = req.take().expect("polled after completion");
                    if let Some(ctx) = context {
                        tracing::debug!(username = %ctx.username, "request authenticated");
                        request.extensions_mut().insert(AuthContextExt(ctx));
                    }

                    let mut service = inner.take().expect("polled after completion");
                    let future = service.call(request);

                    self.set(JanusServiceFuture {
                        state: FutureState::Calling { future },
                    });
                }
                FutureStateProj::Calling { future } => {
                    return future.poll(cx);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;
    use std::sync::Arc;

    use axum::body::to_bytes;
    use axum::http::Response;
    use tower::ServiceExt;

    use janus_auth_core::{AuthPolicy, AuthService, SigningKey, TokenCodec};
    use janus_db::{CreateUser, InMemoryUserRepository, UserRepository};
    use janus_types::Role;

    async fn seeded_auth() -> (SharedAuthService, String) {
        let repo = Arc::new(InMemoryUserRepository::new());
        repo.create(CreateUser {
            id: uuid::Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$04$notarealhash".to_string(),
            roles: vec!["user".to_string()],
            enabled: true,
        })
        .await
        .unwrap();

        let codec = Arc::new(TokenCodec::new(
            SigningKey::new("0123456789abcdef0123456789abcdef").unwrap(),
            "janus-test",
            chrono::Duration::seconds(3600),
        ));
        let token = codec.issue("alice", &[Role::User]).unwrap();

        let repo: Arc<dyn UserRepository> = repo;
        let auth = Arc::new(AuthService::new(codec, repo, AuthPolicy::default()));
        (auth, token)
    }

    fn echo_service() -> impl Service<
        Request<Body>,
        Response = Response<Body>,
        Error = Infallible,
        Future: Send,
    > + Clone {
        tower::service_fn(|req: Request<Body>| async move {
            let body = match req.extensions().get::<AuthContextExt>() {
                Some(ext) => format!("user:{}", ext.0.username),
                None => "anon".to_string(),
            };
            Ok(Response::new(Body::from(body)))
        })
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_bearer_populates_context() {
        let (auth, token) = seeded_auth().await;
        let service = JanusLayer::new(auth).layer(echo_service());

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();

        let response = service.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "user:alice");
    }

    #[tokio::test]
    async fn test_missing_header_is_anonymous() {
        let (auth, _) = seeded_auth().await;
        let service = JanusLayer::new(auth).layer(echo_service());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = service.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "anon");
    }

    #[tokio::test]
    async fn test_garbage_bearer_is_anonymous() {
        let (auth, _) = seeded_auth().await;
        let service = JanusLayer::new(auth).layer(echo_service());

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();

        let response = service.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "anon");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_anonymous() {
        let (auth, token) = seeded_auth().await;
        let service = JanusLayer::new(auth).layer(echo_service());

        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, format!("Basic {token}"))
            .body(Body::empty())
            .unwrap();

        let response = service.oneshot(request).await.unwrap();
        assert_eq!(body_text(response).await, "anon");
    }

    #[test]
    fn test_extract_bearer() {
        let request = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_bearer(&request).as_deref(), Some("abc.def.ghi"));

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(extract_bearer(&request), None);
    }
}
