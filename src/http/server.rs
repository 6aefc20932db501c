//! HTTP server setup.
//!
//! # Responsibilities
//! - Collect handlers into an Axum Router
//! - Wire up middleware (panic recovery, request ID, tracing)
//! - Bind the listener and serve until Ctrl+C

use axum::{
    http::Method,
    routing::{on, MethodFilter},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::http::router::{HandlerFn, HttpRouter, RunMode, ServerError};
use crate::lifecycle::signals::shutdown_signal;

/// [`HttpRouter`] backed by Axum.
pub struct AxumRouter {
    router: Router,
    mode: RunMode,
    routes: Vec<(Method, String)>,
}

impl AxumRouter {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            mode: RunMode::default(),
            routes: Vec::new(),
        }
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[(Method, String)] {
        &self.routes
    }

    /// Finish the router with all middleware layers.
    ///
    /// A panicking handler becomes a 500 that still carries the request id.
    pub fn into_router(self) -> Router {
        self.router
            .layer(CatchPanicLayer::new())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }
}

impl Default for AxumRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpRouter for AxumRouter {
    fn set_mode(&mut self, mode: RunMode) {
        self.mode = mode;
    }

    fn register_handler(
        &mut self,
        method: Method,
        path: &str,
        handler: HandlerFn,
    ) -> Result<(), ServerError> {
        if !path.starts_with('/') {
            return Err(ServerError::InvalidPath {
                path: path.to_string(),
            });
        }

        if self.routes.iter().any(|(m, p)| *m == method && p == path) {
            return Err(ServerError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }

        let filter = MethodFilter::try_from(method.clone()).map_err(|_| {
            ServerError::UnsupportedMethod {
                method: method.clone(),
                path: path.to_string(),
            }
        })?;

        let router = std::mem::take(&mut self.router);
        self.router = router.route(path, on(filter, move || async move { handler() }));

        if self.mode == RunMode::Debug {
            tracing::debug!(method = %method, path = path, "Route registered");
        }
        self.routes.push((method, path.to_string()));
        Ok(())
    }

    async fn listen_and_serve(self, address: &str) -> Result<(), ServerError> {
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServerError::Serve)?;

        tracing::info!(
            address = %local_addr,
            mode = %self.mode,
            "Listening for connections"
        );

        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::IntoResponse,
    };
    use crate::http::request::X_REQUEST_ID;
    use axum::response::Response;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    fn text_handler(body: &'static str) -> HandlerFn {
        Arc::new(move || (StatusCode::OK, body).into_response())
    }

    #[tokio::test]
    async fn test_registered_handler_is_served() {
        let mut router = AxumRouter::new();
        router
            .register_handler(Method::GET, "/ping", text_handler("pong"))
            .unwrap();

        let response = router
            .into_router()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"pong");
    }

    #[tokio::test]
    async fn test_unknown_path_and_wrong_method() {
        let mut router = AxumRouter::new();
        router
            .register_handler(Method::GET, "/ping", text_handler("pong"))
            .unwrap();
        let app = router.into_router();

        let missing = app
            .clone()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let wrong_method = app
            .oneshot(Request::post("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let mut router = AxumRouter::new();
        router
            .register_handler(Method::GET, "/ping", text_handler("pong"))
            .unwrap();
        let app = router.into_router();

        let generated = app
            .clone()
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let id = &generated.headers()[X_REQUEST_ID];
        assert_eq!(id.to_str().unwrap().len(), 36);

        let supplied = app
            .oneshot(
                Request::get("/ping")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(supplied.headers()[X_REQUEST_ID], "abc-123");
    }

    #[test]
    fn test_duplicate_route_rejected() {
        let mut router = AxumRouter::new();
        router
            .register_handler(Method::GET, "/ping", text_handler("a"))
            .unwrap();
        let err = router
            .register_handler(Method::GET, "/ping", text_handler("b"))
            .unwrap_err();
        assert!(matches!(err, ServerError::DuplicateRoute { .. }));
        assert_eq!(router.routes().len(), 1);
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let mut router = AxumRouter::new();
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let err = router
            .register_handler(purge, "/cache", text_handler("x"))
            .unwrap_err();
        assert!(matches!(err, ServerError::UnsupportedMethod { .. }));
        assert!(router.routes().is_empty());
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_500() {
        let mut router = AxumRouter::new();
        let boom: HandlerFn = Arc::new(|| -> Response { panic!("boom") });
        router.register_handler(Method::GET, "/boom", boom).unwrap();
        router
            .register_handler(Method::GET, "/ping", text_handler("pong"))
            .unwrap();
        let app = router.into_router();

        let response = app
            .clone()
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key(X_REQUEST_ID));

        let after = app
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(after.status(), StatusCode::OK);
    }

    #[test]
    fn test_path_without_leading_slash_rejected() {
        let mut router = AxumRouter::new();
        let err = router
            .register_handler(Method::GET, "health", text_handler("x"))
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidPath { ref path } if path == "health"));
        assert!(router.routes().is_empty());
    }

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn register_with_logs(mode: RunMode) -> String {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut router = AxumRouter::new();
            router.set_mode(mode);
            router
                .register_handler(Method::GET, "/ping", text_handler("pong"))
                .unwrap();
        });
        logs.contents()
    }

    #[test]
    fn test_route_registration_logged_in_debug_mode() {
        let logs = register_with_logs(RunMode::Debug);
        assert!(logs.contains("Route registered"), "logs: {}", logs);
        assert!(logs.contains("/ping"), "logs: {}", logs);
    }

    #[test]
    fn test_route_registration_silent_in_release_mode() {
        let logs = register_with_logs(RunMode::Release);
        assert!(!logs.contains("Route registered"), "logs: {}", logs);
    }

    #[test]
    fn test_mode_is_recorded() {
        let mut router = AxumRouter::new();
        assert_eq!(router.mode(), RunMode::Debug);
        router.set_mode(RunMode::Release);
        assert_eq!(router.mode(), RunMode::Release);
    }

    #[tokio::test]
    async fn test_bind_failure_on_empty_port() {
        let err = AxumRouter::new()
            .listen_and_serve("0.0.0.0:")
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
