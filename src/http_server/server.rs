//! HTTP server
//!
//! Axum provides the listener loop and request framing only; every request
//! funnels through a single fallback service that asks the crate's own
//! [`Router`] for the handler. Handlers are boxed async closures receiving
//! the shared store, the optional bound path parameter, and the raw body.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::Logger;
use crate::router::{Binding, RouteMatch, Router, RouterError};
use crate::store::MemoryStore;

use super::config::HttpServerConfig;
use super::errors::ApiError;
use super::users_routes::register_users_routes;

/// Request body cap (1 MiB); CRUD payloads are small
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Everything a route handler gets to work with
pub struct RequestContext {
    pub store: Arc<MemoryStore>,
    /// Bound path parameter, present for dynamic routes only
    pub binding: Option<Binding>,
    /// Raw request body
    pub body: Bytes,
}

/// Boxed handler future
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Opaque handler stored in the route table
pub type Handler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// Wraps an async fn into a storable [`Handler`]
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// State shared across dispatches
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub routes: Router<Handler>,
}

/// HTTP server for the CRUD API
pub struct HttpServer {
    config: HttpServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new(store: Arc<MemoryStore>) -> Result<Self, RouterError> {
        Self::with_config(HttpServerConfig::default(), store)
    }

    /// Create a server with custom configuration
    pub fn with_config(
        config: HttpServerConfig,
        store: Arc<MemoryStore>,
    ) -> Result<Self, RouterError> {
        let mut routes = Router::new();
        register_users_routes(&mut routes)?;
        Ok(Self {
            config,
            state: Arc::new(AppState { store, routes }),
        })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Build the axum router (also the entry point for tests)
    pub fn router(&self) -> axum::Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        axum::Router::new()
            .fallback(dispatch)
            .with_state(Arc::clone(&self.state))
            .layer(cors)
    }

    /// Bind and serve until the process exits
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .expect("Invalid socket address");

        println!("Running server on {}", addr);
        println!("Available routes:");
        for route in self.state.routes.routes() {
            println!("  {}", route);
        }
        Logger::info("SERVER_STARTED", &[("addr", &addr.to_string())]);

        let router = self.router();
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Single entry point for every request: match, then run the handler
async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let method = request.method().as_str().to_string();
    let path = request.uri().path().to_string();

    match state.routes.find(&method, &path) {
        RouteMatch::Found { handler, binding } => {
            let handler = Arc::clone(handler);
            let body = match axum::body::to_bytes(request.into_body(), MAX_BODY_BYTES).await {
                Ok(bytes) => bytes,
                Err(err) => return ApiError::InvalidBody(err.to_string()).into_response(),
            };
            let ctx = RequestContext {
                store: Arc::clone(&state.store),
                binding,
                body,
            };
            handler(ctx).await
        }
        RouteMatch::NotFound => {
            Logger::warn("ROUTE_NOT_FOUND", &[("method", &method), ("path", &path)]);
            ApiError::RouteNotFound.into_response()
        }
    }
}
