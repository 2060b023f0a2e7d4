//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, bind, serve until shutdown)
//!     → request.rs (request ID, span fields)
//!     → middleware/ (CORS, request accounting)
//!     → handlers.rs (/, /health, /metrics) or merged business routes
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use handlers::{Endpoints, ShellState};
pub use request::X_REQUEST_ID;
pub use server::{ServiceShell, ShellError, ShellHandle};
