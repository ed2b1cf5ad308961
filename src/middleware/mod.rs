// ABOUTME: HTTP middleware for cross-origin access control
// ABOUTME: Request tracing, timeouts, and request ids come from tower-http layers in the server

pub mod cors;

// CORS configuration
pub use cors::setup_cors;
