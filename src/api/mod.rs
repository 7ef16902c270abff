//! API module containing route handlers and initialization logic
//!
//! This module is responsible for:
//! - Registering and mapping the minimal endpoints of every application part
//! - Reading query string collections
//! - Initializing the API router and its middleware
//! - Providing API documentation through the index endpoint

/// Service-level handlers (health)
pub mod handlers;

/// API documentation and index endpoint
pub mod index;

/// Router initialization and configuration
pub mod init;

/// Versioned endpoint registration
pub mod minimal;

/// Query string helpers
pub mod query;

// Re-export the router initialization function for easier access
pub use init::initialize_router;
