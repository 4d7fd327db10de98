/// Admin credential checks and session extraction
pub mod auth;
/// Domain error to HTTP response mapping
pub mod error_handling;
