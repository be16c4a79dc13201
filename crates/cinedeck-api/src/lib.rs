//! API client library for cinedeck.
//!
//! Builds TMDB v3 request URLs from structured descriptors and fetches
//! their JSON bodies.

/// TMDB API client.
pub mod tmdb;
