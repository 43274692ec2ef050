//! Ditherer - ordered dithering with live preview
//!
//! Command-line front end, watch-mode preview loop and HTTP preview server
//! around the `bayer-dither` engine.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
