#![doc = include_str!("../README.md")]

// Modules the end-user will interact directly or indirectly with
pub mod cache;
pub mod config;
pub mod content;
pub mod errors;
pub mod navigation;
pub mod repository;
pub mod search;
pub mod tracker;

mod options;
mod service;

// Exports for end-users
pub use options::{DEFAULT_CACHE_TTL, DEFAULT_CONFIG_FILE, DocsOptions};
pub use service::{DocPage, DocsService, HOMEPAGE_SECTION, PageLookup};
