//! Core types and shared functionality for newsroom.
//!
//! This crate provides:
//! - Article store trait with a SQLite backend
//! - Unified error types
//! - Configuration structures and source/keyword definitions

pub mod config;
pub mod error;
pub mod store;

pub use config::{AppConfig, KeywordDef, SourceDef};
pub use error::Error;
pub use store::{Article, ArticleStore, KeywordArticle, NewArticle, NewKeywordArticle, NewsDb};
