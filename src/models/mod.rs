//! Data models for the food catalog.
//!
//! The persisted entity maps to the `foods` table via `sqlx::FromRow`; the
//! request and response shapes serialize as JSON via `serde`.

pub mod food;
