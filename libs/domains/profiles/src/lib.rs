//! Profiles Domain
//!
//! Registration and editing of user profiles, served both as a JSON API and
//! as server-rendered HTML pages.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────┐
//! │  Handlers  │  Pages    │  ← JSON API / HTML forms
//! └───────────┬────────────┘
//!             │
//!      ┌──────▼──────┐
//!      │   Service   │  ← Validation, email uniqueness
//!      └──────┬──────┘
//!             │
//!      ┌──────▼──────┐
//!      │ Repository  │  ← Data access (in-memory or PostgreSQL)
//!      └──────┬──────┘
//!             │
//!      ┌──────▼──────┐
//!      │   Models    │  ← User, inputs, response bodies
//!      └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_profiles::{
//!     handlers, pages,
//!     repository::InMemoryProfileRepository,
//!     service::ProfileService,
//! };
//!
//! let service = ProfileService::new(InMemoryProfileRepository::new());
//!
//! let api = handlers::router(service.clone());
//! let html = pages::router(service).expect("page templates parse");
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use error::{ProfileError, ProfileResult, WriteOp};
pub use handlers::ApiDoc;
pub use models::{ApiErrorBody, NewUser, ProfileForm, ProfileInput, User, WriteResponse};
pub use postgres::PgProfileRepository;
pub use repository::{InMemoryProfileRepository, ProfileRepository};
pub use service::ProfileService;
pub use validation::{Field, FieldError, FieldErrorKind, ValidationErrors, validate_profile};
