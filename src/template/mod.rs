//! Email templates.
//!
//! This module provides:
//! - Descriptor and content types for repository templates
//! - Selection of one template by purpose tag and market
//! - Mustache-style rendering of template bodies
//! - The remote template repository client
//!
//! # Example
//!
//! ```ignore
//! let directory = repository.list_templates().await?;
//! let chosen = select_template(&directory, "welcomecustomer", "IT");
//!
//! if let Some(descriptor) = chosen {
//!     let content = repository.fetch_template(&descriptor.name).await?;
//!     let body = Renderer::default().render(&content.body, &json!({"order": details}))?;
//! }
//! ```

mod render;
mod repository;
mod selector;
mod types;

pub use render::{RenderError, Renderer};
pub use repository::{HttpTemplateRepository, RepositoryError, TemplateRepository};
pub use selector::{filter_by_market, filter_by_purpose, select_template};
pub use types::{TemplateContent, TemplateDescriptor};
