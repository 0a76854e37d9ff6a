//! Extensible scaffold writing traits.
//!
//! This module provides the [`ScaffoldWriter`] trait, a visitor over the
//! frozen model list. [`ScaffoldEmitter::visit`](super::ScaffoldEmitter::visit)
//! drives it; the Rust scaffold output is one implementation, the writers
//! below are others.

use crate::schema::{Field, Model};
use std::fmt::Result;

/// Visitor over extracted models.
///
/// Every method defaults to a no-op, so implementations only override the
/// callbacks they care about.
///
/// # Example
///
/// ```
/// use revenum_core::emit::ScaffoldWriter;
/// use revenum_core::schema::Model;
///
/// #[derive(Default)]
/// struct NameCollector(Vec<String>);
///
/// impl ScaffoldWriter for NameCollector {
///     fn write_model(&mut self, model: &Model) -> std::fmt::Result {
///         self.0.push(model.name.clone());
///         Ok(())
///     }
/// }
/// ```
pub trait ScaffoldWriter {
    /// Write the enum listing every model, before any model
    fn write_collection(&mut self, name: &str, models: &[Model]) -> Result {
        let _ = (name, models);
        Ok(())
    }

    /// Open a model scaffold
    fn write_model(&mut self, model: &Model) -> Result {
        let _ = model;
        Ok(())
    }

    /// Write one field of the model last opened
    fn write_field(&mut self, field: &Field) -> Result {
        let _ = field;
        Ok(())
    }

    /// Close a model scaffold
    fn end_model(&mut self, model: &Model) -> Result {
        let _ = model;
        Ok(())
    }
}

/// A no-op writer that discards all output
pub struct NullWriter;

impl ScaffoldWriter for NullWriter {}

/// A writer that collects statistics about the extracted schema
#[derive(Debug, Default)]
pub struct StatsWriter {
    /// Number of models
    pub model_count: usize,
    /// Number of fields
    pub field_count: usize,
    /// Number of models without any field
    pub empty_model_count: usize,
    /// Largest wire index seen
    pub max_index: Option<u32>,
}

impl ScaffoldWriter for StatsWriter {
    fn write_model(&mut self, model: &Model) -> Result {
        self.model_count += 1;
        if model.fields.is_empty() {
            self.empty_model_count += 1;
        }
        Ok(())
    }

    fn write_field(&mut self, field: &Field) -> Result {
        self.field_count += 1;
        self.max_index = self.max_index.max(Some(field.index));
        Ok(())
    }
}
