//! Rust scaffold generation.
//!
//! Each extracted model becomes a struct carrying its protocol metadata as
//! attributes, with every field typed as a placeholder for a human to fill:
//!
//! ```text
//! #[derive(Model)]
//! #[uncage(type = 1)]
//! struct World {
//!     #[uncage(index = 0)]
//!     time: (),
//! }
//! ```
//!
//! Scaffolds are separated by a blank line. An empty model list renders to
//! an empty string.
//!
//! ## Extensibility
//!
//! The [`ScaffoldWriter`] trait receives the same walk over the models that
//! produces the Rust text, so other outputs (statistics, listings) reuse it.

mod writer;

use crate::schema::ident::field_ident;
use crate::schema::{Field, Model};
use std::fmt::Write as FmtWrite;

pub use writer::{NullWriter, ScaffoldWriter, StatsWriter};

/// Configuration for scaffold generation
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Indentation string (default: 4 spaces)
    pub indent_str: String,
    /// Derive macros on every struct (default: `Model`)
    pub derives: Vec<String>,
    /// Attribute carrying the type and index metadata (default: `uncage`)
    pub attribute: String,
    /// Emit `pub` structs and fields
    pub public: bool,
    /// Field type written for every member (default: `()`)
    pub placeholder: String,
    /// Name of an enum listing every model, emitted first when set
    pub collection: Option<String>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            derives: vec!["Model".to_string()],
            attribute: "uncage".to_string(),
            public: false,
            placeholder: "()".to_string(),
            collection: None,
        }
    }
}

impl EmitterConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }

    /// Adds a derive macro after the existing ones, skipping duplicates
    pub fn derive(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.derives.contains(&name) {
            self.derives.push(name);
        }
        self
    }

    /// Sets the metadata attribute name
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attribute = name.into();
        self
    }

    /// Sets whether structs and fields are `pub`
    pub fn public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Sets the placeholder field type
    pub fn placeholder(mut self, ty: impl Into<String>) -> Self {
        self.placeholder = ty.into();
        self
    }

    /// Emits a collection enum with the given name
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }
}

/// Renders extracted models as Rust scaffolds
#[derive(Debug, Clone, Default)]
pub struct ScaffoldEmitter {
    config: EmitterConfig,
}

impl ScaffoldEmitter {
    /// Creates an emitter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an emitter with custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Walk the models, calling `writer` for each element in output order
    pub fn visit(&self, models: &[Model], writer: &mut impl ScaffoldWriter) -> std::fmt::Result {
        if let Some(name) = &self.config.collection {
            if !models.is_empty() {
                writer.write_collection(name, models)?;
            }
        }

        for model in models {
            writer.write_model(model)?;
            for field in &model.fields {
                writer.write_field(field)?;
            }
            writer.end_model(model)?;
        }

        Ok(())
    }

    /// Render the scaffolds as a string
    pub fn render(&self, models: &[Model]) -> String {
        let mut output = String::new();
        self.write_to(models, &mut output)
            .expect("String write cannot fail");
        output
    }

    /// Write the scaffolds to a writer
    pub fn write_to(&self, models: &[Model], w: &mut impl FmtWrite) -> std::fmt::Result {
        let mut writer = RustScaffoldWriter::new(w, &self.config);
        self.visit(models, &mut writer)
    }
}

/// Default implementation of ScaffoldWriter, producing Rust source
struct RustScaffoldWriter<'a, W: FmtWrite> {
    writer: &'a mut W,
    config: &'a EmitterConfig,
    blocks: usize,
}

impl<'a, W: FmtWrite> RustScaffoldWriter<'a, W> {
    fn new(writer: &'a mut W, config: &'a EmitterConfig) -> Self {
        Self {
            writer,
            config,
            blocks: 0,
        }
    }

    fn visibility(&self) -> &'static str {
        if self.config.public {
            "pub "
        } else {
            ""
        }
    }

    /// Start a top-level item, separated from the previous one by a blank line
    fn begin_block(&mut self) -> std::fmt::Result {
        if self.blocks > 0 {
            writeln!(self.writer)?;
        }
        self.blocks += 1;
        Ok(())
    }
}

impl<W: FmtWrite> ScaffoldWriter for RustScaffoldWriter<'_, W> {
    fn write_collection(&mut self, name: &str, models: &[Model]) -> std::fmt::Result {
        self.begin_block()?;
        writeln!(self.writer, "#[derive(ModelCollection, Debug)]")?;
        writeln!(self.writer, "pub enum {} {{", name)?;
        for model in models {
            writeln!(
                self.writer,
                "{}{}({}),",
                self.config.indent_str, model.name, model.name
            )?;
        }
        writeln!(self.writer, "}}")
    }

    fn write_model(&mut self, model: &Model) -> std::fmt::Result {
        self.begin_block()?;
        if !self.config.derives.is_empty() {
            writeln!(self.writer, "#[derive({})]", self.config.derives.join(", "))?;
        }
        writeln!(
            self.writer,
            "#[{}(type = {})]",
            self.config.attribute, model.type_id
        )?;
        let vis = self.visibility();
        writeln!(self.writer, "{}struct {} {{", vis, model.name)
    }

    fn write_field(&mut self, field: &Field) -> std::fmt::Result {
        let vis = self.visibility();
        let indent = &self.config.indent_str;
        writeln!(
            self.writer,
            "{}#[{}(index = {})]",
            indent, self.config.attribute, field.index
        )?;
        writeln!(
            self.writer,
            "{}{}{}: {},",
            indent,
            vis,
            field_ident(&field.name),
            self.config.placeholder
        )
    }

    fn end_model(&mut self, _model: &Model) -> std::fmt::Result {
        writeln!(self.writer, "}}")
    }
}
