//! # revenum-core
//!
//! A library for recovering a model schema from the enum reverse-mappings a
//! TypeScript build leaves in its compiled JavaScript, and for emitting Rust
//! scaffolds annotated with that schema.
//!
//! This crate provides the core functionality for:
//! - Scanning text for `e[e.Member = N]` reverse-mapping tokens
//! - Grouping those tokens into models and fields
//! - Rendering `#[derive(Model)]` struct scaffolds with type and index metadata
//!
//! ## Architecture
//!
//! The pipeline runs strictly forward:
//!
//! - [`scanner`]: Tokenizer producing `(name, index)` tokens in document order
//! - [`schema`]: State machine grouping tokens into [`Model`]s, plus
//!   identifier normalization
//! - [`emit`]: Scaffold rendering
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use revenum_core::{generate, EmitterConfig};
//!
//! let bundle = r#"
//!     e[e.Bool = 0] = "Bool", e[e.Int = 1] = "Int";
//!     e[e.Root = 0] = "Root", e[e.World = 1] = "World";
//!     e[e.World = 0] = "World";
//!     e[e.Time = 0] = "Time", e[e.GameEnded = 1] = "GameEnded";
//! "#;
//!
//! let rust = generate(bundle, &EmitterConfig::default());
//! assert!(rust.contains("struct World {"));
//! assert!(rust.contains("game_ended: (),"));
//! ```
//!
//! ## Extensibility
//!
//! The library provides several traits for customization:
//!
//! - [`TokenSource`]: Feed the schema builder from something other than the regex scanner
//! - [`ScaffoldWriter`]: Walk the extracted models for other outputs
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod emit;
pub mod error;
pub mod scanner;
pub mod schema;

// Re-export primary types for convenience
pub use emit::{EmitterConfig, NullWriter, ScaffoldEmitter, ScaffoldWriter, StatsWriter};
pub use error::{Error, Result};
pub use scanner::{read_artifact, Scanner, ScannerConfig, Token, TokenSource};
pub use schema::{build, Anomaly, Extraction, Field, Model, Phase, SchemaBuilder, Step, Termination};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scan `text` and build the model list
pub fn extract(text: &str) -> Extraction {
    build(Scanner::new().tokens(text))
}

/// Scan `text`, build the model list and render it as Rust scaffolds
pub fn generate(text: &str, config: &EmitterConfig) -> String {
    let extraction = extract(text);
    ScaffoldEmitter::with_config(config.clone()).render(extraction.models())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BUNDLE: &str = r#"
        !function(e){e[e.Bool=0]="Bool",e[e.Int=1]="Int",e[e.String=2]="String"}(p||(p={}));
        !function(e){e[e.Root=0]="Root",e[e.Player=3]="Player"}(m||(m={}));
        !function(e){e[e.World=0]="World",e[e.GameOptions=1]="GameOptions"}(r||(r={}));
        !function(e){e[e.Id=0]="Id",e[e.type=1]="type",e[e.Slot10=4]="Slot10"}(q||(q={}));
        !function(e){e[e.Stray=0]="Stray",e[e.Noise=1]="Noise"}(s||(s={}));
    "#;

    #[test]
    fn test_extract_bundle() {
        let extraction = extract(BUNDLE);
        let models = extraction.models();

        assert_eq!(models.len(), 2);
        assert_eq!((models[0].type_id, models[0].name.as_str()), (0, "Root"));
        assert_eq!((models[1].type_id, models[1].name.as_str()), (3, "Player"));
        assert_eq!(
            models[1].fields,
            vec![Field::new(0, "Id"), Field::new(1, "type"), Field::new(4, "Slot10")]
        );
        assert_eq!(extraction.skipped(), 3);
        assert_eq!(extraction.anomalies(), vec![Anomaly::ExtraFieldBlocks]);
    }

    #[test]
    fn test_generate_bundle() {
        let expected = "\
#[derive(Model)]
#[uncage(type = 0)]
struct Root {
    #[uncage(index = 0)]
    world: (),
    #[uncage(index = 1)]
    game_options: (),
}

#[derive(Model)]
#[uncage(type = 3)]
struct Player {
    #[uncage(index = 0)]
    id: (),
    #[uncage(index = 1)]
    r#type: (),
    #[uncage(index = 4)]
    slot_10: (),
}
";
        assert_eq!(generate(BUNDLE, &EmitterConfig::default()), expected);
    }

    #[test]
    fn test_generate_no_matches() {
        assert_eq!(generate("console.log('hi')", &EmitterConfig::default()), "");
    }

    #[test]
    fn test_generate_is_pure() {
        let config = EmitterConfig::new().collection("Models");
        assert_eq!(generate(BUNDLE, &config), generate(BUNDLE, &config));
    }
}
