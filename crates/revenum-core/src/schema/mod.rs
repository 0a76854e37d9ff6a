//! Schema recovery from a token stream.
//!
//! The artifact is assumed to be laid out as:
//!
//! 1. one unrelated enumeration (primitive kinds) that is discarded,
//! 2. one enumeration naming every model, its values being the type
//!    discriminants,
//! 3. one field enumeration per model, in the same order as (2).
//!
//! Every enumeration restarts at index 0, which is the only delimiter the
//! token stream carries. An index-0 token therefore counts a block start,
//! may switch phase, and is still ordinary data for the phase it lands in.
//!
//! [`SchemaBuilder`] is the state machine; [`build`] runs it over a whole
//! sequence and returns the frozen [`Extraction`].

pub mod ident;

use crate::scanner::Token;
use std::fmt;
use tracing::{debug, trace};

/// A field recovered from a model's field enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Wire index as declared
    pub index: u32,
    /// Raw member name
    pub name: String,
}

impl Field {
    /// Creates a new field
    pub fn new(index: u32, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

/// A model recovered from the type enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    /// Protocol type discriminant
    pub type_id: u32,
    /// Model name, verbatim
    pub name: String,
    /// Fields in document order
    pub fields: Vec<Field>,
}

impl Model {
    /// Creates a model with no fields
    pub fn new(type_id: u32, name: impl Into<String>) -> Self {
        Self {
            type_id,
            name: name.into(),
            fields: Vec::new(),
        }
    }
}

/// Builder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Dropping the leading enumeration, up to the second index-0 token
    SkippingHeader,
    /// Declaring one model per token
    BuildingTypes,
    /// Appending fields to `models[cursor]`
    BuildingFields {
        /// Model receiving fields; `None` until the first block opens
        cursor: Option<usize>,
    },
    /// A field block overran the model list; nothing more is consumed
    Done,
}

/// What a single [`SchemaBuilder::step`] did with its token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Dropped as part of the leading enumeration
    Skipped,
    /// Appended a new model
    ModelDeclared,
    /// Appended a field to the model at this position
    FieldAssigned {
        /// Position in the model list
        model: usize,
    },
    /// Opened a block past the last model; the builder is now done
    Stopped,
    /// Arrived after the builder finished
    Ignored,
}

/// How a build ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The token sequence ran out
    Exhausted,
    /// A field block started after the last model
    CursorOverrun,
}

/// A structural oddity noticed after the fact.
///
/// Anomalies never change the extracted models; they only explain why the
/// list may be shorter or emptier than expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    /// Fewer than two index-0 tokens were seen
    HeaderNeverClosed,
    /// Models were declared but no field block followed
    FieldPhaseNeverStarted,
    /// Input ended before these trailing models received a field block
    UncoveredModels {
        /// Number of models left without fields
        count: usize,
    },
    /// More field blocks than models; the rest of the input was dropped
    ExtraFieldBlocks,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::HeaderNeverClosed => {
                write!(f, "fewer than two enumerations found; nothing extracted")
            }
            Anomaly::FieldPhaseNeverStarted => {
                write!(f, "no field enumerations follow the model enumeration")
            }
            Anomaly::UncoveredModels { count } => {
                write!(f, "{} trailing model(s) received no field enumeration", count)
            }
            Anomaly::ExtraFieldBlocks => write!(
                f,
                "more field enumerations than models; remaining input ignored"
            ),
        }
    }
}

/// The frozen result of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    models: Vec<Model>,
    phase: Phase,
    termination: Termination,
    skipped: usize,
}

impl Extraction {
    /// Extracted models in declaration order
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Consumes the extraction, returning the models
    pub fn into_models(self) -> Vec<Model> {
        self.models
    }

    /// Phase the builder ended in
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// How the build ended
    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Number of tokens dropped as the leading enumeration
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Total number of fields across all models
    pub fn field_count(&self) -> usize {
        self.models.iter().map(|m| m.fields.len()).sum()
    }

    /// Explain a short or empty result
    pub fn anomalies(&self) -> Vec<Anomaly> {
        let mut found = Vec::new();

        match self.phase {
            Phase::SkippingHeader => found.push(Anomaly::HeaderNeverClosed),
            Phase::BuildingTypes => found.push(Anomaly::FieldPhaseNeverStarted),
            Phase::BuildingFields { cursor } => {
                let covered = cursor.map_or(0, |c| c + 1);
                let count = self.models.len().saturating_sub(covered);
                if count > 0 {
                    found.push(Anomaly::UncoveredModels { count });
                }
            }
            Phase::Done => {}
        }

        if self.termination == Termination::CursorOverrun {
            found.push(Anomaly::ExtraFieldBlocks);
        }

        found
    }
}

/// State machine turning tokens into models
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    phase: Phase,
    block_starts: usize,
    skipped: usize,
    termination: Termination,
    models: Vec<Model>,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaBuilder {
    /// Creates a builder in [`Phase::SkippingHeader`]
    pub fn new() -> Self {
        Self {
            phase: Phase::SkippingHeader,
            block_starts: 0,
            skipped: 0,
            termination: Termination::Exhausted,
            models: Vec::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Models built so far
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Returns true once no further tokens will be accepted
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Feed one token through the transition function.
    ///
    /// A token may be re-dispatched within the same step: the second index-0
    /// token closes the header and is then handled as a model declaration,
    /// and the index-0 token that ends the model run opens the first field
    /// block.
    pub fn step(&mut self, token: Token) -> Step {
        if self.phase == Phase::Done {
            return Step::Ignored;
        }

        if token.index == 0 {
            self.block_starts += 1;
        }

        loop {
            match self.phase {
                Phase::SkippingHeader => {
                    if self.block_starts < 2 {
                        self.skipped += 1;
                        return Step::Skipped;
                    }
                    debug!("Header closed after {} token(s)", self.skipped);
                    self.phase = Phase::BuildingTypes;
                }
                Phase::BuildingTypes => {
                    if token.index == 0 && !self.models.is_empty() {
                        debug!("Declared {} model(s); assigning fields", self.models.len());
                        self.phase = Phase::BuildingFields { cursor: None };
                        continue;
                    }
                    trace!("Model {} (type {})", token.name, token.index);
                    self.models.push(Model::new(token.index, token.name));
                    return Step::ModelDeclared;
                }
                Phase::BuildingFields { cursor } => {
                    let cursor = if token.index == 0 {
                        let next = cursor.map_or(0, |c| c + 1);
                        if next >= self.models.len() {
                            debug!("Field block {} has no model; stopping", next);
                            self.phase = Phase::Done;
                            self.termination = Termination::CursorOverrun;
                            return Step::Stopped;
                        }
                        next
                    } else {
                        match cursor {
                            Some(c) => c,
                            // Only an index-0 token can enter this phase
                            None => unreachable!("field phase entered without opening a block"),
                        }
                    };

                    trace!(
                        "Field {} = {} -> {}",
                        token.name,
                        token.index,
                        self.models[cursor].name
                    );
                    self.models[cursor]
                        .fields
                        .push(Field::new(token.index, token.name));
                    self.phase = Phase::BuildingFields {
                        cursor: Some(cursor),
                    };
                    return Step::FieldAssigned { model: cursor };
                }
                Phase::Done => return Step::Ignored,
            }
        }
    }

    /// Freeze the models built so far
    pub fn finish(self) -> Extraction {
        Extraction {
            models: self.models,
            phase: self.phase,
            termination: self.termination,
            skipped: self.skipped,
        }
    }
}

/// Run the builder over a token sequence.
///
/// Stops pulling from `tokens` as soon as the builder is done, so nothing
/// after the overrunning block is scanned.
pub fn build(tokens: impl IntoIterator<Item = Token>) -> Extraction {
    let mut builder = SchemaBuilder::new();

    for token in tokens {
        if builder.step(token) == Step::Stopped {
            break;
        }
    }

    let extraction = builder.finish();
    debug!(
        "Extracted {} model(s), {} field(s), {} header token(s) skipped",
        extraction.models().len(),
        extraction.field_count(),
        extraction.skipped()
    );
    extraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(pairs: &[(&str, u32)]) -> Vec<Token> {
        pairs.iter().map(|&(n, i)| Token::new(n, i)).collect()
    }

    fn model(type_id: u32, name: &str, fields: &[(u32, &str)]) -> Model {
        Model {
            type_id,
            name: name.to_string(),
            fields: fields.iter().map(|&(i, n)| Field::new(i, n)).collect(),
        }
    }

    #[test]
    fn test_two_model_scenario() {
        let extraction = build(tokens(&[
            ("A", 0),
            ("B", 1),
            ("Foo", 0),
            ("Bar", 1),
            ("id", 0),
            ("name", 1),
            ("id", 0),
            ("age", 1),
            ("id", 0),
        ]));

        assert_eq!(
            extraction.models(),
            &[
                model(0, "Foo", &[(0, "id"), (1, "name")]),
                model(1, "Bar", &[(0, "id"), (1, "age")]),
            ]
        );
        assert_eq!(extraction.termination(), Termination::CursorOverrun);
        assert_eq!(extraction.phase(), Phase::Done);
        assert_eq!(extraction.skipped(), 2);
    }

    #[test]
    fn test_steps_show_redispatch() {
        let mut builder = SchemaBuilder::new();
        let steps: Vec<Step> = tokens(&[
            ("Byte", 0),
            ("Root", 0),
            ("World", 1),
            ("world", 0),
            ("time", 0),
            ("late", 0),
        ])
        .into_iter()
        .map(|t| builder.step(t))
        .collect();

        assert_eq!(
            steps,
            vec![
                Step::Skipped,
                Step::ModelDeclared,
                Step::ModelDeclared,
                Step::FieldAssigned { model: 0 },
                Step::FieldAssigned { model: 1 },
                Step::Stopped,
            ]
        );
        assert!(builder.is_done());
        assert_eq!(builder.step(Token::new("after", 3)), Step::Ignored);
    }

    #[test]
    fn test_long_header_discarded() {
        let extraction = build(tokens(&[
            ("Bool", 0),
            ("Int", 1),
            ("Float", 2),
            ("String", 3),
            ("Map", 9),
            ("Root", 0),
            ("x", 0),
        ]));

        assert_eq!(extraction.skipped(), 5);
        assert_eq!(extraction.models(), &[model(0, "Root", &[(0, "x")])]);
    }

    #[test]
    fn test_non_contiguous_type_ids_and_indices() {
        let extraction = build(tokens(&[
            ("P", 0),
            ("Root", 0),
            ("Entity", 7),
            ("Action", 3),
            ("world", 0),
            ("options", 5),
            ("time", 0),
            ("hp", 4),
            ("hp_max", 2),
            ("kind", 0),
        ]));

        assert_eq!(
            extraction.models(),
            &[
                model(0, "Root", &[(0, "world"), (5, "options")]),
                model(7, "Entity", &[(0, "time"), (4, "hp"), (2, "hp_max")]),
                model(3, "Action", &[(0, "kind")]),
            ]
        );
        assert_eq!(extraction.termination(), Termination::Exhausted);
        assert!(extraction.anomalies().is_empty());
        assert_eq!(extraction.field_count(), 6);
    }

    #[test]
    fn test_empty_input() {
        let extraction = build(Vec::new());
        assert!(extraction.models().is_empty());
        assert_eq!(extraction.phase(), Phase::SkippingHeader);
        assert_eq!(extraction.anomalies(), vec![Anomaly::HeaderNeverClosed]);
    }

    #[test]
    fn test_single_block_yields_nothing() {
        let extraction = build(tokens(&[("A", 0), ("B", 1), ("C", 2)]));
        assert!(extraction.models().is_empty());
        assert_eq!(extraction.skipped(), 3);
        assert_eq!(extraction.anomalies(), vec![Anomaly::HeaderNeverClosed]);
    }

    #[test]
    fn test_models_without_fields() {
        let extraction = build(tokens(&[("A", 0), ("Root", 0), ("World", 1)]));
        assert_eq!(extraction.models().len(), 2);
        assert_eq!(extraction.anomalies(), vec![Anomaly::FieldPhaseNeverStarted]);
    }

    #[test]
    fn test_too_few_field_blocks() {
        let extraction = build(tokens(&[
            ("A", 0),
            ("Root", 0),
            ("World", 1),
            ("Player", 2),
            ("world", 0),
        ]));

        assert_eq!(extraction.models()[0].fields.len(), 1);
        assert!(extraction.models()[1].fields.is_empty());
        assert!(extraction.models()[2].fields.is_empty());
        assert_eq!(
            extraction.anomalies(),
            vec![Anomaly::UncoveredModels { count: 2 }]
        );
    }

    #[test]
    fn test_overrun_stops_consuming() {
        let mut pulled = 0;
        let source = tokens(&[
            ("A", 0),
            ("Root", 0),
            ("world", 0),
            ("extra", 0),
            ("never", 1),
            ("seen", 2),
        ]);
        let iter = source.into_iter().inspect(|_| pulled += 1);

        let extraction = build(iter);

        assert_eq!(pulled, 4);
        assert_eq!(extraction.models(), &[model(0, "Root", &[(0, "world")])]);
        assert_eq!(extraction.anomalies(), vec![Anomaly::ExtraFieldBlocks]);
    }

    #[test]
    fn test_deterministic() {
        let input = tokens(&[("A", 0), ("M", 0), ("N", 4), ("f", 0), ("g", 0), ("h", 1)]);
        assert_eq!(build(input.clone()), build(input));
    }

    #[test]
    fn test_anomaly_display() {
        let msg = Anomaly::UncoveredModels { count: 3 }.to_string();
        assert!(msg.contains('3'));
    }
}
