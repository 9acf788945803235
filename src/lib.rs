#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Deterministic SVOC analysis around an external labeler.
//!
//! Before the labeler runs, [`Analyzer::prepare`] tokenizes the sentence
//! and resolves its verb chains. Afterwards [`Analyzer::analyze`] takes the
//! labeler's clause records and:
//!
//! 1. pins every element's text to an exact span of the sentence
//! 2. canonicalizes roles
//! 3. segments `V` elements to match the resolved chains, bracketing
//!    insertions and grouping predicates
//! 4. recomputes each clause's sentence pattern
//! 5. validates and repairs the tree in a bounded loop
//! 6. relabels long-distance extraction and runs diagnostic syntax tests
//!
//! ```
//! use layered_svoc::Analyzer;
//!
//! let analyzer = Analyzer::standard();
//! let analysis = analyzer
//!     .analyze_json(
//!         "She seems to be happy",
//!         r#"{"clauses":[{"clauseId":"main","type":"main","elements":[
//!             {"role":"S","text":"She","startIndex":0,"endIndex":3},
//!             {"role":"V","text":"seems to be","startIndex":4,"endIndex":15},
//!             {"role":"C","text":"happy","startIndex":16,"endIndex":21}
//!         ]}]}"#,
//!     )
//!     .unwrap();
//! let main = analysis.tree.main().unwrap();
//! assert_eq!(main.elements[1].text, "seems");
//! ```

mod chain_enforcer;
mod clause;
mod config;
mod display;
mod element;
mod errors;
mod gap_detector;
mod invariants;
mod parenthetical;
mod pattern;
mod pipeline;
mod predicate_group;
mod record;
mod repair;
mod role_normalizer;
mod span_reconciler;
mod syntax_tests;
mod to_infinitive;
mod token;
mod verb_chain;

pub use chain_enforcer::VerbChainEnforcer;
pub use clause::{Clause, ClauseTree, ClauseType, RoleProfile, SentencePattern, MAIN_CLAUSE_ID};
pub use config::{EngineConfig, ReconcileConfig};
pub use display::{ClauseDisplay, TreeDisplay};
pub use element::{ArrowType, Element, Role, RoleTag, Span};
pub use errors::{ConfigError, IngestError, IngestResult};
pub use gap_detector::{detect_gap, validate_clause_type, ClauseTypeCheck, Gap, GapDetector, GapRole};
pub use invariants::{InvariantValidator, Severity, Violation, ViolationCode, ViolationReport};
pub use parenthetical::ParentheticalMarker;
pub use pattern::{takes_verbal_complement, PatternClassifier};
pub use pipeline::{Analysis, Analyzer, PipelineStats, Prepared};
pub use predicate_group::PredicateGrouper;
pub use record::{ClauseRecord, ElementRecord, LabelerOutput};
pub use repair::{RepairAction, RepairLog, RepairLoop};
pub use role_normalizer::{normalize_role, RoleNormalizer};
pub use span_reconciler::{MatchStrategy, ReconcileOutcome, Reconciled, SpanReconciler};
pub use syntax_tests::{SyntaxTestEvidence, SyntaxTestRunner, TestStatus};
pub use to_infinitive::{
    is_incomplete_to_infinitive, is_to_infinitive, ToInfinitiveClassifier, ToInfinitiveFunction,
    ToInfinitiveReading,
};
pub use token::{PartOfSpeech, Token, Tokenizer};
pub use verb_chain::{
    chain_index_at, prompt_summary, ChainKind, ChainPart, ChainPartKind, Tense, VerbChain,
    VerbChainResolver, Voice,
};

// Re-export the word tables so callers need only one dependency
pub use layered_svoc_lexicon::{Lexicon, LexiconOverrides, VerbClass, VerbClassSet};
