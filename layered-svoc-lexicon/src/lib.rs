#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! English word tables for the layered-svoc engine.
//!
//! - [`Lexicon`] - closed-class lookups, lemmas, participle tests
//! - [`VerbClass`] / [`VerbClassSet`] - linking, raising, bridge and friends
//! - [`LexiconOverrides`] - TOML additions merged at startup
//!
//! The default tables are built once per process and shared through
//! [`Lexicon::shared`].

mod inflection;
mod lexicon;
mod overrides;
mod verb_class;
mod words;

pub use lexicon::{ClosedClass, Lexicon};
pub use overrides::{LexiconError, LexiconOverrides};
pub use verb_class::{VerbClass, VerbClassSet};
