//! Generates Vue `<script setup>` declarations from an editor selection.
//!
//! A selected word becomes either a reactive value holder or, when it is bound
//! through an `@event="name"` attribute, a handler stub. The result is merged
//! into the component's first script block without redeclaring names that are
//! already there. Matching is done with regular expressions over raw text.

pub mod backend;
pub mod classify;
pub mod command;
pub mod config;
pub mod error;
pub mod gate;
pub mod generate;
pub mod lineindex;
pub mod merge;
pub mod notification;
pub mod script_block;

pub use classify::{classify, classify_token, Classification, Extraction};
pub use command::{run_generate, CommandOutcome, GenerateRequest, GENERATE_COMMAND};
pub use config::ScriptConfig;
pub use error::CommandError;
pub use generate::generate;
pub use merge::{merge, merge_with, EditMode, MergeOutcome, ScriptEdit};
pub use script_block::{PatternScanner, ScriptScanner};
