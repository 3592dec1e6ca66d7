use std::ops::Range;

use crate::config::ScriptConfig;
use crate::generate::{function_stub, value_holder};
use crate::script_block::{PatternScanner, ScriptScanner, SCRIPT_CLOSE_TAG};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Insert,
    Replace,
}

/// A single text edit over byte offsets of the document it was computed from.
/// Insert edits have an empty range at the insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEdit {
    pub mode: EditMode,
    pub range: Range<usize>,
    pub text: String,
}

impl ScriptEdit {
    pub fn apply(&self, document: &str) -> String {
        let mut updated = document.to_string();
        updated.replace_range(self.range.clone(), &self.text);
        updated
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The document had no script block; the generated one is appended.
    Added(ScriptEdit),
    /// The existing block gains the listed declarations.
    Updated {
        edit: ScriptEdit,
        new_variables: Vec<String>,
        new_events: Vec<String>,
    },
    /// Every generated name is already declared.
    AlreadyDefined,
}

impl MergeOutcome {
    pub fn edit(&self) -> Option<&ScriptEdit> {
        match self {
            MergeOutcome::Added(edit) | MergeOutcome::Updated { edit, .. } => Some(edit),
            MergeOutcome::AlreadyDefined => None,
        }
    }
}

pub fn merge(document: &str, new_script: &str, config: &ScriptConfig) -> MergeOutcome {
    merge_with(&PatternScanner, document, new_script, config)
}

/// Reconcile `new_script` (a generated block) with the first script block of
/// `document`. Existing declarations are never touched; only names missing
/// from the block are appended before its closing tag.
pub fn merge_with<S: ScriptScanner>(
    scanner: &S,
    document: &str,
    new_script: &str,
    config: &ScriptConfig,
) -> MergeOutcome {
    let Some(block) = scanner.find_script_block(document) else {
        let end = document.len();
        return MergeOutcome::Added(ScriptEdit {
            mode: EditMode::Insert,
            range: end..end,
            text: format!("\n{new_script}"),
        });
    };

    let existing = scanner.declared_names(block.text);
    let candidates = scanner.declared_names_in_order(new_script);

    let new_variables: Vec<String> = candidates
        .variables
        .into_iter()
        .filter(|name| !existing.contains_variable(name))
        .collect();
    let new_events: Vec<String> = candidates
        .functions
        .into_iter()
        .filter(|name| !existing.contains_function(name))
        .collect();

    if new_variables.is_empty() && new_events.is_empty() {
        return MergeOutcome::AlreadyDefined;
    }

    let mut text = block.body_without_close().to_string();
    for variable in &new_variables {
        text.push('\n');
        text.push_str(&value_holder(variable, config));
    }
    for event in &new_events {
        text.push_str("\n\n");
        text.push_str(&function_stub(event));
    }
    text.push('\n');
    text.push_str(SCRIPT_CLOSE_TAG);

    MergeOutcome::Updated {
        edit: ScriptEdit {
            mode: EditMode::Replace,
            range: block.range,
            text,
        },
        new_variables,
        new_events,
    }
}
