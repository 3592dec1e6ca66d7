use std::collections::HashSet;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCRIPT_BLOCK_RE: Regex = Regex::new(r"<script\b[^>]*>[\s\S]*?</script>").unwrap();
    static ref CONST_DECL_RE: Regex = Regex::new(r"const\s+([A-Za-z0-9_]+)\s*=").unwrap();
    static ref FUNCTION_DECL_RE: Regex =
        Regex::new(r"function\s+([A-Za-z0-9_]+)\s*\(").unwrap();
}

pub const SCRIPT_CLOSE_TAG: &str = "</script>";

/// The first `<script>...</script>` region of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptBlock<'a> {
    pub range: Range<usize>,
    pub text: &'a str,
}

impl<'a> ScriptBlock<'a> {
    /// Block text without its closing tag.
    pub fn body_without_close(&self) -> &'a str {
        self.text
            .strip_suffix(SCRIPT_CLOSE_TAG)
            .unwrap_or(self.text)
    }
}

/// Names declared in a piece of script text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredNames {
    pub variables: HashSet<String>,
    pub functions: HashSet<String>,
}

impl DeclaredNames {
    pub fn contains_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn contains_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}

/// Declared names in order of appearance, duplicates kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedNames {
    pub variables: Vec<String>,
    pub functions: Vec<String>,
}

impl From<OrderedNames> for DeclaredNames {
    fn from(names: OrderedNames) -> Self {
        Self {
            variables: names.variables.into_iter().collect(),
            functions: names.functions.into_iter().collect(),
        }
    }
}

/// Everything the merger needs to know about script text. The default
/// implementation is pattern based; a parser-backed scanner can replace it
/// without touching the merge logic.
pub trait ScriptScanner {
    fn find_script_block<'a>(&self, document: &'a str) -> Option<ScriptBlock<'a>>;

    fn declared_names_in_order(&self, script: &str) -> OrderedNames;

    fn declared_names(&self, script: &str) -> DeclaredNames {
        self.declared_names_in_order(script).into()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternScanner;

impl ScriptScanner for PatternScanner {
    fn find_script_block<'a>(&self, document: &'a str) -> Option<ScriptBlock<'a>> {
        SCRIPT_BLOCK_RE.find(document).map(|m| ScriptBlock {
            range: m.range(),
            text: m.as_str(),
        })
    }

    fn declared_names_in_order(&self, script: &str) -> OrderedNames {
        OrderedNames {
            variables: capture_names(&CONST_DECL_RE, script),
            functions: capture_names(&FUNCTION_DECL_RE, script),
        }
    }
}

fn capture_names(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}
