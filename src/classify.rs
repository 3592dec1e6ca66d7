use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Variable(String),
    EventHandler(String),
}

/// Names pulled out of a selection. Holds at most one name in total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub variables: Vec<String>,
    pub events: Vec<String>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.events.is_empty()
    }
}

impl From<Option<Classification>> for Extraction {
    fn from(classification: Option<Classification>) -> Self {
        match classification {
            Some(Classification::Variable(name)) => Extraction {
                variables: vec![name],
                events: Vec::new(),
            },
            Some(Classification::EventHandler(name)) => Extraction {
                variables: Vec::new(),
                events: vec![name],
            },
            None => Extraction::default(),
        }
    }
}

/// Classify the trimmed selection. A token bound as `@event="token"` anywhere
/// in the document is an event handler, any other word token is a variable.
pub fn classify_token(selected_text: &str, full_text: &str) -> Option<Classification> {
    let token = selected_text.trim();
    if !WORD_RE.is_match(token) {
        return None;
    }

    if is_bound_to_event(token, full_text) {
        Some(Classification::EventHandler(token.to_string()))
    } else {
        Some(Classification::Variable(token.to_string()))
    }
}

pub fn classify(selected_text: &str, full_text: &str) -> Extraction {
    classify_token(selected_text, full_text).into()
}

fn is_bound_to_event(token: &str, full_text: &str) -> bool {
    let pattern = format!(r#"@[A-Za-z0-9_]+="{}""#, regex::escape(token));
    match Regex::new(&pattern) {
        Ok(regex) => regex.is_match(full_text),
        Err(err) => {
            log::warn!("could not build event pattern for `{token}`: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<template>
  <input v-model="count" />
  <button @click="save">Save</button>
  <form @submit="onSubmit"></form>
</template>"#;

    #[test]
    fn test_plain_token_is_variable() {
        assert_eq!(
            classify_token("count", TEMPLATE),
            Some(Classification::Variable("count".to_string()))
        );
    }

    #[test]
    fn test_event_bound_token_is_handler() {
        let extraction = classify("save", TEMPLATE);

        assert_eq!(extraction.events, vec!["save"]);
        assert!(extraction.variables.is_empty());
    }

    #[test]
    fn test_selection_is_trimmed() {
        assert_eq!(
            classify_token("  onSubmit\n", TEMPLATE),
            Some(Classification::EventHandler("onSubmit".to_string()))
        );
    }

    #[test]
    fn test_partial_event_value_is_variable() {
        // `sav` is not the exact value of any event attribute
        assert_eq!(
            classify_token("sav", TEMPLATE),
            Some(Classification::Variable("sav".to_string()))
        );
    }

    #[test]
    fn test_colon_binding_is_not_event() {
        let doc = r#"<comp :value="save" v-on:click="save" />"#;
        assert_eq!(
            classify_token("save", doc),
            Some(Classification::Variable("save".to_string()))
        );
    }

    #[test]
    fn test_invalid_selections_yield_nothing() {
        for selection in ["", "   ", "foo-bar", "a b", "save()", "count.value", "名前"] {
            let extraction = classify(selection, TEMPLATE);
            assert!(extraction.is_empty(), "selection {selection:?}");
        }
    }

    #[test]
    fn test_exactly_one_name() {
        for selection in ["count", "save", "onSubmit", "fresh_1"] {
            let extraction = classify(selection, TEMPLATE);
            assert_eq!(extraction.variables.len() + extraction.events.len(), 1);
        }
    }
}
