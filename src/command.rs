use log::debug;

use crate::classify::classify;
use crate::config::ScriptConfig;
use crate::error::{CommandError, Result};
use crate::gate::{has_vue_extension, is_vue3_file};
use crate::generate::generate;
use crate::merge::{merge, MergeOutcome, ScriptEdit};
use crate::notification::StatusParams;

pub const GENERATE_COMMAND: &str = "vue-fast-script.generate";

/// Inputs of one generate invocation, as read from the editor.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub path: &'a str,
    pub text: &'a str,
    pub selection: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub edit: Option<ScriptEdit>,
    pub messages: Vec<StatusParams>,
}

pub fn run_generate(request: &GenerateRequest<'_>, config: &ScriptConfig) -> Result<CommandOutcome> {
    if !has_vue_extension(request.path) {
        return Err(CommandError::NotVueFile);
    }
    if !is_vue3_file(request.text) {
        return Err(CommandError::NotVue3);
    }

    let extraction = classify(request.selection, request.text);
    if extraction.is_empty() {
        return Err(CommandError::NothingFound);
    }
    debug!(
        "generating declarations for variables {:?} and events {:?}",
        extraction.variables, extraction.events
    );

    let content = generate(&extraction.variables, &extraction.events, config);
    let duration = config.message_duration_ms;

    let outcome = match merge(request.text, &content, config) {
        MergeOutcome::Added(edit) => CommandOutcome {
            edit: Some(edit),
            messages: vec![StatusParams::info("New script block added", duration)],
        },
        MergeOutcome::Updated {
            edit,
            new_variables,
            new_events,
        } => {
            let mut messages = Vec::new();
            if !new_variables.is_empty() {
                messages.push(StatusParams::info(
                    format!("New variables: {}", new_variables.join(", ")),
                    duration,
                ));
            }
            if !new_events.is_empty() {
                messages.push(StatusParams::info(
                    format!("New methods: {}", new_events.join(", ")),
                    duration,
                ));
            }
            messages.push(StatusParams::info("Script updated", duration));
            CommandOutcome {
                edit: Some(edit),
                messages,
            }
        }
        MergeOutcome::AlreadyDefined => CommandOutcome {
            edit: None,
            messages: vec![StatusParams::info(
                "Selection is already defined in the script",
                duration,
            )],
        },
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::EditMode;
    use crate::notification::StatusLevel;

    const SETUP_DOC: &str = "<template>\n  <button @click=\"save\">{{ count }}</button>\n</template>\n\n<script setup lang=\"ts\">\nimport { ref } from 'vue'\n</script>\n";

    fn run(path: &str, text: &str, selection: &str) -> Result<CommandOutcome> {
        run_generate(
            &GenerateRequest {
                path,
                text,
                selection,
            },
            &ScriptConfig::default(),
        )
    }

    fn messages(outcome: &CommandOutcome) -> Vec<&str> {
        outcome.messages.iter().map(|m| m.message.as_str()).collect()
    }

    #[test]
    fn test_rejects_non_vue_path() {
        assert_eq!(
            run("/app/main.ts", SETUP_DOC, "count"),
            Err(CommandError::NotVueFile)
        );
    }

    #[test]
    fn test_rejects_options_api() {
        let doc = "<template><p>{{ count }}</p></template>";
        let err = run("/app/App.vue", doc, "count").unwrap_err();

        assert_eq!(err, CommandError::NotVue3);
        assert_eq!(err.level(), StatusLevel::Error);
    }

    #[test]
    fn test_nothing_found() {
        for selection in ["", "foo-bar"] {
            let err = run("/app/App.vue", SETUP_DOC, selection).unwrap_err();
            assert_eq!(err, CommandError::NothingFound);
            assert_eq!(err.level(), StatusLevel::Info);
        }
    }

    #[test]
    fn test_new_variable_messages() {
        let outcome = run("/app/App.vue", SETUP_DOC, "count").unwrap();

        assert_eq!(outcome.edit.as_ref().unwrap().mode, EditMode::Replace);
        assert_eq!(
            messages(&outcome),
            vec!["New variables: count", "Script updated"]
        );
    }

    #[test]
    fn test_new_method_messages() {
        let outcome = run("/app/App.vue", SETUP_DOC, "save").unwrap();
        let edit = outcome.edit.as_ref().unwrap();

        assert!(edit.text.contains("function save() {\n  // TODO: implement save\n}"));
        assert!(!edit.text.contains("const save"));
        assert_eq!(messages(&outcome), vec!["New methods: save", "Script updated"]);
    }

    #[test]
    fn test_appends_block_when_missing() {
        let doc = "<template>\n  <p>{{ count }}</p>\n</template>\n<script>\nexport default { setup() { return {} } }\n";
        let outcome = run("/app/App.vue", doc, "count").unwrap();
        let edit = outcome.edit.unwrap();

        assert_eq!(edit.mode, EditMode::Insert);
        assert!(edit
            .apply(doc)
            .ends_with("\n<script setup lang=\"ts\">\nconst count = ref('');\n</script>"));
        assert_eq!(outcome.messages.len(), 1);
        assert_eq!(outcome.messages[0].message, "New script block added");
    }

    #[test]
    fn test_second_run_is_noop() {
        let first = run("/app/App.vue", SETUP_DOC, "count").unwrap();
        let updated = first.edit.unwrap().apply(SETUP_DOC);
        let second = run("/app/App.vue", &updated, "count").unwrap();

        assert!(second.edit.is_none());
        assert_eq!(
            messages(&second),
            vec!["Selection is already defined in the script"]
        );
    }

    #[test]
    fn test_error_status_uses_configured_duration() {
        let config = ScriptConfig {
            message_duration_ms: 500,
            ..ScriptConfig::default()
        };
        let status = CommandError::NotVue3.to_status(&config);

        assert_eq!(status.level, StatusLevel::Error);
        assert_eq!(status.duration_ms, 500);
    }
}
