use crate::config::ScriptConfig;
use crate::script_block::SCRIPT_CLOSE_TAG;

/// `const name = <empty value>;`
pub fn value_holder(name: &str, config: &ScriptConfig) -> String {
    format!("const {} = {};", name, config.empty_value)
}

/// Function declaration with an empty body and a TODO marker, no surrounding
/// newlines.
pub fn function_stub(name: &str) -> String {
    format!("function {name}() {{\n  // TODO: implement {name}\n}}")
}

pub fn script_open_tag(config: &ScriptConfig) -> String {
    format!("<script setup lang=\"{}\">", config.lang)
}

/// Render a complete script block declaring `variables` then `events`, in
/// input order.
pub fn generate(variables: &[String], events: &[String], config: &ScriptConfig) -> String {
    let mut content = script_open_tag(config);
    content.push('\n');

    for variable in variables {
        content.push_str(&value_holder(variable, config));
        content.push('\n');
    }

    for event in events {
        content.push('\n');
        content.push_str(&function_stub(event));
        content.push('\n');
    }

    content.push_str(SCRIPT_CLOSE_TAG);
    content
}
