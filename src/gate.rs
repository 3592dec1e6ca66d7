use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref SCRIPT_SETUP_RE: Regex = Regex::new(r"(?i)<script\s+setup\b").unwrap();
    static ref VUE_IMPORT_RE: Regex = Regex::new(r#"(?i)from\s+['"]vue['"]"#).unwrap();
    static ref REACTIVE_API_RE: Regex =
        Regex::new(r"\b(ref|reactive|computed|watch|onMounted)\b").unwrap();
    static ref DEFINE_COMPONENT_RE: Regex = Regex::new(r"\bdefineComponent\b").unwrap();
    static ref SETUP_FN_RE: Regex = Regex::new(r"setup\(\s*\)\s*\{").unwrap();
}

pub const VUE_EXTENSION: &str = ".vue";

pub fn has_vue_extension(path: &str) -> bool {
    path.ends_with(VUE_EXTENSION)
}

/// Whether the component text uses Vue 3 `<script setup>` or the composition API.
pub fn is_vue3_file(content: &str) -> bool {
    if SCRIPT_SETUP_RE.is_match(content) {
        return true;
    }

    let has_vue3_imports = VUE_IMPORT_RE.is_match(content)
        && (REACTIVE_API_RE.is_match(content) || DEFINE_COMPONENT_RE.is_match(content));

    has_vue3_imports || SETUP_FN_RE.is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert!(has_vue_extension("/src/components/Counter.vue"));
        assert!(!has_vue_extension("/src/main.ts"));
        assert!(!has_vue_extension("/src/Counter.vue.bak"));
    }

    #[test]
    fn test_script_setup() {
        assert!(is_vue3_file("<script setup lang=\"ts\">\n</script>"));
        assert!(is_vue3_file("<SCRIPT  SETUP>\n</SCRIPT>"));
        assert!(!is_vue3_file("<script setupish>\n</script>"));
    }

    #[test]
    fn test_vue_import_needs_reactive_api() {
        assert!(is_vue3_file("import { ref } from 'vue'"));
        assert!(is_vue3_file("import { defineComponent } from \"vue\""));
        assert!(!is_vue3_file("import Vue from 'vue'\nexport default Vue.extend({})"));
        assert!(!is_vue3_file("const count = ref(0)"));
    }

    #[test]
    fn test_setup_function() {
        assert!(is_vue3_file("export default {\n  setup() {\n    return {}\n  }\n}"));
        assert!(!is_vue3_file("export default {\n  setup(props) {}\n}"));
    }

    #[test]
    fn test_options_api_is_rejected() {
        let content = "<template><p>{{ msg }}</p></template>\n<script>\nexport default {\n  data() { return { msg: 'hi' } }\n}\n</script>";
        assert!(!is_vue3_file(content));
    }
}
