//! String template rendering utilities.

pub struct TemplateVars;

impl TemplateVars {
    pub const URL: &'static str = "url";
}

pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}

/// Render every argument of a command line.
pub fn render_all(args: &[String], variables: &[(&str, &str)]) -> Vec<String> {
    args.iter().map(|arg| render(arg, variables)).collect()
}
