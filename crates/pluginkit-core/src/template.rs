//! `{{name}}` placeholder rendering for generated files.
//!
//! Templates are Handlebars in strict mode: a placeholder without a value is
//! an error rather than an empty string. Output is never HTML-escaped.

use std::collections::BTreeMap;

use handlebars::Handlebars;

use crate::error::{GenError, GenResult};

pub type Vars = BTreeMap<String, String>;

/// Named templates rendered against a [`Vars`] map.
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);
        Self { handlebars }
    }

    /// Register `template` under `name`, replacing any earlier registration.
    pub fn register(&mut self, name: &str, template: &str) -> GenResult<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| GenError::Template(format!("{name}: {e}")))
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.handlebars.has_template(name)
    }

    pub fn render(&self, name: &str, vars: &Vars) -> GenResult<String> {
        self.handlebars
            .render(name, vars)
            .map_err(|e| GenError::Template(format!("{name}: {e}")))
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an unregistered template string once.
pub fn render(template: &str, vars: &Vars) -> GenResult<String> {
    TemplateEngine::new()
        .handlebars
        .render_template(template, vars)
        .map_err(|e| GenError::Template(e.to_string()))
}
