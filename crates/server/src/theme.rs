//! Tera templates for the server-rendered pages.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tera::{Tera, Value};
use tracing::debug;

/// Currency label prefixed to formatted prices.
const CURRENCY: &str = "EGP";

/// Template engine for the HTML pages.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load every `*.html` template under `template_dir`.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self { tera })
    }

    /// Engine with no templates (for testing).
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        Self::register_filters(&mut tera);
        Self { tera }
    }

    fn register_filters(tera: &mut Tera) {
        // "EGP 1,250,000", rounded to whole units
        tera.register_filter(
            "format_price",
            |value: &Value, _args: &HashMap<String, Value>| {
                let price = tera::try_get_value!("format_price", "value", f64, value);
                Ok(Value::String(format!(
                    "{CURRENCY} {}",
                    group_thousands(price.round(), 0)
                )))
            },
        );

        // "1,234.5 m²"
        tera.register_filter(
            "format_size",
            |value: &Value, _args: &HashMap<String, Value>| {
                let size = tera::try_get_value!("format_size", "value", f64, value);
                Ok(Value::String(format!("{} m²", group_thousands(size, 3))))
            },
        );

        tera.register_filter(
            "format_date",
            |value: &Value, _args: &HashMap<String, Value>| {
                let formatted = value
                    .as_str()
                    .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
                    .map(|dt| dt.format("%B %-d, %Y").to_string())
                    .unwrap_or_default();
                Ok(Value::String(formatted))
            },
        );
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|t| t == name)
    }

    /// Render a named template.
    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String> {
        self.tera
            .render(template, context)
            .with_context(|| format!("failed to render template {template}"))
    }

    /// Add a template from a string, replacing any with the same name.
    pub fn add_raw_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, content)
            .with_context(|| format!("invalid template {name}"))
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("templates", &self.tera.get_template_names().count())
            .finish()
    }
}

/// Format with `,` thousands separators and at most `max_fraction` decimals,
/// trailing zeros dropped.
fn group_thousands(value: f64, max_fraction: usize) -> String {
    let formatted = format!("{:.*}", max_fraction, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (formatted.as_str(), ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && !formatted.trim_matches(['0', '.']).is_empty() {
        "-"
    } else {
        ""
    };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
