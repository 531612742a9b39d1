use anyhow::{Context as _, Result};
use rust_embed::RustEmbed;
use tera::{Context, Tera};

use crate::types::TableRef;
use crate::utils::quote_ident;

#[derive(RustEmbed)]
#[folder = "src/assets/sql/"]
struct Queries;

pub fn get_query(template_name: &str, context: &Context) -> Result<String> {
    let file = Queries::get(template_name)
        .ok_or_else(|| anyhow::anyhow!("Failed to find query template: {}", template_name))?;

    let template_str = std::str::from_utf8(file.data.as_ref())
        .context("Failed to parse query template as UTF-8")?;

    Tera::default()
        .render_str(template_str, context)
        .context(format!("Failed to render query template '{}'", template_name))
}

/// Template context for a query about one table.
///
/// Provides `schema` and `table` as quoted literals for catalog filters,
/// `qualified` as a quoted identifier and, when given, `column` as a quoted identifier.
pub fn table_context(table: &TableRef, column: Option<&str>) -> Context {
    let mut context = Context::new();
    context.insert("schema", &table.schema_literal());
    context.insert("table", &table.name_literal());
    context.insert("qualified", &table.qualified());
    if let Some(column) = column {
        context.insert("column", &quote_ident(column));
    }
    context
}
