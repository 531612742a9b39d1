use anyhow::{Context as _, Result};
use rust_embed::RustEmbed;
use tera::{Context, Tera};

#[derive(RustEmbed)]
#[folder = "src/assets/env/"]
struct EnvFiles;

pub const DEFAULT_ENV_TEMPLATE: &str = "env.default.jinja";

pub fn get_env_file_with_defaults(template_name: &str) -> Result<String> {
    let file = EnvFiles::get(template_name)
        .ok_or_else(|| anyhow::anyhow!("Failed to find env file template: {}", template_name))?;

    let template_str =
        std::str::from_utf8(file.data.as_ref()).context("Failed to parse template as UTF-8")?;

    Tera::default()
        .render_str(template_str, &Context::new())
        .context("Failed to render env file")
}
