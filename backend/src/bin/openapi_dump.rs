//! Print the OpenAPI document as JSON, or YAML with `--yaml`.

use std::io::{self, Write};

use backend::doc::ApiDoc;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Export the REST API's OpenAPI document", version)]
struct CliArgs {
    /// Emit YAML instead of pretty-printed JSON.
    #[arg(long)]
    yaml: bool,
}

fn render(yaml: bool) -> Result<String> {
    let doc = ApiDoc::openapi();
    if yaml {
        doc.to_yaml().wrap_err("failed to render YAML")
    } else {
        doc.to_pretty_json().wrap_err("failed to render JSON")
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let rendered = render(args.yaml)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").wrap_err("failed to write document")?;
    Ok(())
}
