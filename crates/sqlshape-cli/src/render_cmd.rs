use crate::cli::RenderArgs;
use crate::config::{OutputFormat, ProjectConfig, Settings};
use crate::input::read_inputs;
use anyhow::Context;
use sqlshape::{Statement, render_with};
use std::fmt::Write as _;

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let project = ProjectConfig::load(args.config, args.config_explicit)?;
    let settings = Settings::resolve(&project.file, args.max_depth, args.format);

    let inputs = read_inputs(&args.files, &settings.render)?;
    if inputs.is_empty() {
        anyhow::bail!("no clause maps to render");
    }

    let mut out = String::new();
    for (i, input) in inputs.iter().enumerate() {
        let stmt = render_with(&input.map, &settings.render)
            .with_context(|| format!("{}: failed to render", input.source))?;
        if i > 0 && settings.format == OutputFormat::Text {
            out.push('\n');
        }
        out.push_str(&format_statement(&stmt, settings.format)?);
    }

    print!("{out}");
    Ok(())
}

pub fn format_statement(stmt: &Statement, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut s = serde_json::to_string_pretty(stmt)?;
            s.push('\n');
            Ok(s)
        }
        OutputFormat::Text => {
            let mut s = String::new();
            writeln!(s, "{}", stmt.text())?;
            for (i, value) in stmt.values().iter().enumerate() {
                writeln!(s, "${} = {}", i + 1, value.to_json())?;
            }
            Ok(s)
        }
    }
}
