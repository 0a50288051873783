use anyhow::Context;
use serde_json::Value as JsonValue;
use sqlshape::{ClauseMap, RenderConfig};
use std::io::Read;
use std::path::{Path, PathBuf};

/// One clause map read from an input, tagged with where it came from.
#[derive(Debug)]
pub struct Input {
    pub source: String,
    pub map: ClauseMap,
}

/// Reads every input. No files, or a `-`, means stdin.
pub fn read_inputs(files: &[PathBuf], config: &RenderConfig) -> anyhow::Result<Vec<Input>> {
    if files.is_empty() {
        return read_stdin(config);
    }

    let mut out = Vec::new();
    for path in files {
        if path == Path::new("-") {
            out.extend(read_stdin(config)?);
            continue;
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        out.extend(parse_documents(&raw, &path.display().to_string(), config)?);
    }
    Ok(out)
}

fn read_stdin(config: &RenderConfig) -> anyhow::Result<Vec<Input>> {
    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;
    parse_documents(&raw, "<stdin>", config)
}

/// Parses a stream of whitespace-separated JSON documents.
pub fn parse_documents(
    raw: &str,
    source: &str,
    config: &RenderConfig,
) -> anyhow::Result<Vec<Input>> {
    let mut out = Vec::new();
    let stream = serde_json::Deserializer::from_str(raw).into_iter::<JsonValue>();
    for (i, doc) in stream.enumerate() {
        let label = format!("{source}#{}", i + 1);
        let doc = doc.with_context(|| format!("{label}: invalid JSON"))?;
        let map = ClauseMap::from_json_with(&doc, config)
            .with_context(|| format!("{label}: invalid clause map"))?;
        tracing::debug!(source = %label, clauses = map.len(), "parsed clause map");
        out.push(Input { source: label, map });
    }
    Ok(out)
}
