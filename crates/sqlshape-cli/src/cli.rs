use crate::config::OutputFormat;
use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "sqlshape.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Render,
    Merge,
    Append,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Render(RenderArgs),
    Merge(CombineArgs),
    Append(CombineArgs),
}

#[derive(Debug, Clone)]
pub struct RenderArgs {
    pub config: PathBuf,
    /// `--config` was passed; a missing file is then an error.
    pub config_explicit: bool,
    pub max_depth: Option<usize>,
    pub format: Option<OutputFormat>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CombineArgs {
    pub files: Vec<PathBuf>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "render" => parse_render(it.map(|s| s.as_str())),
        "merge" => parse_combine(HelpTopic::Merge, it.map(|s| s.as_str())),
        "append" => parse_combine(HelpTopic::Append, it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_render<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut config_explicit = false;
    let mut max_depth: Option<usize> = None;
    let mut format: Option<OutputFormat> = None;
    let mut files: Vec<PathBuf> = Vec::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Render)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
                config_explicit = true;
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
                config_explicit = true;
            }
            "--max-depth" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--max-depth requires a value");
                };
                max_depth = Some(parse_depth(v)?);
            }
            _ if token.starts_with("--max-depth=") => {
                max_depth = Some(parse_depth(token.trim_start_matches("--max-depth="))?);
            }
            "--format" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--format requires a value");
                };
                format = Some(OutputFormat::parse(v)?);
            }
            _ if token.starts_with("--format=") => {
                format = Some(OutputFormat::parse(token.trim_start_matches("--format="))?);
            }
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("unknown argument: {other}")
            }
            file => files.push(PathBuf::from(file)),
        }
    }

    Ok(Command::Render(RenderArgs {
        config,
        config_explicit,
        max_depth,
        format,
        files,
    }))
}

fn parse_combine<'a>(
    topic: HelpTopic,
    it: impl Iterator<Item = &'a str>,
) -> anyhow::Result<Command> {
    let mut files: Vec<PathBuf> = Vec::new();

    for token in it {
        match token {
            "-h" | "--help" => return Ok(Command::Help(topic)),
            other if other.starts_with('-') && other != "-" => {
                anyhow::bail!("unknown argument: {other}")
            }
            file => files.push(PathBuf::from(file)),
        }
    }

    let args = CombineArgs { files };
    Ok(match topic {
        HelpTopic::Append => Command::Append(args),
        _ => Command::Merge(args),
    })
}

fn parse_depth(v: &str) -> anyhow::Result<usize> {
    v.trim()
        .parse::<usize>()
        .map_err(|e| anyhow::anyhow!("invalid --max-depth {v:?}: {e}"))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqlshape - render JSON clause maps into parameterized PostgreSQL

USAGE:
  sqlshape <COMMAND> [OPTIONS] [FILES...]

COMMANDS:
  render        Render clause maps to SQL text and bound values
  merge         Merge clause maps (later clauses replace earlier ones)
  append        Append clause maps (lists concatenate, conditions AND together)

Each command reads one clause map per file, or a stream of maps from stdin
when no files are given (use `-` to name stdin explicitly).

Run `sqlshape <command> --help` for more."
            );
        }
        HelpTopic::Render => {
            println!(
                "\
USAGE:
  sqlshape render [OPTIONS] [FILES...]

OPTIONS:
  --config <FILE>       Config file path (default: sqlshape.toml, optional)
  --max-depth <N>       Nesting limit; 0 means unbounded (default: 128)
  --format <FORMAT>     Output format: json | text (default: json)
  -h, --help            Print help

ENVIRONMENT:
  SQLSHAPE_LOG          Log filter for stderr diagnostics (default: warn)"
            );
        }
        HelpTopic::Merge => {
            println!(
                "\
USAGE:
  sqlshape merge [FILES...]

NOTES:
  Prints the merged clause map as JSON. For a clause present in several
  inputs, the last one wins.

OPTIONS:
  -h, --help            Print help"
            );
        }
        HelpTopic::Append => {
            println!(
                "\
USAGE:
  sqlshape append [FILES...]

NOTES:
  Prints the combined clause map as JSON. Inputs after the first may only
  hold columns, values, where, having, set, order_by, select, join and
  group_by clauses.

OPTIONS:
  -h, --help            Print help"
            );
        }
    }
}
