mod cli;
mod combine_cmd;
mod config;
mod input;
pub mod logging;
mod render_cmd;

pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Render(args) => render_cmd::run(args),
        cli::Command::Merge(args) => combine_cmd::run_merge(args),
        cli::Command::Append(args) => combine_cmd::run_append(args),
    }
}
