use crate::cli::CombineArgs;
use crate::input::read_inputs;
use sqlshape::{ClauseMap, RenderConfig, append, merge};

pub fn run_merge(args: CombineArgs) -> anyhow::Result<()> {
    let maps = read_maps(&args)?;
    print_map(&merge(maps))
}

pub fn run_append(args: CombineArgs) -> anyhow::Result<()> {
    let maps = read_maps(&args)?;
    let map = append(maps)?;
    print_map(&map)
}

fn read_maps(args: &CombineArgs) -> anyhow::Result<Vec<ClauseMap>> {
    let inputs = read_inputs(&args.files, &RenderConfig::new())?;
    tracing::debug!(count = inputs.len(), "combining clause maps");
    Ok(inputs.into_iter().map(|input| input.map).collect())
}

fn print_map(map: &ClauseMap) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(map)?);
    Ok(())
}
