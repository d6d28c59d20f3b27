use anyhow::{ensure, Result};
use tzgrid::WorldGrid;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::LookupArgs) -> Result<()> {
    ensure!(
        (-90.0..=90.0).contains(&args.lat) && (-180.0..=180.0).contains(&args.lon),
        "[lookup] coordinate ({}, {}) is out of range",
        args.lat,
        args.lon
    );

    let grid = WorldGrid::open(&args.index)?;
    match grid.lookup_with_level(args.lat, args.lon) {
        Some((zone, level)) => println!("{zone}\t{level}"),
        None => println!("-"),
    }
    Ok(())
}
