use anyhow::Result;
use tzgrid::{IndexData, WorldGrid};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::InspectArgs) -> Result<()> {
    let data = IndexData::read(&args.index)?;
    println!("scale: {} px/deg", data.scale);
    println!("regions: {}", data.regions.len());
    if cli.verbose > 0 {
        for (i, name) in data.regions.iter().enumerate() {
            println!("  {i:>5} {name}");
        }
    }

    let grid = WorldGrid::new(data)?;
    if args.verify {
        grid.verify()?;
    }

    for table in grid.levels() {
        println!(
            "{}: {} entries, {} bytes compressed",
            table.level(),
            table.try_entries()?.len(),
            table.compressed().len()
        );
    }
    if args.verify {
        println!("verified");
    }
    Ok(())
}
