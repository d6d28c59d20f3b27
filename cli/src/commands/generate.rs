use anyhow::Result;
use tracing::info;
use tzgrid::{generate, read_boundaries, GenerateConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::GenerateArgs) -> Result<()> {
    let defaults = GenerateConfig::default();
    let config = GenerateConfig {
        scale: args.scale.unwrap_or(defaults.scale),
        name_field: args.name_field.clone().unwrap_or(defaults.name_field),
        validate_zones: !args.no_validate,
        ..defaults
    };

    info!("reading boundaries from {}", args.shapefile.display());
    let boundaries = read_boundaries(&args.shapefile, &config.name_field)?;
    info!("{} boundaries", boundaries.len());

    let (index, report) = generate(boundaries, &config)?;

    info!("writing index to {}", args.output.display());
    index.write(&args.output)?;

    eprintln!(
        "[generate] {} zones, {} tiles, {} bytes compressed -> {}",
        report.zones,
        report.entries(),
        report.compressed_bytes(),
        args.output.display()
    );
    Ok(())
}
