use std::path::PathBuf;

/// Timezone grid index CLI
#[derive(clap::Parser, Debug)]
#[command(name = "tzgrid", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build an index from a timezone boundary shapefile
    Generate(GenerateArgs),

    /// Look up the zone at a coordinate (prints to stdout)
    Lookup(LookupArgs),

    /// Summarize an index: regions and per-level tables (prints to stdout)
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct GenerateArgs {
    /// Polygon shapefile (.shp) with one record per zone
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub shapefile: PathBuf,

    /// Output index file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Pixels per degree, defaults to 32
    #[arg(long)]
    pub scale: Option<u32>,

    /// Attribute holding the zone name, defaults to "TZID"
    #[arg(long)]
    pub name_field: Option<String>,

    /// Accept zone names unknown to the IANA database
    #[arg(long)]
    pub no_validate: bool,
}

#[derive(clap::Args, Debug)]
pub struct LookupArgs {
    /// Index file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub index: PathBuf,

    /// Latitude in degrees, -90..90
    #[arg(allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees, -180..180
    #[arg(allow_negative_numbers = true)]
    pub lon: f64,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    /// Index file
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub index: PathBuf,

    /// Decompress and check every level
    #[arg(long)]
    pub verify: bool,
}
