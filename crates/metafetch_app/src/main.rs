use std::path::PathBuf;

use clap::Parser;

mod platform;

/// Search Google Books and Douban for book metadata and copy a result into
/// an edit form.
#[derive(Parser)]
#[command(name = "metafetch")]
#[command(version)]
struct Cli {
    /// RON config file (defaults to ./metafetch.ron when present)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Search once for this keyword, print the results and exit
    #[arg(short, long)]
    keyword: Option<String>,

    /// With --keyword: copy result N into the edit form and print it
    #[arg(short, long, requires = "keyword")]
    select: Option<usize>,

    /// Log level (off, error, warn, info, debug, trace); overrides the config
    #[arg(long, value_parser = parse_level)]
    log_level: Option<log::LevelFilter>,
}

fn parse_level(raw: &str) -> Result<log::LevelFilter, String> {
    platform::parse_level(raw).map_err(|err| err.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    platform::run_app(platform::RunOptions {
        config: cli.config,
        keyword: cli.keyword,
        select: cli.select,
        log_level: cli.log_level,
    })
}
