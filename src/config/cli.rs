use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "pet-journey")]
#[command(about = "Pet profile tracker with breed-aware photo lookup and adoption search")]
pub struct CliArgs {
    #[arg(long, short, help = "Path to a TOML config file; environment variables are used otherwise")]
    pub config: Option<String>,

    #[arg(long, help = "Override the listen address (e.g. 0.0.0.0:3001)")]
    pub listen_addr: Option<String>,

    #[arg(long, help = "Override the directory holding pets.json")]
    pub data_dir: Option<String>,

    #[arg(long, help = "Emit JSON logs")]
    pub json_logs: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}
