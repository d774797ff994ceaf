use hexburst::{ShowConfig, Show};
use hexburst::run_show;
use hexburst::{bench_cycles, bench_fragment_counts};

use clap::Parser;
use anyhow::{Context, Result};

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Show file under scenarios/
    #[arg(short, default_value = "hexagon.yaml")]
    file_name: String,

    /// Run full cycles without a window and print tick counts
    #[arg(long)]
    headless: bool,

    /// Number of headless cycles
    #[arg(long, default_value_t = 3)]
    cycles: usize,

    /// Frames to drift between explosion and gravity pull (headless)
    #[arg(long, default_value_t = 240)]
    drift: usize,
}

// load here to keep main clean
fn load_show_from_yaml(file_name: &str) -> Result<ShowConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    let file = File::open(&config_path)
        .with_context(|| format!("cannot open show file {}", config_path.display()))?;
    let reader = BufReader::new(file);
    let show_cfg: ShowConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("cannot parse show file {}", config_path.display()))?;
    Ok(show_cfg)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let show_cfg = load_show_from_yaml(&args.file_name)?;
    let mut show = Show::build_show(show_cfg).context("invalid show configuration")?;

    if args.headless {
        bench_cycles(&mut show.controller, args.cycles, 1.0 / 60.0, args.drift);
        bench_fragment_counts();
    } else {
        run_show(show);
    }

    Ok(())
}
