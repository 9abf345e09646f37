use anyhow::{Context, Result};
use clap::Parser;
use scatterspec::{build_chart_options, graph, ChannelRequirement, ChartConfig, Dataset};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scatterspec")]
#[command(about = "Build scatter chart options from a dataset and a chart configuration", long_about = None)]
struct Args {
    /// Chart configuration (JSON with `datas` and `styles`)
    #[arg(short, long)]
    config: PathBuf,

    /// Dataset as JSON; CSV is read from stdin when omitted
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Also rasterize the chart to this PNG file
    #[arg(long)]
    png: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_text = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let config = ChartConfig::from_json_str(&config_text)?;

    let dataset = match &args.data {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read dataset {}", path.display()))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).context("Dataset is not valid JSON")?;
            Dataset::from_json(&value)?
        }
        None => Dataset::from_csv_reader(io::stdin().lock()).context("Failed to read CSV from stdin")?,
    };
    log::info!(
        "loaded {} rows over {} columns",
        dataset.rows().len(),
        dataset.columns().len()
    );

    let options = build_chart_options(&dataset, &config, &ChannelRequirement::scatter())
        .context("Failed to build chart options")?;
    if options.is_none() {
        log::warn!("configuration has no aggregate binding, nothing to render");
    }

    let json = match &options {
        Some(options) => options.to_json(),
        None => serde_json::Value::Null,
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &json).context("Failed to write options")?;
    writeln!(handle).context("Failed to write options")?;
    handle.flush().context("Failed to flush stdout")?;

    if let (Some(path), Some(options)) = (&args.png, &options) {
        let png = graph::render_png(options, args.width, args.height)
            .context("Failed to render preview")?;
        std::fs::write(path, png)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
