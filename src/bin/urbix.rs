use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use urbix_rs::{Client, Config, Dashboard, IndicatorRecord, YearFilter};
use urbix_rs::{card, dashboard, format, stats, storage, viz};

#[derive(Parser, Debug)]
#[command(
    name = "urbix",
    version,
    about = "Fetch, rank, filter & display urban-sustainability indicators"
)]
struct Cli {
    /// Base URL of the indicators API (default: $URBIX_API_URL or http://localhost:8000/api)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Locale for number formatting (en, pt, de, ...)
    #[arg(long, global = true)]
    locale: Option<String>,
    /// Total request timeout in seconds (at least 1)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard: summary stats and one card per region.
    Dashboard(DashboardArgs),
    /// Print the card of a single record.
    Show(ShowArgs),
    /// Create a record from a JSON file and print the stored card.
    Create(CreateArgs),
    /// Print per-column statistics.
    Summary(SummaryArgs),
    /// Save the (filtered) records to CSV/JSON and optionally draw the cards as SVG.
    Export(ExportArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct DashboardArgs {
    /// Year to show, or "all"
    #[arg(short, long, default_value = "all")]
    year: YearFilter,
    /// Width of the progress bars in characters
    #[arg(long, default_value_t = 20)]
    bar_width: usize,
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// Record id
    id: String,
}

#[derive(Args, Debug)]
struct CreateArgs {
    /// JSON file holding one record (backend column names)
    #[arg(short, long)]
    file: PathBuf,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Ask the server (`/indicators/summary`) instead of computing locally
    #[arg(long, default_value_t = false)]
    remote: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Output file (format inferred by --format or extension)
    #[arg(long)]
    out: PathBuf,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Year to export, or "all"
    #[arg(short, long, default_value = "all")]
    year: YearFilter,
    /// Also draw the cards to this .svg file
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Width of the SVG (default 960).
    #[arg(long, default_value_t = 960)]
    width: u32,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => format::NOT_AVAILABLE.to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url);
    }
    if let Some(locale) = cli.locale {
        config = config.with_locale(locale);
    }
    if let Some(secs) = cli.timeout {
        config.timeout = Some(Duration::from_secs(secs));
    }
    let client = Client::new(&config)?;

    match cli.cmd {
        Command::Dashboard(args) => cmd_dashboard(&client, &config, args),
        Command::Show(args) => cmd_show(&client, &config, args),
        Command::Create(args) => cmd_create(&client, &config, args),
        Command::Summary(args) => cmd_summary(&client, args),
        Command::Export(args) => cmd_export(&client, &config, args),
    }
}

fn cmd_dashboard(client: &Client, config: &Config, args: DashboardArgs) -> Result<()> {
    let board = Dashboard::new()
        .with_filter(args.year)
        .loaded(client.fetch_indicators());
    print!("{}", board.render_text(&config.locale, args.bar_width));
    match board.error() {
        Some(msg) => anyhow::bail!("{}", msg),
        None => Ok(()),
    }
}

fn cmd_show(client: &Client, config: &Config, args: ShowArgs) -> Result<()> {
    let record = client
        .fetch_indicator_by_id(&args.id)
        .with_context(|| format!("fetch indicator {}", args.id))?;
    print!("{}", card::render_card_locale(&record, &config.locale).to_text(20));
    Ok(())
}

fn cmd_create(client: &Client, config: &Config, args: CreateArgs) -> Result<()> {
    let payload: IndicatorRecord = storage::load_json(&args.file)?;
    let created = client.create_indicator(&payload).context("create indicator")?;
    eprintln!("Created {}", created.key());
    print!("{}", card::render_card_locale(&created, &config.locale).to_text(20));
    Ok(())
}

fn cmd_summary(client: &Client, args: SummaryArgs) -> Result<()> {
    if args.remote {
        let summary = client.fetch_summary().context("fetch summary")?;
        for (field, s) in summary {
            println!(
                "{:<18} count={} min={} max={} mean={}",
                field,
                s.count,
                fmt_opt(Some(s.min)),
                fmt_opt(Some(s.max)),
                fmt_opt(Some(s.mean))
            );
        }
        return Ok(());
    }

    let records = client.fetch_indicators().context("fetch indicators")?;
    for s in stats::field_summary(&records) {
        println!(
            "{:<18} count={} missing={}  min={} max={} mean={} median={}",
            s.metric.wire_name(),
            s.count,
            s.missing,
            fmt_opt(s.min),
            fmt_opt(s.max),
            fmt_opt(s.mean),
            fmt_opt(s.median)
        );
    }
    Ok(())
}

fn cmd_export(client: &Client, config: &Config, args: ExportArgs) -> Result<()> {
    let records = client.fetch_indicators().context(dashboard::LOAD_ERROR_MESSAGE)?;
    let view = stats::aggregate(&records, args.year);
    let selected: Vec<IndicatorRecord> = view.records.iter().map(|r| (*r).clone()).collect();

    let fmt = match args.format {
        Some(OutFormat::Csv) => "csv",
        Some(OutFormat::Json) => "json",
        None => args.out.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
    }
    .to_ascii_lowercase();
    match fmt.as_str() {
        "csv" => storage::save_csv(&selected, &args.out)?,
        "json" => storage::save_json(&selected, &args.out)?,
        other => anyhow::bail!("unsupported format: {}", other),
    }
    eprintln!("Saved {} rows to {}", selected.len(), args.out.display());

    if let Some(plot_path) = args.plot.as_ref() {
        viz::plot_cards(&view, plot_path, args.width, &config.locale)?;
        eprintln!("Wrote cards to {}", plot_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_print_as_not_available() {
        assert_eq!(fmt_opt(None), "N/A");
        assert_eq!(fmt_opt(Some(f64::NAN)), "N/A");
        assert_eq!(fmt_opt(Some(0.7250)), "0.725");
    }

    #[test]
    fn timeout_must_be_positive() {
        assert!(Cli::try_parse_from(["urbix", "--timeout", "0", "dashboard"]).is_err());
        let cli = Cli::try_parse_from(["urbix", "--timeout", "5", "dashboard"]).unwrap();
        assert_eq!(cli.timeout, Some(5));
    }
}
