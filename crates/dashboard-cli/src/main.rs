//! Stock Dashboard CLI
//!
//! An interactive terminal control panel. Every control change re-runs the
//! full pipeline and prints the chart summary and table tail.
//!
//! # Usage
//!
//! ```bash
//! # Interactive panel, chart page rewritten on every render
//! cargo run --bin stock-dashboard -- --stock MSFT --compare NVDA,AAPL --html chart.html
//!
//! # Single render
//! cargo run --bin stock-dashboard -- --stock TSLA --no-candles --once
//! ```

use chrono::NaiveDate;
use clap::Parser;
use dashboard_core::export::{figure_json, write_html};
use dashboard_core::{ControlPanel, Dashboard, DashboardConfig, PanelAction, PanelCommand, Symbol};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-dashboard")]
#[command(about = "Stock price dashboard with Bollinger Bands and comparisons", long_about = None)]
struct Args {
    /// Primary stock symbol
    #[arg(short, long)]
    stock: Option<String>,

    /// Comparison symbols (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    compare: Vec<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Draw a close line instead of candlesticks
    #[arg(long)]
    no_candles: bool,

    /// Hide Bollinger Bands
    #[arg(long)]
    no_bbands: bool,

    /// Write the chart as an HTML page after every render
    #[arg(long)]
    html: Option<PathBuf>,

    /// Print the figure as Plotly JSON after every render
    #[arg(long)]
    json: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render once and exit
    #[arg(long)]
    once: bool,
}

/// Where each render is written besides stdout
struct Output {
    html: Option<PathBuf>,
    json: bool,
}

fn print_banner() {
    println!(
        r#"
╔══════════════════════════════════════════════════════════════╗
║                      Stock Dashboard                         ║
║                                                              ║
║  Change a control to re-render:                              ║
║    /stock <SYMBOL>   /compare [SYMBOL ...]                   ║
║    /start <DATE>     /end <DATE>                             ║
║    /candles on|off   /bbands on|off                          ║
║    /tickers  /show  /help  /exit                             ║
╚══════════════════════════════════════════════════════════════╝
"#
    );
}

/// Apply the command-line controls to a fresh panel
fn apply_args(panel: &mut ControlPanel, args: &Args) -> dashboard_core::Result<()> {
    if let Some(stock) = &args.stock {
        panel.set_primary(Symbol::new(stock))?;
    }
    if !args.compare.is_empty() {
        panel.set_comparisons(args.compare.iter().map(Symbol::new).collect())?;
    }
    if let Some(start) = args.start {
        panel.set_start(start);
    }
    if let Some(end) = args.end {
        panel.set_end(end);
    }
    panel.set_candlesticks(!args.no_candles);
    panel.set_bollinger(!args.no_bbands);
    Ok(())
}

async fn render(
    dashboard: &Dashboard,
    panel: &ControlPanel,
    output: &Output,
) -> anyhow::Result<()> {
    let request = panel.request()?;
    let rendered = dashboard.render(&request).await?;

    println!("{}", panel.describe());
    println!();
    print!("{}", rendered.figure.describe());
    println!();
    println!("Raw Data");
    println!("{}", rendered.view.render());

    if output.json {
        println!("{}", figure_json(&rendered.figure)?);
    }
    if let Some(path) = &output.html {
        write_html(&rendered.figure, path)?;
    }
    Ok(())
}

fn print_tickers(panel: &ControlPanel) {
    let primary = panel.primary();
    let line = panel
        .universe()
        .symbols()
        .iter()
        .map(|s| {
            if s == primary {
                format!("[{s}]")
            } else {
                s.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!("{line}");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dashboard_utils::init_tracing_with_default("warn,dashboard_core=info");

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)?,
        None => DashboardConfig::default(),
    };
    let config = Arc::new(config);

    let mut panel = ControlPanel::new(&config)?;
    apply_args(&mut panel, &args)?;

    let dashboard = Dashboard::yahoo(config);
    let output = Output {
        html: args.html.clone(),
        json: args.json,
    };

    info!("Starting stock-dashboard");

    if args.once {
        return render(&dashboard, &panel, &output).await;
    }

    print_banner();
    if let Err(e) = render(&dashboard, &panel, &output).await {
        eprintln!("Error: {e}\n");
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("dashboard> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let action = PanelCommand::parse(input).and_then(|command| panel.apply(command));
        match action {
            Ok(PanelAction::Render) => {
                if let Err(e) = render(&dashboard, &panel, &output).await {
                    eprintln!("Error: {e}\n");
                }
            }
            Ok(PanelAction::ShowHelp) => println!("{}\n", PanelCommand::help_text()),
            Ok(PanelAction::ShowTickers) => print_tickers(&panel),
            Ok(PanelAction::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => eprintln!("Error: {e}\n"),
        }
    }

    Ok(())
}
