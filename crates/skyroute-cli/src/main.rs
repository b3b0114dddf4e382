mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use skyroute_cli::output::OutputFormat;
use skyroute_lib::{RouteQuery, DATASET_ENV_VAR, DEFAULT_MAX_DAYS};

use commands::resolve::handle_resolve_command;
use commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Cheapest and fastest flight routes over a flight schedule")]
struct Cli {
    /// Override the dataset file or directory.
    #[arg(long, global = true, env = DATASET_ENV_VAR)]
    dataset: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which airport(s) a place name resolves to.
    Resolve {
        /// Airport code, airport city or city name.
        place: String,
    },
    /// Cheapest single flight between two places.
    Direct(EndpointArgs),
    /// Cheapest connected itinerary within a calendar-day cap.
    Cheapest(ConnectingArgs),
    /// Fastest connected itinerary (total flight time) within a calendar-day cap.
    Fastest(ConnectingArgs),
}

#[derive(Args, Debug)]
struct EndpointArgs {
    /// Departure place.
    #[arg(long = "from")]
    from: String,
    /// Destination place.
    #[arg(long = "to")]
    to: String,
}

#[derive(Args, Debug)]
struct ConnectingArgs {
    #[command(flatten)]
    endpoints: EndpointArgs,
    /// Calendar days the trip may span between the first arrival and the last departure.
    #[arg(long, default_value_t = DEFAULT_MAX_DAYS)]
    max_days: u32,
    /// Maximum number of flights.
    #[arg(long)]
    max_hops: Option<usize>,
    /// Give up after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl ConnectingArgs {
    fn into_route_args(self, query: RouteQuery) -> RouteCommandArgs {
        RouteCommandArgs {
            from: self.endpoints.from,
            to: self.endpoints.to,
            query,
            max_days: self.max_days,
            max_hops: self.max_hops,
            timeout_ms: self.timeout_ms,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let dataset = cli.dataset.as_deref();

    match cli.command {
        Command::Resolve { place } => handle_resolve_command(dataset, cli.format, &place),
        Command::Direct(endpoints) => {
            let args = RouteCommandArgs {
                from: endpoints.from,
                to: endpoints.to,
                query: RouteQuery::CheapestDirect,
                max_days: DEFAULT_MAX_DAYS,
                max_hops: None,
                timeout_ms: None,
            };
            handle_route_command(dataset, cli.format, &args)
        }
        Command::Cheapest(connecting) => handle_route_command(
            dataset,
            cli.format,
            &connecting.into_route_args(RouteQuery::Cheapest),
        ),
        Command::Fastest(connecting) => handle_route_command(
            dataset,
            cli.format,
            &connecting.into_route_args(RouteQuery::Fastest),
        ),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
