use std::io;
use std::process::ExitCode;

use clap::Parser;
use client::{run, OptimizerClient, DEFAULT_OPTIMIZER_URL};
use shared::route_view::ViewMode;
use shared::{RouteQuery, VehicleType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Ask the route optimizer for the lowest-emission route and print it"
)]
struct Args {
    /// Start location as free text (e.g. "Delhi")
    #[arg(long)]
    start: String,

    /// End location as free text (e.g. "Mumbai")
    #[arg(long)]
    end: String,

    /// One of car, truck, van or electric
    #[arg(long, default_value_t = VehicleType::Car)]
    vehicle: VehicleType,

    /// Package weight in kilograms
    #[arg(long, default_value_t = 0.0)]
    package_weight: f64,

    /// Print the alternative routes instead of the best route
    #[arg(long)]
    alternatives: bool,

    /// Base URL of the optimizer service
    #[arg(long, env = "OPTIMIZER_URL", default_value = DEFAULT_OPTIMIZER_URL)]
    url: String,
}

impl Args {
    fn query(&self) -> RouteQuery {
        RouteQuery {
            start: self.start.clone(),
            end: self.end.clone(),
            vehicle_type: self.vehicle,
            package_weight_kg: self.package_weight,
        }
    }

    fn view(&self) -> ViewMode {
        if self.alternatives {
            ViewMode::AlternativeRoutes
        } else {
            ViewMode::BestRoute
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "client=info,shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let client = OptimizerClient::new(&args.url);
    tracing::info!(
        "optimizing {} -> {} ({}) via {}",
        args.start,
        args.end,
        args.vehicle,
        client.endpoint()
    );

    let mut stdout = io::stdout().lock();
    match run(&client, args.query(), args.view(), &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("route optimization failed: {err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
