use anyhow::Result;
use clap::{Parser, Subcommand};
use shapefuzz_cli::{commands, Primitive};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "shapefuzz")]
#[command(
    about = "Shapefuzz - Replay fuzz inputs through the byte cursor and generator",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a sequence of primitive draws
    Draw {
        /// Input corpus file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Comma-separated primitives to draw
        #[arg(short, long, value_enum, value_delimiter = ',', required = true)]
        plan: Vec<Primitive>,

        /// Cap on consumed bytes
        #[arg(long)]
        max_consumable: Option<usize>,

        /// Repeat the plan until a draw fails
        #[arg(long)]
        cycle: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Output JSON file for the report
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Split an input into per-call selectors and arguments
    Split {
        /// Input corpus file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Minimum number of calls
        #[arg(long, default_value = "1")]
        min: usize,

        /// Maximum number of calls
        #[arg(long, default_value = "255")]
        max: usize,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Populate the sample record shape and print it as JSON
    Generate {
        /// Input corpus file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Generator configuration (JSON)
        #[arg(short, long)]
        config: Option<String>,

        /// Output JSON file for the report
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Draw {
            input,
            plan,
            max_consumable,
            cycle,
            json,
            output,
        } => commands::draw::execute(
            &input,
            &plan,
            max_consumable,
            cycle,
            json,
            output.as_deref(),
        ),

        Commands::Split {
            input,
            min,
            max,
            json,
        } => commands::split::execute(&input, min, max, json),

        Commands::Generate {
            input,
            config,
            output,
        } => commands::generate::execute(&input, config.as_deref(), output.as_deref()),
    }
}
