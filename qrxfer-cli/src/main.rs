use anyhow::Result;
use clap::{Parser, Subcommand};
use qrxfer_cli::{commands, compress::DEFAULT_LEVEL};
use qrxfer_core::constants::DEFAULT_CARRIER_CAPACITY;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "qrxfer")]
#[command(about = "qrxfer - Move encrypted files through capacity-limited text codes", long_about = None)]
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
    /// Encrypt a file and write its codes, one per line
    Generate {
        /// Input file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output text file for the codes
        #[arg(short, long)]
        output: String,

        /// Password for encryption (prompted for when absent)
        #[arg(short, long, env = "QRXFER_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Maximum characters per code
        #[arg(long, default_value_t = DEFAULT_CARRIER_CAPACITY)]
        max_size: usize,

        /// zstd compression level
        #[arg(long, default_value_t = DEFAULT_LEVEL)]
        level: i32,

        /// Print the codes after writing them
        #[arg(long)]
        show_text: bool,
    },

    /// Reconstruct a file from its codes, in any order
    Read {
        /// Text file with codes ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the recovered data
        #[arg(short, long)]
        output: String,

        /// Password for decryption (prompted for when absent)
        #[arg(short, long, env = "QRXFER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Decrypt code text given on the command line
    Decrypt {
        /// Code text, several codes separated by whitespace
        #[arg(short, long)]
        text: String,

        /// Output file for the recovered data
        #[arg(short, long)]
        output: String,

        /// Password for decryption (prompted for when absent)
        #[arg(short, long, env = "QRXFER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Report parts, missing parts and readiness without decrypting
    Inspect {
        /// Text file with codes ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how a blob of a given size splits into codes
    Plan {
        /// Blob size in bytes
        #[arg(short, long)]
        size: usize,

        /// Maximum characters per code
        #[arg(long, default_value_t = DEFAULT_CARRIER_CAPACITY)]
        max_size: usize,
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

    match cli.command {
        Commands::Generate {
            input,
            output,
            password,
            max_size,
            level,
            show_text,
        } => {
            let password = commands::resolve_password(password)?;
            commands::generate::execute(&input, &output, &password, max_size, level, show_text)
        }

        Commands::Read {
            input,
            output,
            password,
        } => {
            let password = commands::resolve_password(password)?;
            commands::read::execute(&input, &output, &password)
        }

        Commands::Decrypt {
            text,
            output,
            password,
        } => {
            let password = commands::resolve_password(password)?;
            commands::read::execute_text(&text, &output, &password)
        }

        Commands::Inspect { input, json } => commands::inspect::execute(&input, json),

        Commands::Plan { size, max_size } => commands::plan::execute(size, max_size),
    }
}
