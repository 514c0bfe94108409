mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "springboard",
    version,
    about = "A touch-first shell layer over the Windows desktop"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Start the shell daemon in the background
    Start,
    /// Stop the shell daemon and restore the desktop
    Stop,
    /// Show whether the daemon is running
    Status,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
    /// Run the daemon in the foreground (internal; use `start`)
    #[command(hide = true)]
    Daemon,
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List manageable windows
    List(commands::debug::list::ListArgs),
    /// Reserve a strip at the top of the screen for a few seconds
    Reserve(commands::debug::reserve::ReserveArgs),
    /// Move a window above the desktop or make it topmost
    Place(commands::debug::place::PlaceArgs),
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Start => commands::start::execute(),
        Commands::Stop => commands::stop::execute(),
        Commands::Status => commands::status::execute(),
        Commands::Daemon => commands::daemon::execute(),
        Commands::Debug { command } => match command {
            DebugCommands::List(args) => commands::debug::list::execute(&args),
            DebugCommands::Reserve(args) => commands::debug::reserve::execute(&args),
            DebugCommands::Place(args) => commands::debug::place::execute(&args),
        },
    }
}
