use clap::Parser;
use miette::Result;
use ttk::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    // Logs go to stderr so they never mix with piped output
    let default_level = if global.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TTK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::List(args) => ttk::cli::commands::list::run(args, &global),
        Commands::Search(args) => ttk::cli::commands::search::run(args, &global),
        Commands::Board(args) => ttk::cli::commands::board::run(args, &global),
        Commands::Schema(args) => ttk::cli::commands::schema::run(args, &global),
        Commands::New(args) => ttk::cli::commands::new::run(args, &global),
        Commands::Session(cmd) => ttk::cli::commands::session::run(cmd, &global),
    }
}
