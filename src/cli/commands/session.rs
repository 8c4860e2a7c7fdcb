//! `ttk session` command - sign in, sign out, show the current user

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::{print_serialized, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::session::{Role, Session, User};

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Sign in as a user
    Login(LoginArgs),

    /// Sign out and remove the session file
    Logout,

    /// Show the signed-in user
    Whoami,
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Username
    pub username: String,

    /// Display name (defaults to the username)
    #[arg(long)]
    pub name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Role
    #[arg(long, value_enum, default_value = "member")]
    pub role: Role,
}

pub fn run(cmd: SessionCommands, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let mut session = Session::load(&config.session_path()).into_diagnostic()?;

    match cmd {
        SessionCommands::Login(args) => {
            let mut user = User::new(args.username);
            if let Some(name) = args.name {
                user.name = name;
            }
            user.email = args.email;
            user.role = args.role;
            session.login(user.clone());
            session.save().into_diagnostic()?;
            println!(
                "{} Signed in as {} ({})",
                style("✓").green(),
                style(&user.username).cyan(),
                user.role
            );
        }
        SessionCommands::Logout => {
            session.clear().into_diagnostic()?;
            println!("{} Signed out", style("✓").green());
        }
        SessionCommands::Whoami => {
            let format = resolve_format(global, &config)?;
            match (session.current_user(), format) {
                (None, _) => println!("Not signed in"),
                (Some(user), OutputFormat::Json | OutputFormat::Yaml) => {
                    print_serialized(user, format)?
                }
                (Some(user), OutputFormat::Id) => println!("{}", user.username),
                (Some(user), _) => {
                    let email = user
                        .email
                        .as_deref()
                        .map(|e| format!(" <{}>", e))
                        .unwrap_or_default();
                    println!(
                        "{} ({}){} - {}",
                        style(&user.name).bold(),
                        user.username,
                        email,
                        user.role
                    );
                }
            }
        }
    }
    Ok(())
}
