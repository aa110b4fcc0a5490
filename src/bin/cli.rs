use clap::{Parser, Subcommand};
use liftlink::{
    config::{JwtConfig, ServerConfig},
    db,
    repositories::{SqliteMagicLinkRepository, SqliteUserRepository},
    services::{LogEmailService, MagicLinkService, TokenService, UserService},
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "liftlink-cli")]
#[command(about = "CLI tool for managing LiftLink users and login links", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// User management commands
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Login link commands
    MagicLink {
        #[command(subcommand)]
        command: MagicLinkCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all users
    List {
        /// Maximum number of users to display
        #[arg(short, long, default_value_t = 100)]
        limit: i64,

        /// Offset for pagination
        #[arg(short = 'o', long, default_value_t = 0)]
        offset: i64,
    },

    /// Delete a user together with everything they own
    Delete {
        /// Email address of the user to delete
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum MagicLinkCommands {
    /// Issue a login link and print it instead of emailing it
    Issue {
        /// Email address to log in as
        #[arg(short, long)]
        email: String,

        /// Issue a 7-day session instead of a 2-hour one
        #[arg(long)]
        remember_me: bool,
    },

    /// Remove expired login links
    Cleanup,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Connect to database
    let pool = db::create_pool().await?;

    // Run migrations
    db::run_migrations(&pool).await?;

    // Initialize services
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let user_service = Arc::new(UserService::new(user_repository));

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::User { command } => match command {
            UserCommands::List { limit, offset } => {
                match user_service.list_users(limit, offset).await {
                    Ok(users) => {
                        if users.is_empty() {
                            println!("No users found.");
                        } else {
                            println!(
                                "{:<38} {:<40} {:<20} {:<20}",
                                "ID", "Email", "Name", "Created"
                            );
                            println!("{}", "-".repeat(120));
                            for user in users {
                                println!(
                                    "{:<38} {:<40} {:<20} {:<20}",
                                    user.id,
                                    user.email,
                                    user.name.as_deref().unwrap_or("-"),
                                    user.created_at.format("%Y-%m-%d %H:%M:%S")
                                );
                            }
                        }
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to list users: {}", err);
                        std::process::exit(1);
                    }
                }
            }

            UserCommands::Delete { email } => match user_service.find_user_by_email(&email).await {
                Ok(Some(user)) => match user_service.delete_user(&user.id).await {
                    Ok(()) => {
                        println!("✅ User '{}' deleted successfully!", user.email);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to delete user: {}", err);
                        std::process::exit(1);
                    }
                },
                Ok(None) => {
                    eprintln!("❌ User '{}' not found", email);
                    std::process::exit(1);
                }
                Err(err) => {
                    eprintln!("❌ Failed to find user: {}", err);
                    std::process::exit(1);
                }
            },
        },

        Commands::MagicLink { command } => {
            let server_config = ServerConfig::from_env()?;
            let magic_link_service = MagicLinkService::new(
                Arc::new(SqliteMagicLinkRepository::new(pool.clone())),
                user_service.clone(),
                Arc::new(TokenService::new(&JwtConfig::from_env())),
                Box::new(LogEmailService),
                server_config.frontend_url,
            );

            match command {
                MagicLinkCommands::Issue { email, remember_me } => {
                    match magic_link_service.issue_link(&email, remember_me).await {
                        Ok(link) => {
                            println!("✅ Login link issued for '{}'", link.email);
                            println!("  URL: {}", link.url);
                            println!("  Expires: {}", link.expires_at.to_rfc3339());
                        }
                        Err(err) => {
                            eprintln!("❌ Failed to issue login link: {}", err);
                            std::process::exit(1);
                        }
                    }
                }

                MagicLinkCommands::Cleanup => match magic_link_service.cleanup_expired().await {
                    Ok(removed) => {
                        println!("✅ Removed {} expired login link(s)", removed);
                    }
                    Err(err) => {
                        eprintln!("❌ Failed to clean up login links: {}", err);
                        std::process::exit(1);
                    }
                },
            }
        }
    }

    Ok(())
}
