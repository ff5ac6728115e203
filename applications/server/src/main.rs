/// TuneHub Server - music catalog and streaming API
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunehub_core::types::{NewUser, Role, SignUp};
use tunehub_server::{
    api, config::ServerConfig, services::AuthService, state::AppState, LocalFileStore, LogMailer,
};

#[derive(Parser)]
#[command(name = "tunehub-server")]
#[command(about = "TuneHub music catalog and streaming server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "TUNEHUB_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a verified user
    AddUser {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long, default_value_t = 30)]
        age: i64,
        /// male, female or other
        #[arg(long, default_value = "other")]
        gender: String,
        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tunehub_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            name,
            email,
            password,
            age,
            gender,
            admin,
        } => {
            let sign_up = SignUp {
                name: Some(name),
                age: Some(age),
                gender: Some(gender),
                email: Some(email),
                password: Some(password),
            };
            add_user(&config, sign_up, admin).await?;
        }
        Commands::ListUsers => list_users(&config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting TuneHub Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    // Initialize database
    let pool = tunehub_storage::create_pool(&config.storage.database_url).await?;
    tunehub_storage::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    // Initialize media store
    let file_store = LocalFileStore::new(config.storage.media_root.clone());
    file_store.initialize().await?;

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    let app_state = AppState::new(config, pool, Arc::new(file_store), Arc::new(LogMailer));
    let app = api::router(app_state);

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config: &ServerConfig, sign_up: SignUp, admin: bool) -> anyhow::Result<()> {
    let pool = tunehub_storage::create_pool(&config.storage.database_url).await?;
    tunehub_storage::run_migrations(&pool).await?;

    let new_user = NewUser {
        role: if admin { Role::Admin } else { Role::User },
        ..sign_up.validate()?
    };

    let auth_service = AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
        config.auth.bcrypt_cost,
    );
    let password_hash = auth_service.hash_password(&new_user.password)?;

    let user = tunehub_storage::users::create(&pool, &new_user, &password_hash, None).await?;

    println!("Created user {} <{}> ({})", user.id, user.email, user.role);
    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let pool = tunehub_storage::create_pool(&config.storage.database_url).await?;
    tunehub_storage::run_migrations(&pool).await?;

    let users = tunehub_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {} <{}> {} {}{}",
            user.id,
            user.name,
            user.email,
            user.role,
            user.gender.as_str(),
            if user.is_verified { "" } else { " (unverified)" }
        );
    }

    Ok(())
}
