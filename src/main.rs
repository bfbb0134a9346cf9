use rusty_library_lending::{
    adapters::memory::InMemoryLoanStore,
    adapters::mock::{
        book_service::BookService as MockBookService,
        member_service::MemberService as MockMemberService,
    },
    adapters::postgres::{PostgresCatalog, PostgresLoanStore, check_database_connection},
    api::{handlers::AppState, router::create_router},
    application::loan::ServiceDependencies,
    config::{AppConfig, StoreKind},
    domain::{BookId, MemberId},
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rusty_library_lending=debug,tower_http=debug,axum=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let service_deps = match config.store {
        StoreKind::Postgres => {
            let connect_options: PgConnectOptions = config
                .database_url
                .parse()
                .expect("Invalid DATABASE_URL");

            // 認証情報はログに出さない
            tracing::info!(
                host = connect_options.get_host(),
                port = connect_options.get_port(),
                database = connect_options.get_database().unwrap_or("-"),
                "Connecting to database"
            );

            // Initialize database connection pool
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(connect_options)
                .await
                .expect("Failed to connect to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run migrations");

            check_database_connection(&pool).await;

            let catalog = Arc::new(PostgresCatalog::new(pool.clone()));
            ServiceDependencies {
                loan_store: Arc::new(PostgresLoanStore::new(pool)),
                member_service: catalog.clone(),
                book_service: catalog,
            }
        }
        StoreKind::Memory => {
            tracing::warn!("Using in-memory loan store; loans are lost on restart");
            let seeded = 1..=config.memory_catalog_size;
            ServiceDependencies {
                loan_store: Arc::new(InMemoryLoanStore::new()),
                member_service: Arc::new(MockMemberService::with_members(
                    seeded.clone().map(MemberId::new),
                )),
                book_service: Arc::new(MockBookService::with_books(seeded.map(BookId::new))),
            }
        }
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
