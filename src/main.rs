use std::{process, sync::Arc};

use cleanblog::{
    application::{
        posts::PostService,
        repos::{PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        csrf::CsrfGuard,
        db::SqliteRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
    presentation::views::LayoutChrome,
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &InfraError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), InfraError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        InfraError::configuration(format!("failed to load configuration: {err}"))
    })?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), InfraError> {
    let repositories = init_repositories(&settings).await?;
    let http_state = build_application_context(repositories, &settings);
    serve_http(&settings, http_state).await
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<SqliteRepositories>, InfraError> {
    let pool = SqliteRepositories::connect(
        &settings.database.url,
        settings.database.max_connections.get(),
    )
    .await?;

    SqliteRepositories::run_migrations(&pool).await?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}

fn build_application_context(
    repositories: Arc<SqliteRepositories>,
    settings: &config::Settings,
) -> HttpState {
    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();

    let posts = Arc::new(PostService::new(
        posts_repo,
        posts_write_repo,
        settings.site.timezone,
    ));

    HttpState {
        posts,
        db: repositories,
        chrome: LayoutChrome::for_site(&settings.site.title),
        csrf: Arc::new(CsrfGuard::new(&settings.site.secret_key)),
    }
}

async fn serve_http(settings: &config::Settings, http_state: HttpState) -> Result<(), InfraError> {
    let router = http::build_router(http_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr).await?;

    info!(
        target = "cleanblog::server",
        addr = %settings.server.addr,
        timezone = %settings.site.timezone,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target = "cleanblog::server", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
