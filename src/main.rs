#[cfg(feature = "ssr")]
#[derive(clap::Parser)]
#[command(name = "lap-cms", version, about = "LAP CMS admin panel")]
struct Cli {
    /// Configuration file (TOML); environment variables override it.
    #[arg(long, env = "LAPCMS_CONFIG")]
    config: Option<std::path::PathBuf>,
}

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::sync::Arc;

    use anyhow::Context;
    use clap::Parser;
    use lap_cms::app::{shell, App, AppState};
    use lap_cms::auth::demo_auth::DemoIdentityProvider;
    use lap_cms::auth::identity::{FirebaseIdentityClient, IdentityProvider};
    use lap_cms::auth::session::SessionKeys;
    use lap_cms::config::{IdentityBackend, Settings};
    use lap_cms::db::memory::MemoryRepository;
    use lap_cms::db::repository::MongoRepository;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower::ServiceBuilder;
    use tower_http::services::ServeDir;
    use tower_http::trace::TraceLayer;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lap_cms=info,tower_http=info".into()),
        )
        .init();

    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    tracing::info!("Starting LAP CMS server...");
    if settings.uses_default_secret() {
        tracing::warn!("Session secret is the built-in default; demo use only");
    }

    // Load Leptos options from Cargo.toml metadata
    let conf = get_configuration(None).context("Failed to read Leptos configuration")?;
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let site_root = leptos_options.site_root.to_string();

    let identity: Arc<dyn IdentityProvider> =
        if settings.demo_mode || settings.identity.provider == IdentityBackend::Demo {
            tracing::info!("Using the in-process demo identity provider");
            Arc::new(DemoIdentityProvider::new())
        } else {
            Arc::new(FirebaseIdentityClient::new(settings.identity.firebase()).await?)
        };

    let state = if settings.demo_mode {
        tracing::info!("Demo mode: using in-memory repositories");
        AppState {
            articles: Arc::new(MemoryRepository::new()),
            news: Arc::new(MemoryRepository::new()),
            authors: Arc::new(MemoryRepository::new()),
            identity,
            sessions: SessionKeys::new(&settings.session.secret, settings.session.ttl_secs),
            demo_mode: true,
            leptos_options: leptos_options.clone(),
        }
    } else {
        let mongo_client = mongodb::Client::with_uri_str(&settings.mongodb.uri)
            .await
            .context("Failed to connect to MongoDB")?;
        let db = mongo_client.database(&settings.mongodb.database);
        tracing::info!("Connected to MongoDB database '{}'", settings.mongodb.database);

        AppState {
            articles: Arc::new(MongoRepository::new(&db)),
            news: Arc::new(MongoRepository::new(&db)),
            authors: Arc::new(MongoRepository::new(&db)),
            identity,
            sessions: SessionKeys::new(&settings.session.secret, settings.session.ttl_secs),
            demo_mode: false,
            leptos_options: leptos_options.clone(),
        }
    };

    if state.demo_mode {
        lap_cms::demo_seeder::seed_demo_data(&state).await;
    } else {
        lap_cms::demo_seeder::bootstrap_super(
            &settings,
            state.authors.as_ref(),
            state.identity.as_ref(),
        )
        .await
        .context("Failed to bootstrap the super user")?;
    }

    // Generate the Leptos route list for SSR
    let routes = generate_route_list(App);

    let app = lap_cms::api::routes::api_routes()
        .leptos_routes(&state, routes, {
            let options = leptos_options.clone();
            move || shell(options.clone())
        })
        .fallback_service(ServeDir::new(&site_root))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    lap_cms::auth::guard::admin_edge_guard,
                )),
        )
        .with_state(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;
    Ok(())
}

// When compiled for WASM (client-side), there's no main function.
// The hydrate() function in lib.rs handles client-side initialization.
#[cfg(not(feature = "ssr"))]
fn main() {}
