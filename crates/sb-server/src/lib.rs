//! ShearBite backend server.
//!
//! Wires the auth and donation handlers into one actix-web app.
//!
//! - [`Settings`] — Process configuration
//! - [`Backend`] — Shared state and route table, independent of storage
//! - [`run()`] — Connects to PostgreSQL and serves until shutdown
mod settings;

pub use settings::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::guard;
use actix_web::middleware::Logger;
use actix_web::web;
use sb_auth::Codec;
use sb_auth::Issuer;
use sb_auth::Member;
use sb_auth::SystemClock;
use sb_auth::Users;
use sb_donations::Donation;
use sb_donations::Donations;
use sb_donations::LocalStore;
use sb_donations::ObjectStore;
use std::sync::Arc;
use tokio_postgres::Client;

/// Largest accepted request body, sized for image uploads.
pub const BODY_LIMIT: usize = sb_donations::MAX_IMAGE;

/// Everything a request handler may pull from app data.
#[derive(Clone)]
pub struct Backend {
    codec: web::Data<Codec>,
    issuer: web::Data<Issuer>,
    users: web::Data<dyn Users>,
    donations: web::Data<dyn Donations>,
    store: web::Data<dyn ObjectStore>,
}

impl Backend {
    pub fn new(
        codec: Codec,
        issuer: Issuer,
        users: Arc<dyn Users>,
        donations: Arc<dyn Donations>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            codec: web::Data::new(codec),
            issuer: web::Data::new(issuer),
            users: web::Data::from(users),
            donations: web::Data::from(donations),
            store: web::Data::from(store),
        }
    }

    /// Registers shared state and every `/auth` and `/donations` route.
    #[rustfmt::skip]
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.codec.clone())
            .app_data(self.issuer.clone())
            .app_data(self.users.clone())
            .app_data(self.donations.clone())
            .app_data(self.store.clone())
            .app_data(web::PayloadConfig::new(BODY_LIMIT))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(sb_auth::register))
                    .route("/login",    web::post().to(sb_auth::login))
                    .route("/me",       web::get().to(sb_auth::me))
                    .route("/refresh",  web::post().to(sb_auth::refresh))
                    .route("/logout",   web::post().to(sb_auth::logout)),
            )
            .service(
                web::scope("/donations")
                    .route("",              web::post().to(sb_donations::create))
                    .route("",              web::get().to(sb_donations::list))
                    .route("/mine",         web::get().to(sb_donations::mine))
                    .route("/claimed",      web::get().to(sb_donations::claimed))
                    .route("/upload-image", web::post().guard(guard::fn_guard(sb_donations::multipart)).to(sb_donations::upload_form))
                    .route("/upload-image", web::post().to(sb_donations::upload))
                    .route("/{id}",         web::get().to(sb_donations::read))
                    .route("/{id}",         web::put().to(sb_donations::update))
                    .route("/{id}",         web::delete().to(sb_donations::delete))
                    .route("/{id}/claim",   web::post().to(sb_donations::claim)),
            );
    }
}

async fn health(client: web::Data<Arc<Client>>) -> impl Responder {
    match client
        .execute("SELECT 1", &[])
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(_) => HttpResponse::Ok().body("ok"),
        Err(_) => HttpResponse::ServiceUnavailable().body("database unavailable"),
    }
}

fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let client = sb_pg::db(&settings.database_url).await?;
    sb_pg::bootstrap::<Member>(&client).await?;
    sb_pg::bootstrap::<Donation>(&client).await?;
    let store = LocalStore::new(&settings.storage_root, &settings.storage_bucket);
    store.ensure().await?;
    let backend = Backend::new(
        settings.codec(Arc::new(SystemClock))?,
        settings.issuer()?,
        Arc::new(client.clone()),
        Arc::new(client.clone()),
        Arc::new(store),
    );
    let origins = settings.origins();
    let client = web::Data::new(client);
    log::info!("starting server on {}", settings.bind_addr);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors(&origins))
            .app_data(client.clone())
            .route("/health", web::get().to(health))
            .configure(|cfg| backend.configure(cfg))
    })
    .bind(&settings.bind_addr)?
    .run()
    .await?;
    Ok(())
}
