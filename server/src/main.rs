use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod store;

use store::AppointmentStore;

/// Development copy of the appointment store. Also serves the web client.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "APPOINTMENTS_BIND", default_value = "localhost:3001")]
    bind: String,

    /// Json file holding the appointments (".json" is appended)
    #[arg(long, env = "APPOINTMENTS_DATA", default_value = "data/appointments")]
    data: PathBuf,

    /// Directory with index.html and the wasm-pack output (pkg/) of the client
    #[arg(long, env = "APPOINTMENTS_CLIENT_DIR", default_value = "./client")]
    client_dir: PathBuf,
}

struct ClientDir(PathBuf);

fn init_logging() {
    // RUST_LOG wins; actix's Logger reaches us through the log bridge
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

async fn index(client_dir: web::Data<ClientDir>) -> std::io::Result<NamedFile> {
    NamedFile::open(client_dir.0.join("index.html"))
}

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging();

    let store = web::Data::new(AppointmentStore::open(&args.data)?);
    let client_dir = web::Data::new(ClientDir(args.client_dir.clone()));

    info!(bind = %args.bind, data = %args.data.display(), "starting appointment store");

    HttpServer::new(move || {
        let dir = &client_dir.0;
        App::new()
            .wrap(Logger::default())
            .app_data(store.clone())
            .app_data(client_dir.clone())
            .configure(routes::configure)
            .service(Files::new("/pkg", dir.join("pkg")))
            .default_service(web::route().to(index))
    })
    .bind(args.bind.as_str())?
    .run()
    .await
}
