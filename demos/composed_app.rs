//! A small composed application: a database pool and an HTTP listener stub
//! nested under an `api` module, wired into one tree.
//!
//! Run with `RUST_LOG=debug cargo run --example composed-app`.

use arbor::prelude::*;
use arbor::Event;
use std::io;

struct Database;

#[async_trait]
impl Lifecycle for Database {
    async fn init(&mut self) -> Result<()> {
        tracing::info!("Opening connection pool");
        Ok(())
    }

    async fn destroy(&mut self) -> Result<()> {
        tracing::info!("Closing connection pool");
        Ok(())
    }
}

struct HttpServer {
    port: u16,
}

#[async_trait]
impl Lifecycle for HttpServer {
    async fn init(&mut self) -> Result<()> {
        tracing::info!("Listening on port {}", self.port);
        Ok(())
    }

    async fn destroy(&mut self) -> Result<()> {
        tracing::info!("Listener closed");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let database = Module::named("database").with_lifecycle(Database);
    let database_events = database.emitter();

    let mut api = Module::named("api");
    api.mount(database);
    api.mount(Module::named("http").with_lifecycle(HttpServer { port: 8080 }));

    let mut app = App::builder().module(api).build();

    app.on(EventKind::Online, |_| tracing::info!("All modules are up"));
    app.on(EventKind::Error, |event| {
        if let Some(err) = event.error() {
            tracing::warn!("Module reported an error: {}", err);
        }
    });

    app.boot().await?;

    // A module can report a runtime fault without aborting anything; the
    // event bubbles up to the app channel.
    database_events.emit(Event::Error(Arc::new(io::Error::other("connection reset"))));

    app.shutdown().await
}
