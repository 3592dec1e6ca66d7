use std::env;

use tokio::net::TcpListener;
use tower_lsp::{LspService, Server};
use vue_fast_script::backend::Backend;

const DEFAULT_ADDR: &str = "127.0.0.1:8081";

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt().init();

    let addr = env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let listener = TcpListener::bind(&addr).await?;
    log::info!("listening on {addr}");

    let (stream, peer) = listener.accept().await?;
    log::info!("client connected from {peer}");
    let (read, write) = tokio::io::split(stream);
    let (service, socket) = LspService::new(Backend::new);

    Server::new(read, write, socket).serve(service).await;
    Ok(())
}
