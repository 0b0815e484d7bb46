//! Web UI: a static page served by axum over the same search core.

mod router;
mod routes;
mod state;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use tracing::{info, warn};

use crate::base_system::context::Config;
use crate::openlibrary::client::{ClientOptions, OpenLibraryClient};
use state::AppState;

const DEFAULT_BIND: &str = "127.0.0.1:18423";

pub fn run(config: &Config) -> Result<()> {
    let bind_raw =
        std::env::var("BOOK_FINDER_WEB_ADDR").unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let bind_addrs = parse_bind_addrs(&bind_raw)?;

    let client = Arc::new(OpenLibraryClient::new(ClientOptions {
        request_timeout: config.timeout(),
        ..ClientOptions::default()
    })?);
    let state = AppState {
        client,
        default_field: config.default_field(),
    };

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_async(bind_addrs, state))
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(anyhow!("empty bind addr"));
    }

    // Standard forms: '127.0.0.1:18423' or '[::1]:18423'.
    if let Ok(a) = s.parse::<SocketAddr>() {
        return Ok(a);
    }

    // Tolerate a bracketless IPv6 like '::1:18423' when the trailing segment
    // is all digits.
    if !s.starts_with('[')
        && let Some((host, port)) = s.rsplit_once(':')
        && host.contains(':')
        && !port.is_empty()
        && port.chars().all(|c| c.is_ascii_digit())
    {
        let wrapped = format!("[{host}]:{port}");
        if let Ok(a) = wrapped.parse::<SocketAddr>() {
            return Ok(a);
        }
    }

    Err(anyhow!(
        "invalid BOOK_FINDER_WEB_ADDR: '{s}'. Use '127.0.0.1:18423' or '[::1]:18423'; separate multiple binds with commas."
    ))
}

fn parse_bind_addrs(raw: &str) -> Result<Vec<SocketAddr>> {
    let mut out: Vec<SocketAddr> = Vec::new();
    for part in raw.split([',', ';']).map(str::trim).filter(|s| !s.is_empty()) {
        let addr = parse_bind_addr(part)?;
        if !out.contains(&addr) {
            out.push(addr);
        }
    }
    if out.is_empty() {
        return Err(anyhow!("empty BOOK_FINDER_WEB_ADDR"));
    }
    Ok(out)
}

async fn run_async(bind_addrs: Vec<SocketAddr>, state: AppState) -> Result<()> {
    let notify = Arc::new(tokio::sync::Notify::new());
    {
        let notify = notify.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            println!("Stopping server…");
            notify.notify_waiters();
        });
    }

    let mut servers = Vec::new();
    for bind in bind_addrs {
        let listener = match tokio::net::TcpListener::bind(bind).await {
            Ok(l) => l,
            Err(e) => {
                // Dual-stack platforms can report AddrInUse for 0.0.0.0 when
                // [::] already accepts IPv4; non-fatal once one listener runs.
                if !servers.is_empty() && e.kind() == std::io::ErrorKind::AddrInUse {
                    warn!(target: "web", bind = %bind, error = %e, "bind failed (AddrInUse), skipping");
                    continue;
                }
                return Err(anyhow!(e).context(format!("bind failed: {bind}")));
            }
        };

        info!(target: "web", "Web UI listening on http://{bind}/ (set BOOK_FINDER_WEB_ADDR to override)");
        println!("Web UI listening on http://{bind}/");

        let app = router::build_router(state.clone());
        let notify = notify.clone();
        servers.push(tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
            )
            .with_graceful_shutdown(async move {
                notify.notified().await;
            })
            .await
        }));
    }

    println!("Press Ctrl+C to stop.");

    for handle in servers {
        handle
            .await
            .map_err(|e| anyhow!("server task join failed: {e}"))?
            .map_err(|e| anyhow!(e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_bracketless_ipv6_binds() {
        assert_eq!(
            parse_bind_addr("127.0.0.1:8080").unwrap(),
            "127.0.0.1:8080".parse().unwrap()
        );
        assert_eq!(
            parse_bind_addr("::1:18423").unwrap(),
            "[::1]:18423".parse().unwrap()
        );
        assert!(parse_bind_addr("not an addr").is_err());
    }

    #[test]
    fn splits_and_dedupes_multi_bind() {
        let addrs = parse_bind_addrs("127.0.0.1:1, 127.0.0.1:1; [::1]:2").unwrap();
        assert_eq!(addrs.len(), 2);
    }
}
