//! Access Control Demo Application
//!
//! Serves the demo routes behind a cookie session and proxy PKI auto-login.

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use actix_access_core::http::security::{AccessConfig, SecurityTransform};
use actix_access_test::{configure, AppState};

const CONFIG_ENV: &str = "ACCESS_CONFIG";

/// Reads the JSON configuration named by `ACCESS_CONFIG`, or uses a demo
/// configuration with auto-login enabled.
fn load_config() -> std::io::Result<AccessConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)?;
            AccessConfig::from_json(&json)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }
        Err(_) => Ok(AccessConfig::new()
            .strategy("proxy-pki")
            .auto_login(true)
            .org_levels_required(true)
            .app("Demo", "http://127.0.0.1:8080")
            .mail_from("noreply@example.com")
            .contact_email("help@example.com")),
    }
}

fn print_startup_info(config: &AccessConfig) {
    println!("=== Access Control Demo ===");
    println!();
    println!("Server: http://127.0.0.1:8080");
    println!("Strategy: {} (auto-login: {})", config.auth.strategy, config.auth.auto_login);
    println!();
    println!("Demo users (log in with the x-ssl-client-s-dn header):");
    println!("  CN=alice,OU=people  - user");
    println!("  CN=eddie,OU=people  - user, editor");
    println!("  CN=audrey,OU=people - user, auditor");
    println!("  CN=root,OU=admins   - admin, user");
    println!("  CN=newbie,OU=people - not yet approved");
    println!();
    println!("Examples:");
    println!("  curl -c jar -b jar -H 'x-ssl-client-s-dn: CN=alice,OU=people' -X POST http://127.0.0.1:8080/api/eua/accept");
    println!("  curl -c jar -b jar http://127.0.0.1:8080/api/user/me");
    println!("  curl -c jar -b jar http://127.0.0.1:8080/api/audit   # 403 for alice");
    println!();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    print_startup_info(&config);

    let state = AppState::new(config, true);
    state.seed_users().await;

    let key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                SecurityTransform::new()
                    .authenticator(state.authenticator())
                    .expose_server_errors(state.config.expose_server_errors),
            )
            .wrap(SessionMiddleware::new(CookieSessionStore::default(), key.clone()))
            .configure(|cfg| configure(cfg, &state))
    })
    .bind("127.0.0.1:8080")?
    .run()
    .await
}
