//! Server command implementation

use std::path::Path;

use anyhow::Result;

use super::{open_db, Session};

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    allowed_origins: Vec<String>,
    session: &Session,
) -> Result<()> {
    println!("🚀 Starting SpendWise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Timezone: {}", session.config.timezone);

    // Parse API keys from environment (comma-separated)
    let api_keys = spendwise_server::parse_api_keys(
        &std::env::var(spendwise_server::API_KEYS_ENV).unwrap_or_default(),
    );

    if no_auth {
        println!();
        println!("   ⚠️  Authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!(
            "   ❌ No API keys configured. Set {} or every request will be rejected",
            spendwise_server::API_KEYS_ENV
        );
    } else {
        println!(
            "   🔑 API keys: {} configured ({})",
            api_keys.len(),
            spendwise_server::API_KEYS_ENV
        );
    }
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;

    let config = spendwise_server::ServerConfig {
        require_auth: !no_auth,
        allowed_origins,
        api_keys,
        engine: session.config,
    };

    spendwise_server::serve(db, host, port, config).await?;

    Ok(())
}
