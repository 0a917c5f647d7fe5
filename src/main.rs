use std::env;
use std::path::Path;
use std::sync::Arc;

use page::fetch::{DirFetcher, Fetch, HttpFetcher};
use page::Url;
use tracing::{error, info, warn};

use config::SiteConfig;
use guildsite::data::SiteData;
use guildsite::session::Session;
use util::ctx;

/// Origin the pages of a local site directory are served under
const LOCAL_ORIGIN: &str = "http://localhost/";

#[tokio::main]
async fn main() {
    // Loaded ".env"
    let dotenv = dotenv::dotenv();

    // Initialize logging
    let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "./log".to_string());
    let _guard = guildsite::logging::init(&log_dir);
    if let Err(why) = dotenv {
        warn!("No .env file loaded: {}", why);
    }

    // Get global variables
    let config_file = env::var("SITE_CONFIG").unwrap_or_else(|_| "./site.json".to_string());
    let config = SiteConfig::new(&config_file).expect("Failed to read site config");
    let render_dir = env::var("RENDER_DIR").unwrap_or_else(|_| "./render".to_string());
    let (fetcher, origin): (Arc<dyn Fetch>, Url) = match (env::var("SITE_ROOT"), env::var("SITE_URL")) {
        (Ok(root), _) => {
            info!("Serving site from directory '{}'", root);
            (Arc::new(DirFetcher::new(root)), Url::parse(LOCAL_ORIGIN).expect("Valid local origin"))
        }
        (Err(_), Ok(url)) => {
            info!("Serving site from '{}'", url);
            let fetcher = HttpFetcher::new().expect("Failed to build http client");
            (Arc::new(fetcher), Url::parse(&url).expect("SITE_URL is not a valid url"))
        }
        _ => panic!("Expected SITE_ROOT or SITE_URL in the environment"),
    };

    let page_path = env::args().nth(1).unwrap_or_else(|| "index.html".to_string());
    let url = origin.join(&page_path).expect("Page path is not a valid url");

    let session = match ctx!(Session::open(SiteData::new(config, fetcher), url.clone()).await) {
        Ok(session) => session,
        Err(_) => return,
    };
    let html = session.render().await;

    let file_name = Path::new(url.path())
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("index.html")
        .to_string();
    let out = Path::new(&render_dir).join(file_name);
    if let Err(why) = tokio::fs::create_dir_all(&render_dir).await {
        error!("Failed to create render directory '{}': {}", render_dir, why);
        return;
    }
    match tokio::fs::write(&out, html).await {
        Ok(()) => info!("Rendered '{}' to '{}'", url, out.display()),
        Err(why) => error!("Failed to write '{}': {}", out.display(), why),
    }
}
