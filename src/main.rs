mod app;
mod config;
mod core;
mod utils;

fn main() {
    dotenvy::dotenv().ok();

    let config = match config::Config::init() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {e}");
            std::process::exit(2);
        }
    };
    app::common::init_logging(&config);

    let root = match app::common::resolve_library_root(&config, std::env::args().nth(1)) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };

    let report = match app::library::scan_library(&root, &config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Library scan failed: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize report: {e}");
            std::process::exit(1);
        }
    }
}
