use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

use crate::config::Config;

pub fn init_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(Level::from_str(&config.logs.level).unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .init();
}

/// Library root from the first command-line argument, else `library.root`.
pub fn resolve_library_root(config: &Config, arg: Option<String>) -> Result<PathBuf, String> {
    arg.or_else(|| config.library.root.clone())
        .filter(|root| !root.trim().is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            "No library root given: pass it as the first argument or set library.root".to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_overrides_configured_root() {
        let mut config = Config::default();
        assert!(resolve_library_root(&config, None).is_err());

        config.library.root = Some("/srv/tv".to_string());
        assert_eq!(resolve_library_root(&config, None).unwrap(), PathBuf::from("/srv/tv"));
        assert_eq!(
            resolve_library_root(&config, Some("/mnt/tv".to_string())).unwrap(),
            PathBuf::from("/mnt/tv")
        );
    }
}
