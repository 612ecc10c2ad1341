use std::path::PathBuf;

/// Environment variable naming the data file when no CLI argument is given.
pub const DATA_ENV: &str = "ANIME_DASHBOARD_DATA";
/// Environment variable for the number of genres shown in the bar chart.
pub const TOP_GENRES_ENV: &str = "ANIME_DASHBOARD_TOP_GENRES";

pub const DEFAULT_DATA_PATH: &str = "anime.csv";
pub const DEFAULT_TOP_GENRES: usize = 15;
pub const MAX_TOP_GENRES: usize = 50;

/// Startup settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub top_genres: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_genres: DEFAULT_TOP_GENRES,
        }
    }
}

impl AppConfig {
    /// Resolve from the process: first CLI argument, then environment.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::args().nth(1),
            std::env::var(DATA_ENV).ok(),
            std::env::var(TOP_GENRES_ENV).ok(),
        )
    }

    fn resolve(arg: Option<String>, data_env: Option<String>, top_env: Option<String>) -> Self {
        let mut config = AppConfig::default();

        if let Some(path) = arg.or(data_env).filter(|p| !p.trim().is_empty()) {
            config.data_path = PathBuf::from(path);
        }

        if let Some(raw) = top_env {
            match raw.trim().parse::<usize>() {
                Ok(n) => config.top_genres = n.clamp(1, MAX_TOP_GENRES),
                Err(_) => log::warn!(
                    "{TOP_GENRES_ENV}={raw:?} is not a number, using {DEFAULT_TOP_GENRES}"
                ),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides() {
        assert_eq!(AppConfig::resolve(None, None, None), AppConfig::default());
    }

    #[test]
    fn cli_argument_wins_over_environment() {
        let c = AppConfig::resolve(
            Some("data/top.csv".into()),
            Some("env.csv".into()),
            None,
        );
        assert_eq!(c.data_path, PathBuf::from("data/top.csv"));

        let c = AppConfig::resolve(None, Some("env.parquet".into()), None);
        assert_eq!(c.data_path, PathBuf::from("env.parquet"));
    }

    #[test]
    fn top_genres_is_clamped_and_validated() {
        assert_eq!(AppConfig::resolve(None, None, Some("0".into())).top_genres, 1);
        assert_eq!(AppConfig::resolve(None, None, Some("500".into())).top_genres, MAX_TOP_GENRES);
        assert_eq!(AppConfig::resolve(None, None, Some(" 8 ".into())).top_genres, 8);
        assert_eq!(
            AppConfig::resolve(None, None, Some("lots".into())).top_genres,
            DEFAULT_TOP_GENRES
        );
    }
}
