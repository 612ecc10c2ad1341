use std::path::Path;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::filter::{FilterState, RatingRange, filtered_indices};
use crate::data::loader::load_file;
use crate::data::model::AnimeDataset;
use crate::data::stats::{
    self, BoxSummary, CorrelationMatrix, Describe, Histogram, Metrics, TypeSummary,
};

/// Width of one rating histogram bin.
const RATING_BIN_WIDTH: f64 = 0.25;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Distribution,
    Relationships,
    Insights,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Distribution, Tab::Relationships, Tab::Insights];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Distribution => "Anime Distribution",
            Tab::Relationships => "Feature Relationships",
            Tab::Insights => "Statistical Insights",
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// Everything computed from the dataset alone. Rebuilt only when a new
/// dataset is installed.
#[derive(Debug, Clone, Default)]
pub struct DerivedViews {
    pub metrics: Metrics,
    pub genre_counts: Vec<(String, usize)>,
    pub type_counts: Vec<(String, usize)>,
    pub describe: Vec<(&'static str, Option<Describe>)>,
    pub rating_boxes: Vec<BoxSummary>,
    pub type_summary: Vec<TypeSummary>,
    pub correlation: CorrelationMatrix,
    pub rating_histogram: Histogram,
    pub type_colors: ColorMap,
    /// Observed rating span; the slider bounds.
    pub rating_bounds: RatingRange,
}

impl DerivedViews {
    pub fn compute(dataset: &AnimeDataset) -> Self {
        DerivedViews {
            metrics: Metrics::compute(&dataset.records),
            genre_counts: stats::genre_counts(dataset),
            type_counts: stats::type_counts(dataset),
            describe: stats::describe_columns(&dataset.records),
            rating_boxes: stats::rating_box_by_type(dataset),
            type_summary: stats::summary_by_type(dataset),
            correlation: stats::correlation_matrix(&dataset.records),
            rating_histogram: stats::rating_histogram_by_type(dataset, RATING_BIN_WIDTH),
            type_colors: ColorMap::new(dataset.kinds.iter().map(String::as_str)),
            rating_bounds: RatingRange::spanning(dataset),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<AnimeDataset>,

    /// Cached aggregations of `dataset`.
    pub views: DerivedViews,

    /// Rating range and type selection for the insights tab.
    pub filter: FilterState,

    /// Indices of records passing `filter` (cached).
    pub visible_indices: Vec<usize>,

    /// Sidebar "Show Raw Data" checkbox.
    pub show_raw_data: bool,

    pub active_tab: Tab,

    /// How many genres the bar chart shows.
    pub top_genres: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dataset: None,
            views: DerivedViews::default(),
            filter: FilterState::default(),
            visible_indices: Vec::new(),
            show_raw_data: false,
            active_tab: Tab::default(),
            top_genres: config.top_genres,
            status_message: None,
        }
    }

    /// Load `path` and install it, or keep the current dataset and record
    /// the error in the status line.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset filters and rebuild every view.
    pub fn set_dataset(&mut self, dataset: AnimeDataset) {
        self.views = DerivedViews::compute(&dataset);
        self.filter = FilterState::for_dataset(&dataset);
        self.visible_indices = filtered_indices(&dataset, &self.filter);
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
        }
    }

    /// The bar chart's slice of `genre_counts`.
    pub fn top_genre_counts(&self) -> &[(String, usize)] {
        let n = self.top_genres.min(self.views.genre_counts.len());
        &self.views.genre_counts[..n]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::TypeFilter;
    use crate::data::loader::load_csv_reader;

    const SAMPLE: &str = "\
anime_id,name,genre,type,episodes,rating,members
1,A,\"Action, Comedy\",TV,12,7.5,100
2,B,Drama,Movie,Unknown,9.0,200
3,C,\"Action, Drama\",TV,24,8.2,300
";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(load_csv_reader(SAMPLE.as_bytes()).unwrap());
        state
    }

    #[test]
    fn set_dataset_builds_views_and_selects_everything() {
        let state = loaded();
        assert_eq!(state.views.metrics.total, 3);
        assert_eq!(state.views.metrics.avg_episodes, Some(18.0));
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.views.type_counts[0], ("TV".to_string(), 2));
        assert_eq!(state.views.describe.len(), 3);
        assert_eq!(state.views.type_colors.legend_entries().len(), 2);
        assert_eq!(state.views.correlation.columns.len(), 3);
        assert_eq!(state.views.rating_histogram.series.len(), 2);
    }

    #[test]
    fn refilter_follows_filter_changes() {
        let mut state = loaded();
        state.filter.rating = RatingRange::new(8.0, 9.0);
        state.refilter();
        assert_eq!(state.visible_indices, vec![1, 2]);

        state.filter.kind = TypeFilter::Only("TV".to_string());
        state.refilter();
        assert_eq!(state.visible_indices, vec![2]);
    }

    #[test]
    fn top_genres_never_exceeds_available() {
        let mut state = loaded();
        state.top_genres = 2;
        assert_eq!(
            state.top_genre_counts(),
            &[("Action".to_string(), 2), ("Drama".to_string(), 2)]
        );
        state.top_genres = 50;
        assert_eq!(state.top_genre_counts().len(), 3);
    }

    #[test]
    fn failed_load_keeps_dataset_and_reports() {
        let mut state = loaded();
        state.load(Path::new("does/not/exist.csv"));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }
}
