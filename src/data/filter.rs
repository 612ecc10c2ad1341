use super::model::{Anime, AnimeDataset};

// ---------------------------------------------------------------------------
// Rating range
// ---------------------------------------------------------------------------

/// Inclusive rating bounds. `min > max` selects nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl Default for RatingRange {
    fn default() -> Self {
        RatingRange { min: 0.0, max: 10.0 }
    }
}

impl RatingRange {
    pub fn new(min: f64, max: f64) -> Self {
        RatingRange { min, max }
    }

    /// Round both bounds to the nearest tenth. Slider stepping accumulates
    /// float error (1.6 + 0.1 lands on 1.7000000000000002), which would
    /// exclude records rated exactly on a bound.
    pub fn snapped(self) -> Self {
        RatingRange {
            min: snap_tenth(self.min),
            max: snap_tenth(self.max),
        }
    }

    /// Whether a rating lies within the bounds. Missing ratings never match.
    pub fn contains(&self, rating: Option<f64>) -> bool {
        rating.is_some_and(|r| self.min <= r && r <= self.max)
    }

    /// Observed rating range of the dataset, widened to one decimal so the
    /// extreme rows stay selected after slider rounding.
    pub fn spanning(dataset: &AnimeDataset) -> Self {
        let (lo, hi) = dataset
            .records
            .iter()
            .filter_map(|a| a.rating)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r), hi.max(r))
            });
        if lo > hi {
            return RatingRange::default();
        }
        RatingRange {
            min: (lo * 10.0).floor() / 10.0,
            max: (hi * 10.0).ceil() / 10.0,
        }
    }
}

fn snap_tenth(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Type selector
// ---------------------------------------------------------------------------

/// Restrict the filtered view to one type, or show every type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn matches(&self, anime: &Anime) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => anime.kind.as_deref() == Some(kind.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Only(kind) => kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Combined filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub rating: RatingRange,
    pub kind: TypeFilter,
}

impl FilterState {
    /// Everything selected: full observed rating range, all types.
    pub fn for_dataset(dataset: &AnimeDataset) -> Self {
        FilterState {
            rating: RatingRange::spanning(dataset),
            kind: TypeFilter::All,
        }
    }

    pub fn matches(&self, anime: &Anime) -> bool {
        self.rating.contains(anime.rating) && self.kind.matches(anime)
    }
}

/// Indices of records passing the filter, in source order.
pub fn filtered_indices(dataset: &AnimeDataset, filter: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, a)| filter.matches(a))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::anime;

    fn dataset() -> AnimeDataset {
        AnimeDataset::from_records(vec![
            anime(1, "", "TV", "12", Some(7.5)),
            anime(2, "", "Movie", "1", Some(9.0)),
            anime(3, "", "TV", "24", Some(8.2)),
            anime(4, "", "OVA", "2", None),
            anime(5, "", "TV", "13", Some(6.0)),
        ])
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let ds = dataset();
        let filter = FilterState {
            rating: RatingRange::new(7.5, 8.2),
            kind: TypeFilter::All,
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 2]);
    }

    #[test]
    fn missing_rating_never_matches() {
        let range = RatingRange::new(f64::MIN, f64::MAX);
        assert!(!range.contains(None));
        assert!(range.contains(Some(0.0)));
    }

    #[test]
    fn inverted_bounds_select_nothing() {
        let ds = dataset();
        let filter = FilterState {
            rating: RatingRange::new(9.0, 6.0),
            kind: TypeFilter::All,
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn reapplying_filter_is_idempotent() {
        let ds = dataset();
        let filter = FilterState {
            rating: RatingRange::new(7.0, 10.0),
            kind: TypeFilter::All,
        };
        let first = filtered_indices(&ds, &filter);
        let subset = AnimeDataset::from_records(
            first.iter().map(|&i| ds.records[i].clone()).collect(),
        );
        let second = filtered_indices(&subset, &filter);
        assert_eq!(second, (0..first.len()).collect::<Vec<_>>());
        for (i, &j) in second.iter().zip(&first) {
            assert_eq!(subset.records[*i], ds.records[j]);
        }
    }

    #[test]
    fn type_filter_combines_with_rating() {
        let ds = dataset();
        let filter = FilterState {
            rating: RatingRange::new(7.0, 10.0),
            kind: TypeFilter::Only("TV".to_string()),
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 2]);
        assert_eq!(filter.kind.label(), "TV");
    }

    #[test]
    fn slider_stepped_bounds_keep_rows_on_the_boundary() {
        // Every tenth from 1.7 to 10.0, as parsed from CSV text.
        let ratings: Vec<f64> = (17..=100)
            .map(|t| format!("{}.{}", t / 10, t % 10).parse().unwrap())
            .collect();
        let ds = AnimeDataset::from_records(
            ratings
                .iter()
                .enumerate()
                .map(|(i, &r)| anime(i as i64, "", "TV", "1", Some(r)))
                .collect(),
        );
        let start = 1.6;
        let step = 0.1;
        let mut stepped_off = 0;
        for (i, &r) in ratings.iter().enumerate() {
            // How a stepped slider stores a value picked at `r`.
            let raw = start + ((r - start) / step).round() * step;
            if raw != r {
                stepped_off += 1;
            }
            let filter = FilterState {
                rating: RatingRange::new(raw, raw).snapped(),
                kind: TypeFilter::All,
            };
            assert_eq!(filtered_indices(&ds, &filter), vec![i], "rating {r} (slider {raw})");
        }
        assert!(stepped_off > 0);
    }

    #[test]
    fn snapping_rounds_to_tenths() {
        let r = RatingRange::new(1.7000000000000002, 8.299999999999999).snapped();
        assert_eq!(r, RatingRange::new(1.7, 8.3));
    }

    #[test]
    fn spanning_range_covers_every_rating() {
        let ds = dataset();
        let filter = FilterState::for_dataset(&ds);
        assert_eq!(filter.rating, RatingRange::new(6.0, 9.0));
        assert_eq!(filtered_indices(&ds, &filter), vec![0, 1, 2, 4]);
        assert_eq!(
            RatingRange::spanning(&AnimeDataset::default()),
            RatingRange::default()
        );
    }
}
