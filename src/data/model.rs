use std::collections::BTreeSet;

use super::coerce::coerce_numeric;

// ---------------------------------------------------------------------------
// Anime – one row of the source table
// ---------------------------------------------------------------------------

/// A single anime record (one row of `anime.csv`).
#[derive(Debug, Clone, PartialEq)]
pub struct Anime {
    pub anime_id: i64,
    pub name: String,
    /// Comma-separated genre labels, e.g. `"Action, Comedy, Shounen"`.
    pub genre: String,
    /// The `type` column (TV, Movie, OVA, ...). Empty cells are `None`.
    pub kind: Option<String>,
    /// Raw episode count text. The source mixes integers with `Unknown`.
    pub episodes: String,
    pub rating: Option<f64>,
    pub members: Option<i64>,
}

impl Anime {
    /// Individual genre tokens, trimmed, empty tokens dropped.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    /// Episode count coerced to a number; `None` for non-numeric text.
    pub fn episodes_numeric(&self) -> Option<f64> {
        coerce_numeric(&self.episodes)
    }
}

// ---------------------------------------------------------------------------
// AnimeDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Never mutated after loading; filters and
/// aggregations produce derived values.
#[derive(Debug, Clone, Default)]
pub struct AnimeDataset {
    pub records: Vec<Anime>,
    /// Sorted distinct values of the `type` column.
    pub kinds: BTreeSet<String>,
}

impl AnimeDataset {
    /// Build the type index from the loaded records.
    pub fn from_records(records: Vec<Anime>) -> Self {
        let kinds = records
            .iter()
            .filter_map(|a| a.kind.clone())
            .collect();
        AnimeDataset { records, kinds }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Compact constructor shared by the data-layer tests.
    pub(crate) fn anime(id: i64, genre: &str, kind: &str, episodes: &str, rating: Option<f64>) -> Anime {
        Anime {
            anime_id: id,
            name: format!("Anime {id}"),
            genre: genre.to_string(),
            kind: (!kind.is_empty()).then(|| kind.to_string()),
            episodes: episodes.to_string(),
            rating,
            members: Some(id * 1000),
        }
    }

    #[test]
    fn genres_are_trimmed_and_empty_tokens_dropped() {
        let a = anime(1, " Action,Comedy , ,Drama,", "TV", "12", None);
        let genres: Vec<&str> = a.genres().collect();
        assert_eq!(genres, vec!["Action", "Comedy", "Drama"]);
    }

    #[test]
    fn empty_genre_yields_no_tokens() {
        let a = anime(1, "", "TV", "12", None);
        assert_eq!(a.genres().count(), 0);
    }

    #[test]
    fn kinds_index_is_sorted_and_skips_missing() {
        let ds = AnimeDataset::from_records(vec![
            anime(1, "", "TV", "1", None),
            anime(2, "", "Movie", "1", None),
            anime(3, "", "", "1", None),
            anime(4, "", "TV", "1", None),
        ]);
        let kinds: Vec<&str> = ds.kinds.iter().map(String::as_str).collect();
        assert_eq!(kinds, vec!["Movie", "TV"]);
        assert_eq!(ds.len(), 4);
    }
}
