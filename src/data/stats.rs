use std::collections::HashMap;

use super::model::{Anime, AnimeDataset};

// ---------------------------------------------------------------------------
// Scalar aggregations
// ---------------------------------------------------------------------------

/// Arithmetic mean of the present values, `None` when nothing is present.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Quantile `q` (0..=1) of already sorted values, interpolating linearly
/// between the closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted_present<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut v: Vec<f64> = values.into_iter().flatten().collect();
    v.sort_by(f64::total_cmp);
    v
}

// ---------------------------------------------------------------------------
// describe()
// ---------------------------------------------------------------------------

/// Descriptive statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1). `None` below two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarise the present values; `None` when the column is entirely missing.
pub fn describe<I>(values: I) -> Option<Describe>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let sorted = sorted_present(values);
    let count = sorted.len();
    let mean = mean(sorted.iter().copied().map(Some))?;
    let std = (count > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    });
    Some(Describe {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q75: quantile(&sorted, 0.75)?,
        max: sorted[count - 1],
    })
}

/// `describe()` for every numeric column, labelled for display.
pub fn describe_columns(records: &[Anime]) -> Vec<(&'static str, Option<Describe>)> {
    vec![
        ("rating", describe(records.iter().map(|a| a.rating))),
        ("members", describe(records.iter().map(|a| a.members.map(|m| m as f64)))),
        ("episodes", describe(records.iter().map(Anime::episodes_numeric))),
    ]
}

// ---------------------------------------------------------------------------
// value_counts()
// ---------------------------------------------------------------------------

/// Count label occurrences. Ordered by count descending, ties broken by
/// label ascending.
pub fn value_counts<'a, I>(labels: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Explode every record's genre list and count each genre.
pub fn genre_counts(dataset: &AnimeDataset) -> Vec<(String, usize)> {
    value_counts(dataset.records.iter().flat_map(Anime::genres))
}

/// Count records per type. Records without a type are skipped.
pub fn type_counts(dataset: &AnimeDataset) -> Vec<(String, usize)> {
    value_counts(dataset.records.iter().filter_map(|a| a.kind.as_deref()))
}

// ---------------------------------------------------------------------------
// Metric tiles
// ---------------------------------------------------------------------------

/// The three headline numbers shown above the tabs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub total: usize,
    pub avg_rating: Option<f64>,
    pub avg_episodes: Option<f64>,
}

impl Metrics {
    pub fn compute(records: &[Anime]) -> Self {
        Metrics {
            total: records.len(),
            avg_rating: mean(records.iter().map(|a| a.rating)),
            avg_episodes: mean(records.iter().map(Anime::episodes_numeric)),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-type views
// ---------------------------------------------------------------------------

/// Box-plot geometry for one group.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub label: String,
    pub count: usize,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    /// Whiskers extend to the furthest data points within 1.5 × IQR.
    pub fn from_values<I>(label: &str, values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let sorted = sorted_present(values);
        let q1 = quantile(&sorted, 0.25)?;
        let median = quantile(&sorted, 0.5)?;
        let q3 = quantile(&sorted, 0.75)?;
        let reach = 1.5 * (q3 - q1);
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - reach)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + reach)
            .unwrap_or(q3);
        Some(BoxSummary {
            label: label.to_string(),
            count: sorted.len(),
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// Rating distribution per type, in type order. Types with no rated record
/// are left out.
pub fn rating_box_by_type(dataset: &AnimeDataset) -> Vec<BoxSummary> {
    dataset
        .kinds
        .iter()
        .filter_map(|kind| {
            BoxSummary::from_values(
                kind,
                records_of_kind(dataset, kind).map(|a| a.rating),
            )
        })
        .collect()
}

/// Grouped summary row for the insights table.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSummary {
    pub kind: String,
    pub count: usize,
    pub rating: Option<Describe>,
    pub mean_members: Option<f64>,
    pub mean_episodes: Option<f64>,
}

pub fn summary_by_type(dataset: &AnimeDataset) -> Vec<TypeSummary> {
    dataset
        .kinds
        .iter()
        .map(|kind| TypeSummary {
            kind: kind.clone(),
            count: records_of_kind(dataset, kind).count(),
            rating: describe(records_of_kind(dataset, kind).map(|a| a.rating)),
            mean_members: mean(
                records_of_kind(dataset, kind).map(|a| a.members.map(|m| m as f64)),
            ),
            mean_episodes: mean(records_of_kind(dataset, kind).map(Anime::episodes_numeric)),
        })
        .collect()
}

fn records_of_kind<'a>(dataset: &'a AnimeDataset, kind: &'a str) -> impl Iterator<Item = &'a Anime> {
    dataset
        .records
        .iter()
        .filter(move |a| a.kind.as_deref() == Some(kind))
}

// ---------------------------------------------------------------------------
// corr()
// ---------------------------------------------------------------------------

/// Pearson correlation between the numeric columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationMatrix {
    pub columns: Vec<&'static str>,
    /// Row-major, `columns.len()` squared. `None` where fewer than two rows
    /// have both values, or one side has no variance.
    pub values: Vec<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row * self.columns.len() + col).copied().flatten()
    }
}

/// Pearson correlation over the rows where both values are present.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (sxy, sxx, syy) = pairs.iter().fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), &(x, y)| {
        let (dx, dy) = (x - mx, y - my);
        (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
    });
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

/// `corr()` over rating, members and numeric episodes.
pub fn correlation_matrix(records: &[Anime]) -> CorrelationMatrix {
    let columns: Vec<(&'static str, Vec<Option<f64>>)> = vec![
        ("rating", records.iter().map(|a| a.rating).collect()),
        ("members", records.iter().map(|a| a.members.map(|m| m as f64)).collect()),
        ("episodes", records.iter().map(Anime::episodes_numeric).collect()),
    ];

    let mut values = Vec::with_capacity(columns.len() * columns.len());
    for (_, xs) in &columns {
        for (_, ys) in &columns {
            let pairs: Vec<(f64, f64)> = xs
                .iter()
                .zip(ys)
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .collect();
            values.push(pearson(&pairs));
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|(name, _)| *name).collect(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Rating histogram with one count series per type, for stacked bars.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    /// Left edge of the first bin.
    pub start: f64,
    pub bin_width: f64,
    /// (type, count per bin); every series has the same length.
    pub series: Vec<(String, Vec<usize>)>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.series.first().map_or(0, |(_, c)| c.len())
    }

    pub fn bin_center(&self, bin: usize) -> f64 {
        self.start + self.bin_width * (bin as f64 + 0.5)
    }
}

/// Bin ratings by `bin_width`, split by type. Bins start at the whole number
/// below the lowest rating; the top edge is inclusive.
pub fn rating_histogram_by_type(dataset: &AnimeDataset, bin_width: f64) -> Histogram {
    let rated = || dataset.records.iter().filter_map(|a| Some((a.kind.as_deref()?, a.rating?)));
    let (lo, hi) = rated().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, r)| {
        (lo.min(r), hi.max(r))
    });
    if lo > hi || bin_width <= 0.0 {
        return Histogram::default();
    }

    let start = lo.floor();
    let bins = (((hi - start) / bin_width).floor() as usize + 1).max(1);
    let series = dataset
        .kinds
        .iter()
        .map(|kind| {
            let mut counts = vec![0usize; bins];
            for (_, r) in rated().filter(|(k, _)| *k == kind.as_str()) {
                let bin = (((r - start) / bin_width).floor() as usize).min(bins - 1);
                counts[bin] += 1;
            }
            (kind.clone(), counts)
        })
        .collect();

    Histogram { start, bin_width, series }
}
