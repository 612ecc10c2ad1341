/// Data layer: core types, loading, aggregation and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → AnimeDataset (cells coerced)
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ AnimeDataset  │  Vec<Anime>, type index, immutable
///   └──────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  filter   │  rating range + type → indices
///   └──────────┘   └──────────┘
/// ```

pub mod coerce;
pub mod loader;
pub mod model;
pub mod filter;
pub mod stats;
