//! Writes a synthetic `anime.csv` and `anime.parquet` with the same columns
//! as the real dataset, including the messy bits: `Unknown` episode counts,
//! missing ratings and missing types.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 2000;

const GENRES: [&str; 16] = [
    "Action", "Adventure", "Comedy", "Drama", "Fantasy", "Horror", "Mecha", "Music",
    "Mystery", "Romance", "School", "Sci-Fi", "Shounen", "Slice of Life", "Sports",
    "Supernatural",
];

/// (type, weight, typical episode count)
const TYPES: [(&str, f64, f64); 6] = [
    ("TV", 0.35, 24.0),
    ("OVA", 0.20, 3.0),
    ("Movie", 0.18, 1.0),
    ("Special", 0.14, 2.0),
    ("ONA", 0.08, 8.0),
    ("Music", 0.05, 1.0),
];

#[derive(Serialize)]
struct Row {
    anime_id: i64,
    name: String,
    genre: String,
    #[serde(rename = "type")]
    kind: String,
    episodes: String,
    rating: Option<f64>,
    members: i64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn pick_type(rng: &mut SimpleRng) -> (&'static str, f64) {
    let mut roll = rng.next_f64();
    for (kind, weight, episodes) in TYPES {
        if roll < weight {
            return (kind, episodes);
        }
        roll -= weight;
    }
    (TYPES[0].0, TYPES[0].2)
}

fn generate_row(id: i64, rng: &mut SimpleRng) -> Row {
    let (kind, typical_episodes) = pick_type(rng);

    let n_genres = 1 + rng.below(4);
    let mut genres: Vec<&str> = Vec::with_capacity(n_genres);
    while genres.len() < n_genres {
        let g = GENRES[rng.below(GENRES.len())];
        if !genres.contains(&g) {
            genres.push(g);
        }
    }
    genres.sort_unstable();

    // About one in twenty titles is still airing.
    let episodes = if rng.next_f64() < 0.05 {
        "Unknown".to_string()
    } else {
        let eps = rng.gauss(typical_episodes, typical_episodes * 0.5).round().max(1.0);
        format!("{eps}")
    };

    let rating = (rng.next_f64() >= 0.02)
        .then(|| (rng.gauss(6.5, 1.0).clamp(1.0, 10.0) * 100.0).round() / 100.0);

    // Better rated shows attract larger communities.
    let quality = rating.unwrap_or(5.0);
    let members = 10f64
        .powf(rng.gauss(2.0 + quality * 0.35, 0.6))
        .round()
        .max(1.0) as i64;

    Row {
        anime_id: id,
        name: format!("Sample Anime {id}"),
        genre: genres.join(", "),
        kind: if rng.next_f64() < 0.01 { String::new() } else { kind.to_string() },
        episodes,
        rating,
        members,
    }
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("anime_id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("genre", DataType::Utf8, false),
        Field::new("type", DataType::Utf8, true),
        Field::new("episodes", DataType::Utf8, false),
        Field::new("rating", DataType::Float64, true),
        Field::new("members", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.anime_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.genre.as_str()))),
            Arc::new(StringArray::from_iter(
                rows.iter().map(|r| (!r.kind.is_empty()).then_some(r.kind.as_str())),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.episodes.as_str()))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.rating))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.members))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let rows: Vec<Row> = (0..ROWS)
        .map(|i| generate_row(i as i64 + 1, &mut rng))
        .collect();

    write_csv(&rows, "anime.csv")?;
    write_parquet(&rows, "anime.parquet")?;

    log::info!("Wrote {} anime to anime.csv and anime.parquet", rows.len());
    println!("Wrote {} anime to anime.csv and anime.parquet", rows.len());
    Ok(())
}
