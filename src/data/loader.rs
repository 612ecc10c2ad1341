use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::coerce::{coerce_integer, coerce_numeric};
use super::model::{Anime, AnimeDataset};

/// Columns every input file must provide, in `anime.csv` order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "anime_id", "name", "genre", "type", "episodes", "rating", "members",
];

/// Schema problems that make a file unusable. Bad cells are not errors:
/// they are coerced to missing values.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: anime_id '{value}' is not an integer")]
    InvalidId { row: usize, value: String },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an anime dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the Kaggle `anime.csv` layout (recommended)
/// * `.json`    – `[{ "anime_id": 1, "name": "...", ... }, ...]`
/// * `.parquet` – flat columns with the same names
pub fn load_file(path: &Path) -> Result<AnimeDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_csv_reader(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} anime from {} ({} types)",
        dataset.len(),
        path.display(),
        dataset.kinds.len()
    );
    log::debug!(
        "{} rows with non-numeric episodes, {} without rating",
        dataset
            .records
            .iter()
            .filter(|a| a.episodes_numeric().is_none())
            .count(),
        dataset.records.iter().filter(|a| a.rating.is_none()).count()
    );
    Ok(dataset)
}

/// Cells of one row, already converted to text.
struct RawRow<'a> {
    anime_id: &'a str,
    name: &'a str,
    genre: &'a str,
    kind: &'a str,
    episodes: &'a str,
    rating: &'a str,
    members: &'a str,
}

impl RawRow<'_> {
    fn into_anime(self, row: usize) -> Result<Anime, LoadError> {
        let anime_id = coerce_integer(self.anime_id).ok_or_else(|| LoadError::InvalidId {
            row,
            value: self.anime_id.to_string(),
        })?;
        let kind = self.kind.trim();
        Ok(Anime {
            anime_id,
            name: self.name.to_string(),
            genre: self.genre.to_string(),
            kind: (!kind.is_empty()).then(|| kind.to_string()),
            episodes: self.episodes.trim().to_string(),
            rating: coerce_numeric(self.rating),
            members: coerce_integer(self.members),
        })
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, matched by name so column
/// order does not matter. Extra columns are ignored.
pub fn load_csv_reader<R: Read>(input: R) -> Result<AnimeDataset> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut idx = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, col) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == col)
            .ok_or(LoadError::MissingColumn(col))?;
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| record.get(idx[i]).unwrap_or("");
        let raw = RawRow {
            anime_id: cell(0),
            name: cell(1),
            genre: cell(2),
            kind: cell(3),
            episodes: cell(4),
            rating: cell(5),
            members: cell(6),
        };
        records.push(raw.into_anime(row_no)?);
    }

    Ok(AnimeDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "anime_id": 32281, "name": "Kimi no Na wa.", "genre": "Drama, Romance",
///     "type": "Movie", "episodes": "1", "rating": 9.37, "members": 200630 },
///   ...
/// ]
/// ```
///
/// Numbers and strings are both accepted in every column; `null` is missing.
fn load_json(path: &Path) -> Result<AnimeDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<AnimeDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut cells: [String; REQUIRED_COLUMNS.len()] = Default::default();
        for (cell, col) in cells.iter_mut().zip(REQUIRED_COLUMNS) {
            *cell = json_to_text(obj.get(col).ok_or(LoadError::MissingColumn(col))?);
        }
        let raw = RawRow {
            anime_id: &cells[0],
            name: &cells[1],
            genre: &cells[2],
            kind: &cells[3],
            episodes: &cells[4],
            rating: &cells[5],
            members: &cells[6],
        };
        records.push(raw.into_anime(i)?);
    }

    Ok(AnimeDataset::from_records(records))
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by **Pandas** (`df.to_parquet()`) or
/// **Polars** (`df.write_parquet()`).
///
/// Each required column may be stored as text, integer or float; cells are
/// rendered to text and then coerced exactly like CSV cells.
fn load_parquet(path: &Path) -> Result<AnimeDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: Vec<&Arc<dyn Array>> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for col in REQUIRED_COLUMNS {
            let i = schema
                .index_of(col)
                .map_err(|_| LoadError::MissingColumn(col))?;
            columns.push(batch.column(i));
        }

        for row in 0..batch.num_rows() {
            let cells: Vec<String> = columns
                .iter()
                .map(|c| extract_text(c, row))
                .collect::<Result<_>>()
                .with_context(|| format!("Row {row}"))?;
            let raw = RawRow {
                anime_id: &cells[0],
                name: &cells[1],
                genre: &cells[2],
                kind: &cells[3],
                episodes: &cells[4],
                rating: &cells[5],
                members: &cells[6],
            };
            let row_no = records.len();
            records.push(raw.into_anime(row_no)?);
        }
    }

    Ok(AnimeDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

/// Render a single cell as text. Nulls become the empty string.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let text = match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string(),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string(),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row)
            .to_string(),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)
            .to_string(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
anime_id,name,genre,type,episodes,rating,members
32281,Kimi no Na wa.,\"Drama, Romance, School, Supernatural\",Movie,1,9.37,200630
5114,Fullmetal Alchemist: Brotherhood,\"Action, Adventure, Drama\",TV,64,9.26,793665
34103,Tsuki ga Kirei,\"Romance, School\",TV,Unknown,,
30484,Steins;Gate 0,\"Sci-Fi, Thriller\",,Unknown,,60999
";

    #[test]
    fn csv_rows_are_parsed_and_coerced() {
        let ds = load_csv_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);

        let kimi = &ds.records[0];
        assert_eq!(kimi.anime_id, 32281);
        assert_eq!(kimi.kind.as_deref(), Some("Movie"));
        assert_eq!(kimi.genres().count(), 4);
        assert_eq!(kimi.rating, Some(9.37));
        assert_eq!(kimi.members, Some(200630));

        let tsuki = &ds.records[2];
        assert_eq!(tsuki.episodes, "Unknown");
        assert_eq!(tsuki.episodes_numeric(), None);
        assert_eq!(tsuki.rating, None);
        assert_eq!(tsuki.members, None);

        assert_eq!(ds.records[3].kind, None);
        let kinds: Vec<&str> = ds.kinds.iter().map(String::as_str).collect();
        assert_eq!(kinds, vec!["Movie", "TV"]);
    }

    #[test]
    fn csv_columns_are_matched_by_name() {
        let input = "rating,type,members,episodes,genre,name,anime_id,extra\n8.5,OVA,10,2,Comedy,X,7,zzz\n";
        let ds = load_csv_reader(input.as_bytes()).unwrap();
        let a = &ds.records[0];
        assert_eq!(a.anime_id, 7);
        assert_eq!(a.name, "X");
        assert_eq!(a.rating, Some(8.5));
        assert_eq!(a.episodes_numeric(), Some(2.0));
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let input = "anime_id,name,genre,type,episodes,members\n1,A,Action,TV,12,5\n";
        let err = load_csv_reader(input.as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn("rating"))
        ));
    }

    #[test]
    fn csv_bad_id_is_reported_with_row() {
        let input = "anime_id,name,genre,type,episodes,rating,members\n1,A,,TV,1,7,1\nabc,B,,TV,1,7,1\n";
        let err = load_csv_reader(input.as_bytes()).unwrap_err();
        match err.downcast_ref::<LoadError>() {
            Some(LoadError::InvalidId { row, value }) => {
                assert_eq!(*row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn json_accepts_numbers_strings_and_nulls() {
        let text = r#"[
            {"anime_id": 1, "name": "A", "genre": "Action", "type": "TV",
             "episodes": 12, "rating": 7.5, "members": 100},
            {"anime_id": "2", "name": "B", "genre": "", "type": null,
             "episodes": "Unknown", "rating": null, "members": "40"}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].episodes_numeric(), Some(12.0));
        assert_eq!(ds.records[0].rating, Some(7.5));
        assert_eq!(ds.records[1].anime_id, 2);
        assert_eq!(ds.records[1].kind, None);
        assert_eq!(ds.records[1].rating, None);
        assert_eq!(ds.records[1].members, Some(40));
    }

    #[test]
    fn json_missing_column_is_reported() {
        let err = parse_json(r#"[{"anime_id": 1}]"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn("name"))
        ));
    }

    #[test]
    fn parquet_numeric_and_text_columns_are_coerced() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("anime_id", DataType::Int64, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("genre", DataType::Utf8, false),
            Field::new("type", DataType::Utf8, true),
            Field::new("episodes", DataType::Int32, true),
            Field::new("rating", DataType::Float64, true),
            Field::new("members", DataType::Int64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![10, 11])),
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(StringArray::from(vec!["Action, Mecha", "Comedy"])),
                Arc::new(StringArray::from(vec![Some("TV"), None])),
                Arc::new(Int32Array::from(vec![Some(26), None])),
                Arc::new(Float64Array::from(vec![Some(8.5), None])),
                Arc::new(Int64Array::from(vec![Some(1200), Some(7)])),
            ],
        )
        .unwrap();

        let path = std::env::temp_dir().join(format!("anime-loader-{}.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].anime_id, 10);
        assert_eq!(ds.records[0].episodes_numeric(), Some(26.0));
        assert_eq!(ds.records[0].rating, Some(8.5));
        assert_eq!(ds.records[0].genres().count(), 2);
        assert_eq!(ds.records[1].kind, None);
        assert_eq!(ds.records[1].episodes_numeric(), None);
        assert_eq!(ds.records[1].rating, None);
        assert_eq!(ds.records[1].members, Some(7));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("anime.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}
