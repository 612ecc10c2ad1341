use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Anime, AnimeDataset};
use crate::data::stats::{Describe, TypeSummary};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 20.0;
const MAX_TABLE_HEIGHT: f32 = 300.0;

/// Render a missing value the way the dataframe widget does.
fn opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "NaN".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Record table
// ---------------------------------------------------------------------------

/// Scrollable table of the records at `indices`, or of every record when
/// `indices` is `None`. Only visible rows are laid out.
pub fn anime_table(ui: &mut Ui, id: &str, dataset: &AnimeDataset, indices: Option<&[usize]>) {
    let row_count = indices.map_or(dataset.len(), <[usize]>::len);

    const HEADERS: [&str; 7] = [
        "anime_id", "name", "genre", "type", "episodes", "rating", "members",
    ];

    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(MAX_TABLE_HEIGHT)
            .column(Column::auto())
            .column(Column::initial(220.0).clip(true))
            .column(Column::initial(260.0).clip(true))
            .columns(Column::auto(), 4)
            .header(HEADER_HEIGHT, |mut header| {
                for h in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, row_count, |mut row| {
                    let a: &Anime = &dataset.records[record_index(indices, row.index())];
                    let cells = [
                        a.anime_id.to_string(),
                        a.name.clone(),
                        a.genre.clone(),
                        a.kind.clone().unwrap_or_default(),
                        a.episodes.clone(),
                        opt(a.rating, 2),
                        a.members.map(|m| m.to_string()).unwrap_or_else(|| "NaN".into()),
                    ];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

/// Record behind table row `row`.
fn record_index(indices: Option<&[usize]>, row: usize) -> usize {
    indices.map_or(row, |idx| idx[row])
}

// ---------------------------------------------------------------------------
// describe() table
// ---------------------------------------------------------------------------

/// One column per numeric field, one row per statistic.
pub fn describe_table(ui: &mut Ui, columns: &[(&'static str, Option<Describe>)]) {
    const STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    let value = |d: &Option<Describe>, stat: usize| -> String {
        let Some(d) = d else {
            return if stat == 0 { "0".to_string() } else { "NaN".to_string() };
        };
        match stat {
            0 => d.count.to_string(),
            1 => opt(Some(d.mean), 2),
            2 => opt(d.std, 2),
            3 => opt(Some(d.min), 2),
            4 => opt(Some(d.q25), 2),
            5 => opt(Some(d.median), 2),
            6 => opt(Some(d.q75), 2),
            _ => opt(Some(d.max), 2),
        }
    };

    ui.push_id("describe_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .columns(Column::auto().at_least(90.0), columns.len())
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.label("");
                });
                for (name, _) in columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|mut body| {
                for (stat, label) in STATS.iter().enumerate() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.strong(*label);
                        });
                        for (_, d) in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(value(d, stat));
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Grouped summary table
// ---------------------------------------------------------------------------

pub fn type_summary_table(ui: &mut Ui, rows: &[TypeSummary]) {
    const HEADERS: [&str; 8] = [
        "Type",
        "Count",
        "Rating Mean",
        "Rating Std",
        "Rating Min",
        "Rating Max",
        "Members Mean",
        "Episodes Mean",
    ];

    if rows.is_empty() {
        ui.label(RichText::new("No typed records.").italics());
        return;
    }

    ui.push_id("type_summary_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(70.0), HEADERS.len())
            .header(HEADER_HEIGHT, |mut header| {
                for h in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for s in rows {
                    let rating = s.rating.as_ref();
                    let cells = [
                        s.kind.clone(),
                        s.count.to_string(),
                        opt(rating.map(|d| d.mean), 2),
                        opt(rating.and_then(|d| d.std), 2),
                        opt(rating.map(|d| d.min), 2),
                        opt(rating.map(|d| d.max), 2),
                        opt(s.mean_members, 2),
                        opt(s.mean_episodes, 2),
                    ];
                    body.row(ROW_HEIGHT, |mut row| {
                        for cell in cells {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                }
            });
    });
}
