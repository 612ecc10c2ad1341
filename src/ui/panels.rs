use eframe::egui::{self, Color32, RichText, Slider, Ui};

use crate::config::MAX_TOP_GENRES;
use crate::data::stats::Metrics;
use crate::state::AppState;
use crate::ui::tables;

// ---------------------------------------------------------------------------
// Left side panel – explore widgets
// ---------------------------------------------------------------------------

/// Render the left sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Explore Data");
    ui.separator();

    ui.checkbox(&mut state.show_raw_data, "Show Raw Data");
    ui.add_space(8.0);

    ui.strong("Genres in chart");
    ui.add(Slider::new(&mut state.top_genres, 1..=MAX_TOP_GENRES));
    ui.separator();

    match &state.dataset {
        Some(ds) => {
            ui.label(format!("{} anime", ds.len()));
            ui.label(format!("{} distinct genres", state.views.genre_counts.len()));
            ui.add_space(4.0);
            ui.strong("Types");
            for (kind, color) in state.views.type_colors.legend_entries() {
                ui.label(RichText::new(kind).color(color));
            }
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} anime loaded, {} in filtered view",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open anime dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}

// ---------------------------------------------------------------------------
// Central panel pieces
// ---------------------------------------------------------------------------

/// Full record table, shown while the sidebar checkbox is ticked.
pub fn raw_data(ui: &mut Ui, state: &AppState) {
    if !state.show_raw_data {
        return;
    }
    let Some(ds) = &state.dataset else {
        return;
    };
    ui.heading("Raw Data");
    tables::anime_table(ui, "raw_table", ds, None);
    ui.separator();
}

/// Tile text for the three headline metrics.
pub fn metric_texts(m: &Metrics) -> [(&'static str, String); 3] {
    [
        ("Total Anime", m.total.to_string()),
        (
            "Average Rating",
            m.avg_rating.map_or_else(|| "n/a".to_string(), |r| format!("{r:.2}")),
        ),
        (
            "Average Episodes",
            m.avg_episodes.map_or_else(|| "n/a".to_string(), |e| format!("{e:.1}")),
        ),
    ]
}

pub fn metric_tiles(ui: &mut Ui, metrics: &Metrics) {
    let tiles = metric_texts(metrics);
    ui.columns(tiles.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(tiles) {
            col.group(|ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(label).weak());
                    ui.label(RichText::new(value).size(28.0).strong());
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

const DATA_DICTIONARY: [(&str, &str); 7] = [
    ("anime_id", "Unique identifier of the anime"),
    ("name", "Title"),
    ("genre", "Comma-separated list of genres"),
    ("type", "Format: TV, Movie, OVA, Special, ONA, Music"),
    ("episodes", "Episode count (\"Unknown\" while airing)"),
    ("rating", "Average user rating out of 10"),
    ("members", "Community members who added the anime to their list"),
];

pub fn footer(ui: &mut Ui) {
    ui.separator();
    ui.strong("Data Dictionary:");
    for (field, meaning) in DATA_DICTIONARY {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("•");
            ui.monospace(field);
            ui.label(meaning);
        });
    }
}
