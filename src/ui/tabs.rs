use eframe::egui::{self, Slider, Ui};

use crate::data::filter::TypeFilter;
use crate::state::{AppState, Tab};
use crate::ui::{charts, tables};

// ---------------------------------------------------------------------------
// Tab strip
// ---------------------------------------------------------------------------

pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
    ui.separator();
}

/// Render whichever tab is active.
pub fn active_tab(ui: &mut Ui, state: &mut AppState) {
    match state.active_tab {
        Tab::Distribution => distribution_tab(ui, state),
        Tab::Relationships => relationships_tab(ui, state),
        Tab::Insights => insights_tab(ui, state),
    }
}

// ---------------------------------------------------------------------------
// Tab 1 – distributions
// ---------------------------------------------------------------------------

fn distribution_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Distribution of Anime");
    charts::genre_bar_chart(ui, state.top_genre_counts());
    ui.add_space(12.0);
    charts::type_pie_chart(ui, &state.views.type_counts, &state.views.type_colors);
    ui.add_space(12.0);
    charts::rating_histogram(ui, &state.views.rating_histogram, &state.views.type_colors);
}

// ---------------------------------------------------------------------------
// Tab 2 – relationships
// ---------------------------------------------------------------------------

fn relationships_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Feature Relationships");
    let Some(dataset) = &state.dataset else {
        return;
    };
    charts::rating_scatter(ui, dataset, &state.views.type_colors);
    ui.add_space(12.0);
    charts::rating_box_plot(ui, &state.views.rating_boxes, &state.views.type_colors);
    ui.add_space(12.0);
    charts::correlation_heatmap(ui, &state.views.correlation);
}

// ---------------------------------------------------------------------------
// Tab 3 – statistics and the filtered view
// ---------------------------------------------------------------------------

fn insights_tab(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Statistical Insights");
    tables::describe_table(ui, &state.views.describe);

    ui.add_space(8.0);
    ui.strong("Summary by Type");
    tables::type_summary_table(ui, &state.views.type_summary);

    ui.add_space(12.0);
    ui.heading("Filter Data for Custom Analysis");
    if filter_controls(ui, state) {
        state.refilter();
    }

    let Some(dataset) = &state.dataset else {
        return;
    };
    ui.label(format!("Filtered Data: {} anime", state.visible_indices.len()));
    tables::anime_table(ui, "filtered_table", dataset, Some(state.visible_indices.as_slice()));
}

/// Rating range and type selector. Returns whether anything changed.
fn filter_controls(ui: &mut Ui, state: &mut AppState) -> bool {
    let bounds = state.views.rating_bounds;
    let kinds: Vec<String> = state
        .dataset
        .as_ref()
        .map(|ds| ds.kinds.iter().cloned().collect())
        .unwrap_or_default();
    let range = &mut state.filter.rating;
    let mut changed = false;

    let min_changed = ui
        .add(
            Slider::new(&mut range.min, bounds.min..=bounds.max)
                .step_by(0.1)
                .text("Minimum rating"),
        )
        .changed();
    let max_changed = ui
        .add(
            Slider::new(&mut range.max, bounds.min..=bounds.max)
                .step_by(0.1)
                .text("Maximum rating"),
        )
        .changed();
    // The two sliders act as one range control: dragging a handle past
    // the other pushes it along.
    if min_changed && range.min > range.max {
        range.max = range.min;
    }
    if max_changed && range.max < range.min {
        range.min = range.max;
    }
    if min_changed || max_changed {
        *range = range.snapped();
    }
    changed |= min_changed || max_changed;

    let current = state.filter.kind.clone();
    egui::ComboBox::from_label("Select Type")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            changed |= ui
                .selectable_value(&mut state.filter.kind, TypeFilter::All, "All")
                .changed();
            for kind in kinds {
                let label = kind.clone();
                changed |= ui
                    .selectable_value(&mut state.filter.kind, TypeFilter::Only(kind), label)
                    .changed();
            }
        });

    changed
}
