use std::f32::consts::TAU;

use eframe::egui::{Align2, Color32, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::data::model::AnimeDataset;
use crate::data::stats::{BoxSummary, CorrelationMatrix, Histogram};

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Genre bar chart
// ---------------------------------------------------------------------------

/// Horizontal bars, most frequent genre on top.
pub fn genre_bar_chart(ui: &mut Ui, counts: &[(String, usize)]) {
    ui.strong("Most Common Genres");
    if counts.is_empty() {
        ui.label("No genres to show.");
        return;
    }

    // Plot order runs bottom-up, so reverse to put the largest bar on top.
    let labels: Vec<String> = counts.iter().rev().map(|(g, _)| g.clone()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .rev()
        .enumerate()
        .map(|(i, (genre, count))| Bar::new(i as f64, *count as f64).name(genre).width(0.7))
        .collect();

    let chart = BarChart::new(bars)
        .horizontal()
        .color(Color32::from_rgb(30, 144, 255))
        .name("Anime count");

    Plot::new("genre_bar_chart")
        .height(CHART_HEIGHT)
        .x_axis_label("Count")
        .y_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Category name for an integer grid mark, empty between categories.
fn tick_label(labels: &[String], value: f64) -> String {
    let pos = value.round();
    if (value - pos).abs() > 1e-6 || pos < 0.0 {
        return String::new();
    }
    labels.get(pos as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Type pie chart
// ---------------------------------------------------------------------------

/// Pie chart painted directly; egui_plot has no pie primitive.
pub fn type_pie_chart(ui: &mut Ui, counts: &[(String, usize)], colors: &ColorMap) {
    ui.strong("Type Distribution");
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        ui.label("No types to show.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let size = CHART_HEIGHT * 0.8;
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.48;

        let mut start = -TAU / 4.0;
        for (kind, count) in counts {
            let sweep = TAU * *count as f32 / total as f32;
            let color = colors.color_for(Some(kind.as_str()));
            for wedge in pie_wedges(center, radius, start, sweep) {
                painter.add(Shape::convex_polygon(wedge, color, Stroke::NONE));
            }
            start += sweep;
        }
        painter.circle_stroke(center, radius, Stroke::new(1.0, ui.visuals().window_stroke.color));

        ui.vertical(|ui: &mut Ui| {
            for (kind, count) in counts {
                let pct = 100.0 * *count as f64 / total as f64;
                ui.label(
                    RichText::new(format!("■ {kind}  {count} ({pct:.1}%)"))
                        .color(colors.color_for(Some(kind.as_str()))),
                );
            }
        });
    });
}

/// Split a slice into convex pieces of at most a quarter turn each.
fn pie_wedges(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Vec<Pos2>> {
    let pieces = (sweep / (TAU / 4.0)).ceil().max(1.0) as usize;
    let step = sweep / pieces as f32;
    (0..pieces)
        .map(|p| {
            let a0 = start + step * p as f32;
            let segments = ((step / TAU) * 64.0).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(segments + 2);
            points.push(center);
            for s in 0..=segments {
                let a = a0 + step * s as f32 / segments as f32;
                points.push(center + radius * Vec2::angled(a));
            }
            points
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Members vs rating scatter
// ---------------------------------------------------------------------------

/// One point series per type so the legend doubles as a type toggle.
pub fn rating_scatter(ui: &mut Ui, dataset: &AnimeDataset, colors: &ColorMap) {
    ui.strong("Rating vs Community Size");

    let series: Vec<(String, Vec<[f64; 2]>)> = dataset
        .kinds
        .iter()
        .map(|kind| {
            let points = dataset
                .records
                .iter()
                .filter(|a| a.kind.as_deref() == Some(kind.as_str()))
                .filter_map(|a| {
                    let members = a.members.filter(|&m| m > 0)?;
                    Some([(members as f64).log10(), a.rating?])
                })
                .collect();
            (kind.clone(), points)
        })
        .collect();

    Plot::new("rating_scatter")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Members (log10)")
        .y_axis_label("Rating")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (kind, points) in series {
                plot_ui.points(
                    Points::new(PlotPoints::new(points))
                        .name(&kind)
                        .color(colors.color_for(Some(kind.as_str())))
                        .radius(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Rating box plot by type
// ---------------------------------------------------------------------------

pub fn rating_box_plot(ui: &mut Ui, boxes: &[BoxSummary], colors: &ColorMap) {
    ui.strong("Rating by Type");
    if boxes.is_empty() {
        ui.label("No rated anime to show.");
        return;
    }

    let labels: Vec<String> = boxes.iter().map(|b| b.label.clone()).collect();
    let elems: Vec<BoxElem> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let color = colors.color_for(Some(b.label.as_str()));
            BoxElem::new(
                i as f64,
                BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
            )
            .name(format!("{} (n={})", b.label, b.count))
            .box_width(0.6)
            .fill(color.gamma_multiply(0.4))
            .stroke(Stroke::new(1.5, color))
        })
        .collect();

    Plot::new("rating_box_plot")
        .height(CHART_HEIGHT)
        .y_axis_label("Rating")
        .x_axis_formatter(move |mark, _range| tick_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| plot_ui.box_plot(BoxPlot::new(elems).name("Rating")));
}

// ---------------------------------------------------------------------------
// Rating histogram by type
// ---------------------------------------------------------------------------

/// Stacked bars: each type's counts sit on top of the previous types'.
pub fn rating_histogram(ui: &mut Ui, hist: &Histogram, colors: &ColorMap) {
    ui.strong("Rating Distribution by Type");
    if hist.bin_count() == 0 {
        ui.label("No rated anime to show.");
        return;
    }

    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
    for (kind, counts) in &hist.series {
        let color = colors.color_for(Some(kind.as_str()));
        let bars: Vec<Bar> = counts
            .iter()
            .enumerate()
            .map(|(bin, &n)| {
                Bar::new(hist.bin_center(bin), n as f64)
                    .width(hist.bin_width * 0.95)
                    .fill(color)
            })
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .color(color)
            .name(kind)
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new("rating_histogram")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Rating")
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Diverging colour: blue for −1, white for 0, red for +1, grey if undefined.
fn correlation_color(value: Option<f64>) -> Color32 {
    let Some(v) = value else {
        return Color32::GRAY;
    };
    let t = v.clamp(-1.0, 1.0) as f32;
    let fade = |full: u8| (255.0 - (255.0 - full as f32) * t.abs()).round() as u8;
    if t >= 0.0 {
        Color32::from_rgb(fade(178), fade(24), fade(43))
    } else {
        Color32::from_rgb(fade(33), fade(102), fade(172))
    }
}

/// Painted grid of correlation cells with the coefficient written inside.
pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    ui.strong("Feature Correlation Matrix");
    let n = corr.columns.len();
    if n == 0 {
        return;
    }

    let cell = 72.0;
    let label_w = 80.0;
    let size = Vec2::new(label_w + cell * n as f32, 20.0 + cell * n as f32);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let painter = ui.painter_at(rect);
    let text_color = ui.visuals().text_color();
    let font = FontId::proportional(13.0);
    let grid = Rect::from_min_size(rect.min + Vec2::new(label_w, 20.0), Vec2::splat(cell * n as f32));

    for (i, name) in corr.columns.iter().enumerate() {
        let offset = cell * (i as f32 + 0.5);
        painter.text(
            Pos2::new(grid.min.x + offset, rect.min.y + 10.0),
            Align2::CENTER_CENTER,
            *name,
            font.clone(),
            text_color,
        );
        painter.text(
            Pos2::new(grid.min.x - 6.0, grid.min.y + offset),
            Align2::RIGHT_CENTER,
            *name,
            font.clone(),
            text_color,
        );
    }

    for row in 0..n {
        for col in 0..n {
            let value = corr.get(row, col);
            let cell_rect = Rect::from_min_size(
                grid.min + Vec2::new(cell * col as f32, cell * row as f32),
                Vec2::splat(cell),
            )
            .shrink(1.0);
            painter.rect_filled(cell_rect, 2.0, correlation_color(value));
            let label = value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}"));
            painter.text(cell_rect.center(), Align2::CENTER_CENTER, label, font.clone(), Color32::BLACK);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_labels_only_on_whole_positions() {
        let labels = vec!["TV".to_string(), "Movie".to_string()];
        assert_eq!(tick_label(&labels, 0.0), "TV");
        assert_eq!(tick_label(&labels, 1.0000001), "Movie");
        assert_eq!(tick_label(&labels, 0.5), "");
        assert_eq!(tick_label(&labels, 2.0), "");
        assert_eq!(tick_label(&labels, -1.0), "");
    }

    #[test]
    fn correlation_colors_diverge_from_white() {
        assert_eq!(correlation_color(Some(0.0)), Color32::WHITE);
        assert_eq!(correlation_color(Some(1.0)), Color32::from_rgb(178, 24, 43));
        assert_eq!(correlation_color(Some(-1.0)), Color32::from_rgb(33, 102, 172));
        assert_eq!(correlation_color(None), Color32::GRAY);
    }

    #[test]
    fn full_circle_is_split_into_convex_quarters() {
        let wedges = pie_wedges(Pos2::ZERO, 1.0, 0.0, TAU);
        assert_eq!(wedges.len(), 4);
        for w in &wedges {
            assert_eq!(w[0], Pos2::ZERO);
            assert!(w.len() >= 3);
        }
    }

    #[test]
    fn thin_slice_is_a_single_wedge() {
        let wedges = pie_wedges(Pos2::ZERO, 10.0, 0.0, 0.1);
        assert_eq!(wedges.len(), 1);
        let last = *wedges[0].last().unwrap();
        let expected = Pos2::ZERO + 10.0 * Vec2::angled(0.1);
        assert!((last - expected).length() < 1e-4);
    }
}
