use eframe::egui;
use eqscope::config::{MAX_FREQUENCY, MIN_FREQUENCY};
use eqscope::path::geometry::{map_from_log10, remap};
use eqscope::{AnalysisPipeline, Bounds, Channel, CurvePath};

const GRID_FREQUENCIES: [f32; 10] = [
    20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 2000.0, 5000.0, 10000.0, 20000.0,
];
const GRID_GAINS: [f32; 5] = [-24.0, -12.0, 0.0, 12.0, 24.0];

const LEFT_MARGIN: f32 = 36.0;
const RIGHT_MARGIN: f32 = 36.0;
const TOP_MARGIN: f32 = 16.0;
const BOTTOM_MARGIN: f32 = 6.0;

fn frequency_label(freq: f32) -> String {
    if freq > 999.0 {
        format!("{}kHz", freq / 1000.0)
    } else {
        format!("{freq}Hz")
    }
}

fn to_bounds(rect: egui::Rect) -> Bounds {
    Bounds::new(rect.left(), rect.top(), rect.width(), rect.height())
}

fn stroke_path(painter: &egui::Painter, path: &CurvePath, stroke: egui::Stroke) {
    if path.len() < 2 {
        return;
    }
    let points = path.points().iter().map(|p| egui::pos2(p.x, p.y)).collect();
    painter.add(egui::Shape::line(points, stroke));
}

fn draw_grid(painter: &egui::Painter, rect: egui::Rect, area: egui::Rect, pipeline: &AnalysisPipeline) {
    let grid_color = egui::Color32::from_rgba_premultiplied(100, 100, 100, 100);
    let label_color = egui::Color32::from_rgb(180, 180, 180);
    let zero_color = egui::Color32::from_rgb(0, 172, 1);
    let font = egui::FontId::proportional(9.0);

    for freq in GRID_FREQUENCIES {
        let x = area.left() + area.width() * map_from_log10(freq, MIN_FREQUENCY, MAX_FREQUENCY);
        painter.line_segment(
            [egui::pos2(x, area.top()), egui::pos2(x, area.bottom())],
            egui::Stroke::new(1.0, grid_color),
        );
        painter.text(
            egui::pos2(x, rect.top() + 2.0),
            egui::Align2::CENTER_TOP,
            frequency_label(freq),
            font.clone(),
            label_color,
        );
    }

    let display = pipeline.display_range();
    let spectrum = pipeline.spectrum_display_range();
    for gain in GRID_GAINS {
        let y = remap(gain, display.min_db, display.max_db, area.bottom(), area.top());
        let color = if gain == 0.0 { zero_color } else { grid_color };
        painter.line_segment(
            [egui::pos2(area.left(), y), egui::pos2(area.right(), y)],
            egui::Stroke::new(1.0, color),
        );

        // response scale on the right, spectrum scale on the left
        painter.text(
            egui::pos2(rect.right() - 2.0, y),
            egui::Align2::RIGHT_CENTER,
            format!("{gain:+.0}"),
            font.clone(),
            if gain == 0.0 { zero_color } else { label_color },
        );
        let t = (gain - display.min_db) / (display.max_db - display.min_db);
        let spectrum_db = spectrum.min_db + t * (spectrum.max_db - spectrum.min_db);
        painter.text(
            egui::pos2(rect.left() + 2.0, y),
            egui::Align2::LEFT_CENTER,
            format!("{spectrum_db:.0}"),
            font.clone(),
            label_color,
        );
    }
}

/// Allocates the analysis area, polls the pipeline when `poll` is set, and
/// paints the grid, both channel spectra and the filter response.
pub fn draw_response(ui: &mut egui::Ui, pipeline: &mut AnalysisPipeline, poll: bool) {
    ui.group(|ui| {
        ui.set_height(220.0);
        let (rect, _response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), ui.available_height()),
            egui::Sense::hover(),
        );

        let area = egui::Rect::from_min_max(
            egui::pos2(rect.left() + LEFT_MARGIN, rect.top() + TOP_MARGIN),
            egui::pos2(rect.right() - RIGHT_MARGIN, rect.bottom() - BOTTOM_MARGIN),
        );
        let bounds = to_bounds(area);

        if poll {
            pipeline.poll(bounds);
        }

        let painter = ui.painter();
        painter.rect_filled(rect, 5.0, egui::Color32::from_rgb(20, 20, 30));
        draw_grid(painter, rect, area, pipeline);

        stroke_path(
            painter,
            pipeline.path(Channel::Left),
            egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE),
        );
        stroke_path(
            painter,
            pipeline.path(Channel::Right),
            egui::Stroke::new(1.0, egui::Color32::LIGHT_YELLOW),
        );
        stroke_path(
            painter,
            &pipeline.response_path(bounds),
            egui::Stroke::new(2.0, egui::Color32::WHITE),
        );
    });
}
