use eframe::egui::{self, RichText, Ui};
use eqscope::filters::Slope;
use eqscope::{ParameterId, Parameters};

fn draw_band_header(ui: &mut Ui, name: &str, parameters: &Parameters, bypass: ParameterId) {
    ui.horizontal(|ui| {
        ui.heading(RichText::new(name).size(16.0).strong());
        ui.add_space(8.0);
        let mut bypassed = parameters.get_bool(bypass);
        if ui.checkbox(&mut bypassed, "Bypass").changed() {
            parameters.set_bool(bypass, bypassed);
        }
    });
}

fn param_slider(ui: &mut Ui, parameters: &Parameters, id: ParameterId, suffix: &str, logarithmic: bool) {
    let range = id.range();
    let mut value = parameters.get(id);

    let changed = ui
        .horizontal(|ui| {
            ui.label(id.name());
            ui.add(
                egui::Slider::new(&mut value, range.min..=range.max)
                    .logarithmic(logarithmic)
                    .suffix(suffix),
            )
        })
        .inner
        .changed();

    if changed {
        parameters.set(id, value);
    }
}

fn slope_selector(ui: &mut Ui, parameters: &Parameters, id: ParameterId) {
    let current = Slope::from_index(parameters.get(id).round() as usize);
    let mut selected = current.index();

    egui::ComboBox::from_label(id.name())
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for slope in Slope::ALL {
                ui.selectable_value(&mut selected, slope.index(), slope.label());
            }
        });

    if selected != current.index() {
        parameters.set(id, selected as f32);
    }
}

/// Low cut, peak and high cut controls side by side. Every edit goes
/// through the parameter store, which notifies the pipeline.
pub fn draw_controls(ui: &mut Ui, parameters: &Parameters) {
    ui.columns(3, |columns| {
        draw_band_header(&mut columns[0], "LOW CUT", parameters, ParameterId::LowCutBypassed);
        param_slider(&mut columns[0], parameters, ParameterId::LowCutFreq, " Hz", true);
        slope_selector(&mut columns[0], parameters, ParameterId::LowCutSlope);

        draw_band_header(&mut columns[1], "PEAK", parameters, ParameterId::PeakBypassed);
        param_slider(&mut columns[1], parameters, ParameterId::PeakFreq, " Hz", true);
        param_slider(&mut columns[1], parameters, ParameterId::PeakGain, " dB", false);
        param_slider(&mut columns[1], parameters, ParameterId::PeakQuality, "", true);

        draw_band_header(&mut columns[2], "HIGH CUT", parameters, ParameterId::HighCutBypassed);
        param_slider(&mut columns[2], parameters, ParameterId::HighCutFreq, " Hz", true);
        slope_selector(&mut columns[2], parameters, ParameterId::HighCutSlope);
    });
}
