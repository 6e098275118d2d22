use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Host, Stream};
use eframe::{App, CreationContext, egui};

use eqscope::audio::devices::{
    INPUT_PREFIX, create_stream_config, default_input_index, get_input_device, is_supported_format,
    list_input_devices,
};
use eqscope::config::REFRESH_RATE_HZ;
use eqscope::{AnalysisPipeline, ChangeFlag, Parameters, ScopeConfig, pipeline};

use crate::ui::{draw_controls, draw_response};

const IDLE_SAMPLE_RATE: f64 = 48000.0;

pub struct EqScopeApp {
    host: Host,
    devices: Vec<String>,
    input_device_index: usize,
    parameters: Arc<Parameters>,
    flag: ChangeFlag,
    pipeline: AnalysisPipeline,
    stream: Option<Stream>,
    last_poll: Option<Instant>,
    status: Option<String>,
}

impl EqScopeApp {
    pub fn new(_cc: &CreationContext) -> Result<Self> {
        let host = cpal::default_host();
        let devices = list_input_devices(&host);
        let input_device_index = default_input_index(&host, &devices);

        let flag = ChangeFlag::new();
        let parameters = Arc::new(Parameters::new().with_listener(flag.clone()));

        // No stream yet: the response curve is still shown.
        let (_tap, pipeline) = pipeline(
            ScopeConfig::default(),
            IDLE_SAMPLE_RATE,
            parameters.clone(),
            flag.clone(),
        )?;

        log::info!("found {} input devices", devices.len());

        Ok(Self {
            host,
            devices,
            input_device_index,
            parameters,
            flag,
            pipeline,
            stream: None,
            last_poll: None,
            status: None,
        })
    }

    fn running(&self) -> bool {
        self.stream.is_some()
    }

    pub fn start_processing(&mut self) -> Result<()> {
        if self.running() {
            return Ok(());
        }

        let device = get_input_device(&self.host, &self.devices, self.input_device_index)
            .ok_or_else(|| anyhow!("no input device selected"))?;

        let supported = device
            .default_input_config()
            .context("failed to get input config")?;
        if !is_supported_format(supported.sample_format()) {
            bail!("input device doesn't support f32 samples");
        }

        let channels = supported.channels();
        let sample_rate = supported.sample_rate();

        let (mut tap, pipeline) = pipeline(
            ScopeConfig::default(),
            sample_rate.0 as f64,
            self.parameters.clone(),
            self.flag.clone(),
        )?;

        let stream = device
            .build_input_stream(
                &create_stream_config(channels, sample_rate),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    tap.push_interleaved(data, channels as usize);
                },
                |err| log::error!("input stream error: {err}"),
                None,
            )
            .context("failed to build input stream")?;
        stream.play().context("failed to start input stream")?;

        log::info!(
            "capturing {} channel(s) at {} Hz",
            channels,
            sample_rate.0
        );

        self.pipeline = pipeline;
        self.stream = Some(stream);
        Ok(())
    }

    pub fn stop_processing(&mut self) {
        // Dropping the stream stops the callback; queued blocks are discarded.
        self.stream = None;
        log::info!("capture stopped");
    }

    fn poll_due(&mut self) -> bool {
        let interval = Duration::from_secs_f64(1.0 / REFRESH_RATE_HZ as f64);
        let now = Instant::now();
        match self.last_poll {
            Some(last) if now.duration_since(last) < interval => false,
            _ => {
                self.last_poll = Some(now);
                true
            }
        }
    }

    fn draw_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let running = self.running();
                if ui
                    .button(if running { "Stop" } else { "Start" })
                    .clicked()
                {
                    if running {
                        self.stop_processing();
                    } else if let Err(e) = self.start_processing() {
                        log::error!("failed to start processing: {e:#}");
                        self.status = Some(format!("{e:#}"));
                    } else {
                        self.status = None;
                    }
                }

                let selected = self
                    .devices
                    .get(self.input_device_index)
                    .map(|s| s.trim_start_matches(INPUT_PREFIX).to_owned())
                    .unwrap_or_else(|| "None".to_owned());
                let mut index = self.input_device_index;
                egui::ComboBox::from_label("Input Device")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for (i, name) in self.devices.iter().enumerate() {
                            ui.selectable_value(&mut index, i, name.trim_start_matches(INPUT_PREFIX));
                        }
                    });
                if index != self.input_device_index {
                    self.input_device_index = index;
                    if self.running() {
                        self.stop_processing();
                        if let Err(e) = self.start_processing() {
                            log::error!("failed to restart processing: {e:#}");
                            self.status = Some(format!("{e:#}"));
                        }
                    }
                }

                if ui.button("Reset").clicked() {
                    self.parameters.reset();
                }

                ui.separator();
                ui.label(if self.running() {
                    "Status: Running"
                } else {
                    "Status: Stopped"
                });
                if let Some(status) = &self.status {
                    ui.colored_label(egui::Color32::LIGHT_RED, status);
                }
            });
        });
    }
}

impl App for EqScopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.request_repaint_after(Duration::from_secs_f64(1.0 / REFRESH_RATE_HZ as f64));

        self.draw_top_panel(ctx);

        let poll = self.poll_due();
        egui::CentralPanel::default().show(ctx, |ui| {
            draw_response(ui, &mut self.pipeline, poll);
            ui.add_space(8.0);
            draw_controls(ui, &self.parameters);
        });
    }
}
