use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{BufferSize, Device, Host, SampleFormat, StreamConfig};

pub const INPUT_PREFIX: &str = "Input: ";

/// Names of every capture device, prefixed for display.
pub fn list_input_devices(host: &Host) -> Vec<String> {
    let mut devices = Vec::new();
    if let Ok(input_devices) = host.input_devices() {
        for device in input_devices {
            if let Ok(name) = device.name() {
                devices.push(format!("{INPUT_PREFIX}{name}"));
            }
        }
    }
    devices
}

/// Index of the host's default capture device within `devices`.
pub fn default_input_index(host: &Host, devices: &[String]) -> usize {
    let Some(name) = host.default_input_device().and_then(|d| d.name().ok()) else {
        return 0;
    };
    devices
        .iter()
        .position(|device_name| device_name.trim_start_matches(INPUT_PREFIX) == name)
        .unwrap_or(0)
}

pub fn get_input_device(host: &Host, devices: &[String], index: usize) -> Option<Device> {
    let device_name = devices.get(index)?.trim_start_matches(INPUT_PREFIX);

    host.input_devices()
        .ok()?
        .find(|device| device.name().map(|name| name == device_name).unwrap_or(false))
}

/// Host-chosen block size; the collectors re-block to a fixed size anyway.
pub fn create_stream_config(channels: u16, sample_rate: cpal::SampleRate) -> StreamConfig {
    StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Default,
    }
}

pub fn is_supported_format(format: SampleFormat) -> bool {
    format == SampleFormat::F32
}
