//! Audio capture and WAV export.
//!
//! This module handles audio input device management and PCM sample capture.
//! Audio is captured from the configured input device at its native sample
//! rate, converted to mono, and saved as 16-bit PCM WAV.

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use hound::WavWriter;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[cfg(target_os = "linux")]
use std::fs::OpenOptions;
#[cfg(target_os = "linux")]
use std::os::unix::io::AsRawFd;

/// Captures audio from a specified or default input device.
///
/// Features:
/// - Captures from a specified input device or system default at its native sample rate
/// - Converts multi-channel audio to mono by averaging channels
/// - Saves the capture as mono 16-bit PCM WAV
pub struct AudioCapture {
    /// Actual capture sample rate from device
    sample_rate: u32,
    /// Captured audio samples (i16 PCM mono)
    samples: Arc<Mutex<Vec<i16>>>,
    /// Active audio input stream (kept alive while capturing)
    stream: Option<cpal::Stream>,
    /// Device name or "default" to use the system default device
    device_name: String,
}

impl AudioCapture {
    /// Creates a new capture with requested sample rate and device.
    ///
    /// Note: The actual capture sample rate may differ based on device
    /// capabilities. Call `sample_rate()` after `start()` to get the
    /// actual rate.
    pub fn new(requested_sample_rate: u32, device_name: String) -> Self {
        Self {
            sample_rate: requested_sample_rate,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            device_name,
        }
    }

    /// Starts capturing from the configured input device.
    ///
    /// Any samples left over from a previous capture are discarded.
    ///
    /// # Errors
    /// - If the specified device is not available
    /// - If device configuration fails
    /// - If audio stream creation fails
    pub fn start(&mut self) -> Result<()> {
        self.samples.lock().unwrap().clear();

        // Get device while suppressing ALSA library warnings
        let device = suppress_alsa_warnings(|| {
            let host = cpal::default_host();

            if self.device_name == "default" {
                host.default_input_device()
                    .ok_or_else(|| anyhow!("No audio input device available"))
            } else {
                find_device_by_name(&host, &self.device_name)
            }
        })?;

        let device_name = device
            .name()
            .unwrap_or_else(|_| "Unknown device".to_string());
        tracing::info!("Capture device: {}", device_name);

        let device_config = device.default_input_config()?;
        let device_sample_rate = device_config.sample_rate().0;
        let num_channels = device_config.channels() as usize;

        if device_sample_rate != self.sample_rate {
            tracing::warn!(
                "Requested sample rate {}Hz but device uses {}Hz. Capturing at device rate.",
                self.sample_rate,
                device_sample_rate
            );
        }

        tracing::debug!(
            "Device configuration: {}Hz, {} channels",
            device_sample_rate,
            num_channels
        );

        self.sample_rate = device_sample_rate;

        let samples_arc = Arc::clone(&self.samples);
        let callback_channels = num_channels;

        let stream = device.build_input_stream(
            &device_config.into(),
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                mix_to_mono(data, &samples_arc, callback_channels);
            },
            |err| {
                tracing::error!("Audio stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        tracing::debug!("Audio stream started");
        Ok(())
    }

    /// Stops capturing and saves the audio to the given WAV file.
    ///
    /// Returns false if nothing was captured (no file is written).
    ///
    /// # Errors
    /// - If the WAV file cannot be created or written
    pub fn stop(&mut self, output_path: &Path) -> Result<bool> {
        // Drop the stream to stop the capture callback
        self.stream = None;

        let samples = self.samples.lock().unwrap().clone();
        let sample_count = samples.len();

        if sample_count == 0 {
            tracing::warn!("Capture stopped with no samples recorded");
            return Ok(false);
        }

        let duration_secs = sample_count as f32 / self.sample_rate as f32;
        tracing::info!(
            "Capture stopped: {:.2}s ({} samples at {}Hz)",
            duration_secs,
            sample_count,
            self.sample_rate
        );

        save_wav(&samples, self.sample_rate, output_path)?;

        let file_size = std::fs::metadata(output_path)?.len();
        tracing::info!(
            "Audio saved: {} ({} bytes)",
            output_path.display(),
            file_size
        );

        Ok(true)
    }

    /// Returns the number of captured samples so far.
    pub fn sample_count(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    /// Returns the actual sample rate of the capture.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Appends incoming audio data, converting multi-channel input to mono by
/// averaging all channels.
fn mix_to_mono(data: &[i16], samples_arc: &Arc<Mutex<Vec<i16>>>, num_channels: usize) {
    let mut samples = samples_arc.lock().unwrap();

    match num_channels {
        1 => {
            samples.extend_from_slice(data);
        }
        2 => {
            for chunk in data.chunks_exact(2) {
                let left = chunk[0] as i32;
                let right = chunk[1] as i32;
                let mono = ((left + right) / 2) as i16;
                samples.push(mono);
            }
        }
        _ => {
            for chunk in data.chunks_exact(num_channels) {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                let mono = (sum / num_channels as i32) as i16;
                samples.push(mono);
            }
        }
    }
}

/// Saves audio samples as a mono 16-bit PCM WAV file.
fn save_wav(samples: &[i16], sample_rate: u32, path: &Path) -> Result<()> {
    let wav_spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, wav_spec)?;

    for &sample in samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    tracing::debug!("WAV written: {}", path.display());
    Ok(())
}

/// Finds an audio input device by name or numeric index.
///
/// # Arguments
/// * `host` - The cpal audio host
/// * `device_spec` - Either a device name or a numeric index (0, 1, 2, etc.)
///
/// # Errors
/// - If no device with the specified name/index is found
fn find_device_by_name(host: &cpal::Host, device_spec: &str) -> Result<cpal::Device> {
    // Try to parse as a numeric index first
    if let Ok(index) = device_spec.parse::<usize>() {
        let devices: Vec<_> = host
            .input_devices()
            .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?
            .collect();

        if index < devices.len() {
            return Ok(devices.into_iter().nth(index).unwrap());
        } else {
            return Err(anyhow!(
                "Device index {} is out of range (0-{})",
                index,
                devices.len().saturating_sub(1)
            ));
        }
    }

    // Try to find by name
    let devices = host
        .input_devices()
        .map_err(|e| anyhow!("Failed to enumerate devices: {e}"))?;

    for device in devices {
        if let Ok(name) = device.name() {
            if name == device_spec {
                return Ok(device);
            }
        }
    }

    Err(anyhow!(
        "Audio input device '{device_spec}' not found. Use 'rectap list-devices' to see available devices."
    ))
}

/// Temporarily redirects stderr to /dev/null to suppress ALSA library warnings on Linux.
/// On non-Linux platforms, this is a no-op since ALSA doesn't exist.
#[cfg(target_os = "linux")]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    // Open /dev/null for writing
    let dev_null = OpenOptions::new()
        .write(true)
        .open("/dev/null")
        .map_err(|e| anyhow!("Failed to open /dev/null: {e}"))?;

    let dev_null_fd = dev_null.as_raw_fd();

    // Save the current stderr file descriptor
    let old_stderr = unsafe { libc::dup(libc::STDERR_FILENO) };
    if old_stderr == -1 {
        return Err(anyhow!("Failed to duplicate stderr"));
    }

    // Redirect stderr to /dev/null
    let redirect_result = unsafe { libc::dup2(dev_null_fd, libc::STDERR_FILENO) };
    if redirect_result == -1 {
        unsafe { libc::close(old_stderr) };
        return Err(anyhow!("Failed to redirect stderr"));
    }

    // Execute the closure
    let result = f();

    // Restore the original stderr
    unsafe {
        libc::dup2(old_stderr, libc::STDERR_FILENO);
        libc::close(old_stderr);
    }

    result
}

/// On non-Linux platforms, no stderr suppression is needed since ALSA doesn't exist.
#[cfg(not(target_os = "linux"))]
pub(crate) fn suppress_alsa_warnings<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_input_averages_channel_pairs() {
        let samples = Arc::new(Mutex::new(Vec::new()));
        mix_to_mono(&[100, 200, -50, 50], &samples, 2);

        assert_eq!(*samples.lock().unwrap(), vec![150, 0]);
    }

    #[test]
    fn mono_input_is_copied_verbatim() {
        let samples = Arc::new(Mutex::new(Vec::new()));
        mix_to_mono(&[1, 2, 3], &samples, 1);

        assert_eq!(*samples.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn four_channel_input_averages_all_channels() {
        let samples = Arc::new(Mutex::new(Vec::new()));
        mix_to_mono(&[100, 100, 100, 100, 8, 0, 0, 0], &samples, 4);

        assert_eq!(*samples.lock().unwrap(), vec![100, 2]);
    }
}
