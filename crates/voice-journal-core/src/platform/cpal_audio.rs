use crate::{
    error::{PlatformError, PlatformResult},
    platform::{AudioCapability, AudioLocation, AudioMode, QualityPreset},
};

use std::{
    fs::{self, File},
    io::{BufWriter, ErrorKind},
    panic::Location,
    path::PathBuf,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use cpal::{
    Stream,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use error_location::ErrorLocation;
use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Audio mode applied by the first `configure_mode` call in this process.
static AUDIO_MODE: OnceLock<AudioMode> = OnceLock::new();

type SharedWriter = Arc<Mutex<Option<WavWriter<BufWriter<File>>>>>;

/// Builds the WAV header for a preset at the device's native layout.
pub(crate) fn wav_spec(preset: QualityPreset, channels: u16, sample_rate: u32) -> WavSpec {
    match preset {
        QualityPreset::High => WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
        QualityPreset::Low => WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

/// Removes a recording file on drop unless [`keep`](Self::keep) was called.
///
/// Covers every early return between creating the WAV file and a playing
/// stream, so a failed start leaves nothing in the recordings directory.
pub(crate) struct PendingRecording {
    path: Option<PathBuf>,
}

impl PendingRecording {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// The capture started; the file now belongs to its handle.
    pub(crate) fn keep(mut self) {
        self.path = None;
    }
}

impl Drop for PendingRecording {
    fn drop(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = ?path, "Removed recording of failed capture"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?path, error = %e, "Failed to remove recording of failed capture"),
        }
    }
}

/// Microphone capture through the default cpal input device.
///
/// Each capture streams into its own WAV file under `recordings_dir`, so
/// recordings have no length limit and never sit in memory.
pub struct CpalAudioCapability {
    recordings_dir: PathBuf,
}

/// In-progress cpal capture. Dropping it stops the stream.
pub struct CpalCapture {
    stream: Stream,
    writer: SharedWriter,
    /// Set before the stream is dropped so a late callback never writes
    /// into a writer that is being finalized.
    shutdown: Arc<AtomicBool>,
    path: PathBuf,
    session_id: Uuid,
}

impl CpalAudioCapability {
    /// Create a capability that writes recordings into `recordings_dir`.
    pub fn new(recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            recordings_dir: recordings_dir.into(),
        }
    }

    #[track_caller]
    fn open_capture(&self, preset: QualityPreset) -> PlatformResult<CpalCapture> {
        if AUDIO_MODE.get().is_some_and(|mode| !mode.allows_recording) {
            return Err(PlatformError::Device {
                reason: "Recording disabled by audio mode".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(PlatformError::NoInputDevice {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let supported = device
            .default_input_config()
            .map_err(|e| PlatformError::Device {
                reason: format!("Failed to get config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;
        let config: cpal::StreamConfig = supported.into();

        fs::create_dir_all(&self.recordings_dir)?;

        let session_id = Uuid::new_v4();
        let path = self.recordings_dir.join(format!("{}.wav", session_id));
        let spec = wav_spec(preset, config.channels, config.sample_rate);

        // Declared before the writer so it drops after hound's finalizing drop.
        let pending = PendingRecording::new(path.clone());
        let writer = WavWriter::create(&path, spec).map_err(|e| PlatformError::Device {
            reason: format!("Failed to create WAV file {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        let writer: SharedWriter = Arc::new(Mutex::new(Some(writer)));
        let shutdown = Arc::new(AtomicBool::new(false));

        let callback_writer = Arc::clone(&writer);
        let callback_shutdown = Arc::clone(&shutdown);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if callback_shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    let mut guard = callback_writer.lock().unwrap_or_else(|e| {
                        error!("WAV writer lock poisoned, recovering: {}", e);
                        e.into_inner()
                    });
                    let Some(writer) = guard.as_mut() else {
                        return;
                    };
                    let written = match preset {
                        QualityPreset::High => {
                            data.iter().try_for_each(|&s| writer.write_sample(s))
                        }
                        QualityPreset::Low => data
                            .iter()
                            .try_for_each(|&s| writer.write_sample(to_i16(s))),
                    };
                    if let Err(e) = written {
                        error!("Failed to write samples: {}", e);
                    }
                },
                |err| {
                    error!("Audio stream error: {}", err);
                },
                None,
            )
            .map_err(|e| PlatformError::Device {
                reason: format!("Failed to build stream: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        stream.play().map_err(|e| PlatformError::Device {
            reason: format!("Failed to start stream: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
        pending.keep();

        info!(
            session_id = %session_id,
            sample_rate = config.sample_rate,
            channels = config.channels,
            path = ?path,
            "Audio capture started"
        );

        Ok(CpalCapture {
            stream,
            writer,
            shutdown,
            path,
            session_id,
        })
    }
}

#[async_trait]
impl AudioCapability for CpalAudioCapability {
    type Handle = CpalCapture;

    #[instrument(skip(self))]
    async fn request_permission(&self) -> bool {
        // Desktop hosts gate access at the OS level; having a default input
        // device is the closest observable grant.
        let granted = cpal::default_host().default_input_device().is_some();
        if !granted {
            warn!("No default input device available");
        }
        granted
    }

    #[instrument(skip(self))]
    async fn configure_mode(&self, mode: AudioMode) -> PlatformResult<()> {
        match AUDIO_MODE.set(mode) {
            Ok(()) => info!(?mode, "Audio mode configured"),
            Err(_) => debug!(existing = ?AUDIO_MODE.get(), "Audio mode already configured"),
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn begin_capture(&self, preset: QualityPreset) -> PlatformResult<CpalCapture> {
        self.open_capture(preset)
    }

    #[instrument(skip(self, handle), fields(session_id = %handle.session_id))]
    async fn finalize_capture(&self, handle: CpalCapture) -> PlatformResult<AudioLocation> {
        let CpalCapture {
            stream,
            writer,
            shutdown,
            path,
            session_id,
        } = handle;

        shutdown.store(true, Ordering::Release);
        drop(stream);
        // Give an in-flight callback time to observe the shutdown flag.
        tokio::time::sleep(Duration::from_millis(5)).await;

        let writer = writer
            .lock()
            .unwrap_or_else(|e| {
                error!("WAV writer lock poisoned, recovering: {}", e);
                e.into_inner()
            })
            .take()
            .ok_or_else(|| PlatformError::Device {
                reason: "WAV writer already finalized".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })?;

        writer.finalize().map_err(|e| PlatformError::Device {
            reason: format!("Failed to finalize WAV file {:?}: {}", path, e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(session_id = %session_id, path = ?path, "Audio capture stopped");

        AudioLocation::new(path.to_string_lossy().into_owned()).ok_or_else(|| {
            PlatformError::Device {
                reason: "Recording path is empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
