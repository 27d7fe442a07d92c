//! Audio output behind the preview coordinator.
//!
//! Outputs report what the device is actually doing back as [`Msg`]s; they never
//! decide which row owns the session.

use engine_logging::{engine_debug, engine_info};
use podplay_core::Msg;

use super::effects::MsgSender;

/// The single audio session. Calls never block on network or decoding.
pub trait AudioOutput: Send {
    fn load_and_play(&mut self, media_url: &str);
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
}

/// Simulated output: acknowledges every command as if a device followed it.
#[cfg_attr(feature = "rodio-output", allow(dead_code))]
pub struct SilentOutput {
    msgs: MsgSender,
    loaded: Option<String>,
}

#[cfg_attr(feature = "rodio-output", allow(dead_code))]
impl SilentOutput {
    pub fn new(msgs: MsgSender) -> Self {
        Self { msgs, loaded: None }
    }
}

impl AudioOutput for SilentOutput {
    fn load_and_play(&mut self, media_url: &str) {
        engine_info!("Silent output playing {}", media_url);
        self.loaded = Some(media_url.to_string());
        self.msgs.send(Msg::PlaybackStateChanged { is_playing: true });
    }

    fn pause(&mut self) {
        if self.loaded.is_some() {
            self.msgs.send(Msg::PlaybackStateChanged { is_playing: false });
        }
    }

    fn resume(&mut self) {
        if self.loaded.is_some() {
            self.msgs.send(Msg::PlaybackStateChanged { is_playing: true });
        }
    }

    fn stop(&mut self) {
        if let Some(url) = self.loaded.take() {
            engine_debug!("Silent output stopped {}", url);
        }
    }
}

#[cfg(feature = "rodio-output")]
pub use rodio_output::RodioOutput;

#[cfg(feature = "rodio-output")]
mod rodio_output {
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use engine_logging::{engine_error, engine_info, engine_warn};
    use podplay_core::Msg;
    use podplay_engine::{FetchSettings, Fetcher, ReqwestFetcher};
    use rodio::{Decoder, OutputStream, Sink};

    use super::{AudioOutput, MsgSender};

    enum AudioCommand {
        Play(String),
        Pause,
        Resume,
        Stop,
    }

    /// Streams previews to the default output device from a dedicated thread.
    ///
    /// The rodio stream is not `Send`, so the device, the sink and the media
    /// download all live on that thread.
    pub struct RodioOutput {
        cmd_tx: mpsc::Sender<AudioCommand>,
    }

    impl RodioOutput {
        pub fn new(msgs: MsgSender) -> Self {
            let (cmd_tx, cmd_rx) = mpsc::channel();
            thread::spawn(move || audio_thread(cmd_rx, msgs));
            Self { cmd_tx }
        }

        fn send(&self, command: AudioCommand) {
            let _ = self.cmd_tx.send(command);
        }
    }

    impl AudioOutput for RodioOutput {
        fn load_and_play(&mut self, media_url: &str) {
            self.send(AudioCommand::Play(media_url.to_string()));
        }

        fn pause(&mut self) {
            self.send(AudioCommand::Pause);
        }

        fn resume(&mut self) {
            self.send(AudioCommand::Resume);
        }

        fn stop(&mut self) {
            self.send(AudioCommand::Stop);
        }
    }

    fn audio_thread(cmd_rx: mpsc::Receiver<AudioCommand>, msgs: MsgSender) {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                engine_error!("Audio runtime failed to start: {}", err);
                return;
            }
        };
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(err) => {
                engine_error!("No audio output device: {}", err);
                drain_with_errors(cmd_rx, msgs);
                return;
            }
        };
        let fetcher = ReqwestFetcher::new(FetchSettings::for_media());
        let mut sink: Option<Sink> = None;
        let mut reported_end = true;

        loop {
            let command = match cmd_rx.recv_timeout(Duration::from_millis(250)) {
                Ok(command) => command,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if let Some(active) = sink.as_ref() {
                        if active.empty() && !reported_end {
                            reported_end = true;
                            msgs.send(Msg::PlaybackStateChanged { is_playing: false });
                        }
                    }
                    continue;
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            };

            match command {
                AudioCommand::Play(url) => {
                    if let Some(previous) = sink.take() {
                        previous.stop();
                    }
                    let bytes = match runtime.block_on(fetcher.fetch(&url)) {
                        Ok(output) => output.bytes,
                        Err(err) => {
                            engine_warn!("Media download failed for {}: {}", url, err);
                            msgs.send(Msg::PlaybackError {
                                code: "ERROR_CODE_IO_NETWORK_CONNECTION_FAILED".to_string(),
                            });
                            continue;
                        }
                    };
                    let source = match Decoder::new(Cursor::new(bytes)) {
                        Ok(source) => source,
                        Err(err) => {
                            engine_warn!("Cannot decode {}: {}", url, err);
                            msgs.send(Msg::PlaybackError {
                                code: "ERROR_CODE_DECODING_FAILED".to_string(),
                            });
                            continue;
                        }
                    };
                    match Sink::try_new(&handle) {
                        Ok(new_sink) => {
                            new_sink.append(source);
                            new_sink.play();
                            engine_info!("Playing {}", url);
                            sink = Some(new_sink);
                            reported_end = false;
                            msgs.send(Msg::PlaybackStateChanged { is_playing: true });
                        }
                        Err(err) => {
                            engine_error!("Cannot open sink: {}", err);
                            msgs.send(Msg::PlaybackError {
                                code: "ERROR_CODE_AUDIO_TRACK_INIT_FAILED".to_string(),
                            });
                        }
                    }
                }
                AudioCommand::Pause => {
                    if let Some(active) = sink.as_ref() {
                        active.pause();
                        msgs.send(Msg::PlaybackStateChanged { is_playing: false });
                    }
                }
                AudioCommand::Resume => {
                    if let Some(active) = sink.as_ref() {
                        active.play();
                        msgs.send(Msg::PlaybackStateChanged { is_playing: true });
                    }
                }
                AudioCommand::Stop => {
                    if let Some(active) = sink.take() {
                        active.stop();
                    }
                    reported_end = true;
                }
            }
        }
    }

    fn drain_with_errors(cmd_rx: mpsc::Receiver<AudioCommand>, msgs: MsgSender) {
        while let Ok(command) = cmd_rx.recv() {
            if matches!(command, AudioCommand::Play(_)) {
                msgs.send(Msg::PlaybackError {
                    code: "ERROR_CODE_AUDIO_TRACK_INIT_FAILED".to_string(),
                });
            }
        }
    }
}
