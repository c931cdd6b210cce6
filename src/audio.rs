//! Audio back ends.
//!
//! With the `audio` feature the game plays sound files from an assets
//! directory through rodio. Every asset is looked up once at start-up; one
//! that is missing or cannot be decoded is reported and then silently
//! skipped for the rest of the process.

use std::path::Path;

use tracing::info;

use crate::interfaces::{AudioInterface, NullAudio};

/// Extensions tried, in order, for each asset name.
pub const ASSET_EXTENSIONS: [&str; 4] = ["wav", "ogg", "mp3", "flac"];

/// Best available audio output for `assets`. Falls back to silence.
pub fn open_audio(assets: &Path) -> Box<dyn AudioInterface> {
    #[cfg(feature = "audio")]
    {
        match rodio_backend::RodioAudio::new(assets) {
            Ok(audio) => return Box::new(audio),
            Err(e) => tracing::warn!(error = %e, "audio disabled"),
        }
    }
    info!(assets = %assets.display(), "running without sound");
    Box::new(NullAudio)
}

#[cfg(feature = "audio")]
pub use rodio_backend::RodioAudio;

#[cfg(feature = "audio")]
mod rodio_backend {
    use std::collections::HashMap;
    use std::fs;
    use std::io::Cursor;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use tracing::{debug, warn};

    use super::ASSET_EXTENSIONS;
    use crate::error::{Error, Result};
    use crate::events::{Sound, Track};
    use crate::interfaces::AudioInterface;

    fn track_volume(track: Track) -> f32 {
        match track {
            Track::Background => 1.5,
            Track::Boss => 0.5,
        }
    }

    fn find_asset(dir: &Path, name: &str) -> Option<PathBuf> {
        ASSET_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Reads a file fully and checks that rodio can decode it.
    fn load(dir: &Path, name: &str) -> Result<Arc<[u8]>> {
        let path = find_asset(dir, name)
            .ok_or_else(|| Error::Audio(format!("{name} not found in {}", dir.display())))?;
        let bytes: Arc<[u8]> = fs::read(&path)?.into();
        decode(&bytes)?;
        debug!(path = %path.display(), "loaded sound");
        Ok(bytes)
    }

    fn decode(bytes: &Arc<[u8]>) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
        Decoder::new(Cursor::new(Arc::clone(bytes))).map_err(|e| Error::Audio(e.to_string()))
    }

    pub struct RodioAudio {
        // Keeps the device open; the handle is useless without it.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        effects: HashMap<Sound, Arc<[u8]>>,
        tracks: HashMap<Track, Arc<[u8]>>,
        loops: HashMap<Track, Sink>,
    }

    impl RodioAudio {
        pub fn new(assets: &Path) -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;

            let mut effects = HashMap::new();
            for sound in Sound::ALL {
                match load(assets, sound.name()) {
                    Ok(bytes) => {
                        effects.insert(sound, bytes);
                    }
                    Err(e) => warn!(sound = sound.name(), error = %e, "sound unavailable"),
                }
            }

            let mut tracks = HashMap::new();
            for track in [Track::Background, Track::Boss] {
                match load(assets, track.name()) {
                    Ok(bytes) => {
                        tracks.insert(track, bytes);
                    }
                    Err(e) => warn!(track = track.name(), error = %e, "music unavailable"),
                }
            }

            Ok(Self {
                _stream: stream,
                handle,
                effects,
                tracks,
                loops: HashMap::new(),
            })
        }

        fn try_play_effect(&self, sound: Sound) -> Result<()> {
            let Some(bytes) = self.effects.get(&sound) else {
                return Ok(());
            };
            let source = decode(bytes)?;
            self.handle
                .play_raw(source.convert_samples())
                .map_err(|e| Error::Audio(e.to_string()))
        }

        fn try_start_loop(&mut self, track: Track) -> Result<()> {
            let Some(bytes) = self.tracks.get(&track) else {
                return Ok(());
            };
            let source = decode(bytes)?
                .repeat_infinite()
                .amplify(track_volume(track));
            let sink = Sink::try_new(&self.handle).map_err(|e| Error::Audio(e.to_string()))?;
            sink.append(source);
            // Replacing an existing sink drops it, which stops the old copy.
            self.loops.insert(track, sink);
            Ok(())
        }
    }

    impl AudioInterface for RodioAudio {
        fn play_effect(&mut self, sound: Sound) {
            if let Err(e) = self.try_play_effect(sound) {
                debug!(sound = sound.name(), error = %e, "effect failed");
            }
        }

        fn start_loop(&mut self, track: Track) {
            if let Err(e) = self.try_start_loop(track) {
                debug!(track = track.name(), error = %e, "loop failed");
            }
        }

        fn stop_loop(&mut self, track: Track) {
            if let Some(sink) = self.loops.remove(&track) {
                sink.stop();
            }
        }

        fn pause_all(&mut self) {
            for sink in self.loops.values() {
                sink.pause();
            }
        }

        fn resume_all(&mut self, is_boss_fight: bool) {
            let track = if is_boss_fight { Track::Boss } else { Track::Background };
            if let Some(sink) = self.loops.get(&track) {
                sink.play();
            }
        }
    }
}
