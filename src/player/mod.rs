// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Audio playback control and state management.
//!
//! [`controller::PlaybackController`] owns the playback state machine. The
//! engine it drives sits behind the [`Transport`] trait, implemented here by
//! [`AudioPlayer`]: a command proxy for a background worker thread that
//! interfaces with the underlying audio library (MPV), ensuring that heavy
//! audio operations never block the main application thread.

mod commands;
pub(crate) mod controller;

use std::sync::mpsc;

use thiserror::Error;

use crate::{actions::events::AppEvent, player::commands::AudioPlayerCommand};

/// Lifecycle of the current track.
///
/// `Idle` means no track has ever been selected this session; `Loaded` means
/// a track is selected but the transport is not currently playing it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum PlayerState {
    Idle,
    Loaded,
    Playing,
    Paused,
}

/// Recoverable playback failures.
///
/// Sequencing refusals (`NoCurrentTrack`, `EmptyPlaylist`) are silent
/// no-ops upstream; `Transport` failures surface on the status line.
#[derive(Debug, Error)]
pub(crate) enum PlaybackError {
    #[error("No current track")]
    NoCurrentTrack,
    #[error("Nothing to play")]
    EmptyPlaylist,
    #[error("Playback failed: {0}")]
    Transport(String),
}

/// The audio engine as the playback controller sees it.
///
/// `load` both loads and starts the given source. All operations are
/// fire-and-forget: completion, progress, and failure come back
/// asynchronously as transport events.
pub(crate) trait Transport {
    fn load(&self, uri: &str) -> Result<(), PlaybackError>;
    fn pause(&self) -> Result<(), PlaybackError>;
    fn resume(&self) -> Result<(), PlaybackError>;
    fn restart(&self) -> Result<(), PlaybackError>;
    fn set_volume(&self, level: f64) -> Result<(), PlaybackError>;
}

/// A handle to the audio playback engine.
///
/// This struct acts as a command proxy; it does not perform audio processing
/// itself but instead sends instructions to a background worker thread.
/// Handles are cheap to clone and share one worker.
#[derive(Clone)]
pub(crate) struct AudioPlayer {
    /// Channel for sending commands to the background worker thread.
    command_tx: mpsc::Sender<AudioPlayerCommand>,
}

impl AudioPlayer {
    /// Spawns the audio worker thread and returns a new player handle.
    ///
    /// # Arguments
    ///
    /// * `event_tx` - A channel to send application-level events (like
    ///   progress updates or errors) back to the main event loop.
    pub(crate) fn new(event_tx: mpsc::Sender<AppEvent>) -> Self {
        let (command_tx, command_rx) = mpsc::channel::<AudioPlayerCommand>();

        commands::spawn_player_worker(command_rx, event_tx);

        Self { command_tx }
    }

    /// Seeks relative to the current position.
    ///
    /// # Arguments
    ///
    /// * `delta` - The number of seconds to skip (positive or negative).
    pub(crate) fn seek(&self, delta: i32) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::Seek(delta))
    }

    /// Adjusts the playback volume relative to the current level.
    ///
    /// # Arguments
    ///
    /// * `delta` - The amount to change the volume (positive or negative).
    pub(crate) fn adjust_volume(&self, delta: i32) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::AdjustVolume(delta))
    }

    fn send(&self, command: AudioPlayerCommand) -> Result<(), PlaybackError> {
        self.command_tx
            .send(command)
            .map_err(|_| PlaybackError::Transport("audio worker unavailable".to_string()))
    }
}

impl Transport for AudioPlayer {
    fn load(&self, uri: &str) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::Load(uri.to_string()))
    }

    fn pause(&self) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::Pause)
    }

    fn resume(&self) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::Resume)
    }

    fn restart(&self) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::Restart)
    }

    fn set_volume(&self, level: f64) -> Result<(), PlaybackError> {
        self.send(AudioPlayerCommand::SetVolume(level))
    }
}
