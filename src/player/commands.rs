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

//! MPV-backed audio playback engine and event processing.
//!
//! This module provides the core audio playback logic, leveraging `libmpv`
//! for audio decoding and network streaming. It manages a background worker
//! thread that bridges the gap between the application's command-based
//! interface and the low-level MPV property observation system.
//!
//! # Architecture
//!
//! The engine operates using a dual-channel communication pattern:
//! 1. **Command Channel**: Receives [`AudioPlayerCommand`]s from the UI to
//!    control playback (load, pause, seek, etc.).
//! 2. **Event Channel**: Broadcasts [`AppEvent`]s to notify the UI of state
//!    changes, such as track progress, volume updates, and end of playback.

use anyhow::{Context, Result};
use mpv::Format;
use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::actions::events::AppEvent;

#[derive(Debug)]
pub(crate) enum AudioPlayerCommand {
    Load(String),
    Pause,
    Resume,
    Restart,
    Seek(i32),
    SetVolume(f64),
    AdjustVolume(i32),
}

/// Play/pause status as the transport itself sees it.
///
/// `Inactive` means no source is open; it occurs briefly around every track
/// change and carries no state worth reporting.
#[derive(Clone, Copy, Debug, PartialEq)]
enum TransportState {
    Inactive,
    Playing,
    Paused,
}

/// Spawns the audio worker thread to process playback commands.
///
/// This function takes ownership of the command receiver and the event
/// sender, moving them into a dedicated background thread.
///
/// If the internal worker returns an error, it is caught here and broadcast
/// as a fatal application event.
///
/// # Arguments
///
/// * `command_rx` - The receiving end of the player command channel.
/// * `event_tx` - The channel used to broadcast playback updates and errors.
pub(crate) fn spawn_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) {
    let error_tx = event_tx.clone();

    thread::spawn(move || {
        if let Err(e) = audio_player_worker(command_rx, event_tx) {
            let _ = error_tx.send(AppEvent::FatalError(format!("MPV worker failure: {:?}", e)));
        }
    });
}

/// The primary execution loop for the audio player backend.
///
/// This function initializes a local `libmpv` context and enters a dual-loop
/// pattern, draining pending commands and polling for MPV events on each
/// iteration.
///
/// # Errors
///
/// Returns an error if the MPV context fails to initialize or if the
/// internal command/event loops encounter an unrecoverable failure.
fn audio_player_worker(
    command_rx: Receiver<AudioPlayerCommand>,
    event_tx: Sender<AppEvent>,
) -> Result<()> {
    let mut handler = (|| {
        let mut builder = mpv::MpvHandlerBuilder::new().context("Failed to create MPV builder")?;
        builder
            .set_option("vo", "null")
            .context("Failed to set no video output")?;
        builder.build().context("Failed to build MPV handler")
    })()?;

    handler
        .observe_property::<f64>("duration", 0)
        .context("Failed to observe duration")?;
    handler
        .observe_property::<bool>("pause", 0)
        .context("Failed to observe pause")?;
    handler
        .observe_property::<f64>("time-pos", 0)
        .context("Failed to observe time-pos")?;
    handler
        .observe_property::<f64>("volume", 0)
        .context("Failed to observe volume")?;
    handler
        .observe_property::<bool>("idle-active", 0)
        .context("Failed to observe idle-active")?;

    let mut current_source: Option<String> = None;
    let mut is_paused = false;
    let mut is_idle = true;

    let mut transport_state = TransportState::Inactive;

    loop {
        process_commands(&mut handler, &command_rx, &mut current_source, is_idle, &event_tx)?;
        process_mpv_events(
            &mut handler,
            &mut is_paused,
            &mut is_idle,
            &mut transport_state,
            &event_tx,
        )?;
    }
}

// Maps the observed backend flags to a simplified [`TransportState`].
fn transport_state(is_paused: bool, is_idle: bool) -> TransportState {
    if is_idle {
        TransportState::Inactive
    } else if is_paused {
        TransportState::Paused
    } else {
        TransportState::Playing
    }
}

/// Drains and executes all pending commands from the application channel.
///
/// A source that cannot be loaded is reported as a recoverable transport
/// failure rather than killing the worker.
fn process_commands(
    handler: &mut mpv::MpvHandler,
    command_rx: &mpsc::Receiver<AudioPlayerCommand>,
    current_source: &mut Option<String>,
    is_idle: bool,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    while let Ok(command) = command_rx.try_recv() {
        match command {
            AudioPlayerCommand::Load(uri) => {
                if let Err(e) = handler.command(&["loadfile", &uri, "replace"]) {
                    event_tx.send(AppEvent::TransportFailed(format!(
                        "Unable to play {}: {:?}",
                        uri, e
                    )))?;
                    continue;
                }
                handler.set_property("pause", false)?;
                *current_source = Some(uri);
            }
            AudioPlayerCommand::Pause => {
                handler.set_property("pause", true)?;
            }
            AudioPlayerCommand::Resume => {
                // After end-of-file the source is closed again; resuming
                // then means starting the same source over from the top.
                if is_idle {
                    reload(handler, current_source, event_tx)?;
                } else {
                    handler.set_property("pause", false)?;
                }
            }
            AudioPlayerCommand::Restart => {
                reload(handler, current_source, event_tx)?;
            }
            AudioPlayerCommand::Seek(delta) => {
                // Seeking with no open source is a silent no-op.
                handler.command(&["seek", &delta.to_string(), "relative"]).ok();
            }
            AudioPlayerCommand::SetVolume(level) => {
                handler.set_property("volume", (level * 100.0).clamp(0.0, 100.0))?;
            }
            AudioPlayerCommand::AdjustVolume(delta) => {
                handler.command(&["add", "volume", &delta.to_string()])?;
            }
        }
    }

    Ok(())
}

/// Starts the most recently loaded source over from position zero.
fn reload(
    handler: &mut mpv::MpvHandler,
    current_source: &Option<String>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    let Some(uri) = current_source else {
        return Ok(());
    };

    if let Err(e) = handler.command(&["loadfile", uri, "replace"]) {
        event_tx.send(AppEvent::TransportFailed(format!(
            "Unable to play {}: {:?}",
            uri, e
        )))?;
        return Ok(());
    }
    handler.set_property("pause", false)?;

    Ok(())
}

/// Polls for MPV events and synchronizes the transport state.
///
/// This function waits for up to 50ms for an event from the MPV context.
/// If an event occurs, it updates internal flags and broadcasts any
/// necessary [`AppEvent`]s to the UI.
fn process_mpv_events(
    handler: &mut mpv::MpvHandler,
    is_paused: &mut bool,
    is_idle: &mut bool,
    current_state: &mut TransportState,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<()> {
    if let Some(mpv_event) = handler.wait_event(0.05) {
        let app_event = match mpv_event {
            mpv::Event::PropertyChange { name, change, .. } => match (name, change) {
                ("duration", Format::Double(duration)) => {
                    Some(AppEvent::DurationChanged(duration as u64))
                }
                ("pause", Format::Flag(pause)) => {
                    *is_paused = pause;
                    None
                }
                ("time-pos", Format::Double(seconds)) if seconds >= 0.0 => {
                    Some(AppEvent::TimeChanged(seconds))
                }
                ("volume", Format::Double(volume)) => {
                    Some(AppEvent::VolumeChanged((volume / 100.0).clamp(0.0, 1.0)))
                }
                ("idle-active", Format::Flag(idle_active)) => {
                    *is_idle = idle_active;
                    None
                }
                _ => None,
            },
            mpv::Event::EndFile(result) => match result {
                Ok(mpv::EndFileReason::MPV_END_FILE_REASON_EOF) => Some(AppEvent::TrackEnded),
                Ok(mpv::EndFileReason::MPV_END_FILE_REASON_ERROR) => Some(
                    AppEvent::TransportFailed("Source failed during playback".to_string()),
                ),
                Ok(_) => None,
                Err(e) => Some(AppEvent::TransportFailed(format!("{:?}", e))),
            },
            _ => None,
        };

        let new_transport_state = transport_state(*is_paused, *is_idle);

        if new_transport_state != *current_state {
            *current_state = new_transport_state;
            let state_event = match new_transport_state {
                TransportState::Playing => Some(AppEvent::TransportPlaying),
                TransportState::Paused => Some(AppEvent::TransportPaused),
                // The transport goes inactive around every track change;
                // real endings arrive separately as end-of-file events.
                TransportState::Inactive => None,
            };
            if let Some(event) = state_event {
                event_tx
                    .send(event)
                    .context("Failed to send transport state event")?;
            }
        }

        if let Some(event) = app_event {
            event_tx.send(event).context("Failed to send event")?;
        }
    }

    Ok(())
}
