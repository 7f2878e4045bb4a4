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

//! The playback state machine.
//!
//! [`PlaybackController`] owns the current track, the play/pause/repeat
//! state, and sequencing over the filtered view. It never touches the UI,
//! and it reaches the audio engine only through the [`Transport`] it was
//! constructed with, so tests drive it against a mock.
//!
//! Sequencing always walks the filtered view it is handed, in catalog
//! order. The current track is located in that list by link, so reordering
//! or refiltering between calls cannot desynchronise playback.

use rand::{rng, seq::SliceRandom};

use crate::{
    model::Lecture,
    player::{PlaybackError, PlayerState, Transport},
};

pub(crate) struct PlaybackController<T> {
    transport: T,
    current: Option<Lecture>,
    state: PlayerState,
    repeat: bool,
}

impl<T: Transport> PlaybackController<T> {
    pub(crate) fn new(transport: T) -> Self {
        Self {
            transport,
            current: None,
            state: PlayerState::Idle,
            repeat: false,
        }
    }

    pub(crate) fn current(&self) -> Option<&Lecture> {
        self.current.as_ref()
    }

    pub(crate) fn state(&self) -> PlayerState {
        self.state
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub(crate) fn repeat(&self) -> bool {
        self.repeat
    }

    /// Selects a lecture and asks the transport to load and start it.
    ///
    /// The transition to `Playing` happens when the transport reports
    /// playback; a synchronous refusal leaves the track selected but not
    /// playing.
    pub(crate) fn play(&mut self, lecture: &Lecture) -> Result<(), PlaybackError> {
        self.current = Some(lecture.clone());
        self.state = PlayerState::Loaded;
        self.transport.load(&lecture.link)
    }

    /// The play/pause toggle.
    ///
    /// With no track ever selected this starts the first lecture of the
    /// filtered view instead of doing nothing.
    pub(crate) fn toggle_play_pause(&mut self, view: &[Lecture]) -> Result<(), PlaybackError> {
        match self.state {
            PlayerState::Playing => self.transport.pause(),
            PlayerState::Paused | PlayerState::Loaded => self.transport.resume(),
            PlayerState::Idle => {
                let first = view.first().ok_or(PlaybackError::EmptyPlaylist)?;
                self.play(first)
            }
        }
    }

    /// Advances to the next lecture in the filtered view, wrapping at the
    /// end. A current track that fell out of the view restarts from the top.
    pub(crate) fn next(&mut self, view: &[Lecture]) -> Result<(), PlaybackError> {
        if self.current.is_none() {
            return Err(PlaybackError::NoCurrentTrack);
        }
        if view.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let index = match self.position_in(view) {
            Some(index) => (index + 1) % view.len(),
            None => 0,
        };
        self.play(&view[index])
    }

    /// Retreats to the previous lecture in the filtered view, wrapping at
    /// the start. A current track that fell out of the view resumes from the
    /// bottom.
    pub(crate) fn previous(&mut self, view: &[Lecture]) -> Result<(), PlaybackError> {
        if self.current.is_none() {
            return Err(PlaybackError::NoCurrentTrack);
        }
        if view.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let index = match self.position_in(view) {
            Some(index) => (index + view.len() - 1) % view.len(),
            None => view.len() - 1,
        };
        self.play(&view[index])
    }

    /// End-of-track notification from the transport.
    ///
    /// With repeat on, the same track restarts from position zero and the
    /// state remains `Playing`. Otherwise this advances like [`Self::next`];
    /// when there is nothing to advance to, the state falls back to `Loaded`
    /// so no track is falsely reported as playing.
    pub(crate) fn on_track_ended(&mut self, view: &[Lecture]) -> Result<(), PlaybackError> {
        if self.repeat && self.current.is_some() {
            return self.transport.restart();
        }

        match self.next(view) {
            Err(PlaybackError::NoCurrentTrack | PlaybackError::EmptyPlaylist) => {
                if self.state == PlayerState::Playing {
                    self.state = PlayerState::Loaded;
                }
                Ok(())
            }
            other => other,
        }
    }

    pub(crate) fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Plays a fresh permutation of the filtered view, returning the
    /// permutation for one-time display.
    ///
    /// The canonical filtered order is untouched: `next` and `previous`
    /// keep walking catalog order afterwards. An empty view shuffles to an
    /// empty permutation and plays nothing.
    pub(crate) fn shuffle(&mut self, view: &[Lecture]) -> Result<Vec<Lecture>, PlaybackError> {
        let mut shuffled = view.to_vec();
        let mut rng = rng();
        shuffled.shuffle(&mut rng);

        if let Some(first) = shuffled.first() {
            self.play(first)?;
        }

        Ok(shuffled)
    }

    /// Pass-through volume setter, clamped to the 0.0..=1.0 range.
    pub(crate) fn set_volume(&self, level: f64) -> Result<(), PlaybackError> {
        self.transport.set_volume(level.clamp(0.0, 1.0))
    }

    /// The transport reports playback started or resumed.
    pub(crate) fn on_transport_playing(&mut self) {
        if self.current.is_some() {
            self.state = PlayerState::Playing;
        }
    }

    /// The transport reports playback paused.
    pub(crate) fn on_transport_paused(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
        }
    }

    /// The transport could not start or continue the current source.
    ///
    /// The selection is kept so the user can retry or skip; only the
    /// playing claim is withdrawn.
    pub(crate) fn on_transport_error(&mut self) {
        if self.current.is_some() {
            self.state = PlayerState::Loaded;
        }
    }

    /// Position of the current track within the given view, by link.
    fn position_in(&self, view: &[Lecture]) -> Option<usize> {
        let current = self.current.as_ref()?;
        view.iter().position(|lecture| lecture.link == current.link)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use proptest::prelude::*;

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        Load(String),
        Pause,
        Resume,
        Restart,
        SetVolume(f64),
    }

    /// Records every call; optionally refuses loads.
    #[derive(Clone, Default)]
    struct MockTransport {
        calls: Rc<RefCell<Vec<Call>>>,
        refuse_loads: bool,
    }

    impl MockTransport {
        fn refusing_loads() -> Self {
            Self {
                refuse_loads: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn last_loaded(&self) -> Option<String> {
            self.calls
                .borrow()
                .iter()
                .rev()
                .find_map(|call| match call {
                    Call::Load(uri) => Some(uri.clone()),
                    _ => None,
                })
        }
    }

    impl Transport for MockTransport {
        fn load(&self, uri: &str) -> Result<(), PlaybackError> {
            if self.refuse_loads {
                return Err(PlaybackError::Transport("refused".to_string()));
            }
            self.calls.borrow_mut().push(Call::Load(uri.to_string()));
            Ok(())
        }

        fn pause(&self) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push(Call::Pause);
            Ok(())
        }

        fn resume(&self) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push(Call::Resume);
            Ok(())
        }

        fn restart(&self) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push(Call::Restart);
            Ok(())
        }

        fn set_volume(&self, level: f64) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push(Call::SetVolume(level));
            Ok(())
        }
    }

    fn lecture(id: usize) -> Lecture {
        Lecture {
            title: format!("Lecture {}", id),
            date: "1972-03-15".to_string(),
            location: "London".to_string(),
            link: format!("https://archive.example/{}.mp3", id),
        }
    }

    fn view(len: usize) -> Vec<Lecture> {
        (0..len).map(lecture).collect()
    }

    fn controller() -> (PlaybackController<MockTransport>, MockTransport) {
        let transport = MockTransport::default();
        (PlaybackController::new(transport.clone()), transport)
    }

    #[test]
    fn play_selects_loads_and_waits_for_the_playing_event() {
        let (mut controller, transport) = controller();
        let view = view(3);

        controller.play(&view[1]).unwrap();
        assert_eq!(controller.state(), PlayerState::Loaded);
        assert_eq!(controller.current().unwrap().link, view[1].link);
        assert_eq!(transport.calls(), vec![Call::Load(view[1].link.clone())]);

        controller.on_transport_playing();
        assert_eq!(controller.state(), PlayerState::Playing);
    }

    #[test]
    fn play_keeps_the_selection_when_the_transport_refuses() {
        let transport = MockTransport::refusing_loads();
        let mut controller = PlaybackController::new(transport);
        let view = view(1);

        assert!(matches!(
            controller.play(&view[0]),
            Err(PlaybackError::Transport(_))
        ));
        assert_eq!(controller.state(), PlayerState::Loaded);
        assert_eq!(controller.current().unwrap().link, view[0].link);
    }

    #[test]
    fn toggle_from_idle_plays_the_first_lecture() {
        let (mut controller, transport) = controller();
        let view = view(3);

        controller.toggle_play_pause(&view).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), view[0].link);
    }

    #[test]
    fn toggle_from_idle_with_an_empty_view_is_refused() {
        let (mut controller, _) = controller();
        assert!(matches!(
            controller.toggle_play_pause(&[]),
            Err(PlaybackError::EmptyPlaylist)
        ));
        assert_eq!(controller.state(), PlayerState::Idle);
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let (mut controller, transport) = controller();
        let view = view(2);

        controller.play(&view[0]).unwrap();
        controller.on_transport_playing();

        controller.toggle_play_pause(&view).unwrap();
        assert_eq!(transport.calls().last(), Some(&Call::Pause));
        controller.on_transport_paused();
        assert_eq!(controller.state(), PlayerState::Paused);

        controller.toggle_play_pause(&view).unwrap();
        assert_eq!(transport.calls().last(), Some(&Call::Resume));
        controller.on_transport_playing();
        assert_eq!(controller.state(), PlayerState::Playing);
    }

    #[test]
    fn next_and_previous_wrap_around() {
        let (mut controller, transport) = controller();
        let view = view(3);

        controller.play(&view[2]).unwrap();
        controller.next(&view).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), view[0].link);

        controller.previous(&view).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), view[2].link);
    }

    #[test]
    fn next_with_no_current_track_is_refused() {
        let (mut controller, transport) = controller();
        let view = view(3);

        assert!(matches!(
            controller.next(&view),
            Err(PlaybackError::NoCurrentTrack)
        ));
        assert!(matches!(
            controller.previous(&view),
            Err(PlaybackError::NoCurrentTrack)
        ));
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn next_after_the_current_track_was_filtered_out_restarts_from_the_top() {
        let (mut controller, transport) = controller();
        let all = view(4);

        controller.play(&all[2]).unwrap();

        // A narrower view that no longer contains the current track.
        let narrowed = vec![all[0].clone(), all[1].clone()];
        controller.next(&narrowed).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), narrowed[0].link);
    }

    #[test]
    fn previous_after_the_current_track_was_filtered_out_resumes_from_the_bottom() {
        let (mut controller, transport) = controller();
        let all = view(4);

        controller.play(&all[2]).unwrap();

        let narrowed = vec![all[0].clone(), all[1].clone()];
        controller.previous(&narrowed).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), narrowed[1].link);
    }

    #[test]
    fn track_end_advances_to_the_next_lecture() {
        let (mut controller, transport) = controller();
        let view = view(3);

        controller.play(&view[0]).unwrap();
        controller.on_transport_playing();

        controller.on_track_ended(&view).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), view[1].link);
    }

    #[test]
    fn track_end_with_repeat_restarts_the_same_track() {
        let (mut controller, transport) = controller();
        let view = view(3);

        controller.play(&view[1]).unwrap();
        controller.on_transport_playing();
        controller.toggle_repeat();

        controller.on_track_ended(&view).unwrap();
        assert_eq!(transport.calls().last(), Some(&Call::Restart));
        // The same track is still current and still claims to be playing.
        assert_eq!(controller.current().unwrap().link, view[1].link);
        assert_eq!(controller.state(), PlayerState::Playing);
    }

    #[test]
    fn track_end_with_an_empty_view_settles_on_loaded() {
        let (mut controller, _) = controller();
        let view = view(1);

        controller.play(&view[0]).unwrap();
        controller.on_transport_playing();

        controller.on_track_ended(&[]).unwrap();
        assert_eq!(controller.state(), PlayerState::Loaded);
        assert_eq!(controller.current().unwrap().link, view[0].link);
    }

    #[test]
    fn repeat_toggles_off_again() {
        let (mut controller, _) = controller();
        controller.toggle_repeat();
        assert!(controller.repeat());
        controller.toggle_repeat();
        assert!(!controller.repeat());
    }

    #[test]
    fn shuffle_plays_the_first_of_the_permutation() {
        let (mut controller, transport) = controller();
        let view = view(5);

        let shuffled = controller.shuffle(&view).unwrap();
        assert_eq!(transport.last_loaded().unwrap(), shuffled[0].link);
        assert_eq!(controller.current().unwrap().link, shuffled[0].link);
    }

    #[test]
    fn shuffle_of_an_empty_view_plays_nothing() {
        let (mut controller, transport) = controller();

        let shuffled = controller.shuffle(&[]).unwrap();
        assert!(shuffled.is_empty());
        assert!(transport.calls().is_empty());
        assert_eq!(controller.state(), PlayerState::Idle);
    }

    #[test]
    fn sequencing_after_shuffle_follows_the_canonical_view() {
        let (mut controller, transport) = controller();
        let view = view(4);

        controller.shuffle(&view).unwrap();
        let current = controller.current().unwrap().clone();
        let position = view.iter().position(|l| l.link == current.link).unwrap();

        controller.next(&view).unwrap();
        let expected = &view[(position + 1) % view.len()];
        assert_eq!(transport.last_loaded().unwrap(), expected.link);
    }

    #[test]
    fn set_volume_clamps_to_unit_range() {
        let (controller, transport) = controller();

        controller.set_volume(1.5).unwrap();
        controller.set_volume(-0.25).unwrap();
        assert_eq!(
            transport.calls(),
            vec![Call::SetVolume(1.0), Call::SetVolume(0.0)]
        );
    }

    #[test]
    fn transport_error_withdraws_the_playing_claim() {
        let (mut controller, _) = controller();
        let view = view(1);

        controller.play(&view[0]).unwrap();
        controller.on_transport_playing();

        controller.on_transport_error();
        assert_eq!(controller.state(), PlayerState::Loaded);
        assert!(controller.current().is_some());
    }

    #[test]
    fn stray_transport_events_before_any_selection_are_ignored() {
        let (mut controller, _) = controller();

        controller.on_transport_playing();
        controller.on_transport_paused();
        controller.on_transport_error();
        assert_eq!(controller.state(), PlayerState::Idle);
    }

    proptest! {
        #[test]
        fn shuffle_returns_a_permutation(len in 0usize..20) {
            let (mut controller, _) = controller();
            let view = view(len);

            let shuffled = controller.shuffle(&view).unwrap();

            let mut expected: Vec<String> = view.iter().map(|l| l.link.clone()).collect();
            let mut actual: Vec<String> = shuffled.iter().map(|l| l.link.clone()).collect();
            expected.sort();
            actual.sort();
            prop_assert_eq!(expected, actual);
        }

        #[test]
        fn next_then_previous_returns_to_the_start(len in 1usize..12, start in 0usize..12) {
            prop_assume!(start < len);
            let (mut controller, transport) = controller();
            let view = view(len);

            controller.play(&view[start]).unwrap();
            controller.next(&view).unwrap();
            controller.previous(&view).unwrap();
            prop_assert_eq!(transport.last_loaded().unwrap(), view[start].link.clone());
        }

        #[test]
        fn a_full_lap_of_next_visits_every_lecture_once(len in 1usize..10, start in 0usize..10) {
            prop_assume!(start < len);
            let (mut controller, transport) = controller();
            let view = view(len);

            controller.play(&view[start]).unwrap();
            for _ in 0..len {
                controller.next(&view).unwrap();
            }

            // One lap later we are back where we started, having loaded
            // each lecture exactly once along the way.
            prop_assert_eq!(transport.last_loaded().unwrap(), view[start].link.clone());
            let mut lap: Vec<String> = transport
                .calls()
                .into_iter()
                .skip(1)
                .filter_map(|call| match call {
                    Call::Load(uri) => Some(uri),
                    _ => None,
                })
                .collect();
            lap.sort();
            let mut expected: Vec<String> = view.iter().map(|l| l.link.clone()).collect();
            expected.sort();
            prop_assert_eq!(lap, expected);
        }
    }
}
