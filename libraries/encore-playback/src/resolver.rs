//! Transition resolution
//!
//! Pure functions computing which track comes next or before, given the
//! session state and the catalog. Precedence for "next":
//!
//! 1. Shuffle inside a playlist of two or more tracks
//! 2. Advance within the context
//! 3. Wrap to the start of the context on repeat
//! 4. Random catalog track, context cleared
//!
//! and for "previous":
//!
//! 1. Restart the current track when past the restart threshold
//! 2. Step back within the context
//! 3. Jump to the previously played track (context cleared)
//! 4. Wrap to the end of the context on repeat
//! 5. Random catalog track, context cleared
//!
//! A `None` result means there is nowhere to go; callers leave playback
//! untouched.

use crate::context::PlaybackContext;
use crate::session::PlaybackSession;
use crate::types::{Resolution, Transition};
use encore_core::{Track, TrackId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

/// Resolve the track after the current one
pub fn resolve_next<R: Rng + ?Sized>(
    session: &PlaybackSession,
    catalog: &[Track],
    rng: &mut R,
) -> Option<Resolution> {
    let context = session.context();
    let current_id = session.current_track().map(|t| &t.id);

    let shuffle_in_playlist = session.shuffle_enabled()
        && matches!(context, PlaybackContext::Playlist(_))
        && context.len() >= 2;

    if shuffle_in_playlist {
        if let Some((index, track)) = pick_random(context.tracks(), current_id, rng) {
            return Some(Resolution::in_context(track.clone(), index));
        }
    }

    if let Some(last) = context.last_index() {
        let next = session.current_index().map_or(0, |i| i + 1);
        if next <= last {
            return context
                .get(next)
                .map(|track| Resolution::in_context(track.clone(), next));
        }

        if session.current_index() == Some(last) && session.repeat_enabled() {
            return context
                .get(0)
                .map(|track| Resolution::in_context(track.clone(), 0));
        }
    }

    random_from_catalog(catalog, current_id, rng)
}

/// Resolve the "previous" button
///
/// `position` is how far playback is into the current track.
pub fn resolve_previous<R: Rng + ?Sized>(
    session: &PlaybackSession,
    catalog: &[Track],
    position: Duration,
    restart_threshold: Duration,
    rng: &mut R,
) -> Option<Transition> {
    let current = session.current_track();
    if current.is_some() && position > restart_threshold {
        return Some(Transition::Restart);
    }

    let context = session.context();
    if let Some(index) = session.current_index().filter(|&i| i > 0) {
        if let Some(track) = context.get(index - 1) {
            return Some(Transition::Switch(Resolution::in_context(
                track.clone(),
                index - 1,
            )));
        }
    }

    if session.history().len() >= 2 {
        if let Some(track) = session.history().get(1) {
            return Some(Transition::Switch(Resolution::standalone(track.clone())));
        }
    }

    if session.current_index() == Some(0) && session.repeat_enabled() {
        if let Some(last) = context.last_index() {
            if let Some(track) = context.get(last) {
                return Some(Transition::Switch(Resolution::in_context(
                    track.clone(),
                    last,
                )));
            }
        }
    }

    random_from_catalog(catalog, current.map(|t| &t.id), rng).map(Transition::Switch)
}

/// Resolve what happens when the current track plays to its end
///
/// Repeat without a context loops the single track; everything else is a
/// regular "next".
pub fn resolve_track_end<R: Rng + ?Sized>(
    session: &PlaybackSession,
    catalog: &[Track],
    rng: &mut R,
) -> Option<Transition> {
    let loop_single = session.repeat_enabled()
        && session.context().is_none()
        && session.current_track().is_some();

    if loop_single {
        return Some(Transition::Restart);
    }

    resolve_next(session, catalog, rng).map(Transition::Switch)
}

/// Random catalog pick excluding the current track
///
/// A catalog of zero or one tracks never yields a pick.
fn random_from_catalog<R: Rng + ?Sized>(
    catalog: &[Track],
    exclude: Option<&TrackId>,
    rng: &mut R,
) -> Option<Resolution> {
    if catalog.len() < 2 {
        return None;
    }

    pick_random(catalog, exclude, rng).map(|(_, track)| Resolution::standalone(track.clone()))
}

/// Uniform pick among tracks whose id differs from `exclude`
fn pick_random<'a, R: Rng + ?Sized>(
    tracks: &'a [Track],
    exclude: Option<&TrackId>,
    rng: &mut R,
) -> Option<(usize, &'a Track)> {
    let candidates: Vec<usize> = tracks
        .iter()
        .enumerate()
        .filter(|(_, track)| Some(&track.id) != exclude)
        .map(|(index, _)| index)
        .collect();

    candidates
        .choose(rng)
        .map(|&index| (index, &tracks[index]))
}
