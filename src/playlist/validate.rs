use std::collections::HashSet;

use crate::{
    foundation::error::{ValidationCode, ValidationError},
    playlist::def::{PlaylistDef, SegmentDef},
};

/// Check playlist structure and return the first violation.
///
/// Checks run as four whole-playlist passes, so a duplicate id anywhere is reported before a
/// missing field anywhere, and so on:
///
/// 1. ids are unique across all tracks
/// 2. each segment has `id`, `start`, `duration`, `type`, and exactly one of `src`/`element`
/// 3. starts are non-decreasing within each track (and not negative)
/// 4. segments within a track do not overlap
pub fn validate_playlist(def: &PlaylistDef) -> Result<(), ValidationError> {
    check_unique_ids(def)?;
    check_required_fields(def)?;
    check_monotonic_starts(def)?;
    check_no_overlap(def)?;
    Ok(())
}

fn check_unique_ids(def: &PlaylistDef) -> Result<(), ValidationError> {
    let mut seen = HashSet::<&str>::new();
    for (ti, track) in def.tracks.iter().enumerate() {
        for seg in track {
            let Some(id) = seg.id.as_deref() else {
                continue;
            };
            if !seen.insert(id) {
                return Err(ValidationError::new(
                    ValidationCode::DuplicateId,
                    Some(id),
                    ti,
                    format!("segment '{id}' in track {ti} has a duplicate id"),
                ));
            }
        }
    }
    Ok(())
}

fn check_required_fields(def: &PlaylistDef) -> Result<(), ValidationError> {
    for (ti, track) in def.tracks.iter().enumerate() {
        for seg in track {
            check_segment_fields(seg, ti)?;
        }
    }
    Ok(())
}

fn check_segment_fields(seg: &SegmentDef, ti: usize) -> Result<(), ValidationError> {
    let id = seg.id.as_deref();
    let label = id.unwrap_or("<unnamed>");
    let fail = |what: String| -> Result<(), ValidationError> {
        Err(ValidationError::new(
            ValidationCode::MissingField,
            id,
            ti,
            format!("segment '{label}' in track {ti} {what}"),
        ))
    };

    if id.is_none() {
        return fail("is missing an id property".to_owned());
    }
    for (name, value) in [("start", seg.start), ("duration", seg.duration)] {
        match value {
            None => return fail(format!("is missing a {name} property")),
            Some(v) if !v.is_finite() => return fail(format!("has a non-finite {name}")),
            Some(_) => {}
        }
    }
    if seg.duration.is_some_and(|d| d < 0.0) {
        return fail("has a negative duration".to_owned());
    }
    if seg.type_tag.is_none() {
        return fail("is missing a type property".to_owned());
    }
    match (&seg.src, &seg.element) {
        (Some(_), Some(_)) => fail("has both a src and an element; it must have one".to_owned()),
        (None, None) => fail("has neither a src nor an element; it must have one".to_owned()),
        _ => Ok(()),
    }
}

fn check_monotonic_starts(def: &PlaylistDef) -> Result<(), ValidationError> {
    for (ti, track) in def.tracks.iter().enumerate() {
        let mut time = 0.0;
        for seg in track {
            let start = seg.start.unwrap_or_default();
            if start < time {
                let id = seg.id.as_deref();
                return Err(ValidationError::new(
                    ValidationCode::NonMonotonicStart,
                    id,
                    ti,
                    format!(
                        "segment '{}' in track {ti} starts before the previous segment",
                        id.unwrap_or_default()
                    ),
                ));
            }
            time = start;
        }
    }
    Ok(())
}

fn check_no_overlap(def: &PlaylistDef) -> Result<(), ValidationError> {
    for (ti, track) in def.tracks.iter().enumerate() {
        for pair in track.windows(2) {
            let (prev, cur) = (&pair[0], &pair[1]);
            let prev_end = prev.start.unwrap_or_default() + prev.duration.unwrap_or_default();
            let cur_start = cur.start.unwrap_or_default();
            if prev_end > cur_start {
                let prev_id = prev.id.as_deref().unwrap_or_default();
                let cur_id = cur.id.as_deref().unwrap_or_default();
                return Err(ValidationError::new(
                    ValidationCode::Overlap,
                    prev.id.as_deref(),
                    ti,
                    format!(
                        "segments overlap in track {ti}: '{prev_id}' finishes after '{cur_id}' starts"
                    ),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/playlist/validate.rs"]
mod tests;
