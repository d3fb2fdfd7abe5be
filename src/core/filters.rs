use chrono::{Datelike, NaiveDate};

use crate::core::distance::{bounding_box_miles, distance_between, is_within_bounding_box};
use crate::models::{Coordinates, MatchingPreference, Profile};

/// A candidate that survived filtering, with its distance already computed
#[derive(Debug, Clone)]
pub struct FilteredCandidate {
    pub profile: Profile,
    pub distance_miles: f64,
}

/// Age in whole years on `today`
///
/// Calendar-year difference, minus one if this year's birthday has not
/// happened yet.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (date_of_birth.month(), date_of_birth.day()) > (today.month(), today.day()) {
        age -= 1;
    }
    age
}

/// Check an age against optional inclusive bounds
#[inline]
pub fn age_in_range(age: i32, min_age: Option<i32>, max_age: Option<i32>) -> bool {
    min_age.map_or(true, |min| age >= min) && max_age.map_or(true, |max| age <= max)
}

/// Stage 1: distance cutoff
///
/// Returns the distance when the candidate is inside the radius.
#[inline]
pub fn within_radius(origin: &Coordinates, candidate: &Profile, radius_miles: f64) -> Option<f64> {
    let location = candidate.location.as_ref()?;
    let distance = distance_between(origin, location);
    (distance <= radius_miles).then_some(distance)
}

/// Stage 2: age bounds from the effective preference
///
/// Only applies when a bound is set; then a candidate without a date of
/// birth cannot satisfy it.
#[inline]
pub fn matches_age_preference(
    candidate: &Profile,
    preferences: &MatchingPreference,
    today: NaiveDate,
) -> bool {
    if !preferences.has_age_bounds() {
        return true;
    }

    match candidate.date_of_birth {
        Some(dob) => age_in_range(age_on(dob, today), preferences.min_age, preferences.max_age),
        None => false,
    }
}

/// Run the filter pipeline over a raw candidate pool
///
/// The caller-supplied radius is the hard cutoff; the preference's own
/// `max_distance_miles` does not narrow it. Candidates without coordinates
/// are dropped even if the repository returned them.
pub fn filter_candidates(
    origin: &Coordinates,
    candidates: Vec<Profile>,
    preferences: &MatchingPreference,
    radius_miles: f64,
    today: NaiveDate,
) -> Vec<FilteredCandidate> {
    let bbox = bounding_box_miles(origin, radius_miles);

    candidates
        .into_iter()
        // Stage 0: cheap box prefilter, also drops profiles with no location
        .filter(|profile| {
            profile
                .location
                .as_ref()
                .is_some_and(|location| is_within_bounding_box(location, &bbox))
        })
        // Stage 1: exact distance
        .filter_map(|profile| {
            within_radius(origin, &profile, radius_miles).map(|distance_miles| FilteredCandidate {
                profile,
                distance_miles,
            })
        })
        // Stage 2: age bounds
        .filter(|candidate| matches_age_preference(&candidate.profile, preferences, today))
        .collect()
}
