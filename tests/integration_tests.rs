// Integration tests for the matching service

mod common;

use std::sync::Arc;

use chrono::Weekday;
use common::*;
use fit_match::core::distance_between;
use fit_match::models::{FitnessGoal, MatchStatus, MatchingPreference, PotentialMatchesQuery, Profile, TimeSlot};
use fit_match::services::{InMemoryStore, MatchingError};
use fit_match::{Matcher, MatchingService};

fn service_for(store: InMemoryStore) -> MatchingService {
    let store = Arc::new(store);
    MatchingService::new(store.clone(), store, Matcher::default())
}

fn requester() -> Profile {
    let mut profile = create_test_profile(1, Some(MIAMI));
    profile.first_name = Some("Sarah".to_string());
    profile.last_name = Some("Johnson".to_string());
    profile
}

#[tokio::test]
async fn test_integration_end_to_end_matching() {
    let mut sarah = requester();
    sarah.activities = vec![activity("Running"), activity("Yoga")];
    sarah.goals = vec![goal(FitnessGoal::Endurance)];
    sarah.schedules = vec![slot(Weekday::Sat, TimeSlot::Morning)];

    let mut close = create_test_profile(2, Some(north_of(MIAMI, 1.0)));
    close.activities = vec![activity("Running")];
    close.goals = vec![goal(FitnessGoal::Endurance)];
    close.schedules = vec![slot(Weekday::Sat, TimeSlot::Morning)];

    let mut farther = create_test_profile(3, Some(north_of(MIAMI, 4.0)));
    farther.activities = vec![activity("Cycling")];

    let out_of_range = create_test_profile(4, Some(north_of(MIAMI, 6.0)));
    let no_location = create_test_profile(5, None);

    let store = InMemoryStore::default()
        .with_profile(sarah)
        .with_profile(close)
        .with_profile(farther)
        .with_profile(out_of_range)
        .with_profile(no_location);

    let result = service_for(store)
        .get_potential_matches_on(1001, 5.0, 20, today())
        .await
        .unwrap();

    let ids: Vec<i32> = result.matches.iter().map(|m| m.profile_id).collect();
    assert_eq!(ids, vec![2, 3]);
    assert_eq!(result.total_candidates, 4);

    let best = &result.matches[0];
    assert_eq!(best.display_name, "User2 T.");
    assert_eq!(best.common_activities, vec!["Running".to_string()]);
    assert!((best.distance - 1.0).abs() < 0.05);
    // 40 + 15 + 20 + 10 + 3
    assert_eq!(best.compatibility_score, 88.0);
}

#[tokio::test]
async fn test_same_location_full_overlap() {
    let mut sarah = requester();
    sarah.activities = vec![activity("Running"), activity("Yoga")];
    sarah.goals = vec![goal(FitnessGoal::Endurance), goal(FitnessGoal::StressRelief)];
    sarah.schedules = vec![
        slot(Weekday::Mon, TimeSlot::EarlyMorning),
        slot(Weekday::Thu, TimeSlot::Evening),
    ];
    sarah.matching_preference = Some(MatchingPreference {
        prefer_home_gym: true,
        ..MatchingPreference::default()
    });

    let mut twin = create_test_profile(2, Some(MIAMI));
    twin.activities = sarah.activities.clone();
    twin.goals = sarah.goals.clone();
    twin.schedules = sarah.schedules.clone();
    twin.has_home_gym = true;

    let store = InMemoryStore::default().with_profile(sarah).with_profile(twin);
    let matches = service_for(store).get_potential_matches(1001, 5.0, 20).await.unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].distance, 0.0);
    assert_eq!(matches[0].compatibility_score, 40.0 + 30.0 + 20.0 + 10.0 + 6.0 + 5.0);
}

#[tokio::test]
async fn test_match_status_exclusion() {
    let statuses = [
        (2, MatchStatus::Accepted),
        (3, MatchStatus::Rejected),
        (4, MatchStatus::Expired),
        (5, MatchStatus::Pending),
        (6, MatchStatus::Blocked),
    ];

    let mut store = InMemoryStore::default().with_profile(requester());
    for (i, (id, status)) in statuses.into_iter().enumerate() {
        store = store.with_profile(create_test_profile(id, Some(north_of(MIAMI, 0.5))));
        // Alternate direction so both sides of the pair are covered
        store = if i % 2 == 0 {
            store.with_match(create_test_match(i as i32, id, 1, status))
        } else {
            store.with_match(create_test_match(i as i32, 1, id, status))
        };
    }
    let store = store.with_profile(create_test_profile(7, Some(north_of(MIAMI, 0.5))));

    let matches = service_for(store)
        .get_potential_matches_on(1001, 5.0, 20, today())
        .await
        .unwrap();

    let mut ids: Vec<i32> = matches.matches.iter().map(|m| m.profile_id).collect();
    ids.sort();
    assert_eq!(ids, vec![3, 4, 7]);
}

#[tokio::test]
async fn test_age_preference_applied() {
    let mut sarah = requester();
    sarah.matching_preference = Some(preference_with_ages(Some(25), Some(35)));

    let dob = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d);
    let births = [
        (2, dob(2001, 6, 15)), // 25 today
        (3, dob(2001, 6, 16)), // 24 until tomorrow
        (4, dob(1991, 6, 15)), // 35
        (5, dob(1990, 6, 14)), // 36
        (6, None),
    ];

    let mut store = InMemoryStore::default().with_profile(sarah);
    for (id, date_of_birth) in births {
        let mut profile = create_test_profile(id, Some(north_of(MIAMI, 1.0)));
        profile.date_of_birth = date_of_birth;
        store = store.with_profile(profile);
    }

    let result = service_for(store)
        .get_potential_matches_on(1001, 5.0, 20, today())
        .await
        .unwrap();

    let mut found: Vec<(i32, Option<i32>)> = result.matches.iter().map(|m| (m.profile_id, m.age)).collect();
    found.sort();
    assert_eq!(found, vec![(2, Some(25)), (4, Some(35))]);
}

#[tokio::test]
async fn test_preference_distance_does_not_narrow_radius() {
    let mut sarah = requester();
    sarah.matching_preference = Some(MatchingPreference {
        max_distance_miles: 1,
        ..MatchingPreference::default()
    });

    let store = InMemoryStore::default()
        .with_profile(sarah)
        .with_profile(create_test_profile(2, Some(north_of(MIAMI, 8.0))));

    let matches = service_for(store).get_potential_matches(1001, 10.0, 20).await.unwrap();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn test_generated_pool_invariants() {
    for seed in [1u64, 42, 2024] {
        let mut profiles = generate_profiles(seed, 2, 300, MIAMI, 20.0);
        let mut sarah = requester();
        sarah.activities = vec![activity("Running"), activity("Yoga"), activity("Swimming")];
        sarah.schedules = vec![slot(Weekday::Tue, TimeSlot::Evening)];
        profiles.push(sarah);

        let locations: std::collections::HashMap<i32, _> =
            profiles.iter().filter_map(|p| p.location.map(|l| (p.id, l))).collect();

        let service = service_for(InMemoryStore::new(profiles, vec![]));
        let first = service
            .get_potential_matches_on(1001, 10.0, 15, today())
            .await
            .unwrap();
        let second = service
            .get_potential_matches_on(1001, 10.0, 15, today())
            .await
            .unwrap();

        assert_eq!(first.matches, second.matches, "seed {}", seed);
        assert!(first.matches.len() <= 15);
        assert!(first.matches.iter().all(|m| m.profile_id != 1));

        for m in &first.matches {
            assert!(distance_between(&MIAMI, &locations[&m.profile_id]) <= 10.0);
        }

        for pair in first.matches.windows(2) {
            assert!(pair[0].compatibility_score >= pair[1].compatibility_score);
        }
    }
}

#[tokio::test]
async fn test_tie_broken_by_distance() {
    let store = InMemoryStore::default()
        .with_profile(requester())
        .with_profile(create_test_profile(2, Some(north_of(MIAMI, 1.5))))
        .with_profile(create_test_profile(3, Some(north_of(MIAMI, 0.5))));

    let matches = service_for(store).get_potential_matches(1001, 5.0, 20).await.unwrap();

    let ids: Vec<i32> = matches.iter().map(|m| m.profile_id).collect();
    assert_eq!(ids, vec![3, 2]);
    assert_eq!(matches[0].compatibility_score, matches[1].compatibility_score);
}

#[tokio::test]
async fn test_profile_not_found() {
    let err = service_for(InMemoryStore::default())
        .get_potential_matches(1001, 5.0, 20)
        .await
        .unwrap_err();

    assert!(matches!(err, MatchingError::ProfileNotFound(1001)));
}

#[tokio::test]
async fn test_location_missing() {
    let store = InMemoryStore::default().with_profile(create_test_profile(1, None));

    let err = service_for(store).get_potential_matches(1001, 5.0, 20).await.unwrap_err();

    assert!(matches!(err, MatchingError::LocationMissing(1)));
}

#[tokio::test]
async fn test_query_bounds() {
    let store = InMemoryStore::default().with_profile(requester());
    let service = service_for(store);

    for (radius, limit) in [(Some(0), None), (Some(101), None), (None, Some(0)), (None, Some(51))] {
        let err = service
            .query(1001, &PotentialMatchesQuery::new(radius, limit))
            .await
            .unwrap_err();
        assert!(matches!(err, MatchingError::InvalidQuery(_)));
    }

    let response = service
        .query(1001, &PotentialMatchesQuery::new(Some(100), Some(50)))
        .await
        .unwrap();
    assert_eq!(response.radius_miles, 100.0);
    assert_eq!(response.limit, 50);
}
