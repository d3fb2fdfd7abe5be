// Shared fixtures for integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, Weekday};
use fit_match::models::enums::weekday_from_code;
use fit_match::models::{
    Activity, ActivityCategory, Coordinates, FitnessGoal, FitnessLevel, Match, MatchStatus,
    MatchingPreference, Profile, ProfileActivity, ProfileGoal, ProfileSchedule, TimeSlot,
};

/// Downtown Miami, home of the seed users
pub const MIAMI: Coordinates = Coordinates {
    latitude: 25.7617,
    longitude: -80.1918,
};

/// Miles per degree of latitude at the Earth radius the engine uses
pub const MILES_PER_DEGREE_LAT: f64 = 3959.0 * std::f64::consts::PI / 180.0;

pub const ACTIVITY_NAMES: [&str; 10] = [
    "Running",
    "Cycling",
    "Yoga",
    "Weightlifting",
    "Swimming",
    "Tennis",
    "Pilates",
    "Boxing",
    "Hiking",
    "CrossFit",
];

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
}

/// A point `miles` due north of `origin`
pub fn north_of(origin: Coordinates, miles: f64) -> Coordinates {
    Coordinates::new(origin.latitude + miles / MILES_PER_DEGREE_LAT, origin.longitude)
}

pub fn activity(name: &str) -> ProfileActivity {
    let id = ACTIVITY_NAMES
        .iter()
        .position(|n| *n == name)
        .map(|i| i as i32 + 1)
        .unwrap_or(99);

    ProfileActivity {
        activity: Activity {
            id,
            name: name.to_string(),
            category: ActivityCategory::Cardio,
            description: None,
            icon_url: None,
            is_active: true,
        },
        is_primary: false,
    }
}

pub fn goal(goal: FitnessGoal) -> ProfileGoal {
    ProfileGoal { goal, priority: 1 }
}

pub fn slot(day: Weekday, time_slot: TimeSlot) -> ProfileSchedule {
    ProfileSchedule::available(day, time_slot)
}

/// Bare profile: intermediate, no relations, user id = 1000 + id
pub fn create_test_profile(id: i32, location: Option<Coordinates>) -> Profile {
    Profile {
        id,
        user_id: 1000 + id,
        first_name: Some(format!("User{}", id)),
        last_name: Some("Tester".to_string()),
        display_name: None,
        date_of_birth: None,
        bio: None,
        profile_picture_url: None,
        location,
        fitness_level: FitnessLevel::Intermediate,
        has_home_gym: false,
        activities: vec![],
        goals: vec![],
        schedules: vec![],
        matching_preference: None,
    }
}

pub fn create_test_match(id: i32, requester_id: i32, requestee_id: i32, status: MatchStatus) -> Match {
    Match {
        id,
        requester_id,
        requestee_id,
        status,
        compatibility_score: 75.0,
        created_at: chrono::Utc::now(),
        responded_at: None,
        last_interaction_at: None,
        initial_message: None,
        shared_activities: vec![],
    }
}

pub fn preference_with_ages(min_age: Option<i32>, max_age: Option<i32>) -> MatchingPreference {
    MatchingPreference {
        min_age,
        max_age,
        ..MatchingPreference::default()
    }
}

/// Deterministic linear congruential generator for fixture data
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    /// Uniform in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u64() >> 33) as usize % n
    }

    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Profiles scattered up to `spread_miles` around `center`
///
/// Ids start at `first_id`. Roughly one in ten has no date of birth and one
/// in twenty has no location.
pub fn generate_profiles(seed: u64, first_id: i32, count: usize, center: Coordinates, spread_miles: f64) -> Vec<Profile> {
    let mut rng = Lcg::new(seed);
    let spread_deg = spread_miles / MILES_PER_DEGREE_LAT;

    (0..count)
        .map(|i| {
            let id = first_id + i as i32;
            let location = if rng.chance(0.05) {
                None
            } else {
                Some(Coordinates::new(
                    center.latitude + (rng.next_f64() * 2.0 - 1.0) * spread_deg,
                    center.longitude + (rng.next_f64() * 2.0 - 1.0) * spread_deg,
                ))
            };

            let mut profile = create_test_profile(id, location);

            profile.fitness_level = FitnessLevel::ALL[rng.below(FitnessLevel::ALL.len())];
            profile.has_home_gym = rng.chance(0.3);

            if !rng.chance(0.1) {
                let year = 1970 + rng.below(36) as i32;
                let month = 1 + rng.below(12) as u32;
                let day = 1 + rng.below(28) as u32;
                profile.date_of_birth = NaiveDate::from_ymd_opt(year, month, day);
            }

            let activity_count = rng.below(4);
            for _ in 0..activity_count {
                let name = ACTIVITY_NAMES[rng.below(ACTIVITY_NAMES.len())];
                if !profile.activities.iter().any(|a| a.activity.name == name) {
                    profile.activities.push(activity(name));
                }
            }

            for _ in 0..rng.below(3) {
                let g = FitnessGoal::ALL[rng.below(FitnessGoal::ALL.len())];
                if !profile.goals.iter().any(|pg| pg.goal == g) {
                    profile.goals.push(goal(g));
                }
            }

            for _ in 0..rng.below(5) {
                let day = weekday_from_code(rng.below(7) as i32).unwrap_or(Weekday::Mon);
                let time_slot = TimeSlot::ALL[rng.below(TimeSlot::ALL.len())];
                let mut schedule = slot(day, time_slot);
                schedule.is_available = !rng.chance(0.2);
                profile.schedules.push(schedule);
            }

            profile
        })
        .collect()
}
