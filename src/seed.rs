use tracing::info;

use crate::models::Activity;
use crate::store::{ActivityStore, StoreError};

/// (name, description, schedule, max_participants, participants)
const INITIAL_ACTIVITIES: &[(&str, &str, &str, u32, &[&str])] = &[
    (
        "Chess Club",
        "Learn strategies and compete in chess tournaments",
        "Fridays, 3:30 PM - 5:00 PM",
        12,
        &["michael@mergington.edu", "daniel@mergington.edu"],
    ),
    (
        "Programming Class",
        "Learn programming fundamentals and build software projects",
        "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
        20,
        &["emma@mergington.edu", "sophia@mergington.edu"],
    ),
    (
        "Gym Class",
        "Physical education and sports activities",
        "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
        30,
        &["john@mergington.edu", "olivia@mergington.edu"],
    ),
    // Sports
    (
        "Soccer Team",
        "Join the school soccer team and compete in matches",
        "Wednesdays, 4:00 PM - 5:30 PM",
        18,
        &["lucas@mergington.edu", "mia@mergington.edu"],
    ),
    (
        "Basketball Club",
        "Practice basketball skills and play friendly games",
        "Thursdays, 3:30 PM - 5:00 PM",
        15,
        &["ethan@mergington.edu", "ava@mergington.edu"],
    ),
    // Arts
    (
        "Art Workshop",
        "Explore painting, drawing, and sculpture techniques",
        "Mondays, 3:30 PM - 5:00 PM",
        16,
        &["isabella@mergington.edu", "liam@mergington.edu"],
    ),
    (
        "Drama Club",
        "Act, direct, and produce school plays and performances",
        "Fridays, 4:00 PM - 5:30 PM",
        20,
        &["noah@mergington.edu", "amelia@mergington.edu"],
    ),
    // Academic
    (
        "Math Olympiad",
        "Prepare for math competitions and solve challenging problems",
        "Tuesdays, 4:00 PM - 5:00 PM",
        10,
        &["oliver@mergington.edu", "charlotte@mergington.edu"],
    ),
    (
        "Science Club",
        "Conduct experiments and explore scientific concepts",
        "Thursdays, 4:00 PM - 5:00 PM",
        14,
        &["benjamin@mergington.edu", "ella@mergington.edu"],
    ),
];

pub fn initial_activities() -> Vec<Activity> {
    INITIAL_ACTIVITIES
        .iter()
        .map(
            |&(name, description, schedule, max_participants, participants)| Activity {
                name: name.to_string(),
                description: description.to_string(),
                schedule: schedule.to_string(),
                max_participants,
                participants: participants.iter().map(|p| p.to_string()).collect(),
            },
        )
        .collect()
}

/// Insert the initial activities when the store holds no documents at all.
/// A store with any document is left untouched, so edits to the seed data
/// only reach fresh stores. Returns the number of documents inserted.
pub async fn seed_if_empty(store: &ActivityStore) -> Result<usize, StoreError> {
    if store.count().await != 0 {
        info!("Activity store already populated, skipping seed");
        return Ok(0);
    }
    let activities = initial_activities();
    let n = activities.len();
    for activity in activities {
        store.insert(activity).await?;
    }
    info!("Database initialized with activity data ({} activities)", n);
    Ok(n)
}
