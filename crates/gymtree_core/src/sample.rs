//! Built-in demo workspace and the predefined folder icons.

use crate::config::TreeConfig;
use crate::error::Result;
use crate::tree::{Difficulty, ItemOptions, ItemStatus, TreeStore};

/// Icons offered when creating a folder
pub const FOLDER_ICONS: [&str; 16] = [
    "📁", "📂", "🗂️", "📋", "📊", "💪", "🏃‍♂️", "🏋️‍♂️", "🤸‍♂️", "🧘‍♂️", "⚽", "🏀", "🎯", "🔥",
    "⭐", "💎",
];

fn program(
    description: &str,
    difficulty: Difficulty,
    duration_minutes: u32,
    exercises: u32,
) -> ItemOptions {
    ItemOptions {
        description: Some(description.to_string()),
        status: Some(ItemStatus::Active),
        difficulty: Some(difficulty),
        duration_minutes: Some(duration_minutes),
        exercises: Some(exercises),
        ..Default::default()
    }
}

/// Build the demo tree: three top-level folders, two subfolders under
/// "Forza" and five active programs.
pub fn sample_workspace() -> Result<TreeStore> {
    sample_workspace_with_config(TreeConfig::default())
}

/// [`sample_workspace`] with a custom config
pub fn sample_workspace_with_config(config: TreeConfig) -> Result<TreeStore> {
    let mut store = TreeStore::with_config(config);

    let strength = store.create_folder("Forza", None, Some("💪"))?.id.clone();
    let cardio = store.create_folder("Cardio", None, Some("🏃‍♂️"))?.id.clone();
    let flexibility = store
        .create_folder("Flessibilità", None, Some("🧘‍♂️"))?
        .id
        .clone();

    let upper = store
        .create_folder("Parte Superiore", Some(strength.as_str()), Some("🏋️‍♂️"))?
        .id
        .clone();
    let lower = store
        .create_folder("Parte Inferiore", Some(strength.as_str()), Some("🦵"))?
        .id
        .clone();

    store.create_item(
        "Push Day",
        Some(upper.as_str()),
        program(
            "Allenamento per petto, spalle e tricipiti",
            Difficulty::Intermediate,
            90,
            8,
        ),
    )?;
    store.create_item(
        "Pull Day",
        Some(upper.as_str()),
        program(
            "Allenamento per schiena e bicipiti",
            Difficulty::Intermediate,
            85,
            7,
        ),
    )?;
    store.create_item(
        "Leg Day",
        Some(lower.as_str()),
        program(
            "Allenamento completo per le gambe",
            Difficulty::Advanced,
            100,
            10,
        ),
    )?;
    store.create_item(
        "HIIT Cardio",
        Some(cardio.as_str()),
        program(
            "Allenamento cardio ad alta intensità",
            Difficulty::Intermediate,
            30,
            6,
        ),
    )?;
    store.create_item(
        "Stretching Mattutino",
        Some(flexibility.as_str()),
        program(
            "Routine di stretching per iniziare la giornata",
            Difficulty::Beginner,
            15,
            12,
        ),
    )?;

    log::debug!("Sample workspace created with {} nodes", store.len());
    Ok(store)
}
