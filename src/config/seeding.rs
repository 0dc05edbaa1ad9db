use anyhow::Result;
use std::sync::Arc;

use crate::store::ExerciseStore;

/// Muscle groups every deployment starts with.
pub const DEFAULT_GROUPS: &[&str] = &[
    "Arms",
    "Back",
    "Chest",
    "Core",
    "Legs",
    "Shoulders",
    "Full body",
];

pub struct DatabaseSeeder {
    store: Arc<dyn ExerciseStore>,
}

impl DatabaseSeeder {
    pub fn new(store: Arc<dyn ExerciseStore>) -> Self {
        Self { store }
    }

    /// Safe to run repeatedly; existing groups are left untouched.
    pub async fn seed_all(&self) -> Result<()> {
        tracing::info!("Starting database seeding...");

        self.seed_groups().await?;

        tracing::info!("Database seeding completed!");
        Ok(())
    }

    async fn seed_groups(&self) -> Result<()> {
        for name in DEFAULT_GROUPS {
            let group = self.store.ensure_group(name).await?;
            tracing::debug!(group_id = group.id, name = %group.name, "Seeded group");
        }
        Ok(())
    }
}
