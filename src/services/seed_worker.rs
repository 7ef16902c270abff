use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::{
    cache::short_type_name, container::ServiceProvider, environment::HostEnvironment,
    errors::ApiError, Result,
};

/// Startup task populating initial or reference data
#[async_trait]
pub trait DataSeeder: Send + Sync {
    /// Seeders run in ascending order
    fn order(&self) -> i32;

    /// Type name without its module path, e.g. `ProductSeeder`
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Implementations should stop early once `cancel` fires
    async fn seed_all(&self, cancel: &CancellationToken) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedWorkerState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Runs every registered seeder once, in order, before the server accepts traffic.
///
/// Test environments skip seeding entirely; tests seed explicitly instead.
pub struct SeedWorker<S> {
    provider: ServiceProvider<S>,
    state: S,
    environment: HostEnvironment,
    status: SeedWorkerState,
}

impl<S> SeedWorker<S> {
    pub fn new(provider: ServiceProvider<S>, state: S, environment: HostEnvironment) -> Self {
        Self {
            provider,
            state,
            environment,
            status: SeedWorkerState::Idle,
        }
    }

    pub fn status(&self) -> SeedWorkerState {
        self.status
    }

    pub async fn execute(&mut self, cancel: &CancellationToken) -> Result<()> {
        if self.environment.is_test() {
            return Ok(());
        }

        info!("Seed worker started");
        self.status = SeedWorkerState::Running;

        match self.run_seeders(cancel).await {
            Ok(()) => {
                self.status = SeedWorkerState::Completed;
                Ok(())
            }
            Err(err) => {
                self.status = SeedWorkerState::Failed;
                Err(err)
            }
        }
    }

    async fn run_seeders(&self, cancel: &CancellationToken) -> Result<()> {
        let scope = self.provider.create_scope(&self.state);
        let mut seeders = scope.seeders();
        // Stable, ties keep registration order
        seeders.sort_by_key(|seeder| seeder.order());

        for seeder in seeders {
            if cancel.is_cancelled() {
                return Err(ApiError::Cancelled(format!(
                    "seeding stopped before '{}'",
                    seeder.name()
                )));
            }

            info!("Seeding '{}' started...", seeder.name());
            seeder.seed_all(cancel).await?;
            info!("Seeding '{}' ended...", seeder.name());
        }

        Ok(())
    }

    pub fn stop(&self) {
        if !self.environment.is_test() {
            info!("Seed worker stopped");
        }
    }
}
