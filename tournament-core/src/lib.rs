// contains core functionality

pub mod brackets;
pub mod config;
pub mod domain;
pub mod errors;
pub mod flight_builder;
pub mod heat_generator;
pub mod ports;
pub mod proam_relay;
pub mod request_context;
pub mod schedule_builder;
pub mod scoring;
pub mod utils;
pub mod validator;
pub mod views;

pub use errors::*;
pub use ports::*;
pub use request_context::*;

use std::sync::Arc;

/// Core holds connections to all required ports: the postgres-backed
/// database, the read-view cache, and the background job runner. It is
/// constructed once per process via `CoreBuilder` and cloned (cheaply,
/// via `Arc`) into request handlers.
pub struct Core<S> {
    state: S,
    pub database: Arc<dyn DatabasePort>,
    pub cache: Arc<dyn CachePort>,
    pub jobs: Arc<dyn JobRunnerPort>,
}

impl<S> Core<S> {
    fn switch_state<N>(&self, new_state: N) -> Core<N> {
        Core {
            state: new_state,
            database: self.database.clone(),
            cache: self.cache.clone(),
            jobs: self.jobs.clone(),
        }
    }
}

pub struct InitState {}
pub type CoreState = Arc<Core<InitState>>;

pub struct NoDB {}
pub struct NoCache {}
pub struct NoJobs {}

pub struct DynDB(Arc<dyn DatabasePort>);
pub struct DynCache(Arc<dyn CachePort>);
pub struct DynJobs(Arc<dyn JobRunnerPort>);

pub struct CoreBuilder<DB, C, J> {
    state_db: DB,
    state_cache: C,
    state_jobs: J,
}

impl CoreBuilder<NoDB, NoCache, NoJobs> {
    pub fn new() -> Self {
        CoreBuilder {
            state_db: NoDB {},
            state_cache: NoCache {},
            state_jobs: NoJobs {},
        }
    }
}

impl Default for CoreBuilder<NoDB, NoCache, NoJobs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<DB, C, J> CoreBuilder<DB, C, J> {
    pub fn set_db(self, database: Arc<dyn DatabasePort>) -> CoreBuilder<DynDB, C, J> {
        CoreBuilder {
            state_db: DynDB(database),
            state_cache: self.state_cache,
            state_jobs: self.state_jobs,
        }
    }

    pub fn set_cache(self, cache: Arc<dyn CachePort>) -> CoreBuilder<DB, DynCache, J> {
        CoreBuilder {
            state_db: self.state_db,
            state_cache: DynCache(cache),
            state_jobs: self.state_jobs,
        }
    }

    pub fn set_jobs(self, jobs: Arc<dyn JobRunnerPort>) -> CoreBuilder<DB, C, DynJobs> {
        CoreBuilder {
            state_db: self.state_db,
            state_cache: self.state_cache,
            state_jobs: DynJobs(jobs),
        }
    }
}

impl CoreBuilder<DynDB, DynCache, DynJobs> {
    pub fn build(self) -> Core<InitState> {
        Core {
            state: InitState {},
            database: self.state_db.0,
            cache: self.state_cache.0,
            jobs: self.state_jobs.0,
        }
    }
}
