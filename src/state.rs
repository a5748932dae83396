use std::sync::Arc;

use sqlx::PgPool;

use crate::application::services::{
    LoanService, MembershipService, PublicationService, UserService,
};
use crate::domain::clock::Clock;
use crate::domain::repositories::{
    LoanRepository, MembershipRepository, PublicationRepository, UserRepository,
};
use crate::infrastructure::memory::{
    InMemoryLoanRepository, InMemoryMembershipRepository, InMemoryPublicationRepository,
    InMemoryUserRepository, MemoryStore,
};
use crate::infrastructure::persistence::{
    PgLoanRepository, PgMembershipRepository, PgPublicationRepository, PgUserRepository,
};

/// Shared application state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub publication_service: Arc<PublicationService>,
    pub membership_service: Arc<MembershipService>,
    pub loan_service: Arc<LoanService>,
    pub clock: Arc<dyn Clock>,
    /// Name of the storage backend, reported by the health check.
    pub storage: &'static str,
}

/// One repository of each kind, all backed by the same storage.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub publications: Arc<dyn PublicationRepository>,
    pub memberships: Arc<dyn MembershipRepository>,
    pub loans: Arc<dyn LoanRepository>,
}

impl Repositories {
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            publications: Arc::new(PgPublicationRepository::new(pool.clone())),
            memberships: Arc::new(PgMembershipRepository::new(pool.clone())),
            loans: Arc::new(PgLoanRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            publications: Arc::new(InMemoryPublicationRepository::new(store.clone())),
            memberships: Arc::new(InMemoryMembershipRepository::new(store.clone())),
            loans: Arc::new(InMemoryLoanRepository::new(store)),
        }
    }
}

impl AppState {
    /// Wires the services over `repositories`.
    pub fn new(repositories: Repositories, clock: Arc<dyn Clock>, storage: &'static str) -> Self {
        let Repositories {
            users,
            publications,
            memberships,
            loans,
        } = repositories;

        Self {
            user_service: Arc::new(UserService::new(users.clone())),
            publication_service: Arc::new(PublicationService::new(
                publications.clone(),
                clock.clone(),
            )),
            membership_service: Arc::new(MembershipService::new(
                users.clone(),
                memberships.clone(),
                clock.clone(),
            )),
            loan_service: Arc::new(LoanService::new(
                users,
                publications,
                memberships,
                loans,
                clock.clone(),
            )),
            clock,
            storage,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(Repositories::in_memory(), clock, "memory")
    }
}
