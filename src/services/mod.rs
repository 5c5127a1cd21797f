//! Business logic services

pub mod catalog;
pub mod requests;
pub mod users;

use crate::repository::Repository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub catalog: catalog::CatalogService,
    pub requests: requests::RequestsService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            requests: requests::RequestsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone()),
            repository,
        }
    }
}
