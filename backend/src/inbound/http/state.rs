//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they can be tested with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{UserCommand, UserQuery};

/// Dependency bundle for the user handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Create, update, and delete.
    pub users: Arc<dyn UserCommand>,
    /// Lookup by id.
    pub users_query: Arc<dyn UserQuery>,
}

impl HttpState {
    /// Build state from separate command and query ports.
    pub fn new(users: Arc<dyn UserCommand>, users_query: Arc<dyn UserQuery>) -> Self {
        Self { users, users_query }
    }

    /// Build state from one service implementing both ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use user_registry::domain::{UserService, UserServicePolicy};
    /// use user_registry::inbound::http::state::HttpState;
    /// use user_registry::outbound::memory::InMemoryUserRepository;
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     UserServicePolicy::default(),
    /// );
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: UserCommand + UserQuery + 'static,
    {
        Self {
            users: service.clone(),
            users_query: service,
        }
    }
}
