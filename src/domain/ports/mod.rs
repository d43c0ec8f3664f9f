//! Collaborator interfaces the use-cases depend on besides storage.

pub mod credentials;
pub mod notifier;

pub use credentials::{Claims, Credentials};
pub use notifier::{Notifier, NotifyError};

#[cfg(test)]
pub use credentials::MockCredentials;
#[cfg(test)]
pub use notifier::MockNotifier;
