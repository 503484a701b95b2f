use tracing::{debug, info};

use crate::config::LogoutConfig;
use crate::error::LogoutError;

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Anything other than "loading" or "interactive" reads as complete.
    pub fn parse(state: &str) -> Self {
        match state {
            "loading" => Self::Loading,
            "interactive" => Self::Interactive,
            _ => Self::Complete,
        }
    }

    /// Mounting has to wait for DOMContentLoaded.
    pub fn must_defer(self) -> bool {
        self == Self::Loading
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountDecision {
    Mounted,
    AlreadyPresent,
}

/// Page surface the button is inserted into.
pub trait ControlHost {
    fn has_control(&self, id: &str) -> Result<bool, LogoutError>;

    /// Create the button described by `config` and wire its click handler.
    fn insert_control(&self, config: &LogoutConfig) -> Result<(), LogoutError>;
}

/// Insert the logout button unless one with the same id is already there.
pub fn mount<H: ControlHost + ?Sized>(
    host: &H,
    config: &LogoutConfig,
) -> Result<MountDecision, LogoutError> {
    if host.has_control(&config.button_id)? {
        debug!(id = %config.button_id, "logout button already mounted");
        return Ok(MountDecision::AlreadyPresent);
    }
    host.insert_control(config)?;
    info!(id = %config.button_id, "logout button mounted");
    Ok(MountDecision::Mounted)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct FakePage {
        ids: RefCell<Vec<String>>,
        broken: bool,
    }

    impl ControlHost for FakePage {
        fn has_control(&self, id: &str) -> Result<bool, LogoutError> {
            Ok(self.ids.borrow().iter().any(|i| i == id))
        }

        fn insert_control(&self, config: &LogoutConfig) -> Result<(), LogoutError> {
            if self.broken {
                return Err(LogoutError::Dom("document has no body".into()));
            }
            self.ids.borrow_mut().push(config.button_id.clone());
            Ok(())
        }
    }

    #[test]
    fn test_mount_twice_keeps_one_control() {
        let page = FakePage::default();
        let config = LogoutConfig::default();
        assert_eq!(mount(&page, &config).unwrap(), MountDecision::Mounted);
        assert_eq!(mount(&page, &config).unwrap(), MountDecision::AlreadyPresent);
        assert_eq!(*page.ids.borrow(), vec!["swagger-keycloak-logout".to_string()]);
    }

    #[test]
    fn test_mount_error_propagates() {
        let page = FakePage {
            broken: true,
            ..Default::default()
        };
        assert!(matches!(
            mount(&page, &LogoutConfig::default()),
            Err(LogoutError::Dom(_))
        ));
    }

    #[test]
    fn test_ready_state() {
        assert!(ReadyState::parse("loading").must_defer());
        assert!(!ReadyState::parse("interactive").must_defer());
        assert_eq!(ReadyState::parse("complete"), ReadyState::Complete);
        assert_eq!(ReadyState::parse(""), ReadyState::Complete);
    }
}
