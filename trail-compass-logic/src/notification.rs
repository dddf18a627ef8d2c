use std::sync::OnceLock;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::{CompassError, Permission},
    prelude::*,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, specta::Type)]
/// How a notification that arrives while the app is in the foreground is presented
pub struct NotificationBehavior {
    pub should_show_alert: bool,
    pub should_play_sound: bool,
    pub should_set_badge: bool,
}

impl Default for NotificationBehavior {
    fn default() -> Self {
        Self {
            should_show_alert: true,
            should_play_sound: true,
            should_set_badge: false,
        }
    }
}

static NOTIFICATION_BEHAVIOR: OnceLock<NotificationBehavior> = OnceLock::new();

/// Set the process-wide foreground notification behavior.
///
/// Must run once at startup before any notification is shown. Calling again is harmless, the first
/// value stays and is returned.
pub fn install_notification_handler(behavior: NotificationBehavior) -> NotificationBehavior {
    *NOTIFICATION_BEHAVIOR.get_or_init(|| behavior)
}

/// The installed behavior, or the default if nothing has been installed yet
pub fn notification_behavior() -> NotificationBehavior {
    NOTIFICATION_BEHAVIOR.get().copied().unwrap_or_default()
}

/// Platform side of push registration
pub trait PushRegistrar: Send + Sync {
    /// Set up the "default" notification channel, a no-op on platforms without channels
    fn create_default_channel(&self) -> Result;
    /// Emulators and simulators can't receive push notifications
    fn is_physical_device(&self) -> bool;
    fn permission_granted(&self) -> impl Future<Output = bool> + Send;
    /// Prompt the user, returns whether permission is now granted
    fn request_permission(&self) -> impl Future<Output = bool> + Send;
    /// Project the push token is issued for, `None` if the build isn't configured with one
    fn project_id(&self) -> Option<String>;
    fn fetch_token(&self, project_id: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Make sure notifications are allowed, prompting the user if they haven't decided yet
pub async fn ensure_notification_permission(
    registrar: &impl PushRegistrar,
) -> Result<(), CompassError> {
    if registrar.permission_granted().await || registrar.request_permission().await {
        Ok(())
    } else {
        Err(CompassError::PermissionDenied(Permission::Notifications))
    }
}

/// Get a push token for this device, `None` if anything along the way fails
pub async fn register_for_push_notifications(registrar: &impl PushRegistrar) -> Option<String> {
    if let Err(why) = registrar.create_default_channel() {
        warn!("Failed to create notification channel: {why:?}");
    }

    if !registrar.is_physical_device() {
        warn!("Must use physical device for push notifications");
        return None;
    }

    if let Err(err) = ensure_notification_permission(registrar).await {
        warn!("Failed to get push token for push notification: {err}");
        return None;
    }

    let Some(project_id) = registrar.project_id() else {
        warn!("No push project id configured");
        return None;
    };

    match registrar.fetch_token(&project_id).await {
        Ok(token) => {
            info!("Push token: {token}");
            Some(token)
        }
        Err(why) => {
            warn!("Failed to fetch push token: {why:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::MockRegistrar;
    use tokio::test;

    #[test]
    async fn test_register_happy() {
        let reg = MockRegistrar::default();
        assert_eq!(
            register_for_push_notifications(&reg).await.as_deref(),
            Some("token-for-trail-compass")
        );
        assert_eq!(reg.prompts(), 0);
        assert_eq!(reg.channels(), 1);
    }

    #[test]
    async fn test_register_prompts() {
        let reg = MockRegistrar {
            granted: false,
            grant_on_request: true,
            ..Default::default()
        };
        assert!(register_for_push_notifications(&reg).await.is_some());
        assert_eq!(reg.prompts(), 1);
    }

    #[test]
    async fn test_register_denied() {
        let reg = MockRegistrar {
            granted: false,
            grant_on_request: false,
            ..Default::default()
        };
        assert_eq!(register_for_push_notifications(&reg).await, None);
    }

    #[test]
    async fn test_permission_denied_error() {
        let reg = MockRegistrar {
            granted: false,
            grant_on_request: false,
            ..Default::default()
        };
        assert_eq!(
            ensure_notification_permission(&reg).await,
            Err(CompassError::PermissionDenied(Permission::Notifications))
        );
        assert_eq!(reg.prompts(), 1);
        assert!(ensure_notification_permission(&MockRegistrar::default()).await.is_ok());
    }

    #[test]
    async fn test_register_emulator() {
        let reg = MockRegistrar {
            physical: false,
            ..Default::default()
        };
        assert_eq!(register_for_push_notifications(&reg).await, None);
        assert_eq!(reg.prompts(), 0);
        assert_eq!(reg.channels(), 1);
    }

    #[test]
    async fn test_register_channel_failure() {
        let reg = MockRegistrar {
            channel_fails: true,
            ..Default::default()
        };
        assert!(register_for_push_notifications(&reg).await.is_some());
    }

    #[test]
    async fn test_register_no_project() {
        let reg = MockRegistrar {
            project_id: None,
            ..Default::default()
        };
        assert_eq!(register_for_push_notifications(&reg).await, None);
    }

    #[test]
    async fn test_register_token_failure() {
        let reg = MockRegistrar {
            token_fails: true,
            ..Default::default()
        };
        assert_eq!(register_for_push_notifications(&reg).await, None);
    }

    #[test]
    async fn test_install_idempotent() {
        let first = NotificationBehavior {
            should_set_badge: true,
            ..Default::default()
        };
        let installed = install_notification_handler(first);
        assert_eq!(installed, first);
        let again = install_notification_handler(NotificationBehavior::default());
        assert_eq!(again, first);
        assert_eq!(notification_behavior(), first);
    }
}
