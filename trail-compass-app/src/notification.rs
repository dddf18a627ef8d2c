use anyhow::bail;
use log::warn;
use tauri::{AppHandle, plugin::PermissionState};
use tauri_plugin_notification::NotificationExt;
use trail_compass_logic::{PushRegistrar, prelude::*};

/// Push project, baked in at build time
const PROJECT_ID: Option<&str> = option_env!("TRAIL_COMPASS_PROJECT_ID");

pub struct TauriPushRegistrar(AppHandle);

impl TauriPushRegistrar {
    pub fn new(app: AppHandle) -> Self {
        Self(app)
    }
}

impl PushRegistrar for TauriPushRegistrar {
    #[cfg(target_os = "android")]
    fn create_default_channel(&self) -> Result {
        use tauri_plugin_notification::{Channel, Importance};

        // High is the top importance the plugin exposes
        let channel = Channel::builder("default", "default")
            .importance(Importance::High)
            .vibration(true)
            .lights(true)
            .light_color("#FF231F7C")
            .build();
        self.0
            .notification()
            .create_channel(channel)
            .context("Failed to create default notification channel")
    }

    #[cfg(not(target_os = "android"))]
    fn create_default_channel(&self) -> Result {
        Ok(())
    }

    fn is_physical_device(&self) -> bool {
        cfg!(mobile)
    }

    async fn permission_granted(&self) -> bool {
        match self.0.notification().permission_state() {
            Ok(state) => matches!(state, PermissionState::Granted),
            Err(why) => {
                warn!("Failed to check notification permission: {why:?}");
                false
            }
        }
    }

    async fn request_permission(&self) -> bool {
        match self.0.notification().request_permission() {
            Ok(state) => matches!(state, PermissionState::Granted),
            Err(why) => {
                warn!("Failed to request notification permission: {why:?}");
                false
            }
        }
    }

    fn project_id(&self) -> Option<String> {
        PROJECT_ID.map(str::to_string)
    }

    async fn fetch_token(&self, project_id: &str) -> Result<String> {
        // tauri-plugin-notification only does local notifications
        bail!("No push token provider available for project {project_id}")
    }
}
