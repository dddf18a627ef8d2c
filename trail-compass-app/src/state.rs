use std::{marker::PhantomData, sync::Arc};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, MessageDialogKind};
use tauri_specta::Event;
use tokio::sync::{RwLock, mpsc};
use trail_compass_logic::{
    Compass as BaseCompass, CompassError, CompassUiState, MapState, MapType, Pin, PinListItem,
    StateUpdateSender, coordinate_pair, pin_share_text,
};

use crate::{Result, location::TauriLocation, store::TauriStore};

/// The compass heading, position, or pin count has changed
#[derive(Serialize, Deserialize, Clone, Default, Debug, specta::Type, tauri_specta::Event)]
pub struct CompassStateUpdate;

/// The list of saved pins has changed
#[derive(Serialize, Deserialize, Clone, Default, Debug, specta::Type, tauri_specta::Event)]
pub struct PinsUpdate;

/// The app is changing screens, contains the screen it's switching to
#[derive(Serialize, Deserialize, Clone, Debug, specta::Type, tauri_specta::Event)]
pub struct ChangeScreen(AppScreen);

pub struct TauriStateUpdateSender<E: Clone + Default + Event + Serialize>(
    AppHandle,
    PhantomData<E>,
);

impl<E: Serialize + Clone + Default + Event> TauriStateUpdateSender<E> {
    pub fn new(app: &AppHandle) -> Self {
        Self(app.clone(), PhantomData)
    }
}

impl<E: Serialize + Clone + Default + Event + Send + Sync> StateUpdateSender
    for TauriStateUpdateSender<E>
{
    fn send_update(&self) {
        if let Err(why) = E::default().emit(&self.0) {
            error!("Error sending state update to UI: {why:?}");
        }
    }
}

pub type Compass =
    BaseCompass<TauriLocation, TauriStore<tauri::Wry>, TauriStateUpdateSender<CompassStateUpdate>>;

#[derive(Serialize, Deserialize, specta::Type, Debug, Clone, Copy, Eq, PartialEq)]
pub enum AppScreen {
    Compass,
    Map,
    Pins,
}

#[derive(Serialize, Deserialize, specta::Type, Debug, Clone, PartialEq)]
/// What the map screen shows around the (frontend drawn) map
pub struct MapScreenState {
    pub map: MapState,
    pub badge: String,
    pub pin_count: u32,
}

pub struct AppState {
    screen: AppScreen,
    compass: Arc<Compass>,
    location: TauriLocation,
    heading_watch: Option<u32>,
    map: MapState,
}

pub type AppStateHandle = RwLock<AppState>;

fn error_dialog(app: &AppHandle, msg: &str) {
    app.dialog()
        .message(msg)
        .kind(MessageDialogKind::Error)
        .show(|_| {});
}

/// Turn a compass error into a message for the UI, warning loudly if pins may be lost
fn surface_error(app: &AppHandle, err: CompassError) -> String {
    if err == CompassError::StorageWriteFailure {
        error_dialog(
            app,
            "Couldn't save your pins, changes will be lost when the app closes",
        );
    }
    err.to_string()
}

impl AppState {
    pub fn new(app: &AppHandle, compass: Compass) -> Self {
        Self {
            screen: AppScreen::Compass,
            compass: Arc::new(compass),
            location: TauriLocation::new(app.clone()),
            heading_watch: None,
            map: MapState::default(),
        }
    }

    pub fn screen(&self) -> AppScreen {
        self.screen
    }

    pub fn compass(&self) -> Arc<Compass> {
        self.compass.clone()
    }

    fn emit_screen_change(app: &AppHandle, screen: AppScreen) {
        if let Err(why) = ChangeScreen(screen).emit(app) {
            warn!("Error emitting screen change: {why:?}");
        }
    }

    fn emit_pins_update(app: &AppHandle) {
        if let Err(why) = PinsUpdate.emit(app) {
            warn!("Error emitting pins update: {why:?}");
        }
    }

    pub fn go_to_screen(&mut self, app: &AppHandle, screen: AppScreen) {
        if self.screen == screen {
            return;
        }
        if self.screen == AppScreen::Compass {
            self.stop_compass();
        }
        self.screen = screen;
        Self::emit_screen_change(app, screen);
    }

    /// Get permission, take a fix, and start following the heading.
    ///
    /// The permission prompt and first fix can take a while, so the state lock is only taken
    /// around the bookkeeping, other commands keep working in the meantime.
    pub async fn start_compass(
        state: &AppStateHandle,
        app: &AppHandle,
    ) -> Result<CompassUiState> {
        let compass = state.read().await.compass();
        compass
            .start()
            .await
            .map_err(|err| surface_error(app, err))?;

        let mut state = state.write().await;
        // The user may have left the screen while we waited
        if state.screen == AppScreen::Compass {
            state.watch_heading();
        }
        drop(state);

        Ok(compass.ui_state().await)
    }

    fn watch_heading(&mut self) {
        if self.heading_watch.is_some() {
            return;
        }

        // One follower per watch so readings land in the order the device sent them
        let (tx, rx) = mpsc::unbounded_channel();
        self.heading_watch = self.location.watch_heading(move |reading| {
            tx.send(reading).ok();
        });

        if let Some(id) = self.heading_watch {
            let compass = self.compass.clone();
            tauri::async_runtime::spawn(async move {
                compass.follow_headings(rx).await;
            });
            info!("Started heading watch {id}");
        }
    }

    pub fn stop_compass(&mut self) {
        if let Some(id) = self.heading_watch.take() {
            self.location.clear_watch(id);
            info!("Stopped heading watch {id}");
        }
    }

    pub async fn drop_pin(&self, app: &AppHandle) -> Result<Pin> {
        let res = self.compass.drop_pin().await;
        Self::emit_pins_update(app);
        res.map_err(|err| surface_error(app, err))
    }

    pub async fn list_pins(&self) -> Vec<PinListItem> {
        self.compass
            .pin_book()
            .pins()
            .await
            .iter()
            .map(PinListItem::from)
            .collect()
    }

    async fn get_pin(&self, id: &str) -> Result<Pin> {
        self.compass
            .pin_book()
            .get(id)
            .await
            .ok_or_else(|| format!("No pin with id {id}"))
    }

    pub async fn pin_copy_text(&self, id: &str) -> Result<String> {
        let pin = self.get_pin(id).await?;
        Ok(coordinate_pair(pin.lat, pin.lon))
    }

    pub async fn pin_share_text(&self, id: &str) -> Result<String> {
        Ok(pin_share_text(&self.get_pin(id).await?))
    }

    pub async fn delete_pin(&self, app: &AppHandle, id: &str) -> Result<bool> {
        let res = self.compass.pin_book().remove(id).await;
        Self::emit_pins_update(app);
        res.map_err(|err| surface_error(app, err))
    }

    pub async fn clear_pins(&self, app: &AppHandle) -> Result {
        let res = self.compass.pin_book().clear().await;
        Self::emit_pins_update(app);
        res.map_err(|err| surface_error(app, err))
    }

    pub async fn map_state(&self) -> MapScreenState {
        MapScreenState {
            badge: self.map.badge_text(),
            map: self.map.clone(),
            pin_count: self.compass.pin_book().len().await as u32,
        }
    }

    /// Take a fresh fix and center the map on it, without holding the state lock while locating
    pub async fn center_map_on_me(
        state: &AppStateHandle,
        app: &AppHandle,
    ) -> Result<MapScreenState> {
        let compass = state.read().await.compass();
        let fix = compass
            .refresh_fix()
            .await
            .map_err(|err| surface_error(app, err))?;

        let mut state = state.write().await;
        state.map.center_on(fix);
        Ok(state.map_state().await)
    }

    pub fn toggle_map_type(&mut self) -> MapType {
        self.map.toggle_map_type()
    }
}
