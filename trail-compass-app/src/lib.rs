mod location;
mod notification;
mod state;
mod store;

use log::{LevelFilter, info};
use tauri::{AppHandle, Manager, State};
use tauri_specta::{ErrorHandlingMode, collect_commands, collect_events};
use tokio::sync::RwLock;
use trail_compass_logic::{
    CompassUiState, MapType, NotificationBehavior, Pin, PinListItem,
    install_notification_handler, notification_behavior, register_for_push_notifications,
};

use std::result::Result as StdResult;

use crate::{
    location::TauriLocation,
    notification::TauriPushRegistrar,
    state::{
        AppScreen, AppState, AppStateHandle, ChangeScreen, Compass, CompassStateUpdate,
        MapScreenState, PinsUpdate, TauriStateUpdateSender,
    },
    store::TauriStore,
};

type Result<T = (), E = String> = StdResult<T, E>;

// == GENERAL / FLOW COMMANDS ==

#[tauri::command]
#[specta::specta]
/// Get the screen the app should currently be on, returns [AppScreen]
async fn get_current_screen(state: State<'_, AppStateHandle>) -> Result<AppScreen> {
    Ok(state.read().await.screen())
}

#[tauri::command]
#[specta::specta]
/// Navigate to another screen, leaving the compass screen stops the heading watch
async fn go_to_screen(
    screen: AppScreen,
    app: AppHandle,
    state: State<'_, AppStateHandle>,
) -> Result {
    state.write().await.go_to_screen(&app, screen);
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// Get how notifications should be presented while the app is in the foreground
fn get_notification_behavior() -> NotificationBehavior {
    notification_behavior()
}

// == AppScreen::Compass COMMANDS ==

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Ask for location permission, take a fix, and start following the heading.
/// Errors are messages to show the user, saved pins stay usable either way.
async fn start_compass(
    app: AppHandle,
    state: State<'_, AppStateHandle>,
) -> Result<CompassUiState> {
    AppState::start_compass(&state, &app).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Stop following the heading
async fn stop_compass(state: State<'_, AppStateHandle>) -> Result {
    state.write().await.stop_compass();
    Ok(())
}

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Get the current heading, position, and gradient, call after receiving a
/// [CompassStateUpdate]
async fn get_compass_state(state: State<'_, AppStateHandle>) -> Result<CompassUiState> {
    let compass = state.read().await.compass();
    Ok(compass.ui_state().await)
}

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Save a pin at the current position, fails with "No GPS fix yet" before the
/// first fix
async fn drop_pin(app: AppHandle, state: State<'_, AppStateHandle>) -> Result<Pin> {
    state.read().await.drop_pin(&app).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Text to put on the clipboard, `null` without a fix
async fn get_compass_copy_text(state: State<'_, AppStateHandle>) -> Result<Option<String>> {
    let compass = state.read().await.compass();
    Ok(compass.copy_text().await)
}

#[tauri::command]
#[specta::specta]
/// (Screen: Compass) Message for the share sheet, `null` without a fix
async fn get_compass_share_text(state: State<'_, AppStateHandle>) -> Result<Option<String>> {
    let compass = state.read().await.compass();
    Ok(compass.share_text().await)
}

// == AppScreen::Pins COMMANDS ==

#[tauri::command]
#[specta::specta]
/// (Screen: Pins) Get all saved pins, newest first
async fn list_pins(state: State<'_, AppStateHandle>) -> Result<Vec<PinListItem>> {
    Ok(state.read().await.list_pins().await)
}

#[tauri::command]
#[specta::specta]
/// (Screen: Pins) Coordinates of a pin for the clipboard
async fn get_pin_copy_text(id: String, state: State<'_, AppStateHandle>) -> Result<String> {
    state.read().await.pin_copy_text(&id).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Pins) Message for the share sheet describing a pin
async fn get_pin_share_text(id: String, state: State<'_, AppStateHandle>) -> Result<String> {
    state.read().await.pin_share_text(&id).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Pins) Delete a pin, returns whether it existed. Triggers a [PinsUpdate].
async fn delete_pin(
    id: String,
    app: AppHandle,
    state: State<'_, AppStateHandle>,
) -> Result<bool> {
    state.read().await.delete_pin(&app, &id).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Pins, Map) Delete every pin. Triggers a [PinsUpdate].
async fn clear_pins(app: AppHandle, state: State<'_, AppStateHandle>) -> Result {
    state.read().await.clear_pins(&app).await
}

// == AppScreen::Map COMMANDS ==

#[tauri::command]
#[specta::specta]
/// (Screen: Map) Get the camera region, map type, and location badge
async fn get_map_state(state: State<'_, AppStateHandle>) -> Result<MapScreenState> {
    Ok(state.read().await.map_state().await)
}

#[tauri::command]
#[specta::specta]
/// (Screen: Map) Take a fresh fix and move the camera onto it
async fn center_map_on_me(
    app: AppHandle,
    state: State<'_, AppStateHandle>,
) -> Result<MapScreenState> {
    AppState::center_map_on_me(&state, &app).await
}

#[tauri::command]
#[specta::specta]
/// (Screen: Map) Switch between standard and satellite, returns the new type
async fn toggle_map_type(state: State<'_, AppStateHandle>) -> Result<MapType> {
    Ok(state.write().await.toggle_map_type())
}

pub fn mk_specta() -> tauri_specta::Builder {
    tauri_specta::Builder::<tauri::Wry>::new()
        .error_handling(ErrorHandlingMode::Throw)
        .commands(collect_commands![
            get_current_screen,
            go_to_screen,
            get_notification_behavior,
            start_compass,
            stop_compass,
            get_compass_state,
            drop_pin,
            get_compass_copy_text,
            get_compass_share_text,
            list_pins,
            get_pin_copy_text,
            get_pin_share_text,
            delete_pin,
            clear_pins,
            get_map_state,
            center_map_on_me,
            toggle_map_type,
        ])
        .events(collect_events![ChangeScreen, CompassStateUpdate, PinsUpdate])
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let builder = mk_specta();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_notification::init())
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(LevelFilter::Debug)
                .build(),
        )
        .plugin(tauri_plugin_geolocation::init())
        .plugin(tauri_plugin_store::Builder::default().build())
        .invoke_handler(builder.invoke_handler())
        .setup(move |app| {
            builder.mount_events(app);

            install_notification_handler(NotificationBehavior::default());

            let handle = app.handle().clone();
            let compass = tauri::async_runtime::block_on(Compass::new(
                TauriLocation::new(handle.clone()),
                TauriStore::new(handle.clone()),
                TauriStateUpdateSender::new(&handle),
            ));
            app.manage::<AppStateHandle>(RwLock::new(AppState::new(&handle, compass)));

            tauri::async_runtime::spawn(async move {
                let registrar = TauriPushRegistrar::new(handle);
                if register_for_push_notifications(&registrar).await.is_none() {
                    info!("Continuing without push notifications");
                }
            });
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
