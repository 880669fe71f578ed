pub mod geofence_app;

use std::sync::LazyLock;

pub use crux_core::{Core, Request, bridge::Bridge};
pub use crux_geofencing::{GeofenceOperation, GeofenceResponse};
pub use geofence_app::*;
use wasm_bindgen::prelude::wasm_bindgen;

uniffi::include_scaffolding!("shared");

static CORE: LazyLock<Bridge<GeofenceApp>> = LazyLock::new(|| Bridge::new(Core::new()));

#[wasm_bindgen]
pub fn process_event(data: &[u8]) -> Vec<u8> {
    CORE.process_event(data)
        .expect("The shell sent an event which couldn't be deserialized.")
}

#[wasm_bindgen]
pub fn handle_response(id: u32, data: &[u8]) -> Vec<u8> {
    CORE.handle_response(id, data)
        .expect("The shell sent a response which couldn't be deserialized.")
}

#[wasm_bindgen]
pub fn view() -> Vec<u8> {
    CORE.view().expect("Failed to serialize the view model.")
}
