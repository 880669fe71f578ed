//! Interface to a Cordova geofencing plugin through `cordova.exec` for shells running in a
//! Cordova web view.
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use serde_json::{Value, json};
use wasm_bindgen::prelude::*;

use crate::{BridgeCall, NativeBridge, NativeOutcome, completion};

#[wasm_bindgen]
extern "C" {
    /// `cordova.exec(success, error, service, action, args)`
    #[wasm_bindgen(js_namespace = cordova, js_name = exec)]
    fn cordova_exec(success: &JsValue, error: &JsValue, service: &str, action: &str, args: JsValue);

    #[wasm_bindgen(js_namespace = JSON, js_name = parse, catch)]
    fn json_parse(text: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = JSON, js_name = stringify, catch)]
    fn json_stringify(value: &JsValue) -> Result<Option<String>, JsValue>;
}

/// A bridge calling the native plugin through Cordova.
#[derive(Clone, Copy, Debug, Default)]
pub struct CordovaBridge;

impl NativeBridge for CordovaBridge {
    fn exec(&self, call: BridgeCall) -> LocalBoxFuture<'static, NativeOutcome> {
        let args = match to_js(&call.args) {
            Ok(args) => args,
            Err(message) => {
                return future::ready(Err(json!({
                    "code": "nativeFailure",
                    "message": message,
                })))
                .boxed_local();
            }
        };
        let (on_success, completion) = completion();
        let on_error = on_success.clone();
        // Cordova calls exactly one of these. The other one is never freed, but it is small.
        let success = Closure::once_into_js(move |payload: JsValue| {
            on_success.succeed(to_json(&payload));
        });
        let error = Closure::once_into_js(move |payload: JsValue| {
            on_error.fail(to_json(&payload));
        });
        cordova_exec(&success, &error, &call.plugin, call.action.as_str(), args);
        completion.boxed_local()
    }
}

/// Convert the arguments to a JS array.
fn to_js(args: &[Value]) -> Result<JsValue, String> {
    let text = serde_json::to_string(args).map_err(|e| e.to_string())?;
    json_parse(&text).map_err(|e| format!("Failed to build arguments: {e:?}"))
}

/// Convert a value from the plugin to JSON. `undefined` and values JSON can't represent become
/// `null`.
fn to_json(value: &JsValue) -> Value {
    match json_stringify(value) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or(Value::Null),
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::warn!(error = ?e, "Could not convert a value from the native plugin");
            Value::Null
        }
    }
}
