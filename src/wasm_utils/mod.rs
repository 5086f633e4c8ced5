// Macros to provide `println!(..)`-style syntax for `console.log` logging.
//
// Off wasm (native unit tests) the arguments are still type-checked but nothing
// is printed, since the console bindings only exist in the browser.

#[macro_export]
macro_rules! log {
    ( $( $t:tt )* ) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::log_1(&format!( $( $t )* ).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format_args!( $( $t )* );
    }}
}

#[macro_export]
macro_rules! warn {
    ( $( $t:tt )* ) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!( $( $t )* ).into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = format_args!( $( $t )* );
    }}
}

/// Forward Rust panics to `console.error` when the hook feature is enabled.
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Resolves after `ms` milliseconds of browser time.
#[cfg(all(test, target_arch = "wasm32"))]
pub async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}
