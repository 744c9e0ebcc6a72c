//! Browser glue: alerts, clipboard, object URLs, scrolling.
//!
//! SYSTEM CONTEXT
//! ==============
//! These helpers centralize hydrate-only `web-sys` calls so components stay
//! free of browser plumbing. Off-browser they are no-ops.

/// Show a blocking alert.
pub fn alert(message: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = message;
    }
}

/// Copy `text` to the system clipboard.
pub fn copy_to_clipboard(text: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(clipboard) = web_sys::window().and_then(|w| w.navigator().clipboard()) else {
            return;
        };
        let promise = clipboard.write_text(text);
        leptos::task::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                leptos::logging::warn!("clipboard write failed: {e:?}");
            }
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = text;
    }
}

/// Wrap PDF bytes in a blob and return an object URL for it.
///
/// # Errors
///
/// Returns an error string when the blob or URL cannot be created.
pub fn pdf_object_url(bytes: &[u8]) -> Result<String, String> {
    #[cfg(feature = "hydrate")]
    {
        let array = js_sys::Uint8Array::from(bytes);
        let parts = js_sys::Array::of1(&array);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/pdf");
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| format!("{e:?}"))?;
        web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = bytes;
        Err("not available on server".to_owned())
    }
}

/// Release an object URL from [`pdf_object_url`].
pub fn revoke_object_url(url: &str) {
    #[cfg(feature = "hydrate")]
    {
        let _ = web_sys::Url::revoke_object_url(url);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = url;
    }
}

/// Smoothly scroll the element with `id` into view.
pub fn scroll_into_view(id: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            return;
        };
        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = id;
    }
}
