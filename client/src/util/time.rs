//! Clock and calendar helpers.
//!
//! Browser builds read the local clock through `js_sys::Date`; native builds
//! (SSR, tests) fall back to fixed values so state code stays deterministic.

#[cfg(test)]
#[path = "time_test.rs"]
mod time_test;

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> f64 {
    #[cfg(feature = "hydrate")]
    {
        js_sys::Date::now()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        0.0
    }
}

/// 12-hour clock label, e.g. `"1:05 PM"`.
pub fn clock_label(hours: u32, minutes: u32) -> String {
    let suffix = if hours < 12 { "AM" } else { "PM" };
    let hour = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour}:{minutes:02} {suffix}")
}

/// Local `h:mm AM/PM` label for an epoch-millisecond timestamp.
pub fn format_clock(timestamp_ms: f64) -> String {
    #[cfg(feature = "hydrate")]
    {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(timestamp_ms));
        clock_label(date.get_hours(), date.get_minutes())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = timestamp_ms;
        clock_label(0, 0)
    }
}

/// Parse an ISO-8601 timestamp into epoch milliseconds.
pub fn parse_timestamp_ms(text: &str) -> Option<f64> {
    #[cfg(feature = "hydrate")]
    {
        let ms = js_sys::Date::parse(text);
        (!ms.is_nan()).then_some(ms)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = text;
        None
    }
}

/// `YYYY-MM-DD` from calendar parts (`month` is 1-based).
pub fn iso_date(year: u32, month: u32, day: u32) -> String {
    format!("{year:04}-{month:02}-{day:02}")
}

/// Today's local date as `YYYY-MM-DD`.
pub fn today_iso() -> String {
    #[cfg(feature = "hydrate")]
    {
        let date = js_sys::Date::new_0();
        iso_date(date.get_full_year(), date.get_month() + 1, date.get_date())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        iso_date(1970, 1, 1)
    }
}

/// Date part of a backend timestamp (`"2024-01-02T10:30:00"` -> `"2024-01-02"`).
pub fn display_date(timestamp: &str) -> &str {
    timestamp
        .get(..10)
        .filter(|date| date.as_bytes().iter().all(|b| b.is_ascii_digit() || *b == b'-'))
        .unwrap_or(timestamp)
}
