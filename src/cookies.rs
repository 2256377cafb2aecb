use wasm_bindgen::JsCast;

/// Key-value persistence for the location consent flow. The browser cookie
/// jar is the production backing; tests substitute an in-memory jar.
pub trait CookieJar {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str, days: u32);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserJar;

fn html_document() -> web_sys::HtmlDocument {
    gloo_utils::document().unchecked_into::<web_sys::HtmlDocument>()
}

impl CookieJar for BrowserJar {
    fn get(&self, name: &str) -> Option<String> {
        let cookies = html_document().cookie().ok()?;
        cookie_value(&cookies, name).map(str::to_owned)
    }

    fn set(&self, name: &str, value: &str, days: u32) {
        let expires = js_sys::Date::new_0();
        expires.set_time(expires.get_time() + f64::from(days) * 86_400_000.0);
        let pair = format!(
            "{}={}; expires={}; path=/",
            name,
            value,
            String::from(expires.to_utc_string())
        );
        if html_document().set_cookie(&pair).is_err() {
            log::warn!("failed to write cookie {}", name);
        }
    }
}

/// Scans a `document.cookie` string for `name=value`. Matches only at an
/// entry boundary, so `name` never matches as a suffix of a longer cookie
/// name. An empty value reads as not-found, so a tampered `city=` entry
/// still re-prompts for consent. Values are returned raw, without any
/// URL-decoding.
pub fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    for entry in cookies.split(';') {
        let entry = entry.strip_prefix(' ').unwrap_or(entry);
        if let Some(rest) = entry.strip_prefix(name) {
            if let Some(value) = rest.strip_prefix('=') {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
    }
    None
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryJar;
    use super::*;

    #[test]
    fn test_set_then_get_round_trip() {
        let jar = MemoryJar::new();
        jar.set("x", "v", 7);
        assert_eq!(jar.get("x").as_deref(), Some("v"));
    }

    #[test]
    fn test_get_missing_returns_none() {
        let jar = MemoryJar::new();
        assert_eq!(jar.get("city"), None);
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let jar = MemoryJar::new();
        jar.set("city", "Lisbon", 7);
        jar.set("city", "Porto", 7);
        assert_eq!(jar.get("city").as_deref(), Some("Porto"));
    }

    #[test]
    fn test_cookie_value_first_entry() {
        assert_eq!(cookie_value("city=Lisbon; lat=51.5", "city"), Some("Lisbon"));
    }

    #[test]
    fn test_cookie_value_later_entry() {
        assert_eq!(cookie_value("lat=51.5; lon=-0.12; city=Lisbon", "city"), Some("Lisbon"));
    }

    #[test]
    fn test_cookie_value_missing() {
        assert_eq!(cookie_value("lat=51.5; lon=-0.12", "city"), None);
    }

    #[test]
    fn test_cookie_value_requires_entry_boundary() {
        // "city" must not match inside "mycity" or "citys".
        assert_eq!(cookie_value("mycity=Oslo", "city"), None);
        assert_eq!(cookie_value("citys=Oslo", "city"), None);
        assert_eq!(cookie_value("mycity=Oslo; city=Lisbon", "city"), Some("Lisbon"));
    }

    #[test]
    fn test_cookie_value_empty_jar() {
        assert_eq!(cookie_value("", "city"), None);
    }

    #[test]
    fn test_cookie_value_empty_value_is_not_found() {
        // A bare `city=` entry must not count as a known location.
        assert_eq!(cookie_value("city=; lat=51.5; lon=-0.12", "city"), None);
        assert_eq!(cookie_value("city=", "city"), None);
        assert_eq!(cookie_value("city=; city=Lisbon", "city"), Some("Lisbon"));
    }

    #[test]
    fn test_cookie_value_keeps_raw_value() {
        // No decoding: whatever was written comes back byte for byte.
        assert_eq!(cookie_value("city=New%20York", "city"), Some("New%20York"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_browser_jar_round_trip() {
        let jar = BrowserJar;
        jar.set("widget-test", "ok", 1);
        assert_eq!(jar.get("widget-test").as_deref(), Some("ok"));
    }
}
