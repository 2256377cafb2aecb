use std::cell::RefCell;
use std::rc::Rc;

use futures::channel::oneshot;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::api::{ApiClient, ApiError};
use crate::cookies::CookieJar;
use crate::types::{Coordinates, SavedLocation};

pub const CITY_COOKIE: &str = "city";
pub const LAT_COOKIE: &str = "lat";
pub const LON_COOKIE: &str = "lon";

const COOKIE_DAYS: u32 = 7;

/// Consent state for location access.
///
/// `Unknown` only exists before the cookie jar has been inspected on load.
/// There is no persisted "denied" state: skipping leaves the cookies absent
/// and the flow re-enterable through the change-location card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Unknown,
    Prompting,
    Granted,
    Deferred,
}

impl Consent {
    pub fn on_load(saved: Option<&SavedLocation>) -> Self {
        if saved.is_some() {
            Consent::Granted
        } else {
            Consent::Prompting
        }
    }

    /// Whether the consent card (Enable / Maybe Later) is visible.
    pub fn shows_card(self) -> bool {
        matches!(self, Consent::Prompting)
    }

    /// Whether the change-location card is visible.
    pub fn offers_change(self) -> bool {
        matches!(self, Consent::Granted | Consent::Deferred)
    }
}

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Geolocation is not supported by your browser.")]
    Unsupported,
    #[error("⚠️ Unable to access location: {0}")]
    Denied(String),
    #[error("⚠️ Unable to determine your city name. Please try again.")]
    Resolve(#[source] ApiError),
}

/// The location is considered known only when all three cookies are present.
/// A partial set (tampering, a failed earlier write) reads as absent and
/// re-prompts rather than staying silently inconsistent.
pub fn saved_location(jar: &dyn CookieJar) -> Option<SavedLocation> {
    let city = jar.get(CITY_COOKIE)?;
    let lat = jar.get(LAT_COOKIE)?;
    let lon = jar.get(LON_COOKIE)?;
    Some(SavedLocation { city, lat, lon })
}

pub fn store_location(jar: &dyn CookieJar, city: &str, coords: Coordinates) {
    jar.set(LAT_COOKIE, &coords.lat.to_string(), COOKIE_DAYS);
    jar.set(LON_COOKIE, &coords.lon.to_string(), COOKIE_DAYS);
    jar.set(CITY_COOKIE, city, COOKIE_DAYS);
}

/// Runs the full grant sequence: device geolocation, city resolution via the
/// backend, then cookie persistence. Cookies are written only after both
/// async steps succeed, so a failure anywhere leaves the jar untouched.
pub async fn acquire_location(
    api: &ApiClient,
    jar: &dyn CookieJar,
) -> Result<SavedLocation, LocationError> {
    let coords = current_position().await?;
    log::info!("coordinates acquired: {}, {}", coords.lat, coords.lon);

    let city = api
        .resolve_city(coords)
        .await
        .map_err(LocationError::Resolve)?;
    log::info!("city resolved: {}", city);

    store_location(jar, &city, coords);
    Ok(SavedLocation {
        city,
        lat: coords.lat.to_string(),
        lon: coords.lon.to_string(),
    })
}

/// Bridges the callback-pair geolocation API into one awaitable result.
/// Suspends for as long as the platform permission prompt is open; no
/// client-side timeout is enforced.
async fn current_position() -> Result<Coordinates, LocationError> {
    let geolocation = web_sys::window()
        .and_then(|w| w.navigator().geolocation().ok())
        .ok_or(LocationError::Unsupported)?;

    let (tx, rx) = oneshot::channel::<Result<Coordinates, String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_success = {
        let tx = tx.clone();
        Closure::once(move |position: web_sys::Position| {
            if let Some(tx) = tx.borrow_mut().take() {
                let coords = position.coords();
                let _ = tx.send(Ok(Coordinates {
                    lat: coords.latitude(),
                    lon: coords.longitude(),
                }));
            }
        })
    };
    let on_error = {
        let tx = tx.clone();
        Closure::once(move |err: web_sys::PositionError| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err(err.message()));
            }
        })
    };

    geolocation
        .get_current_position_with_error_callback(
            on_success.as_ref().unchecked_ref(),
            Some(on_error.as_ref().unchecked_ref()),
        )
        .map_err(|_| LocationError::Unsupported)?;

    // The closures must outlive the platform callback; holding them across
    // the await is what keeps them alive.
    match rx.await {
        Ok(Ok(coords)) => Ok(coords),
        Ok(Err(message)) => Err(LocationError::Denied(message)),
        Err(_) => Err(LocationError::Unsupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::memory::MemoryJar;

    fn coords() -> Coordinates {
        Coordinates {
            lat: 51.5074,
            lon: -0.1278,
        }
    }

    #[test]
    fn test_saved_location_requires_all_three_cookies() {
        let jar = MemoryJar::new();
        assert!(saved_location(&jar).is_none());

        jar.set(LAT_COOKIE, "51.5074", 7);
        assert!(saved_location(&jar).is_none());

        jar.set(LON_COOKIE, "-0.1278", 7);
        assert!(saved_location(&jar).is_none());

        jar.set(CITY_COOKIE, "London", 7);
        let saved = saved_location(&jar).unwrap();
        assert_eq!(saved.city, "London");
        assert_eq!(saved.lat, "51.5074");
        assert_eq!(saved.lon, "-0.1278");
    }

    #[test]
    fn test_store_location_writes_all_three() {
        let jar = MemoryJar::new();
        store_location(&jar, "London", coords());

        assert_eq!(jar.len(), 3);
        assert_eq!(jar.get(CITY_COOKIE).as_deref(), Some("London"));
        assert_eq!(jar.get(LAT_COOKIE).as_deref(), Some("51.5074"));
        assert_eq!(jar.get(LON_COOKIE).as_deref(), Some("-0.1278"));
    }

    #[test]
    fn test_consent_on_load() {
        assert_eq!(Consent::on_load(None), Consent::Prompting);

        let saved = SavedLocation {
            city: "London".to_string(),
            lat: "51.5074".to_string(),
            lon: "-0.1278".to_string(),
        };
        assert_eq!(Consent::on_load(Some(&saved)), Consent::Granted);
    }

    #[test]
    fn test_card_visibility_per_state() {
        assert!(Consent::Prompting.shows_card());
        assert!(!Consent::Granted.shows_card());
        assert!(!Consent::Deferred.shows_card());
        assert!(!Consent::Unknown.shows_card());

        assert!(Consent::Granted.offers_change());
        assert!(Consent::Deferred.offers_change());
        assert!(!Consent::Prompting.offers_change());
        assert!(!Consent::Unknown.offers_change());
    }

    #[test]
    fn test_skip_never_touches_the_jar() {
        // Deferring is purely a UI transition; nothing is persisted, so a
        // reload finds no cookies and prompts again.
        let jar = MemoryJar::new();
        let consent = Consent::Deferred;
        assert!(consent.offers_change());
        assert_eq!(jar.len(), 0);
        assert!(saved_location(&jar).is_none());
    }

    #[test]
    fn test_failed_resolution_leaves_jar_unchanged() {
        // store_location is only reached after resolution succeeds; a failure
        // short-circuits before any write, so the jar keeps its prior state.
        let jar = MemoryJar::new();
        let before = saved_location(&jar);

        let result: Result<String, ApiError> = Err(ApiError::Status(500));
        if let Ok(city) = result {
            store_location(&jar, &city, coords());
        }

        assert_eq!(saved_location(&jar), before);
        assert_eq!(jar.len(), 0);
    }
}
