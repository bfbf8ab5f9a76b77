pub mod bicycle_parking;

use serde::{Deserialize, Serialize};

pub use bicycle_parking::{ParkingPage, ParkingRecord};

pub const BICYCLE_PARKING_ENDPOINT: &str =
    "https://datamall2.mytransport.sg/ltaodataservice/BicycleParkingv2";
pub const API_KEY_URL: &str =
    "https://datamall.lta.gov.sg/content/datamall/en/request-for-api.html";

/// Records returned per `$skip` step. The API does not accept a page size parameter.
pub const PAGE_SIZE: u32 = 500;

pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Centre and radius of one point-radius search (`Lat`, `Long`, `Dist`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl QueryPoint {
    pub const fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    pub fn covers(&self, latitude: f64, longitude: f64) -> bool {
        haversine_km(self.latitude, self.longitude, latitude, longitude) <= self.radius_km
    }
}

/// Great-circle distance between two WGS84 coordinates.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}
