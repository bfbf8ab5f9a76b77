//! Fixed search centres covering Singapore.
//!
//! Any single point-radius query against DataMall is silently capped, so the
//! island is tiled with overlapping 5 km circles instead. The rows are
//! staggered (offset by half a column) so every location inside
//! [`SINGAPORE_BOUNDS`] lies within one radius of some centre.

use shared::datamall::QueryPoint;

pub const SEARCH_RADIUS_KM: f64 = 5.0;

const fn point(latitude: f64, longitude: f64) -> QueryPoint {
    QueryPoint::new(latitude, longitude, SEARCH_RADIUS_KM)
}

pub const SINGAPORE_QUERY_POINTS: [QueryPoint; 26] = [
    // South coast, Jurong Island to Changi Beach
    point(1.25, 103.61),
    point(1.25, 103.68),
    point(1.25, 103.76),
    point(1.25, 103.83),
    point(1.25, 103.91),
    point(1.25, 103.98),
    point(1.25, 104.05),
    // Tuas, Jurong East, Queenstown, Geylang, Bedok, Changi
    point(1.32, 103.65),
    point(1.32, 103.72),
    point(1.32, 103.80),
    point(1.32, 103.87),
    point(1.32, 103.94),
    point(1.32, 104.02),
    // Lim Chu Kang, Bukit Batok, Bishan, Serangoon, Pasir Ris
    point(1.38, 103.61),
    point(1.38, 103.68),
    point(1.38, 103.76),
    point(1.38, 103.83),
    point(1.38, 103.91),
    point(1.38, 103.98),
    point(1.38, 104.05),
    // Kranji, Woodlands, Sembawang, Seletar, Punggol, Pulau Ubin
    point(1.45, 103.65),
    point(1.45, 103.72),
    point(1.45, 103.80),
    point(1.45, 103.87),
    point(1.45, 103.94),
    point(1.45, 104.02),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

pub const SINGAPORE_BOUNDS: BoundingBox = BoundingBox {
    south: 1.23,
    north: 1.47,
    west: 103.61,
    east: 104.04,
};

impl BoundingBox {
    /// Cell corners `(latitude, longitude)` spaced `step` degrees apart, edges included.
    pub fn grid(&self, step: f64) -> impl Iterator<Item = (f64, f64)> + '_ {
        let rows = ((self.north - self.south) / step).round() as usize;
        let cols = ((self.east - self.west) / step).round() as usize;
        (0..=rows).flat_map(move |i| {
            (0..=cols).map(move |j| (self.south + i as f64 * step, self.west + j as f64 * step))
        })
    }
}

pub fn uncovered_cells(points: &[QueryPoint], bounds: &BoundingBox, step: f64) -> Vec<(f64, f64)> {
    bounds
        .grid(step)
        .filter(|&(lat, lon)| !points.iter().any(|p| p.covers(lat, lon)))
        .collect()
}

/// The configured override if present, otherwise the built-in grid.
pub fn query_points(configured: Option<&[QueryPoint]>) -> Vec<QueryPoint> {
    match configured {
        Some(points) if !points.is_empty() => points.to_vec(),
        _ => SINGAPORE_QUERY_POINTS.to_vec(),
    }
}
