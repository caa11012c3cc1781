// Facility domain model
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Fixed set of sites every robot and operations sample is assigned to.
pub static FACILITIES: [Facility; 8] = [
    Facility {
        id: "fac-sfo",
        name: "Bayview Bistro",
        city: "San Francisco",
        region: "West",
        latitude: 37.7749,
        longitude: -122.4194,
    },
    Facility {
        id: "fac-sea",
        name: "Harborline Medical Center",
        city: "Seattle",
        region: "West",
        latitude: 47.6062,
        longitude: -122.3321,
    },
    Facility {
        id: "fac-aus",
        name: "Lone Star Fulfillment",
        city: "Austin",
        region: "South",
        latitude: 30.2672,
        longitude: -97.7431,
    },
    Facility {
        id: "fac-chi",
        name: "Lakeshore Dining Hall",
        city: "Chicago",
        region: "Midwest",
        latitude: 41.8781,
        longitude: -87.6298,
    },
    Facility {
        id: "fac-nyc",
        name: "Midtown Grand Hotel",
        city: "New York",
        region: "Northeast",
        latitude: 40.7128,
        longitude: -74.0060,
    },
    Facility {
        id: "fac-bos",
        name: "Charles River Hospital",
        city: "Boston",
        region: "Northeast",
        latitude: 42.3601,
        longitude: -71.0589,
    },
    Facility {
        id: "fac-atl",
        name: "Peachtree Distribution",
        city: "Atlanta",
        region: "South",
        latitude: 33.7490,
        longitude: -84.3880,
    },
    Facility {
        id: "fac-den",
        name: "Mile High Eatery",
        city: "Denver",
        region: "Mountain",
        latitude: 39.7392,
        longitude: -104.9903,
    },
];
