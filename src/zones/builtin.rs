//! Built-in Tigbauan barangay dataset.
//!
//! Zone order matters: bucketing is first-match, so earlier entries win
//! ties. The list follows the municipal roster order.

use super::types::{Zone, ZonePoint};
use crate::geo::Coordinate;

struct BuiltinZone {
    name: &'static str,
    aliases: &'static [&'static str],
}

const fn zone(name: &'static str) -> BuiltinZone {
    BuiltinZone { name, aliases: &[] }
}

// "Namucon" is the spelling the heatmap roster used; both are kept so
// historical reports land in one bucket.
const BUILTIN_ZONES: &[BuiltinZone] = &[
    zone("Alupidian"),
    zone("Atabayan"),
    zone("Bagacay"),
    zone("Baguingin"),
    zone("Bagumbayan"),
    zone("Bangkal"),
    zone("Bantud"),
    BuiltinZone { name: "Barangay 1 (Poblacion)", aliases: &["Barangay 1", "Poblacion"] },
    BuiltinZone { name: "Barangay 2 (Poblacion)", aliases: &["Barangay 2"] },
    BuiltinZone { name: "Barangay 3 (Poblacion)", aliases: &["Barangay 3"] },
    BuiltinZone { name: "Barangay 4 (Poblacion)", aliases: &["Barangay 4"] },
    BuiltinZone { name: "Barangay 5 (Poblacion)", aliases: &["Barangay 5"] },
    BuiltinZone { name: "Barangay 6 (Poblacion)", aliases: &["Barangay 6"] },
    BuiltinZone { name: "Barangay 7 (Poblacion)", aliases: &["Barangay 7"] },
    BuiltinZone { name: "Barangay 8 (Poblacion)", aliases: &["Barangay 8"] },
    BuiltinZone { name: "Barangay 9 (Poblacion)", aliases: &["Barangay 9"] },
    zone("Barosong"),
    zone("Barroc"),
    zone("Bitas"),
    zone("Bayuco"),
    zone("Binaliuan Mayor"),
    zone("Binaliuan Menor"),
    zone("Buenavista"),
    zone("Bugasongan"),
    zone("Buyu-an"),
    zone("Canabuan"),
    zone("Cansilayan"),
    zone("Cordova Norte"),
    zone("Cordova Sur"),
    zone("Danao"),
    zone("Dapdap"),
    zone("Dorong-an"),
    zone("Guisian"),
    zone("Isawan"),
    zone("Isian"),
    zone("Jamog"),
    zone("Lanag"),
    zone("Linobayan"),
    zone("Lubog"),
    zone("Nagba"),
    BuiltinZone { name: "Namocon", aliases: &["Namucon"] },
    zone("Napnapan Norte"),
    zone("Napnapan Sur"),
    zone("Olo Barroc"),
    zone("Parara Norte"),
    zone("Parara Sur"),
    zone("San Rafael"),
    zone("Sermon"),
    zone("Sipitan"),
    zone("Supa"),
    zone("Tan Pael"),
    zone("Taro"),
];

/// Approximate barangay centers. Zones not listed here use [`DEFAULT_ZONE_POINT`].
const BUILTIN_POINTS: &[(&str, f64, f64)] = &[
    ("Barangay 1 (Poblacion)", 10.6746, 122.3765),
    ("Barangay 2 (Poblacion)", 10.6750, 122.3770),
    ("Barangay 3 (Poblacion)", 10.6755, 122.3775),
    ("Barangay 4 (Poblacion)", 10.6760, 122.3780),
    ("Barangay 5 (Poblacion)", 10.6765, 122.3785),
    ("Barangay 6 (Poblacion)", 10.6770, 122.3790),
    ("Barangay 7 (Poblacion)", 10.6775, 122.3795),
    ("Barangay 8 (Poblacion)", 10.6780, 122.3800),
    ("Barangay 9 (Poblacion)", 10.6785, 122.3805),
    ("Alupidian", 10.7005, 122.3897),
    ("Atabayan", 10.6900, 122.3900),
    ("Bagacay", 10.6800, 122.3950),
];

/// Tigbauan town center, used for any zone without a surveyed point.
pub const DEFAULT_ZONE_POINT: Coordinate = Coordinate::new(10.6747, 122.3964);

/// The built-in zones in bucketing order.
pub fn builtin_zones() -> Vec<Zone> {
    BUILTIN_ZONES
        .iter()
        .map(|z| Zone::with_aliases(z.name, z.aliases.iter().copied()))
        .collect()
}

/// The built-in zone → map point table.
pub fn builtin_points() -> Vec<ZonePoint> {
    BUILTIN_POINTS
        .iter()
        .map(|&(name, lat, lng)| ZonePoint { name: name.to_string(), lat, lng })
        .collect()
}
