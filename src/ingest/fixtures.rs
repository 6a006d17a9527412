//! Test fixtures: representative track tables in the catalog CSV layout.
//!
//! Columns follow the simulated trackset export: `SID` (storm id),
//! `LAT`, `LON` (0..360 convention, normalized on load), `Vm` (max
//! sustained wind, m/s). Extra columns are present on purpose; the reader
//! must locate required columns by header name.
//!
//! Points are placed either well inside (< 1 degree) or well outside
//! (> 4.4 degrees) the search area around Miami (25.75N, 280E) and New
//! Orleans (30N, 270E), so results hold for both a 300 km and a 300 mile
//! radius.

/// Five simulated storms around the Gulf coast.
///
/// | SID     | Miami (Vm > 33) | New Orleans (Vm > 33) | max near A | max near B |
/// |---------|-----------------|-----------------------|------------|------------|
/// | SIM0001 | yes             | no                    | 55.0       | -          |
/// | SIM0002 | yes             | yes, later in track   | 60.0       | 45.0       |
/// | SIM0003 | no (30 m/s)     | yes                   | -          | 70.0       |
/// | SIM0004 | no (far away)   | no                    | -          | -          |
/// | SIM0005 | no (exactly 33) | yes                   | -          | 35.0       |
#[cfg(test)]
pub(crate) fn fixture_gulf_tracks_csv() -> &'static str {
    "\
SID,YEAR,LAT,LON,Vm
SIM0001,2031,18.0,290.0,30.0
SIM0001,2031,25.9,280.2,55.0
SIM0001,2031,25.5,279.5,48.0
SIM0001,2031,35.0,290.0,35.0
SIM0002,2047,20.0,288.0,30.0
SIM0002,2047,25.6,279.8,60.0
SIM0002,2047,27.0,275.0,52.0
SIM0002,2047,29.8,270.3,45.0
SIM0002,2047,33.0,268.0,20.0
SIM0003,2055,26.0,280.5,30.0
SIM0003,2055,28.0,274.0,40.0
SIM0003,2055,30.2,269.6,70.0
SIM0004,2090,15.0,300.0,50.0
SIM0004,2090,18.0,295.0,58.0
SIM0005,2102,25.75,280.0,33.0
SIM0005,2102,29.5,270.5,35.0
"
}

/// Two storms over a one-year catalog: `A1` passes location A only,
/// `AB2` passes A early in its track and B later.
///
/// A = (20N, 300E), B = (20N, 310E); radius 100 km, thresholds 30 m/s.
#[cfg(test)]
pub(crate) fn fixture_two_event_csv() -> &'static str {
    "\
SID,LAT,LON,Vm
A1,19.0,296.0,25.0
A1,20.2,300.1,40.0
A1,22.0,302.0,28.0
AB2,20.1,299.8,35.0
AB2,20.0,305.0,45.0
AB2,19.9,310.2,50.0
"
}

/// Same layout with semicolons, as produced by some spreadsheet exports.
#[cfg(test)]
pub(crate) fn fixture_semicolon_csv() -> &'static str {
    "\
Vm;SID;LON;LAT
41.5;SIM0100;280.1;25.8
36.0;SIM0100;-79.0;26.5
"
}

/// Missing the `Vm` column.
#[cfg(test)]
pub(crate) fn fixture_missing_wind_column_csv() -> &'static str {
    "\
SID,LAT,LON,WIND
SIM0001,25.9,280.2,55.0
"
}

/// Third data row (file line 4) has a non-numeric latitude.
#[cfg(test)]
pub(crate) fn fixture_bad_latitude_csv() -> &'static str {
    "\
SID,LAT,LON,Vm
SIM0001,25.9,280.2,55.0
SIM0001,26.1,280.0,50.0
SIM0001,north,279.8,45.0
"
}

/// Header only, no rows.
#[cfg(test)]
pub(crate) fn fixture_header_only_csv() -> &'static str {
    "SID,LAT,LON,Vm\n"
}
