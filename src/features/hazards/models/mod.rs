mod hazard;

pub use hazard::{
    GeoPoint, Hazard, HazardPatch, HazardSource, HazardTag, HazardType, MediaAttachment,
    MediaKind, NewHazard, PointType, Severity,
};
