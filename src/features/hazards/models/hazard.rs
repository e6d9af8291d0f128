use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Hazard type enum matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "hazard_type", rename_all = "PascalCase")]
pub enum HazardType {
    Earthquake,
    Flood,
    Wildfire,
    Tornado,
    Landslide,
    Tsunami,
}

impl HazardType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Earthquake" => Some(HazardType::Earthquake),
            "Flood" => Some(HazardType::Flood),
            "Wildfire" => Some(HazardType::Wildfire),
            "Tornado" => Some(HazardType::Tornado),
            "Landslide" => Some(HazardType::Landslide),
            "Tsunami" => Some(HazardType::Tsunami),
            _ => None,
        }
    }
}

impl std::fmt::Display for HazardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HazardType::Earthquake => write!(f, "Earthquake"),
            HazardType::Flood => write!(f, "Flood"),
            HazardType::Wildfire => write!(f, "Wildfire"),
            HazardType::Tornado => write!(f, "Tornado"),
            HazardType::Landslide => write!(f, "Landslide"),
            HazardType::Tsunami => write!(f, "Tsunami"),
        }
    }
}

/// Severity enum matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "hazard_severity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Severe,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Severity::Low),
            "moderate" => Some(Severity::Moderate),
            "high" => Some(Severity::High),
            "severe" => Some(Severity::Severe),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::High => write!(f, "high"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// Report source enum matching the database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "hazard_source")]
pub enum HazardSource {
    #[default]
    #[sqlx(rename = "Citizen Report")]
    #[serde(rename = "Citizen Report")]
    CitizenReport,
    #[sqlx(rename = "News Agency")]
    #[serde(rename = "News Agency")]
    NewsAgency,
    #[sqlx(rename = "Sensor Data")]
    #[serde(rename = "Sensor Data")]
    SensorData,
    #[sqlx(rename = "Drone Footage")]
    #[serde(rename = "Drone Footage")]
    DroneFootage,
    #[sqlx(rename = "Ocean Buoy")]
    #[serde(rename = "Ocean Buoy")]
    OceanBuoy,
}

impl HazardSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Citizen Report" => Some(HazardSource::CitizenReport),
            "News Agency" => Some(HazardSource::NewsAgency),
            "Sensor Data" => Some(HazardSource::SensorData),
            "Drone Footage" => Some(HazardSource::DroneFootage),
            "Ocean Buoy" => Some(HazardSource::OceanBuoy),
            _ => None,
        }
    }
}

/// Tag vocabulary; validated against parsed tag sequences, stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HazardTag {
    Help,
    Warning,
    Info,
    Fun,
}

impl HazardTag {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "help" => Some(HazardTag::Help),
            "warning" => Some(HazardTag::Warning),
            "info" => Some(HazardTag::Info),
            "fun" => Some(HazardTag::Fun),
            _ => None,
        }
    }
}

/// GeoJSON-style point: `{"type":"Point","coordinates":[longitude,latitude]}`.
///
/// Coordinate order is the geospatial convention and is deliberately reversed
/// from the `"lat,lng"` input strings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    kind: PointType,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
pub enum PointType {
    #[default]
    Point,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: PointType::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

/// Media classification for a single uploaded file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by declared content type; anything that is neither an image
    /// nor a video is unsupported.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if content_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// A stored media object referenced by (or about to be referenced by) a hazard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub kind: MediaKind,
    pub url: String,
}

/// Database model for a hazard report
#[derive(Debug, Clone, FromRow)]
pub struct Hazard {
    pub id: Uuid,
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub description: String,
    pub longitude: f64,
    pub latitude: f64,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub credibility_score: i32,
    pub source: HazardSource,
    pub verified: bool,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hazard {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.longitude, self.latitude)
    }

    /// URLs of every media object owned by this record
    pub fn media_urls(&self) -> impl Iterator<Item = &str> {
        self.images
            .iter()
            .chain(self.videos.iter())
            .map(String::as_str)
    }
}

/// Fully validated data for inserting a new hazard
#[derive(Debug, Clone, PartialEq)]
pub struct NewHazard {
    pub hazard_type: HazardType,
    pub severity: Severity,
    pub description: String,
    pub location: GeoPoint,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub credibility_score: i32,
    pub source: HazardSource,
    pub verified: bool,
    pub reported_by: String,
}

/// Fully validated partial update; only supplied fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HazardPatch {
    pub hazard_type: Option<HazardType>,
    pub severity: Option<Severity>,
    pub description: Option<String>,
    pub location: Option<GeoPoint>,
    pub tags: Option<Vec<String>>,
    pub verified: Option<bool>,
    /// Appended to the matching media array, never replacing it
    pub media: Option<MediaAttachment>,
}

impl HazardPatch {
    pub fn is_empty(&self) -> bool {
        self.hazard_type.is_none()
            && self.severity.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.tags.is_none()
            && self.verified.is_none()
            && self.media.is_none()
    }
}
