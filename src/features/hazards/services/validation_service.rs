use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::core::error::AppError;
use crate::features::hazards::dtos::HazardFormDto;
use crate::features::hazards::models::{
    HazardPatch, HazardSource, HazardTag, HazardType, MediaAttachment, MediaKind, NewHazard,
    Severity,
};
use crate::features::hazards::services::credibility_service::estimate_credibility;
use crate::features::hazards::services::location_service::{normalize_location, LocationError};

/// Tags as they arrive at the boundary: either a pre-parsed sequence or a
/// serialized-array string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Parsed(Vec<String>),
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("`{0}` is required")]
    MissingField(&'static str),

    #[error("`{value}` is not a valid value for `{field}`")]
    InvalidEnumValue { field: &'static str, value: String },

    #[error("`description` must be at most 1000 characters")]
    DescriptionTooLong,

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error("Unsupported media type `{0}`. Only image/* and video/* uploads are accepted")]
    UnsupportedMediaType(String),
}

impl ValidationError {
    /// Wrap into the handler-facing error with an operation context,
    /// producing the `{error, details}` response shape.
    pub fn into_app(self, context: &str) -> AppError {
        AppError::Validation {
            error: context.to_string(),
            details: self.to_string(),
        }
    }
}

/// Validate and normalize fields for a create.
///
/// `hazardType`, `severity`, `description` and `location` are required; the
/// location passes through the normalizer and the credibility score is
/// computed from severity unless the caller supplied one. A single media
/// attachment becomes a one-element `images` or `videos` list.
pub fn validate_new<R: Rng>(
    fields: &HazardFormDto,
    media: Option<MediaAttachment>,
    rng: &mut R,
) -> Result<NewHazard, ValidationError> {
    check_description_length(fields)?;

    let hazard_type =
        parse_required_enum("hazardType", fields.hazard_type.as_deref(), HazardType::parse)?;
    let severity = parse_required_enum("severity", fields.severity.as_deref(), Severity::parse)?;

    let description = fields
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .ok_or(ValidationError::MissingField("description"))?;

    let location = normalize_location(
        fields
            .location
            .clone()
            .ok_or(ValidationError::MissingField("location"))?,
    )?;

    let tags = match &fields.tags {
        Some(input) => parse_tags(input)?,
        None => Vec::new(),
    };

    let credibility_score = match fields.credibility_score {
        Some(score) => score.clamp(0, 100),
        None => estimate_credibility(severity, rng),
    };

    let (images, videos) = match media {
        Some(attachment) => match attachment.kind {
            MediaKind::Image => (vec![attachment.url], Vec::new()),
            MediaKind::Video => (Vec::new(), vec![attachment.url]),
        },
        None => (Vec::new(), Vec::new()),
    };

    Ok(NewHazard {
        hazard_type,
        severity,
        description,
        location,
        tags,
        images,
        videos,
        credibility_score,
        source: HazardSource::default(),
        verified: false,
        reported_by: "Anonymous".to_string(),
    })
}

/// Validate the supplied subset of fields for an update. Empty text fields
/// count as absent; `verified` coerces from the string "true".
pub fn validate_patch(
    fields: &HazardFormDto,
    media: Option<MediaAttachment>,
) -> Result<HazardPatch, ValidationError> {
    check_description_length(fields)?;

    Ok(HazardPatch {
        hazard_type: parse_optional_enum(
            "hazardType",
            fields.hazard_type.as_deref(),
            HazardType::parse,
        )?,
        severity: parse_optional_enum("severity", fields.severity.as_deref(), Severity::parse)?,
        description: fields.description.clone().filter(|d| !d.is_empty()),
        location: fields
            .location
            .clone()
            .map(normalize_location)
            .transpose()?,
        tags: fields.tags.as_ref().map(parse_tags).transpose()?,
        verified: fields
            .verified
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| v == "true"),
        media,
    })
}

/// Parse tags into their stored form.
///
/// A pre-parsed sequence (and a successfully parsed JSON array string) is
/// validated element-wise against the tag vocabulary. A string that does not
/// parse as a JSON array never hard-fails: it degrades to a single-element
/// sequence stored as given.
pub fn parse_tags(input: &TagsInput) -> Result<Vec<String>, ValidationError> {
    match input {
        TagsInput::Parsed(list) => {
            validate_tag_elements(list)?;
            Ok(list.clone())
        }
        TagsInput::Raw(raw) => match serde_json::from_str::<Vec<String>>(raw) {
            Ok(list) => {
                validate_tag_elements(&list)?;
                Ok(list)
            }
            Err(_) => Ok(vec![raw.clone()]),
        },
    }
}

fn validate_tag_elements(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        if HazardTag::parse(tag).is_none() {
            return Err(ValidationError::InvalidEnumValue {
                field: "tags",
                value: tag.clone(),
            });
        }
    }
    Ok(())
}

fn check_description_length(fields: &HazardFormDto) -> Result<(), ValidationError> {
    fields
        .validate()
        .map_err(|_| ValidationError::DescriptionTooLong)
}

fn parse_required_enum<T>(
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ValidationError> {
    let raw = value
        .filter(|v| !v.is_empty())
        .ok_or(ValidationError::MissingField(field))?;
    parse(raw).ok_or_else(|| ValidationError::InvalidEnumValue {
        field,
        value: raw.to_string(),
    })
}

fn parse_optional_enum<T>(
    field: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, ValidationError> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse(raw)
            .map(Some)
            .ok_or_else(|| ValidationError::InvalidEnumValue {
                field,
                value: raw.to_string(),
            }),
    }
}
