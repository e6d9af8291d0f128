//! Seed the hazards table with sample reports.
//!
//! Clears existing records and inserts samples through the same validation
//! pipeline the API uses, so string locations are normalized and credibility
//! scores computed exactly as for live submissions.

use hazardwatch_core::core::config::Config;
use hazardwatch_core::core::database;
use hazardwatch_core::features::hazards::dtos::HazardFormDto;
use hazardwatch_core::features::hazards::models::HazardSource;
use hazardwatch_core::features::hazards::services::location_service::LocationInput;
use hazardwatch_core::features::hazards::services::validation_service::{validate_new, TagsInput};
use hazardwatch_core::features::hazards::services::HazardService;

struct Sample {
    fields: HazardFormDto,
    source: HazardSource,
    verified: bool,
    reported_by: &'static str,
}

fn sample(
    hazard_type: &str,
    severity: &str,
    description: &str,
    location: &str,
    tags: &[&str],
    source: HazardSource,
    verified: bool,
    reported_by: &'static str,
) -> Sample {
    Sample {
        fields: HazardFormDto {
            hazard_type: Some(hazard_type.to_string()),
            severity: Some(severity.to_string()),
            description: Some(description.to_string()),
            location: Some(LocationInput::Raw(location.to_string())),
            tags: Some(TagsInput::Parsed(
                tags.iter().map(|t| t.to_string()).collect(),
            )),
            ..Default::default()
        },
        source,
        verified,
        reported_by,
    }
}

fn samples() -> Vec<Sample> {
    vec![
        sample(
            "Wildfire",
            "severe",
            "Large wildfire spreading rapidly through forest area.",
            "41.2132,-124.0046",
            &["help", "warning"],
            HazardSource::DroneFootage,
            true,
            "Fire Department",
        ),
        sample(
            "Flood",
            "high",
            "Severe flooding in residential areas.",
            "38.5556,-121.4689",
            &["warning"],
            HazardSource::CitizenReport,
            false,
            "Local Resident",
        ),
        sample(
            "Earthquake",
            "moderate",
            "Tremors felt across the metropolitan area, minor structural damage reported.",
            "34.0522,-118.2437",
            &["info"],
            HazardSource::SensorData,
            true,
            "Seismic Network",
        ),
        sample(
            "Tsunami",
            "severe",
            "Unusual wave activity detected offshore, coastal areas on alert.",
            "19.8968,-155.5828",
            &["warning", "help"],
            HazardSource::OceanBuoy,
            true,
            "Pacific Warning Center",
        ),
        sample(
            "Landslide",
            "low",
            "Small debris slide observed along the canyon road after rainfall.",
            "37.7749,-122.4194",
            &["info"],
            HazardSource::CitizenReport,
            false,
            "Anonymous",
        ),
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let pool = database::create_pool(&config.database).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    tracing::info!("Clearing existing hazards...");
    sqlx::query("DELETE FROM hazards").execute(&pool).await?;

    let service = HazardService::new(pool.clone());

    tracing::info!("Seeding sample hazards...");
    let mut inserted = 0usize;
    for sample in samples() {
        let mut new_hazard = {
            let mut rng = rand::thread_rng();
            validate_new(&sample.fields, None, &mut rng)
                .map_err(|e| anyhow::anyhow!("Invalid sample hazard: {}", e))?
        };
        new_hazard.source = sample.source;
        new_hazard.verified = sample.verified;
        new_hazard.reported_by = sample.reported_by.to_string();

        let stored = service.insert(&new_hazard).await?;
        tracing::info!(
            "Seeded {} ({}, credibility {})",
            stored.hazard_type,
            stored.id,
            stored.credibility_score
        );
        inserted += 1;
    }

    tracing::info!("Inserted {} hazards", inserted);
    pool.close().await;
    Ok(())
}
