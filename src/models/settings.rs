//! Storefront settings (singleton record)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OperatingHours {
    pub monday: String,
    pub tuesday: String,
    pub wednesday: String,
    pub thursday: String,
    pub friday: String,
    pub saturday: String,
    pub sunday: String,
    pub holiday: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

/// Images shown on the gear guide page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideImages {
    #[serde(default, alias = "tenda", skip_serializing_if = "Option::is_none")]
    pub tent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleeping_bag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub id: String,
    pub store_name: String,
    pub store_description: String,
    pub address: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub operating_hours: OperatingHours,
    pub map_url: String,
    #[serde(default)]
    pub social_media: SocialMedia,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about_us: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_images: Option<GuideImages>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settings {
    /// Settings written on first access
    pub fn defaults(id: String, now: DateTime<Utc>) -> Self {
        let weekday = "08:00 - 20:00".to_string();
        Self {
            id,
            store_name: "MountainGear".to_string(),
            store_description: "Trusted mountain gear rental for your adventures".to_string(),
            address: "Jl. Pendaki No. 123, Bandung, Jawa Barat 40123".to_string(),
            phone: "+62 22-1234-5678".to_string(),
            whatsapp: "+62 812-3456-7890".to_string(),
            email: "info@mountaingear.com".to_string(),
            operating_hours: OperatingHours {
                monday: weekday.clone(),
                tuesday: weekday.clone(),
                wednesday: weekday.clone(),
                thursday: weekday.clone(),
                friday: weekday,
                saturday: "08:00 - 22:00".to_string(),
                sunday: "07:00 - 21:00".to_string(),
                holiday: "09:00 - 18:00".to_string(),
            },
            map_url: "https://www.google.com/maps/embed?pb=!1m14!1m12!1m3!1d3960.8!2d107.6098344!3d-6.914744".to_string(),
            social_media: SocialMedia {
                instagram: Some("@mountaingear".to_string()),
                facebook: Some("MountainGear".to_string()),
                twitter: None,
            },
            hero_title: "Trusted Mountain Gear Rental".to_string(),
            hero_subtitle: "Rent quality hiking equipment for your next climb. Complete, safe and affordable.".to_string(),
            about_us: "MountainGear has been renting out mountain equipment for more than ten years, \
                       keeping quality gear ready for every climb."
                .to_string(),
            logo_url: None,
            guide_images: Some(GuideImages::default()),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial settings update; nested objects are replaced as a whole
#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Store name cannot be empty"))]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_hours: Option<OperatingHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_media: Option<SocialMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_us: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guide_images: Option<GuideImages>,
}
