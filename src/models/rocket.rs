use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::LaunchServiceProvider;
use super::validation::{require_non_blank, ValidationError};

const MASS_MIN_KG: u32 = 1;
const MASS_MAX_KG: u32 = 200_000;

/// A launch vehicle.
///
/// Rockets compare and group by name, country, and manufacturer. The
/// payload figures (kilograms to LEO, GTO, or another orbit) and the wiki
/// link are optional descriptive attributes updated through re-validating
/// `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RocketRepr")]
pub struct Rocket {
    id: Option<Uuid>,
    name: String,
    country: String,
    manufacturer: LaunchServiceProvider,
    mass_to_leo: Option<u32>,
    mass_to_gto: Option<u32>,
    mass_to_other: Option<u32>,
    wiki_link: Option<String>,
}

impl Rocket {
    /// Creates a rocket. Name and country must not be blank.
    pub fn new(
        name: &str,
        country: &str,
        manufacturer: LaunchServiceProvider,
    ) -> Result<Self, ValidationError> {
        require_non_blank("name", name)?;
        require_non_blank("country", country)?;
        Ok(Self {
            id: None,
            name: name.to_string(),
            country: country.to_string(),
            manufacturer,
            mass_to_leo: None,
            mass_to_gto: None,
            mass_to_other: None,
            wiki_link: None,
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn manufacturer(&self) -> &LaunchServiceProvider {
        &self.manufacturer
    }

    pub fn mass_to_leo(&self) -> Option<u32> {
        self.mass_to_leo
    }

    pub fn mass_to_gto(&self) -> Option<u32> {
        self.mass_to_gto
    }

    pub fn mass_to_other(&self) -> Option<u32> {
        self.mass_to_other
    }

    pub fn wiki_link(&self) -> Option<&str> {
        self.wiki_link.as_deref()
    }

    pub fn with_mass_to_leo(mut self, kilograms: Option<u32>) -> Result<Self, ValidationError> {
        self.mass_to_leo = checked_mass("mass to LEO", kilograms)?;
        Ok(self)
    }

    pub fn with_mass_to_gto(mut self, kilograms: Option<u32>) -> Result<Self, ValidationError> {
        self.mass_to_gto = checked_mass("mass to GTO", kilograms)?;
        Ok(self)
    }

    pub fn with_mass_to_other(mut self, kilograms: Option<u32>) -> Result<Self, ValidationError> {
        self.mass_to_other = checked_mass("mass to other orbits", kilograms)?;
        Ok(self)
    }

    /// Sets the wiki link, which must not be blank.
    pub fn with_wiki_link(mut self, wiki_link: &str) -> Result<Self, ValidationError> {
        require_non_blank("wiki link", wiki_link)?;
        self.wiki_link = Some(wiki_link.to_string());
        Ok(self)
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn with_manufacturer(mut self, manufacturer: LaunchServiceProvider) -> Self {
        self.manufacturer = manufacturer;
        self
    }
}

fn checked_mass(
    field: &'static str,
    kilograms: Option<u32>,
) -> Result<Option<u32>, ValidationError> {
    if let Some(kg) = kilograms {
        if !(MASS_MIN_KG..=MASS_MAX_KG).contains(&kg) {
            return Err(ValidationError::MassOutOfRange { field });
        }
    }
    Ok(kilograms)
}

impl PartialEq for Rocket {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.country == other.country
            && self.manufacturer == other.manufacturer
    }
}

impl Eq for Rocket {}

impl Hash for Rocket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.country.hash(state);
        self.manufacturer.hash(state);
    }
}

#[derive(Deserialize)]
struct RocketRepr {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    country: String,
    manufacturer: LaunchServiceProvider,
    #[serde(default)]
    mass_to_leo: Option<u32>,
    #[serde(default)]
    mass_to_gto: Option<u32>,
    #[serde(default)]
    mass_to_other: Option<u32>,
    #[serde(default)]
    wiki_link: Option<String>,
}

impl TryFrom<RocketRepr> for Rocket {
    type Error = ValidationError;

    fn try_from(repr: RocketRepr) -> Result<Self, Self::Error> {
        let mut rocket = Rocket::new(&repr.name, &repr.country, repr.manufacturer)?
            .with_mass_to_leo(repr.mass_to_leo)?
            .with_mass_to_gto(repr.mass_to_gto)?
            .with_mass_to_other(repr.mass_to_other)?;
        if let Some(wiki_link) = &repr.wiki_link {
            rocket = rocket.with_wiki_link(wiki_link)?;
        }
        if let Some(id) = repr.id {
            rocket = rocket.with_id(id);
        }
        Ok(rocket)
    }
}
