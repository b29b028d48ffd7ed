use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rocket::Rocket;
use super::validation::{require_non_blank, ValidationError};

/// An organization that operates launch vehicles.
///
/// Providers compare and group by their natural key: name, year founded,
/// and country. The owned rocket set is descriptive payload and never
/// participates in equality, so a shallow reference (the manufacturer
/// embedded in a [`Rocket`]) and the fully populated record compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LaunchServiceProviderRepr")]
pub struct LaunchServiceProvider {
    id: Option<Uuid>,
    name: String,
    year_founded: i32,
    country: String,
    headquarters: Option<String>,
    rockets: IndexSet<Rocket>,
}

impl LaunchServiceProvider {
    /// Creates a provider. Name and country must not be blank and the
    /// founding year must be positive.
    pub fn new(name: &str, year_founded: i32, country: &str) -> Result<Self, ValidationError> {
        require_non_blank("name", name)?;
        require_non_blank("country", country)?;
        if year_founded <= 0 {
            return Err(ValidationError::YearFounded);
        }
        Ok(Self {
            id: None,
            name: name.to_string(),
            year_founded,
            country: country.to_string(),
            headquarters: None,
            rockets: IndexSet::new(),
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn year_founded(&self) -> i32 {
        self.year_founded
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn headquarters(&self) -> Option<&str> {
        self.headquarters.as_deref()
    }

    pub fn rockets(&self) -> &IndexSet<Rocket> {
        &self.rockets
    }

    /// Sets the headquarters location, which must not be blank.
    pub fn with_headquarters(mut self, headquarters: &str) -> Result<Self, ValidationError> {
        require_non_blank("headquarters", headquarters)?;
        self.headquarters = Some(headquarters.to_string());
        Ok(self)
    }

    /// Replaces the owned rocket set.
    pub fn with_rockets(mut self, rockets: IndexSet<Rocket>) -> Self {
        self.rockets = rockets;
        self
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }
}

impl PartialEq for LaunchServiceProvider {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.year_founded == other.year_founded
            && self.country == other.country
    }
}

impl Eq for LaunchServiceProvider {}

impl Hash for LaunchServiceProvider {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.year_founded.hash(state);
        self.country.hash(state);
    }
}

#[derive(Deserialize)]
struct LaunchServiceProviderRepr {
    #[serde(default)]
    id: Option<Uuid>,
    name: String,
    year_founded: i32,
    country: String,
    #[serde(default)]
    headquarters: Option<String>,
    #[serde(default)]
    rockets: IndexSet<Rocket>,
}

impl TryFrom<LaunchServiceProviderRepr> for LaunchServiceProvider {
    type Error = ValidationError;

    fn try_from(repr: LaunchServiceProviderRepr) -> Result<Self, Self::Error> {
        let mut provider = LaunchServiceProvider::new(&repr.name, repr.year_founded, &repr.country)?;
        if let Some(headquarters) = &repr.headquarters {
            provider = provider.with_headquarters(headquarters)?;
        }
        provider = provider.with_rockets(repr.rockets);
        if let Some(id) = repr.id {
            provider = provider.with_id(id);
        }
        Ok(provider)
    }
}
