use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provider::LaunchServiceProvider;
use super::rocket::Rocket;
use super::validation::{require_non_blank, ValidationError};

/// Whether a launch reached its orbit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LaunchOutcome {
    Failed,
    Successful,
}

impl LaunchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failed => "failed",
            Self::Successful => "successful",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "failed" => Some(Self::Failed),
            "successful" => Some(Self::Successful),
            _ => None,
        }
    }
}

/// The full set of attributes needed to record a launch.
#[derive(Debug, Clone)]
pub struct LaunchDetails {
    pub launch_date: NaiveDate,
    pub vehicle: Rocket,
    pub provider: LaunchServiceProvider,
    pub launch_site: String,
    pub orbit: String,
    /// Payload function, e.g. communications or reconnaissance. A planned
    /// launch may not have one declared yet.
    pub function: Option<String>,
    pub price: Decimal,
    pub outcome: LaunchOutcome,
}

/// One flight of a rocket.
///
/// Launches compare and group by launch date, vehicle, provider, and
/// orbit. Price is an exact decimal amount so that revenue sums never
/// accumulate float error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LaunchRepr")]
pub struct Launch {
    id: Option<Uuid>,
    launch_date: NaiveDate,
    vehicle: Rocket,
    provider: LaunchServiceProvider,
    launch_site: String,
    orbit: String,
    function: Option<String>,
    price: Decimal,
    outcome: LaunchOutcome,
}

impl Launch {
    /// Records a launch. Site and orbit must not be blank, the function
    /// must not be blank when given, and the price must not be negative.
    pub fn new(details: LaunchDetails) -> Result<Self, ValidationError> {
        require_non_blank("launch site", &details.launch_site)?;
        require_non_blank("orbit", &details.orbit)?;
        if let Some(function) = &details.function {
            require_non_blank("function", function)?;
        }
        if details.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        Ok(Self {
            id: None,
            launch_date: details.launch_date,
            vehicle: details.vehicle,
            provider: details.provider,
            launch_site: details.launch_site,
            orbit: details.orbit,
            function: details.function,
            price: details.price,
            outcome: details.outcome,
        })
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    pub fn launch_date(&self) -> NaiveDate {
        self.launch_date
    }

    pub fn vehicle(&self) -> &Rocket {
        &self.vehicle
    }

    pub fn provider(&self) -> &LaunchServiceProvider {
        &self.provider
    }

    pub fn launch_site(&self) -> &str {
        &self.launch_site
    }

    pub fn orbit(&self) -> &str {
        &self.orbit
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn outcome(&self) -> LaunchOutcome {
        self.outcome
    }

    /// Sets the payload function, which must not be blank.
    pub fn with_function(mut self, function: &str) -> Result<Self, ValidationError> {
        require_non_blank("function", function)?;
        self.function = Some(function.to_string());
        Ok(self)
    }

    /// Re-prices the launch. The price must not be negative.
    pub fn with_price(mut self, price: Decimal) -> Result<Self, ValidationError> {
        if price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice);
        }
        self.price = price;
        Ok(self)
    }

    pub(crate) fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub(crate) fn with_vehicle(mut self, vehicle: Rocket) -> Self {
        self.vehicle = vehicle;
        self
    }

    pub(crate) fn with_provider(mut self, provider: LaunchServiceProvider) -> Self {
        self.provider = provider;
        self
    }
}

impl PartialEq for Launch {
    fn eq(&self, other: &Self) -> bool {
        self.launch_date == other.launch_date
            && self.vehicle == other.vehicle
            && self.provider == other.provider
            && self.orbit == other.orbit
    }
}

impl Eq for Launch {}

impl Hash for Launch {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.launch_date.hash(state);
        self.vehicle.hash(state);
        self.provider.hash(state);
        self.orbit.hash(state);
    }
}

#[derive(Deserialize)]
struct LaunchRepr {
    #[serde(default)]
    id: Option<Uuid>,
    launch_date: NaiveDate,
    vehicle: Rocket,
    provider: LaunchServiceProvider,
    launch_site: String,
    orbit: String,
    #[serde(default)]
    function: Option<String>,
    price: Decimal,
    outcome: LaunchOutcome,
}

impl TryFrom<LaunchRepr> for Launch {
    type Error = ValidationError;

    fn try_from(repr: LaunchRepr) -> Result<Self, Self::Error> {
        let mut launch = Launch::new(LaunchDetails {
            launch_date: repr.launch_date,
            vehicle: repr.vehicle,
            provider: repr.provider,
            launch_site: repr.launch_site,
            orbit: repr.orbit,
            function: repr.function,
            price: repr.price,
            outcome: repr.outcome,
        })?;
        if let Some(id) = repr.id {
            launch = launch.with_id(id);
        }
        Ok(launch)
    }
}
