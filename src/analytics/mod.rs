//! Ranking queries over the launch records.
//!
//! [`Analytics`] answers the six analytical questions the service exists
//! for: most-launched rockets, most-reliable and highest-revenue
//! providers, most-recent and most-expensive launches, and the dominant
//! country for an orbit. Each query loads a fresh snapshot through the
//! [`Store`] gateway, computes over it without mutating anything, and
//! returns an ordered, bounded result.

mod rank;

use chrono::Datelike;
use indexmap::IndexMap;

use crate::db::{Store, StoreError};
use crate::models::{Launch, LaunchOutcome, LaunchServiceProvider, Rocket};

/// The ranking engine.
///
/// Ties on a query's score break on fixed fields of the records
/// themselves (names, founding years, dates, orbits), never on the order
/// the store returned rows, so repeated calls over the same records give
/// identical results. Store failures propagate unchanged; no query
/// retries or returns a partial result.
#[derive(Clone)]
pub struct Analytics<S> {
    store: S,
}

impl<S: Store> Analytics<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The `k` rockets with the most launches, most-launched first.
    ///
    /// Rockets that never launched do not appear, so the result can be
    /// shorter than `k`. Equal counts order by rocket name, country, then
    /// manufacturer name.
    pub fn most_launched_rockets(&self, k: usize) -> Result<Vec<Rocket>, StoreError> {
        let launches = self.store.get_all_launches()?;
        tracing::debug!("Ranking rockets by launch count over {} launches", launches.len());

        let counts = rank::count_by(&launches, |launch| launch.vehicle().clone());
        let ranked = rank::top_k_by(counts.into_iter().collect(), k, |a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.name().cmp(b.0.name()))
                .then_with(|| a.0.country().cmp(b.0.country()))
                .then_with(|| a.0.manufacturer().name().cmp(b.0.manufacturer().name()))
        });
        Ok(ranked.into_iter().map(|(rocket, _)| rocket).collect())
    }

    /// The `k` providers with the highest launch success ratio.
    ///
    /// A provider's ratio counts only its own launches: successes divided
    /// by that provider's attempts. Providers with no launches on record
    /// are excluded rather than scored, so the result can be shorter than
    /// `k`. Equal ratios order by provider name, year founded, then
    /// country.
    pub fn most_reliable_providers(
        &self,
        k: usize,
    ) -> Result<Vec<LaunchServiceProvider>, StoreError> {
        let providers = self.store.get_all_providers()?;
        let launches = self.store.get_all_launches()?;
        tracing::debug!(
            "Ranking {} providers by success ratio over {} launches",
            providers.len(),
            launches.len()
        );

        let mut tallies: IndexMap<LaunchServiceProvider, (u64, u64)> = IndexMap::new();
        for launch in &launches {
            let tally = tallies.entry(launch.provider().clone()).or_insert((0, 0));
            tally.1 += 1;
            if launch.outcome() == LaunchOutcome::Successful {
                tally.0 += 1;
            }
        }

        let scored = providers
            .into_iter()
            .filter_map(|provider| {
                tallies
                    .get(&provider)
                    .map(|&(successes, attempts)| (provider, successes as f64 / attempts as f64))
            })
            .collect::<Vec<_>>();

        let ranked = rank::top_k_by(scored, k, |a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.name().cmp(b.0.name()))
                .then_with(|| a.0.year_founded().cmp(&b.0.year_founded()))
                .then_with(|| a.0.country().cmp(b.0.country()))
        });
        Ok(ranked.into_iter().map(|(provider, _)| provider).collect())
    }

    /// The `k` most recent launches, newest first. Same-day launches
    /// order by price descending, then vehicle name and orbit.
    pub fn most_recent_launches(&self, k: usize) -> Result<Vec<Launch>, StoreError> {
        let launches = self.store.get_all_launches()?;
        tracing::debug!("Ranking {} launches by date", launches.len());

        Ok(rank::top_k_by(launches, k, |a, b| {
            b.launch_date()
                .cmp(&a.launch_date())
                .then_with(|| b.price().cmp(&a.price()))
                .then_with(|| a.vehicle().name().cmp(b.vehicle().name()))
                .then_with(|| a.orbit().cmp(b.orbit()))
        }))
    }

    /// The country whose rockets launched most often into `orbit`, or
    /// `None` when no launch matches the orbit. A country is attributed
    /// through the launch vehicle's country. Equal counts resolve to the
    /// lexicographically first country name.
    pub fn dominant_country(&self, orbit: &str) -> Result<Option<String>, StoreError> {
        let launches = self.store.get_all_launches()?;
        tracing::debug!(
            "Counting launches per country for orbit {} over {} launches",
            orbit,
            launches.len()
        );

        let matching = launches
            .iter()
            .filter(|launch| launch.orbit() == orbit)
            .collect::<Vec<_>>();
        let counts = rank::count_by(&matching, |launch| launch.vehicle().country().to_string());

        let top = rank::top_k_by(counts.into_iter().collect(), 1, |a, b| {
            b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        });
        Ok(top.into_iter().next().map(|(country, _)| country))
    }

    /// The `k` priciest launches, highest price first. Equal prices
    /// order by date descending, then vehicle name and orbit.
    pub fn most_expensive_launches(&self, k: usize) -> Result<Vec<Launch>, StoreError> {
        let launches = self.store.get_all_launches()?;
        tracing::debug!("Ranking {} launches by price", launches.len());

        Ok(rank::top_k_by(launches, k, |a, b| {
            b.price()
                .cmp(&a.price())
                .then_with(|| b.launch_date().cmp(&a.launch_date()))
                .then_with(|| a.vehicle().name().cmp(b.vehicle().name()))
                .then_with(|| a.orbit().cmp(b.orbit()))
        }))
    }

    /// The `k` providers with the highest summed launch revenue in the
    /// calendar year `year`, highest first.
    ///
    /// Revenue is the exact-decimal sum of the prices of that provider's
    /// launches dated within the year. Providers with no launches that
    /// year are absent, so the result can be shorter than `k`. Equal
    /// revenue orders by provider name, year founded, then country.
    pub fn highest_revenue_providers(
        &self,
        k: usize,
        year: i32,
    ) -> Result<Vec<LaunchServiceProvider>, StoreError> {
        let launches = self.store.get_all_launches()?;
        tracing::debug!(
            "Ranking providers by revenue in {} over {} launches",
            year,
            launches.len()
        );

        let in_year = launches
            .iter()
            .filter(|launch| launch.launch_date().year() == year)
            .collect::<Vec<_>>();
        let revenue = rank::sum_by(
            &in_year,
            |launch| launch.provider().clone(),
            |launch| launch.price(),
        );

        let ranked = rank::top_k_by(revenue.into_iter().collect(), k, |a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.name().cmp(b.0.name()))
                .then_with(|| a.0.year_founded().cmp(&b.0.year_founded()))
                .then_with(|| a.0.country().cmp(b.0.country()))
        });
        Ok(ranked.into_iter().map(|(provider, _)| provider).collect())
    }
}
