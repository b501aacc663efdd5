use chrono::Duration;
use serde::Serialize;

/// Price charged for a service name that is not in the catalog.
pub const DEFAULT_PRICE: u32 = 0;
/// Duration assumed for a service name that is not in the catalog.
pub const DEFAULT_DURATION_MINUTES: i64 = 30;

/// A single offered service with its price and how long it takes.
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub name: String,
    pub price: u32,
    pub duration_minutes: i64,
}

/// Read-only mapping from service name to price and duration. Lookups for
/// unknown names never fail; they fall back to the defaults above so that a
/// stale appointment row can still be billed and scheduled.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Self {
        ServiceCatalog { services }
    }

    /// The salon's standard offering.
    pub fn standard() -> Self {
        let entries = [
            ("Haircut", 80, 30),
            ("Shaving", 150, 15),
            ("Hair Coloring", 100, 90),
            ("Facial", 200, 45),
            ("Manicure", 400, 30),
            ("Pedicure", 300, 45),
            ("Massage", 200, 60),
        ];
        ServiceCatalog::new(
            entries
                .into_iter()
                .map(|(name, price, duration_minutes)| Service {
                    name: name.to_string(),
                    price,
                    duration_minutes,
                })
                .collect(),
        )
    }

    fn find(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn price(&self, name: &str) -> u32 {
        self.find(name).map_or(DEFAULT_PRICE, |s| s.price)
    }

    pub fn duration_minutes(&self, name: &str) -> i64 {
        self.find(name)
            .map_or(DEFAULT_DURATION_MINUTES, |s| s.duration_minutes)
    }

    pub fn total_price(&self, services: &[String]) -> u32 {
        services.iter().map(|s| self.price(s)).sum()
    }

    /// Summed duration of a service selection, used by the slot query.
    pub fn total_duration(&self, services: &[String]) -> Duration {
        Duration::minutes(services.iter().map(|s| self.duration_minutes(s)).sum())
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }
}
