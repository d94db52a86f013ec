use serde::Serialize;

/// Target industries the dashboard can search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Construction,
    Logistics,
    Moving,
    Warehouse,
    Service,
    Trucking,
    FieldServices,
}

impl Industry {
    pub const ALL: [Industry; 7] = [
        Industry::Construction,
        Industry::Logistics,
        Industry::Moving,
        Industry::Warehouse,
        Industry::Service,
        Industry::Trucking,
        Industry::FieldServices,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Industry::Construction => "construction",
            Industry::Logistics => "logistics",
            Industry::Moving => "moving",
            Industry::Warehouse => "warehouse",
            Industry::Service => "service",
            Industry::Trucking => "trucking",
            Industry::FieldServices => "field_services",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|industry| industry.key() == key.trim())
    }

    /// Search phrases issued for this industry, each suffixed with " in {location}".
    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Industry::Construction => &[
                "construction companies",
                "general contractors",
                "building contractors",
            ],
            Industry::Logistics => &[
                "logistics companies",
                "freight forwarding",
                "supply chain companies",
            ],
            Industry::Moving => &["moving companies", "movers", "relocation services"],
            Industry::Warehouse => &[
                "warehouse companies",
                "warehousing services",
                "storage facilities",
            ],
            Industry::Service => &[
                "service companies",
                "field service companies",
                "maintenance companies",
            ],
            Industry::Trucking => &[
                "trucking companies",
                "freight carriers",
                "hauling companies",
            ],
            Industry::FieldServices => &[
                "field services",
                "mobile service companies",
                "on-site service providers",
            ],
        }
    }
}

/// Expand industry keys and an optional custom phrase into upstream text queries.
///
/// No key list selects every known industry; an explicit empty list selects none.
/// Unknown keys contribute nothing.
pub fn build_queries(
    location: &str,
    industries: Option<&[String]>,
    custom_query: Option<&str>,
) -> Vec<String> {
    let selected: Vec<Industry> = match industries {
        None => Industry::ALL.to_vec(),
        Some(keys) => keys
            .iter()
            .filter_map(|key| Industry::from_key(key))
            .collect(),
    };

    let mut queries: Vec<String> = selected
        .iter()
        .flat_map(|industry| industry.templates())
        .map(|template| format!("{template} in {location}"))
        .collect();

    if let Some(custom) = custom_query.map(str::trim).filter(|text| !text.is_empty()) {
        queries.push(format!("{custom} in {location}"));
    }

    queries
}
