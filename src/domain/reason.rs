use std::fmt;

/// Why the user says an item is being used up. Richer than what the
/// inventory service can store; see [`crate::reason_mapper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonTag {
    RecipeConsumption,
    Duplicate,
    ShortShelf,
    BoughtTooMuch,
    Custom,
}

impl ReasonTag {
    #[cfg(test)]
    pub const ALL: [ReasonTag; 5] = [
        ReasonTag::RecipeConsumption,
        ReasonTag::Duplicate,
        ReasonTag::ShortShelf,
        ReasonTag::BoughtTooMuch,
        ReasonTag::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReasonTag::RecipeConsumption => "recipe_consumption",
            ReasonTag::Duplicate => "duplicate",
            ReasonTag::ShortShelf => "short_shelf",
            ReasonTag::BoughtTooMuch => "bought_too_much",
            ReasonTag::Custom => "custom",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed set of reason codes accepted by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCode {
    Expired,
    Other,
}

impl ReasonCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasonCode::Expired => "expired",
            ReasonCode::Other => "other",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
