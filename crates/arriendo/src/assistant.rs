//! Chat assistant capability. The marketplace front end talks to a hosted
//! model through this trait; the deterministic rule-based adapter below
//! keeps the recommendation path testable and serves as the offline
//! fallback.

use std::sync::Arc;

use serde::Serialize;

use crate::billing::format;
use crate::listings::{Listing, ListingFilter, ListingService, InterestPublisher, ListingStore};

/// What the assistant hands back for one message: a rendered response plus
/// the listings it is recommending.
#[derive(Debug, Clone, Serialize)]
pub struct AssistantReply {
    pub response: String,
    pub recommendations: Vec<Listing>,
}

pub trait ChatAssistant: Send + Sync {
    fn reply(&self, message: &str) -> Result<AssistantReply, AssistantError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("assistant could not search the catalog: {0}")]
    Catalog(String),
}

/// Deterministic assistant: extracts a budget (the largest number in the
/// message, thousands dots tolerated) and a bedroom count (`"2D"` or
/// `"2 dormitorios"`) and recommends matching published listings, cheapest
/// first.
pub struct RuleBasedAssistant<S, I> {
    catalog: Arc<ListingService<S, I>>,
    limit: usize,
}

impl<S, I> RuleBasedAssistant<S, I>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    pub fn new(catalog: Arc<ListingService<S, I>>) -> Self {
        Self { catalog, limit: 3 }
    }

    fn filter_from(message: &str) -> ListingFilter {
        ListingFilter {
            max_rent: extract_budget(message),
            bedrooms: extract_bedrooms(message),
            ..ListingFilter::default()
        }
    }
}

impl<S, I> ChatAssistant for RuleBasedAssistant<S, I>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    fn reply(&self, message: &str) -> Result<AssistantReply, AssistantError> {
        let filter = Self::filter_from(message);
        let mut matches = self
            .catalog
            .search(&filter)
            .map_err(|err| AssistantError::Catalog(err.to_string()))?;
        matches.truncate(self.limit);

        let response = match (&filter.max_rent, matches.len()) {
            (_, 0) => {
                "No encontré propiedades que calcen con tu búsqueda. \
                 ¿Quieres intentar con otro presupuesto?"
                    .to_string()
            }
            (Some(budget), count) => format!(
                "Encontré {count} propiedades hasta {} que podrían interesarte.",
                format::clp(*budget)
            ),
            (None, count) => {
                format!("Estas son {count} propiedades destacadas del catálogo.")
            }
        };

        Ok(AssistantReply {
            response,
            recommendations: matches,
        })
    }
}

/// Largest plausible CLP amount in the message. Dots are treated as
/// thousands separators, so `"$450.000"` reads as 450000.
fn extract_budget(message: &str) -> Option<f64> {
    message
        .split(|ch: char| ch.is_whitespace() || matches!(ch, ',' | ';' | '?' | '!'))
        .filter_map(|token| {
            let cleaned: String = token
                .chars()
                .filter(|ch| ch.is_ascii_digit())
                .collect();
            // Below four digits it is a bedroom count or noise, not a rent.
            if cleaned.len() < 4 {
                return None;
            }
            cleaned.parse::<f64>().ok()
        })
        .fold(None, |best, value| match best {
            Some(current) if current >= value => Some(current),
            _ => Some(value),
        })
}

/// Bedroom count from `"2D"` shorthand or `"2 dormitorios"` phrasing.
fn extract_bedrooms(message: &str) -> Option<u8> {
    let lowered = message.to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    for (index, token) in tokens.iter().enumerate() {
        if let Some(digits) = token.strip_suffix('d') {
            if let Ok(count) = digits.parse::<u8>() {
                return Some(count);
            }
        }
        if token.starts_with("dormitorio") || token.starts_with("habitacion") {
            if let Some(previous) = index.checked_sub(1).and_then(|i| tokens.get(i)) {
                if let Ok(count) = previous.parse::<u8>() {
                    return Some(count);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_tolerates_dot_separators_and_currency_signs() {
        assert_eq!(extract_budget("busco algo por $450.000 al mes"), Some(450_000.0));
        assert_eq!(extract_budget("hasta 500000"), Some(500_000.0));
        assert_eq!(extract_budget("un 2D luminoso"), None);
    }

    #[test]
    fn budget_picks_the_largest_amount() {
        assert_eq!(
            extract_budget("entre 300.000 y 450.000"),
            Some(450_000.0)
        );
    }

    #[test]
    fn bedrooms_from_shorthand_and_phrasing() {
        assert_eq!(extract_bedrooms("busco un 2D en Providencia"), Some(2));
        assert_eq!(extract_bedrooms("depto de 3 dormitorios"), Some(3));
        assert_eq!(extract_bedrooms("algo céntrico"), None);
    }
}
