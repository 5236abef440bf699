use config_manager::PricingConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price class of an entrypoint; amounts come from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Basic,
    Standard,
    Premium,
}

/// Advertised price of one invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub tier: PriceTier,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount_usd: Decimal,
}

impl PriceTier {
    pub fn price(self, pricing: &PricingConfig) -> Price {
        let amount_usd = match self {
            PriceTier::Basic => pricing.basic_usd,
            PriceTier::Standard => pricing.standard_usd,
            PriceTier::Premium => pricing.premium_usd,
        };
        Price {
            tier: self,
            amount_usd,
        }
    }
}
