//! Static metric tables, one module per analysis domain.

#[cfg(feature = "activity")]
pub mod activity;

#[cfg(feature = "composite")]
pub mod composite;

#[cfg(feature = "growth")]
pub mod growth;

#[cfg(feature = "leverage")]
pub mod leverage;

#[cfg(feature = "liquidity")]
pub mod liquidity;

#[cfg(feature = "market")]
pub mod market;

#[cfg(feature = "profitability")]
pub mod profitability;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "stability")]
pub mod stability;

#[cfg(feature = "structure")]
pub mod structure;
