use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// EVM networks a recipient can be paid on, keyed by chain id.
///
/// https://chainlist.org
pub enum Network {
    Ethereum = 1,
    Polygon = 137,
    Base = 8453,
    ArbitrumOne = 42161,
    Linea = 59144,
    Optimism = 10,
    AvalancheC = 43114,
}

impl Network {
    pub fn chain_id(self) -> u64 {
        self as u64
    }

    pub fn from_chain_id(id: u64) -> Option<Self> {
        match id {
            1 => Some(Network::Ethereum),
            137 => Some(Network::Polygon),
            8453 => Some(Network::Base),
            42161 => Some(Network::ArbitrumOne),
            59144 => Some(Network::Linea),
            10 => Some(Network::Optimism),
            43114 => Some(Network::AvalancheC),
            _ => None,
        }
    }

    /// Human-readable network name.
    pub fn name(self) -> &'static str {
        match self {
            Network::Ethereum => "Ethereum",
            Network::Polygon => "Polygon",
            Network::Base => "Base",
            Network::ArbitrumOne => "Arbitrum One",
            Network::Linea => "Linea",
            Network::Optimism => "Optimism",
            Network::AvalancheC => "Avalanche C-Chain",
        }
    }

    /// Base URL of the block explorer for this network.
    pub fn explorer_base(self) -> &'static str {
        match self {
            Network::Ethereum => "https://etherscan.io/",
            Network::Polygon => "https://polygonscan.com/",
            Network::Base => "https://basescan.org/",
            Network::ArbitrumOne => "https://arbiscan.io/",
            Network::Linea => "https://lineascan.build/",
            Network::Optimism => "https://optimistic.etherscan.io/",
            Network::AvalancheC => "https://snowtrace.io/",
        }
    }

    /// Explorer page of an address on this network.
    pub fn address_url(self, address: &str) -> Result<Url, url::ParseError> {
        Url::parse(self.explorer_base())?.join(&format!("address/{address}"))
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.chain_id())
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.chain_id())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        Network::from_chain_id(value).ok_or_else(|| {
            serde::de::Error::invalid_value(
                serde::de::Unexpected::Unsigned(value),
                &"one of 1, 137, 8453, 42161, 59144, 10, 43114",
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Stablecoins a payment can settle in.
#[serde(rename_all = "UPPERCASE")]
pub enum Stablecoin {
    Eurc,
    Usdc,
    Usdt,
    Dai,
}

impl Stablecoin {
    pub fn symbol(self) -> &'static str {
        match self {
            Stablecoin::Eurc => "EURC",
            Stablecoin::Usdc => "USDC",
            Stablecoin::Usdt => "USDT",
            Stablecoin::Dai => "DAI",
        }
    }
}

impl std::fmt::Display for Stablecoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Fiat currency prices are quoted in. Stablecoins settle 1:1 with it.
#[serde(rename_all = "UPPERCASE")]
pub enum FiatCurrency {
    Eur,
    Usd,
}

impl FiatCurrency {
    pub fn code(self) -> &'static str {
        match self {
            FiatCurrency::Eur => "EUR",
            FiatCurrency::Usd => "USD",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            FiatCurrency::Eur => "€",
            FiatCurrency::Usd => "$",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_serializes_as_chain_id() {
        assert_eq!(serde_json::to_string(&Network::Ethereum).unwrap(), "1");
        let base: Network = serde_json::from_str("8453").unwrap();
        assert_eq!(base, Network::Base);
        assert!(serde_json::from_str::<Network>("5").is_err());
    }

    #[test]
    fn explorer_address_url() {
        let url = Network::Ethereum.address_url("0xabc").unwrap();
        assert_eq!(url.as_str(), "https://etherscan.io/address/0xabc");
    }

    #[test]
    fn stablecoin_wire_names() {
        assert_eq!(serde_json::to_string(&Stablecoin::Eurc).unwrap(), "\"EURC\"");
        assert_eq!(serde_json::to_string(&FiatCurrency::Eur).unwrap(), "\"EUR\"");
    }
}
