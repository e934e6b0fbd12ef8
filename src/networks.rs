/// Which wire format a service speaks
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ApiFlavor {
    /// Per-chain Safe Transaction Service (`/api/v1/...`), paginated by `next`
    TransactionService,
    /// Client-gateway style host (`/v1/chains/{chainId}/...`), shared by
    /// several chains and keyed by chain id
    Gateway,
}

/// Safe Transaction Service details
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TxService {
    /// Chain prefix, as in `eth:0x...`
    pub prefix: &'static str,
    /// URL of the service
    pub url: &'static str,
    /// Chain id of the network
    pub chain_id: u64,
    /// Wire format of the service
    pub flavor: ApiFlavor,
}

impl TxService {
    /// Const constructor for a transaction service host
    pub const fn new(prefix: &'static str, url: &'static str, chain_id: u64) -> Self {
        Self {
            prefix,
            url,
            chain_id,
            flavor: ApiFlavor::TransactionService,
        }
    }

    /// Const constructor for a gateway-style host
    pub const fn gateway(prefix: &'static str, url: &'static str, chain_id: u64) -> Self {
        Self {
            prefix,
            url,
            chain_id,
            flavor: ApiFlavor::Gateway,
        }
    }

    /// Runtime Lookup
    pub fn by_chain_id(chain_id: u64) -> Option<Self> {
        SERVICES
            .iter()
            .find(|service| service.chain_id == chain_id)
            .copied()
    }

    /// Runtime Lookup by chain prefix
    pub fn by_prefix(prefix: &str) -> Option<Self> {
        SERVICES
            .iter()
            .find(|service| service.prefix == prefix)
            .copied()
    }

    /// True if the service speaks the gateway format
    pub fn is_gateway(&self) -> bool {
        self.flavor == ApiFlavor::Gateway
    }
}

/// Safe client gateway, used by the alternative API for every chain
pub const CLIENT_GATEWAY_URL: &str = "https://safe-client.safe.global";

/// Chains served only by their legacy service. The client gateway does not
/// know about them.
pub const CLASSIC_ONLY_PREFIXES: &[&str] = &["trsk", "rsk_testnet"];

/// True if the prefix belongs to the classic-only chain family
pub fn is_classic_only(prefix: &str) -> bool {
    CLASSIC_ONLY_PREFIXES.contains(&prefix)
}

/// ETHEREUM
pub const ETHEREUM: TxService =
    TxService::new("eth", "https://safe-transaction-mainnet.safe.global", 1);
/// GOERLI
pub const GOERLI: TxService =
    TxService::new("gor", "https://safe-transaction-goerli.safe.global", 5);
/// OPTIMISM
pub const OPTIMISM: TxService =
    TxService::new("oeth", "https://safe-transaction-optimism.safe.global", 10);
/// BSC
pub const BSC: TxService = TxService::new("bnb", "https://safe-transaction-bsc.safe.global", 56);
/// GNOSIS_CHAIN
pub const GNOSIS_CHAIN: TxService =
    TxService::new("gno", "https://safe-transaction-gnosis-chain.safe.global", 100);
/// POLYGON
pub const POLYGON: TxService =
    TxService::new("matic", "https://safe-transaction-polygon.safe.global", 137);
/// BASE
pub const BASE: TxService = TxService::new("base", "https://safe-transaction-base.safe.global", 8453);
/// ARBITRUM
pub const ARBITRUM: TxService =
    TxService::new("arb1", "https://safe-transaction-arbitrum.safe.global", 42161);
/// ROOTSTOCK testnet
pub const ROOTSTOCK_TESTNET: TxService =
    TxService::gateway("trsk", "https://gateway.safe.rootstock.io", 31);
/// ROOTSTOCK testnet, long-form prefix
pub const RSK_TESTNET: TxService =
    TxService::gateway("rsk_testnet", "https://gateway.safe.rootstock.io", 31);

/// BINANCE_SMART_CHAIN (alias for BSC)
pub const BINANCE_SMART_CHAIN: TxService = BSC;

/// Iterable, deduplicated list of known services
pub const SERVICES: &[TxService] = &[
    ETHEREUM,
    GOERLI,
    OPTIMISM,
    BSC,
    GNOSIS_CHAIN,
    POLYGON,
    BASE,
    ARBITRUM,
    ROOTSTOCK_TESTNET,
    RSK_TESTNET,
];
