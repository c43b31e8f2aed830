//! System-wide constants for the TempoPilot settlement engine.

/// Number of decimal places in the ledger currency (cents).
pub const CURRENCY_DECIMALS: u32 = 2;

/// Minor units per major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Decimal places of the stablecoin tokens on the settlement network.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 6;

/// Highest token precision accepted by configuration.
pub const MAX_TOKEN_DECIMALS: u32 = 18;

/// Basis points in one whole (100%).
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Default swap slippage tolerance in basis points.
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;

/// Default price impact tolerance in basis points.
pub const DEFAULT_IMPACT_TOLERANCE_BPS: u32 = 20;

/// Default swap amount (major units of the input asset).
pub const DEFAULT_SWAP_AMOUNT: i64 = 100;

/// Maximum number of entries retained by the audit trail.
pub const AUDIT_TRAIL_CAPACITY: usize = 300;

/// Maximum number of committed settlement legs remembered per session.
pub const SETTLED_LEG_CAPACITY: usize = 10_000;

/// Network the live executor is expected to be pointed at (Tempo Moderato testnet).
pub const EXPECTED_NETWORK_ID: u64 = 42_431;

/// Memo attached to payments when the caller supplies none.
pub const DEFAULT_PAYMENT_MEMO: &str = "TempoPilot Payment";

/// Prefix of settlement leg memos: `SPLIT|<from>|<to>|<unix ms>`.
pub const SETTLEMENT_MEMO_PREFIX: &str = "SPLIT";

/// Size of an on-chain memo in bytes.
pub const MEMO_BYTES: usize = 32;

/// Length of an address-like identifier: `0x` + 40 hex digits.
pub const ADDRESS_LEN: usize = 42;

/// Block explorer used for transaction links.
pub const DEFAULT_EXPLORER_BASE: &str = "https://explore.tempo.xyz/tx/";

/// Simulated quotes return `amount_in * NUM / DEN` (a 20 bps spread).
pub const SIMULATED_QUOTE_RATE_NUM: u128 = 998;

/// Denominator for [`SIMULATED_QUOTE_RATE_NUM`].
pub const SIMULATED_QUOTE_RATE_DEN: u128 = 1_000;

/// Balance reported by the simulated executor for every asset (1,000,000.00).
pub const SIMULATED_BALANCE_MINOR: i64 = 100_000_000;

/// AlphaUSD stablecoin (default payment asset).
pub const ALPHA_USD: &str = "0x20c0000000000000000000000000000000000001";

/// BetaUSD stablecoin.
pub const BETA_USD: &str = "0x20c0000000000000000000000000000000000002";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TempoPilot";
