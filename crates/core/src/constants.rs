/// Memo attached to the first snapshot appended for a new account.
pub const MEMO_ACCOUNT_REGISTERED: &str = "account registered";

/// Memo attached to snapshots appended after a profile edit.
pub const MEMO_PROFILE_UPDATED: &str = "profile updated";

/// Memo attached to snapshots appended by the tokenization saga.
pub const MEMO_TOKENIZED_ASSET_MINTED: &str = "tokenized asset minted";

/// Ledger receipt status for an accepted transaction.
pub const RECEIPT_STATUS_SUCCESS: &str = "SUCCESS";

/// Symbol allow-listed for tokenization when no configuration is supplied.
pub const DEFAULT_ELIGIBLE_SYMBOL: &str = "AAPL";

/// Token backing [`DEFAULT_ELIGIBLE_SYMBOL`].
pub const DEFAULT_ELIGIBLE_TOKEN_ID: &str = "0.0.6509511";

/// Decimals of the default tokenized asset.
pub const DEFAULT_TOKEN_DECIMALS: u32 = 2;

/// Default brokerage portfolio history window.
pub const DEFAULT_HISTORY_PERIOD: &str = "30D";

/// Default brokerage portfolio history resolution.
pub const DEFAULT_HISTORY_TIMEFRAME: &str = "1H";
