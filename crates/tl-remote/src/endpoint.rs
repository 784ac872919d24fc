/// HTTP endpoint paths of the ledger API, relative to the configured base URL.
pub mod endpoints {
    pub const CREATE: &str = "/create";
    pub const TRANSACT: &str = "/transact";
    pub const QUERY: &str = "/query";
}

/// Path prefix the ledger API is served under.
pub const BASE_PATH: &str = "/fluree";

/// Default port of a locally running ledger.
pub const DEFAULT_PORT: u16 = 58090;
