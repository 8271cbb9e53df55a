pub const APP_NAME: &str = "bindisc";

/// File name of the JSON store within the data directory.
pub const STORE_FILENAME: &str = "store.json";

/// Environment variable overriding the store file location.
pub const STORE_ENV_VAR: &str = "BINDISC_STORE";

/// Query language assumed when a binding does not name one.
pub const DEFAULT_LANGUAGE: &str = "glob";

/// Reserved backend key holding the query index snapshot.
pub const QUERY_INDEX_KEY: &str = "//queryIndex";

/// Reserved backend key holding the type index snapshot.
pub const TYPE_INDEX_KEY: &str = "//typeIndex";

/// Reserved backend key holding the next binding ID to hand out.
pub const NEXT_ID_KEY: &str = "//nextId";
