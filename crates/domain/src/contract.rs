//! Fixed contract of the users service.
//!
//! Process-wide, read-only constants: default endpoint, resource path
//! templates, the static API key and the status codes each operation
//! answers with.

/// Default base URI of the service.
pub const DEFAULT_BASE_URI: &str = "https://reqres.in";

/// Default base path prepended to every resource path.
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Static API key sent on authenticated calls.
pub const DEFAULT_API_KEY: &str = "reqres-free-v1";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("reqres-suite/", env!("CARGO_PKG_VERSION"));

/// Collection endpoint (list and create).
pub const USERS_PATH: &str = "/users/";

/// Single-item endpoint.
pub const USER_BY_ID_PATH: &str = "/users/{id}";

/// Placeholder name used by [`USER_BY_ID_PATH`].
pub const USER_ID_PARAM: &str = "id";

/// Query parameter selecting a page of users.
pub const PAGE_PARAM: &str = "page";

/// JSON media type.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Strict creation timestamp format, `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub const ISO_TIMESTAMP_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$";

/// Status returned by list, get and update.
pub const STATUS_OK: u16 = 200;

/// Status returned by create.
pub const STATUS_CREATED: u16 = 201;

/// Status returned by delete.
pub const STATUS_NO_CONTENT: u16 = 204;

/// Status returned for an unknown user.
pub const STATUS_NOT_FOUND: u16 = 404;
