pub mod panic;
pub mod rate_limit;
pub mod security_headers;
pub mod tracing;

pub use self::panic::panic_response;
pub use self::rate_limit::{IpRateLimiter, create_ip_rate_limiter, ip_rate_limit_middleware};
pub use self::security_headers::{SecurityHeaders, security_headers_middleware};
pub use self::tracing::{REQUEST_ID_HEADER, request_id_middleware};
