/// Configuration constants for the inventory API
pub mod api {
    /// X-Amz-Target prefix for inventory (ECS) operations
    pub const ECS_TARGET_PREFIX: &str = "AmazonEC2ContainerServiceV20141113";

    /// X-Amz-Target prefix for session broker (SSM) operations
    pub const SSM_TARGET_PREFIX: &str = "AmazonSSM";

    /// Content type for AWS JSON 1.1 RPC calls
    pub const AMZ_JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

    /// Default page size for paginated list requests
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Maximum ids per describe call
    pub const MAX_DESCRIBE_BATCH: usize = 100;

    /// Maximum concurrent describe batches in flight
    pub const MAX_CONCURRENT_DESCRIBES: usize = 5;

    /// Hard ceiling on pages followed per listing, guards token cycles
    pub const MAX_PAGES: u32 = 1000;
}

/// Retry policy constants for inventory calls
pub mod retry {
    /// Total attempts per page request (first try included)
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Base backoff delay in milliseconds
    pub const BASE_DELAY_MS: u64 = 200;

    /// Backoff cap in milliseconds
    pub const MAX_DELAY_MS: u64 = 5_000;

    /// Jitter factor applied to each delay (0.2 = ±20%)
    pub const JITTER_FACTOR: f64 = 0.2;
}

/// Configuration constants for the persisted context
pub mod context {
    /// Directory under HOME holding the context file
    pub const DIR_NAME: &str = ".ecsctl";

    /// Context file name
    pub const FILE_NAME: &str = "config.json";
}

/// Configuration constants for credentials
pub mod credentials {
    /// Session token environment variable (checked first)
    pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";

    /// Access key pair environment variables (checked second)
    pub const ACCESS_KEY_ENV: &str = "AWS_ACCESS_KEY_ID";
    pub const SECRET_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";

    /// Profile selection environment variable
    pub const PROFILE_ENV: &str = "AWS_PROFILE";

    /// Role assumption identifier environment variable
    pub const ROLE_ARN_ENV: &str = "AWS_ROLE_ARN";

    /// Path to the shared credentials file (relative to HOME)
    pub const FILE_PATH: &str = ".aws/credentials";

    /// Profile used when none is named
    pub const DEFAULT_PROFILE: &str = "default";
}

/// Remote session constants
pub mod session {
    /// Tunnel plugin executable resolved from PATH
    pub const PLUGIN_BIN: &str = "session-manager-plugin";

    /// Operation name passed to the tunnel plugin
    pub const PLUGIN_OPERATION: &str = "StartSession";
}

/// Default values for CLI
pub mod defaults {
    /// Default region when neither flag, context nor AWS_REGION is set
    pub const REGION: &str = "ap-southeast-1";

    /// Region environment variable
    pub const REGION_ENV: &str = "AWS_REGION";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}
