//! System-wide constants and documented defaults.

/// Default CPU units for a task definition.
pub const DEFAULT_CPU_UNITS: &str = "256";

/// Default memory, in MiB, for a task definition.
pub const DEFAULT_MEMORY_MIB: &str = "512";

/// Default port the container listens on.
pub const DEFAULT_CONTAINER_PORT: u32 = 80;

/// Default host port mapped to the container port.
pub const DEFAULT_HOST_PORT: u32 = 80;

/// Tasks get no public IP unless asked for one.
pub const DEFAULT_ASSIGN_PUBLIC_IP: bool = false;

/// Cluster name used by the managed profile when a manifest omits one.
pub const DEFAULT_MANAGED_CLUSTER_NAME: &str = "ContainerEnvComponentCluster";

/// Lowest valid TCP port.
pub const MIN_PORT: u32 = 1;

/// Highest valid TCP port.
pub const MAX_PORT: u32 = 65_535;

/// Key prefix under which registry records are addressed.
pub const DEFAULT_REGISTRY_PREFIX: &str = "/stackform";

/// Owning unit name used when none is configured.
pub const DEFAULT_UNIT_NAME: &str = "default";

/// Default manifest file looked up by the CLI.
pub const DEFAULT_MANIFEST_FILE: &str = "stackform.yaml";

/// Default registry file used by the CLI.
pub const DEFAULT_REGISTRY_FILE: &str = "stackform-registry.jsonl";
