use smol_str::SmolStr;

use crate::types::DEFAULT_TYPE_NAME;

/// Configuration for [`RecordFactory::with_config`](crate::RecordFactory::with_config).
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Type name used when a factory call does not name its record type.
    ///
    /// Default: `"SlotsObject"`.
    pub default_name: SmolStr,
    /// Initial capacity of each type cache. Caches grow past it as needed;
    /// nothing is ever evicted to stay under it.
    ///
    /// Default: 64 types.
    pub cache_capacity: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            default_name: SmolStr::new_static(DEFAULT_TYPE_NAME),
            cache_capacity: 64,
        }
    }
}
