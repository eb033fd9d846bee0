//! Application-wide constants
//!
//! Document field names, storage locations and validation patterns live here
//! so the codec, store and command line agree on a single value.

/// Wire document constants
pub mod document {
    /// Top-level map of element name to property records
    pub const DESIGN_PROPERTIES: &str = "designProperties";

    /// Web-only passthrough field
    pub const PAGE_TEMPLATES: &str = "pageTemplates";

    /// Web-only passthrough field
    pub const CSS_FILES: &str = "cssFiles";

    /// Gap between consecutive element positions
    pub const POSITION_STEP: i64 = 10;

    /// Offset that places a moved element strictly between two neighbours
    pub const POSITION_MIDPOINT: i64 = 5;

    /// Download name for Web documents
    pub const WEB_EXPORT_FILE: &str = "settings.json";

    /// Download name for Native documents
    pub const NATIVE_EXPORT_FILE: &str = "settings-native.json";

    /// Indentation used for exported JSON text
    pub const EXPORT_INDENT: usize = 4;
}

/// Storage and configuration locations
pub mod storage {
    /// Key under which the working document is persisted
    pub const STORAGE_KEY: &str = "__MX_DESIGN_PROPERTIES_TOOLKIT_SAVE";

    /// Directory name under the platform config/data dirs
    pub const APP_DIR: &str = "design-props";

    /// Settings file name inside the config dir
    pub const CONFIG_FILENAME: &str = "config.json";
}

/// Environment variable names
pub mod env {
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const STORAGE_PATH: &str = "DESIGN_PROPS_STORAGE";
    pub const DARK_MODE: &str = "DESIGN_PROPS_DARK_MODE";
}

/// Charset rules offered to editors before they call the store
pub mod validation {
    pub const DESIGN_PROPERTY: &str = "^[a-zA-Z.]+$";
    pub const CLASS_NAME_NATIVE: &str = "^[a-zA-Z]+$";
    pub const CLASS_NAME_WEB: &str = "^[a-z-_]+$";
}
