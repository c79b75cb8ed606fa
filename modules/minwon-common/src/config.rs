use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Postgres
    pub database_url: String,

    // Intake behavior
    pub intake: IntakeOptions,
}

/// Knobs for the intake path. The legacy service differed from the main one
/// in two ways (agency-name fallback lookup, step-by-step resolution
/// logging); both are flags here rather than a second code path.
#[derive(Debug, Clone)]
pub struct IntakeOptions {
    /// When the classifier supplies no usable agency code, fall back to an
    /// exact-name directory lookup on the supplied agency name.
    pub agency_name_fallback: bool,
    /// Emit each resolution step at info level instead of debug.
    pub verbose_resolution: bool,
    /// Spatial reference id for produced point geometries.
    pub geometry_srid: i32,
}

impl Default for IntakeOptions {
    fn default() -> Self {
        Self {
            agency_name_fallback: true,
            verbose_resolution: false,
            geometry_srid: 4326,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            database_url: required_env("DATABASE_URL"),
            intake: IntakeOptions {
                agency_name_fallback: env_flag("AGENCY_NAME_FALLBACK", true),
                verbose_resolution: env_flag("VERBOSE_RESOLUTION", false),
                geometry_srid: env::var("GEOMETRY_SRID")
                    .unwrap_or_else(|_| "4326".to_string())
                    .parse()
                    .expect("GEOMETRY_SRID must be a number"),
            },
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}

fn env_flag(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(v) => matches!(v.as_str(), "1" | "true" | "yes"),
        Err(_) => default,
    }
}
