use log::LevelFilter;
use std::io::Write;
use vision::annotate::VisionConfig;

pub const ENV_VISION_API_KEY: &str = "VISION_API_KEY";
pub const ENV_VISION_API_URL: &str = "VISION_API_URL";
pub const ENV_VISION_API_TIMEOUT_SECS: &str = "VISION_API_TIMEOUT_SECS";

pub fn init_logger_exe() {
    let name = std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());
    init_logger(name);
}

pub fn init_logger(name: impl Into<String>) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let mut builder = logger_builder(name, rust_log.as_deref());
    if let Ok(style) = std::env::var("RUST_LOG_STYLE") {
        builder.parse_write_style(&style);
    }
    builder.init();
}

/// Crate defaults first, then `rust_log` directives on top so they win for the same module.
pub fn logger_builder(name: impl Into<String>, rust_log: Option<&str>) -> env_logger::Builder {
    let crate_name = name.into().replace('-', "_");

    let mut builder = env_logger::Builder::new();
    builder
        .filter(Some(&crate_name), LevelFilter::Trace)
        .filter(Some("vision"), LevelFilter::Info);
    if let Some(filters) = rust_log {
        builder.parse_filters(filters);
    }

    builder.format(move |f, rec| {
        let now = humantime::format_rfc3339_millis(std::time::SystemTime::now());
        let module = rec.module_path().unwrap_or("<unknown>");
        let line = rec.line().unwrap_or(u32::MIN);
        let level = rec.level();

        writeln!(
            f,
            "[{} {} {} {}:{}] {}",
            level,
            crate_name,
            now,
            module,
            line,
            rec.args()
        )
    });
    builder
}

/// Builds the vision config from `VISION_API_*` variables; `lookup` is `std::env::var` outside tests.
pub fn vision_config_from_lookup<F>(lookup: F) -> anyhow::Result<VisionConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let timeout_secs = match lookup(ENV_VISION_API_TIMEOUT_SECS) {
        Some(value) => Some(value.parse::<u64>().map_err(|e| {
            anyhow::anyhow!("Invalid {} value {:?}: {}", ENV_VISION_API_TIMEOUT_SECS, value, e)
        })?),
        None => None,
    };

    Ok(VisionConfig::new(
        lookup(ENV_VISION_API_URL),
        lookup(ENV_VISION_API_KEY),
        timeout_secs,
    ))
}
