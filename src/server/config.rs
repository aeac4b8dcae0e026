use anyhow::Result;
use vision::annotate::VisionConfig;

use crate::common::vision_config_from_lookup;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
    pub vision: VisionConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => port.parse::<u16>()
                .map_err(|e| anyhow::anyhow!("Invalid PORT value {:?}: {}", port, e))?,
            None => DEFAULT_PORT,
        };
        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(limit) => limit.parse::<usize>()
                .map_err(|e| anyhow::anyhow!("Invalid MAX_UPLOAD_BYTES value {:?}: {}", limit, e))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            port,
            max_upload_bytes,
            vision: vision_config_from_lookup(&lookup)?,
        })
    }
}
