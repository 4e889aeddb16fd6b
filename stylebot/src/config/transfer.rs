//! Style-transfer config: where images live, how inference is invoked, how long idle conversations are kept.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use style_worker::ScriptConfig;

use super::base::parse_var;

#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// IMAGES_DIR: uploaded style/content images.
    pub images_dir: PathBuf,
    /// RESULTS_DIR: per-task result images.
    pub results_dir: PathBuf,
    /// PYTHON_BIN
    pub python: String,
    /// NST_SCRIPT
    pub nst_script: PathBuf,
    /// GAN_SCRIPT
    pub gan_script: PathBuf,
    /// GAN_CHECKPOINTS_DIR
    pub gan_checkpoints_dir: PathBuf,
    /// GAN_RESULT_PATH: fixed file the GAN script writes its result to.
    pub gan_result: PathBuf,
    /// STATE_TTL_SECS: conversations untouched this long are dropped.
    pub state_ttl_secs: u64,
}

impl TransferConfig {
    pub fn from_env() -> Result<Self> {
        let path_var = |name: &str, default: &str| {
            PathBuf::from(env::var(name).unwrap_or_else(|_| default.to_string()))
        };
        Ok(Self {
            images_dir: path_var("IMAGES_DIR", "images"),
            results_dir: path_var("RESULTS_DIR", "images/result"),
            python: env::var("PYTHON_BIN").unwrap_or_else(|_| "python".to_string()),
            nst_script: path_var("NST_SCRIPT", "models/NST/nst.py"),
            gan_script: path_var("GAN_SCRIPT", "models/GAN/test.py"),
            gan_checkpoints_dir: path_var("GAN_CHECKPOINTS_DIR", "models/GAN/weights"),
            gan_result: path_var("GAN_RESULT_PATH", "images/result/res.jpg"),
            state_ttl_secs: parse_var("STATE_TTL_SECS", 3600)?,
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.state_ttl_secs == 0 {
            anyhow::bail!("STATE_TTL_SECS must be greater than zero");
        }
        if self.python.trim().is_empty() {
            anyhow::bail!("PYTHON_BIN must not be empty");
        }
        Ok(())
    }

    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_secs)
    }

    /// Script settings for [`style_worker::ScriptInference`].
    pub fn script_config(&self) -> ScriptConfig {
        ScriptConfig {
            python: self.python.clone(),
            nst_script: self.nst_script.clone(),
            gan_script: self.gan_script.clone(),
            gan_checkpoints_dir: self.gan_checkpoints_dir.clone(),
            gan_result: self.gan_result.clone(),
        }
    }
}
