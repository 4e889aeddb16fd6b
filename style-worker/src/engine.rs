//! Inference boundary. The worker calls [`InferenceEngine::run`] synchronously on its own thread;
//! the engine must leave the result image at `output` and report failure through the return value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{info, warn};

use crate::error::InferenceError;
use crate::task::TaskInputs;

/// Max stderr bytes kept in [`InferenceError::Failed`].
const STDERR_TAIL: usize = 2048;

/// Runs one style transfer. Blocking; called only from the worker thread.
pub trait InferenceEngine: Send + Sync {
    fn run(&self, inputs: &TaskInputs, output: &Path) -> Result<(), InferenceError>;
}

/// Interpreter and script locations for [`ScriptInference`].
#[derive(Debug, Clone)]
pub struct ScriptConfig {
    pub python: String,
    pub nst_script: PathBuf,
    pub gan_script: PathBuf,
    pub gan_checkpoints_dir: PathBuf,
    /// Fixed path the GAN script writes its result to.
    pub gan_result: PathBuf,
}

/// Engine that runs the pretrained NST / CycleGAN scripts as child processes.
///
/// NST: `<python> <nst_script> --style S --content C --output O`
///
/// GAN: `<python> <gan_script> --dataroot R --checkpoints_dir D --name <model>_pretrained --model test --no_dropout`
///
/// The CycleGAN script translates every image under `R` and always writes to the same file, so
/// the content image is staged alone in a per-task dataroot and the fixed result is moved to the
/// task's output afterwards. Only safe with one inference at a time, which the worker guarantees.
#[derive(Debug, Clone)]
pub struct ScriptInference {
    config: ScriptConfig,
}

impl ScriptInference {
    pub fn new(config: ScriptConfig) -> Self {
        Self { config }
    }

    /// Builds the child process command for the given inputs.
    pub fn command(&self, inputs: &TaskInputs, output: &Path) -> Command {
        let mut cmd = Command::new(&self.config.python);
        match inputs {
            TaskInputs::StyleTransfer { style, content } => {
                cmd.arg(&self.config.nst_script)
                    .arg("--style")
                    .arg(style)
                    .arg("--content")
                    .arg(content)
                    .arg("--output")
                    .arg(output);
            }
            TaskInputs::GanTransfer { variant, .. } => {
                cmd.arg(&self.config.gan_script)
                    .arg("--dataroot")
                    .arg(gan_dataroot(output))
                    .arg("--checkpoints_dir")
                    .arg(&self.config.gan_checkpoints_dir)
                    .arg("--name")
                    .arg(format!("{}_pretrained", variant.model_name()))
                    .args(["--model", "test", "--no_dropout"]);
            }
        }
        cmd
    }

    fn run_script(&self, inputs: &TaskInputs, output: &Path) -> Result<(), InferenceError> {
        let kind = inputs.kind();
        info!(kind = kind.as_str(), output = %output.display(), "Starting inference process");

        let result = self
            .command(inputs, output)
            .output()
            .map_err(InferenceError::Spawn)?;

        if result.status.success() {
            info!(kind = kind.as_str(), "Inference process finished");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&result.stderr);
        let tail_start = stderr.len().saturating_sub(STDERR_TAIL);
        let tail = stderr
            .get(tail_start..)
            .unwrap_or(stderr.as_ref())
            .trim()
            .to_string();
        warn!(
            kind = kind.as_str(),
            status = %result.status,
            stderr = %tail,
            "Inference process failed"
        );
        Err(InferenceError::Failed {
            status: result.status.to_string(),
            stderr: tail,
        })
    }

    fn run_gan(
        &self,
        inputs: &TaskInputs,
        content: &Path,
        output: &Path,
    ) -> Result<(), InferenceError> {
        let dataroot = gan_dataroot(output);
        let result = stage_content(content, &dataroot).and_then(|()| {
            remove_if_exists(&self.config.gan_result)?;
            self.run_script(inputs, output)?;
            self.collect_gan_result(output)
        });
        if let Err(e) = fs::remove_dir_all(&dataroot) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(error = %e, dataroot = %dataroot.display(), "Failed to remove GAN dataroot");
            }
        }
        result
    }

    fn collect_gan_result(&self, output: &Path) -> Result<(), InferenceError> {
        let produced = &self.config.gan_result;
        if !produced.exists() {
            return Err(InferenceError::MissingOutput(produced.clone()));
        }
        // rename fails across filesystems; fall back to copying.
        if fs::rename(produced, output).is_err() {
            fs::copy(produced, output)?;
            fs::remove_file(produced)?;
        }
        Ok(())
    }
}

/// Per-task input directory for the GAN script, next to the task's result file.
pub fn gan_dataroot(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "task".to_string());
    output.with_file_name(format!("{}-dataroot", stem))
}

fn stage_content(content: &Path, dataroot: &Path) -> Result<(), InferenceError> {
    fs::create_dir_all(dataroot)?;
    let name = content
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("content.jpg"));
    fs::copy(content, dataroot.join(name))?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

impl InferenceEngine for ScriptInference {
    fn run(&self, inputs: &TaskInputs, output: &Path) -> Result<(), InferenceError> {
        match inputs {
            TaskInputs::StyleTransfer { .. } => self.run_script(inputs, output),
            TaskInputs::GanTransfer { content, .. } => self.run_gan(inputs, content, output),
        }
    }
}
