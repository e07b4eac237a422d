//! Options → ordered sink list

use super::{DATE_PLACEHOLDER, DirectoryProvisioner, FileRotation, SinkDescriptor, SinkKind, Tier};
use crate::config::LogConfig;
use crate::format::{FormatPipeline, HumanFormat};
use crate::level::Severity;

/// Result of composing a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Sinks in precedence order: console first, then error, warn, info,
    /// combined and debug file tiers
    pub sinks: Vec<SinkDescriptor>,
    /// Overall floor, handed to the transport as its default
    pub default_floor: Severity,
    /// Problems met while composing (e.g. the directory could not be created)
    pub diagnostics: Vec<String>,
}

impl Composition {
    /// File sinks only
    pub fn file_sinks(&self) -> impl Iterator<Item = &SinkDescriptor> {
        self.sinks.iter().filter(|sink| !sink.is_console())
    }

    /// The console sink, if enabled
    pub fn console(&self) -> Option<&SinkDescriptor> {
        self.sinks.iter().find(|sink| sink.is_console())
    }

    /// File sink of a tier
    pub fn tier(&self, tier: Tier) -> Option<&SinkDescriptor> {
        self.sinks.iter().find(|sink| sink.tier() == Some(tier))
    }
}

/// Compose the sink list for a configuration
///
/// Never fails: if the log directory cannot be provisioned the file tiers are
/// left out and a diagnostic is recorded, the console sink is unaffected.
pub fn compose(config: &LogConfig, provisioner: &dyn DirectoryProvisioner) -> Composition {
    let production = config.is_production();
    let mut sinks = Vec::with_capacity(6);
    let mut diagnostics = Vec::new();

    if config.console {
        // production consoles never go below info, whatever the configured floor
        let floor = if production { Severity::Info } else { config.level };
        sinks.push(SinkDescriptor {
            kind: SinkKind::Console,
            floor,
            format: FormatPipeline::Human(HumanFormat::new(production)),
        });
    }

    if config.file && !config.directory.as_os_str().is_empty() {
        match provisioner.ensure(&config.directory) {
            Ok(()) => sinks.extend(file_tiers(config)),
            Err(e) => {
                tracing::warn!(
                    directory = %config.directory.display(),
                    error = %e,
                    "File logging disabled: log directory unavailable"
                );
                diagnostics.push(format!("File logging disabled: {e}"));
            }
        }
    }

    Composition {
        sinks,
        default_floor: config.level,
        diagnostics,
    }
}

fn file_tiers(config: &LogConfig) -> Vec<SinkDescriptor> {
    let mut tiers = vec![
        (Tier::Error, Severity::Error, config.max_files.saturating_mul(2)),
        (Tier::Warn, Severity::Warn, config.max_files),
        (Tier::Info, Severity::Info, config.max_files),
        (Tier::Combined, config.level, config.max_files),
    ];
    if !config.is_production() || config.level.is_diagnostic() {
        tiers.push((Tier::Debug, Severity::Debug, config.max_files));
    }

    tiers
        .into_iter()
        .map(|(tier, floor, max_files)| SinkDescriptor {
            kind: SinkKind::RotatingFile(FileRotation {
                tier,
                directory: config.directory.clone(),
                filename: format!("{tier}-{DATE_PLACEHOLDER}.log"),
                date_pattern: config.date_pattern.clone(),
                max_size: config.max_size.clone(),
                max_files,
                compress: config.compress,
            }),
            floor,
            format: FormatPipeline::Structured,
        })
        .collect()
}
