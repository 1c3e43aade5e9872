//! End-to-end experiment over the four source groups.
//!
//! Each group runs generate → analyze → derive → encrypt → attack to
//! completion before the next starts. The seeded group is attacked by
//! seed search, every other group by bounded brute force. The whitened
//! group reuses the raw physical bits, so the two physical groups
//! compare the same device sample before and after hashing.
//!
//! A failing group is recorded as failed; the remaining groups still run.

use crate::analysis::StatReport;
use crate::attack::{AttackResult, BoundedBruteForce, SeedSearchAttack};
use crate::bits::BitSequence;
use crate::config::{ConfigError, ExperimentConfig};
use crate::crypto::{encrypt, Ciphertext, KeyError, KeyMaterial};
use crate::source::physical::collect_bits;
use crate::source::{
    whiten, BitSource, LineChannel, OsBitSource, SeededBitSource, SourceError, SourceKind,
};
use chrono::{DateTime, Local};
use serde::Serialize;
use thiserror::Error;

/// Errors that end a single group's pipeline.
#[derive(Debug, Clone, Error)]
pub enum ExperimentError {
    /// Bit generation failed.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// Key derivation failed.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Result of one group's pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupOutcome {
    /// The pipeline ran through the attack.
    Completed {
        /// Statistics of the generated bits.
        stats: StatReport,
        /// The encrypted message.
        ciphertext: Ciphertext,
        /// Outcome of the group's attack.
        attack: AttackResult,
    },
    /// The pipeline stopped before the attack.
    Failed {
        /// Rendered cause.
        error: String,
    },
}

/// Report for one source group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    /// Source of the group's bits.
    pub kind: SourceKind,
    /// What happened to the group.
    #[serde(flatten)]
    pub outcome: GroupOutcome,
}

impl GroupReport {
    /// Attack result, if the group completed.
    pub fn attack(&self) -> Option<&AttackResult> {
        match &self.outcome {
            GroupOutcome::Completed { attack, .. } => Some(attack),
            GroupOutcome::Failed { .. } => None,
        }
    }
}

/// Report for a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// Local time the run began.
    pub started_at: DateTime<Local>,
    /// Plaintext every group encrypted.
    pub message: String,
    /// One report per group, in experiment order.
    pub groups: Vec<GroupReport>,
}

impl ExperimentReport {
    /// Looks up a group by kind.
    pub fn group(&self, kind: SourceKind) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.kind == kind)
    }
}

/// A configured experiment.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Creates an experiment after validating `config`.
    pub fn new(config: ExperimentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Runs all four groups, reading physical bits from `channel`.
    pub fn run<C: LineChannel + ?Sized>(&self, channel: &mut C) -> ExperimentReport {
        let started_at = Local::now();
        let n = self.config.bit_count;
        tracing::info!(bits = n, seed = self.config.seed, "Starting experiment");

        let seeded = SeededBitSource::new(self.config.seed)
            .generate(n)
            .map_err(ExperimentError::from);
        let os = OsBitSource::new().generate(n).map_err(ExperimentError::from);
        let raw = collect_bits(channel, &self.config.channel, n)
            .map_err(|e| ExperimentError::from(SourceError::from(e)));
        let hashed = match &raw {
            Ok(bits) => whiten(bits).map_err(ExperimentError::from),
            Err(e) => Err(e.clone()),
        };

        let groups = [
            (SourceKind::DeterministicSeeded, seeded),
            (SourceKind::CryptoStrong, os),
            (SourceKind::PhysicalRaw, raw),
            (SourceKind::PhysicalHashed, hashed),
        ]
        .into_iter()
        .map(|(kind, bits)| self.run_group(kind, bits))
        .collect();

        ExperimentReport {
            started_at,
            message: self.config.message.clone(),
            groups,
        }
    }

    fn run_group(
        &self,
        kind: SourceKind,
        bits: Result<BitSequence, ExperimentError>,
    ) -> GroupReport {
        let outcome = match bits.and_then(|bits| self.pipeline(kind, &bits)) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(group = %kind, error = %e, "Group failed");
                GroupOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        GroupReport { kind, outcome }
    }

    fn pipeline(
        &self,
        kind: SourceKind,
        bits: &BitSequence,
    ) -> Result<GroupOutcome, ExperimentError> {
        let stats = StatReport::analyze(bits);
        tracing::debug!(
            group = %kind,
            one_frequency = stats.one_frequency,
            entropy = stats.entropy,
            p_value = stats.uniformity_p_value,
            "Analyzed bits"
        );

        let material = KeyMaterial::derive(bits)?;
        let ciphertext = encrypt(&material, &self.config.message);

        let attack_config = &self.config.attack;
        let attack = if kind.is_seedable() {
            SeedSearchAttack::new(attack_config.max_seed)
                .with_workers(attack_config.workers)
                .run(&ciphertext, &self.config.message)
        } else {
            BoundedBruteForce::new(attack_config.max_attempts)
                .with_workers(attack_config.workers)
                .run(&ciphertext, &self.config.message)
        };

        Ok(GroupOutcome::Completed {
            stats,
            ciphertext,
            attack,
        })
    }
}
