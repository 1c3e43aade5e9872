//! Entropy Keylab
//!
//! An experimental harness that compares randomness sources by their
//! statistical quality and by how well keys derived from them resist
//! recovery attacks.
//!
//! # Architecture
//!
//! Every source group follows the same pipeline:
//!
//! ```text
//! source → bits → analysis
//!            ↓
//!         key derivation → AES-256-CTR → attack → outcome
//! ```
//!
//! # Design Principles
//!
//! - **Owned generator state**: the seeded generator is a value, never a global
//! - **Exclusive channel access**: the physical device is opened and closed around each read
//! - **Exhaustion is an outcome**: attacks report `Exhausted`, they do not fail
//! - **No cryptographic claims**: the cipher usage is illustrative, statistics are comparisons
//!
//! # Example
//!
//! ```no_run
//! use entropy_keylab::{
//!     attack::SeedSearchAttack,
//!     crypto::{encrypt, KeyMaterial},
//!     source::{BitSource, SeededBitSource},
//!     StatReport,
//! };
//!
//! let bits = SeededBitSource::new(42).generate(256).unwrap();
//! println!("{:?}", StatReport::analyze(&bits));
//!
//! let material = KeyMaterial::derive(&bits).unwrap();
//! let ciphertext = encrypt(&material, "hello");
//!
//! let result = SeedSearchAttack::new(100).run(&ciphertext, "hello");
//! assert_eq!(result.seed(), Some(42));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod attack;
pub mod bits;
pub mod config;
pub mod crypto;
pub mod experiment;
pub mod source;

// Re-export commonly used types at crate root
pub use analysis::StatReport;
pub use attack::{AttackResult, AttackState, BoundedBruteForce, SeedSearchAttack};
pub use bits::{BitSequence, KEY_BITS};
pub use config::{AttackConfig, ChannelConfig, ExperimentConfig};
pub use crypto::{decrypt, encrypt, Ciphertext, KeyMaterial};
pub use experiment::{Experiment, ExperimentReport, GroupOutcome, GroupReport};
pub use source::{BitSource, SourceKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
