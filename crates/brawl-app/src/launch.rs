//! Match construction from command-line choices.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use brawl_ai::policy::{LinearPolicy, PolicyModel};
use brawl_core::config::CombatConfig;
use brawl_core::enums::*;
use brawl_sim::{MatchEngine, MatchSetup};

#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub mode: MatchMode,
    pub difficulty: Difficulty,
    pub seed: u64,
    pub characters: [CharacterKind; 2],
    /// JSON combat configuration. Defaults apply when absent.
    pub config: Option<PathBuf>,
    /// JSON weights for learned-policy controllers.
    pub policy: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::AiVsAi,
            difficulty: Difficulty::Normal,
            seed: 0,
            characters: [CharacterKind::Ryu, CharacterKind::Ken],
            config: None,
            policy: None,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<CombatConfig> {
    match path {
        Some(path) => CombatConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(CombatConfig::default()),
    }
}

/// Load policy weights. A missing or malformed file is not fatal: policy
/// sides then play with their rule-based fallback.
pub fn load_policy(path: &Path) -> Option<Arc<dyn PolicyModel>> {
    match LinearPolicy::load(path) {
        Ok(policy) => {
            info!(path = %path.display(), "loaded policy weights");
            let model: Arc<dyn PolicyModel> = Arc::new(policy);
            Some(model)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not load policy, using rule-based fallback");
            None
        }
    }
}

pub fn build_engine(options: &LaunchOptions) -> Result<MatchEngine> {
    let config = load_config(options.config.as_deref())?;
    let [one, two] = options.characters;
    let mut setup = MatchSetup::for_mode(options.mode, options.difficulty, options.seed)
        .with_characters(one, two);
    if let Some(model) = options.policy.as_deref().and_then(load_policy) {
        setup = setup.with_policy_model(model);
    }
    MatchEngine::new(config, setup).context("invalid combat configuration")
}
