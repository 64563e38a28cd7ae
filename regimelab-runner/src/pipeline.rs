//! One detect → score → decide pipeline per configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use regimelab_core::config::{ConfigError, PipelineConfig};
use regimelab_core::decision::{Decision, DecisionEngine};
use regimelab_core::domain::{IndicatorRow, PriceBar};
use regimelab_core::regime::{create_detector, RegimeDetector, RegimeResult};
use regimelab_core::scoring::{ScoredSignal, SignalScorer};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Read and validate a TOML pipeline configuration.
pub fn load_config(path: &Path) -> Result<PipelineConfig, RunError> {
    let content = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PipelineConfig::from_toml(&content)?)
}

/// Everything known about one instrument/timeframe at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub instrument: String,
    pub timeframe: String,
    pub bars: Vec<PriceBar>,
    /// Indicator rows, oldest first; the last row is scored.
    pub rows: Vec<IndicatorRow>,
    pub htf: Option<IndicatorRow>,
}

impl MarketSnapshot {
    pub fn new(instrument: impl Into<String>, timeframe: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        Self {
            instrument: instrument.into(),
            timeframe: timeframe.into(),
            bars,
            rows: Vec::new(),
            htf: None,
        }
    }

    pub fn with_rows(mut self, rows: Vec<IndicatorRow>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_htf(mut self, htf: IndicatorRow) -> Self {
        self.htf = Some(htf);
        self
    }
}

/// Output of one pipeline pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub regime: RegimeResult,
    pub signal: ScoredSignal,
    pub decision: Decision,
}

/// Detector, scorer and decision engine built from one validated config.
pub struct Pipeline {
    config: PipelineConfig,
    fingerprint: String,
    detector: Box<dyn RegimeDetector>,
    scorer: SignalScorer,
    engine: DecisionEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        let detector = create_detector(&config)?;
        let scorer = SignalScorer::new(config.scorer.clone())?;
        let engine = DecisionEngine::new(config.decision.clone())?;
        let fingerprint = config.fingerprint();

        Ok(Self {
            config,
            fingerprint,
            detector,
            scorer,
            engine,
        })
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config = load_config(path)
            .with_context(|| format!("failed to load pipeline config from {}", path.display()))?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// blake3 fingerprint of the configuration this pipeline was built from.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn detector(&self) -> &dyn RegimeDetector {
        self.detector.as_ref()
    }

    pub fn evaluate(&self, snapshot: &MarketSnapshot) -> Evaluation {
        let regime = self.detector.detect(&snapshot.bars);
        let signal = self.scorer.score(
            &snapshot.rows,
            &regime,
            &snapshot.instrument,
            &snapshot.timeframe,
            snapshot.htf.as_ref(),
        );
        let decision = self.engine.decide(&signal.candidate(), Some(&regime));

        debug!(
            instrument = snapshot.instrument.as_str(),
            timeframe = snapshot.timeframe.as_str(),
            regime = regime.label(),
            score = signal.score,
            action = decision.action.as_str(),
            "snapshot evaluated"
        );

        Evaluation {
            regime,
            signal,
            decision,
        }
    }
}
