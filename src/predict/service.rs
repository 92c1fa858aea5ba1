//! Strength prediction service
//!
//! Owns a read-only model and its optional paired scaler, validates each
//! mix, and runs the fixed pipeline: assemble the feature vector in
//! training order, scale if the model was fit on scaled inputs, infer,
//! then round the result to 4 decimal places.

use crate::mix::{validate_mix, MixDesign, Unit, ZeroPolicy};
use crate::model::artifact::{ModelArtifact, ScalerArtifact, VerificationSample};
use crate::model::ensemble::GradientBoostedRegressor;
use crate::model::scaler::FeatureScaler;
use crate::model::store::LoadedArtifacts;
use crate::{round_to, ConcreteError, Result, StrengthClass, StrengthPrediction};

/// Decimal places kept on the stored result
pub const RESULT_DECIMALS: u32 = 4;

/// Predictor for making strength predictions
#[derive(Debug)]
pub struct Predictor {
    model: GradientBoostedRegressor,
    scaler: Option<FeatureScaler>,
    policy: ZeroPolicy,
}

impl Predictor {
    /// Build a predictor from loaded artifacts.
    ///
    /// Rejects inconsistent deployments up front: a model fit on scaled
    /// inputs must come with the scaler it was fit alongside, a model fit
    /// on raw inputs must not, and the pairing tag and arity must agree.
    pub fn from_artifacts(
        model: &ModelArtifact,
        scaler: Option<&ScalerArtifact>,
        policy: ZeroPolicy,
    ) -> Result<Self> {
        if model.scaled_inputs && scaler.is_none() {
            return Err(ConcreteError::Config(format!(
                "model {} was fit on scaled inputs but no scaler_path is configured",
                model.model_id
            )));
        }
        if !model.scaled_inputs && scaler.is_some() {
            return Err(ConcreteError::Config(format!(
                "model {} was fit on raw inputs; remove scaler_path",
                model.model_id
            )));
        }
        if let Some(paired) = scaler {
            if paired.model_id != model.model_id {
                return Err(ConcreteError::Config(format!(
                    "scaler was fit alongside model {} but the loaded model is {}",
                    paired.model_id, model.model_id
                )));
            }
            if paired.scaler.feature_count() != model.model.n_features {
                return Err(ConcreteError::ScalingMismatch {
                    expected: paired.scaler.feature_count(),
                    actual: model.model.n_features,
                });
            }
        }

        Ok(Predictor {
            model: model.model.clone(),
            scaler: scaler.map(|s| s.scaler.clone()),
            policy,
        })
    }

    /// Build a predictor from a store-loaded bundle
    pub fn from_loaded(artifacts: &LoadedArtifacts, policy: ZeroPolicy) -> Result<Self> {
        Self::from_artifacts(&artifacts.model, artifacts.scaler.as_ref(), policy)
    }

    /// Predict strength for a canonical-unit mix
    pub fn predict(&self, mix: &MixDesign) -> Result<StrengthPrediction> {
        let report = validate_mix(mix, self.policy)?;
        if !report.is_in_range() {
            log::warn!(
                "Mix extrapolates outside the training ranges: {}",
                report.extrapolated.join(", ")
            );
        }

        let vector = mix.to_vector();
        log::debug!("Feature vector: {:?}", vector);
        let strength = self.predict_vector(&vector)?;

        Ok(StrengthPrediction {
            strength,
            class: StrengthClass::from_strength(strength),
            confidence: report.confidence(),
            extrapolated: report.extrapolated,
        })
    }

    /// Predict for a mix entered in `unit`, converting mass fields first
    pub fn predict_in_unit(&self, mix: &MixDesign, unit: Unit) -> Result<StrengthPrediction> {
        self.predict(&mix.to_canonical(unit))
    }

    /// Predict a batch of mixes, one result per mix
    pub fn predict_batch(&self, mixes: &[MixDesign]) -> Vec<Result<StrengthPrediction>> {
        mixes.iter().map(|mix| self.predict(mix)).collect()
    }

    /// Replay a verification sample recorded at export time.
    ///
    /// Returns true when the pipeline reproduces the recorded output.
    pub fn verify(&self, sample: &VerificationSample) -> Result<bool> {
        let output = self.predict_vector(&sample.input)?;
        Ok((output - sample.output).abs() < 1e-9)
    }

    pub fn scales_inputs(&self) -> bool {
        self.scaler.is_some()
    }

    /// Scale if configured, infer, clamp and round
    fn predict_vector(&self, vector: &[f64]) -> Result<f64> {
        let raw = match &self.scaler {
            Some(scaler) => self.model.predict(&scaler.transform(vector)?)?,
            None => self.model.predict(vector)?,
        };
        // Strength is physically non-negative
        Ok(round_to(raw.max(0.0), RESULT_DECIMALS))
    }
}

/// Format a prediction for display
pub fn format_prediction(pred: &StrengthPrediction, mix: &MixDesign) -> String {
    let mut out = format!(
        r#"
┌─────────────────────────────────────────────────┐
│  cement {:.0} / slag {:.0} / ash {:.0} / water {:.0}
│  sp {:.1} / coarse {:.0} / fine {:.0} / age {} d
├─────────────────────────────────────────────────┤
│  Strength:    {:.2} N/mm²
│  Class:       {}
│  Confidence:  {}
"#,
        mix.cement,
        mix.blast_furnace_slag,
        mix.fly_ash,
        mix.water,
        mix.superplasticizer,
        mix.coarse_aggregate,
        mix.fine_aggregate,
        mix.age_days,
        pred.strength,
        pred.class,
        pred.confidence
    );
    if !pred.extrapolated.is_empty() {
        out.push_str(&format!(
            "│  Outside training ranges: {}\n",
            pred.extrapolated.join(", ")
        ));
    }
    out.push_str("└─────────────────────────────────────────────────┘\n");
    out
}
