//! Preprocessing pipeline: flatten, normalize, append bias, reduce.
//!
//! Every statistic (per-feature mean/std, PCA axes) is estimated on the
//! training split only and then applied unchanged to both splits.

use crate::config::PreprocessConfig;
use crate::data_handling::Dataset;
use crate::error::{HarnessError, Result};
use crate::math::Array2;
use crate::reduction::Pca;

/// Simple standard scaler (per-column mean/std).
#[derive(Clone, Debug)]
pub struct Scaler {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl Scaler {
    /// Standard deviations below this are treated as zero variance.
    pub const MIN_STD: f32 = 1e-6;
}

/// Fit a `Scaler` from an `Array2<f32>` where rows are samples and
/// columns are features.
///
/// Columns with (near) zero variance get a std of 1, so they are centred but
/// not scaled and never divide by zero.
pub fn fit_scaler(x: &Array2<f32>) -> Result<Scaler> {
    let (nrows, ncols) = x.shape();
    if nrows == 0 || ncols == 0 {
        return Err(HarnessError::EmptyInput("scaler input"));
    }

    let mut mean = vec![0.0f64; ncols];
    for row in x.rows() {
        for (acc, &v) in mean.iter_mut().zip(row) {
            *acc += v as f64;
        }
    }
    let nrows_f = nrows as f64;
    for v in mean.iter_mut() {
        *v /= nrows_f;
    }

    let mut var = vec![0.0f64; ncols];
    for row in x.rows() {
        for c in 0..ncols {
            let d = row[c] as f64 - mean[c];
            var[c] += d * d;
        }
    }

    let mut constant = 0;
    let std = var
        .iter()
        .map(|&v| {
            let s = (v / nrows_f).sqrt() as f32;
            if s < Scaler::MIN_STD {
                constant += 1;
                1.0
            } else {
                s
            }
        })
        .collect();
    if constant > 0 {
        log::debug!("{} of {} features have zero variance; leaving them unscaled", constant, ncols);
    }

    Ok(Scaler {
        mean: mean.into_iter().map(|m| m as f32).collect(),
        std,
    })
}

/// Transform all rows using the provided `Scaler` and return a new `Array2<f32>`.
pub fn transform_all(x: &Array2<f32>, sc: &Scaler) -> Result<Array2<f32>> {
    let (nrows, ncols) = x.shape();
    if ncols != sc.mean.len() {
        return Err(HarnessError::ShapeMismatch {
            context: "features given to scaler vs fit time",
            expected: sc.mean.len(),
            found: ncols,
        });
    }
    let mut out = Vec::with_capacity(nrows * ncols);
    for row in x.rows() {
        for c in 0..ncols {
            out.push((row[c] - sc.mean[c]) / sc.std[c]);
        }
    }
    Ok(Array2::from_shape_vec((nrows, ncols), out)?)
}

/// Append a constant column of 1s.
pub fn append_bias_term(x: &Array2<f32>) -> Array2<f32> {
    x.append_column(1.0)
}

/// The fitted transform chain, ready to apply to any split.
#[derive(Debug, Clone)]
pub struct FittedPipeline {
    scaler: Option<Scaler>,
    append_bias: bool,
    pca: Option<Pca>,
    variance_retained: Option<f64>,
}

impl FittedPipeline {
    /// Fit every enabled stage on the (flattened) training features.
    pub fn fit(x_train: &Array2<f32>, config: &PreprocessConfig) -> Result<Self> {
        config.validate()?;

        let scaler = if config.normalize {
            Some(fit_scaler(x_train)?)
        } else {
            None
        };

        let mut pipeline = FittedPipeline {
            scaler,
            append_bias: config.append_bias,
            pca: None,
            variance_retained: None,
        };

        if config.use_pca {
            let staged = pipeline.transform(x_train)?;
            let mut pca = Pca::new(config.pca_d);
            let retained = pca.fit(&staged)?;
            log::info!(
                "The total variance explained by the first {} principal components is {:.3} %",
                config.pca_d,
                retained
            );
            pipeline.pca = Some(pca);
            pipeline.variance_retained = Some(retained);
        }

        Ok(pipeline)
    }

    /// Apply the fitted stages in order: normalize, bias, reduce.
    pub fn transform(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let mut out = match &self.scaler {
            Some(sc) => transform_all(x, sc)?,
            None => x.clone(),
        };
        if self.append_bias {
            out = append_bias_term(&out);
        }
        if let Some(pca) = &self.pca {
            out = pca.reduce(&out)?;
        }
        Ok(out)
    }

    /// Percentage of variance kept by the PCA stage, when enabled.
    pub fn variance_retained(&self) -> Option<f64> {
        self.variance_retained
    }
}

/// Train and test features after preprocessing.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub x_train: Array2<f32>,
    pub x_test: Array2<f32>,
    pub variance_retained: Option<f64>,
}

/// Flatten both splits, fit the pipeline on the training split and apply it
/// to both.
pub fn prepare(dataset: &Dataset, config: &PreprocessConfig) -> Result<PreparedData> {
    let x_train = dataset.train.flatten();
    let x_test = dataset.test.flatten();

    let pipeline = FittedPipeline::fit(&x_train, config)?;
    let x_train = pipeline.transform(&x_train)?;
    let x_test = pipeline.transform(&x_test)?;
    log::debug!(
        "Preprocessed features: train {:?}, test {:?}",
        x_train.shape(),
        x_test.shape()
    );

    Ok(PreparedData {
        x_train,
        x_test,
        variance_retained: pipeline.variance_retained(),
    })
}
