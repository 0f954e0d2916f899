use crate::utils::error::RipenessError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::{Tensor, ValueType},
};
use parking_lot::Mutex;

/// ONNX成熟度分类器：进程内加载一次，作为不可变黑盒反复调用
pub struct RipenessClassifier {
    session: Mutex<Session>,
    input_name: String,  // 动态发现的输入名称
    output_name: String, // 动态发现的输出名称
    num_classes: usize,  // 期望类别数 = 标签文件行数
}

impl RipenessClassifier {
    pub fn new(config: &Config, num_classes: usize) -> Result<Self> {
        let model_path = config.model_path();

        if !model_path.exists() {
            return Err(RipenessError::ModelLoad(format!(
                "model not found: {}. Verify the artifact path and that training completed",
                model_path.display()
            )));
        }

        tracing::info!("Loading ripeness model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::from)?
            .with_intra_threads(config.onnx_config.intra_threads)
            .map_err(ort::Error::from)?
            .commit_from_file(&model_path)?;

        if session.inputs().is_empty() {
            return Err(RipenessError::ModelLoad(
                "ripeness model has no inputs".to_string(),
            ));
        }
        if session.outputs().is_empty() {
            return Err(RipenessError::ModelLoad(
                "ripeness model has no outputs".to_string(),
            ));
        }

        let input_name = session.inputs()[0].name().to_string();
        let output_name = session.outputs()[0].name().to_string();
        tracing::info!(
            "Ripeness model input: '{}', output: '{}'",
            input_name,
            output_name
        );

        // 输出维度是静态的就在加载时校验，动态形状导出留到首次推理时再查
        let declared = match session.outputs()[0].dtype() {
            ValueType::Tensor { shape, .. } => Self::static_class_count(shape),
            _ => None,
        };
        if let Some(classes) = declared {
            Self::verify_class_count(classes, num_classes)?;
            tracing::info!("Model declares {} output classes", classes);
        } else {
            tracing::debug!("Model output shape is dynamic, deferring class count check");
        }

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            num_classes,
        })
    }

    /// 从输出形状读静态类别数，最后一维为符号维度（<=0）时返回None
    fn static_class_count(shape: &[i64]) -> Option<usize> {
        shape
            .iter()
            .last()
            .copied()
            .filter(|&dim| dim > 0)
            .map(|dim| dim as usize)
    }

    /// 类别数与标签数的比对，在任何预测发生之前执行
    fn verify_class_count(actual: usize, expected: usize) -> Result<()> {
        if actual != expected {
            return Err(RipenessError::ModelMismatch { expected, actual });
        }
        Ok(())
    }

    /// 单次前向推理：预处理后的NHWC张量 -> 概率分布
    pub fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = Tensor::from_array(input)?;

        let raw: Vec<f32> = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(self.output_name.as_str()) {
                Some(output) => output.try_extract_array::<f32>()?.iter().copied().collect(),
                None => {
                    let available: Vec<String> =
                        outputs.keys().map(|name| name.to_string()).collect();
                    return Err(RipenessError::Inference(format!(
                        "output '{}' not found, available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        if raw.len() != self.num_classes {
            return Err(RipenessError::ModelMismatch {
                expected: self.num_classes,
                actual: raw.len(),
            });
        }

        Ok(normalize_distribution(raw))
    }
}

/// 保证输出是一个分类分布。带softmax头的导出原样返回，
/// logits导出做一次softmax。
fn normalize_distribution(mut raw: Vec<f32>) -> Vec<f32> {
    let sum: f32 = raw.iter().sum();
    if raw.iter().all(|&p| p >= 0.0) && (sum - 1.0).abs() <= 1e-3 {
        return raw;
    }

    let max = raw.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let mut exp_sum = 0.0;
    for value in raw.iter_mut() {
        *value = (*value - max).exp();
        exp_sum += *value;
    }
    for value in raw.iter_mut() {
        *value /= exp_sum;
    }

    raw
}
