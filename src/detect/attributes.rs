use anyhow::{Context, Result};
use opencv::{
    core::{Mat, Rect, Scalar, Size, CV_32F},
    dnn::{self, Net},
    prelude::*,
};

use crate::config::{HeightConfig, ModelConfig};

/// 年齢分類モデルの入力サイズ
const CLASSIFIER_INPUT_SIZE: i32 = 227;

/// モデル学習時のBGR平均値
const MEAN_BGR: (f64, f64, f64) = (78.4263377603, 87.7689143744, 114.895847746);

/// モデルが予測する8つの年齢区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum AgeBracket {
    Infant = 0,
    Child = 1,
    PreTeen = 2,
    Teen = 3,
    YoungAdult = 4,
    Adult = 5,
    MiddleAged = 6,
    Senior = 7,
}

impl AgeBracket {
    pub const COUNT: usize = 8;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Infant),
            1 => Some(Self::Child),
            2 => Some(Self::PreTeen),
            3 => Some(Self::Teen),
            4 => Some(Self::YoungAdult),
            5 => Some(Self::Adult),
            6 => Some(Self::MiddleAged),
            7 => Some(Self::Senior),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Infant => "0-2",
            Self::Child => "4-6",
            Self::PreTeen => "8-12",
            Self::Teen => "15-20",
            Self::YoungAdult => "25-32",
            Self::Adult => "38-43",
            Self::MiddleAged => "48-53",
            Self::Senior => "60-100",
        }
    }
}

/// モデルが予測する2つの性別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Gender {
    Hombre = 0,
    Mujer = 1,
}

impl Gender {
    pub const COUNT: usize = 2;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Hombre),
            1 => Some(Self::Mujer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hombre => "Hombre",
            Self::Mujer => "Mujer",
        }
    }
}

/// 顔ROIから年齢と性別を推定する2ヘッド分類器
pub struct AttributeEstimator {
    age_net: Net,
    gender_net: Net,
}

impl AttributeEstimator {
    /// Caffeモデル（topology + weights）を読み込んで初期化
    pub fn new(models: &ModelConfig) -> Result<Self> {
        let age_net = dnn::read_net_from_caffe(&models.age_proto, &models.age_weights)
            .with_context(|| format!("Failed to load age net: {}", models.age_weights))?;
        let gender_net = dnn::read_net_from_caffe(&models.gender_proto, &models.gender_weights)
            .with_context(|| format!("Failed to load gender net: {}", models.gender_weights))?;

        Ok(Self { age_net, gender_net })
    }

    /// 顔の矩形をフレームから切り出し、両ネットで推定
    pub fn estimate(&mut self, face: Rect, frame: &Mat) -> Result<(AgeBracket, Gender)> {
        let roi = Mat::roi(frame, face)?;
        let blob = dnn::blob_from_image(
            &roi,
            1.0,
            Size::new(CLASSIFIER_INPUT_SIZE, CLASSIFIER_INPUT_SIZE),
            Scalar::new(MEAN_BGR.0, MEAN_BGR.1, MEAN_BGR.2, 0.0),
            false,
            false,
            CV_32F,
        )?;

        self.gender_net
            .set_input(&blob, "", 1.0, Scalar::default())?;
        let gender_scores = self.gender_net.forward_single("")?;
        let gender = Gender::from_index(argmax(&gender_scores)?)
            .context("Gender score index out of range")?;

        self.age_net.set_input(&blob, "", 1.0, Scalar::default())?;
        let age_scores = self.age_net.forward_single("")?;
        let age = AgeBracket::from_index(argmax(&age_scores)?)
            .context("Age score index out of range")?;

        Ok((age, gender))
    }
}

/// スコア行 (1xN) の最大値インデックス
fn argmax(scores: &Mat) -> Result<usize> {
    let data = scores.data_typed::<f32>()?;
    let mut best = 0;
    for (i, &score) in data.iter().enumerate() {
        if score > data[best] {
            best = i;
        }
    }
    Ok(best)
}

/// 目間のピクセル距離から身長を推定
///
/// 2つの固定換算係数を連鎖させるだけの近似。係数は未較正。
pub fn estimate_height(inter_eye_px: f32, config: &HeightConfig) -> f32 {
    let distance_cm = inter_eye_px * config.px_to_cm;
    distance_cm * config.cm_to_height
}
