use crate::config::SomatotypeConfig;
use crate::geometry::distance;
use crate::pose::{KeypointIndex, Pose};

/// 体型分類（ソマトタイプ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Build {
    Endomorfo,
    Mesomorfo,
    Ectomorfo,
}

impl Build {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Endomorfo => "Endomorfo",
            Self::Mesomorfo => "Mesomorfo",
            Self::Ectomorfo => "Ectomorfo",
        }
    }
}

/// 肩幅/腰幅の比を3分類する
///
/// 閾値は経験則の固定値で、根拠のある人体計測値ではない。
pub fn classify_ratio(ratio: f32, config: &SomatotypeConfig) -> Build {
    if ratio < config.endomorph_max {
        Build::Endomorfo
    } else if ratio > config.ectomorph_min {
        Build::Ectomorfo
    } else {
        Build::Mesomorfo
    }
}

/// 姿勢ランドマークから体型を推定
///
/// 正規化座標のまま 肩幅 = |左肩-右肩|、腰幅 = |左腰-右腰| を
/// 計算する。必要な4点の信頼度が足りないフレーム、および腰幅が
/// 0 のフレーム（ゼロ除算ガード）は None として破棄される。
pub fn estimate(pose: &Pose, config: &SomatotypeConfig, confidence_threshold: f32) -> Option<Build> {
    let required = [
        KeypointIndex::LeftShoulder,
        KeypointIndex::RightShoulder,
        KeypointIndex::LeftHip,
        KeypointIndex::RightHip,
    ];
    if required
        .iter()
        .any(|&i| !pose.get(i).is_valid(confidence_threshold))
    {
        return None;
    }

    let shoulder_width = distance(
        pose.point(KeypointIndex::LeftShoulder),
        pose.point(KeypointIndex::RightShoulder),
    );
    let hip_width = distance(
        pose.point(KeypointIndex::LeftHip),
        pose.point(KeypointIndex::RightHip),
    );

    if hip_width == 0.0 {
        return None;
    }

    Some(classify_ratio(shoulder_width / hip_width, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Keypoint;

    fn default_config() -> SomatotypeConfig {
        SomatotypeConfig {
            endomorph_max: 1.45,
            ectomorph_min: 1.85,
        }
    }

    #[test]
    fn test_classify_ratio_total() {
        let config = default_config();
        assert_eq!(classify_ratio(1.0, &config), Build::Endomorfo);
        // 境界値は「未満でない」側に含まれる
        assert_eq!(classify_ratio(1.45, &config), Build::Mesomorfo);
        assert_eq!(classify_ratio(1.85, &config), Build::Mesomorfo);
        assert_eq!(classify_ratio(1.86, &config), Build::Ectomorfo);
    }

    fn pose_with_torso(
        shoulders: ([f32; 2], [f32; 2]),
        hips: ([f32; 2], [f32; 2]),
        confidence: f32,
    ) -> Pose {
        let mut pose = Pose::default();
        pose.keypoints[KeypointIndex::LeftShoulder as usize] =
            Keypoint::new(shoulders.0[0], shoulders.0[1], confidence);
        pose.keypoints[KeypointIndex::RightShoulder as usize] =
            Keypoint::new(shoulders.1[0], shoulders.1[1], confidence);
        pose.keypoints[KeypointIndex::LeftHip as usize] =
            Keypoint::new(hips.0[0], hips.0[1], confidence);
        pose.keypoints[KeypointIndex::RightHip as usize] =
            Keypoint::new(hips.1[0], hips.1[1], confidence);
        pose
    }

    #[test]
    fn test_estimate_mesomorph() {
        // 肩幅 0.3 / 腰幅 0.2 = 1.5
        let pose = pose_with_torso(
            ([0.35, 0.3], [0.65, 0.3]),
            ([0.4, 0.6], [0.6, 0.6]),
            0.9,
        );
        let build = estimate(&pose, &default_config(), 0.3);
        assert_eq!(build, Some(Build::Mesomorfo));
    }

    #[test]
    fn test_estimate_zero_hip_width() {
        let pose = pose_with_torso(
            ([0.35, 0.3], [0.65, 0.3]),
            ([0.5, 0.6], [0.5, 0.6]),
            0.9,
        );
        assert_eq!(estimate(&pose, &default_config(), 0.3), None);
    }

    #[test]
    fn test_estimate_low_confidence() {
        let pose = pose_with_torso(
            ([0.35, 0.3], [0.65, 0.3]),
            ([0.4, 0.6], [0.6, 0.6]),
            0.1,
        );
        assert_eq!(estimate(&pose, &default_config(), 0.3), None);
    }
}
