/// 手ランドマークモデルの 21 ポイントインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmarkIndex {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmarkIndex {
    pub const COUNT: usize = 21;
}

/// 片手分のランドマーク（正規化座標、画像座標系でyは下向き正）
#[derive(Debug, Clone, PartialEq)]
pub struct HandPose {
    pub points: [[f32; 2]; HandLandmarkIndex::COUNT],
}

impl HandPose {
    pub fn new(points: [[f32; 2]; HandLandmarkIndex::COUNT]) -> Self {
        Self { points }
    }

    pub fn point(&self, index: HandLandmarkIndex) -> [f32; 2] {
        self.points[index as usize]
    }
}

impl Default for HandPose {
    fn default() -> Self {
        Self {
            points: [[0.0, 0.0]; HandLandmarkIndex::COUNT],
        }
    }
}
