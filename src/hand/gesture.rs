use super::landmark::{HandLandmarkIndex, HandPose};

/// ポインティングジェスチャの向き
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// 静的な片手ポーズを「左指差し」「右指差し」「なし」に分類する
///
/// 人差し指だけが伸びていることの近似条件:
/// - 人差し指の先端がその付け根より上（画像座標でyが小さい）
/// - 中指・薬指・小指の付け根が上からこの順に並ぶ
///
/// 条件を満たしたら先端と手首のx座標の比較で向きを決める。
/// x が一致する場合は向きなし。
pub fn interpret(hand: &HandPose) -> Option<Direction> {
    let index_tip = hand.point(HandLandmarkIndex::IndexTip);
    let index_mcp = hand.point(HandLandmarkIndex::IndexMcp);
    let middle_mcp = hand.point(HandLandmarkIndex::MiddleMcp);
    let ring_mcp = hand.point(HandLandmarkIndex::RingMcp);
    let pinky_mcp = hand.point(HandLandmarkIndex::PinkyMcp);
    let wrist = hand.point(HandLandmarkIndex::Wrist);

    if index_tip[1] < index_mcp[1] && middle_mcp[1] < ring_mcp[1] && ring_mcp[1] < pinky_mcp[1] {
        if index_tip[0] < wrist[0] {
            return Some(Direction::Left);
        } else if index_tip[0] > wrist[0] {
            return Some(Direction::Right);
        }
    }

    None
}
